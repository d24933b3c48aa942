use nalgebra::Point3;

/// Slack, in cells, that keeps a sample lying exactly on the sphere boundary
/// inside the range despite rounding in the index arithmetic.
const INDEX_EPSILON: f64 = 1e-9;

/// Sampling extent of the lattice along a single Cartesian axis.
///
/// The axis is sampled at `count + 1` points, from `begin` to `end`
/// inclusive, spaced by the lattice resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExtent {
    /// Lower spatial bound in Angstroms.
    pub begin: f64,
    /// Upper spatial bound in Angstroms.
    pub end: f64,
    /// Number of cells along the axis.
    pub count: usize,
}

impl AxisExtent {
    #[inline]
    pub fn span(&self) -> f64 {
        self.end - self.begin
    }
}

/// Half-open interval `[start, end)` of lattice indices along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    pub fn iter(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// A cubic, uniform, axis-aligned sampling lattice.
///
/// All three axes share the same resolution and cell count. The geometry
/// is immutable once built and is shared by every channel of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    axes: [AxisExtent; 3],
    resolution: f64,
}

impl GridGeometry {
    /// Builds a cube of side `count * resolution` centered on `center`.
    ///
    /// # Panics
    ///
    /// Panics if `resolution` is not a positive finite number or `count` is zero,
    /// since either would describe a degenerate lattice.
    pub fn centered(center: &Point3<f64>, count: usize, resolution: f64) -> Self {
        assert!(
            resolution.is_finite() && resolution > 0.0,
            "grid resolution must be positive and finite, got {resolution}"
        );
        assert!(count > 0, "grid must contain at least one cell");

        let half = count as f64 * resolution / 2.0;
        let axis = |c: f64| AxisExtent {
            begin: c - half,
            end: c - half + count as f64 * resolution,
            count,
        };
        Self::from_axes([axis(center.x), axis(center.y), axis(center.z)], resolution)
    }

    /// Builds a geometry from explicit per-axis extents.
    ///
    /// # Panics
    ///
    /// Panics if any axis has `end <= begin`, if the axes disagree on their
    /// cell count, or if `resolution` is not positive.
    pub fn from_axes(axes: [AxisExtent; 3], resolution: f64) -> Self {
        assert!(
            resolution.is_finite() && resolution > 0.0,
            "grid resolution must be positive and finite, got {resolution}"
        );
        for (i, axis) in axes.iter().enumerate() {
            assert!(
                axis.end > axis.begin,
                "degenerate grid axis {i}: end ({}) <= begin ({})",
                axis.end,
                axis.begin
            );
            assert_eq!(
                axis.count, axes[0].count,
                "grid axes must share one cell count"
            );
        }
        Self { axes, resolution }
    }

    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    #[inline]
    pub fn axis(&self, axis: usize) -> &AxisExtent {
        &self.axes[axis]
    }

    /// Number of cells along each axis.
    #[inline]
    pub fn count(&self) -> usize {
        self.axes[0].count
    }

    /// Number of sample points along each axis (`count + 1`).
    #[inline]
    pub fn points_per_axis(&self) -> usize {
        self.count() + 1
    }

    pub fn center(&self) -> Point3<f64> {
        let mid = |a: &AxisExtent| (a.begin + a.end) / 2.0;
        Point3::new(mid(&self.axes[0]), mid(&self.axes[1]), mid(&self.axes[2]))
    }

    #[inline]
    pub fn coordinate_of(&self, axis: usize, index: usize) -> f64 {
        self.axes[axis].begin + index as f64 * self.resolution
    }

    pub fn point_of(&self, i: usize, j: usize, k: usize) -> Point3<f64> {
        Point3::new(
            self.coordinate_of(0, i),
            self.coordinate_of(1, j),
            self.coordinate_of(2, k),
        )
    }

    /// Returns the smallest index interval along `axis` that holds every
    /// sample point strictly closer than `radius` to `center`.
    ///
    /// Both bounds are measured from `begin`. The upper bound is
    /// `ceil(high / resolution)`, widened by one when `high` falls on a
    /// lattice point. When the sphere reaches the far edge the interval runs
    /// through the last fencepost index `count`.
    pub fn index_range_for(&self, axis: usize, center: f64, radius: f64) -> IndexRange {
        let extent = &self.axes[axis];
        let last = extent.count + 1;

        let low = center - radius - extent.begin;
        let start = if low > 0.0 {
            ((low / self.resolution).floor() as usize).min(last)
        } else {
            0
        };

        let high = center + radius - extent.begin;
        let end = if high >= extent.span() {
            last
        } else if high <= 0.0 {
            0
        } else {
            ((high / self.resolution + INDEX_EPSILON).floor() as usize + 1).min(last)
        };

        IndexRange {
            start,
            end: end.max(start),
        }
    }

    /// Index box along all three axes for a sphere of `radius` around `center`.
    pub fn index_box_for(&self, center: &Point3<f64>, radius: f64) -> [IndexRange; 3] {
        [
            self.index_range_for(0, center.x, radius),
            self.index_range_for(1, center.y, radius),
            self.index_range_for(2, center.z, radius),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn origin_grid() -> GridGeometry {
        GridGeometry::centered(&Point3::origin(), 48, 0.5)
    }

    #[test]
    fn centered_grid_spans_requested_cube() {
        let grid = origin_grid();
        for axis in 0..3 {
            assert!(f64_approx_equal(grid.axis(axis).begin, -12.0));
            assert!(f64_approx_equal(grid.axis(axis).end, 12.0));
            assert_eq!(grid.axis(axis).count, 48);
        }
        assert_eq!(grid.points_per_axis(), 49);
        assert_eq!(grid.center(), Point3::origin());
    }

    #[test]
    fn coordinate_of_maps_indices_onto_lattice() {
        let grid = origin_grid();
        assert!(f64_approx_equal(grid.coordinate_of(0, 0), -12.0));
        assert!(f64_approx_equal(grid.coordinate_of(1, 24), 0.0));
        assert!(f64_approx_equal(grid.coordinate_of(2, 48), 12.0));
    }

    #[test]
    fn index_range_for_interior_atom_is_tight() {
        let grid = origin_grid();
        let range = grid.index_range_for(0, 0.0, 2.0);
        assert_eq!(range, IndexRange { start: 20, end: 29 });
    }

    #[test]
    fn index_range_clamps_at_lower_edge() {
        let grid = origin_grid();
        let range = grid.index_range_for(0, -11.0, 3.0);
        assert_eq!(range.start, 0);
        assert_eq!(range.end, 9);
    }

    #[test]
    fn index_range_reaches_last_fencepost_at_far_edge() {
        let grid = origin_grid();
        let range = grid.index_range_for(2, 11.5, 1.0);
        assert_eq!(range.end, 49);
        assert!(range.contains(48));
    }

    #[test]
    fn index_range_is_empty_for_atom_outside_grid() {
        let grid = origin_grid();
        assert!(grid.index_range_for(0, -20.0, 2.0).is_empty());
        assert!(grid.index_range_for(0, 20.0, 2.0).is_empty());
    }

    #[test]
    fn index_range_uses_origin_relative_frame_for_offset_grids() {
        let grid = GridGeometry::centered(&Point3::new(30.0, -7.0, 100.0), 10, 1.0);
        let range = grid.index_range_for(0, 34.6, 1.0);
        assert_eq!(range.end, 11);
        let range = grid.index_range_for(2, 102.2, 1.0);
        assert_eq!(range, IndexRange { start: 6, end: 9 });
    }

    #[test]
    fn index_range_never_misses_points_inside_radius() {
        let grid = GridGeometry::centered(&Point3::new(1.3, -2.7, 0.4), 20, 0.375);
        let radii = [0.45, 1.0, 2.9, 3.3];
        let centers = [-5.1, -3.75, -0.2, 0.0, 1.3, 2.6, 4.99, 6.0];
        for axis in 0..3 {
            for &r in &radii {
                for &offset in &centers {
                    let c = grid.center()[axis] + offset;
                    let range = grid.index_range_for(axis, c, r);
                    for idx in 0..grid.points_per_axis() {
                        if (grid.coordinate_of(axis, idx) - c).abs() < r {
                            assert!(
                                range.contains(idx),
                                "axis {axis} index {idx} dropped for c={c} r={r}"
                            );
                        }
                    }
                    assert!(range.end <= grid.points_per_axis());
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "degenerate grid axis")]
    fn from_axes_rejects_inverted_axis() {
        let good = AxisExtent {
            begin: 0.0,
            end: 1.0,
            count: 2,
        };
        let bad = AxisExtent {
            begin: 1.0,
            end: 1.0,
            count: 2,
        };
        GridGeometry::from_axes([good, bad, good], 0.5);
    }
}

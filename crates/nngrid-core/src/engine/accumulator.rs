use crate::core::grid::array::ChannelArray;
use crate::core::grid::geometry::GridGeometry;
use crate::core::grid::kernel::{KernelMode, occupancy};
use crate::core::models::atom::{Atom, AtomRadii};
use tracing::trace;

/// Adds atom densities into channel arrays laid out on one [`GridGeometry`].
///
/// Each call only visits the index box that can receive a non-zero value,
/// so the work per atom scales with `(radius / resolution)^3` rather than
/// with the grid size.
pub struct GridAccumulator<'a, R: AtomRadii + ?Sized> {
    geometry: &'a GridGeometry,
    radii: &'a R,
    mode: KernelMode,
}

impl<'a, R: AtomRadii + ?Sized> GridAccumulator<'a, R> {
    pub fn new(geometry: &'a GridGeometry, radii: &'a R, mode: KernelMode) -> Self {
        Self {
            geometry,
            radii,
            mode,
        }
    }

    #[inline]
    pub fn geometry(&self) -> &GridGeometry {
        self.geometry
    }

    #[inline]
    pub fn mode(&self) -> KernelMode {
        self.mode
    }

    /// Adds the occupancy of `atom` to every sample of `destination` within
    /// the kernel support. Existing values are incremented, never overwritten.
    ///
    /// This is a read-modify-write of `destination`; concurrent callers must
    /// not share an array.
    ///
    /// # Panics
    ///
    /// Panics if `destination` was not sized for this geometry, if the atom's
    /// type has no radius, or if its position is not finite.
    pub fn accumulate(&self, atom: &Atom, destination: &mut ChannelArray) {
        assert_eq!(
            destination.points(),
            self.geometry.points_per_axis(),
            "destination array does not match grid geometry"
        );
        assert!(
            atom.position.iter().all(|c| c.is_finite()),
            "atom position must be finite"
        );

        let radius = self.radii.radius(atom.type_index);
        let support = radius * self.mode.radius_multiple();
        let [range_i, range_j, range_k] = self.geometry.index_box_for(&atom.position, support);
        trace!(
            type_index = atom.type_index,
            radius,
            cells = range_i.len() * range_j.len() * range_k.len(),
            "Accumulating atom"
        );

        let center = &atom.position;
        for i in range_i.iter() {
            let dx = self.geometry.coordinate_of(0, i) - center.x;
            for j in range_j.iter() {
                let dy = self.geometry.coordinate_of(1, j) - center.y;
                for k in range_k.iter() {
                    let dz = self.geometry.coordinate_of(2, k) - center.z;
                    let value = occupancy(self.mode, radius, dx * dx + dy * dy + dz * dz);
                    if value != 0.0 {
                        destination.add(i, j, k, value as f32);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    const TOLERANCE: f64 = 1e-6;

    fn origin_grid() -> GridGeometry {
        GridGeometry::centered(&Point3::origin(), 48, 0.5)
    }

    fn brute_force(
        geometry: &GridGeometry,
        atom: &Atom,
        radius: f64,
        mode: KernelMode,
    ) -> ChannelArray {
        let mut array = ChannelArray::zeros(geometry.points_per_axis());
        let n = geometry.points_per_axis();
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let d_sq = (geometry.point_of(i, j, k) - atom.position).norm_squared();
                    array.add(i, j, k, occupancy(mode, radius, d_sq) as f32);
                }
            }
        }
        array
    }

    #[test]
    fn binary_atom_at_origin_fills_open_ball() {
        let geometry = origin_grid();
        let radii = vec![2.0];
        let accumulator = GridAccumulator::new(&geometry, &radii, KernelMode::Binary);
        let mut array = ChannelArray::zeros(geometry.points_per_axis());
        accumulator.accumulate(&Atom::new(Point3::origin(), 0), &mut array);

        let n = geometry.points_per_axis();
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let p = geometry.point_of(i, j, k);
                    let expected = if p.coords.norm_squared() < 4.0 { 1.0 } else { 0.0 };
                    assert_eq!(array.get(i, j, k), expected, "at {p}");
                }
            }
        }
    }

    #[test]
    fn smoothed_atom_at_origin_matches_kernel_profile() {
        let geometry = origin_grid();
        let radii = vec![2.0];
        let accumulator = GridAccumulator::new(&geometry, &radii, KernelMode::Smoothed);
        let mut array = ChannelArray::zeros(geometry.points_per_axis());
        accumulator.accumulate(&Atom::new(Point3::origin(), 0), &mut array);

        assert!((array.get(24, 24, 24) as f64 - 1.0).abs() < TOLERANCE);
        assert!((array.get(28, 24, 24) as f64 - (-2.0f64).exp()).abs() < TOLERANCE);
        assert_eq!(array.get(24, 30, 24), 0.0);
        assert_eq!(array.get(24, 24, 18), 0.0);

        let mut previous = array.get(24, 24, 24);
        for i in 25..=30 {
            let value = array.get(i, 24, 24);
            assert!(value <= previous);
            previous = value;
        }
    }

    #[test]
    fn bounded_accumulation_equals_full_grid_scan() {
        let geometry = GridGeometry::centered(&Point3::new(2.0, -1.0, 0.5), 16, 0.5);
        let radii = vec![1.9, 1.2];
        let atoms = [
            Atom::new(Point3::new(2.3, -0.6, 0.7), 0),
            Atom::new(Point3::new(-5.4, -1.0, 4.1), 1),
            Atom::new(Point3::new(6.2, 3.3, -3.9), 0),
        ];
        for mode in [KernelMode::Binary, KernelMode::Smoothed] {
            let accumulator = GridAccumulator::new(&geometry, &radii, mode);
            for atom in &atoms {
                let mut array = ChannelArray::zeros(geometry.points_per_axis());
                accumulator.accumulate(atom, &mut array);
                let expected = brute_force(&geometry, atom, radii[atom.type_index], mode);
                assert_eq!(array, expected, "{mode:?} {atom:?}");
            }
        }
    }

    #[test]
    fn separated_atoms_accumulate_additively() {
        let geometry = origin_grid();
        let radii = vec![1.8];
        let accumulator = GridAccumulator::new(&geometry, &radii, KernelMode::Smoothed);
        let a = Atom::new(Point3::new(-4.0, 0.3, 1.1), 0);
        let b = Atom::new(Point3::new(4.2, -0.7, 0.0), 0);

        let mut both = ChannelArray::zeros(geometry.points_per_axis());
        accumulator.accumulate(&a, &mut both);
        accumulator.accumulate(&b, &mut both);

        let mut only_a = ChannelArray::zeros(geometry.points_per_axis());
        accumulator.accumulate(&a, &mut only_a);
        let mut only_b = ChannelArray::zeros(geometry.points_per_axis());
        accumulator.accumulate(&b, &mut only_b);
        only_a += &only_b;

        assert_eq!(both, only_a);
    }

    #[test]
    fn overlapping_atoms_sum_without_saturation() {
        let geometry = origin_grid();
        let radii = vec![2.0];
        let accumulator = GridAccumulator::new(&geometry, &radii, KernelMode::Binary);
        let atom = Atom::new(Point3::origin(), 0);
        let mut array = ChannelArray::zeros(geometry.points_per_axis());
        accumulator.accumulate(&atom, &mut array);
        accumulator.accumulate(&atom, &mut array);
        assert_eq!(array.get(24, 24, 24), 2.0);
    }

    #[test]
    fn atom_outside_grid_contributes_nothing() {
        let geometry = origin_grid();
        let radii = vec![2.0];
        let accumulator = GridAccumulator::new(&geometry, &radii, KernelMode::Smoothed);
        let mut array = ChannelArray::zeros(geometry.points_per_axis());
        accumulator.accumulate(&Atom::new(Point3::new(40.0, 0.0, 0.0), 0), &mut array);
        assert_eq!(array.total(), 0.0);
    }

    #[test]
    #[should_panic(expected = "does not match grid geometry")]
    fn undersized_destination_panics() {
        let geometry = origin_grid();
        let radii = vec![2.0];
        let accumulator = GridAccumulator::new(&geometry, &radii, KernelMode::Binary);
        let mut array = ChannelArray::zeros(48);
        accumulator.accumulate(&Atom::new(Point3::origin(), 0), &mut array);
    }

    #[test]
    #[should_panic(expected = "atom position must be finite")]
    fn non_finite_position_panics() {
        let geometry = origin_grid();
        let radii = vec![2.0];
        let accumulator = GridAccumulator::new(&geometry, &radii, KernelMode::Smoothed);
        let mut array = ChannelArray::zeros(geometry.points_per_axis());
        accumulator.accumulate(&Atom::new(Point3::new(f64::NAN, 0.0, 0.0), 0), &mut array);
    }
}

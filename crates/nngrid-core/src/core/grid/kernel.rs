use std::f64::consts::E;

/// Value of the Gaussian branch at `d = r`, where `r^2 / (2h^2) = 2`.
const GAUSSIAN_AT_RADIUS: f64 = 1.0 / (E * E);

/// Support of the smoothed kernel, in multiples of the atomic radius.
pub const SMOOTHED_RADIUS_MULTIPLE: f64 = 1.5;
/// Support of the binary kernel, in multiples of the atomic radius.
pub const BINARY_RADIUS_MULTIPLE: f64 = 1.0;

/// How an atom's occupancy is spread onto nearby grid points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelMode {
    /// Hard sphere: 1 inside the radius, 0 outside.
    Binary,
    /// Gaussian core spliced onto a quadratic tail that vanishes at 1.5 radii.
    #[default]
    Smoothed,
}

impl KernelMode {
    /// Factor applied to an atom's radius to obtain the kernel support.
    ///
    /// The accumulator sizes its visited sub-volume with this value, so it must
    /// never be smaller than the distance at which [`occupancy`] becomes zero.
    #[inline]
    pub fn radius_multiple(self) -> f64 {
        match self {
            KernelMode::Binary => BINARY_RADIUS_MULTIPLE,
            KernelMode::Smoothed => SMOOTHED_RADIUS_MULTIPLE,
        }
    }
}

/// Occupancy contributed at squared distance `dist_sq` by an atom of radius `radius`.
#[inline]
pub fn occupancy(mode: KernelMode, radius: f64, dist_sq: f64) -> f64 {
    match mode {
        KernelMode::Binary => binary_occupancy(radius, dist_sq),
        KernelMode::Smoothed => smoothed_occupancy(radius, dist_sq.sqrt()),
    }
}

#[inline]
pub fn binary_occupancy(radius: f64, dist_sq: f64) -> f64 {
    if dist_sq < radius * radius { 1.0 } else { 0.0 }
}

/// Gaussian with two standard deviations at `radius`, continued past the radius
/// by the quadratic matching its value and slope there and reaching zero value
/// and zero slope at `1.5 * radius`.
#[inline]
pub fn smoothed_occupancy(radius: f64, dist: f64) -> f64 {
    if dist >= radius * SMOOTHED_RADIUS_MULTIPLE {
        return 0.0;
    }
    let h = 0.5 * radius;
    if dist <= radius {
        (-dist * dist / (2.0 * h * h)).exp()
    } else {
        let q = dist / h;
        GAUSSIAN_AT_RADIUS * (q * q - 6.0 * q + 9.0)
    }
}

//! Sampling lattice, occupancy kernel, and dense per-channel sample storage.
//!
//! These are pure value types: the [`geometry`] maps between lattice indices and
//! world coordinates, the [`kernel`] turns an atom-to-point distance into an
//! occupancy value, and [`array`] holds one channel of samples.

pub mod array;
pub mod geometry;
pub mod kernel;

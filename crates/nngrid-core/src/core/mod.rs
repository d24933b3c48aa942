//! # Core Module
//!
//! Stateless building blocks of the gridder.
//!
//! - **Lattice and kernel** ([`grid`]) - Grid geometry, the occupancy kernel, and
//!   dense per-channel sample arrays
//! - **Atoms and types** ([`models`]) - Typed atoms, the atom type table, and
//!   type-to-channel maps
//! - **File I/O** ([`io`]) - Structure sources and the map and packed binary
//!   output encodings
//!
//! Nothing in this module holds state between calls; the [`engine`](crate::engine)
//! owns the channel storage and drives these pieces.

pub mod grid;
pub mod io;
pub mod models;

//! # nngrid
//!
//! Turns typed atoms into multi-channel 3D occupancy grids for neural-network
//! scoring of protein-ligand poses, and writes them as AutoDock-style `.map`
//! text files or packed binary `.binmap` files.
//!
//! ## Layout
//!
//! - **[`core`]: The Foundation.** Grid geometry, density kernels and channel
//!   arrays, the atom type table and type-to-channel maps, and the readers and
//!   writers for structures and grid files.
//!
//! - **[`engine`]: The Logic Core.** Validated grid configuration, per-atom
//!   density accumulation, and the `GridSession` that holds a fixed receptor
//!   grid alongside ligand grids rebuilt for every pose.
//!
//! - **[`workflows`]: The Public API.** Complete runs that drive a session over
//!   a stream of poses and write the requested outputs.

pub mod core;
pub mod engine;
pub mod workflows;

//! # Engine Module
//!
//! The stateful half of the gridder: it owns channel storage and turns atom
//! lists into filled grids.
//!
//! - **Accumulation** ([`accumulator`]) - Adds one atom's kernel into a channel
//!   array, visiting only the cells inside the kernel support
//! - **Channel Storage** ([`channels`]) - The arrays of one side plus its
//!   type-to-channel map
//! - **Session** ([`session`]) - Grids the receptor once and regrids the ligand
//!   for every structure pulled from a source
//! - **Configuration** ([`config`]) - Grid center, size, resolution and kernel
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine error types

pub mod accumulator;
pub mod channels;
pub mod config;
pub mod error;
pub mod progress;
pub mod session;

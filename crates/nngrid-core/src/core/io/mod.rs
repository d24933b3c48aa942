//! Provides input/output functionality for gridding.
//!
//! Structures come in through the [`traits::StructureSource`] trait, with a BGF
//! reader for files. Finished grids go out as AutoDock-style per-channel text
//! maps ([`map`]) or as one packed, channel-interleaved binary stream
//! ([`binmap`]).

pub mod bgf;
pub mod binmap;
pub mod map;
pub mod traits;

//! # Core Models Module
//!
//! Data types describing what gets gridded: typed [`atom`]s, the [`types`] table
//! that gives every atom type a name and a radius, and the [`type_map`] that
//! routes each type to an output channel.

pub mod atom;
pub mod type_map;
pub mod types;

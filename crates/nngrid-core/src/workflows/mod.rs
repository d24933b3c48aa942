//! # Workflows Module
//!
//! End-to-end runs built on the [`engine`](crate::engine).
//!
//! - **Gridding Workflow** ([`grid`]) - Grids a receptor once and every ligand
//!   pose of a structure stream, writing packed binary and map outputs per pose.

pub mod grid;

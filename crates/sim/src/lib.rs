//! # Simulation Crate
//!
//! The `sim` crate provides the core logic for directional evolution on NK
//! fitness landscapes. It includes modules for genomes and genome sets, the
//! landscapes themselves, evolutionary operators (mutation, truncation
//! selection schedules), the counter-based population and the simulation
//! driver, and the text outputs a run produces.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod landscape;
pub mod simulation;
pub mod storage;
pub mod prelude;

pub use base::{Genome, GenomeSpace};
pub use landscape::{Landscape, NkParams};

//! Shared default values for the command-line options.
//! Model defaults come from the simulation crate so that flags and
//! configuration files agree.

pub use nkevo_sim::simulation::configs::{
    DEFAULT_K as EPISTASIS_SIZE, DEFAULT_N as GENOME_LENGTH, DEFAULT_SEED as SEED,
};

/// Landscape file written by `nkevo landscape`
pub const LANDSCAPE_OUTPUT: &str = "landscape.txt";

/// Peaks listed by `nkevo peaks`
pub const PEAK_LIMIT: usize = 20;

pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}";

//! Base types for genome representation.
//!
//! This module provides the foundational types shared by landscapes and
//! populations: genome values and their space, the genome presence set,
//! per-genome fitness caching, and the seeded generator.

pub mod fitness;
mod genome;
mod genome_set;
mod random;

pub use fitness::{FitnessCache, ReplicationWindow};
pub use genome::{hamming_distance, Genome, GenomeSpace};
pub use genome_set::GenomeSet;
pub use random::{fresh_seed, run_rng, seeded_rng, SimRng};

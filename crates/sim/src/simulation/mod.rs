//! Simulation engine and population management.
//!
//! - [`Simulation`]: builds landscapes and population from a
//!   [`Configuration`] and runs generations, shocks included.
//! - [`PopulationCounter`]: the population as per-genotype counts, with the
//!   replication and selection step.
//! - [`PopulationStats`]: per-generation summary statistics.
//! - population file reading and writing.

pub mod configs;
mod engine;
mod initialization;
mod population;
mod statistics;

pub use configs::{
    Configuration, EvolutionConfig, ExecutionConfig, InitializationConfig, LandscapeConfig,
};
pub use engine::{RunSummary, Simulation, StepOutcome};
pub use initialization::{
    initialize_population, parse_population, read_population, write_population,
    write_population_to,
};
pub use population::{GenotypeRecord, PopulationCounter};
pub use statistics::{PopulationStats, EXTINCT};

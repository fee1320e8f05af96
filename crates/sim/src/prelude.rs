//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use nkevo_sim::prelude::*;
//!
//! let params = NkParams::new(6, 2).unwrap();
//! let mut landscape = Landscape::generate(params, Epistasis::Adjacent, 42);
//! landscape.locate_peaks();
//! assert!(landscape.has_peaks());
//! ```

pub use crate::errors::{self, ConfigurationError, SimulationError};
pub use crate::base::{Genome, GenomeSpace, ReplicationWindow};
pub use crate::evolution::{CutoffSchedule, MutationStrategy, ShockSchedule};
pub use crate::landscape::{Epistasis, Landscape, NkParams};
pub use crate::simulation::{Configuration, PopulationCounter, RunSummary, Simulation, StepOutcome};
pub use crate::storage::TraceFormat;

//! Evolution module providing mutation and selection.
//!
//! This module implements the two evolutionary operators applied each
//! generation:
//! - **Mutation**: how a replicating parent's offspring genome is derived
//! - **Selection**: the cutoff and shock threshold schedules

pub mod mutation;
pub mod selection;

pub use mutation::MutationStrategy;
pub use selection::{CutoffSchedule, ShockSchedule, DEFAULT_CUTOFF};

//! Fitness caching and fitness-dependent replication probability.

use super::genome::Genome;
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Dense per-genome fitness memo, indexed by genome value.
///
/// Slots start out unevaluated. Landscape fitness is pure, so a value is
/// computed at most once per genome and reused for the rest of the run.
#[derive(Debug, Clone)]
pub struct FitnessCache {
    values: Vec<f64>,
}

impl FitnessCache {
    /// Create a cache for genomes in `[0, size)`.
    pub fn new(size: usize) -> Self {
        Self {
            values: vec![f64::NAN; size],
        }
    }

    /// Number of genome slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cached fitness of `genome`, if it has been evaluated.
    #[inline]
    pub fn get(&self, genome: Genome) -> Option<f64> {
        let value = self.values[genome as usize];
        (!value.is_nan()).then_some(value)
    }

    /// Cached fitness of `genome`, evaluating and storing it on first use.
    #[inline]
    pub fn get_or_insert_with<F>(&mut self, genome: Genome, evaluate: F) -> f64
    where
        F: FnOnce(Genome) -> f64,
    {
        let slot = &mut self.values[genome as usize];
        if slot.is_nan() {
            *slot = evaluate(genome);
        }
        *slot
    }
}

/// Maps parent fitness linearly onto a replication probability.
///
/// Fitness at or above `max_fit` always replicates, fitness below `min_fit`
/// never does, and values in between are interpolated. With the default
/// window `[0, 0]` every genome replicates with probability 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplicationWindow {
    /// Minimum fitness needed to replicate at all.
    pub min_fit: f64,
    /// Fitness at which replication becomes certain.
    pub max_fit: f64,
}

impl ReplicationWindow {
    /// Create a window, checking `0 <= min_fit <= max_fit <= 1`.
    pub fn new(min_fit: f64, max_fit: f64) -> Result<Self, ConfigurationError> {
        let window = Self { min_fit, max_fit };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.min_fit >= 0.0 && self.max_fit <= 1.0 && self.min_fit <= self.max_fit) {
            return Err(ConfigurationError::FitnessWindow {
                min: self.min_fit,
                max: self.max_fit,
            });
        }
        Ok(())
    }

    /// Probability in [0, 1] that a parent with `fitness` replicates.
    #[inline]
    pub fn probability(&self, fitness: f64) -> f64 {
        if fitness >= self.max_fit {
            1.0
        } else if fitness < self.min_fit {
            0.0
        } else {
            ((fitness - self.min_fit) / (self.max_fit - self.min_fit)).clamp(0.0, 1.0)
        }
    }
}

impl Default for ReplicationWindow {
    fn default() -> Self {
        Self {
            min_fit: 0.0,
            max_fit: 0.0,
        }
    }
}

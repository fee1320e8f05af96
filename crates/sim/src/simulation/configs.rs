//! Simulation parameters and configuration.
//!
//! A [`Configuration`] fully describes a run: landscapes, evolutionary
//! operators, initial population and output. It round-trips through JSON, so
//! the effective configuration written next to a run's outputs reproduces it.

use crate::base::{Genome, ReplicationWindow};
use crate::errors::{ConfigurationError, SimulationError};
use crate::evolution::{CutoffSchedule, MutationStrategy, ShockSchedule};
use crate::landscape::{Epistasis, NkParams};
use crate::storage::TraceFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_N: u32 = 10;
pub const DEFAULT_K: u32 = 5;
pub const DEFAULT_POPULATION: u64 = 10;
pub const DEFAULT_GENERATIONS: u32 = 10;
pub const DEFAULT_SEED: u64 = 32767;
pub const DEFAULT_SHOCK_SEED: u64 = 79;
pub const DEFAULT_MUTATION_RATE: f64 = 0.1;
pub const DEFAULT_PROGRESS: u32 = 10;
pub const DEFAULT_OUTPUT: &str = "out.txt";
pub const DEFAULT_ALPHA: f64 = 1.0;

fn default_shock_seed() -> u64 {
    DEFAULT_SHOCK_SEED
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_population() -> u64 {
    DEFAULT_POPULATION
}

/// The master configuration struct.
/// Can be deserialized from a file to fully reproduce a simulation setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Configuration {
    pub execution: ExecutionConfig,
    pub landscape: LandscapeConfig,
    pub evolution: EvolutionConfig,
    pub initialization: InitializationConfig,
}

/// Run length, seeding and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Last generation to simulate
    pub max_generations: u32,
    /// RNG seed for the run and the replication landscape. A fresh seed is
    /// drawn (and recorded) when absent.
    pub seed: Option<u64>,
    /// Report statistics every this many generations; 0 disables reporting
    pub progress: u32,
    /// Base output file; artifacts are written beside it with prefixes
    pub output: PathBuf,
    /// Per-genotype trace format
    #[serde(default)]
    pub trace: TraceFormat,
    /// Write the population after every generation, not only at the end
    #[serde(default)]
    pub trace_population: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_generations: DEFAULT_GENERATIONS,
            seed: Some(DEFAULT_SEED),
            progress: DEFAULT_PROGRESS,
            output: PathBuf::from(DEFAULT_OUTPUT),
            trace: TraceFormat::None,
            trace_population: false,
        }
    }
}

/// Shape and sources of the replication and shock landscapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandscapeConfig {
    /// Genome length in bits
    pub n: u32,
    /// Number of loci interacting with each locus
    pub k: u32,
    #[serde(default)]
    pub epistasis: Epistasis,
    /// Replication landscape file, read if present and written otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Seed for the shock landscape
    #[serde(default = "default_shock_seed")]
    pub shock_seed: u64,
    /// Correlation of the shock landscape with the replication landscape.
    /// An independent shock landscape is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rho: Option<f64>,
    /// Shock landscape file, read if present and written otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shock_file: Option<PathBuf>,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            n: DEFAULT_N,
            k: DEFAULT_K,
            epistasis: Epistasis::Adjacent,
            file: None,
            shock_seed: DEFAULT_SHOCK_SEED,
            rho: None,
            shock_file: None,
        }
    }
}

impl LandscapeConfig {
    pub fn params(&self) -> Result<NkParams, ConfigurationError> {
        NkParams::new(self.n, self.k)
    }
}

/// Grouped evolutionary parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    #[serde(default)]
    pub mutation: MutationStrategy,
    /// Fitness-dependent replication probability
    #[serde(default)]
    pub replication: ReplicationWindow,
    #[serde(default)]
    pub cutoffs: CutoffSchedule,
    #[serde(default)]
    pub shocks: ShockSchedule,
    /// Population ceiling for density-dependent replication; 0 for none
    #[serde(default)]
    pub max_population: u64,
    /// Growth factor applied when a ceiling is set
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation: MutationStrategy::SingleRandom,
            replication: ReplicationWindow::default(),
            cutoffs: CutoffSchedule::default(),
            shocks: ShockSchedule::default(),
            max_population: 0,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.mutation.validate()?;
        self.replication.validate()?;
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(ConfigurationError::InvalidParameter(format!(
                "alpha must be a non-negative number, found {}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// Replication probability multiplier for a population of `size`.
    ///
    /// `alpha * (1 - size / max_population)` clamped to [0, 1] when a
    /// ceiling is configured, otherwise 1.
    pub fn density_factor(&self, size: u64) -> f64 {
        if self.max_population == 0 {
            1.0
        } else {
            (self.alpha * (1.0 - size as f64 / self.max_population as f64)).clamp(0.0, 1.0)
        }
    }
}

/// Configuration for population initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitializationConfig {
    /// Draw `size` genomes uniformly at random.
    Random { size: u64 },
    /// Read the population from a file. If it does not exist or cannot be
    /// parsed, `size` random genomes are drawn instead and, for a missing
    /// file, written to `path`.
    File {
        path: PathBuf,
        #[serde(default = "default_population")]
        size: u64,
    },
    /// Start from explicit `(genome, count)` pairs.
    Genomes { entries: Vec<(Genome, u64)> },
}

impl Default for InitializationConfig {
    fn default() -> Self {
        Self::Random {
            size: DEFAULT_POPULATION,
        }
    }
}

impl Configuration {
    /// Check every parameter range. Nothing is built from an invalid
    /// configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let params = self.landscape.params()?;
        if let Some(rho) = self.landscape.rho {
            if !(-1.0..=1.0).contains(&rho) {
                return Err(ConfigurationError::Correlation(rho));
            }
        }
        self.evolution.validate()?;
        if let InitializationConfig::Genomes { entries } = &self.initialization {
            if let Some((genome, _)) = entries
                .iter()
                .find(|(g, _)| !params.space().contains(u64::from(*g)))
            {
                return Err(ConfigurationError::InvalidParameter(format!(
                    "initial genome {genome} does not fit N = {}",
                    params.n()
                )));
            }
        }
        Ok(())
    }

    /// Read a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, SimulationError> {
        let text = fs::read_to_string(path).map_err(|source| SimulationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SimulationError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), SimulationError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SimulationError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json + "\n").map_err(|source| SimulationError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Configuration::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.landscape.n, 10);
        assert_eq!(config.landscape.k, 5);
        assert_eq!(config.execution.seed, Some(32767));
        assert_eq!(config.landscape.shock_seed, 79);
        assert_eq!(config.evolution.cutoffs.cutoff_at(1), 0.5);
        assert_eq!(
            config.initialization,
            InitializationConfig::Random { size: 10 }
        );
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut config = Configuration::default();
        config.landscape.k = 10;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::EpistasisSize { n: 10, k: 10 })
        ));

        let mut config = Configuration::default();
        config.landscape.n = 32;
        assert!(config.validate().is_err());

        let mut config = Configuration::default();
        config.evolution.mutation = MutationStrategy::MultiRandom { rate: 1.2 };
        assert_eq!(config.validate(), Err(ConfigurationError::MutationRate(1.2)));

        let mut config = Configuration::default();
        config.evolution.replication = ReplicationWindow {
            min_fit: 0.8,
            max_fit: 0.2,
        };
        assert!(config.validate().is_err());

        let mut config = Configuration::default();
        config.landscape.rho = Some(-2.0);
        assert_eq!(config.validate(), Err(ConfigurationError::Correlation(-2.0)));

        let mut config = Configuration::default();
        config.initialization = InitializationConfig::Genomes {
            entries: vec![(1024, 1)],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_density_factor() {
        let mut evolution = EvolutionConfig::default();
        assert_eq!(evolution.density_factor(1_000_000), 1.0);
        evolution.max_population = 100;
        evolution.alpha = 2.0;
        assert_eq!(evolution.density_factor(0), 1.0);
        assert!((evolution.density_factor(75) - 0.5).abs() < 1e-12);
        assert_eq!(evolution.density_factor(150), 0.0);
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf.json");
        let mut config = Configuration::default();
        config.landscape.rho = Some(0.5);
        config.evolution.shocks = ShockSchedule::from_list(&[5.0, 0.3]).unwrap();
        config.execution.trace = TraceFormat::Csv;
        config.save(&path).unwrap();
        assert_eq!(Configuration::load(&path).unwrap(), config);
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let json = r#"{
            "execution": {"max_generations": 5, "seed": 1, "progress": 0, "output": "run.txt"},
            "landscape": {"n": 8, "k": 2},
            "evolution": {},
            "initialization": {"random": {"size": 50}}
        }"#;
        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.landscape.shock_seed, 79);
        assert_eq!(config.evolution.alpha, 1.0);
        assert_eq!(config.evolution.mutation, MutationStrategy::SingleRandom);
        assert_eq!(config.execution.trace, TraceFormat::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Configuration::load(&path),
            Err(SimulationError::Json { .. })
        ));
    }
}

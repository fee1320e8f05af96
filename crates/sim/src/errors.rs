use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating simulation parameters.
///
/// These are fatal: nothing is built once one of them is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// Genome length outside `1..32`.
    #[error("N must be 0 < N < 32, found {0}")]
    GenomeLength(u32),

    /// Epistasis size outside `0..N`.
    #[error("K must be 0 <= K < {n}, found {k}")]
    EpistasisSize { n: u32, k: u32 },

    /// Per-bit mutation probability outside the open interval (0, 1).
    #[error("Mutation probability must be 0 < r < 1, found {0}")]
    MutationRate(f64),

    /// Replication fitness window outside [0, 1] or inverted.
    #[error("minfit and maxfit must satisfy 0 <= minfit <= maxfit <= 1, found [{min}, {max}]")]
    FitnessWindow { min: f64, max: f64 },

    /// Correlation coefficient outside [-1, 1].
    #[error("Correlation coefficient must be in [-1, 1], found {0}")]
    Correlation(f64),

    /// A name that does not match any known strategy or format.
    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    /// Malformed cutoff or shock schedule.
    #[error("Invalid {name} schedule: {reason}")]
    Schedule { name: &'static str, reason: String },

    /// Any other out-of-range value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors raised while assembling epistasis or fitness tables from explicit
/// rows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("expected {expected} epistasis rows, found {found}")]
    RowCount { expected: usize, found: usize },

    /// A row of the wrong length.
    #[error("row {row}: expected {expected} values, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: locus {locus} outside [0, {n})")]
    LocusOutOfRange { row: usize, locus: u32, n: u32 },

    #[error("row {row}: duplicate locus {locus}")]
    DuplicateLocus { row: usize, locus: u32 },
}

/// Errors raised while reading a landscape file.
#[derive(Debug, Error)]
pub enum LandscapeFileError {
    #[error("Unable to read landscape file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row had the wrong number of values.
    #[error("Illegal landscape file at line {line}: expected {expected} values, found {found}")]
    Shape {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The file ended before all epistasis or fitness rows were read.
    #[error("Landscape file ended early: expected {expected} {section} rows, found {found}")]
    Truncated {
        section: &'static str,
        expected: usize,
        found: usize,
    },

    /// A value could not be parsed, or names an invalid genome.
    #[error("Illegal landscape file at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The epistasis or fitness rows do not form a valid table.
    #[error("Illegal landscape file at line {line}: {source}")]
    Table {
        line: usize,
        #[source]
        source: TableError,
    },
}

/// Errors raised while reading a population file.
#[derive(Debug, Error)]
pub enum PopulationFileError {
    #[error("Unable to read population file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Illegal population file at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A genome value does not fit the configured genome length. Fatal.
    #[error("Genome {genome} at line {line} does not fit N = {n}")]
    GenomeOutOfRange { line: usize, genome: u64, n: u32 },
}

impl PopulationFileError {
    /// Whether the error should abort the run instead of falling back to a
    /// random population.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::GenomeOutOfRange { .. })
    }
}

/// Top-level error returned when building or running a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    LandscapeFile(#[from] LandscapeFileError),

    #[error(transparent)]
    PopulationFile(#[from] PopulationFileError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

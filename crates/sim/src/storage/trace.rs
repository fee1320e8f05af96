//! Per-genotype trace of a run.

use crate::errors::{ConfigurationError, SimulationError};
use crate::simulation::GenotypeRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Column names of the trace, in order.
pub const TRACE_COLUMNS: [&str; 7] = [
    "Generation",
    "Genome",
    "Count",
    "Fitness",
    "Cutoff",
    "shock",
    "shockFitness",
];

/// Output format of the per-genotype trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceFormat {
    /// No trace is written.
    #[default]
    None,
    Csv,
    Tsv,
}

impl TraceFormat {
    /// Field separator, if the format writes a trace.
    pub fn separator(&self) -> Option<char> {
        match self {
            Self::None => None,
            Self::Csv => Some(','),
            Self::Tsv => Some('\t'),
        }
    }

    /// File name prefix, if the format writes a trace.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Csv => Some("csv-"),
            Self::Tsv => Some("tsv-"),
        }
    }
}

impl fmt::Display for TraceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

impl FromStr for TraceFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(ConfigurationError::UnknownVariant {
                kind: "trace format",
                value: s.to_string(),
            }),
        }
    }
}

/// Writes one row per active genotype after every generation and shock.
///
/// Rows after a generation carry the cutoff and a shock of 0; rows after a
/// shock carry the shock threshold and a cutoff of 0. The underlying writer
/// is flushed when the trace is finished or dropped.
#[derive(Debug)]
pub struct TraceWriter<W: Write = BufWriter<File>> {
    out: W,
    separator: char,
}

impl TraceWriter {
    /// Create the trace file at `path`, or `None` for [`TraceFormat::None`].
    pub fn create(path: &Path, format: TraceFormat) -> Result<Option<Self>, SimulationError> {
        let Some(separator) = format.separator() else {
            return Ok(None);
        };
        let io_error = |source| SimulationError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_error)?;
        TraceWriter::with_separator(BufWriter::new(file), separator)
            .map(Some)
            .map_err(io_error)
    }
}

impl<W: Write> TraceWriter<W> {
    /// Wrap `out` and write the header line.
    pub fn with_separator(mut out: W, separator: char) -> io::Result<Self> {
        writeln!(out, "{}", TRACE_COLUMNS.join(&separator.to_string()))?;
        Ok(Self { out, separator })
    }

    /// Write one row per record.
    pub fn write_records<I>(
        &mut self,
        generation: u32,
        cutoff: f64,
        shock: f64,
        records: I,
    ) -> io::Result<()>
    where
        I: IntoIterator<Item = GenotypeRecord>,
    {
        let s = self.separator;
        for r in records {
            writeln!(
                self.out,
                "{generation}{s}{}{s}{}{s}{:9.6}{s}{cutoff:9.6}{s}{shock:9.6}{s}{:9.6}",
                r.genome, r.count, r.fitness, r.shock_fitness
            )?;
        }
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

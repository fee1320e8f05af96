use super::TraceFormat;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Names the artifacts of a run after its output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    output: PathBuf,
}

impl OutputPaths {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    /// The configured output file.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// `<dir>/<prefix><name>` for an output file `<dir>/<name>`.
    pub fn prefixed(&self, prefix: &str) -> PathBuf {
        let mut name = OsString::from(prefix);
        name.push(self.output.file_name().unwrap_or_default());
        match self.output.parent() {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Create the output directory if it does not exist.
    pub fn create_dir(&self) -> io::Result<()> {
        match self.output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
            _ => Ok(()),
        }
    }

    /// Effective configuration.
    pub fn config(&self) -> PathBuf {
        self.prefixed("conf-")
    }

    /// Replication landscape.
    pub fn landscape(&self) -> PathBuf {
        self.prefixed("land-")
    }

    /// Shock landscape.
    pub fn shock_landscape(&self) -> PathBuf {
        self.prefixed("sland-")
    }

    /// Per-generation statistics.
    pub fn stats(&self) -> PathBuf {
        self.prefixed("stats-")
    }

    /// Per-genotype trace, if the format writes one.
    pub fn trace(&self, format: TraceFormat) -> Option<PathBuf> {
        format.prefix().map(|prefix| self.prefixed(prefix))
    }

    /// Final population.
    pub fn population(&self) -> PathBuf {
        self.prefixed("pop-")
    }

    /// Population after `generation`.
    pub fn population_at(&self, generation: u32) -> PathBuf {
        self.prefixed(&format!("pop-{generation}-"))
    }
}

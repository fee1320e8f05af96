//! Per-generation statistics report.

use crate::errors::SimulationError;
use crate::simulation::PopulationStats;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Header line of the statistics report and the progress table.
pub const STATS_HEADER: &str = "gen population uniques average stdev diversity cutoff";

/// One fixed-width statistics row.
pub fn format_stats_row(generation: u32, stats: &PopulationStats, cutoff: f64) -> String {
    format!(
        "{:4} {:8} {:8} {:9.3} {:9.3} {:9.3} {:6.2}",
        generation,
        stats.population_size,
        stats.unique_genomes,
        stats.average_fitness,
        stats.standard_deviation,
        stats.shannon_diversity,
        cutoff
    )
}

/// Writes one statistics row per generation.
#[derive(Debug)]
pub struct StatsWriter<W: Write = BufWriter<File>> {
    out: W,
}

impl StatsWriter {
    pub fn create(path: &Path) -> Result<Self, SimulationError> {
        let io_error = |source| SimulationError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(io_error)?;
        StatsWriter::new(BufWriter::new(file)).map_err(io_error)
    }
}

impl<W: Write> StatsWriter<W> {
    /// Wrap `out` and write the header line.
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "{STATS_HEADER}")?;
        Ok(Self { out })
    }

    pub fn write_row(
        &mut self,
        generation: u32,
        stats: &PopulationStats,
        cutoff: f64,
    ) -> io::Result<()> {
        writeln!(self.out, "{}", format_stats_row(generation, stats, cutoff))
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_layout() {
        let stats = PopulationStats::compute(vec![(5, 0.2, 0.9), (5, 0.4, 0.1)]);
        assert_eq!(
            format_stats_row(12, &stats, 0.5),
            "  12       10        2     0.300     0.105     0.693   0.50"
        );
    }

    #[test]
    fn test_extinct_row() {
        let row = format_stats_row(3, &PopulationStats::extinct(), 0.5);
        assert_eq!(row, "   3        0        0    -1.000    -1.000    -1.000   0.50");
    }

    #[test]
    fn test_writer_header_then_rows() {
        let mut writer = StatsWriter::new(Vec::new()).unwrap();
        writer
            .write_row(0, &PopulationStats::extinct(), 0.5)
            .unwrap();
        let text = String::from_utf8(writer.finish().unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(STATS_HEADER));
        assert!(lines.next().unwrap().starts_with("   0"));
    }
}

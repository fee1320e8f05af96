//! NK fitness landscapes.
//!
//! A landscape assigns every N-bit genome a fitness in `[0, 1)`: the mean of
//! N per-locus contributions, each looked up from the alleles at K+1
//! interacting loci. Landscapes are built once and then shared read-only.

mod epistasis;
mod io;
mod peaks;
mod table;

pub use epistasis::{Epistasis, EpistasisTable};
pub use peaks::Peaks;
pub use table::FitnessTable;

use crate::base::{seeded_rng, Genome, GenomeSpace};
use crate::errors::{ConfigurationError, LandscapeFileError, SimulationError};
use rand::Rng;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Genome length above which exhaustive peak search gets impractical.
pub const PEAK_SEARCH_WARN_BITS: u32 = 26;

/// Validated NK shape: genome length N and epistasis size K.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NkParams {
    space: GenomeSpace,
    k: u32,
}

impl NkParams {
    /// # Errors
    /// Fails unless `0 < n < 32` and `k < n`.
    pub fn new(n: u32, k: u32) -> Result<Self, ConfigurationError> {
        let space = GenomeSpace::new(n)?;
        if k >= n {
            return Err(ConfigurationError::EpistasisSize { n, k });
        }
        Ok(Self { space, k })
    }

    pub fn n(&self) -> u32 {
        self.space.bits()
    }

    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn space(&self) -> GenomeSpace {
        self.space
    }

    /// Rows of the fitness table, `2^(K+1)`.
    pub fn rows(&self) -> usize {
        1usize << (self.k + 1)
    }
}

/// An NK landscape with its (optionally located) peaks.
#[derive(Debug, Clone)]
pub struct Landscape {
    params: NkParams,
    seed: u64,
    epistasis: EpistasisTable,
    table: FitnessTable,
    peaks: Peaks,
}

impl Landscape {
    /// Generate a random landscape from `seed` (0 for an unseeded one).
    pub fn generate(params: NkParams, epistasis: Epistasis, seed: u64) -> Self {
        let mut rng = seeded_rng(seed);
        let mut landscape = Self::generate_with_rng(params, epistasis, &mut rng);
        landscape.seed = seed;
        landscape
    }

    /// Generate a random landscape, drawing the epistasis table (for the
    /// random topology) and then the fitness table from `rng`.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        params: NkParams,
        epistasis: Epistasis,
        rng: &mut R,
    ) -> Self {
        let table_of_loci = match epistasis {
            Epistasis::Adjacent => EpistasisTable::adjacent(params.n(), params.k()),
            Epistasis::Random => EpistasisTable::random(params.n(), params.k(), rng),
        };
        let table = FitnessTable::random(params.rows(), params.n() as usize, rng);
        Self {
            params,
            seed: 0,
            epistasis: table_of_loci,
            table,
            peaks: Peaks::new(),
        }
    }

    /// Assemble a landscape from explicit tables.
    ///
    /// # Errors
    /// Fails if the table shapes do not match N and K.
    pub fn from_parts(
        params: NkParams,
        epistasis: EpistasisTable,
        table: FitnessTable,
    ) -> Result<Self, ConfigurationError> {
        if epistasis.n() != params.n() || epistasis.width() != params.k() as usize + 1 {
            return Err(ConfigurationError::InvalidParameter(format!(
                "epistasis table is {}x{}, expected {}x{}",
                epistasis.n(),
                epistasis.width(),
                params.n(),
                params.k() + 1
            )));
        }
        if table.rows() != params.rows() || table.cols() != params.n() as usize {
            return Err(ConfigurationError::InvalidParameter(format!(
                "fitness table is {}x{}, expected {}x{}",
                table.rows(),
                table.cols(),
                params.rows(),
                params.n()
            )));
        }
        Ok(Self {
            params,
            seed: 0,
            epistasis,
            table,
            peaks: Peaks::new(),
        })
    }

    /// Read a landscape file, keeping any peaks it lists.
    ///
    /// # Errors
    /// Returns [`LandscapeFileError`] if the file is unreadable or does not
    /// describe an N, K landscape.
    pub fn load(params: NkParams, path: &Path) -> Result<Self, LandscapeFileError> {
        let text = fs::read_to_string(path).map_err(|source| LandscapeFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parts = io::parse(params, &text)?;
        Ok(Self {
            params,
            seed: 0,
            epistasis: parts.epistasis,
            table: parts.table,
            peaks: parts.peaks,
        })
    }

    /// Load the landscape from `source` when it exists and parses, otherwise
    /// generate one from `seed`.
    ///
    /// Peaks are located when `find_peaks` is set and none were loaded. A
    /// generated landscape is written to `source` if that path did not exist.
    /// A malformed file is logged and replaced by a random landscape.
    pub fn build(
        params: NkParams,
        epistasis: Epistasis,
        seed: u64,
        source: Option<&Path>,
        find_peaks: bool,
    ) -> Self {
        let existing = source.filter(|p| p.exists());
        if let Some(path) = existing {
            match Self::load(params, path) {
                Ok(mut landscape) => {
                    info!(path = %path.display(), "Loaded landscape");
                    if find_peaks && !landscape.has_peaks() {
                        landscape.locate_peaks();
                    }
                    return landscape;
                }
                Err(e) => warn!("{e}; generating a random landscape instead"),
            }
        }

        let mut landscape = Self::generate(params, epistasis, seed);
        debug!(n = params.n(), k = params.k(), %epistasis, seed, "Generated landscape");
        if find_peaks {
            landscape.locate_peaks();
        }
        if let Some(path) = source.filter(|_| existing.is_none()) {
            if let Err(e) = landscape.write(path) {
                warn!("{e}");
            }
        }
        landscape
    }

    /// A landscape whose fitness cells are correlated with `base` by `rho`.
    ///
    /// Shares the epistasis table of `base`. Each cell mixes the base cell
    /// (or its complement when `rho < 0`) with an independent uniform draw,
    /// weighted `|rho|` against `sqrt(1 - rho^2)`. Peaks are located.
    ///
    /// # Errors
    /// Fails unless `-1 <= rho <= 1`.
    pub fn correlated(base: &Landscape, rho: f64, seed: u64) -> Result<Self, ConfigurationError> {
        if !(-1.0..=1.0).contains(&rho) {
            return Err(ConfigurationError::Correlation(rho));
        }
        let mut rng = seeded_rng(seed);
        let a = rho.abs();
        let b = (1.0 - rho * rho).sqrt();
        let table = FitnessTable::derive(&base.table, |x| {
            let x = if rho < 0.0 { 1.0 - x } else { x };
            (a * x + b * rng.random::<f64>()) / (a + b)
        });
        let mut landscape = Self {
            params: base.params,
            seed,
            epistasis: base.epistasis.clone(),
            table,
            peaks: Peaks::new(),
        };
        landscape.locate_peaks();
        Ok(landscape)
    }

    /// Fitness of `genome`: the mean of its N per-locus contributions.
    #[inline]
    pub fn fitness(&self, genome: Genome) -> f64 {
        let n = self.params.n();
        let sum: f64 = (0..n)
            .map(|locus| {
                self.table
                    .get(self.epistasis.table_index(genome, locus), locus as usize)
            })
            .sum();
        sum / n as f64
    }

    /// Find every local maximum of the landscape, replacing any stored peaks.
    pub fn locate_peaks(&mut self) {
        let n = self.params.n();
        if n > PEAK_SEARCH_WARN_BITS {
            warn!(n, "Locating peaks over 2^{n} genomes; this needs a lot of time and memory");
        }
        let start = Instant::now();
        let peaks = Peaks::locate(self.params.space(), |g| self.fitness(g));
        info!(
            count = peaks.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Located fitness peaks"
        );
        self.peaks = peaks;
    }

    /// Write the landscape to `path`.
    pub fn write(&self, path: &Path) -> Result<(), SimulationError> {
        let file = File::create(path).map_err(|source| SimulationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        io::write(self, BufWriter::new(file)).map_err(|source| SimulationError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn params(&self) -> NkParams {
        self.params
    }

    pub fn n(&self) -> u32 {
        self.params.n()
    }

    pub fn k(&self) -> u32 {
        self.params.k()
    }

    pub fn space(&self) -> GenomeSpace {
        self.params.space()
    }

    /// Seed the landscape was generated from; 0 if unseeded or loaded.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn epistasis_table(&self) -> &EpistasisTable {
        &self.epistasis
    }

    pub fn fitness_table(&self) -> &FitnessTable {
        &self.table
    }

    pub fn peaks(&self) -> &Peaks {
        &self.peaks
    }

    pub fn has_peaks(&self) -> bool {
        !self.peaks.is_empty()
    }

    /// Highest peak fitness, if peaks are known.
    pub fn max_peak(&self) -> Option<f64> {
        self.peaks.max()
    }

    /// Lowest peak fitness, if peaks are known.
    pub fn min_peak(&self) -> Option<f64> {
        self.peaks.min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn params(n: u32, k: u32) -> NkParams {
        NkParams::new(n, k).unwrap()
    }

    #[test]
    fn test_params_validation() {
        assert!(NkParams::new(0, 0).is_err());
        assert!(NkParams::new(32, 1).is_err());
        assert_eq!(
            NkParams::new(4, 4),
            Err(ConfigurationError::EpistasisSize { n: 4, k: 4 })
        );
        assert_eq!(params(5, 2).rows(), 8);
    }

    #[test]
    fn test_fitness_in_unit_interval_and_deterministic() {
        let landscape = Landscape::generate(params(8, 3), Epistasis::Random, 17);
        for g in 0..256 {
            let f = landscape.fitness(g);
            assert!((0.0..1.0).contains(&f));
            assert_eq!(f, landscape.fitness(g));
        }
    }

    #[test]
    fn test_same_seed_same_landscape() {
        let a = Landscape::generate(params(6, 2), Epistasis::Random, 5);
        let b = Landscape::generate(params(6, 2), Epistasis::Random, 5);
        assert_eq!(a.epistasis_table(), b.epistasis_table());
        assert_eq!(a.fitness_table(), b.fitness_table());
        let c = Landscape::generate(params(6, 2), Epistasis::Random, 6);
        assert_ne!(a.fitness_table(), c.fitness_table());
    }

    #[test]
    fn test_k_zero_fitness_is_column_mean() {
        let table = FitnessTable::from_rows(vec![
            vec![0.1, 0.2, 0.3, 0.4],
            vec![0.5, 0.6, 0.7, 0.8],
        ])
        .unwrap();
        let landscape =
            Landscape::from_parts(params(4, 0), EpistasisTable::adjacent(4, 0), table).unwrap();
        assert!((landscape.fitness(0) - 0.25).abs() < 1e-12);
        assert!((landscape.fitness(15) - 0.65).abs() < 1e-12);
        // locus 0 and 2 high
        assert!((landscape.fitness(0b0101) - (0.5 + 0.2 + 0.7 + 0.4) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_parts_rejects_shape_mismatch() {
        let table = FitnessTable::from_rows(vec![vec![0.1; 3]; 2]).unwrap();
        assert!(Landscape::from_parts(params(4, 0), EpistasisTable::adjacent(4, 0), table).is_err());
    }

    #[test]
    fn test_locate_peaks_sets_extremes() {
        let mut landscape = Landscape::generate(params(8, 4), Epistasis::Adjacent, 3);
        assert!(!landscape.has_peaks());
        assert_eq!(landscape.max_peak(), None);
        landscape.locate_peaks();
        assert!(landscape.has_peaks());
        let max = landscape.max_peak().unwrap();
        let min = landscape.min_peak().unwrap();
        assert!(min <= max);
        let global = (0..256).map(|g| landscape.fitness(g)).fold(0.0, f64::max);
        assert_eq!(max, global);
    }

    #[test]
    fn test_write_then_load_reproduces_landscape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("land.txt");
        let mut original = Landscape::generate(params(7, 3), Epistasis::Random, 99);
        original.locate_peaks();
        original.write(&path).unwrap();

        let loaded = Landscape::load(params(7, 3), &path).unwrap();
        assert_eq!(loaded.epistasis_table(), original.epistasis_table());
        assert_eq!(loaded.fitness_table(), original.fitness_table());
        assert_eq!(loaded.peaks(), original.peaks());
        for g in 0..128 {
            assert_eq!(loaded.fitness(g), original.fitness(g));
        }
    }

    #[test]
    fn test_build_writes_missing_file_then_reloads_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("land.txt");
        let first = Landscape::build(params(6, 2), Epistasis::Adjacent, 21, Some(&path), true);
        assert!(path.exists());
        // different seed, but the file wins
        let second = Landscape::build(params(6, 2), Epistasis::Adjacent, 22, Some(&path), true);
        assert_eq!(first.fitness_table(), second.fitness_table());
        assert_eq!(first.peaks(), second.peaks());
    }

    #[test]
    fn test_build_falls_back_on_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        fs::write(&path, "not a landscape\n").unwrap();
        let landscape = Landscape::build(params(5, 1), Epistasis::Adjacent, 4, Some(&path), false);
        let expected = Landscape::generate(params(5, 1), Epistasis::Adjacent, 4);
        assert_eq!(landscape.fitness_table(), expected.fitness_table());
        // the malformed file is left alone
        assert_eq!(fs::read_to_string(&path).unwrap(), "not a landscape\n");
    }

    #[test]
    fn test_build_locates_peaks_for_peakless_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("land.txt");
        Landscape::generate(params(5, 2), Epistasis::Adjacent, 8)
            .write(&path)
            .unwrap();
        let landscape = Landscape::build(params(5, 2), Epistasis::Adjacent, 8, Some(&path), true);
        assert!(landscape.has_peaks());
    }

    #[test]
    fn test_correlated_extremes() {
        let base = Landscape::generate(params(6, 2), Epistasis::Adjacent, 12);
        let same = Landscape::correlated(&base, 1.0, 5).unwrap();
        assert_eq!(same.fitness_table(), base.fitness_table());
        assert!(same.has_peaks());

        let mirror = Landscape::correlated(&base, -1.0, 5).unwrap();
        for g in 0..64 {
            assert!((mirror.fitness(g) - (1.0 - base.fitness(g))).abs() < 1e-12);
        }
        assert_eq!(mirror.epistasis_table(), base.epistasis_table());
    }

    #[test]
    fn test_correlated_rejects_bad_rho() {
        let base = Landscape::generate(params(4, 1), Epistasis::Adjacent, 1);
        assert_eq!(
            Landscape::correlated(&base, 1.5, 2).unwrap_err(),
            ConfigurationError::Correlation(1.5)
        );
    }

    #[test]
    fn test_correlated_cells_stay_in_range() {
        let base = Landscape::generate(params(6, 3), Epistasis::Random, 30);
        let shock = Landscape::correlated(&base, 0.4, 31).unwrap();
        let table = shock.fitness_table();
        for row in 0..table.rows() {
            for &v in table.row(row) {
                assert!((0.0..1.0).contains(&v));
            }
        }
    }
}

//! Initial population setup and population files.
//!
//! A population file lists one genotype per line, either bare
//! (`<genome> <count>`) or annotated as written by this crate
//! (`<generation> <genome> <count> <fitness> <shock_fitness>`). Lines that
//! are blank or start with `#` are skipped. Fitness columns are ignored on
//! read and recomputed from the landscapes.

use crate::base::{Genome, GenomeSpace};
use crate::errors::{PopulationFileError, SimulationError};
use crate::simulation::{InitializationConfig, PopulationCounter};
use rand::Rng;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Parse population file text into `(genome, count)` entries.
///
/// # Errors
/// [`PopulationFileError::Parse`] for malformed lines, and the fatal
/// [`PopulationFileError::GenomeOutOfRange`] for genomes that do not fit
/// `space`.
pub fn parse_population(
    text: &str,
    space: GenomeSpace,
) -> Result<Vec<(Genome, u64)>, PopulationFileError> {
    let mut entries = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let (genome, count) = match fields.len() {
            0 | 1 => {
                return Err(PopulationFileError::Parse {
                    line,
                    message: format!("expected at least 2 values, found {}", fields.len()),
                })
            }
            2 => (fields[0], fields[1]),
            _ => (fields[1], fields[2]),
        };
        let genome: u64 = genome.parse().map_err(|e| PopulationFileError::Parse {
            line,
            message: format!("genome '{genome}': {e}"),
        })?;
        if !space.contains(genome) {
            return Err(PopulationFileError::GenomeOutOfRange {
                line,
                genome,
                n: space.bits(),
            });
        }
        let count: u64 = count.parse().map_err(|e| PopulationFileError::Parse {
            line,
            message: format!("count '{count}': {e}"),
        })?;
        entries.push((genome as Genome, count));
    }
    Ok(entries)
}

/// Read a population file.
pub fn read_population(
    path: &Path,
    space: GenomeSpace,
) -> Result<Vec<(Genome, u64)>, PopulationFileError> {
    let text = fs::read_to_string(path).map_err(|source| PopulationFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_population(&text, space)
}

/// Write the population in the annotated format.
pub fn write_population_to<W: Write>(population: &PopulationCounter, mut out: W) -> io::Result<()> {
    let landscape = population.landscape();
    writeln!(out, "# NK population")?;
    writeln!(
        out,
        "# N = {}, K = {}, seed = {}, shockseed = {}",
        landscape.n(),
        landscape.k(),
        landscape.seed(),
        population.shock_landscape().seed()
    )?;
    writeln!(out, "# gen genome count fitness shockfitness")?;
    let generation = population.generation();
    for r in population.records() {
        writeln!(
            out,
            "{} {} {} {:.6} {:.6}",
            generation, r.genome, r.count, r.fitness, r.shock_fitness
        )?;
    }
    out.flush()
}

/// Write the population to `path`.
pub fn write_population(population: &PopulationCounter, path: &Path) -> Result<(), SimulationError> {
    let io_error = |source| SimulationError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    write_population_to(population, BufWriter::new(file)).map_err(io_error)
}

/// Fill an empty population according to `init`.
///
/// A population file that exists but cannot be read falls back to random
/// genomes with a warning; a missing one is created from the random
/// population.
///
/// # Errors
/// Only a fatal [`PopulationFileError`], i.e. a genome outside the genome
/// space.
pub fn initialize_population<R: Rng + ?Sized>(
    population: &mut PopulationCounter,
    init: &InitializationConfig,
    rng: &mut R,
) -> Result<(), PopulationFileError> {
    match init {
        InitializationConfig::Random { size } => population.populate_random(*size, rng),
        InitializationConfig::Genomes { entries } => population.populate(entries.iter().copied()),
        InitializationConfig::File { path, size } => {
            let existed = path.exists();
            if existed {
                match read_population(path, population.space()) {
                    Ok(entries) => {
                        info!(path = %path.display(), genotypes = entries.len(), "Loaded population");
                        population.populate(entries);
                        return Ok(());
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => warn!("{e}; drawing a random population instead"),
                }
            }
            population.populate_random(*size, rng);
            if !existed {
                if let Err(e) = write_population(population, path) {
                    warn!("{e}");
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landscape::{Epistasis, Landscape, NkParams};
    use crate::simulation::EvolutionConfig;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn space(n: u32) -> GenomeSpace {
        GenomeSpace::new(n).unwrap()
    }

    fn empty_population(n: u32) -> PopulationCounter {
        let params = NkParams::new(n, 1).unwrap();
        let landscape = Arc::new(Landscape::generate(params, Epistasis::Adjacent, 6));
        PopulationCounter::new(&EvolutionConfig::default(), landscape.clone(), landscape)
    }

    #[test]
    fn test_parse_bare_and_annotated_lines() {
        let text = "# header\n\n3 10\n0 5 7 0.25 0.5\n";
        let entries = parse_population(text, space(4)).unwrap();
        assert_eq!(entries, vec![(3, 10), (5, 7)]);
    }

    #[test]
    fn test_parse_short_line_is_recoverable() {
        let err = parse_population("12\n", space(4)).unwrap_err();
        assert!(matches!(err, PopulationFileError::Parse { line: 1, .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_parse_bad_count_is_recoverable() {
        let err = parse_population("1 2\n3 x\n", space(4)).unwrap_err();
        assert!(matches!(err, PopulationFileError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_out_of_range_genome_is_fatal() {
        let err = parse_population("16 1\n", space(4)).unwrap_err();
        assert!(matches!(
            err,
            PopulationFileError::GenomeOutOfRange {
                line: 1,
                genome: 16,
                n: 4
            }
        ));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pop.txt");
        let mut pop = empty_population(6);
        pop.populate([(1, 4), (40, 2), (63, 9)]);
        write_population(&pop, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# NK population\n"));
        assert!(text.contains("0 40 2 "));
        assert_eq!(
            read_population(&path, space(6)).unwrap(),
            vec![(1, 4), (40, 2), (63, 9)]
        );
    }

    #[test]
    fn test_missing_file_is_created_from_random_population() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pop.txt");
        let init = InitializationConfig::File {
            path: path.clone(),
            size: 30,
        };
        let mut pop = empty_population(5);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        initialize_population(&mut pop, &init, &mut rng).unwrap();
        assert_eq!(pop.population_size(), 30);
        assert!(path.exists());

        // reading the file back reproduces the same population
        let mut again = empty_population(5);
        initialize_population(&mut again, &init, &mut rng).unwrap();
        assert_eq!(
            again.records().collect::<Vec<_>>(),
            pop.records().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_malformed_file_falls_back_to_random() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pop.txt");
        fs::write(&path, "garbage\n").unwrap();
        let init = InitializationConfig::File {
            path: path.clone(),
            size: 12,
        };
        let mut pop = empty_population(5);
        initialize_population(&mut pop, &init, &mut Xoshiro256PlusPlus::seed_from_u64(1)).unwrap();
        assert_eq!(pop.population_size(), 12);
        assert_eq!(fs::read_to_string(&path).unwrap(), "garbage\n");
    }

    #[test]
    fn test_duplicate_lines_accumulate_past_u32() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pop.txt");
        fs::write(&path, "3 4294967295\n3 1\n").unwrap();
        let init = InitializationConfig::File { path, size: 12 };
        let mut pop = empty_population(5);
        initialize_population(&mut pop, &init, &mut Xoshiro256PlusPlus::seed_from_u64(1)).unwrap();
        assert_eq!(pop.count(3), 4_294_967_296);
        assert_eq!(pop.population_size(), 4_294_967_296);
        assert_eq!(pop.unique_genomes(), 1);
    }

    #[test]
    fn test_out_of_range_file_aborts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pop.txt");
        fs::write(&path, "100 1\n").unwrap();
        let init = InitializationConfig::File { path, size: 12 };
        let mut pop = empty_population(5);
        let result = initialize_population(&mut pop, &init, &mut Xoshiro256PlusPlus::seed_from_u64(1));
        assert!(matches!(result, Err(PopulationFileError::GenomeOutOfRange { .. })));
    }
}

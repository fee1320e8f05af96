use anyhow::{Context, Result};
use clap::Args;
use nkevo_sim::base::ReplicationWindow;
use nkevo_sim::evolution::{CutoffSchedule, MutationStrategy, ShockSchedule};
use nkevo_sim::landscape::Epistasis;
use nkevo_sim::simulation::configs::{DEFAULT_MUTATION_RATE, DEFAULT_POPULATION};
use nkevo_sim::simulation::{Configuration, InitializationConfig};
use nkevo_sim::storage::TraceFormat;
use std::path::PathBuf;

use crate::defaults;

/// Options of `nkevo run`. Every model option is optional: unset options keep
/// the value from `--config`, or the built-in default without one.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON configuration file to start from
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Genome length N in bits (1-31) [default: 10]
    #[arg(short = 'n', long)]
    pub genome_length: Option<u32>,

    /// Epistatic interactions K per locus (0 to N-1) [default: 5]
    #[arg(short = 'k', long)]
    pub epistasis_size: Option<u32>,

    /// Epistasis topology (adjacent, random) [default: adjacent]
    #[arg(long)]
    pub epistasis: Option<Epistasis>,

    /// Landscape file, read if it exists and written otherwise
    #[arg(short, long)]
    pub landscape: Option<PathBuf>,

    /// Shock landscape file, read if it exists and written otherwise
    #[arg(long)]
    pub shock_landscape: Option<PathBuf>,

    /// Seed of the shock landscape [default: 79]
    #[arg(long)]
    pub shock_seed: Option<u64>,

    /// Correlation of the shock landscape with the landscape (-1 to 1)
    #[arg(long, allow_hyphen_values = true)]
    pub rho: Option<f64>,

    /// Initial population size [default: 10]
    #[arg(short, long)]
    pub population: Option<u64>,

    /// Initial population file, read if it exists and written otherwise
    #[arg(long)]
    pub population_file: Option<PathBuf>,

    /// Number of generations [default: 10]
    #[arg(short, long)]
    pub generations: Option<u32>,

    /// Random seed; 0 draws a fresh one [default: 32767]
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Mutation strategy (replicate, single-random, multi-random) [default: single-random]
    #[arg(short, long)]
    pub mutation: Option<String>,

    /// Per-bit mutation rate of multi-random (0 to 1, exclusive) [default: 0.1]
    #[arg(short = 'r', long)]
    pub mutation_rate: Option<f64>,

    /// Fitness at or below which genomes never replicate
    #[arg(long)]
    pub min_fit: Option<f64>,

    /// Fitness at or above which genomes always replicate
    #[arg(long)]
    pub max_fit: Option<f64>,

    /// Cutoff schedule: initial cutoff, then generation,cutoff pairs [default: 0.5]
    #[arg(long, value_delimiter = ',', num_args = 1.., allow_hyphen_values = true)]
    pub cutoffs: Option<Vec<f64>>,

    /// Shock schedule: generation,threshold pairs
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub shocks: Option<Vec<f64>>,

    /// Population ceiling for density-dependent replication; 0 for none
    #[arg(long)]
    pub max_population: Option<u64>,

    /// Growth factor under a population ceiling [default: 1.0]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Output file; all artifacts are written beside it [default: out.txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Per-genotype trace format (none, csv, tsv) [default: none]
    #[arg(short, long)]
    pub trace: Option<TraceFormat>,

    /// Write the population after every generation
    #[arg(long)]
    pub trace_population: bool,

    /// Print statistics every this many generations; 0 disables [default: 10]
    #[arg(long)]
    pub progress: Option<u32>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress_bar: bool,
}

impl RunArgs {
    /// Assemble the run configuration: `--config` (or the defaults), then
    /// every option given on the command line.
    pub fn configuration(&self) -> Result<Configuration> {
        let mut config = match &self.config {
            Some(path) => Configuration::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => Configuration::default(),
        };

        let execution = &mut config.execution;
        if let Some(generations) = self.generations {
            execution.max_generations = generations;
        }
        if let Some(seed) = self.seed {
            execution.seed = (seed != 0).then_some(seed);
        }
        if let Some(progress) = self.progress {
            execution.progress = progress;
        }
        if let Some(output) = &self.output {
            execution.output = output.clone();
        }
        if let Some(trace) = self.trace {
            execution.trace = trace;
        }
        execution.trace_population |= self.trace_population;

        let landscape = &mut config.landscape;
        if let Some(n) = self.genome_length {
            landscape.n = n;
        }
        if let Some(k) = self.epistasis_size {
            landscape.k = k;
        }
        if let Some(epistasis) = self.epistasis {
            landscape.epistasis = epistasis;
        }
        if let Some(file) = &self.landscape {
            landscape.file = Some(file.clone());
        }
        if let Some(file) = &self.shock_landscape {
            landscape.shock_file = Some(file.clone());
        }
        if let Some(seed) = self.shock_seed {
            landscape.shock_seed = seed;
        }
        if let Some(rho) = self.rho {
            landscape.rho = Some(rho);
        }

        let evolution = &mut config.evolution;
        match (&self.mutation, self.mutation_rate) {
            (Some(name), rate) => {
                evolution.mutation =
                    MutationStrategy::from_name(name, rate.unwrap_or(DEFAULT_MUTATION_RATE))?;
            }
            (None, Some(rate)) => {
                evolution.mutation = MutationStrategy::MultiRandom { rate };
            }
            (None, None) => {}
        }
        if self.min_fit.is_some() || self.max_fit.is_some() {
            let current = evolution.replication;
            evolution.replication = ReplicationWindow::new(
                self.min_fit.unwrap_or(current.min_fit),
                self.max_fit.unwrap_or(current.max_fit),
            )?;
        }
        if let Some(cutoffs) = &self.cutoffs {
            evolution.cutoffs = CutoffSchedule::from_list(cutoffs)?;
        }
        if let Some(shocks) = &self.shocks {
            evolution.shocks = ShockSchedule::from_list(shocks)?;
        }
        if let Some(max_population) = self.max_population {
            evolution.max_population = max_population;
        }
        if let Some(alpha) = self.alpha {
            evolution.alpha = alpha;
        }

        let current_size = match &config.initialization {
            InitializationConfig::Random { size } | InitializationConfig::File { size, .. } => *size,
            InitializationConfig::Genomes { .. } => DEFAULT_POPULATION,
        };
        if let Some(path) = &self.population_file {
            config.initialization = InitializationConfig::File {
                path: path.clone(),
                size: self.population.unwrap_or(current_size),
            };
        } else if let Some(size) = self.population {
            config.initialization = InitializationConfig::Random { size };
        }

        Ok(config)
    }

    pub fn show_progress_bar(&self) -> bool {
        !self.no_progress_bar
    }
}

#[derive(Args, Debug)]
pub struct LandscapeArgs {
    /// Genome length N in bits (1-31)
    #[arg(short = 'n', long, default_value_t = defaults::GENOME_LENGTH)]
    pub genome_length: u32,

    /// Epistatic interactions K per locus (0 to N-1)
    #[arg(short = 'k', long, default_value_t = defaults::EPISTASIS_SIZE)]
    pub epistasis_size: u32,

    /// Epistasis topology (adjacent, random)
    #[arg(long, default_value_t = Epistasis::Adjacent)]
    pub epistasis: Epistasis,

    /// Random seed; 0 draws a fresh one
    #[arg(short, long, default_value_t = defaults::SEED)]
    pub seed: u64,

    /// Output landscape file
    #[arg(short, long, default_value = defaults::LANDSCAPE_OUTPUT)]
    pub output: PathBuf,

    /// Derive the landscape from this landscape file instead, correlated by --rho
    #[arg(long, requires = "rho")]
    pub base: Option<PathBuf>,

    /// Correlation with the --base landscape (-1 to 1)
    #[arg(long, requires = "base", allow_hyphen_values = true)]
    pub rho: Option<f64>,

    /// Skip the peak search
    #[arg(long)]
    pub no_peaks: bool,
}

#[derive(Args, Debug)]
pub struct PeaksArgs {
    /// Genome length N the landscape file was written for
    #[arg(short = 'n', long, default_value_t = defaults::GENOME_LENGTH)]
    pub genome_length: u32,

    /// Epistasis size K the landscape file was written for
    #[arg(short = 'k', long, default_value_t = defaults::EPISTASIS_SIZE)]
    pub epistasis_size: u32,

    /// Landscape file
    #[arg(short, long)]
    pub landscape: PathBuf,

    /// Search for peaks even if the file lists them
    #[arg(long)]
    pub recompute: bool,

    /// Number of peaks to list, fittest first; 0 lists all
    #[arg(long, default_value_t = defaults::PEAK_LIMIT)]
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    fn parse(args: &[&str]) -> RunArgs {
        TestCli::parse_from(std::iter::once("nkevo").chain(args.iter().copied())).run
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        let config = parse(&[]).configuration().unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = parse(&[
            "-n", "12", "-k", "3", "-g", "50", "-p", "200", "--cutoffs", "0.4,10,0.6",
            "--shocks", "20,0.3", "-m", "multi-random", "-r", "0.05", "--trace", "tsv",
        ])
        .configuration()
        .unwrap();
        assert_eq!(config.landscape.n, 12);
        assert_eq!(config.landscape.k, 3);
        assert_eq!(config.execution.max_generations, 50);
        assert_eq!(config.execution.trace, TraceFormat::Tsv);
        assert_eq!(config.initialization, InitializationConfig::Random { size: 200 });
        assert_eq!(config.evolution.cutoffs.cutoff_at(11), 0.6);
        assert_eq!(config.evolution.shocks.shock_at(20), Some(0.3));
        assert_eq!(
            config.evolution.mutation,
            MutationStrategy::MultiRandom { rate: 0.05 }
        );
    }

    #[test]
    fn test_seed_zero_means_fresh_seed() {
        let config = parse(&["--seed", "0"]).configuration().unwrap();
        assert_eq!(config.execution.seed, None);
    }

    #[test]
    fn test_population_file_keeps_fallback_size() {
        let config = parse(&["--population-file", "pop.txt", "-p", "30"])
            .configuration()
            .unwrap();
        assert_eq!(
            config.initialization,
            InitializationConfig::File {
                path: PathBuf::from("pop.txt"),
                size: 30
            }
        );
    }

    #[test]
    fn test_malformed_schedule_is_an_error() {
        assert!(parse(&["--cutoffs", "0.4,10"]).configuration().is_err());
        assert!(parse(&["-m", "sideways"]).configuration().is_err());
    }
}

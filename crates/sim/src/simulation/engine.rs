//! Simulation driver.
//!
//! [`Simulation`] builds the replication and shock landscapes and the initial
//! population from a [`Configuration`], then advances the population one
//! generation at a time, applying scheduled shocks and writing the run's
//! artifacts next to the configured output path.

use crate::base::{fresh_seed, run_rng, SimRng};
use crate::errors::SimulationError;
use crate::landscape::Landscape;
use crate::simulation::{
    initialize_population, write_population, Configuration, LandscapeConfig, PopulationCounter,
    PopulationStats,
};
use crate::storage::{OutputPaths, StatsWriter, TraceWriter};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a single [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The population replicated and survived selection.
    Advanced,
    /// A scheduled shock was applied and some genotypes survived it.
    Shocked { threshold: f64 },
    /// No individual survived replication and selection.
    Extinct,
    /// The population died out in a shock.
    ExtinctAfterShock { threshold: f64 },
}

impl StepOutcome {
    pub fn is_extinct(&self) -> bool {
        matches!(self, Self::Extinct | Self::ExtinctAfterShock { .. })
    }
}

/// Final state of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    /// Generation the run ended at
    pub generation: u32,
    pub extinct: bool,
    /// Number of shocks applied
    pub shocks: usize,
    pub stats: PopulationStats,
}

/// Main simulation engine.
#[derive(Debug)]
pub struct Simulation {
    /// Effective configuration, with the seed resolved
    config: Configuration,
    paths: OutputPaths,
    population: PopulationCounter,
    /// Generator for population dynamics
    rng: SimRng,
    trace: Option<TraceWriter>,
    shocks: usize,
}

impl Simulation {
    /// Build a simulation from `config`.
    ///
    /// A missing seed is replaced by a fresh one, which is recorded in the
    /// effective configuration written to `conf-<output>`.
    ///
    /// # Errors
    /// An invalid configuration, an initial population file with genomes
    /// outside the genome space, or an output directory that cannot be
    /// created.
    pub fn new(mut config: Configuration) -> Result<Self, SimulationError> {
        config.validate()?;
        let seed = *config.execution.seed.get_or_insert_with(fresh_seed);
        let params = config.landscape.params()?;

        let landscape = Arc::new(Landscape::build(
            params,
            config.landscape.epistasis,
            seed,
            config.landscape.file.as_deref(),
            true,
        ));
        let shock_landscape = if config.evolution.shocks.is_empty() {
            warn!("No shock schedule; using the replication landscape as shock landscape");
            Arc::clone(&landscape)
        } else {
            Arc::new(build_shock_landscape(&landscape, &config.landscape)?)
        };

        let mut rng = run_rng(seed);
        let mut population = PopulationCounter::new(&config.evolution, landscape, shock_landscape);
        initialize_population(&mut population, &config.initialization, &mut rng)?;
        info!(
            seed,
            size = population.population_size(),
            genotypes = population.unique_genomes(),
            "Initialized population"
        );

        let paths = OutputPaths::new(config.execution.output.clone());
        paths.create_dir().map_err(|source| SimulationError::Io {
            path: paths.output().to_path_buf(),
            source,
        })?;
        if let Err(e) = config.save(&paths.config()) {
            warn!("{e}");
        }
        let trace = open_trace(&paths, &config, &population);

        Ok(Self {
            config,
            paths,
            population,
            rng,
            trace,
            shocks: 0,
        })
    }

    /// Advance one generation and apply the shock scheduled for it, if any.
    /// Shocks with a threshold of 0 or less are skipped.
    ///
    /// Trace records are written after advancing (with the generation's
    /// cutoff) and again after a shock (with its threshold).
    pub fn step(&mut self) -> StepOutcome {
        if !self.population.advance(&mut self.rng) {
            return StepOutcome::Extinct;
        }
        self.write_trace(self.population.cutoff(), 0.0);

        let generation = self.population.generation();
        let Some(threshold) = self.config.evolution.shocks.shock_at(generation) else {
            return StepOutcome::Advanced;
        };
        if threshold <= 0.0 {
            return StepOutcome::Advanced;
        }
        self.shocks += 1;
        if !self.population.shock(threshold) {
            return StepOutcome::ExtinctAfterShock { threshold };
        }
        self.write_trace(0.0, threshold);
        StepOutcome::Shocked { threshold }
    }

    /// Run to completion, see [`Simulation::run_with`].
    pub fn run(&mut self) -> RunSummary {
        self.run_with(|_| {})
    }

    /// Run until the generation exceeds the configured maximum or the
    /// population dies out.
    ///
    /// Writes the landscapes (`land-`, `sland-`), the statistics report
    /// (`stats-`) starting with generation 0, intermediate populations when
    /// enabled and the final population (`pop-`). `observe` is called with
    /// the initial population and after every surviving generation. Output
    /// failures are logged and the affected artifact is dropped.
    pub fn run_with<F>(&mut self, mut observe: F) -> RunSummary
    where
        F: FnMut(&PopulationCounter),
    {
        self.write_landscapes();

        let mut stats = match StatsWriter::create(&self.paths.stats()) {
            Ok(writer) => Some(writer),
            Err(e) => {
                warn!("{e}");
                None
            }
        };
        self.write_stats_row(&mut stats);
        observe(&self.population);

        let max_generations = self.config.execution.max_generations;
        let mut extinct = self.population.is_extinct();
        if extinct {
            warn!("Initial population is empty");
        }
        while !extinct && self.population.generation() <= max_generations {
            match self.step() {
                StepOutcome::Extinct => {
                    info!(
                        generation = self.population.generation(),
                        "No individuals left in population"
                    );
                    extinct = true;
                }
                StepOutcome::ExtinctAfterShock { threshold } => {
                    info!(
                        generation = self.population.generation(),
                        threshold, "No individuals left in population after shock"
                    );
                    extinct = true;
                }
                StepOutcome::Advanced | StepOutcome::Shocked { .. } => {
                    self.write_stats_row(&mut stats);
                    if self.config.execution.trace_population {
                        let path = self.paths.population_at(self.population.generation());
                        if let Err(e) = write_population(&self.population, &path) {
                            warn!("{e}");
                        }
                    }
                    debug!(
                        generation = self.population.generation(),
                        size = self.population.population_size(),
                        average_fitness = self.population.average_fitness(),
                        "Generation complete"
                    );
                    observe(&self.population);
                }
            }
        }

        if let Err(e) = write_population(&self.population, &self.paths.population()) {
            warn!("{e}");
        }
        if let Some(writer) = stats {
            if let Err(e) = writer.finish() {
                warn!(path = %self.paths.stats().display(), "Failed to flush statistics: {e}");
            }
        }
        if let Some(writer) = self.trace.take() {
            if let Err(e) = writer.finish() {
                warn!("Failed to flush trace: {e}");
            }
        }

        RunSummary {
            seed: self.seed(),
            generation: self.population.generation(),
            extinct,
            shocks: self.shocks,
            stats: *self.population.statistics(),
        }
    }

    fn write_landscapes(&self) {
        let outputs = [
            (self.landscape(), self.paths.landscape()),
            (self.shock_landscape(), self.paths.shock_landscape()),
        ];
        for (landscape, path) in outputs {
            if let Err(e) = landscape.write(&path) {
                warn!("{e}");
            }
        }
    }

    fn write_stats_row(&self, stats: &mut Option<StatsWriter>) {
        let Some(writer) = stats else {
            return;
        };
        let generation = self.population.generation();
        if let Err(e) = writer.write_row(
            generation,
            self.population.statistics(),
            self.population.cutoff(),
        ) {
            warn!(path = %self.paths.stats().display(), "Failed to write statistics: {e}");
            *stats = None;
        }
    }

    fn write_trace(&mut self, cutoff: f64, shock: f64) {
        let generation = self.population.generation();
        let failed = match &mut self.trace {
            Some(writer) => writer
                .write_records(generation, cutoff, shock, self.population.records())
                .err(),
            None => None,
        };
        if let Some(e) = failed {
            warn!("Failed to write trace: {e}");
            self.trace = None;
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Seed of the run and the replication landscape.
    pub fn seed(&self) -> u64 {
        self.config.execution.seed.unwrap_or_default()
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    pub fn population(&self) -> &PopulationCounter {
        &self.population
    }

    pub fn landscape(&self) -> &Arc<Landscape> {
        self.population.landscape()
    }

    pub fn shock_landscape(&self) -> &Arc<Landscape> {
        self.population.shock_landscape()
    }

    pub fn generation(&self) -> u32 {
        self.population.generation()
    }

    /// Number of shocks applied so far.
    pub fn shocks(&self) -> usize {
        self.shocks
    }
}

/// Shock landscape for a run with a shock schedule: correlated with `base`
/// when a correlation is configured, otherwise independent from the shock
/// seed. Either is read from the shock landscape file when it exists.
fn build_shock_landscape(
    base: &Landscape,
    config: &LandscapeConfig,
) -> Result<Landscape, SimulationError> {
    let params = base.params();
    let source = config.shock_file.as_deref();
    let Some(rho) = config.rho else {
        return Ok(Landscape::build(
            params,
            config.epistasis,
            config.shock_seed,
            source,
            true,
        ));
    };

    if let Some(path) = source.filter(|p| p.exists()) {
        match Landscape::load(params, path) {
            Ok(mut landscape) => {
                info!(path = %path.display(), "Loaded shock landscape");
                if !landscape.has_peaks() {
                    landscape.locate_peaks();
                }
                return Ok(landscape);
            }
            Err(e) => warn!("{e}; generating a correlated landscape instead"),
        }
    }
    let landscape = Landscape::correlated(base, rho, config.shock_seed)?;
    debug!(rho, seed = config.shock_seed, "Generated correlated shock landscape");
    if let Some(path) = source.filter(|p| !p.exists()) {
        if let Err(e) = landscape.write(path) {
            warn!("{e}");
        }
    }
    Ok(landscape)
}

/// Open the trace file, if one is configured, and record generation 0.
fn open_trace(
    paths: &OutputPaths,
    config: &Configuration,
    population: &PopulationCounter,
) -> Option<TraceWriter> {
    let format = config.execution.trace;
    let path = paths.trace(format)?;
    let mut writer = match TraceWriter::create(&path, format) {
        Ok(writer) => writer?,
        Err(e) => {
            warn!("{e}");
            return None;
        }
    };
    match writer.write_records(0, population.cutoff(), 0.0, population.records()) {
        Ok(()) => Some(writer),
        Err(e) => {
            warn!(path = %path.display(), "Failed to write trace: {e}");
            None
        }
    }
}

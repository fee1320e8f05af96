//! Population management and operations.
//!
//! The population is a multiset of genomes stored as counts: a presence set
//! over the whole genome space, a dense count per genotype, and lazily filled
//! fitness caches for the replication and shock landscapes. Individuals of
//! the same genotype are indistinguishable, so a generation costs time in
//! proportion to the number of individuals, not to the size of the space.

use crate::base::{FitnessCache, Genome, GenomeSet, GenomeSpace};
use crate::landscape::Landscape;
use crate::simulation::{EvolutionConfig, PopulationStats};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One active genotype and its cached fitness values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenotypeRecord {
    pub genome: Genome,
    pub count: u64,
    pub fitness: f64,
    pub shock_fitness: f64,
}

/// A haploid population tracked by per-genotype counts.
#[derive(Debug, Clone)]
pub struct PopulationCounter {
    space: GenomeSpace,
    generation: u32,
    landscape: Arc<Landscape>,
    shock_landscape: Arc<Landscape>,
    evolution: EvolutionConfig,
    /// Active genotypes; a genome is present iff its count is non-zero
    genomes: GenomeSet,
    /// Newly born genotypes, or genotypes to remove, during a step
    working: GenomeSet,
    count: Vec<u64>,
    offspring: Vec<u64>,
    /// Genomes with a non-zero offspring count this generation
    touched: Vec<Genome>,
    fitness: FitnessCache,
    shock_fitness: FitnessCache,
    stats: PopulationStats,
    /// Last cutoff reported as unreachable, to avoid repeating the warning
    warned_cutoff: Option<f64>,
}

impl PopulationCounter {
    /// Create an empty population at generation 0.
    ///
    /// Both landscapes must share the same genome length.
    pub fn new(
        evolution: &EvolutionConfig,
        landscape: Arc<Landscape>,
        shock_landscape: Arc<Landscape>,
    ) -> Self {
        let space = landscape.space();
        debug_assert_eq!(space, shock_landscape.space());
        let size = space.size();
        Self {
            space,
            generation: 0,
            landscape,
            shock_landscape,
            evolution: evolution.clone(),
            genomes: GenomeSet::with_capacity(size),
            working: GenomeSet::with_capacity(size),
            count: vec![0; size],
            offspring: vec![0; size],
            touched: Vec::new(),
            fitness: FitnessCache::new(size),
            shock_fitness: FitnessCache::new(size),
            stats: PopulationStats::extinct(),
            warned_cutoff: None,
        }
    }

    /// Add `size` genomes drawn uniformly from the genome space.
    pub fn populate_random<R: Rng + ?Sized>(&mut self, size: u64, rng: &mut R) {
        for _ in 0..size {
            let genome = self.space.random(rng);
            self.add(genome, 1);
        }
        self.compute_statistics();
    }

    /// Add explicit `(genome, count)` entries. Counts of the same genome
    /// accumulate, saturating at `u64::MAX`, and zero counts are ignored.
    ///
    /// # Panics
    /// Panics if a genome lies outside the genome space.
    pub fn populate<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (Genome, u64)>,
    {
        for (genome, count) in entries {
            self.add(genome, count);
        }
        self.compute_statistics();
    }

    fn add(&mut self, genome: Genome, count: u64) {
        if count == 0 {
            return;
        }
        self.genomes.insert(genome);
        let slot = &mut self.count[genome as usize];
        *slot = slot.saturating_add(count);
        self.cache_fitness(genome);
    }

    /// Fill both fitness caches for `genome` and return its replication
    /// fitness.
    #[inline]
    fn cache_fitness(&mut self, genome: Genome) -> f64 {
        let landscape = &self.landscape;
        let shock = &self.shock_landscape;
        self.shock_fitness.get_or_insert_with(genome, |g| shock.fitness(g));
        self.fitness.get_or_insert_with(genome, |g| landscape.fitness(g))
    }

    /// Replication probability of a parent with fitness `fitness` before
    /// density dependence.
    pub fn replication_probability(&self, fitness: f64) -> f64 {
        self.evolution.replication.probability(fitness)
    }

    /// Advance one generation: replicate, then select.
    ///
    /// Every individual of every active genotype replicates with probability
    /// `window(fitness) * density`. Each replication yields one offspring by
    /// the mutation strategy; offspring below the new generation's cutoff are
    /// discarded at birth. Parents are never removed during replication.
    /// Afterwards every genotype below the cutoff is removed.
    ///
    /// Returns `false` if the population is extinct, either on entry (the
    /// generation is then not advanced) or after selection.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.genomes.is_empty() {
            self.compute_statistics();
            return false;
        }
        self.generation += 1;
        let cutoff = self.cutoff();
        self.check_cutoff(cutoff);
        let density = self.evolution.density_factor(self.stats.population_size);
        let mutation = self.evolution.mutation;

        // Replication phase. The active set is only read here; offspring go
        // to the delta buffer and new genotypes to the working set.
        self.working.clear();
        let parents: Vec<Genome> = self.genomes.iter().collect();
        for parent in parents {
            let parent_fitness = self.fitness.get(parent).unwrap_or(0.0);
            let probability = self.replication_probability(parent_fitness) * density;
            if probability <= 0.0 {
                continue;
            }
            for _ in 0..self.count[parent as usize] {
                if rng.random::<f64>() >= probability {
                    continue;
                }
                let child = mutation.mutate(parent, self.space, rng);
                let child_fitness = self.cache_fitness(child);
                if child_fitness >= cutoff {
                    let slot = &mut self.offspring[child as usize];
                    if *slot == 0 {
                        self.touched.push(child);
                    }
                    *slot += 1;
                    if !self.genomes.contains(child) {
                        self.working.insert(child);
                    }
                }
            }
        }

        // Merge the offspring into the population.
        self.genomes.union_with(&self.working);
        for genome in self.touched.drain(..) {
            let born = std::mem::take(&mut self.offspring[genome as usize]);
            let slot = &mut self.count[genome as usize];
            *slot = slot.saturating_add(born);
        }

        // Selection phase.
        self.cull(|g, fitness, _| fitness.get(g).is_some_and(|f| f < cutoff));
        self.compute_statistics();
        debug!(
            generation = self.generation,
            size = self.stats.population_size,
            uniques = self.stats.unique_genomes,
            cutoff,
            "Advanced population"
        );
        !self.genomes.is_empty()
    }

    /// Cull every genotype whose shock fitness is below `threshold`.
    ///
    /// The generation is not advanced. A negative threshold leaves the
    /// population untouched. Returns `false` if the population is (or
    /// becomes) extinct.
    pub fn shock(&mut self, threshold: f64) -> bool {
        if self.genomes.is_empty() {
            return false;
        }
        if threshold < 0.0 {
            return true;
        }
        info!(generation = self.generation, threshold, "Shock");
        if let Some(max) = self.shock_landscape.max_peak() {
            if threshold > max {
                warn!(
                    generation = self.generation,
                    threshold,
                    max_peak = max,
                    "Shock threshold exceeds the maximum peak of the shock landscape"
                );
            }
        }
        self.cull(|g, _, shock_fitness| shock_fitness.get(g).is_some_and(|f| f < threshold));
        self.compute_statistics();
        !self.genomes.is_empty()
    }

    /// Remove every active genotype matching `doomed`, batched through the
    /// working set.
    fn cull<F>(&mut self, doomed: F)
    where
        F: Fn(Genome, &FitnessCache, &FitnessCache) -> bool,
    {
        self.working.clear();
        for genome in self.genomes.iter() {
            if doomed(genome, &self.fitness, &self.shock_fitness) {
                self.working.insert(genome);
                self.count[genome as usize] = 0;
            }
        }
        self.genomes.difference_with(&self.working);
    }

    fn check_cutoff(&mut self, cutoff: f64) {
        let Some(max) = self.landscape.max_peak() else {
            return;
        };
        if cutoff > max && self.warned_cutoff != Some(cutoff) {
            warn!(
                generation = self.generation,
                cutoff,
                max_peak = max,
                "Cutoff exceeds the maximum peak of the landscape"
            );
            self.warned_cutoff = Some(cutoff);
        }
    }

    fn compute_statistics(&mut self) {
        let genotypes = self.genomes.iter().map(|g| {
            (
                self.count[g as usize],
                self.fitness.get(g).unwrap_or(0.0),
                self.shock_fitness.get(g).unwrap_or(0.0),
            )
        });
        self.stats = PopulationStats::compute(genotypes);
    }

    /// Active genotypes in ascending genome order.
    pub fn records(&self) -> impl Iterator<Item = GenotypeRecord> + '_ {
        self.genomes.iter().map(|genome| GenotypeRecord {
            genome,
            count: self.count[genome as usize],
            fitness: self.fitness.get(genome).unwrap_or(0.0),
            shock_fitness: self.shock_fitness.get(genome).unwrap_or(0.0),
        })
    }

    /// Number of individuals of `genome`.
    pub fn count(&self, genome: Genome) -> u64 {
        self.count.get(genome as usize).copied().unwrap_or(0)
    }

    pub fn contains(&self, genome: Genome) -> bool {
        self.genomes.contains(genome)
    }

    /// Cutoff in force at the current generation.
    pub fn cutoff(&self) -> f64 {
        self.evolution.cutoffs.cutoff_at(self.generation)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn space(&self) -> GenomeSpace {
        self.space
    }

    pub fn landscape(&self) -> &Arc<Landscape> {
        &self.landscape
    }

    pub fn shock_landscape(&self) -> &Arc<Landscape> {
        &self.shock_landscape
    }

    pub fn statistics(&self) -> &PopulationStats {
        &self.stats
    }

    pub fn is_extinct(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn population_size(&self) -> u64 {
        self.stats.population_size
    }

    pub fn unique_genomes(&self) -> usize {
        self.genomes.len()
    }

    pub fn shannon_diversity(&self) -> f64 {
        self.stats.shannon_diversity
    }

    pub fn evenness(&self) -> f64 {
        self.stats.evenness
    }

    pub fn average_fitness(&self) -> f64 {
        self.stats.average_fitness
    }

    pub fn standard_deviation(&self) -> f64 {
        self.stats.standard_deviation
    }

    pub fn average_shock_fitness(&self) -> f64 {
        self.stats.average_shock_fitness
    }

    pub fn shock_std_dev(&self) -> f64 {
        self.stats.shock_std_dev
    }

    pub fn max_fitness(&self) -> f64 {
        self.stats.max_fitness
    }

    pub fn max_shock_fitness(&self) -> f64 {
        self.stats.max_shock_fitness
    }
}

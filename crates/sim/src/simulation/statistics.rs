//! Summary statistics of a counted population.

use serde::Serialize;

/// Value reported for every derived statistic of an extinct population.
pub const EXTINCT: f64 = -1.0;

/// Descriptive statistics of one generation.
///
/// Fitness moments count every individual, so a genotype with count `c`
/// contributes `c` times. Diversity is the Shannon index over genotype
/// frequencies, evenness that index divided by `ln(uniques)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopulationStats {
    pub population_size: u64,
    pub unique_genomes: usize,
    pub shannon_diversity: f64,
    pub evenness: f64,
    pub average_fitness: f64,
    pub standard_deviation: f64,
    pub average_shock_fitness: f64,
    pub shock_std_dev: f64,
    pub max_fitness: f64,
    pub max_shock_fitness: f64,
}

impl PopulationStats {
    /// Statistics of an empty population.
    pub fn extinct() -> Self {
        Self {
            population_size: 0,
            unique_genomes: 0,
            shannon_diversity: EXTINCT,
            evenness: EXTINCT,
            average_fitness: EXTINCT,
            standard_deviation: EXTINCT,
            average_shock_fitness: EXTINCT,
            shock_std_dev: EXTINCT,
            max_fitness: EXTINCT,
            max_shock_fitness: EXTINCT,
        }
    }

    /// Compute statistics from `(count, fitness, shock_fitness)` per active
    /// genotype. The population size saturates at `u64::MAX`.
    pub fn compute<I>(genotypes: I) -> Self
    where
        I: IntoIterator<Item = (u64, f64, f64)> + Clone,
    {
        let mut size = 0u64;
        let mut uniques = 0usize;
        for (count, _, _) in genotypes.clone() {
            size = size.saturating_add(count);
            uniques += 1;
        }
        if size == 0 {
            return Self::extinct();
        }

        let n = size as f64;
        let ln_n = n.ln();
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut shock_sum = 0.0;
        let mut shock_sum_sq = 0.0;
        let mut entropy = 0.0;
        let mut max_fitness = f64::NEG_INFINITY;
        let mut max_shock_fitness = f64::NEG_INFINITY;
        for (count, fitness, shock_fitness) in genotypes {
            let c = count as f64;
            sum += fitness * c;
            sum_sq += fitness * fitness * c;
            shock_sum += shock_fitness * c;
            shock_sum_sq += shock_fitness * shock_fitness * c;
            entropy += c * (c.ln() - ln_n);
            max_fitness = max_fitness.max(fitness);
            max_shock_fitness = max_shock_fitness.max(shock_fitness);
        }

        let diversity = -entropy / n;
        Self {
            population_size: size,
            unique_genomes: uniques,
            shannon_diversity: diversity,
            // NaN for a single genotype, as ln(1) = 0
            evenness: diversity / (uniques as f64).ln(),
            average_fitness: sum / n,
            standard_deviation: sample_std_dev(sum, sum_sq, n),
            average_shock_fitness: shock_sum / n,
            shock_std_dev: sample_std_dev(shock_sum, shock_sum_sq, n),
            max_fitness,
            max_shock_fitness,
        }
    }

    pub fn is_extinct(&self) -> bool {
        self.population_size == 0
    }
}

impl Default for PopulationStats {
    fn default() -> Self {
        Self::extinct()
    }
}

/// Unbiased (n - 1) standard deviation from running sums; 0 for n = 1.
fn sample_std_dev(sum: f64, sum_sq: f64, n: f64) -> f64 {
    // rounding can push the variance a hair below zero
    ((sum_sq - sum * sum / n) / (n - 1.0)).max(0.0).sqrt()
}

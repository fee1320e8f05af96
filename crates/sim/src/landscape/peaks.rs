//! Local fitness maxima of a landscape.

use crate::base::{FitnessCache, Genome, GenomeSet, GenomeSpace};
use std::collections::BTreeMap;

/// Genomes whose fitness is at least that of every Hamming-1 neighbor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Peaks {
    map: BTreeMap<Genome, f64>,
    min: Option<f64>,
    max: Option<f64>,
}

impl Peaks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a peak and update the tracked extremes.
    pub fn insert(&mut self, genome: Genome, fitness: f64) {
        self.map.insert(genome, fitness);
        self.min = Some(self.min.map_or(fitness, |m| m.min(fitness)));
        self.max = Some(self.max.map_or(fitness, |m| m.max(fitness)));
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, genome: Genome) -> Option<f64> {
        self.map.get(&genome).copied()
    }

    /// Highest peak fitness.
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Lowest peak fitness.
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Peaks in ascending genome order.
    pub fn iter(&self) -> impl Iterator<Item = (Genome, f64)> + '_ {
        self.map.iter().map(|(&g, &f)| (g, f))
    }

    /// Classify every genome of `space` under single-bit-flip adjacency.
    ///
    /// A genome is dropped as soon as a strictly fitter neighbor is seen, and
    /// every strictly less fit neighbor is dropped on the spot so it is never
    /// visited. `fitness` is called at most once per genome.
    pub fn locate<F>(space: GenomeSpace, mut fitness: F) -> Self
    where
        F: FnMut(Genome) -> f64,
    {
        let size = space.size();
        let mut eliminated = GenomeSet::with_capacity(size);
        let mut cache = FitnessCache::new(size);
        let mut peaks = Self::new();

        for index in 0..size {
            let genome = index as Genome;
            if eliminated.contains(genome) {
                continue;
            }
            let own = cache.get_or_insert_with(genome, &mut fitness);
            let mut is_peak = true;
            for neighbor in space.neighbors(genome) {
                let other = cache.get_or_insert_with(neighbor, &mut fitness);
                if other > own {
                    is_peak = false;
                    break;
                }
                if other < own {
                    eliminated.insert(neighbor);
                }
            }
            if is_peak {
                peaks.insert(genome, own);
            }
        }
        peaks
    }
}

//! Offspring genome generation.
//!
//! Every replication produces exactly one offspring from one parent. The
//! strategy decides how the offspring differs from its parent:
//!
//! - **Replicate**: an exact copy, so no new genotypes ever arise.
//! - **SingleRandom**: exactly one locus, chosen uniformly, is flipped. The
//!   offspring is always a Hamming-1 neighbor of the parent.
//! - **MultiRandom**: each locus is flipped independently with probability
//!   `rate`, so the offspring may equal the parent or lie several flips away.

use crate::base::{Genome, GenomeSpace};
use crate::errors::ConfigurationError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an offspring genome is derived from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum MutationStrategy {
    /// Offspring is identical to the parent.
    Replicate,
    /// Flip one uniformly chosen locus.
    #[default]
    SingleRandom,
    /// Flip each locus independently with probability `rate`.
    MultiRandom {
        /// Per-locus flip probability, `0 < rate < 1`.
        rate: f64,
    },
}

impl MutationStrategy {
    /// Resolve a strategy by name. `rate` is only used by `MultiRandom`.
    ///
    /// Names are matched case-insensitively, ignoring `_` and `-`, so
    /// `SingleRandom`, `single_random` and `SINGLE-RANDOM` are equivalent.
    ///
    /// # Errors
    /// Unknown names, or a `MultiRandom` rate outside (0, 1).
    pub fn from_name(name: &str, rate: f64) -> Result<Self, ConfigurationError> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let strategy = match normalized.as_str() {
            "replicate" => Self::Replicate,
            "singlerandom" => Self::SingleRandom,
            "multirandom" => Self::MultiRandom { rate },
            _ => {
                return Err(ConfigurationError::UnknownVariant {
                    kind: "mutation strategy",
                    value: name.to_string(),
                })
            }
        };
        strategy.validate()?;
        Ok(strategy)
    }

    /// Check the strategy's parameters.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match *self {
            Self::MultiRandom { rate } if !(rate > 0.0 && rate < 1.0) => {
                Err(ConfigurationError::MutationRate(rate))
            }
            _ => Ok(()),
        }
    }

    /// Produce one offspring of `parent`.
    #[inline]
    pub fn mutate<R: Rng + ?Sized>(&self, parent: Genome, space: GenomeSpace, rng: &mut R) -> Genome {
        match *self {
            Self::Replicate => parent,
            Self::SingleRandom => GenomeSpace::flip(parent, rng.random_range(0..space.bits())),
            Self::MultiRandom { rate } => (0..space.bits()).fold(parent, |genome, locus| {
                if rng.random::<f64>() < rate {
                    GenomeSpace::flip(genome, locus)
                } else {
                    genome
                }
            }),
        }
    }
}

impl fmt::Display for MutationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replicate => write!(f, "Replicate"),
            Self::SingleRandom => write!(f, "SingleRandom"),
            Self::MultiRandom { rate } => write!(f, "MultiRandom(r={rate})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::hamming_distance;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn space(n: u32) -> GenomeSpace {
        GenomeSpace::new(n).unwrap()
    }

    #[test]
    fn test_from_name_variants() {
        assert_eq!(
            MutationStrategy::from_name("Replicate", 0.1).unwrap(),
            MutationStrategy::Replicate
        );
        assert_eq!(
            MutationStrategy::from_name("single_random", 0.1).unwrap(),
            MutationStrategy::SingleRandom
        );
        assert_eq!(
            MutationStrategy::from_name("MULTIRANDOM", 0.25).unwrap(),
            MutationStrategy::MultiRandom { rate: 0.25 }
        );
    }

    #[test]
    fn test_from_name_errors() {
        assert!(matches!(
            MutationStrategy::from_name("crossover", 0.1),
            Err(ConfigurationError::UnknownVariant { .. })
        ));
        assert_eq!(
            MutationStrategy::from_name("multirandom", 1.0),
            Err(ConfigurationError::MutationRate(1.0))
        );
        assert!(MutationStrategy::from_name("multirandom", 0.0).is_err());
        // rate is irrelevant to the other strategies
        assert!(MutationStrategy::from_name("replicate", 5.0).is_ok());
    }

    #[test]
    fn test_replicate_is_identity() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        for g in [0, 7, 1023] {
            assert_eq!(MutationStrategy::Replicate.mutate(g, space(10), &mut rng), g);
        }
    }

    #[test]
    fn test_single_random_flips_one_bit() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let s = space(12);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2000 {
            let child = MutationStrategy::SingleRandom.mutate(0b1010, s, &mut rng);
            assert_eq!(hamming_distance(child, 0b1010), 1);
            assert!(s.contains(child as u64));
            seen.insert(child);
        }
        // every locus eventually chosen
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn test_multi_random_flip_rate() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let s = space(20);
        let strategy = MutationStrategy::MultiRandom { rate: 0.1 };
        let trials = 5000;
        let flips: u32 = (0..trials)
            .map(|_| hamming_distance(strategy.mutate(0, s, &mut rng), 0))
            .sum();
        let mean = flips as f64 / trials as f64;
        assert!((mean - 2.0).abs() < 0.15, "mean flips {mean}");
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&MutationStrategy::MultiRandom { rate: 0.2 }).unwrap();
        assert_eq!(json, r#"{"strategy":"multi_random","rate":0.2}"#);
        let back: MutationStrategy = serde_json::from_str(r#"{"strategy":"single_random"}"#).unwrap();
        assert_eq!(back, MutationStrategy::SingleRandom);
    }
}

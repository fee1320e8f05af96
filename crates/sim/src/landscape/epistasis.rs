//! Epistatic interaction structure of an NK landscape.

use crate::base::Genome;
use crate::errors::{ConfigurationError, TableError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the K interacting loci of each gene are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Epistasis {
    /// Each locus interacts with its K nearest neighbors on a ring.
    #[default]
    Adjacent,
    /// Each locus interacts with K other loci drawn without replacement.
    Random,
}

impl fmt::Display for Epistasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adjacent => write!(f, "adjacent"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl FromStr for Epistasis {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "adjacent" => Ok(Self::Adjacent),
            "random" => Ok(Self::Random),
            _ => Err(ConfigurationError::UnknownVariant {
                kind: "epistasis",
                value: s.to_string(),
            }),
        }
    }
}

/// For each of the N loci, the K+1 loci whose alleles select its fitness
/// contribution.
///
/// Row `i` is stored in lookup order: the allele at the first entry becomes
/// the least significant bit of the fitness-table row index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpistasisTable {
    n: u32,
    width: usize,
    loci: Vec<u32>,
}

impl EpistasisTable {
    /// Ring topology: row `i` holds loci `i - K/2 ..= i + K - K/2` (mod N).
    pub fn adjacent(n: u32, k: u32) -> Self {
        let width = k as usize + 1;
        let half = k / 2;
        let mut loci = Vec::with_capacity(n as usize * width);
        for i in 0..n {
            for j in 0..=k {
                loci.push((i + j + n - half) % n);
            }
        }
        Self { n, width, loci }
    }

    /// Random topology: row `i` starts with `i`, followed by K distinct
    /// other loci drawn uniformly without replacement.
    pub fn random<R: Rng + ?Sized>(n: u32, k: u32, rng: &mut R) -> Self {
        let width = k as usize + 1;
        let mut loci = Vec::with_capacity(n as usize * width);
        let mut candidates: Vec<u32> = Vec::with_capacity(n as usize - 1);
        for i in 0..n {
            // every locus except i
            candidates.clear();
            candidates.extend(0..n - 1);
            if i != n - 1 {
                candidates[i as usize] = n - 1;
            }
            loci.push(i);
            for j in 1..=k {
                let remaining = n - j;
                let pick = rng.random_range(0..remaining) as usize;
                loci.push(candidates[pick]);
                candidates[pick] = candidates[remaining as usize - 1];
            }
        }
        Self { n, width, loci }
    }

    /// Build a table from explicit rows, checking that each row holds
    /// `K + 1` distinct loci below N.
    pub fn from_rows(n: u32, k: u32, rows: &[Vec<u32>]) -> Result<Self, TableError> {
        let width = k as usize + 1;
        if rows.len() != n as usize {
            return Err(TableError::RowCount {
                expected: n as usize,
                found: rows.len(),
            });
        }
        let mut loci = Vec::with_capacity(n as usize * width);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(TableError::RowWidth {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            for (j, &locus) in values.iter().enumerate() {
                if locus >= n {
                    return Err(TableError::LocusOutOfRange { row, locus, n });
                }
                if values[..j].contains(&locus) {
                    return Err(TableError::DuplicateLocus { row, locus });
                }
            }
            loci.extend_from_slice(values);
        }
        Ok(Self { n, width, loci })
    }

    /// Number of loci N.
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Entries per row, K + 1.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The K + 1 loci interacting at `locus`, in lookup order.
    #[inline]
    pub fn row(&self, locus: u32) -> &[u32] {
        let start = locus as usize * self.width;
        &self.loci[start..start + self.width]
    }

    /// Iterate over all rows in locus order.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.loci.chunks_exact(self.width)
    }

    /// Fitness-table row selected by `genome` for `locus`.
    #[inline]
    pub fn table_index(&self, genome: Genome, locus: u32) -> usize {
        self.row(locus)
            .iter()
            .rev()
            .fold(0usize, |index, &l| (index << 1) | ((genome >> l) & 1) as usize)
    }
}

//! Binary genome values and the space they live in.
//!
//! A genome is an N-bit unsigned integer; the integer itself is the genotype
//! identity. Bit `i` is the allele at locus `i`.

use crate::errors::ConfigurationError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A genotype, stored as its N-bit integer value.
pub type Genome = u32;

/// The set of all genomes of a fixed length N, i.e. `[0, 2^N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GenomeSpace {
    bits: u32,
}

impl GenomeSpace {
    /// Largest supported genome length. Genomes must fit a signed 32-bit word
    /// so that `2^N` genotypes can be indexed.
    pub const MAX_BITS: u32 = 31;

    /// Create the space of `bits`-long genomes.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::GenomeLength`] unless `0 < bits < 32`.
    pub fn new(bits: u32) -> Result<Self, ConfigurationError> {
        if bits == 0 || bits > Self::MAX_BITS {
            return Err(ConfigurationError::GenomeLength(bits));
        }
        Ok(Self { bits })
    }

    /// Genome length N.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of distinct genomes, `2^N`.
    #[inline]
    pub fn size(&self) -> usize {
        1usize << self.bits
    }

    /// Whether `value` is a valid genome in this space.
    #[inline]
    pub fn contains(&self, value: u64) -> bool {
        value < self.size() as u64
    }

    /// Flip the allele at `locus`.
    #[inline]
    pub fn flip(genome: Genome, locus: u32) -> Genome {
        genome ^ (1 << locus)
    }

    /// Iterate over the N genomes at Hamming distance 1 from `genome`,
    /// flipping locus 0 first.
    pub fn neighbors(&self, genome: Genome) -> impl Iterator<Item = Genome> {
        (0..self.bits).map(move |locus| Self::flip(genome, locus))
    }

    /// Draw a genome uniformly from the space.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Genome {
        rng.random_range(0..self.size() as u64) as Genome
    }

    /// Render a genome as a bit string, most significant locus first.
    pub fn to_bit_string(&self, genome: Genome) -> String {
        (0..self.bits)
            .rev()
            .map(|locus| if genome & (1 << locus) != 0 { '1' } else { '0' })
            .collect()
    }
}

impl TryFrom<u32> for GenomeSpace {
    type Error = ConfigurationError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<GenomeSpace> for u32 {
    fn from(space: GenomeSpace) -> Self {
        space.bits
    }
}

/// Number of loci at which two genomes differ.
#[inline]
pub fn hamming_distance(a: Genome, b: Genome) -> u32 {
    (a ^ b).count_ones()
}

//! A presence set over the whole genome space.

use super::genome::Genome;

const WORD_BITS: usize = u64::BITS as usize;

/// Dense bit set indexed by genome value.
///
/// Holds one bit per possible genome, so membership tests and updates are
/// O(1) and iteration visits genomes in ascending order. The number of set
/// bits is maintained incrementally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomeSet {
    words: Vec<u64>,
    capacity: usize,
    len: usize,
}

impl GenomeSet {
    /// Create an empty set able to hold genomes in `[0, capacity)`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            capacity,
            len: 0,
        }
    }

    /// Number of genomes in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn locate(genome: Genome) -> (usize, u64) {
        let index = genome as usize;
        (index / WORD_BITS, 1u64 << (index % WORD_BITS))
    }

    /// Whether `genome` is in the set.
    #[inline]
    pub fn contains(&self, genome: Genome) -> bool {
        let (word, mask) = Self::locate(genome);
        self.words.get(word).is_some_and(|w| w & mask != 0)
    }

    /// Add `genome`. Returns `true` if it was not already present.
    ///
    /// # Panics
    /// Panics if `genome` is outside the set's capacity.
    #[inline]
    pub fn insert(&mut self, genome: Genome) -> bool {
        assert!(
            (genome as usize) < self.capacity,
            "genome {genome} outside set capacity {}",
            self.capacity
        );
        let (word, mask) = Self::locate(genome);
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        self.len += fresh as usize;
        fresh
    }

    /// Remove every genome.
    pub fn clear(&mut self) {
        self.words.fill(0);
        self.len = 0;
    }

    /// Add every genome of `other` to this set.
    pub fn union_with(&mut self, other: &GenomeSet) {
        let mut len = 0;
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w |= o;
            len += w.count_ones() as usize;
        }
        // words beyond `other` keep their bits
        len += self.words[other.words.len().min(self.words.len())..]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum::<usize>();
        self.len = len;
    }

    /// Remove every genome of `other` from this set.
    pub fn difference_with(&mut self, other: &GenomeSet) {
        let mut removed = 0;
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            removed += (*w & o).count_ones() as usize;
            *w &= !o;
        }
        self.len -= removed;
    }

    /// Iterate over the genomes in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            words: &self.words,
            index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl Extend<Genome> for GenomeSet {
    fn extend<T: IntoIterator<Item = Genome>>(&mut self, iter: T) {
        for genome in iter {
            self.insert(genome);
        }
    }
}

impl<'a> IntoIterator for &'a GenomeSet {
    type Item = Genome;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over a [`GenomeSet`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    words: &'a [u64],
    index: usize,
    current: u64,
}

impl Iterator for Iter<'_> {
    type Item = Genome;

    fn next(&mut self) -> Option<Genome> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some((self.index * WORD_BITS + bit) as Genome);
            }
            self.index += 1;
            self.current = *self.words.get(self.index)?;
        }
    }
}

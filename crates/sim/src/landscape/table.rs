use crate::errors::TableError;
use rand::Rng;

/// Per-locus fitness contributions: `2^(K+1)` rows by N columns.
///
/// Cell `(row, locus)` is the contribution of `locus` when its interacting
/// alleles spell out `row`. Values lie in `[0, 1)` for generated tables.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessTable {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl FitnessTable {
    /// Draw every cell uniformly from `[0, 1)`, filling one locus column at a
    /// time.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let mut cells = vec![0.0; rows * cols];
        for col in 0..cols {
            for row in 0..rows {
                cells[row * cols + col] = rng.random::<f64>();
            }
        }
        Self { rows, cols, cells }
    }

    /// Build a table from row-major values.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(TableError::RowWidth {
                row,
                expected: cols,
                found: values.len(),
            });
        }
        let n_rows = rows.len();
        Ok(Self {
            rows: n_rows,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a table whose cells are `combine(base_cell)`, visiting cells in
    /// the same column-major order as [`FitnessTable::random`].
    pub fn derive<F>(base: &FitnessTable, mut combine: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        let mut cells = vec![0.0; base.cells.len()];
        for col in 0..base.cols {
            for row in 0..base.rows {
                let i = row * base.cols + col;
                cells[i] = combine(base.cells[i]);
            }
        }
        Self {
            rows: base.rows,
            cols: base.cols,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.cols + col]
    }

    /// One row of the table, one value per locus.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_random_cells_in_unit_interval() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let table = FitnessTable::random(8, 5, &mut rng);
        assert_eq!(table.rows(), 8);
        assert_eq!(table.cols(), 5);
        for row in 0..8 {
            for col in 0..5 {
                let v = table.get(row, col);
                assert!((0.0..1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_random_is_seed_deterministic() {
        let a = FitnessTable::random(4, 3, &mut Xoshiro256PlusPlus::seed_from_u64(9));
        let b = FitnessTable::random(4, 3, &mut Xoshiro256PlusPlus::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_rows() {
        let table = FitnessTable::from_rows(vec![vec![0.1, 0.2], vec![0.3, 0.4]]).unwrap();
        assert_eq!(table.get(1, 0), 0.3);
        assert_eq!(table.row(0), &[0.1, 0.2]);
        assert_eq!(
            FitnessTable::from_rows(vec![vec![0.1, 0.2], vec![0.3]]),
            Err(TableError::RowWidth { row: 1, expected: 2, found: 1 })
        );
    }

    #[test]
    fn test_derive_maps_each_cell() {
        let base = FitnessTable::from_rows(vec![vec![0.25, 0.5], vec![0.75, 0.0]]).unwrap();
        let flipped = FitnessTable::derive(&base, |x| 1.0 - x);
        assert_eq!(flipped.row(0), &[0.75, 0.5]);
        assert_eq!(flipped.row(1), &[0.25, 1.0]);
    }
}

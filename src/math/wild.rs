use std::sync::atomic::{AtomicU64, Ordering};

use crate::math::matrix::Matrix;

/// A matrix that many threads may read and nudge at once without locking.
///
/// Each cell holds the bit pattern of an `f64`. `add_at` is a plain
/// load followed by a store, not a read-modify-write: two threads adding to
/// the same cell at the same time can lose one of the additions, and a reader
/// can observe a matrix that is half updated. This is the lock-free
/// ("Hogwild") update model, kept race-prone on purpose but free of
/// undefined behaviour.
pub struct WildMatrix {
    rows: usize,
    cols: usize,
    cells: Box<[AtomicU64]>,
}

impl WildMatrix {
    pub fn from_matrix(m: &Matrix) -> WildMatrix {
        let cells = m.data.iter()
            .flatten()
            .map(|x| AtomicU64::new(x.to_bits()))
            .collect();
        WildMatrix { rows: m.rows, cols: m.cols, cells }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        f64::from_bits(self.cells[row * self.cols + col].load(Ordering::Relaxed))
    }

    #[inline]
    pub fn add_at(&self, row: usize, col: usize, delta: f64) {
        let cell = &self.cells[row * self.cols + col];
        let current = f64::from_bits(cell.load(Ordering::Relaxed));
        cell.store((current + delta).to_bits(), Ordering::Relaxed);
    }

    /// Snapshot of the current contents.
    pub fn to_matrix(&self) -> Matrix {
        let mut res = Matrix::zeros(self.rows, self.cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.get(i, j);
            }
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_matches_source() {
        let m = Matrix::from_data(vec![vec![1.0, -2.5], vec![0.25, 3.0]]);
        let wild = WildMatrix::from_matrix(&m);
        assert_eq!(wild.to_matrix(), m);
    }

    #[test]
    fn single_thread_adds_are_exact() {
        let wild = WildMatrix::from_matrix(&Matrix::zeros(1, 3));
        wild.add_at(0, 1, 0.5);
        wild.add_at(0, 1, 0.25);
        assert_eq!(wild.get(0, 1), 0.75);
        assert_eq!(wild.get(0, 0), 0.0);
    }
}

//! Isolation Kernel similarity matrices.
//!
//! Entry `(i, j)` is the fraction of the `t` partitions in which row `i` and
//! row `j` land in the same cell, i.e. `(F · Fᵗ) / t`. Values are multiples
//! of `1/t` in `[0, 1]`.
//!
//! For the self case (`F` against itself) the matrix is square, exactly
//! symmetric, and has a unit diagonal. The layout is flattened row-major
//! (`values[i * cols + j]`), so the values can be handed to consumers
//! expecting a dense `n×n` slice.
//!
//! ```rust
//! use isolation_kernel::{kernel, KernelConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let data = vec![vec![0.0], vec![0.2], vec![9.0]];
//! let mut rng = ChaCha8Rng::seed_from_u64(5);
//! let sim = kernel::build_similarity(&data, KernelConfig::new(2, 40), &mut rng).unwrap();
//!
//! // k-medoids style consumers take a distance matrix
//! let dist = sim.to_distance();
//! assert_eq!(dist[0], 0.0);
//! ```

use crate::features::FeatureMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Dense `rows × cols` similarity values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// `A · Bᵗ / t`. Callers guarantee matching `ψ` and `t`.
    pub(crate) fn between(a: &FeatureMatrix, b: &FeatureMatrix) -> Self {
        let rows = a.rows();
        let cols = b.rows();
        let t = a.diagrams();
        let mut values = vec![0.0f32; rows * cols];
        if rows == 0 || cols == 0 {
            return Self { rows, cols, values };
        }

        let left = a.assignment_table();
        let right = b.assignment_table();
        let fill_row = |(i, out): (usize, &mut [f32])| {
            let ai = &left[i * t..(i + 1) * t];
            for (j, slot) in out.iter_mut().enumerate() {
                let bj = &right[j * t..(j + 1) * t];
                let shared = ai.iter().zip(bj).filter(|(x, y)| x == y).count();
                *slot = shared as f32 / t as f32;
            }
        };

        #[cfg(feature = "parallel")]
        values.par_chunks_mut(cols).enumerate().for_each(fill_row);
        #[cfg(not(feature = "parallel"))]
        values.chunks_mut(cols).enumerate().for_each(fill_row);

        tracing::trace!(rows, cols, diagrams = t, "similarity matrix filled");
        Self { rows, cols, values }
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `true` for `n×n` matrices.
    #[inline]
    #[must_use]
    pub const fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Similarity between row `i` and column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= rows()` or `j >= cols()`.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of bounds for {}×{} similarity matrix",
            self.rows,
            self.cols
        );
        self.values[i * self.cols + j]
    }

    /// Row `i` as a slice.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    /// Flattened row-major values.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Consume into flattened row-major values.
    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.values
    }

    /// `true` if square and `|s(i,j) - s(j,i)| <= tolerance` everywhere.
    #[must_use]
    pub fn is_symmetric(&self, tolerance: f32) -> bool {
        self.is_square()
            && (0..self.rows).all(|i| {
                (i + 1..self.cols).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
            })
    }

    /// Distances `1 - s`, flattened row-major.
    ///
    /// For the self case the diagonal is exactly zero.
    #[must_use]
    pub fn to_distance(&self) -> Vec<f32> {
        self.values.iter().map(|s| 1.0 - s).collect()
    }

    /// Mean similarity of row `i` to the columns in `cols`.
    ///
    /// Returns 0.0 if `cols` is empty.
    #[must_use]
    pub fn mean_to(&self, i: usize, cols: &[usize]) -> f32 {
        if cols.is_empty() {
            return 0.0;
        }
        cols.iter().map(|&j| self.get(i, j)).sum::<f32>() / cols.len() as f32
    }
}

//! Isolation Kernel feature matrices.
//!
//! A feature row is the concatenation of `t` one-hot blocks, one per
//! partition, each `ψ` wide. Block `d` has its single 1 at the cell (nearest
//! center) the point fell into under partition `d`:
//!
//! ```text
//!            partition 0     partition 1     partition 2      (ψ = 3, t = 3)
//! point a:  [0 1 0]         [1 0 0]         [0 0 1]
//! point b:  [0 1 0]         [0 0 1]         [0 0 1]
//!
//! a · b = 2 shared cells → similarity 2/3
//! ```
//!
//! # Storage
//!
//! [`Storage::Dense`] keeps the full `rows × t·ψ` array of 0.0/1.0.
//! [`Storage::Sparse`] keeps compressed rows: exactly `t` column indices per
//! row, so the row pointer is implicit. Every accessor on [`FeatureMatrix`]
//! returns the same values for either layout.

use crate::similarity::SimilarityMatrix;
use crate::Storage;

/// Binary `rows × (t·ψ)` feature matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: usize,
    cells: usize,
    diagrams: usize,
    repr: Repr,
}

#[derive(Debug, Clone, PartialEq)]
enum Repr {
    /// Row-major, `rows × cells·diagrams`.
    Dense(Vec<f32>),
    /// Active column of each (row, diagram), row-major `rows × diagrams`.
    Sparse(Vec<usize>),
}

impl FeatureMatrix {
    /// Build from per-partition cell assignments.
    ///
    /// `assignments` is row-major `rows × diagrams`; entry `(i, d)` is the
    /// cell (in `0..cells`) that row `i` falls into under partition `d`.
    pub(crate) fn from_assignments(
        rows: usize,
        cells: usize,
        diagrams: usize,
        assignments: &[usize],
        storage: Storage,
    ) -> Self {
        debug_assert_eq!(assignments.len(), rows * diagrams);
        debug_assert!(assignments.iter().all(|&c| c < cells));

        let repr = match storage {
            Storage::Dense => {
                let width = cells * diagrams;
                let mut values = vec![0.0f32; rows * width];
                for (i, row) in assignments.chunks_exact(diagrams.max(1)).enumerate() {
                    for (d, &cell) in row.iter().enumerate() {
                        values[i * width + d * cells + cell] = 1.0;
                    }
                }
                Repr::Dense(values)
            }
            Storage::Sparse => Repr::Sparse(
                assignments
                    .iter()
                    .enumerate()
                    .map(|(k, &cell)| (k % diagrams) * cells + cell)
                    .collect(),
            ),
        };

        Self {
            rows,
            cells,
            diagrams,
            repr,
        }
    }

    /// Number of rows (query points).
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns: `t · ψ`.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cells * self.diagrams
    }

    /// Block width ψ.
    #[inline]
    #[must_use]
    pub const fn cells(&self) -> usize {
        self.cells
    }

    /// Number of blocks t.
    #[inline]
    #[must_use]
    pub const fn diagrams(&self) -> usize {
        self.diagrams
    }

    /// `true` if there are no rows.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Current storage layout.
    #[must_use]
    pub fn storage(&self) -> Storage {
        match &self.repr {
            Repr::Dense(_) => Storage::Dense,
            Repr::Sparse(_) => Storage::Sparse,
        }
    }

    /// Entry at `(row, col)`: 1.0 or 0.0.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows()` or `col >= cols()`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        assert!(
            row < self.rows && col < self.cols(),
            "index ({row}, {col}) out of bounds for {}×{} feature matrix",
            self.rows,
            self.cols()
        );
        match &self.repr {
            Repr::Dense(values) => values[row * self.cols() + col],
            Repr::Sparse(active) => {
                let diagram = col / self.cells;
                if active[row * self.diagrams + diagram] == col {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Cell (in `0..ψ`) that `row` falls into under partition `diagram`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows()` or `diagram >= diagrams()`.
    #[must_use]
    pub fn assignment(&self, row: usize, diagram: usize) -> usize {
        assert!(
            row < self.rows && diagram < self.diagrams,
            "(row {row}, diagram {diagram}) out of bounds for {} rows × {} diagrams",
            self.rows,
            self.diagrams
        );
        match &self.repr {
            Repr::Dense(values) => {
                let start = row * self.cols() + diagram * self.cells;
                values[start..start + self.cells]
                    .iter()
                    .position(|&v| v != 0.0)
                    .unwrap_or(0)
            }
            Repr::Sparse(active) => active[row * self.diagrams + diagram] - diagram * self.cells,
        }
    }

    /// Per-partition cells of `row`, in partition order.
    #[must_use]
    pub fn cell_assignments(&self, row: usize) -> Vec<usize> {
        (0..self.diagrams).map(|d| self.assignment(row, d)).collect()
    }

    /// Columns holding a 1 in `row`, one per block, ascending.
    pub fn active_columns(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.diagrams).map(move |d| d * self.cells + self.assignment(row, d))
    }

    /// Count of nonzero entries in `row`. Always `t` for kernel output.
    #[must_use]
    pub fn row_nnz(&self, row: usize) -> usize {
        match &self.repr {
            Repr::Dense(values) => {
                let cols = self.cols();
                values[row * cols..(row + 1) * cols]
                    .iter()
                    .filter(|&&v| v != 0.0)
                    .count()
            }
            Repr::Sparse(_) => self.diagrams,
        }
    }

    /// `row` as a dense `t·ψ` vector.
    #[must_use]
    pub fn row_dense(&self, row: usize) -> Vec<f32> {
        let mut out = vec![0.0; self.cols()];
        for col in self.active_columns(row) {
            out[col] = 1.0;
        }
        out
    }

    /// Whole matrix as row-major dense values.
    #[must_use]
    pub fn to_dense(&self) -> Vec<f32> {
        match &self.repr {
            Repr::Dense(values) => values.clone(),
            Repr::Sparse(_) => (0..self.rows).flat_map(|i| self.row_dense(i)).collect(),
        }
    }

    /// Same values in another layout.
    #[must_use]
    pub fn to_storage(&self, storage: Storage) -> Self {
        if storage == self.storage() {
            return self.clone();
        }
        let assignments = self.assignment_table();
        Self::from_assignments(self.rows, self.cells, self.diagrams, &assignments, storage)
    }

    /// Inner product of row `i` of `self` with row `j` of `other`: the
    /// number of partitions where both rows share a cell.
    ///
    /// # Panics
    ///
    /// Panics if the two matrices differ in `ψ` or `t`.
    #[must_use]
    pub fn matches(&self, i: usize, other: &Self, j: usize) -> usize {
        assert_same_shape(self, other);
        (0..self.diagrams)
            .filter(|&d| self.assignment(i, d) == other.assignment(j, d))
            .count()
    }

    /// `F · Fᵗ / t` over this matrix's rows.
    #[must_use]
    pub fn similarity(&self) -> SimilarityMatrix {
        SimilarityMatrix::between(self, self)
    }

    /// `A · Bᵗ / t` between the rows of `self` and of `other`.
    ///
    /// Only meaningful when both were produced by the same fitted kernel.
    ///
    /// # Panics
    ///
    /// Panics if the two matrices differ in `ψ` or `t`.
    #[must_use]
    pub fn cross_similarity(&self, other: &Self) -> SimilarityMatrix {
        assert_same_shape(self, other);
        SimilarityMatrix::between(self, other)
    }

    /// Row-major `rows × t` table of cell assignments.
    pub(crate) fn assignment_table(&self) -> Vec<usize> {
        (0..self.rows)
            .flat_map(|i| self.cell_assignments(i))
            .collect()
    }
}

fn assert_same_shape(a: &FeatureMatrix, b: &FeatureMatrix) {
    assert!(
        a.cells == b.cells && a.diagrams == b.diagrams,
        "feature matrices differ in shape: ψ={} t={} vs ψ={} t={}",
        a.cells,
        a.diagrams,
        b.cells,
        b.diagrams
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3 rows, ψ = 3, t = 2
    fn sample(storage: Storage) -> FeatureMatrix {
        let assignments = [1, 0, 1, 2, 2, 0];
        FeatureMatrix::from_assignments(3, 3, 2, &assignments, storage)
    }

    #[test]
    fn dense_layout() {
        let f = sample(Storage::Dense);
        assert_eq!(f.rows(), 3);
        assert_eq!(f.cols(), 6);
        #[rustfmt::skip]
        let expected = vec![
            0.0, 1.0, 0.0,  1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,  0.0, 0.0, 1.0,
            0.0, 0.0, 1.0,  1.0, 0.0, 0.0,
        ];
        assert_eq!(f.to_dense(), expected);
    }

    #[test]
    fn sparse_matches_dense_everywhere() {
        let dense = sample(Storage::Dense);
        let sparse = sample(Storage::Sparse);
        assert_eq!(sparse.storage(), Storage::Sparse);
        assert_eq!(dense.to_dense(), sparse.to_dense());
        for i in 0..3 {
            for c in 0..6 {
                assert_eq!(dense.get(i, c), sparse.get(i, c), "({i}, {c})");
            }
            assert_eq!(dense.cell_assignments(i), sparse.cell_assignments(i));
            assert_eq!(dense.row_nnz(i), 2);
            assert_eq!(sparse.row_nnz(i), 2);
        }
    }

    #[test]
    fn active_columns_one_per_block() {
        let f = sample(Storage::Sparse);
        assert_eq!(f.active_columns(0).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(f.active_columns(1).collect::<Vec<_>>(), vec![1, 5]);
        assert_eq!(f.active_columns(2).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn storage_conversion_round_trips() {
        let dense = sample(Storage::Dense);
        let sparse = dense.to_storage(Storage::Sparse);
        assert_eq!(sparse, sample(Storage::Sparse));
        assert_eq!(sparse.to_storage(Storage::Dense), dense);
    }

    #[test]
    fn matches_counts_shared_cells() {
        let f = sample(Storage::Dense);
        assert_eq!(f.matches(0, &f, 0), 2);
        assert_eq!(f.matches(0, &f, 1), 1);
        assert_eq!(f.matches(0, &f, 2), 1);
        assert_eq!(f.matches(1, &f, 2), 0);
    }

    #[test]
    fn similarity_from_features() {
        let f = sample(Storage::Sparse);
        let s = f.similarity();
        assert_eq!(s.get(0, 0), 1.0);
        assert_eq!(s.get(0, 1), 0.5);
        assert_eq!(s.get(1, 2), 0.0);
    }

    #[test]
    fn empty_matrix() {
        let f = FeatureMatrix::from_assignments(0, 4, 3, &[], Storage::Dense);
        assert!(f.is_empty());
        assert_eq!(f.cols(), 12);
        assert!(f.to_dense().is_empty());
        assert_eq!(f.similarity().rows(), 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn get_out_of_bounds_panics() {
        let _ = sample(Storage::Dense).get(0, 6);
    }

    #[test]
    #[should_panic(expected = "differ in shape")]
    fn cross_similarity_rejects_other_shape() {
        let a = sample(Storage::Dense);
        let b = FeatureMatrix::from_assignments(1, 2, 2, &[0, 1], Storage::Dense);
        let _ = a.cross_similarity(&b);
    }
}

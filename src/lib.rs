//! # isolation-kernel
//!
//! Data-dependent similarity from random Voronoi partitions.
//!
//! The Isolation Kernel scores two points by how often they land in the same
//! cell across `t` random partitions of a reference sample. Each partition
//! picks `ψ` reference points as centers; a point belongs to the cell of its
//! nearest center.
//!
//! ## Modules
//!
//! | Module | Purpose | Notes |
//! |--------|---------|-------|
//! | [`kernel`] | Fit partitions, build features and similarity | Seeded by caller RNG |
//! | [`features`] | One-hot cell indicators, dense or sparse | Same values either way |
//! | [`similarity`] | `F·Fᵗ / t` matrices and `1 - s` distances | Row-major `f32` |
//! | [`nearest`] | Nearest-center search | Trait-based, BYO index |
//! | [`sampling`] | Uniform sampling without replacement | `rand` |
//! | [`simd`] | Vector ops (AVX2/NEON) | Auto-dispatch |
//!
//! ## Pipeline
//!
//! ```text
//! Reference → t × sample ψ centers → nearest center per point → one-hot blocks → F·Fᵗ / t
//! ```
//!
//! ## Quick Example
//!
//! ```rust
//! use isolation_kernel::{kernel, KernelConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let data = vec![
//!     vec![0.0, 0.0], vec![0.1, 0.0], vec![0.0, 0.1],
//!     vec![5.0, 5.0], vec![5.1, 5.0], vec![5.0, 5.1],
//! ];
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//!
//! let sim = kernel::build_similarity(&data, KernelConfig::new(2, 50), &mut rng).unwrap();
//! assert_eq!(sim.get(0, 0), 1.0);
//! assert!(sim.get(0, 1) > sim.get(0, 3));
//! ```

use thiserror::Error;

pub mod features;
pub mod kernel;
pub mod nearest;
pub mod sampling;
pub mod similarity;
pub mod simd;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use features::FeatureMatrix;
pub use kernel::{IsolationKernel, Partition};
pub use nearest::{BruteForce, NearestSearch, Neighbor};
pub use similarity::SimilarityMatrix;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors from kernel construction.
///
/// Every failure is a caller error: a bad configuration or input found
/// before any partition is drawn, or a custom search backend that answered
/// outside the partition. No partial result ever escapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// The inputs or configuration cannot produce a kernel.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
}

impl KernelError {
    /// The underlying reason.
    #[must_use]
    pub const fn reason(&self) -> &ArgumentError {
        match self {
            Self::InvalidArgument(reason) => reason,
        }
    }
}

/// Why an argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// More cells per partition than reference points to draw them from.
    #[error("cell count {cells} exceeds reference size {reference_len}")]
    CellCountExceedsReference {
        /// Requested ψ.
        cells: usize,
        /// Rows in the reference set.
        reference_len: usize,
    },

    /// A partition needs at least one center.
    #[error("cell count must be positive")]
    ZeroCellCount,

    /// At least one partition is required.
    #[error("diagram count must be positive")]
    ZeroDiagramCount,

    /// A row does not have the shared dimensionality.
    #[error("dimension mismatch at row {row}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Offending row (within its own matrix).
        row: usize,
        /// Dimensionality fixed by the reference set.
        expected: usize,
        /// Length of the offending row.
        got: usize,
    },

    /// NaN or infinite coordinate; nearest center is undefined.
    #[error("non-finite value at row {row}, column {col}")]
    NonFinite {
        /// Offending row (within its own matrix).
        row: usize,
        /// Offending column.
        col: usize,
    },

    /// A nearest-center backend gave no center, or one outside `0..cells`.
    #[error("search returned {got:?} for row {row} in diagram {diagram} (cells: {cells})")]
    InvalidNeighbor {
        /// Query row.
        row: usize,
        /// Partition being searched.
        diagram: usize,
        /// Center index the backend returned, if any.
        got: Option<usize>,
        /// Centers in the partition.
        cells: usize,
    },
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Storage layout of a [`FeatureMatrix`].
///
/// Purely a representation choice: every accessor returns the same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Storage {
    /// Row-major `f32` array of 0s and 1s.
    #[default]
    Dense,
    /// Compressed rows holding only the `t` active columns.
    Sparse,
}

/// Configuration for building an Isolation Kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KernelConfig {
    /// Centers per partition (ψ). Must be in `1..=reference_len`.
    ///
    /// Small ψ gives coarse cells and smooth similarity; large ψ
    /// sharpens it toward nearest-neighbour identity.
    pub cells: usize,
    /// Number of independent partitions (t). Similarity is quantized to
    /// multiples of `1/t`.
    pub diagrams: usize,
    /// Feature matrix layout.
    pub storage: Storage,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            cells: 16,
            diagrams: 200,
            storage: Storage::Dense,
        }
    }
}

impl KernelConfig {
    /// Create config with ψ cells and t diagrams (dense storage).
    #[must_use]
    pub const fn new(cells: usize, diagrams: usize) -> Self {
        Self {
            cells,
            diagrams,
            storage: Storage::Dense,
        }
    }

    /// Set ψ (centers per partition).
    #[must_use]
    pub const fn with_cells(mut self, cells: usize) -> Self {
        self.cells = cells;
        self
    }

    /// Set t (number of partitions).
    #[must_use]
    pub const fn with_diagrams(mut self, diagrams: usize) -> Self {
        self.diagrams = diagrams;
        self
    }

    /// Set the feature storage layout.
    #[must_use]
    pub const fn with_storage(mut self, storage: Storage) -> Self {
        self.storage = storage;
        self
    }

    /// Shorthand for `with_storage(Storage::Sparse)`.
    #[must_use]
    pub const fn sparse(self) -> Self {
        self.with_storage(Storage::Sparse)
    }

    /// Shorthand for `with_storage(Storage::Dense)`.
    #[must_use]
    pub const fn dense(self) -> Self {
        self.with_storage(Storage::Dense)
    }

    /// Width of a feature row: `t · ψ`.
    #[must_use]
    pub const fn feature_width(&self) -> usize {
        self.cells * self.diagrams
    }
}

/// Borrow owned rows as slices.
#[inline]
pub(crate) fn as_slices<V: AsRef<[f32]>>(rows: &[V]) -> Vec<&[f32]> {
    rows.iter().map(AsRef::as_ref).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builders_chain() {
        let config = KernelConfig::default()
            .with_cells(4)
            .with_diagrams(10)
            .sparse();
        assert_eq!(config.cells, 4);
        assert_eq!(config.diagrams, 10);
        assert_eq!(config.storage, Storage::Sparse);
        assert_eq!(config.feature_width(), 40);
        assert_eq!(config.dense().storage, Storage::Dense);
    }

    #[test]
    fn default_is_dense() {
        let config = KernelConfig::default();
        assert_eq!(config.storage, Storage::Dense);
        assert_eq!(KernelConfig::new(3, 5).storage, Storage::Dense);
    }

    #[test]
    fn error_messages_name_the_argument() {
        let err = KernelError::from(ArgumentError::CellCountExceedsReference {
            cells: 8,
            reference_len: 5,
        });
        assert_eq!(
            err.to_string(),
            "invalid argument: cell count 8 exceeds reference size 5"
        );
        assert_eq!(
            err.reason(),
            &ArgumentError::CellCountExceedsReference {
                cells: 8,
                reference_len: 5
            }
        );

        let err = KernelError::from(ArgumentError::ZeroDiagramCount);
        assert_eq!(err.to_string(), "invalid argument: diagram count must be positive");
    }
}

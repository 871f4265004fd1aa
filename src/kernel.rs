//! Isolation Kernel construction.
//!
//! Fitting draws `t` partitions of the reference set, each a uniform sample
//! of `ψ` distinct reference points (the cell centers). Mapping a point onto
//! the fitted kernel records, per partition, which center is nearest; the
//! one-hot encoding of those choices is the point's feature row.
//!
//! ## Example
//!
//! ```rust
//! use isolation_kernel::{kernel, KernelConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let data = vec![vec![0.0, 0.0], vec![0.2, 0.1], vec![8.0, 8.0], vec![8.1, 7.9]];
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! let features = kernel::build_features(&data, KernelConfig::new(2, 10).sparse(), &mut rng).unwrap();
//! assert_eq!(features.cols(), 20);
//! assert_eq!(features.row_nnz(0), 10);
//! ```
//!
//! ## Fit once, map many
//!
//! The one-shot [`build_features`] / [`build_similarity`] helpers fit and map
//! in one call. To compare new points against the same partitions, keep the
//! [`IsolationKernel`]:
//!
//! ```rust
//! use isolation_kernel::{IsolationKernel, KernelConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let reference = vec![vec![0.0], vec![1.0], vec![2.0], vec![10.0], vec![11.0]];
//! let mut rng = ChaCha8Rng::seed_from_u64(3);
//! let ik = IsolationKernel::fit(&reference, KernelConfig::new(3, 64), &mut rng).unwrap();
//!
//! let queries = vec![vec![0.5], vec![10.5]];
//! let sim = ik.cross_similarity(&queries, &reference).unwrap();
//! assert_eq!((sim.rows(), sim.cols()), (2, 5));
//! ```

use rand::Rng;
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::features::FeatureMatrix;
use crate::nearest::{BruteForce, NearestSearch};
use crate::sampling;
use crate::similarity::SimilarityMatrix;
use crate::{as_slices, ArgumentError, KernelConfig, Result};

// ─────────────────────────────────────────────────────────────────────────────
// One-shot API
// ─────────────────────────────────────────────────────────────────────────────

/// Build features for `data`, partitioning `data` itself.
///
/// # Errors
///
/// See [`build_features_with_reference`].
pub fn build_features<V, R>(data: &[V], config: KernelConfig, rng: &mut R) -> Result<FeatureMatrix>
where
    V: AsRef<[f32]>,
    R: Rng + ?Sized,
{
    build_features_with_reference(data, data, config, rng)
}

/// Build the `N × t·ψ` binary feature matrix of `data` against random
/// partitions of `reference`.
///
/// Block `d` of the columns belongs to the `d`-th partition drawn from
/// `rng`. Seeding `rng` identically gives bit-identical output.
///
/// # Errors
///
/// Returns [`KernelError::InvalidArgument`](crate::KernelError::InvalidArgument)
/// before drawing anything if:
/// - `config.cells == 0` or `config.cells > reference.len()`
/// - `config.diagrams == 0`
/// - any row of `data` or `reference` differs from the reference
///   dimensionality, or holds a non-finite value
pub fn build_features_with_reference<V, W, R>(
    data: &[V],
    reference: &[W],
    config: KernelConfig,
    rng: &mut R,
) -> Result<FeatureMatrix>
where
    V: AsRef<[f32]>,
    W: AsRef<[f32]>,
    R: Rng + ?Sized,
{
    let dim = validate_reference(reference, config)?;
    validate_rows(data, dim)?;
    IsolationKernel::fit_validated(reference, dim, config, rng)?.map_rows(data, &BruteForce)
}

/// Self-similarity of `data`, partitioning `data` itself.
///
/// # Errors
///
/// See [`build_features_with_reference`].
pub fn build_similarity<V, R>(
    data: &[V],
    config: KernelConfig,
    rng: &mut R,
) -> Result<SimilarityMatrix>
where
    V: AsRef<[f32]>,
    R: Rng + ?Sized,
{
    build_similarity_with_reference(data, data, config, rng)
}

/// `F · Fᵗ / t` for the features of `data` against partitions of
/// `reference`.
///
/// The result is `N × N`, symmetric, in `[0, 1]`, with a unit diagonal.
///
/// # Errors
///
/// See [`build_features_with_reference`].
pub fn build_similarity_with_reference<V, W, R>(
    data: &[V],
    reference: &[W],
    config: KernelConfig,
    rng: &mut R,
) -> Result<SimilarityMatrix>
where
    V: AsRef<[f32]>,
    W: AsRef<[f32]>,
    R: Rng + ?Sized,
{
    Ok(build_features_with_reference(data, reference, config, rng)?.similarity())
}

// ─────────────────────────────────────────────────────────────────────────────
// Fitted kernel
// ─────────────────────────────────────────────────────────────────────────────

/// One random partition: the reference indices chosen as cell centers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    centers: Vec<usize>,
}

impl Partition {
    /// Reference indices of the centers, in draw order. Cell `c` of this
    /// partition is owned by `centers()[c]`.
    #[must_use]
    pub fn centers(&self) -> &[usize] {
        &self.centers
    }

    /// Number of cells (ψ).
    #[must_use]
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// Always `false` for fitted partitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

/// Isolation Kernel fitted on a reference set.
#[derive(Debug, Clone)]
pub struct IsolationKernel {
    config: KernelConfig,
    dim: usize,
    reference_len: usize,
    partitions: Vec<Partition>,
    /// Center coordinates per partition, row-major `ψ × dim`.
    coords: Vec<Vec<f32>>,
}

impl IsolationKernel {
    /// Draw `config.diagrams` partitions of `reference` from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `config.cells` is 0 or exceeds
    /// `reference.len()`, if `config.diagrams` is 0, or if reference rows
    /// are ragged or non-finite.
    pub fn fit<W, R>(reference: &[W], config: KernelConfig, rng: &mut R) -> Result<Self>
    where
        W: AsRef<[f32]>,
        R: Rng + ?Sized,
    {
        let dim = validate_reference(reference, config)?;
        Self::fit_validated(reference, dim, config, rng)
    }

    fn fit_validated<W, R>(
        reference: &[W],
        dim: usize,
        config: KernelConfig,
        rng: &mut R,
    ) -> Result<Self>
    where
        W: AsRef<[f32]>,
        R: Rng + ?Sized,
    {
        let reference_len = reference.len();
        debug!(
            reference_len,
            dim,
            cells = config.cells,
            diagrams = config.diagrams,
            "fitting isolation kernel"
        );
        if config.cells == reference_len {
            debug!("cell count equals reference size; every partition holds the whole reference set");
        }

        let mut partitions = Vec::with_capacity(config.diagrams);
        let mut coords = Vec::with_capacity(config.diagrams);
        for diagram in 0..config.diagrams {
            let centers = sampling::sample_indices(rng, reference_len, config.cells)?;
            trace!(diagram, ?centers, "drew partition");

            coords.push(
                centers
                    .iter()
                    .flat_map(|&i| reference[i].as_ref().iter().copied())
                    .collect(),
            );
            partitions.push(Partition { centers });
        }

        Ok(Self {
            config,
            dim,
            reference_len,
            partitions,
            coords,
        })
    }

    /// Configuration used to fit.
    #[must_use]
    pub const fn config(&self) -> KernelConfig {
        self.config
    }

    /// Dimensionality D of the fitted space.
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Size S of the reference set.
    #[must_use]
    pub const fn reference_len(&self) -> usize {
        self.reference_len
    }

    /// The `t` partitions, in draw order (= column block order).
    #[must_use]
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Map `data` onto the fitted partitions.
    ///
    /// Deterministic: no randomness is consumed after fitting.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a row's length differs from [`dim`](Self::dim)
    /// or holds a non-finite value.
    pub fn transform<V: AsRef<[f32]>>(&self, data: &[V]) -> Result<FeatureMatrix> {
        self.transform_with(data, &BruteForce)
    }

    /// [`transform`](Self::transform) with a custom nearest-center backend.
    ///
    /// # Errors
    ///
    /// Same as [`transform`](Self::transform), plus `InvalidNeighbor` when
    /// `search` answers `None`, an index outside `0..cells`, or a batch of
    /// the wrong length.
    pub fn transform_with<V, S>(&self, data: &[V], search: &S) -> Result<FeatureMatrix>
    where
        V: AsRef<[f32]>,
        S: NearestSearch + ?Sized,
    {
        validate_rows(data, self.dim)?;
        self.map_rows(data, search)
    }

    /// Self-similarity of `data` under the fitted partitions.
    ///
    /// # Errors
    ///
    /// Same as [`transform`](Self::transform).
    pub fn similarity<V: AsRef<[f32]>>(&self, data: &[V]) -> Result<SimilarityMatrix> {
        Ok(self.transform(data)?.similarity())
    }

    /// Similarity of every row of `a` to every row of `b` (`|a| × |b|`).
    ///
    /// # Errors
    ///
    /// Same as [`transform`](Self::transform), for either input.
    pub fn cross_similarity<V, W>(&self, a: &[V], b: &[W]) -> Result<SimilarityMatrix>
    where
        V: AsRef<[f32]>,
        W: AsRef<[f32]>,
    {
        let fa = self.transform(a)?;
        let fb = self.transform(b)?;
        Ok(fa.cross_similarity(&fb))
    }

    /// Nearest-center assignment for already validated rows.
    fn map_rows<V, S>(&self, data: &[V], search: &S) -> Result<FeatureMatrix>
    where
        V: AsRef<[f32]>,
        S: NearestSearch + ?Sized,
    {
        let rows = data.len();
        let cells = self.config.cells;
        let diagrams = self.config.diagrams;
        debug!(rows, storage = ?self.config.storage, "mapping points onto partitions");

        let queries = as_slices(data);
        let dim = self.dim;
        let block = |(diagram, coords): (usize, &Vec<f32>)| -> Result<Vec<usize>> {
            let centers: Vec<&[f32]> = if dim == 0 {
                let empty: &[f32] = &[];
                vec![empty; cells]
            } else {
                coords.chunks_exact(dim).collect()
            };
            let hits = search.nearest_batch(&centers, &queries);
            if hits.len() != rows {
                return Err(ArgumentError::InvalidNeighbor {
                    row: hits.len().min(rows),
                    diagram,
                    got: None,
                    cells,
                }
                .into());
            }
            hits.into_iter()
                .enumerate()
                .map(|(row, hit)| -> Result<usize> {
                    match hit {
                        Some(n) if n.index < cells => Ok(n.index),
                        other => Err(ArgumentError::InvalidNeighbor {
                            row,
                            diagram,
                            got: other.map(|n| n.index),
                            cells,
                        }
                        .into()),
                    }
                })
                .collect()
        };

        #[cfg(feature = "parallel")]
        let blocks: Vec<Vec<usize>> = self
            .coords
            .par_iter()
            .enumerate()
            .map(block)
            .collect::<Result<_>>()?;
        #[cfg(not(feature = "parallel"))]
        let blocks: Vec<Vec<usize>> = self
            .coords
            .iter()
            .enumerate()
            .map(block)
            .collect::<Result<_>>()?;

        let mut assignments = vec![0usize; rows * diagrams];
        for (diagram, column) in blocks.iter().enumerate() {
            for (row, &cell) in column.iter().enumerate() {
                assignments[row * diagrams + diagram] = cell;
            }
        }

        Ok(FeatureMatrix::from_assignments(
            rows,
            cells,
            diagrams,
            &assignments,
            self.config.storage,
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Check config against the reference set; returns its dimensionality.
fn validate_reference<W: AsRef<[f32]>>(reference: &[W], config: KernelConfig) -> Result<usize> {
    if config.cells == 0 {
        return Err(ArgumentError::ZeroCellCount.into());
    }
    if config.diagrams == 0 {
        return Err(ArgumentError::ZeroDiagramCount.into());
    }
    if config.cells > reference.len() {
        return Err(ArgumentError::CellCountExceedsReference {
            cells: config.cells,
            reference_len: reference.len(),
        }
        .into());
    }
    let dim = reference.first().map_or(0, |r| r.as_ref().len());
    validate_rows(reference, dim)?;
    Ok(dim)
}

fn validate_rows<V: AsRef<[f32]>>(rows: &[V], dim: usize) -> Result<()> {
    for (row, values) in rows.iter().enumerate() {
        let values = values.as_ref();
        if values.len() != dim {
            return Err(ArgumentError::DimensionMismatch {
                row,
                expected: dim,
                got: values.len(),
            }
            .into());
        }
        if let Some(col) = values.iter().position(|v| !v.is_finite()) {
            return Err(ArgumentError::NonFinite { row, col }.into());
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────


// ─────────────────────────────────────────────────────────────────────────────
// Property Tests
// ─────────────────────────────────────────────────────────────────────────────

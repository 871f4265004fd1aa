//! Nearest-center search.
//!
//! Assigning a point to a partition cell is a 1-NN query against the
//! partition's `ψ` centers under Euclidean distance.
//!
//! ## Usage
//!
//! This module provides a trait-based API. [`BruteForce`] is an exact linear
//! scan and is what the kernel uses by default; implement [`NearestSearch`]
//! to plug in your own index (KD-tree, HNSW, GPU).
//!
//! ```rust
//! use isolation_kernel::nearest::{BruteForce, NearestSearch};
//!
//! let c0 = [0.0, 0.0];
//! let c1 = [10.0, 0.0];
//! let centers: Vec<&[f32]> = vec![&c0, &c1];
//!
//! let hit = BruteForce.nearest(&centers, &[7.0, 1.0]).unwrap();
//! assert_eq!(hit.index, 1);
//! ```
//!
//! ## Ties
//!
//! A query exactly equidistant from several centers goes to the lowest
//! index. Euclidean geometry does not define a winner; this rule only keeps
//! results reproducible. Custom backends should follow it if their output
//! is compared against [`BruteForce`].

use crate::simd;

/// Result of a nearest-center query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the center within the slice that was searched.
    pub index: usize,
    /// Euclidean distance to that center.
    pub distance: f32,
}

/// Trait for 1-NN backends.
///
/// Implementors answer "which of these centers is closest to this query"
/// under Euclidean distance.
pub trait NearestSearch: Send + Sync {
    /// Nearest center to `query`, or `None` if `centers` is empty.
    fn nearest(&self, centers: &[&[f32]], query: &[f32]) -> Option<Neighbor>;

    /// Nearest center for each query, in query order.
    fn nearest_batch(&self, centers: &[&[f32]], queries: &[&[f32]]) -> Vec<Option<Neighbor>> {
        queries.iter().map(|q| self.nearest(centers, q)).collect()
    }
}

/// Exact linear scan over squared L2 distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BruteForce;

impl NearestSearch for BruteForce {
    fn nearest(&self, centers: &[&[f32]], query: &[f32]) -> Option<Neighbor> {
        let (index, d) = argmin(centers.iter().map(|c| simd::l2_squared(c, query)))?;
        if d.is_finite() {
            return Some(Neighbor {
                index,
                distance: d.sqrt(),
            });
        }
        // Every f32 distance overflowed; only the wide sums can order them.
        let (index, d) = argmin(centers.iter().map(|c| simd::l2_squared_wide(c, query)))?;
        Some(Neighbor {
            index,
            distance: d.sqrt() as f32,
        })
    }
}

/// Position and value of the smallest distance, lowest index on ties.
fn argmin<T: PartialOrd + Copy>(distances: impl Iterator<Item = T>) -> Option<(usize, T)> {
    let mut best: Option<(usize, T)> = None;
    for (index, d) in distances.enumerate() {
        // Strict `<` keeps the lowest index among exact ties.
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((index, d)),
        }
    }
    best
}

impl<T: NearestSearch + ?Sized> NearestSearch for &T {
    fn nearest(&self, centers: &[&[f32]], query: &[f32]) -> Option<Neighbor> {
        (**self).nearest(centers, query)
    }

    fn nearest_batch(&self, centers: &[&[f32]], queries: &[&[f32]]) -> Vec<Option<Neighbor>> {
        (**self).nearest_batch(centers, queries)
    }
}

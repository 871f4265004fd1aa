//! Uniform sampling of partition centers.
//!
//! Each partition draws `ψ` distinct reference indices. The draw goes through
//! a caller-owned [`rand::Rng`], so seeding that generator is the only knob
//! for reproducibility; nothing here touches thread-local or global state.

use rand::Rng;

use crate::{ArgumentError, Result};

/// Draw `amount` distinct indices from `0..population`, uniformly without
/// replacement.
///
/// Indices come back in draw order, not sorted. The same seed always yields
/// the same sequence.
///
/// # Errors
///
/// - [`ArgumentError::ZeroCellCount`] if `amount == 0`
/// - [`ArgumentError::CellCountExceedsReference`] if `amount > population`
///
/// # Example
///
/// ```rust
/// use isolation_kernel::sampling::sample_indices;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let picked = sample_indices(&mut rng, 10, 3).unwrap();
/// assert_eq!(picked.len(), 3);
/// assert!(picked.iter().all(|&i| i < 10));
/// ```
pub fn sample_indices<R: Rng + ?Sized>(
    rng: &mut R,
    population: usize,
    amount: usize,
) -> Result<Vec<usize>> {
    if amount == 0 {
        return Err(ArgumentError::ZeroCellCount.into());
    }
    if amount > population {
        return Err(ArgumentError::CellCountExceedsReference {
            cells: amount,
            reference_len: population,
        }
        .into());
    }
    Ok(rand::seq::index::sample(rng, population, amount).into_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KernelError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn indices_are_distinct_and_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..50 {
            let picked = sample_indices(&mut rng, 20, 7).unwrap();
            assert_eq!(picked.len(), 7);
            let unique: HashSet<_> = picked.iter().copied().collect();
            assert_eq!(unique.len(), 7);
            assert!(picked.iter().all(|&i| i < 20));
        }
    }

    #[test]
    fn full_population_is_a_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut picked = sample_indices(&mut rng, 9, 9).unwrap();
        picked.sort_unstable();
        assert_eq!(picked, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_draw() {
        let a = sample_indices(&mut ChaCha8Rng::seed_from_u64(11), 100, 16).unwrap();
        let b = sample_indices(&mut ChaCha8Rng::seed_from_u64(11), 100, 16).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_oversized_sample() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = sample_indices(&mut rng, 3, 4).unwrap_err();
        assert_eq!(
            err,
            KernelError::InvalidArgument(ArgumentError::CellCountExceedsReference {
                cells: 4,
                reference_len: 3
            })
        );
    }

    #[test]
    fn rejects_empty_sample() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            sample_indices(&mut rng, 3, 0),
            Err(KernelError::InvalidArgument(ArgumentError::ZeroCellCount))
        ));
    }

    #[test]
    fn roughly_uniform() {
        // 4000 draws of 1 from 4: each bucket should be near 1000.
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            counts[sample_indices(&mut rng, 4, 1).unwrap()[0]] += 1;
        }
        for c in counts {
            assert!((800..1200).contains(&c), "skewed counts: {:?}", counts);
        }
    }
}

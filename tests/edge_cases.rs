//! Edge case tests for kernel construction.

use isolation_kernel::{kernel, ArgumentError, IsolationKernel, KernelConfig, KernelError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(0)
}

#[test]
fn single_point_single_cell() {
    let data = vec![vec![3.0, -1.0]];
    let sim = kernel::build_similarity(&data, KernelConfig::new(1, 5), &mut rng()).unwrap();
    assert_eq!(sim.as_slice(), &[1.0]);
}

#[test]
fn one_cell_puts_everything_together() {
    // ψ = 1: a single center owns the whole space.
    let data = vec![vec![0.0], vec![100.0], vec![-50.0]];
    let sim = kernel::build_similarity(&data, KernelConfig::new(1, 10), &mut rng()).unwrap();
    assert!(sim.as_slice().iter().all(|&v| v == 1.0));
}

#[test]
fn one_diagram_is_binary() {
    let data = vec![vec![0.0], vec![1.0], vec![5.0], vec![6.0]];
    let sim = kernel::build_similarity(&data, KernelConfig::new(2, 1), &mut rng()).unwrap();
    assert!(sim.as_slice().iter().all(|&v| v == 0.0 || v == 1.0));
}

#[test]
fn duplicate_points_always_share_cells() {
    let data = vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![4.0, 0.0], vec![-2.0, 3.0]];
    let sim = kernel::build_similarity(&data, KernelConfig::new(3, 40), &mut rng()).unwrap();
    assert_eq!(sim.get(0, 1), 1.0);
}

#[test]
fn borrowed_slices_accepted() {
    let a = [0.0f32, 0.0];
    let b = [1.0f32, 1.0];
    let rows: Vec<&[f32]> = vec![&a, &b];
    let f = kernel::build_features(&rows, KernelConfig::new(2, 3), &mut rng()).unwrap();
    assert_eq!(f.rows(), 2);
}

#[test]
fn empty_reference_rejected() {
    let data = vec![vec![0.0]];
    let reference: Vec<Vec<f32>> = Vec::new();
    let err = kernel::build_features_with_reference(&data, &reference, KernelConfig::new(1, 1), &mut rng())
        .unwrap_err();
    assert_eq!(
        err,
        KernelError::InvalidArgument(ArgumentError::CellCountExceedsReference {
            cells: 1,
            reference_len: 0
        })
    );
}

#[test]
fn infinite_value_rejected() {
    let reference = vec![vec![0.0, f32::INFINITY]];
    let err = IsolationKernel::fit(&reference, KernelConfig::new(1, 1), &mut rng()).unwrap_err();
    assert!(matches!(
        err,
        KernelError::InvalidArgument(ArgumentError::NonFinite { row: 0, col: 1 })
    ));
}

#[test]
fn error_display_is_descriptive() {
    let data = vec![vec![0.0]];
    let err = kernel::build_features(&data, KernelConfig::new(2, 1), &mut rng()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid argument: cell count 2 exceeds reference size 1"
    );
}

#[test]
fn fitted_kernel_reports_shape() {
    let data = vec![vec![0.0, 1.0, 2.0]; 5];
    let ik = IsolationKernel::fit(&data, KernelConfig::new(2, 7), &mut rng()).unwrap();
    assert_eq!(ik.dim(), 3);
    assert_eq!(ik.reference_len(), 5);
    assert_eq!(ik.partitions().len(), 7);
    assert!(ik.partitions().iter().all(|p| p.len() == 2 && !p.is_empty()));
    assert_eq!(ik.config(), KernelConfig::new(2, 7));
}

#![no_main]

use isolation_kernel::{kernel, KernelConfig};
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }

    let mut offset = 0;
    let n_points = (data[offset] as usize % 24) + 1; // 1-24 points
    offset += 1;
    let dim = data[offset] as usize % 8; // 0-7 dimensions
    offset += 1;
    let cells = data[offset] as usize % 32; // may exceed n_points or be 0
    offset += 1;
    let diagrams = data[offset] as usize % 16; // may be 0
    offset += 1;
    let sparse = data[offset] & 1 == 1;
    offset += 1;

    let required_bytes = n_points * dim * 4;
    if data.len() < offset + required_bytes {
        return;
    }

    // Non-finite values are allowed through: they must be rejected, not panic
    let mut points = Vec::with_capacity(n_points);
    for _ in 0..n_points {
        let mut point = Vec::with_capacity(dim);
        for _ in 0..dim {
            let val = f32::from_le_bytes(data[offset..offset + 4].try_into().unwrap());
            point.push(val);
            offset += 4;
        }
        points.push(point);
    }

    let config = KernelConfig::new(cells, diagrams);
    let config = if sparse { config.sparse() } else { config };
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(data[0]));

    if let Ok(sim) = kernel::build_similarity(&points, config, &mut rng) {
        assert!(sim.is_symmetric(0.0));
        for i in 0..sim.rows() {
            assert_eq!(sim.get(i, i), 1.0);
        }
        assert!(sim.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    }
});

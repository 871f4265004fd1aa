use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use isolation_kernel::{kernel, simd, IsolationKernel, KernelConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn random_points(n: usize, dim: usize, seed: u64) -> Vec<Vec<f32>> {
    // Simple LCG for reproducible "random" vectors
    let mut x = seed;
    (0..n)
        .map(|_| {
            (0..dim)
                .map(|_| {
                    x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
                    (x as f32 / u64::MAX as f32) * 2.0 - 1.0
                })
                .collect()
        })
        .collect()
}

fn bench_simd(c: &mut Criterion) {
    let mut g = c.benchmark_group("simd");

    for &dim in &[4, 32, 128, 768] {
        let v = random_points(2, dim, 1);

        g.bench_with_input(BenchmarkId::new("l2_squared", dim), &dim, |bench, _| {
            bench.iter(|| black_box(simd::l2_squared(&v[0], &v[1])));
        });
    }

    g.finish();
}

fn bench_fit(c: &mut Criterion) {
    let mut g = c.benchmark_group("fit");

    let reference = random_points(1000, 16, 2);
    for &psi in &[4, 16, 64, 256] {
        g.bench_with_input(BenchmarkId::new("t200", psi), &psi, |bench, &psi| {
            bench.iter(|| {
                let mut rng = ChaCha8Rng::seed_from_u64(0);
                black_box(IsolationKernel::fit(&reference, KernelConfig::new(psi, 200), &mut rng))
            });
        });
    }

    g.finish();
}

fn bench_transform(c: &mut Criterion) {
    let mut g = c.benchmark_group("transform");

    // Iris-sized: 150 points, 4 dims
    let data = random_points(150, 4, 3);
    for &psi in &[2, 16, 64] {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let dense = IsolationKernel::fit(&data, KernelConfig::new(psi, 200), &mut rng).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let sparse =
            IsolationKernel::fit(&data, KernelConfig::new(psi, 200).sparse(), &mut rng).unwrap();

        g.bench_with_input(BenchmarkId::new("dense", psi), &psi, |bench, _| {
            bench.iter(|| black_box(dense.transform(&data)));
        });
        g.bench_with_input(BenchmarkId::new("sparse", psi), &psi, |bench, _| {
            bench.iter(|| black_box(sparse.transform(&data)));
        });
    }

    g.finish();
}

fn bench_similarity(c: &mut Criterion) {
    let mut g = c.benchmark_group("similarity");

    for &n in &[150, 500] {
        let data = random_points(n, 4, 4);
        g.bench_with_input(BenchmarkId::new("psi16_t200", n), &n, |bench, _| {
            bench.iter(|| {
                let mut rng = ChaCha8Rng::seed_from_u64(0);
                black_box(kernel::build_similarity(
                    &data,
                    KernelConfig::new(16, 200).sparse(),
                    &mut rng,
                ))
            });
        });
    }

    g.finish();
}

criterion_group!(benches, bench_simd, bench_fit, bench_transform, bench_similarity);
criterion_main!(benches);

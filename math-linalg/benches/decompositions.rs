use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use math_audio_linalg::{DenseMatrix, DenseVector, LuFactorization, SvdDecomposition};

/// Diagonally dominant test matrix, deterministic for a given size
fn test_matrix(n: usize) -> DenseMatrix {
    DenseMatrix::from_fn(n, n, |i, j| {
        if i == j {
            n as f64 + 1.0
        } else {
            ((i * 7 + j * 13) % 11) as f64 / 11.0 - 0.5
        }
    })
}

fn bench_lu(c: &mut Criterion) {
    let mut group = c.benchmark_group("lu");
    for &n in &[8, 32, 128] {
        let a = test_matrix(n);
        let b = DenseVector::from_slice(&vec![1.0; n]);

        group.bench_with_input(BenchmarkId::new("decompose", n), &a, |bench, a| {
            let mut lu = a.clone();
            let mut perm = vec![0; n];
            bench.iter(|| {
                lu.set_from(a);
                black_box(lu.lu_decompose(&mut perm).unwrap());
            })
        });

        let lu = LuFactorization::new(&a).unwrap();
        group.bench_with_input(BenchmarkId::new("back_solve", n), &b, |bench, b| {
            let mut x = DenseVector::zeros(n);
            bench.iter(|| {
                lu.solve_into(black_box(b), &mut x).unwrap();
            })
        });
    }
    group.finish();
}

fn bench_inverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("inverse");
    for &n in &[8, 32, 128] {
        let a = test_matrix(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &a, |bench, a| {
            bench.iter(|| black_box(a.inverse().unwrap()))
        });
    }
    group.finish();
}

fn bench_svd(c: &mut Criterion) {
    let mut group = c.benchmark_group("svd");
    group.sample_size(20);
    for &(m, n) in &[(8, 8), (32, 16), (16, 32), (64, 64)] {
        let a = DenseMatrix::from_fn(m, n, |i, j| ((i * 5 + j * 3) % 17) as f64 - 8.0);
        let id = BenchmarkId::new("decompose", format!("{m}x{n}"));
        group.bench_with_input(id, &a, |bench, a| {
            bench.iter(|| black_box(SvdDecomposition::new(a).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lu, bench_inverse, bench_svd);
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use spexpr::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn dense_f64(n: usize, seed: usize) -> DenseMatrix<f64> {
    DenseMatrix::from_fn(n, n, 1, |r, c, _| {
        ((r * 31 + c * 17 + seed) % 1000) as f64 / 1000.0
    })
}

/// Banded CSR pattern with `2 * half_width + 1` nonzeros per full row
fn banded_pattern(n: usize, half_width: usize) -> std::sync::Arc<SparsityPattern> {
    let mut outer = vec![0i32];
    let mut inner = Vec::new();
    for row in 0..n {
        let lo = row.saturating_sub(half_width);
        let hi = (row + half_width + 1).min(n);
        inner.extend((lo..hi).map(|c| c as i32));
        outer.push(inner.len() as i32);
    }
    SparsityPattern::csr(n, n, outer, inner)
        .expect("valid band")
        .into_shared()
}

// ---------------------------------------------------------------------------
// Structural evaluation of a cwise expression vs full dense evaluation
// ---------------------------------------------------------------------------

fn bench_cwise(c: &mut Criterion) {
    let mut group = c.benchmark_group("cwise_add_f64");
    for n in [256usize, 1024] {
        let a = dense_f64(n, 3);
        let b = dense_f64(n, 7);
        let pattern = banded_pattern(n, 2);

        group.bench_with_input(BenchmarkId::new("sparse_view", n), &n, |bench, _| {
            bench.iter(|| {
                let bound = (&a)
                    .cwise_add(&b)
                    .and_then(|e| e.sparse_view::<Csr>(&pattern))
                    .expect("bind");
                black_box(bound.eval_sparse().expect("eval"))
            })
        });
        group.bench_with_input(BenchmarkId::new("dense", n), &n, |bench, _| {
            bench.iter(|| black_box((&a).cwise_add(&b).and_then(|e| e.eval()).expect("eval")))
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Binding a product: one materialization, then structural reads
// ---------------------------------------------------------------------------

fn bench_product(c: &mut Criterion) {
    let mut group = c.benchmark_group("matmul_sparse_view_f64");
    for n in [64usize, 128] {
        let a = dense_f64(n, 1);
        let b = dense_f64(n, 2);
        let pattern = banded_pattern(n, 1);

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, _| {
            bench.iter(|| {
                let bound = (&a)
                    .matmul(&b)
                    .and_then(|e| e.sparse_view::<Csr>(&pattern))
                    .expect("bind");
                black_box(bound.eval_sparse().expect("eval"))
            })
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Sequential vs parallel structural sum
// ---------------------------------------------------------------------------

fn bench_sum(c: &mut Criterion) {
    let n = 2048;
    let a = dense_f64(n, 5);
    let pattern = banded_pattern(n, 8);
    let bound = (&a).sparse_view::<Csr>(&pattern).expect("bind");

    let mut group = c.benchmark_group("structural_sum_f64");
    for (name, config) in [
        ("sequential", EvalConfig::sequential()),
        ("parallel", EvalConfig::default().with_parallel(true)),
    ] {
        group.bench_function(name, |bench| {
            bench.iter(|| black_box(spexpr::eval::sum_with(&bound, &config).expect("sum")))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cwise, bench_product, bench_sum);
criterion_main!(benches);

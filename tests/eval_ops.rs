//! Integration tests for lazy operations and evaluation sinks

mod common;

use common::{assert_allclose_f64, configs, rng};
use rand::Rng;
use spexpr::error::Error;
use spexpr::eval::{self, EvalConfig};
use spexpr::expr::{DenseMatrix, MatrixExpr};

fn random_matrix(seed: u64, rows: usize, cols: usize, batches: usize) -> DenseMatrix<f64> {
    let mut rng = rng(seed);
    DenseMatrix::from_fn(rows, cols, batches, |_, _, _| rng.random_range(-1.0..1.0))
}

#[test]
fn test_cwise_expression_matches_direct_computation() {
    let a = random_matrix(1, 7, 5, 3);
    let b = random_matrix(2, 7, 5, 3);
    let c = random_matrix(3, 7, 5, 3);

    // (a + b) * c - 2a
    let expr = (&a)
        .cwise_add(&b)
        .unwrap()
        .cwise_mul(&c)
        .unwrap()
        .cwise_sub((&a).scale(2.0).unwrap())
        .unwrap();

    let expected: Vec<f64> = a
        .data()
        .iter()
        .zip(b.data())
        .zip(c.data())
        .map(|((x, y), z)| (x + y) * z - 2.0 * x)
        .collect();

    for config in configs() {
        let out = eval::eval_dense(&expr, &config).unwrap();
        assert_allclose_f64(out.data(), &expected, 1e-12, 1e-12, "cwise");
    }
}

#[test]
fn test_batched_product() {
    let a = random_matrix(4, 3, 4, 2);
    let b = random_matrix(5, 4, 2, 2);
    let product = (&a).matmul(&b).unwrap();
    assert_eq!(product.shape(), [3, 2]);
    assert_eq!(product.batches(), 2);

    let out = product.eval().unwrap();
    for batch in 0..2 {
        for row in 0..3 {
            for col in 0..2 {
                let expected: f64 = (0..4)
                    .map(|k| a.get(row, k, batch) * b.get(k, col, batch))
                    .sum();
                assert!((out.get(row, col, batch) - expected).abs() < 1e-12);
            }
        }
    }
}

#[test]
fn test_operand_mismatches_are_reported() {
    let a = DenseMatrix::<f32>::zeros(2, 3, 1);
    let b = DenseMatrix::<f32>::zeros(3, 2, 1);
    let c = DenseMatrix::<f32>::zeros(2, 3, 2);

    assert!(matches!(
        (&a).cwise_add(&b),
        Err(Error::ShapeMismatch { .. })
    ));
    assert!(matches!(
        (&a).cwise_mul(&c),
        Err(Error::ShapeMismatch { .. })
    ));
    assert!(matches!((&a).matmul(&a), Err(Error::ShapeMismatch { .. })));
    assert!(matches!((&a).matmul(&c), Err(Error::ShapeMismatch { .. })));
}

#[test]
fn test_assign_into_dense() {
    let a = DenseMatrix::from_row_major(2, 2, &[1i64, 2, 3, 4]).unwrap();
    let b = DenseMatrix::from_row_major(2, 2, &[10i64, 20, 30, 40]).unwrap();

    for config in configs() {
        let mut out = DenseMatrix::<i64>::zeros(2, 2, 1);
        eval::assign_with(&mut out, &(&a).cwise_sub(&b).unwrap(), &config).unwrap();
        assert_eq!(out.data(), &[-9, -27, -18, -36]);
    }

    let mut wrong = DenseMatrix::<i64>::zeros(2, 3, 1);
    assert!(matches!(
        eval::assign(&mut wrong, &a),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn test_sum() {
    let a = DenseMatrix::from_fn(4, 4, 3, |r, c, b| (r + c + b) as i32);
    let expected: i32 = a.data().iter().sum();
    let squared = DenseMatrix::from_fn(4, 4, 3, |r, c, b| {
        (0..4).map(|k| a.get(r, k, b) * a.get(k, c, b)).sum()
    });
    for config in configs() {
        assert_eq!(eval::sum_with(&a, &config).unwrap(), expected);
        let product_sum = eval::sum_with(&(&a).matmul(&a).unwrap(), &config).unwrap();
        assert_eq!(product_sum, eval::sum(&squared).unwrap());
    }
}

#[test]
fn test_sequential_and_parallel_agree() {
    let a = random_matrix(6, 33, 17, 4);
    let b = random_matrix(7, 33, 17, 4);
    let expr = (&a).cwise_mul(&b).unwrap();

    let seq = eval::eval_dense(&expr, &EvalConfig::sequential()).unwrap();
    let par = eval::eval_dense(
        &expr,
        &EvalConfig::default().with_parallel(true).with_min_len(1),
    )
    .unwrap();
    assert_eq!(seq, par);
}

#[test]
fn test_config_builders() {
    let config = EvalConfig::sequential().with_min_len(0);
    assert!(!config.parallel());
    assert_eq!(config.min_len(), 1);
    assert_eq!(
        EvalConfig::sequential().with_parallel(true).parallel(),
        cfg!(feature = "rayon")
    );
}

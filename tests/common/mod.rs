//! Common test utilities
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spexpr::eval::EvalConfig;
use spexpr::sparse::{SparsityPattern, StorageFormat};

/// Seeded RNG so failures reproduce
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Sequential and parallel configurations, to run each check under both
pub fn configs() -> [EvalConfig; 2] {
    [
        EvalConfig::sequential(),
        EvalConfig::default().with_parallel(true).with_min_len(1),
    ]
}

/// Random canonical pattern where each position is stored with probability
/// `density`
pub fn random_pattern(
    rng: &mut StdRng,
    format: StorageFormat,
    rows: usize,
    cols: usize,
    density: f64,
) -> SparsityPattern {
    let (outer_size, inner_size) = match format {
        StorageFormat::Csc => (cols, rows),
        _ => (rows, cols),
    };
    let mut outer = vec![0i32];
    let mut inner = Vec::new();
    for _ in 0..outer_size {
        for i in 0..inner_size {
            if rng.random_bool(density) {
                inner.push(i as i32);
            }
        }
        outer.push(inner.len() as i32);
    }
    SparsityPattern::new(format, [rows, cols], outer, inner).unwrap()
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

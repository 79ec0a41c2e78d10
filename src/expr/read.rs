//! Read-access wrapper: hold a child directly or materialize it once

use std::sync::Arc;

use crate::error::Result;
use crate::sparse::SparsityPattern;

use super::dense::DenseMatrix;
use super::traits::{AccessFlags, MatrixExpr};

/// A child expression prepared for repeated coefficient reads
///
/// The variant is chosen when the wrapper is built and never changes:
///
/// - `Direct` keeps the child and forwards every read to it.
/// - `Materialized` evaluated the child once into dense storage and reads from
///   that buffer afterwards.
#[derive(Debug, Clone)]
pub enum ReadWrapper<C: MatrixExpr> {
    /// The child is read in place
    Direct(C),
    /// The child was evaluated into a temporary
    Materialized(DenseMatrix<C::Scalar>),
}

impl<C: MatrixExpr> ReadWrapper<C> {
    /// Wrap a child that will be read at arbitrary coordinates
    ///
    /// Children with `READ_CWISE` are kept; everything else is evaluated now.
    pub fn new(child: C) -> Result<Self> {
        if C::DESCRIPTOR.is_cwise_readable() {
            Ok(Self::Direct(child))
        } else {
            Self::materialize(&child)
        }
    }

    /// Wrap a child that will only be read at the positions of `pattern`
    ///
    /// In addition to the rule of [`ReadWrapper::new`], a structurally
    /// addressed child stored on the same structure is kept, because the
    /// structural indices handed to it are then its own.
    pub fn for_pattern(child: C, pattern: &Arc<SparsityPattern>) -> Result<Self> {
        let access = C::DESCRIPTOR.access;
        if access.contains(AccessFlags::READ_CWISE) {
            return Ok(Self::Direct(child));
        }
        let shares_structure = access.contains(AccessFlags::READ_STRUCTURED)
            && child
                .bound_pattern()
                .is_some_and(|own| own.same_structure(pattern));
        if shares_structure {
            Ok(Self::Direct(child))
        } else {
            Self::materialize(&child)
        }
    }

    fn materialize(child: &C) -> Result<Self> {
        log::debug!(
            "materializing {}x{}x{} {} child ({:?})",
            child.rows(),
            child.cols(),
            child.batches(),
            C::DESCRIPTOR.format,
            C::DESCRIPTOR.access
        );
        Ok(Self::Materialized(child.eval()?))
    }

    /// True if the child was evaluated into a temporary
    pub fn is_materialized(&self) -> bool {
        matches!(self, Self::Materialized(_))
    }

    /// Read a coefficient from the wrapped child or its temporary
    #[inline]
    pub fn coeff(&self, row: usize, col: usize, batch: usize, index: usize) -> C::Scalar {
        match self {
            Self::Direct(child) => child.coeff(row, col, batch, index),
            Self::Materialized(tmp) => tmp.coeff(row, col, batch, index),
        }
    }

    /// Number of rows of the wrapped child
    pub fn rows(&self) -> usize {
        match self {
            Self::Direct(child) => child.rows(),
            Self::Materialized(tmp) => tmp.rows(),
        }
    }

    /// Number of columns of the wrapped child
    pub fn cols(&self) -> usize {
        match self {
            Self::Direct(child) => child.cols(),
            Self::Materialized(tmp) => tmp.cols(),
        }
    }

    /// Number of batches of the wrapped child
    pub fn batches(&self) -> usize {
        match self {
            Self::Direct(child) => child.batches(),
            Self::Materialized(tmp) => tmp.batches(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Descriptor;
    use crate::sparse::{Csr, SparseMatrix};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Expression that counts how often it is read and claims no cwise access
    struct Counting<'a> {
        reads: &'a AtomicUsize,
    }

    impl MatrixExpr for Counting<'_> {
        type Scalar = f64;

        const DESCRIPTOR: Descriptor =
            Descriptor::dense(crate::dtype::DType::F64, AccessFlags::NONE);

        fn rows(&self) -> usize {
            2
        }

        fn cols(&self) -> usize {
            2
        }

        fn batches(&self) -> usize {
            1
        }

        fn coeff(&self, row: usize, col: usize, _batch: usize, _index: usize) -> f64 {
            self.reads.fetch_add(1, Ordering::Relaxed);
            (row * 2 + col) as f64
        }
    }

    #[test]
    fn test_cwise_child_is_direct() {
        let m = DenseMatrix::from_row_major(2, 2, &[1.0f32, 2.0, 3.0, 4.0]).unwrap();
        let w = ReadWrapper::new(&m).unwrap();
        assert!(!w.is_materialized());
        assert_eq!(w.coeff(1, 0, 0, 0), 3.0);
    }

    #[test]
    fn test_materializes_exactly_once() {
        let reads = AtomicUsize::new(0);
        let w = ReadWrapper::new(Counting { reads: &reads }).unwrap();
        assert!(w.is_materialized());
        assert_eq!(reads.load(Ordering::Relaxed), 4);

        for _ in 0..3 {
            assert_eq!(w.coeff(1, 1, 0, 0), 3.0);
            assert_eq!(w.coeff(0, 1, 0, 0), 1.0);
        }
        assert_eq!(reads.load(Ordering::Relaxed), 4);
        assert_eq!((w.rows(), w.cols(), w.batches()), (2, 2, 1));
    }

    #[test]
    fn test_structured_child_on_same_pattern_is_direct() {
        let pattern = SparsityPattern::csr(2, 2, vec![0, 1, 2], vec![1, 0])
            .unwrap()
            .into_shared();
        let stored =
            SparseMatrix::<f64, Csr>::from_values(&pattern, 1, vec![5.0, 6.0]).unwrap();

        let w = ReadWrapper::for_pattern(&stored, &pattern).unwrap();
        assert!(!w.is_materialized());
        assert_eq!(w.coeff(1, 0, 0, 1), 6.0);

        let other = SparsityPattern::csr(2, 2, vec![0, 1, 2], vec![0, 1])
            .unwrap()
            .into_shared();
        let w = ReadWrapper::for_pattern(&stored, &other).unwrap();
        assert!(w.is_materialized());
        assert_eq!(w.coeff(0, 1, 0, 0), 5.0);
        assert_eq!(w.coeff(0, 0, 0, 0), 0.0);
    }
}

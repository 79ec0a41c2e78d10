//! Sparse matrix values stored on a shared pattern

use std::marker::PhantomData;
use std::sync::Arc;

use super::base::SparseMatrixBase;
use super::format::CompressedFormat;
use super::pattern::SparsityPattern;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::eval::EvalConfig;
use crate::expr::{AccessFlags, Descriptor, Destination, MatrixExpr};

/// Batched sparse matrix: one value per structural nonzero and batch
///
/// Values are laid out batch after batch, each batch in structural order:
/// `values[index + batch * nnz]`. The pattern is shared, never copied.
#[derive(Debug, Clone)]
pub struct SparseMatrix<T: Element, F: CompressedFormat> {
    pattern: Arc<SparsityPattern>,
    batches: usize,
    values: Vec<T>,
    _format: PhantomData<F>,
}

impl<T: Element, F: CompressedFormat> SparseMatrix<T, F> {
    fn check_format(pattern: &SparsityPattern) -> Result<()> {
        if pattern.format() != F::FORMAT {
            return Err(Error::FormatMismatch {
                expected: F::FORMAT,
                got: pattern.format(),
            });
        }
        Ok(())
    }

    /// Create a matrix with all stored values zero
    ///
    /// # Errors
    ///
    /// Returns `FormatMismatch` if the pattern is not in format `F`.
    pub fn zeros(pattern: &Arc<SparsityPattern>, batches: usize) -> Result<Self> {
        Self::check_format(pattern)?;
        Ok(Self {
            pattern: Arc::clone(pattern),
            batches,
            values: vec![T::zero(); pattern.nnz() * batches],
            _format: PhantomData,
        })
    }

    /// Create a matrix from values in structural order, batch after batch
    ///
    /// # Errors
    ///
    /// - `FormatMismatch` if the pattern is not in format `F`
    /// - `ShapeMismatch` if `values.len() != nnz * batches`
    pub fn from_values(
        pattern: &Arc<SparsityPattern>,
        batches: usize,
        values: Vec<T>,
    ) -> Result<Self> {
        Self::check_format(pattern)?;
        let expected = pattern.nnz() * batches;
        if values.len() != expected {
            return Err(Error::shape_mismatch(&[expected], &[values.len()]));
        }
        Ok(Self {
            pattern: Arc::clone(pattern),
            batches,
            values,
            _format: PhantomData,
        })
    }

    /// Evaluate `src` at every position of `pattern`
    ///
    /// # Errors
    ///
    /// See [`Destination::assign_from`]; additionally `FormatMismatch` if the
    /// pattern is not in format `F`.
    pub fn from_expr<S>(pattern: &Arc<SparsityPattern>, src: &S) -> Result<Self>
    where
        S: MatrixExpr<Scalar = T> + ?Sized,
    {
        let mut out = Self::zeros(pattern, src.batches())?;
        out.assign_from(src, &EvalConfig::default())?;
        Ok(out)
    }

    /// All stored values
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable stored values
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Stored values of one batch, in structural order
    pub fn batch_values(&self, batch: usize) -> &[T] {
        let nnz = self.pattern.nnz();
        &self.values[batch * nnz..(batch + 1) * nnz]
    }

    /// Value at (row, col, batch); zero if the position is not stored
    pub fn get(&self, row: usize, col: usize, batch: usize) -> T {
        match self.pattern.position(row, col) {
            Some(index) => self.values[index + batch * self.pattern.nnz()],
            None => T::zero(),
        }
    }

    /// Consume into the value vector
    pub fn into_values(self) -> Vec<T> {
        self.values
    }
}

impl<T: Element, F: CompressedFormat> MatrixExpr for SparseMatrix<T, F> {
    type Scalar = T;

    const DESCRIPTOR: Descriptor = Descriptor {
        format: F::FORMAT,
        ..Descriptor::dense(
            T::DTYPE,
            AccessFlags::READ_STRUCTURED
                .union(AccessFlags::READ_DIRECT)
                .union(AccessFlags::WRITE_DIRECT),
        )
    };

    #[inline]
    fn rows(&self) -> usize {
        self.pattern.rows()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.pattern.cols()
    }

    #[inline]
    fn batches(&self) -> usize {
        self.batches
    }

    #[inline]
    fn coeff(&self, _row: usize, _col: usize, batch: usize, index: usize) -> T {
        self.values[index + batch * self.pattern.nnz()]
    }

    #[inline]
    fn bound_pattern(&self) -> Option<&Arc<SparsityPattern>> {
        Some(&self.pattern)
    }
}

impl<T: Element, F: CompressedFormat> SparseMatrixBase for SparseMatrix<T, F> {
    #[inline]
    fn pattern(&self) -> &Arc<SparsityPattern> {
        &self.pattern
    }
}

impl<T: Element, F: CompressedFormat> Destination for SparseMatrix<T, F> {
    /// Evaluate `src` at this matrix's structural positions
    ///
    /// Compressed sources must share this structure (`PatternMismatch`
    /// otherwise). Dense sources without `READ_CWISE` are materialized first.
    fn assign_from<S>(&mut self, src: &S, config: &EvalConfig) -> Result<()>
    where
        S: MatrixExpr<Scalar = T> + ?Sized,
    {
        crate::eval::check_same_extent(&*self, src)?;
        crate::eval::eval_into_sparse(src, &self.pattern, &mut self.values, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::{Csc, Csr};

    fn pattern_3x3() -> Arc<SparsityPattern> {
        // [x . x]
        // [. x .]
        // [x . x]
        SparsityPattern::csr(3, 3, vec![0, 2, 3, 5], vec![0, 2, 1, 0, 2])
            .unwrap()
            .into_shared()
    }

    #[test]
    fn test_structural_addressing() {
        let p = pattern_3x3();
        let m = SparseMatrix::<f32, Csr>::from_values(
            &p,
            2,
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 10.0, 20.0, 30.0, 40.0, 50.0],
        )
        .unwrap();
        assert_eq!(m.coeff(1, 1, 0, 2), 3.0);
        assert_eq!(m.coeff(2, 2, 1, 4), 50.0);
        assert_eq!(m.get(2, 0, 1), 40.0);
        assert_eq!(m.get(1, 0, 0), 0.0);
        assert_eq!(m.batch_values(1), &[10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(m.stored_len(), 10);
        assert_eq!(m.nnz(), 5);
        assert_eq!(m.outer_size(), 3);
    }

    #[test]
    fn test_format_and_length_checks() {
        let p = pattern_3x3();
        assert!(matches!(
            SparseMatrix::<f32, Csc>::zeros(&p, 1),
            Err(Error::FormatMismatch { .. })
        ));
        assert!(matches!(
            SparseMatrix::<f32, Csr>::from_values(&p, 1, vec![1.0; 4]),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_density() {
        let m = SparseMatrix::<f64, Csr>::zeros(&pattern_3x3(), 1).unwrap();
        assert!((m.density() - 5.0 / 9.0).abs() < 1e-12);
        assert!(!m.is_empty());
        assert!(Arc::ptr_eq(m.pattern(), m.bound_pattern().unwrap()));
    }

    #[test]
    fn test_eval_scatters_to_dense() {
        let p = pattern_3x3();
        let m = SparseMatrix::<i32, Csr>::from_values(&p, 1, vec![1, 2, 3, 4, 5]).unwrap();
        let d = m.eval().unwrap();
        let expected = crate::expr::DenseMatrix::from_row_major(
            3,
            3,
            &[1, 0, 2, 0, 3, 0, 4, 0, 5],
        )
        .unwrap();
        assert_eq!(d, expected);
    }
}

//! Binding of an arbitrary expression to a sparsity pattern

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::sparse::{CompressedFormat, SparseMatrix, SparseMatrixBase, SparsityPattern};

use super::read::ReadWrapper;
use super::traits::{Descriptor, MatrixExpr};

/// A lazy expression restricted to the nonzero positions of a pattern
///
/// The result is sparse in format `F`, read-only, and structured by the bound
/// pattern. Values are not computed at construction: each structural read is
/// forwarded to the wrapped child at the same (row, col, batch), with the
/// structural index passed through so structurally addressed children can use
/// it directly.
///
/// The node has no write path. It does not implement
/// [`Destination`](super::Destination), so it cannot be assigned into:
///
/// ```compile_fail
/// use spexpr::prelude::*;
///
/// let pattern = SparsityPattern::csr(1, 1, vec![0, 1], vec![0])?.into_shared();
/// let src = DenseMatrix::from_row_major(1, 1, &[1.0f32])?;
/// let mut bound = (&src).sparse_view::<Csr>(&pattern)?;
/// spexpr::eval::assign(&mut bound, &src)?;
/// # Ok::<(), spexpr::error::Error>(())
/// ```
///
/// # Example
///
/// ```
/// use spexpr::prelude::*;
///
/// let diag = SparsityPattern::csr(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2])?.into_shared();
/// let src = DenseMatrix::from_row_major(3, 3, &[1.0f32, 9.0, 9.0, 9.0, 2.0, 9.0, 9.0, 9.0, 3.0])?;
///
/// let bound = (&src).sparse_view::<Csr>(&diag)?;
/// assert_eq!(bound.eval_sparse()?.values(), &[1.0, 2.0, 3.0]);
/// # Ok::<(), spexpr::error::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SparseExprOp<C: MatrixExpr, F: CompressedFormat> {
    child: ReadWrapper<C>,
    pattern: Arc<SparsityPattern>,
    batches: usize,
    _format: PhantomData<F>,
}

impl<C: MatrixExpr, F: CompressedFormat> SparseExprOp<C, F> {
    const FORMAT_IS_COMPRESSED: () = assert!(
        F::FORMAT.is_compressed(),
        "sparse bindings require the CSR or CSC format"
    );

    /// Bind `child` to `pattern`
    ///
    /// The batch count is taken from the child; the pattern is shared by all
    /// batches. A child that cannot be read per coefficient is evaluated here,
    /// once.
    ///
    /// # Errors
    ///
    /// - `FormatMismatch` if the pattern is not in format `F`
    /// - `DimensionMismatch` if the child's [rows, cols] differ from the pattern's
    ///
    /// Both are checked before the child is touched.
    pub fn new(child: C, pattern: &Arc<SparsityPattern>) -> Result<Self> {
        #[allow(clippy::let_unit_value)]
        let () = Self::FORMAT_IS_COMPRESSED;

        if pattern.format() != F::FORMAT {
            return Err(Error::FormatMismatch {
                expected: F::FORMAT,
                got: pattern.format(),
            });
        }
        if child.shape() != pattern.shape() {
            return Err(Error::DimensionMismatch {
                expected: pattern.shape(),
                got: child.shape(),
            });
        }

        let batches = child.batches();
        let child = ReadWrapper::for_pattern(child, pattern)?;
        log::debug!(
            "bound {}x{}x{} expression to {} pattern with {} nonzeros ({})",
            pattern.rows(),
            pattern.cols(),
            batches,
            F::FORMAT,
            pattern.nnz(),
            if child.is_materialized() {
                "materialized"
            } else {
                "direct"
            }
        );

        Ok(Self {
            child,
            pattern: Arc::clone(pattern),
            batches,
            _format: PhantomData,
        })
    }

    /// The wrapped child
    pub fn child(&self) -> &ReadWrapper<C> {
        &self.child
    }

    /// Evaluate the stored values into a sparse matrix on the same pattern
    pub fn eval_sparse(&self) -> Result<SparseMatrix<C::Scalar, F>> {
        SparseMatrix::from_expr(&self.pattern, self)
    }
}

impl<C: MatrixExpr, F: CompressedFormat> MatrixExpr for SparseExprOp<C, F> {
    type Scalar = C::Scalar;

    const DESCRIPTOR: Descriptor = C::DESCRIPTOR.bind_sparse(F::FORMAT);

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

    /// Value of the child at (row, col, batch)
    ///
    /// Only defined for positions of the bound pattern; `index` must be the
    /// position's structural index. Nothing is bounds checked.
    #[inline]
    fn coeff(&self, row: usize, col: usize, batch: usize, index: usize) -> C::Scalar {
        self.child.coeff(row, col, batch, index)
    }

    #[inline]
    fn bound_pattern(&self) -> Option<&Arc<SparsityPattern>> {
        Some(&self.pattern)
    }
}

impl<C: MatrixExpr, F: CompressedFormat> SparseMatrixBase for SparseExprOp<C, F> {
    #[inline]
    fn pattern(&self) -> &Arc<SparsityPattern> {
        &self.pattern
    }
}

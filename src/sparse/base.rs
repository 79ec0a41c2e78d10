//! Common contract of sparse-structured expressions

use std::sync::Arc;

use super::format::StorageFormat;
use super::pattern::{SparsityPattern, StorageIndex};
use crate::expr::MatrixExpr;

/// Expression whose nonzero positions are those of a sparsity pattern
///
/// Structure queries are answered by the pattern; dimensions and coefficient
/// reads come from [`MatrixExpr`]. A consumer enumerates positions with
/// [`SparsityPattern::entries`] (or the index arrays directly) and reads each
/// with `coeff(row, col, batch, index)`.
pub trait SparseMatrixBase: MatrixExpr {
    /// The shared pattern
    fn pattern(&self) -> &Arc<SparsityPattern>;

    /// `Csr` or `Csc`
    #[inline]
    fn format(&self) -> StorageFormat {
        self.pattern().format()
    }

    /// Number of structural nonzeros per batch
    #[inline]
    fn nnz(&self) -> usize {
        self.pattern().nnz()
    }

    /// Outer dimension (rows for CSR, columns for CSC)
    #[inline]
    fn outer_size(&self) -> usize {
        self.pattern().outer_size()
    }

    /// Inner dimension (columns for CSR, rows for CSC)
    #[inline]
    fn inner_size(&self) -> usize {
        self.pattern().inner_size()
    }

    /// Outer index array
    #[inline]
    fn outer_indices(&self) -> &[StorageIndex] {
        self.pattern().outer_indices()
    }

    /// Inner index array
    #[inline]
    fn inner_indices(&self) -> &[StorageIndex] {
        self.pattern().inner_indices()
    }

    /// Number of values across all batches (nnz * batches)
    #[inline]
    fn stored_len(&self) -> usize {
        self.nnz() * self.batches()
    }

    /// Returns the sparsity ratio (fraction of zeros)
    ///
    /// Sparsity = 1.0 - (nnz / (rows * cols))
    #[inline]
    fn sparsity(&self) -> f64 {
        let total = (self.rows() * self.cols()) as f64;
        if total == 0.0 {
            0.0
        } else {
            1.0 - (self.nnz() as f64 / total)
        }
    }

    /// Returns the density ratio (fraction of non-zeros)
    #[inline]
    fn density(&self) -> f64 {
        1.0 - self.sparsity()
    }

    /// Returns true if the pattern has no nonzeros
    #[inline]
    fn is_empty(&self) -> bool {
        self.nnz() == 0
    }
}

//! Sparsity pattern: the nonzero topology of a CSR or CSC matrix, without values

use std::ops::Range;
use std::sync::Arc;

use super::format::StorageFormat;
use crate::error::{Error, Result};

/// Integer type of the outer and inner index arrays
pub type StorageIndex = i32;

/// Nonzero topology of a compressed sparse matrix
///
/// For every outer position `o`, `inner[outer[o]..outer[o + 1]]` lists the
/// nonzero inner coordinates of row `o` (CSR) or column `o` (CSC), in strictly
/// increasing order.
///
/// A pattern is validated once at construction and never mutated afterwards.
/// Expressions that use it hold an `Arc<SparsityPattern>`, so the pattern
/// outlives every expression bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparsityPattern {
    rows: usize,
    cols: usize,
    format: StorageFormat,
    outer: Vec<StorageIndex>,
    inner: Vec<StorageIndex>,
}

/// One nonzero position of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseEntry {
    /// Row coordinate
    pub row: usize,
    /// Column coordinate
    pub col: usize,
    /// Offset into the inner-index sequence
    pub index: usize,
}

impl SparsityPattern {
    /// Create a pattern from its index arrays
    ///
    /// # Arguments
    ///
    /// * `format` - `Csr` or `Csc`
    /// * `shape` - Matrix shape [rows, cols]
    /// * `outer` - Segment boundaries (length: outer_size + 1)
    /// * `inner` - Inner coordinate of each nonzero
    ///
    /// # Errors
    ///
    /// - `FormatMismatch` if `format` is not compressed
    /// - `InvalidPattern` if the outer array has the wrong length, does not start
    ///   at 0, decreases, or does not end at `inner.len()`
    /// - `IndexOutOfBounds` if an inner index is outside the inner dimension
    /// - `InvalidPattern` if inner indices are not strictly increasing per segment
    pub fn new(
        format: StorageFormat,
        shape: [usize; 2],
        outer: Vec<StorageIndex>,
        inner: Vec<StorageIndex>,
    ) -> Result<Self> {
        if !format.is_compressed() {
            return Err(Error::FormatMismatch {
                expected: StorageFormat::Csr,
                got: format,
            });
        }

        let [rows, cols] = shape;
        let (outer_size, inner_size) = if format.is_row_major() {
            (rows, cols)
        } else {
            (cols, rows)
        };
        let nnz = inner.len();

        if outer.len() != outer_size + 1 {
            return Err(Error::invalid_pattern(format!(
                "outer index array has length {}, expected {}",
                outer.len(),
                outer_size + 1
            )));
        }
        if outer[0] != 0 {
            return Err(Error::invalid_pattern(format!(
                "outer index array must start at 0, got {}",
                outer[0]
            )));
        }
        if outer[outer_size] < 0 || outer[outer_size] as usize != nnz {
            return Err(Error::invalid_pattern(format!(
                "outer index array must end at nnz = {}, got {}",
                nnz, outer[outer_size]
            )));
        }
        if let Some(o) = outer.windows(2).position(|w| w[0] > w[1]) {
            return Err(Error::invalid_pattern(format!(
                "outer index array decreases at position {}",
                o
            )));
        }

        for o in 0..outer_size {
            let segment = &inner[outer[o] as usize..outer[o + 1] as usize];
            let mut prev: Option<StorageIndex> = None;
            for &i in segment {
                if i < 0 || i as usize >= inner_size {
                    return Err(Error::IndexOutOfBounds {
                        index: i.max(0) as usize,
                        size: inner_size,
                    });
                }
                if prev.is_some_and(|p| i <= p) {
                    return Err(Error::invalid_pattern(format!(
                        "inner indices of segment {} are not strictly increasing",
                        o
                    )));
                }
                prev = Some(i);
            }
        }

        Ok(Self {
            rows,
            cols,
            format,
            outer,
            inner,
        })
    }

    /// Create a CSR pattern (`outer` = row pointers, `inner` = column indices)
    pub fn csr(
        rows: usize,
        cols: usize,
        row_ptrs: Vec<StorageIndex>,
        col_indices: Vec<StorageIndex>,
    ) -> Result<Self> {
        Self::new(StorageFormat::Csr, [rows, cols], row_ptrs, col_indices)
    }

    /// Create a CSC pattern (`outer` = column pointers, `inner` = row indices)
    pub fn csc(
        rows: usize,
        cols: usize,
        col_ptrs: Vec<StorageIndex>,
        row_indices: Vec<StorageIndex>,
    ) -> Result<Self> {
        Self::new(StorageFormat::Csc, [rows, cols], col_ptrs, row_indices)
    }

    /// Create a pattern with no nonzeros
    pub fn empty(format: StorageFormat, shape: [usize; 2]) -> Result<Self> {
        let outer_size = if format.is_col_major() {
            shape[1]
        } else {
            shape[0]
        };
        Self::new(format, shape, vec![0; outer_size + 1], Vec::new())
    }

    /// Wrap in an `Arc` for sharing among expressions
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as [rows, cols]
    #[inline]
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// `Csr` or `Csc`
    #[inline]
    pub fn format(&self) -> StorageFormat {
        self.format
    }

    /// Number of structural nonzeros
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inner.len()
    }

    /// Outer dimension (rows for CSR, columns for CSC)
    #[inline]
    pub fn outer_size(&self) -> usize {
        self.outer.len() - 1
    }

    /// Inner dimension (columns for CSR, rows for CSC)
    #[inline]
    pub fn inner_size(&self) -> usize {
        if self.format.is_col_major() {
            self.rows
        } else {
            self.cols
        }
    }

    /// Outer index array (segment boundaries)
    #[inline]
    pub fn outer_indices(&self) -> &[StorageIndex] {
        &self.outer
    }

    /// Inner index array (one entry per nonzero)
    #[inline]
    pub fn inner_indices(&self) -> &[StorageIndex] {
        &self.inner
    }

    /// Range of structural indices belonging to outer position `outer`
    #[inline]
    pub fn segment(&self, outer: usize) -> Range<usize> {
        self.outer[outer] as usize..self.outer[outer + 1] as usize
    }

    /// Map an (outer, inner) position to (row, col)
    #[inline]
    pub fn to_coords(&self, outer: usize, inner: usize) -> (usize, usize) {
        if self.format.is_col_major() {
            (inner, outer)
        } else {
            (outer, inner)
        }
    }

    /// Structural index of (row, col), or `None` if the position is not stored
    pub fn position(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let (outer, inner) = if self.format.is_col_major() {
            (col, row)
        } else {
            (row, col)
        };
        let range = self.segment(outer);
        self.inner[range.clone()]
            .binary_search(&(inner as StorageIndex))
            .ok()
            .map(|k| range.start + k)
    }

    /// Iterate over all nonzero positions in structural order
    pub fn entries(&self) -> impl Iterator<Item = SparseEntry> + '_ {
        (0..self.outer_size()).flat_map(move |outer| {
            self.segment(outer).map(move |index| {
                let (row, col) = self.to_coords(outer, self.inner[index] as usize);
                SparseEntry { row, col, index }
            })
        })
    }

    /// True if both patterns describe the same structure
    ///
    /// Pointer equality short-circuits the element-wise comparison.
    pub fn same_structure(self: &Arc<Self>, other: &Arc<Self>) -> bool {
        Arc::ptr_eq(self, other) || **self == **other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag3() -> SparsityPattern {
        SparsityPattern::csr(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2]).unwrap()
    }

    #[test]
    fn test_csr_accessors() {
        // [x . x]
        // [. x .]
        // [x . x]
        let p = SparsityPattern::csr(3, 3, vec![0, 2, 3, 5], vec![0, 2, 1, 0, 2]).unwrap();
        assert_eq!(p.shape(), [3, 3]);
        assert_eq!(p.nnz(), 5);
        assert_eq!(p.outer_size(), 3);
        assert_eq!(p.inner_size(), 3);
        assert_eq!(p.segment(0), 0..2);
        assert_eq!(p.position(2, 2), Some(4));
        assert_eq!(p.position(1, 0), None);
        assert_eq!(p.position(5, 0), None);
    }

    #[test]
    fn test_entries_csc_order() {
        // 2x3, column-major nonzeros: (1,0), (0,2), (1,2)
        let p = SparsityPattern::csc(2, 3, vec![0, 1, 1, 3], vec![1, 0, 1]).unwrap();
        let coords: Vec<(usize, usize, usize)> =
            p.entries().map(|e| (e.row, e.col, e.index)).collect();
        assert_eq!(coords, vec![(1, 0, 0), (0, 2, 1), (1, 2, 2)]);
        assert_eq!(p.inner_size(), 2);
        assert_eq!(p.outer_size(), 3);
    }

    #[test]
    fn test_rejects_dense_format() {
        let err = SparsityPattern::new(StorageFormat::Dense, [1, 1], vec![0, 0], vec![]);
        assert!(matches!(
            err,
            Err(Error::FormatMismatch {
                got: StorageFormat::Dense,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_malformed_outer() {
        assert!(SparsityPattern::csr(2, 2, vec![0, 1], vec![0]).is_err());
        assert!(SparsityPattern::csr(2, 2, vec![1, 1, 1], vec![0]).is_err());
        assert!(SparsityPattern::csr(2, 2, vec![0, 2, 1], vec![0]).is_err());
        assert!(SparsityPattern::csr(2, 2, vec![0, 1, 3], vec![0, 1]).is_err());
    }

    #[test]
    fn test_rejects_bad_inner() {
        let err = SparsityPattern::csr(2, 2, vec![0, 1, 2], vec![0, 2]);
        assert_eq!(err, Err(Error::IndexOutOfBounds { index: 2, size: 2 }));

        let err = SparsityPattern::csr(1, 3, vec![0, 2], vec![2, 1]);
        assert!(matches!(err, Err(Error::InvalidPattern { .. })));
    }

    #[test]
    fn test_empty() {
        let p = SparsityPattern::empty(StorageFormat::Csc, [4, 2]).unwrap();
        assert_eq!(p.nnz(), 0);
        assert_eq!(p.outer_indices(), &[0, 0, 0]);
        assert_eq!(p.entries().count(), 0);
    }

    #[test]
    fn test_same_structure() {
        let a = diag3().into_shared();
        let b = diag3().into_shared();
        let c = SparsityPattern::csc(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2])
            .unwrap()
            .into_shared();
        assert!(a.same_structure(&a));
        assert!(a.same_structure(&b));
        assert!(!a.same_structure(&c));
    }
}

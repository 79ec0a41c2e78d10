//! Storage format definitions and the type-level format tags

use std::fmt;

/// Storage format of an expression
///
/// Recorded in every [`Descriptor`](crate::expr::Descriptor). Only the compressed
/// formats can describe a [`SparsityPattern`](super::SparsityPattern).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageFormat {
    /// Every coordinate is addressable (dense or compound expressions)
    Dense,

    /// Compressed Sparse Row (CSR)
    ///
    /// Outer index = row, inner index = column.
    /// Storage: O(nnz + nrows + 1)
    Csr,

    /// Compressed Sparse Column (CSC)
    ///
    /// Outer index = column, inner index = row.
    /// Storage: O(nnz + ncols + 1)
    Csc,
}

impl StorageFormat {
    /// Returns true for CSR and CSC
    #[inline]
    pub const fn is_compressed(self) -> bool {
        matches!(self, StorageFormat::Csr | StorageFormat::Csc)
    }

    /// Returns true if the outer dimension is rows
    #[inline]
    pub const fn is_row_major(self) -> bool {
        matches!(self, StorageFormat::Csr)
    }

    /// Returns true if the outer dimension is columns
    #[inline]
    pub const fn is_col_major(self) -> bool {
        matches!(self, StorageFormat::Csc)
    }

    /// Returns the format name as a string
    pub const fn name(self) -> &'static str {
        match self {
            StorageFormat::Dense => "Dense",
            StorageFormat::Csr => "CSR",
            StorageFormat::Csc => "CSC",
        }
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Csr {}
    impl Sealed for super::Csc {}
}

/// Type-level tag for a compressed storage format
///
/// Sealed: only [`Csr`] and [`Csc`] implement it, so a binding to any other
/// format cannot be written down.
pub trait CompressedFormat:
    sealed::Sealed + Copy + Default + fmt::Debug + Send + Sync + 'static
{
    /// The runtime value of this tag
    const FORMAT: StorageFormat;

    /// Outer dimension length for a matrix of the given shape
    fn outer_size(rows: usize, cols: usize) -> usize;

    /// Inner dimension length for a matrix of the given shape
    fn inner_size(rows: usize, cols: usize) -> usize;

    /// Map an (outer, inner) position to (row, col)
    fn to_coords(outer: usize, inner: usize) -> (usize, usize);
}

/// CSR format tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Csr;

/// CSC format tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Csc;

impl CompressedFormat for Csr {
    const FORMAT: StorageFormat = StorageFormat::Csr;

    #[inline]
    fn outer_size(rows: usize, _cols: usize) -> usize {
        rows
    }

    #[inline]
    fn inner_size(_rows: usize, cols: usize) -> usize {
        cols
    }

    #[inline]
    fn to_coords(outer: usize, inner: usize) -> (usize, usize) {
        (outer, inner)
    }
}

impl CompressedFormat for Csc {
    const FORMAT: StorageFormat = StorageFormat::Csc;

    #[inline]
    fn outer_size(_rows: usize, cols: usize) -> usize {
        cols
    }

    #[inline]
    fn inner_size(rows: usize, _cols: usize) -> usize {
        rows
    }

    #[inline]
    fn to_coords(outer: usize, inner: usize) -> (usize, usize) {
        (inner, outer)
    }
}

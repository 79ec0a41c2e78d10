//! Sparse structure support for spexpr
//!
//! A [`SparsityPattern`] is the nonzero topology of a CSR or CSC matrix,
//! computed elsewhere and shared through an `Arc`. [`SparseMatrix`] stores values
//! on such a pattern; lazy expressions are bound to one with
//! [`MatrixExpr::sparse_view`](crate::expr::MatrixExpr::sparse_view).
//!
//! # Sparse Formats
//!
//! - **CSR** (Compressed Sparse Row): outer index = row. Best for row-wise
//!   traversal.
//! - **CSC** (Compressed Sparse Column): outer index = column. Best for
//!   column-wise traversal.
//!
//! The format is known at runtime ([`StorageFormat`]) and at the type level
//! ([`Csr`], [`Csc`]).

mod base;
mod format;
mod matrix;
mod pattern;

pub use base::SparseMatrixBase;
pub use format::{CompressedFormat, Csc, Csr, StorageFormat};
pub use matrix::SparseMatrix;
pub use pattern::{SparseEntry, SparsityPattern, StorageIndex};

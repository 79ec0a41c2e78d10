//! Lazy matrix expressions
//!
//! Building an expression never computes anything: [`MatrixExpr`] values are
//! trees of nodes that are evaluated when a sink in [`crate::eval`] asks for
//! them. Each node type carries a compile-time [`Descriptor`] derived from its
//! children, which sinks use to choose an evaluation strategy.
//!
//! The central node is [`SparseExprOp`], which restricts an arbitrary
//! expression to the nonzero positions of a [`SparsityPattern`](crate::sparse::SparsityPattern).

mod dense;
mod ops;
mod read;
mod sparse_op;
mod traits;

pub use dense::DenseMatrix;
pub use ops::{AddOp, BinaryFunctor, CwiseBinaryOp, MulOp, ProductOp, ScaleOp, SubOp};
pub use read::ReadWrapper;
pub use sparse_op::SparseExprOp;
pub use traits::{AccessFlags, Descriptor, Destination, Dim, MatrixExpr};

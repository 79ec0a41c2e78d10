//! # spexpr
//!
//! **Lazy matrix expression templates with structural sparse binding.**
//!
//! spexpr represents (batched) dense and sparse matrices as expression trees
//! whose Rust types carry compile-time capability metadata. Operations build
//! new nodes; nothing is computed until a sink (assignment, reduction) forces
//! evaluation, and the sink picks its strategy from the compile-time descriptor
//! rather than by inspecting values at runtime.
//!
//! The core feature is binding an arbitrary expression to a sparsity pattern
//! computed elsewhere: the result is a read-only CSR/CSC expression whose
//! nonzeros are exactly the pattern's and whose values are computed lazily by
//! reading the wrapped expression at each structural position.
//!
//! ## Quick Start
//!
//! ```rust
//! use spexpr::prelude::*;
//!
//! // Nonzero structure from an earlier analysis pass, shared by reference
//! let pattern = SparsityPattern::csr(2, 2, vec![0, 1, 2], vec![1, 0])?.into_shared();
//!
//! let a = DenseMatrix::from_row_major(2, 2, &[1.0f64, 2.0, 3.0, 4.0])?;
//! let b = DenseMatrix::from_row_major(2, 2, &[10.0f64, 20.0, 30.0, 40.0])?;
//!
//! // a + b, evaluated only at (0, 1) and (1, 0)
//! let bound = (&a).cwise_add(&b)?.sparse_view::<Csr>(&pattern)?;
//! let values = bound.eval_sparse()?;
//! assert_eq!(values.values(), &[22.0, 33.0]);
//! # Ok::<(), spexpr::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon` (default): evaluate independent positions in parallel

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dtype;
pub mod error;
pub mod eval;
pub mod expr;
pub mod sparse;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::{DType, Element};
    pub use crate::error::{Error, Result};
    pub use crate::eval::EvalConfig;
    pub use crate::expr::{DenseMatrix, Destination, MatrixExpr, SparseExprOp};
    pub use crate::sparse::{
        Csc, Csr, SparseMatrix, SparseMatrixBase, SparsityPattern, StorageFormat,
    };
}

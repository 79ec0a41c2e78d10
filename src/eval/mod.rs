//! Evaluation sinks: assignment, dense materialization, reduction
//!
//! Sinks are where lazy expressions are finally computed. Each one branches on
//! the source's compile-time [`Descriptor`](crate::expr::Descriptor):
//!
//! - Dense sources are read at every coordinate.
//! - CSR/CSC sources are read only at the structural positions of their
//!   pattern, with the structural index passed to `coeff`.
//!
//! With the `rayon` feature (default) independent positions are evaluated in
//! parallel; [`EvalConfig`] tunes or disables that.

mod assign;
mod config;
mod kernels;

pub use assign::{assign, assign_with, eval_dense, sum, sum_with};
pub use config::EvalConfig;

pub(crate) use assign::{check_same_extent, eval_into_dense, eval_into_sparse};

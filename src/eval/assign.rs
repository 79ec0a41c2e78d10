//! Sinks that force evaluation of lazy expressions

use std::sync::Arc;

use super::config::EvalConfig;
use super::kernels;
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::expr::{DenseMatrix, Destination, MatrixExpr};
use crate::sparse::SparsityPattern;

/// Evaluate `src` into `dst` with the default configuration
///
/// `dst` must be a storage type; lazy expressions (including sparse bindings)
/// are not [`Destination`]s and are rejected at compile time.
pub fn assign<D, S>(dst: &mut D, src: &S) -> Result<()>
where
    D: Destination + ?Sized,
    S: MatrixExpr<Scalar = D::Scalar> + ?Sized,
{
    assign_with(dst, src, &EvalConfig::default())
}

/// Evaluate `src` into `dst`
pub fn assign_with<D, S>(dst: &mut D, src: &S, config: &EvalConfig) -> Result<()>
where
    D: Destination + ?Sized,
    S: MatrixExpr<Scalar = D::Scalar> + ?Sized,
{
    log::trace!(
        "assign {} {:?} source into {} destination ({}x{}x{})",
        S::DESCRIPTOR.format,
        S::DESCRIPTOR.access,
        D::DESCRIPTOR.format,
        src.rows(),
        src.cols(),
        src.batches()
    );
    dst.assign_from(src, config)
}

/// Materialize any expression into a dense matrix
pub fn eval_dense<E>(expr: &E, config: &EvalConfig) -> Result<DenseMatrix<E::Scalar>>
where
    E: MatrixExpr + ?Sized,
{
    let mut out = DenseMatrix::zeros(expr.rows(), expr.cols(), expr.batches());
    eval_into_dense(expr, out.data_mut(), config)?;
    Ok(out)
}

/// Sum of all coefficients with the default configuration
///
/// Sparse-structured expressions contribute only their structural positions.
pub fn sum<E>(expr: &E) -> Result<E::Scalar>
where
    E: MatrixExpr + ?Sized,
{
    sum_with(expr, &EvalConfig::default())
}

/// Sum of all coefficients
pub fn sum_with<E>(expr: &E, config: &EvalConfig) -> Result<E::Scalar>
where
    E: MatrixExpr + ?Sized,
{
    if E::DESCRIPTOR.format.is_compressed() {
        let pattern = structure_of(expr)?;
        return Ok(kernels::sum_structured(expr, pattern, config));
    }
    if E::DESCRIPTOR.is_cwise_readable() {
        Ok(kernels::sum_dense(expr, config))
    } else {
        let tmp = eval_dense(expr, config)?;
        Ok(kernels::sum_dense(&tmp, config))
    }
}

/// Fail unless `dst` and `src` agree in rows, columns and batches
pub(crate) fn check_same_extent<D, S>(dst: &D, src: &S) -> Result<()>
where
    D: MatrixExpr + ?Sized,
    S: MatrixExpr + ?Sized,
{
    let expected = [dst.rows(), dst.cols(), dst.batches()];
    let got = [src.rows(), src.cols(), src.batches()];
    if expected != got {
        return Err(Error::shape_mismatch(&expected, &got));
    }
    Ok(())
}

/// Write `src` into column-major `out` (`rows * cols * batches` values)
///
/// Compressed sources are evaluated at their structural positions and scattered;
/// all other coefficients of `out` are set to zero.
pub(crate) fn eval_into_dense<S>(
    src: &S,
    out: &mut [S::Scalar],
    config: &EvalConfig,
) -> Result<()>
where
    S: MatrixExpr + ?Sized,
{
    if S::DESCRIPTOR.format.is_compressed() {
        let pattern = structure_of(src)?;
        let mut values = vec![<S::Scalar as Element>::zero(); pattern.nnz() * src.batches()];
        kernels::walk_structured(src, pattern, &mut values, config);
        out.fill(<S::Scalar as Element>::zero());
        kernels::scatter_dense(pattern, &values, out, config);
    } else {
        kernels::walk_dense(src, out, config);
    }
    Ok(())
}

/// Write `src` at the structural positions of `pattern` into `out`
/// (`nnz * batches` values)
///
/// # Errors
///
/// Returns `PatternMismatch` if `src` is itself structured on a different
/// pattern.
pub(crate) fn eval_into_sparse<S>(
    src: &S,
    pattern: &Arc<SparsityPattern>,
    out: &mut [S::Scalar],
    config: &EvalConfig,
) -> Result<()>
where
    S: MatrixExpr + ?Sized,
{
    if S::DESCRIPTOR.format.is_compressed() {
        if !structure_of(src)?.same_structure(pattern) {
            return Err(Error::PatternMismatch);
        }
        kernels::walk_structured(src, pattern, out, config);
    } else if S::DESCRIPTOR.is_cwise_readable() {
        kernels::walk_structured(src, pattern, out, config);
    } else {
        let tmp = eval_dense(src, config)?;
        kernels::walk_structured(&tmp, pattern, out, config);
    }
    Ok(())
}

fn structure_of<E: MatrixExpr + ?Sized>(expr: &E) -> Result<&Arc<SparsityPattern>> {
    expr.bound_pattern().ok_or_else(|| {
        Error::invalid_argument(
            "src",
            format!(
                "{} expression does not expose its sparsity pattern",
                E::DESCRIPTOR.format
            ),
        )
    })
}

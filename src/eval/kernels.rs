//! Coefficient walks over dense coordinate spaces and sparsity patterns

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use super::config::EvalConfig;
use crate::dtype::Element;
use crate::expr::MatrixExpr;
use crate::sparse::SparsityPattern;

/// One (batch, outer) segment of a structural walk and its output slots
struct Segment<'a, T> {
    batch: usize,
    outer: usize,
    start: usize,
    out: &'a mut [T],
}

/// Write `src` at every coordinate into column-major `out`
///
/// `out` holds `rows * cols * batches` values; `index` is the column-major
/// offset within the batch.
pub(super) fn walk_dense<S>(src: &S, out: &mut [S::Scalar], config: &EvalConfig)
where
    S: MatrixExpr + ?Sized,
{
    let (rows, cols) = (src.rows(), src.cols());
    if out.is_empty() {
        return;
    }

    let fill_column = |j: usize, column: &mut [S::Scalar]| {
        let (col, batch) = (j % cols, j / cols);
        for (row, slot) in column.iter_mut().enumerate() {
            *slot = src.coeff(row, col, batch, row + rows * col);
        }
    };

    #[cfg(feature = "rayon")]
    {
        if config.parallel() {
            out.par_chunks_mut(rows)
                .enumerate()
                .with_min_len(config.min_len())
                .for_each(|(j, column)| fill_column(j, column));
            return;
        }
    }

    #[cfg(not(feature = "rayon"))]
    let _ = config;

    out.chunks_mut(rows)
        .enumerate()
        .for_each(|(j, column)| fill_column(j, column));
}

/// Write `src` at every structural position of `pattern` into `out`
///
/// `out` holds `nnz * batches` values in structural order, batch after batch.
pub(super) fn walk_structured<S>(
    src: &S,
    pattern: &SparsityPattern,
    out: &mut [S::Scalar],
    config: &EvalConfig,
) where
    S: MatrixExpr + ?Sized,
{
    let nnz = pattern.nnz();
    if nnz == 0 {
        return;
    }

    let mut segments = Vec::with_capacity(out.len() / nnz * pattern.outer_size());
    for (batch, mut rest) in out.chunks_mut(nnz).enumerate() {
        for outer in 0..pattern.outer_size() {
            let range = pattern.segment(outer);
            if range.is_empty() {
                continue;
            }
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;
            segments.push(Segment {
                batch,
                outer,
                start: range.start,
                out: head,
            });
        }
    }

    let inner = pattern.inner_indices();
    let fill_segment = |seg: Segment<'_, S::Scalar>| {
        for (k, slot) in seg.out.iter_mut().enumerate() {
            let index = seg.start + k;
            let (row, col) = pattern.to_coords(seg.outer, inner[index] as usize);
            *slot = src.coeff(row, col, seg.batch, index);
        }
    };

    #[cfg(feature = "rayon")]
    {
        if config.parallel() {
            segments
                .into_par_iter()
                .with_min_len(config.min_len())
                .for_each(fill_segment);
            return;
        }
    }

    #[cfg(not(feature = "rayon"))]
    let _ = config;

    segments.into_iter().for_each(fill_segment);
}

/// Scatter structured `values` (`nnz * batches`) into zero-initialized,
/// column-major `out`
pub(super) fn scatter_dense<T: Element>(
    pattern: &SparsityPattern,
    values: &[T],
    out: &mut [T],
    config: &EvalConfig,
) {
    let nnz = pattern.nnz();
    let batch_len = pattern.rows() * pattern.cols();
    if nnz == 0 || batch_len == 0 {
        return;
    }

    let rows = pattern.rows();
    let scatter_batch = |(dst, src): (&mut [T], &[T])| {
        for entry in pattern.entries() {
            dst[entry.row + rows * entry.col] = src[entry.index];
        }
    };

    #[cfg(feature = "rayon")]
    {
        if config.parallel() {
            out.par_chunks_mut(batch_len)
                .zip(values.par_chunks(nnz))
                .for_each(scatter_batch);
            return;
        }
    }

    #[cfg(not(feature = "rayon"))]
    let _ = config;

    out.chunks_mut(batch_len)
        .zip(values.chunks(nnz))
        .for_each(scatter_batch);
}

/// Sum of `src` over every coordinate
pub(super) fn sum_dense<S>(src: &S, config: &EvalConfig) -> S::Scalar
where
    S: MatrixExpr + ?Sized,
{
    let (rows, cols) = (src.rows(), src.cols());
    let column_sum = |j: usize| {
        let (col, batch) = (j % cols, j / cols);
        (0..rows).fold(<S::Scalar as Element>::zero(), |acc, row| {
            acc + src.coeff(row, col, batch, row + rows * col)
        })
    };
    let columns = cols * src.batches();

    #[cfg(feature = "rayon")]
    {
        if config.parallel() {
            return (0..columns)
                .into_par_iter()
                .with_min_len(config.min_len())
                .map(column_sum)
                .reduce(<S::Scalar as Element>::zero, |a, b| a + b);
        }
    }

    #[cfg(not(feature = "rayon"))]
    let _ = config;

    (0..columns).map(column_sum).fold(<S::Scalar as Element>::zero(), |a, b| a + b)
}

/// Sum of `src` over the structural positions of `pattern`
pub(super) fn sum_structured<S>(
    src: &S,
    pattern: &SparsityPattern,
    config: &EvalConfig,
) -> S::Scalar
where
    S: MatrixExpr + ?Sized,
{
    let outer_size = pattern.outer_size();
    let inner = pattern.inner_indices();
    let segment_sum = |k: usize| {
        let (outer, batch) = (k % outer_size, k / outer_size);
        pattern.segment(outer).fold(<S::Scalar as Element>::zero(), |acc, index| {
            let (row, col) = pattern.to_coords(outer, inner[index] as usize);
            acc + src.coeff(row, col, batch, index)
        })
    };
    let segments = outer_size * src.batches();

    #[cfg(feature = "rayon")]
    {
        if config.parallel() {
            return (0..segments)
                .into_par_iter()
                .with_min_len(config.min_len())
                .map(segment_sum)
                .reduce(<S::Scalar as Element>::zero, |a, b| a + b);
        }
    }

    #[cfg(not(feature = "rayon"))]
    let _ = config;

    (0..segments).map(segment_sum).fold(<S::Scalar as Element>::zero(), |a, b| a + b)
}

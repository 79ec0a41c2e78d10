//! Minimal operation set: coefficient-wise binary ops, scaling, matrix product
//!
//! Every op reads its children through a [`ReadWrapper`], so children that
//! cannot be read per coefficient (products, sparse-structured expressions) are
//! evaluated once when the op is built.

use std::marker::PhantomData;

use crate::dtype::Element;
use crate::error::{Error, Result};

use super::read::ReadWrapper;
use super::traits::{AccessFlags, Descriptor, MatrixExpr};

/// Scalar function applied coefficient-wise by [`CwiseBinaryOp`]
pub trait BinaryFunctor<T: Element>: Send + Sync + 'static {
    /// Combine two coefficients
    fn apply(lhs: T, rhs: T) -> T;
}

/// `lhs + rhs`
#[derive(Debug, Clone, Copy, Default)]
pub struct AddOp;

/// `lhs - rhs`
#[derive(Debug, Clone, Copy, Default)]
pub struct SubOp;

/// `lhs * rhs`
#[derive(Debug, Clone, Copy, Default)]
pub struct MulOp;

impl<T: Element> BinaryFunctor<T> for AddOp {
    #[inline]
    fn apply(lhs: T, rhs: T) -> T {
        lhs + rhs
    }
}

impl<T: Element> BinaryFunctor<T> for SubOp {
    #[inline]
    fn apply(lhs: T, rhs: T) -> T {
        lhs - rhs
    }
}

impl<T: Element> BinaryFunctor<T> for MulOp {
    #[inline]
    fn apply(lhs: T, rhs: T) -> T {
        lhs * rhs
    }
}

fn check_extent<L: MatrixExpr, R: MatrixExpr>(lhs: &L, rhs: &R) -> Result<()> {
    let l = [lhs.rows(), lhs.cols(), lhs.batches()];
    let r = [rhs.rows(), rhs.cols(), rhs.batches()];
    if l != r {
        return Err(Error::shape_mismatch(&l, &r));
    }
    Ok(())
}

/// Coefficient-wise combination of two expressions of equal shape
#[derive(Debug, Clone)]
pub struct CwiseBinaryOp<L: MatrixExpr, R: MatrixExpr<Scalar = L::Scalar>, Op> {
    lhs: ReadWrapper<L>,
    rhs: ReadWrapper<R>,
    _op: PhantomData<Op>,
}

impl<L, R, Op> CwiseBinaryOp<L, R, Op>
where
    L: MatrixExpr,
    R: MatrixExpr<Scalar = L::Scalar>,
    Op: BinaryFunctor<L::Scalar>,
{
    /// Combine `lhs` and `rhs`
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if rows, columns or batches differ.
    pub fn new(lhs: L, rhs: R) -> Result<Self> {
        check_extent(&lhs, &rhs)?;
        Ok(Self {
            lhs: ReadWrapper::new(lhs)?,
            rhs: ReadWrapper::new(rhs)?,
            _op: PhantomData,
        })
    }
}

impl<L, R, Op> MatrixExpr for CwiseBinaryOp<L, R, Op>
where
    L: MatrixExpr,
    R: MatrixExpr<Scalar = L::Scalar>,
    Op: BinaryFunctor<L::Scalar>,
{
    type Scalar = L::Scalar;

    const DESCRIPTOR: Descriptor = Descriptor {
        rows: L::DESCRIPTOR.rows.unify(R::DESCRIPTOR.rows),
        cols: L::DESCRIPTOR.cols.unify(R::DESCRIPTOR.cols),
        batches: L::DESCRIPTOR.batches.unify(R::DESCRIPTOR.batches),
        ..Descriptor::dense(L::DESCRIPTOR.dtype, AccessFlags::READ_CWISE)
    };

    #[inline]
    fn rows(&self) -> usize {
        self.lhs.rows()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.lhs.cols()
    }

    #[inline]
    fn batches(&self) -> usize {
        self.lhs.batches()
    }

    #[inline]
    fn coeff(&self, row: usize, col: usize, batch: usize, index: usize) -> Self::Scalar {
        Op::apply(
            self.lhs.coeff(row, col, batch, index),
            self.rhs.coeff(row, col, batch, index),
        )
    }
}

/// Every coefficient of the child multiplied by a scalar
#[derive(Debug, Clone)]
pub struct ScaleOp<C: MatrixExpr> {
    child: ReadWrapper<C>,
    factor: C::Scalar,
}

impl<C: MatrixExpr> ScaleOp<C> {
    /// Scale `child` by `factor`
    pub fn new(child: C, factor: C::Scalar) -> Result<Self> {
        Ok(Self {
            child: ReadWrapper::new(child)?,
            factor,
        })
    }

    /// The scale factor
    pub fn factor(&self) -> C::Scalar {
        self.factor
    }
}

impl<C: MatrixExpr> MatrixExpr for ScaleOp<C> {
    type Scalar = C::Scalar;

    const DESCRIPTOR: Descriptor = Descriptor {
        format: crate::sparse::StorageFormat::Dense,
        access: AccessFlags::READ_CWISE,
        ..C::DESCRIPTOR
    };

    #[inline]
    fn rows(&self) -> usize {
        self.child.rows()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.child.cols()
    }

    #[inline]
    fn batches(&self) -> usize {
        self.child.batches()
    }

    #[inline]
    fn coeff(&self, row: usize, col: usize, batch: usize, index: usize) -> Self::Scalar {
        self.factor * self.child.coeff(row, col, batch, index)
    }
}

/// Batched matrix product `lhs[b] * rhs[b]`
///
/// Each coefficient is a dot product, so the op does not advertise
/// `READ_CWISE`; consumers that read it repeatedly materialize it first.
#[derive(Debug, Clone)]
pub struct ProductOp<L: MatrixExpr, R: MatrixExpr<Scalar = L::Scalar>> {
    lhs: ReadWrapper<L>,
    rhs: ReadWrapper<R>,
}

impl<L, R> ProductOp<L, R>
where
    L: MatrixExpr,
    R: MatrixExpr<Scalar = L::Scalar>,
{
    /// Multiply `lhs` (m x k) by `rhs` (k x n), batch by batch
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the inner dimensions or the batch counts differ.
    pub fn new(lhs: L, rhs: R) -> Result<Self> {
        if lhs.cols() != rhs.rows() || lhs.batches() != rhs.batches() {
            return Err(Error::shape_mismatch(
                &[lhs.rows(), lhs.cols(), lhs.batches()],
                &[rhs.rows(), rhs.cols(), rhs.batches()],
            ));
        }
        Ok(Self {
            lhs: ReadWrapper::new(lhs)?,
            rhs: ReadWrapper::new(rhs)?,
        })
    }
}

impl<L, R> MatrixExpr for ProductOp<L, R>
where
    L: MatrixExpr,
    R: MatrixExpr<Scalar = L::Scalar>,
{
    type Scalar = L::Scalar;

    const DESCRIPTOR: Descriptor = Descriptor {
        rows: L::DESCRIPTOR.rows,
        cols: R::DESCRIPTOR.cols,
        batches: L::DESCRIPTOR.batches.unify(R::DESCRIPTOR.batches),
        ..Descriptor::dense(L::DESCRIPTOR.dtype, AccessFlags::NONE)
    };

    #[inline]
    fn rows(&self) -> usize {
        self.lhs.rows()
    }

    #[inline]
    fn cols(&self) -> usize {
        self.rhs.cols()
    }

    #[inline]
    fn batches(&self) -> usize {
        self.lhs.batches()
    }

    fn coeff(&self, row: usize, col: usize, batch: usize, _index: usize) -> Self::Scalar {
        let lhs_rows = self.lhs.rows();
        let inner = self.lhs.cols();
        (0..inner).fold(<Self::Scalar as Element>::zero(), |acc, k| {
            acc + self.lhs.coeff(row, k, batch, row + lhs_rows * k)
                * self.rhs.coeff(k, col, batch, k + inner * col)
        })
    }
}

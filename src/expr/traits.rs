//! Compile-time descriptors and the base expression contracts
//!
//! Every expression type carries a `const DESCRIPTOR` computed from its
//! children's descriptors. Evaluation sinks branch on these constants, never on
//! runtime type inspection; after monomorphization the untaken branches vanish.

use std::fmt;
use std::sync::Arc;

use crate::dtype::{DType, Element};
use crate::error::Result;
use crate::eval::EvalConfig;
use crate::sparse::{CompressedFormat, SparsityPattern, StorageFormat};

use super::dense::DenseMatrix;
use super::ops::{AddOp, CwiseBinaryOp, MulOp, ProductOp, ScaleOp, SubOp};
use super::sparse_op::SparseExprOp;

/// Extent of one dimension as known at compile time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    /// Known only at runtime
    Dynamic,
    /// Fixed for every value of the type
    Fixed(usize),
}

impl Dim {
    /// True if a runtime extent is compatible with this dimension
    #[inline]
    pub const fn admits(self, extent: usize) -> bool {
        match self {
            Dim::Dynamic => true,
            Dim::Fixed(n) => n == extent,
        }
    }

    /// Combine the dimensions of two operands that must agree
    ///
    /// Panics in const evaluation if both are fixed and differ.
    pub const fn unify(self, other: Dim) -> Dim {
        match (self, other) {
            (Dim::Fixed(a), Dim::Fixed(b)) => {
                assert!(a == b, "operands have different compile-time extents");
                Dim::Fixed(a)
            }
            (Dim::Fixed(a), Dim::Dynamic) | (Dim::Dynamic, Dim::Fixed(a)) => Dim::Fixed(a),
            (Dim::Dynamic, Dim::Dynamic) => Dim::Dynamic,
        }
    }
}

/// Access capabilities of an expression type
///
/// Read flags say how a consumer may obtain coefficients; write flags say whether
/// the type can be an assignment destination.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessFlags(u8);

impl AccessFlags {
    /// No capabilities
    pub const NONE: Self = Self(0);
    /// `coeff` may be called at any coordinate and is cheap
    pub const READ_CWISE: Self = Self(1);
    /// Backed by memory that can be read linearly
    pub const READ_DIRECT: Self = Self(1 << 1);
    /// `coeff` is only meaningful at positions enumerated from a sparsity pattern
    pub const READ_STRUCTURED: Self = Self(1 << 2);
    /// Coefficients can be written one by one
    pub const WRITE_CWISE: Self = Self(1 << 3);
    /// Backed by memory that can be written linearly
    pub const WRITE_DIRECT: Self = Self(1 << 4);

    const READ_MASK: u8 = Self::READ_CWISE.0 | Self::READ_DIRECT.0 | Self::READ_STRUCTURED.0;
    const WRITE_MASK: u8 = Self::WRITE_CWISE.0 | Self::WRITE_DIRECT.0;

    /// Raw bits
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every flag in `other` is set
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Flags set in either operand
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Flags set in both operands
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Flags of `self` not set in `other`
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// True if any write flag is set
    #[inline]
    pub const fn is_writable(self) -> bool {
        self.0 & Self::WRITE_MASK != 0
    }

    /// True if any read flag is set
    #[inline]
    pub const fn is_readable(self) -> bool {
        self.0 & Self::READ_MASK != 0
    }
}

impl fmt::Debug for AccessFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(AccessFlags, &str); 5] = [
            (AccessFlags::READ_CWISE, "READ_CWISE"),
            (AccessFlags::READ_DIRECT, "READ_DIRECT"),
            (AccessFlags::READ_STRUCTURED, "READ_STRUCTURED"),
            (AccessFlags::WRITE_CWISE, "WRITE_CWISE"),
            (AccessFlags::WRITE_DIRECT, "WRITE_DIRECT"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

/// Static metadata of an expression type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descriptor {
    /// Coefficient type
    pub dtype: DType,
    /// How nonzero positions are organized
    pub format: StorageFormat,
    /// Read/write capabilities
    pub access: AccessFlags,
    /// Compile-time row count
    pub rows: Dim,
    /// Compile-time column count
    pub cols: Dim,
    /// Compile-time batch count
    pub batches: Dim,
}

impl Descriptor {
    /// Dense descriptor with all extents dynamic
    pub const fn dense(dtype: DType, access: AccessFlags) -> Self {
        Self {
            dtype,
            format: StorageFormat::Dense,
            access,
            rows: Dim::Dynamic,
            cols: Dim::Dynamic,
            batches: Dim::Dynamic,
        }
    }

    /// Same descriptor with different access flags
    pub const fn with_access(self, access: AccessFlags) -> Self {
        Self { access, ..self }
    }

    /// Descriptor of an expression bound to a sparsity pattern
    ///
    /// Keeps dtype and extents, forces the storage format to `format`, clears
    /// every write flag and replaces the read capability with `READ_STRUCTURED`.
    /// Panics in const evaluation if `format` is not CSR or CSC.
    pub const fn bind_sparse(self, format: StorageFormat) -> Self {
        assert!(
            format.is_compressed(),
            "a sparse binding must use the CSR or CSC format"
        );
        Self {
            format,
            access: AccessFlags::READ_STRUCTURED,
            ..self
        }
    }

    /// True if the type may be read at arbitrary coordinates without materializing
    #[inline]
    pub const fn is_cwise_readable(&self) -> bool {
        self.access.contains(AccessFlags::READ_CWISE)
    }
}

/// A lazily evaluated, batched matrix-valued expression
///
/// Implementors describe themselves through [`MatrixExpr::DESCRIPTOR`] and answer
/// coefficient reads through the four-argument [`MatrixExpr::coeff`]:
///
/// - `row`, `col`, `batch` are the logical coordinate.
/// - `index` is the consumer's position: the offset into the inner-index
///   sequence when it enumerates a sparsity pattern (the same for every
///   batch), or the column-major offset within one batch when it walks a
///   dense coordinate space.
///
/// Coordinate-addressed expressions ignore `index`; structurally addressed ones
/// (a stored sparse value array) use it for an O(1) lookup. Reads must be pure:
/// sinks call `coeff` from many threads at once.
///
/// `coeff` is defined for every in-range position. Types without
/// `READ_CWISE` still answer it, but at a cost that makes per-access use a
/// mistake; wrappers materialize such children first.
pub trait MatrixExpr: Sync {
    /// Coefficient type
    type Scalar: Element;

    /// Compile-time metadata of this type
    const DESCRIPTOR: Descriptor;

    /// Number of rows
    fn rows(&self) -> usize;

    /// Number of columns
    fn cols(&self) -> usize;

    /// Number of batches
    fn batches(&self) -> usize;

    /// Read the coefficient at (row, col, batch); see the trait docs for `index`
    fn coeff(&self, row: usize, col: usize, batch: usize, index: usize) -> Self::Scalar;

    /// The pattern a structurally addressed expression is stored or bound on
    fn bound_pattern(&self) -> Option<&Arc<SparsityPattern>> {
        None
    }

    /// Shape as [rows, cols]
    #[inline]
    fn shape(&self) -> [usize; 2] {
        [self.rows(), self.cols()]
    }

    /// Total number of coefficients across all batches
    #[inline]
    fn size(&self) -> usize {
        self.rows() * self.cols() * self.batches()
    }

    /// Materialize into dense storage
    fn eval(&self) -> Result<DenseMatrix<Self::Scalar>> {
        crate::eval::eval_dense(self, &EvalConfig::default())
    }

    /// Bind this expression to a sparsity pattern
    ///
    /// See [`SparseExprOp::new`].
    fn sparse_view<F: CompressedFormat>(
        self,
        pattern: &Arc<SparsityPattern>,
    ) -> Result<SparseExprOp<Self, F>>
    where
        Self: Sized,
    {
        SparseExprOp::new(self, pattern)
    }

    /// Coefficient-wise sum
    fn cwise_add<R>(self, rhs: R) -> Result<CwiseBinaryOp<Self, R, AddOp>>
    where
        Self: Sized,
        R: MatrixExpr<Scalar = Self::Scalar>,
    {
        CwiseBinaryOp::new(self, rhs)
    }

    /// Coefficient-wise difference
    fn cwise_sub<R>(self, rhs: R) -> Result<CwiseBinaryOp<Self, R, SubOp>>
    where
        Self: Sized,
        R: MatrixExpr<Scalar = Self::Scalar>,
    {
        CwiseBinaryOp::new(self, rhs)
    }

    /// Coefficient-wise product
    fn cwise_mul<R>(self, rhs: R) -> Result<CwiseBinaryOp<Self, R, MulOp>>
    where
        Self: Sized,
        R: MatrixExpr<Scalar = Self::Scalar>,
    {
        CwiseBinaryOp::new(self, rhs)
    }

    /// Multiply every coefficient by `factor`
    fn scale(self, factor: Self::Scalar) -> Result<ScaleOp<Self>>
    where
        Self: Sized,
    {
        ScaleOp::new(self, factor)
    }

    /// Batched matrix product
    fn matmul<R>(self, rhs: R) -> Result<ProductOp<Self, R>>
    where
        Self: Sized,
        R: MatrixExpr<Scalar = Self::Scalar>,
    {
        ProductOp::new(self, rhs)
    }
}

impl<E: MatrixExpr + ?Sized> MatrixExpr for &E {
    type Scalar = E::Scalar;

    const DESCRIPTOR: Descriptor = E::DESCRIPTOR;

    #[inline]
    fn rows(&self) -> usize {
        (**self).rows()
    }

    #[inline]
    fn cols(&self) -> usize {
        (**self).cols()
    }

    #[inline]
    fn batches(&self) -> usize {
        (**self).batches()
    }

    #[inline]
    fn coeff(&self, row: usize, col: usize, batch: usize, index: usize) -> Self::Scalar {
        (**self).coeff(row, col, batch, index)
    }

    #[inline]
    fn bound_pattern(&self) -> Option<&Arc<SparsityPattern>> {
        (**self).bound_pattern()
    }
}

/// Capability of being an assignment destination
///
/// Only storage types implement this. Lazy expressions, and in particular
/// sparse bindings, do not, so assigning into them does not type-check.
pub trait Destination: MatrixExpr {
    /// Evaluate `src` into `self`
    ///
    /// # Errors
    ///
    /// Returns an error if shapes, batch counts or structures disagree. `self`
    /// is left untouched in that case.
    fn assign_from<S>(&mut self, src: &S, config: &EvalConfig) -> Result<()>
    where
        S: MatrixExpr<Scalar = Self::Scalar> + ?Sized;
}

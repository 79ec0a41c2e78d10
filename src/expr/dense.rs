//! Dense batched matrix storage

use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::eval::EvalConfig;

use super::traits::{AccessFlags, Descriptor, Destination, MatrixExpr};

/// Dense matrix with a batch dimension
///
/// Coefficients are stored column-major, batch after batch:
/// `data[row + rows * (col + cols * batch)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T: Element> {
    rows: usize,
    cols: usize,
    batches: usize,
    data: Vec<T>,
}

impl<T: Element> DenseMatrix<T> {
    /// Create a matrix filled with zeros
    pub fn zeros(rows: usize, cols: usize, batches: usize) -> Self {
        Self {
            rows,
            cols,
            batches,
            data: vec![T::zero(); rows * cols * batches],
        }
    }

    /// Create a matrix from column-major data
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if `data.len() != rows * cols * batches`.
    pub fn from_vec(rows: usize, cols: usize, batches: usize, data: Vec<T>) -> Result<Self> {
        let expected = rows * cols * batches;
        if data.len() != expected {
            return Err(Error::shape_mismatch(&[expected], &[data.len()]));
        }
        Ok(Self {
            rows,
            cols,
            batches,
            data,
        })
    }

    /// Create a matrix by evaluating `f(row, col, batch)` at every coordinate
    pub fn from_fn(
        rows: usize,
        cols: usize,
        batches: usize,
        mut f: impl FnMut(usize, usize, usize) -> T,
    ) -> Self {
        let mut data = Vec::with_capacity(rows * cols * batches);
        for batch in 0..batches {
            for col in 0..cols {
                for row in 0..rows {
                    data.push(f(row, col, batch));
                }
            }
        }
        Self {
            rows,
            cols,
            batches,
            data,
        }
    }

    /// Create a single-batch matrix from row-major data
    ///
    /// Convenient for writing matrices out literally.
    pub fn from_row_major(rows: usize, cols: usize, values: &[T]) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(Error::shape_mismatch(&[rows, cols], &[values.len()]));
        }
        Ok(Self::from_fn(rows, cols, 1, |r, c, _| values[r * cols + c]))
    }

    /// Linear offset of (row, col, batch) in `data`
    #[inline]
    pub fn linear_index(&self, row: usize, col: usize, batch: usize) -> usize {
        row + self.rows * (col + self.cols * batch)
    }

    /// Coefficient at (row, col, batch)
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize, batch: usize) -> T {
        assert!(row < self.rows && col < self.cols && batch < self.batches);
        self.data[self.linear_index(row, col, batch)]
    }

    /// Overwrite the coefficient at (row, col, batch)
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, batch: usize, value: T) {
        assert!(row < self.rows && col < self.cols && batch < self.batches);
        let idx = self.linear_index(row, col, batch);
        self.data[idx] = value;
    }

    /// Column-major coefficients of all batches
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable column-major coefficients of all batches
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Coefficients of one batch
    pub fn batch(&self, batch: usize) -> &[T] {
        let len = self.rows * self.cols;
        &self.data[batch * len..(batch + 1) * len]
    }

    /// Consume into the column-major data vector
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Element> MatrixExpr for DenseMatrix<T> {
    type Scalar = T;

    const DESCRIPTOR: Descriptor = Descriptor::dense(
        T::DTYPE,
        AccessFlags::READ_CWISE
            .union(AccessFlags::READ_DIRECT)
            .union(AccessFlags::WRITE_CWISE)
            .union(AccessFlags::WRITE_DIRECT),
    );

    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn batches(&self) -> usize {
        self.batches
    }

    #[inline]
    fn coeff(&self, row: usize, col: usize, batch: usize, _index: usize) -> T {
        self.data[self.linear_index(row, col, batch)]
    }

    fn eval(&self) -> Result<DenseMatrix<T>> {
        Ok(self.clone())
    }
}

impl<T: Element> Destination for DenseMatrix<T> {
    fn assign_from<S>(&mut self, src: &S, config: &EvalConfig) -> Result<()>
    where
        S: MatrixExpr<Scalar = T> + ?Sized,
    {
        crate::eval::check_same_extent(&*self, src)?;
        crate::eval::eval_into_dense(src, &mut self.data, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_column_major() {
        let m = DenseMatrix::from_row_major(2, 3, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(m.data(), &[1, 4, 2, 5, 3, 6]);
        assert_eq!(m.get(1, 2, 0), 6);
        assert_eq!(m.coeff(0, 1, 0, 0), 2);
        assert_eq!(m.shape(), [2, 3]);
        assert_eq!(m.size(), 6);
    }

    #[test]
    fn test_batches() {
        let m = DenseMatrix::from_fn(2, 2, 3, |r, c, b| (100 * b + 10 * r + c) as i32);
        assert_eq!(m.batch(2), &[200, 210, 201, 211]);
        assert_eq!(m.get(1, 0, 1), 110);
    }

    #[test]
    fn test_from_vec_length_check() {
        let err = DenseMatrix::<f32>::from_vec(2, 2, 2, vec![0.0; 7]);
        assert_eq!(err, Err(Error::shape_mismatch(&[8], &[7])));
    }

    #[test]
    fn test_set() {
        let mut m = DenseMatrix::<f64>::zeros(2, 2, 1);
        m.set(1, 0, 0, 4.5);
        assert_eq!(m.data(), &[0.0, 4.5, 0.0, 0.0]);
    }

    #[test]
    fn test_descriptor() {
        let d = <DenseMatrix<f32> as MatrixExpr>::DESCRIPTOR;
        assert!(d.is_cwise_readable());
        assert!(d.access.is_writable());
        assert_eq!(d.dtype, crate::dtype::DType::F32);
    }
}

//! Conversions to and from ndarray arrays and fixed-size row-major arrays
//!
//! Fixed-size small matrices (3x3, 4x4, ...) and tuples are plain
//! `[[f64; C]; R]` / `[f64; N]` data here; values are copied element by element.

use crate::dense::{DenseMatrix, DenseVector};
use crate::error::{Result, check_dim};
use ndarray::{Array1, Array2};

impl From<&Array2<f64>> for DenseMatrix {
    fn from(a: &Array2<f64>) -> Self {
        let (rows, cols) = a.dim();
        DenseMatrix::from_fn(rows, cols, |i, j| a[[i, j]])
    }
}

impl DenseMatrix {
    /// Copy into an owned ndarray matrix
    pub fn to_array2(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rows, self.cols), |(i, j)| {
            self.data[i * self.cols + j]
        })
    }

    /// Copy into a fixed-size `R x C` array; the shape must match exactly
    pub fn to_fixed<const R: usize, const C: usize>(&self) -> Result<[[f64; C]; R]> {
        check_dim("to_fixed", R, self.rows)?;
        check_dim("to_fixed", C, self.cols)?;
        let mut out = [[0.0; C]; R];
        for (i, row) in out.iter_mut().enumerate() {
            row.copy_from_slice(&self.data[i * C..(i + 1) * C]);
        }
        Ok(out)
    }

    /// Take the shape and values of a fixed-size `R x C` array
    pub fn set_fixed<const R: usize, const C: usize>(&mut self, values: &[[f64; C]; R]) {
        self.resize(R, C);
        for (i, row) in values.iter().enumerate() {
            self.data[i * C..(i + 1) * C].copy_from_slice(row);
        }
    }
}

impl<const R: usize, const C: usize> From<[[f64; C]; R]> for DenseMatrix {
    fn from(values: [[f64; C]; R]) -> Self {
        DenseMatrix::from_fn(R, C, |i, j| values[i][j])
    }
}

impl From<&Array1<f64>> for DenseVector {
    fn from(a: &Array1<f64>) -> Self {
        DenseVector::from(a.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for DenseVector {
    fn from(values: [f64; N]) -> Self {
        DenseVector::from_slice(&values)
    }
}

impl From<DenseVector> for Vec<f64> {
    fn from(mut v: DenseVector) -> Self {
        v.data.truncate(v.len);
        v.data
    }
}

impl DenseVector {
    /// Copy into an owned ndarray vector
    pub fn to_array1(&self) -> Array1<f64> {
        Array1::from(self.as_slice().to_vec())
    }

    /// Copy into a fixed-size array; the length must match exactly
    pub fn to_fixed<const N: usize>(&self) -> Result<[f64; N]> {
        check_dim("to_fixed", N, self.len)?;
        let mut out = [0.0; N];
        out.copy_from_slice(self.as_slice());
        Ok(out)
    }
}

/// Serialized layout of [`DenseMatrix`], validated on the way back in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
pub struct MatrixRepr {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<MatrixRepr> for DenseMatrix {
    type Error = crate::error::LinalgError;

    fn try_from(repr: MatrixRepr) -> Result<Self> {
        check_dim("deserialize", repr.rows * repr.cols, repr.data.len())?;
        Ok(DenseMatrix {
            rows: repr.rows,
            cols: repr.cols,
            data: repr.data,
        })
    }
}

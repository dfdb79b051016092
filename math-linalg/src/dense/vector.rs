//! General-size vector of `f64`
//!
//! The logical length can be smaller than the backing buffer: shrinking
//! keeps the tail around, so growing back within the old buffer sees the
//! earlier values again. Growing past the buffer zero-fills.

use crate::dense::DenseMatrix;
use crate::error::{LinalgError, Result, check_dim, check_index, checked_size};
use std::fmt;

/// General-size dense vector
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct DenseVector {
    pub(crate) len: usize,
    pub(crate) data: Vec<f64>,
}

impl DenseVector {
    /// Zero vector of length `len`
    pub fn zeros(len: usize) -> Self {
        Self {
            len,
            data: vec![0.0; len],
        }
    }

    /// Zero vector with a signed length
    pub fn try_zeros(len: i64) -> Result<Self> {
        Ok(Self::zeros(checked_size(len)?))
    }

    /// Copy `values` into a new vector
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            len: values.len(),
            data: values.to_vec(),
        }
    }

    /// Logical length
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when the logical length is zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Elements within the logical length
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data[..self.len]
    }

    /// Mutable view of the first `len` elements
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data[..self.len]
    }

    /// Element at `index`, bounds-checked against the logical length
    pub fn get(&self, index: usize) -> Result<f64> {
        check_index("element", index, self.len)?;
        Ok(self.data[index])
    }

    /// Set the element at `index`, bounds-checked against the logical length
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        check_index("element", index, self.len)?;
        self.data[index] = value;
        Ok(())
    }

    /// Change the logical length
    ///
    /// Growing past the backing buffer extends it with zeros. Shrinking only
    /// lowers the logical length.
    pub fn resize(&mut self, len: usize) {
        if len > self.data.len() {
            self.data.resize(len, 0.0);
        }
        self.len = len;
    }

    /// [`DenseVector::resize`] with a signed length
    pub fn try_resize(&mut self, len: i64) -> Result<()> {
        self.resize(checked_size(len)?);
        Ok(())
    }

    /// Set every element to zero
    pub fn set_zero(&mut self) {
        self.as_mut_slice().fill(0.0);
    }

    /// Copy `other`, taking its length
    pub fn set_from(&mut self, other: &DenseVector) {
        self.resize(other.len);
        self.as_mut_slice().copy_from_slice(other.as_slice());
    }

    /// Overwrite from the first `len` entries of `values`
    pub fn set_from_slice(&mut self, values: &[f64]) -> Result<()> {
        if values.len() < self.len {
            return Err(LinalgError::DimensionMismatch {
                op: "set_from_slice",
                expected: self.len,
                got: values.len(),
            });
        }
        let n = self.len;
        self.as_mut_slice().copy_from_slice(&values[..n]);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Arithmetic
    // ------------------------------------------------------------------

    /// `self += other`
    pub fn add(&mut self, other: &DenseVector) -> Result<()> {
        check_dim("add", self.len, other.len)?;
        for (a, b) in self.as_mut_slice().iter_mut().zip(other.as_slice()) {
            *a += *b;
        }
        Ok(())
    }

    /// `self = v1 + v2`
    pub fn add_pair(&mut self, v1: &DenseVector, v2: &DenseVector) -> Result<()> {
        check_dim("add", self.len, v1.len)?;
        check_dim("add", self.len, v2.len)?;
        for ((out, a), b) in self
            .as_mut_slice()
            .iter_mut()
            .zip(v1.as_slice())
            .zip(v2.as_slice())
        {
            *out = *a + *b;
        }
        Ok(())
    }

    /// `self -= other`
    pub fn sub(&mut self, other: &DenseVector) -> Result<()> {
        check_dim("sub", self.len, other.len)?;
        for (a, b) in self.as_mut_slice().iter_mut().zip(other.as_slice()) {
            *a -= *b;
        }
        Ok(())
    }

    /// `self = v1 - v2`
    pub fn sub_pair(&mut self, v1: &DenseVector, v2: &DenseVector) -> Result<()> {
        check_dim("sub", self.len, v1.len)?;
        check_dim("sub", self.len, v2.len)?;
        for ((out, a), b) in self
            .as_mut_slice()
            .iter_mut()
            .zip(v1.as_slice())
            .zip(v2.as_slice())
        {
            *out = *a - *b;
        }
        Ok(())
    }

    /// `self = -self`
    pub fn negate(&mut self) {
        for v in self.as_mut_slice() {
            *v = -*v;
        }
    }

    /// `self = s * self`
    pub fn scale(&mut self, s: f64) {
        for v in self.as_mut_slice() {
            *v *= s;
        }
    }

    /// `self = s * v`
    pub fn scale_from(&mut self, s: f64, v: &DenseVector) -> Result<()> {
        check_dim("scale", self.len, v.len)?;
        for (out, x) in self.as_mut_slice().iter_mut().zip(v.as_slice()) {
            *out = s * *x;
        }
        Ok(())
    }

    /// `self = s * v1 + v2`
    pub fn scale_add(&mut self, s: f64, v1: &DenseVector, v2: &DenseVector) -> Result<()> {
        check_dim("scale_add", self.len, v1.len)?;
        check_dim("scale_add", self.len, v2.len)?;
        for ((out, a), b) in self
            .as_mut_slice()
            .iter_mut()
            .zip(v1.as_slice())
            .zip(v2.as_slice())
        {
            *out = s * *a + *b;
        }
        Ok(())
    }

    /// Inner product; lengths must match
    pub fn dot(&self, other: &DenseVector) -> Result<f64> {
        check_dim("dot", self.len, other.len)?;
        Ok(self
            .as_slice()
            .iter()
            .zip(other.as_slice())
            .map(|(a, b)| a * b)
            .sum())
    }

    /// Sum of squares of the elements
    pub fn norm_squared(&self) -> f64 {
        self.as_slice().iter().map(|v| v * v).sum()
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Divide by the norm
    ///
    /// A zero vector is not special-cased: its components become NaN.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        for v in self.as_mut_slice() {
            *v /= norm;
        }
    }

    /// Angle in radians between `self` and `other`, in `[0, pi]`
    pub fn angle(&self, other: &DenseVector) -> Result<f64> {
        let cos = self.dot(other)? / (self.norm() * other.norm());
        Ok(cos.clamp(-1.0, 1.0).acos())
    }

    /// `self = (1 - alpha) * self + alpha * v`
    pub fn interpolate(&mut self, v: &DenseVector, alpha: f64) -> Result<()> {
        check_dim("interpolate", self.len, v.len)?;
        for (out, x) in self.as_mut_slice().iter_mut().zip(v.as_slice()) {
            *out = (1.0 - alpha) * *out + alpha * *x;
        }
        Ok(())
    }

    /// `self = (1 - alpha) * v1 + alpha * v2`
    pub fn interpolate_pair(
        &mut self,
        v1: &DenseVector,
        v2: &DenseVector,
        alpha: f64,
    ) -> Result<()> {
        check_dim("interpolate", self.len, v1.len)?;
        check_dim("interpolate", self.len, v2.len)?;
        for ((out, a), b) in self
            .as_mut_slice()
            .iter_mut()
            .zip(v1.as_slice())
            .zip(v2.as_slice())
        {
            *out = (1.0 - alpha) * *a + alpha * *b;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Matrix products
    // ------------------------------------------------------------------

    /// `self = m * v`
    ///
    /// Written directly into `self`; `v` can never be `self` here.
    pub fn mul(&mut self, m: &DenseMatrix, v: &DenseVector) -> Result<()> {
        check_dim("mul", m.cols, v.len)?;
        check_dim("mul", m.rows, self.len)?;
        let x = v.as_slice();
        for (i, out) in self.as_mut_slice().iter_mut().enumerate() {
            let row = &m.data[i * m.cols..(i + 1) * m.cols];
            *out = row.iter().zip(x).map(|(a, b)| a * b).sum();
        }
        Ok(())
    }

    /// `self = vᵗ * m` (row vector times matrix)
    pub fn mul_row(&mut self, v: &DenseVector, m: &DenseMatrix) -> Result<()> {
        check_dim("mul_row", m.rows, v.len)?;
        check_dim("mul_row", m.cols, self.len)?;
        let x = v.as_slice();
        for (j, out) in self.as_mut_slice().iter_mut().enumerate() {
            *out = (0..m.rows).map(|i| x[i] * m.data[i * m.cols + j]).sum();
        }
        Ok(())
    }

    /// `true` when lengths match and every element differs by at most `epsilon`
    pub fn epsilon_equals(&self, other: &DenseVector, epsilon: f64) -> bool {
        self.len == other.len
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice())
                .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl PartialEq for DenseVector {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl From<Vec<f64>> for DenseVector {
    fn from(data: Vec<f64>) -> Self {
        Self {
            len: data.len(),
            data,
        }
    }
}

impl fmt::Display for DenseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.as_slice().iter().enumerate() {
            if i > 0 {
                write!(f, "\t")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

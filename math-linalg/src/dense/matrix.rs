//! Dense row-major matrix of `f64`
//!
//! [`DenseMatrix`] owns a flat buffer with `rows * cols` entries where
//! `data[i * cols + j]` is the element at row `i`, column `j`. The shape only
//! changes through [`DenseMatrix::resize`] (or an explicit `set_*` that is
//! documented to resize).
//!
//! Products and in-place transposes compute into a fresh buffer before
//! committing, so `a.mul(&b)` gives the same numbers as
//! `c.set_product(&a, &b)`.

use crate::dense::DenseVector;
use crate::error::{LinalgError, Result, check_dim, check_index, checked_size};
use std::fmt;

/// General-size dense matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "crate::dense::convert::MatrixRepr")
)]
pub struct DenseMatrix {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) data: Vec<f64>,
}

impl DenseMatrix {
    /// Create a `rows x cols` matrix set to the identity pattern
    ///
    /// Ones where `row == col`, zeros elsewhere. Rectangular shapes are allowed.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut m = Self::zeros(rows, cols);
        m.set_identity();
        m
    }

    /// Same as [`DenseMatrix::new`] but with signed sizes, for callers that
    /// carry dimensions as signed integers.
    pub fn try_new(rows: i64, cols: i64) -> Result<Self> {
        Ok(Self::new(checked_size(rows)?, checked_size(cols)?))
    }

    /// Create a `rows x cols` matrix filled with zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a matrix from the first `rows * cols` entries of `values`, row-major
    pub fn from_row_slice(rows: usize, cols: usize, values: &[f64]) -> Result<Self> {
        let needed = rows * cols;
        if values.len() < needed {
            return Err(LinalgError::DimensionMismatch {
                op: "from_row_slice",
                expected: needed,
                got: values.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            data: values[..needed].to_vec(),
        })
    }

    /// Build a matrix by evaluating `f(row, col)` for every element
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// Number of rows
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// `true` when `rows == cols`
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major view of the storage
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major view of the storage
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    #[inline]
    pub(crate) fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Element at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.check_element(row, col)?;
        Ok(self.data[self.idx(row, col)])
    }

    /// Set the element at `(row, col)`
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        self.check_element(row, col)?;
        let k = self.idx(row, col);
        self.data[k] = value;
        Ok(())
    }

    fn check_element(&self, row: usize, col: usize) -> Result<()> {
        check_index("row", row, self.rows)?;
        check_index("column", col, self.cols)
    }

    pub(crate) fn require_square(&self) -> Result<()> {
        if self.is_square() {
            Ok(())
        } else {
            Err(LinalgError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    fn require_same_shape(&self, op: &'static str, other: &DenseMatrix) -> Result<()> {
        check_dim(op, self.rows, other.rows)?;
        check_dim(op, self.cols, other.cols)
    }

    // ------------------------------------------------------------------
    // Whole-matrix setters
    // ------------------------------------------------------------------

    /// Ones on the leading diagonal, zeros elsewhere
    pub fn set_identity(&mut self) {
        self.set_scale(1.0);
    }

    /// Set every element to zero, keeping the shape
    pub fn set_zero(&mut self) {
        self.data.fill(0.0);
    }

    /// `scale` on the leading diagonal, zeros elsewhere
    pub fn set_scale(&mut self, scale: f64) {
        self.data.fill(0.0);
        for i in 0..self.rows.min(self.cols) {
            let k = self.idx(i, i);
            self.data[k] = scale;
        }
    }

    /// `self = I - self`
    pub fn identity_minus(&mut self) {
        for i in 0..self.rows {
            for j in 0..self.cols {
                let k = self.idx(i, j);
                let id = if i == j { 1.0 } else { 0.0 };
                self.data[k] = id - self.data[k];
            }
        }
    }

    /// Copy `other` into `self`, taking its shape.
    pub fn set_from(&mut self, other: &DenseMatrix) {
        self.rows = other.rows;
        self.cols = other.cols;
        self.data.clear();
        self.data.extend_from_slice(&other.data);
    }

    /// Overwrite all elements from a row-major slice of at least `rows * cols` entries
    pub fn set_from_row_slice(&mut self, values: &[f64]) -> Result<()> {
        let needed = self.data.len();
        if values.len() < needed {
            return Err(LinalgError::DimensionMismatch {
                op: "set_from_row_slice",
                expected: needed,
                got: values.len(),
            });
        }
        self.data.copy_from_slice(&values[..needed]);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Element-wise arithmetic
    // ------------------------------------------------------------------

    /// `self += other`
    pub fn add(&mut self, other: &DenseMatrix) -> Result<()> {
        self.require_same_shape("add", other)?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += *b;
        }
        Ok(())
    }

    /// `self = a + b`
    pub fn add_pair(&mut self, a: &DenseMatrix, b: &DenseMatrix) -> Result<()> {
        self.require_same_shape("add", a)?;
        self.require_same_shape("add", b)?;
        for ((out, x), y) in self.data.iter_mut().zip(a.data.iter()).zip(b.data.iter()) {
            *out = *x + *y;
        }
        Ok(())
    }

    /// `self -= other`
    pub fn sub(&mut self, other: &DenseMatrix) -> Result<()> {
        self.require_same_shape("sub", other)?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a -= *b;
        }
        Ok(())
    }

    /// `self = a - b`
    pub fn sub_pair(&mut self, a: &DenseMatrix, b: &DenseMatrix) -> Result<()> {
        self.require_same_shape("sub", a)?;
        self.require_same_shape("sub", b)?;
        for ((out, x), y) in self.data.iter_mut().zip(a.data.iter()).zip(b.data.iter()) {
            *out = *x - *y;
        }
        Ok(())
    }

    /// Multiply every element by `s`
    pub fn scale(&mut self, s: f64) {
        for v in self.data.iter_mut() {
            *v *= s;
        }
    }

    /// `self = -self`
    pub fn negate(&mut self) {
        for v in self.data.iter_mut() {
            *v = -*v;
        }
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    /// `self = a * b`
    ///
    /// Requires `a.cols == b.rows` and `self` shaped `a.rows x b.cols`.
    pub fn set_product(&mut self, a: &DenseMatrix, b: &DenseMatrix) -> Result<()> {
        self.commit_product("mul", a, false, b, false)
    }

    /// `self = self * other`, with `other` square of size `self.cols`
    pub fn mul(&mut self, other: &DenseMatrix) -> Result<()> {
        check_dim("mul", self.cols, other.rows)?;
        check_dim("mul", self.cols, other.cols)?;
        self.data = product(self, false, other, false);
        Ok(())
    }

    /// `self = other * self`, with `other` square of size `self.rows`
    pub fn mul_left(&mut self, other: &DenseMatrix) -> Result<()> {
        check_dim("mul_left", self.rows, other.cols)?;
        check_dim("mul_left", self.rows, other.rows)?;
        self.data = product(other, false, self, false);
        Ok(())
    }

    /// `self = aᵗ * bᵗ`
    pub fn mul_transpose_both(&mut self, a: &DenseMatrix, b: &DenseMatrix) -> Result<()> {
        self.commit_product("mul_transpose_both", a, true, b, true)
    }

    /// `self = a * bᵗ`
    pub fn mul_transpose_right(&mut self, a: &DenseMatrix, b: &DenseMatrix) -> Result<()> {
        self.commit_product("mul_transpose_right", a, false, b, true)
    }

    /// `self = aᵗ * b`
    pub fn mul_transpose_left(&mut self, a: &DenseMatrix, b: &DenseMatrix) -> Result<()> {
        self.commit_product("mul_transpose_left", a, true, b, false)
    }

    /// `self = v1 * v2ᵗ` (outer product)
    pub fn set_outer_product(&mut self, v1: &DenseVector, v2: &DenseVector) -> Result<()> {
        check_dim("outer_product", self.rows, v1.len())?;
        check_dim("outer_product", self.cols, v2.len())?;
        let (x, y) = (v1.as_slice(), v2.as_slice());
        for i in 0..self.rows {
            for j in 0..self.cols {
                let k = self.idx(i, j);
                self.data[k] = x[i] * y[j];
            }
        }
        Ok(())
    }

    fn commit_product(
        &mut self,
        op: &'static str,
        a: &DenseMatrix,
        a_t: bool,
        b: &DenseMatrix,
        b_t: bool,
    ) -> Result<()> {
        let (a_rows, a_cols) = op_shape(a, a_t);
        let (b_rows, b_cols) = op_shape(b, b_t);
        check_dim(op, a_cols, b_rows)?;
        check_dim(op, a_rows, self.rows)?;
        check_dim(op, b_cols, self.cols)?;
        self.data = product(a, a_t, b, b_t);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transpose
    // ------------------------------------------------------------------

    /// Transpose in place
    ///
    /// Square matrices swap element pairs; rectangular ones are rebuilt in a
    /// fresh buffer and their dimensions swapped.
    pub fn transpose(&mut self) {
        if self.is_square() {
            let n = self.rows;
            for i in 0..n {
                for j in (i + 1)..n {
                    self.data.swap(i * n + j, j * n + i);
                }
            }
        } else {
            let mut buf = vec![0.0; self.data.len()];
            for i in 0..self.rows {
                for j in 0..self.cols {
                    buf[j * self.rows + i] = self.data[i * self.cols + j];
                }
            }
            self.data = buf;
            std::mem::swap(&mut self.rows, &mut self.cols);
        }
    }

    /// `self = mᵗ`; `self` must already be `m.cols x m.rows`
    pub fn set_transpose(&mut self, m: &DenseMatrix) -> Result<()> {
        check_dim("transpose", m.cols, self.rows)?;
        check_dim("transpose", m.rows, self.cols)?;
        for i in 0..m.rows {
            for j in 0..m.cols {
                let k = self.idx(j, i);
                self.data[k] = m.data[m.idx(i, j)];
            }
        }
        Ok(())
    }

    /// Return the transpose as a new matrix
    pub fn transposed(&self) -> DenseMatrix {
        let mut t = DenseMatrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                t.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        t
    }

    // ------------------------------------------------------------------
    // Resize
    // ------------------------------------------------------------------

    /// Change the shape to `rows x cols`
    ///
    /// The rectangle common to the old and new shapes keeps its values; every
    /// new cell is zero.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        if cols == self.cols {
            self.data.resize(rows * cols, 0.0);
        } else {
            let mut buf = vec![0.0; rows * cols];
            let keep_rows = rows.min(self.rows);
            let keep_cols = cols.min(self.cols);
            for i in 0..keep_rows {
                let src = i * self.cols;
                let dst = i * cols;
                buf[dst..dst + keep_cols].copy_from_slice(&self.data[src..src + keep_cols]);
            }
            self.data = buf;
        }
        self.rows = rows;
        self.cols = cols;
    }

    /// [`DenseMatrix::resize`] with signed sizes
    pub fn try_resize(&mut self, rows: i64, cols: i64) -> Result<()> {
        let rows = checked_size(rows)?;
        let cols = checked_size(cols)?;
        self.resize(rows, cols);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rows, columns and blocks
    // ------------------------------------------------------------------

    /// Copy of row `row`
    pub fn row(&self, row: usize) -> Result<DenseVector> {
        let mut out = vec![0.0; self.cols];
        self.copy_row_into(row, &mut out)?;
        Ok(DenseVector::from(out))
    }

    /// Copy of column `col`
    pub fn column(&self, col: usize) -> Result<DenseVector> {
        let mut out = vec![0.0; self.rows];
        self.copy_column_into(col, &mut out)?;
        Ok(DenseVector::from(out))
    }

    /// Copy row `row` into the first `cols` entries of `out`
    pub fn copy_row_into(&self, row: usize, out: &mut [f64]) -> Result<()> {
        check_index("row", row, self.rows)?;
        if out.len() < self.cols {
            return Err(LinalgError::DimensionMismatch {
                op: "copy_row",
                expected: self.cols,
                got: out.len(),
            });
        }
        let start = row * self.cols;
        out[..self.cols].copy_from_slice(&self.data[start..start + self.cols]);
        Ok(())
    }

    /// Copy column `col` into the first `rows` entries of `out`
    pub fn copy_column_into(&self, col: usize, out: &mut [f64]) -> Result<()> {
        check_index("column", col, self.cols)?;
        if out.len() < self.rows {
            return Err(LinalgError::DimensionMismatch {
                op: "copy_column",
                expected: self.rows,
                got: out.len(),
            });
        }
        for (i, o) in out.iter_mut().take(self.rows).enumerate() {
            *o = self.data[i * self.cols + col];
        }
        Ok(())
    }

    /// Overwrite row `row` from the first `cols` entries of `values`
    pub fn set_row(&mut self, row: usize, values: &[f64]) -> Result<()> {
        check_index("row", row, self.rows)?;
        if values.len() < self.cols {
            return Err(LinalgError::DimensionMismatch {
                op: "set_row",
                expected: self.cols,
                got: values.len(),
            });
        }
        let start = row * self.cols;
        self.data[start..start + self.cols].copy_from_slice(&values[..self.cols]);
        Ok(())
    }

    /// Overwrite column `col` from the first `rows` entries of `values`
    pub fn set_column(&mut self, col: usize, values: &[f64]) -> Result<()> {
        check_index("column", col, self.cols)?;
        if values.len() < self.rows {
            return Err(LinalgError::DimensionMismatch {
                op: "set_column",
                expected: self.rows,
                got: values.len(),
            });
        }
        for (i, v) in values.iter().take(self.rows).enumerate() {
            let k = self.idx(i, col);
            self.data[k] = *v;
        }
        Ok(())
    }

    /// Overwrite row `row` with `v`, which must have `cols` entries
    pub fn set_row_vector(&mut self, row: usize, v: &DenseVector) -> Result<()> {
        check_dim("set_row", self.cols, v.len())?;
        self.set_row(row, v.as_slice())
    }

    /// Overwrite column `col` with `v`, which must have `rows` entries
    pub fn set_column_vector(&mut self, col: usize, v: &DenseVector) -> Result<()> {
        check_dim("set_column", self.rows, v.len())?;
        self.set_column(col, v.as_slice())
    }

    /// Copy the `size.0 x size.1` block starting at `src` into `target` at `dst`
    ///
    /// Both blocks must lie fully inside their matrices.
    pub fn copy_sub_matrix(
        &self,
        src: (usize, usize),
        size: (usize, usize),
        target: &mut DenseMatrix,
        dst: (usize, usize),
    ) -> Result<()> {
        self.check_block(src, size)?;
        target.check_block(dst, size)?;
        for i in 0..size.0 {
            let s = self.idx(src.0 + i, src.1);
            let d = target.idx(dst.0 + i, dst.1);
            target.data[d..d + size.1].copy_from_slice(&self.data[s..s + size.1]);
        }
        Ok(())
    }

    /// Block copy inside one matrix; overlapping blocks are handled through a buffer
    pub fn copy_sub_matrix_within(
        &mut self,
        src: (usize, usize),
        size: (usize, usize),
        dst: (usize, usize),
    ) -> Result<()> {
        self.check_block(src, size)?;
        self.check_block(dst, size)?;
        let mut block = DenseMatrix::zeros(size.0, size.1);
        self.copy_sub_matrix(src, size, &mut block, (0, 0))?;
        block.copy_sub_matrix((0, 0), size, self, dst)
    }

    fn check_block(&self, origin: (usize, usize), size: (usize, usize)) -> Result<()> {
        let row_end = origin.0 + size.0;
        let col_end = origin.1 + size.1;
        if row_end > self.rows {
            return Err(LinalgError::IndexOutOfRange {
                axis: "row",
                index: row_end - 1,
                len: self.rows,
            });
        }
        if col_end > self.cols {
            return Err(LinalgError::IndexOutOfRange {
                axis: "column",
                index: col_end - 1,
                len: self.cols,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reductions and comparison
    // ------------------------------------------------------------------

    /// Sum of the diagonal elements (square matrices only)
    pub fn trace(&self) -> Result<f64> {
        self.require_square()?;
        Ok((0..self.rows).map(|i| self.data[self.idx(i, i)]).sum())
    }

    /// `true` when shapes match and every element differs by at most `epsilon`
    pub fn epsilon_equals(&self, other: &DenseMatrix, epsilon: f64) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Largest absolute element-wise difference, `None` if shapes differ
    pub fn max_abs_diff(&self, other: &DenseMatrix) -> Option<f64> {
        if self.shape() != other.shape() {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
        )
    }
}

#[inline]
fn op_shape(m: &DenseMatrix, transposed: bool) -> (usize, usize) {
    if transposed {
        (m.cols, m.rows)
    } else {
        (m.rows, m.cols)
    }
}

/// `op(a) * op(b)` into a fresh row-major buffer; shapes are checked by the caller
fn product(a: &DenseMatrix, a_t: bool, b: &DenseMatrix, b_t: bool) -> Vec<f64> {
    let (m, k) = op_shape(a, a_t);
    let n = op_shape(b, b_t).1;
    let a_at = |i: usize, p: usize| {
        if a_t {
            a.data[p * a.cols + i]
        } else {
            a.data[i * a.cols + p]
        }
    };
    let b_at = |p: usize, j: usize| {
        if b_t {
            b.data[j * b.cols + p]
        } else {
            b.data[p * b.cols + j]
        }
    };

    let mut out = vec![0.0; m * n];
    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0;
            for p in 0..k {
                sum += a_at(i, p) * b_at(p, j);
            }
            out[i * n + j] = sum;
        }
    }
    out
}

impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for i in 0..self.rows {
            write!(f, "  [")?;
            for j in 0..self.cols {
                if j > 0 {
                    write!(f, "\t")?;
                }
                write!(f, "{}", self.data[i * self.cols + j])?;
            }
            writeln!(f, "]")?;
        }
        write!(f, "]")
    }
}

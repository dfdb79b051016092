//! Matrix inversion and determinant through LU factorization

use super::lu::{LuFactorization, lu_back_solve};
use crate::dense::DenseMatrix;
use crate::error::{LinalgError, Result, check_dim};

impl DenseMatrix {
    /// Replace `self` by its inverse
    ///
    /// Factors once, then back-solves each column of the identity. A
    /// singular matrix (an exactly zero or non-finite pivot) is left
    /// unchanged and reported as [`LinalgError::Singular`].
    pub fn invert(&mut self) -> Result<()> {
        let inv = self.inverse()?;
        self.data = inv.data;
        Ok(())
    }

    /// `self = m⁻¹`; `self` must already have the shape of `m`
    pub fn set_inverse(&mut self, m: &DenseMatrix) -> Result<()> {
        check_dim("set_inverse", m.rows, self.rows)?;
        check_dim("set_inverse", m.cols, self.cols)?;
        let inv = m.inverse()?;
        self.data = inv.data;
        Ok(())
    }

    /// A new matrix holding the inverse of `self`
    pub fn inverse(&self) -> Result<DenseMatrix> {
        let lu = LuFactorization::new(self)?;
        if lu.is_singular() {
            log::debug!(
                "Refusing to invert singular {}x{} matrix",
                self.rows,
                self.cols
            );
            return Err(LinalgError::Singular);
        }

        let n = lu.dim();
        let mut inv = DenseMatrix::zeros(n, n);
        let mut e = vec![0.0; n];
        let mut col = vec![0.0; n];
        for j in 0..n {
            e.fill(0.0);
            e[j] = 1.0;
            lu_back_solve(&lu.lu, &lu.permutation, &e, &mut col)?;
            for (i, c) in col.iter().enumerate() {
                inv.data[i * n + j] = *c;
            }
        }
        Ok(inv)
    }

    /// Determinant of a square matrix
    pub fn determinant(&self) -> Result<f64> {
        Ok(LuFactorization::new(self)?.determinant())
    }
}

//! LU decomposition solver
//!
//! Crout's method with partial pivoting on a square [`DenseMatrix`], and the
//! matching forward/backward substitution.
//!
//! There is no zero-pivot guard: a singular matrix produces IEEE infinities
//! or NaNs in the factors and in any solution computed from them. Use
//! [`LuFactorization::is_singular`] (or [`DenseMatrix::invert`], which checks
//! it) when that matters.

use crate::dense::{DenseMatrix, DenseVector};
use crate::error::{Result, check_dim, check_index};

/// Decompose `a` in place into its combined LU form
///
/// On return `a` holds U on and above the diagonal and the multipliers of
/// the unit lower-triangular L below it. `permutation[i]` is the original row
/// now stored at row `i`. Returns the parity of the row swaps (`1.0` or `-1.0`).
pub fn lu_decompose(a: &mut DenseMatrix, permutation: &mut [usize]) -> Result<f64> {
    a.require_square()?;
    let n = a.rows;
    check_dim("lu_decompose", n, permutation.len())?;

    for (i, p) in permutation.iter_mut().enumerate() {
        *p = i;
    }
    let mut sign = 1.0;
    let lu = &mut a.data;

    for j in 0..n {
        // Upper triangle of column j
        for i in 0..j {
            let mut sum = lu[i * n + j];
            for k in 0..i {
                sum -= lu[i * n + k] * lu[k * n + j];
            }
            lu[i * n + j] = sum;
        }

        // Rest of the column, keeping track of the largest candidate pivot
        let mut big = 0.0;
        let mut pivot_row = j;
        for i in j..n {
            let mut sum = lu[i * n + j];
            for k in 0..j {
                sum -= lu[i * n + k] * lu[k * n + j];
            }
            lu[i * n + j] = sum;
            if sum.abs() > big {
                big = sum.abs();
                pivot_row = i;
            }
        }

        if pivot_row != j {
            for k in 0..n {
                lu.swap(pivot_row * n + k, j * n + k);
            }
            permutation.swap(pivot_row, j);
            sign = -sign;
            log::trace!("LU column {}: swapped rows {} and {}", j, j, pivot_row);
        }

        if j + 1 != n {
            let pivot = lu[j * n + j];
            for i in (j + 1)..n {
                lu[i * n + j] /= pivot;
            }
        }
    }

    Ok(sign)
}

/// Solve `(LU) x = b` for `x` given a factorization from [`lu_decompose`]
///
/// `b` and `x` are distinct buffers of length n.
pub fn lu_back_solve(
    lu: &DenseMatrix,
    permutation: &[usize],
    b: &[f64],
    x: &mut [f64],
) -> Result<()> {
    lu.require_square()?;
    let n = lu.rows;
    check_dim("lu_back_solve", n, permutation.len())?;
    check_dim("lu_back_solve", n, b.len())?;
    check_dim("lu_back_solve", n, x.len())?;
    let a = &lu.data;

    for (xi, &p) in x.iter_mut().zip(permutation) {
        check_index("element", p, n)?;
        *xi = b[p];
    }

    // Forward substitution, L has a unit diagonal. Leading zeros of the
    // permuted right-hand side contribute nothing and are skipped.
    let mut first_nonzero: Option<usize> = None;
    for i in 0..n {
        let mut sum = x[i];
        if let Some(start) = first_nonzero {
            for k in start..i {
                sum -= a[i * n + k] * x[k];
            }
        } else if sum != 0.0 {
            first_nonzero = Some(i);
        }
        x[i] = sum;
    }

    // Backward substitution
    for i in (0..n).rev() {
        let mut sum = x[i];
        for k in (i + 1)..n {
            sum -= a[i * n + k] * x[k];
        }
        x[i] = sum / a[i * n + i];
    }

    Ok(())
}

impl DenseMatrix {
    /// LU-decompose `self` in place, see [`lu_decompose`]
    pub fn lu_decompose(&mut self, permutation: &mut [usize]) -> Result<f64> {
        lu_decompose(self, permutation)
    }

    /// LU-decompose a copy of `self` into `lu`, which must have the same shape
    pub fn lu_decompose_into(
        &self,
        lu: &mut DenseMatrix,
        permutation: &mut [usize],
    ) -> Result<f64> {
        check_dim("lu_decompose", self.rows, lu.rows)?;
        check_dim("lu_decompose", self.cols, lu.cols)?;
        lu.data.copy_from_slice(&self.data);
        lu_decompose(lu, permutation)
    }
}

impl DenseVector {
    /// `self = x` solving `(LU) x = b`
    pub fn lu_back_solve(
        &mut self,
        lu: &DenseMatrix,
        b: &DenseVector,
        permutation: &[usize],
    ) -> Result<()> {
        lu_back_solve(lu, permutation, b.as_slice(), self.as_mut_slice())
    }
}

/// LU factorization result
///
/// Owns the combined L/U matrix together with the pivoting information.
#[derive(Debug, Clone)]
pub struct LuFactorization {
    /// Combined L and U matrices (L is unit lower triangular, stored below diagonal)
    pub(crate) lu: DenseMatrix,
    /// `permutation[i]` is the row of the original matrix stored at row `i`
    pub(crate) permutation: Vec<usize>,
    /// Parity of the row swaps, `1.0` or `-1.0`
    pub(crate) sign: f64,
}

impl LuFactorization {
    /// Factor a square matrix
    pub fn new(a: &DenseMatrix) -> Result<Self> {
        let mut lu = a.clone();
        let mut permutation = vec![0; a.rows];
        let sign = lu_decompose(&mut lu, &mut permutation)?;
        Ok(Self {
            lu,
            permutation,
            sign,
        })
    }

    /// Matrix dimension
    pub fn dim(&self) -> usize {
        self.lu.rows
    }

    /// Combined L/U matrix in the layout produced by [`lu_decompose`]
    pub fn lu(&self) -> &DenseMatrix {
        &self.lu
    }

    /// Row permutation: entry `i` is the original row now at row `i`
    pub fn permutation(&self) -> &[usize] {
        &self.permutation
    }

    /// Parity of the row swaps, `1.0` or `-1.0`
    pub fn sign(&self) -> f64 {
        self.sign
    }

    /// Solve Ax = b using the pre-computed LU factorization
    pub fn solve(&self, b: &DenseVector) -> Result<DenseVector> {
        let mut x = DenseVector::zeros(self.dim());
        self.solve_into(b, &mut x)?;
        Ok(x)
    }

    /// Solve into a caller-owned `x` of length n
    pub fn solve_into(&self, b: &DenseVector, x: &mut DenseVector) -> Result<()> {
        x.lu_back_solve(&self.lu, b, &self.permutation)
    }

    /// `true` if a diagonal entry of U is exactly zero or not finite
    pub fn is_singular(&self) -> bool {
        let n = self.dim();
        (0..n).any(|i| {
            let d = self.lu.data[i * n + i];
            d == 0.0 || !d.is_finite()
        })
    }

    /// Determinant of the factored matrix: sign times the product of U's diagonal
    ///
    /// An exactly zero pivot gives `0.0` even when later entries of the
    /// factors were poisoned by the division by that pivot.
    pub fn determinant(&self) -> f64 {
        let n = self.dim();
        let mut det = self.sign;
        for i in 0..n {
            let d = self.lu.data[i * n + i];
            if d == 0.0 {
                return 0.0;
            }
            det *= d;
        }
        det
    }

    /// Unit lower-triangular factor L
    pub fn lower(&self) -> DenseMatrix {
        let n = self.dim();
        DenseMatrix::from_fn(n, n, |i, j| match i.cmp(&j) {
            std::cmp::Ordering::Greater => self.lu.data[i * n + j],
            std::cmp::Ordering::Equal => 1.0,
            std::cmp::Ordering::Less => 0.0,
        })
    }

    /// Upper-triangular factor U
    pub fn upper(&self) -> DenseMatrix {
        let n = self.dim();
        DenseMatrix::from_fn(n, n, |i, j| {
            if i <= j { self.lu.data[i * n + j] } else { 0.0 }
        })
    }

    /// Permutation matrix P such that `P * A = L * U`
    pub fn permutation_matrix(&self) -> DenseMatrix {
        let n = self.dim();
        DenseMatrix::from_fn(n, n, |i, j| {
            if self.permutation[i] == j { 1.0 } else { 0.0 }
        })
    }
}

/// Solve Ax = b using LU decomposition
///
/// This is a convenience function that combines factorization and solve.
pub fn lu_solve(a: &DenseMatrix, b: &DenseVector) -> Result<DenseVector> {
    LuFactorization::new(a)?.solve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinalgError;
    use approx::assert_relative_eq;

    fn system_3x3() -> DenseMatrix {
        DenseMatrix::from_row_slice(3, 3, &[2.0, 1.0, 4.0, 1.0, -2.0, 3.0, -3.0, -1.0, 1.0])
            .unwrap()
    }

    #[test]
    fn test_lu_solve_real() {
        let a = DenseMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]).unwrap();
        let b = DenseVector::from_slice(&[1.0, 2.0]);

        let x = lu_solve(&a, &b).expect("LU solve should succeed");

        // Verify: Ax = b
        let mut ax = DenseVector::zeros(2);
        ax.mul(&a, &x).unwrap();
        for i in 0..2 {
            assert_relative_eq!(ax.get(i).unwrap(), b.get(i).unwrap(), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_lu_identity() {
        let n = 5;
        let a = DenseMatrix::new(n, n);
        let b = DenseVector::from((1..=n).map(|i| i as f64).collect::<Vec<_>>());

        let x = lu_solve(&a, &b).expect("LU solve should succeed");
        assert_eq!(x, b);
    }

    #[test]
    fn test_crout_pivoting_and_reconstruction() {
        let a = system_3x3();
        let f = LuFactorization::new(&a).unwrap();

        // Largest entry of column 0 is -3 in row 2
        assert_eq!(f.permutation[0], 2);
        assert_eq!(f.lu.get(0, 0).unwrap(), -3.0);

        let mut lu = DenseMatrix::zeros(3, 3);
        lu.set_product(&f.lower(), &f.upper()).unwrap();
        let mut pa = DenseMatrix::zeros(3, 3);
        pa.set_product(&f.permutation_matrix(), &a).unwrap();
        assert!(lu.epsilon_equals(&pa, 1e-12));
        assert_relative_eq!(f.determinant(), -36.0, epsilon = 1e-12);
    }

    #[test]
    fn test_accessors_match_free_decomposition() {
        let a = system_3x3();
        let f = LuFactorization::new(&a).unwrap();

        let mut lu = a.clone();
        let mut perm = vec![0; 3];
        let sign = lu_decompose(&mut lu, &mut perm).unwrap();

        assert_eq!(f.lu(), &lu);
        assert_eq!(f.permutation(), perm.as_slice());
        assert_eq!(f.sign(), sign);
        assert_eq!(f.lu().shape(), (f.dim(), f.dim()));
        assert_eq!(f.permutation().len(), f.dim());
    }

    #[test]
    fn test_sign_tracks_swaps() {
        // Swapping rows of the identity needs exactly one exchange
        let a = DenseMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]).unwrap();
        let mut lu = a.clone();
        let mut perm = vec![0; 2];
        let sign = lu.lu_decompose(&mut perm).unwrap();
        assert_eq!(sign, -1.0);
        assert_eq!(perm, vec![1, 0]);
    }

    #[test]
    fn test_factorize_and_solve_multiple_rhs() {
        let a = DenseMatrix::from_row_slice(3, 3, &[4.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0])
            .unwrap();
        let factorization = LuFactorization::new(&a).expect("Factorization should succeed");

        for rhs in [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [0.0, 0.0, 1.0]] {
            let b = DenseVector::from(rhs);
            let x = factorization.solve(&b).expect("Solve should succeed");
            let mut ax = DenseVector::zeros(3);
            ax.mul(&a, &x).unwrap();
            assert!(ax.epsilon_equals(&b, 1e-12));
        }
    }

    #[test]
    fn test_decompose_into_leaves_source() {
        let a = system_3x3();
        let mut lu = DenseMatrix::zeros(3, 3);
        let mut perm = vec![0; 3];
        a.lu_decompose_into(&mut lu, &mut perm).unwrap();
        assert_eq!(a, system_3x3());
        assert_ne!(lu, a);
        assert!(
            a.lu_decompose_into(&mut DenseMatrix::zeros(2, 2), &mut perm)
                .is_err()
        );
    }

    #[test]
    fn test_non_square_rejected() {
        let mut a = DenseMatrix::zeros(2, 3);
        let mut perm = vec![0; 2];
        assert!(matches!(
            a.lu_decompose(&mut perm),
            Err(LinalgError::NotSquare { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_bad_lengths_rejected() {
        let f = LuFactorization::new(&system_3x3()).unwrap();
        let mut x = DenseVector::zeros(2);
        assert!(f.solve_into(&DenseVector::zeros(3), &mut x).is_err());
        assert!(f.solve(&DenseVector::zeros(4)).is_err());

        let mut y = [0.0; 3];
        assert!(matches!(
            lu_back_solve(&f.lu, &[0, 1, 7], &[1.0, 1.0, 1.0], &mut y),
            Err(LinalgError::IndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn test_singular_propagates_non_finite() {
        let a = DenseMatrix::from_row_slice(2, 2, &[0.0, 0.0, 0.0, 0.0]).unwrap();
        let f = LuFactorization::new(&a).unwrap();
        assert!(f.is_singular());
        assert_eq!(f.determinant(), 0.0);

        let x = f.solve(&DenseVector::from_slice(&[1.0, 1.0])).unwrap();
        assert!(x.as_slice().iter().all(|v| !v.is_finite()));
    }

    #[test]
    fn test_rank_deficient_determinant_is_zero() {
        let a = DenseMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]).unwrap();
        let f = LuFactorization::new(&a).unwrap();
        assert!(f.is_singular());
        assert_eq!(f.determinant(), 0.0);
    }
}

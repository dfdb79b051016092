//! Singular value decomposition
//!
//! Golub-Reinsch: Householder reduction to bidiagonal form, accumulation of
//! the left and right transformations, then implicit-shift QR sweeps on the
//! bidiagonal until every superdiagonal entry vanishes at machine precision.
//!
//! The sweeps run on a square `max(m, n)` working buffer. A tall input is
//! zero-padded on the right; a wide input is decomposed through its
//! transpose so the padding always lands in trailing columns and the padded
//! block of V stays an exact identity.

use crate::dense::{DenseMatrix, DenseVector};
use crate::error::{LinalgError, Result, check_dim};

/// SVD configuration
#[derive(Debug, Clone)]
pub struct SvdConfig {
    /// Maximum number of QR sweeps per singular value
    pub max_iterations: usize,
    /// Log progress every N sweeps (0 = no output)
    pub print_interval: usize,
}

impl Default for SvdConfig {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            print_interval: 0,
        }
    }
}

/// Result of an in-place SVD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvdOutcome {
    /// All singular values converged; `rank` counts the strictly positive ones
    Converged { rank: usize },
    /// Singular value `index` was still moving after `iterations` sweeps
    NotConverged { index: usize, iterations: usize },
}

impl SvdOutcome {
    /// The rank, if the decomposition converged
    pub fn rank(&self) -> Option<usize> {
        match self {
            SvdOutcome::Converged { rank } => Some(*rank),
            SvdOutcome::NotConverged { .. } => None,
        }
    }

    /// `true` for [`SvdOutcome::Converged`]
    pub fn is_converged(&self) -> bool {
        matches!(self, SvdOutcome::Converged { .. })
    }
}

/// Raw factors: U is m x m, V is n x n, `w` has min(m, n) entries
struct Factors {
    u: Vec<f64>,
    w: Vec<f64>,
    v: Vec<f64>,
    sweeps: usize,
}

impl DenseMatrix {
    /// Decompose `self` (m x n) into `u` (m x m), `w` (m x n) and `v` (n x n)
    /// such that `self = u * w * vᵗ`
    ///
    /// `w` gets the non-negative singular values on its leading diagonal and
    /// zeros elsewhere. When the sweeps do not converge the outputs are left
    /// untouched and [`SvdOutcome::NotConverged`] is returned.
    pub fn svd(
        &self,
        u: &mut DenseMatrix,
        w: &mut DenseMatrix,
        v: &mut DenseMatrix,
    ) -> Result<SvdOutcome> {
        self.svd_with_config(u, w, v, &SvdConfig::default())
    }

    /// [`DenseMatrix::svd`] with an explicit sweep budget and logging interval
    pub fn svd_with_config(
        &self,
        u: &mut DenseMatrix,
        w: &mut DenseMatrix,
        v: &mut DenseMatrix,
        config: &SvdConfig,
    ) -> Result<SvdOutcome> {
        let (m, n) = self.shape();
        check_dim("svd", m, u.rows)?;
        check_dim("svd", m, u.cols)?;
        check_dim("svd", m, w.rows)?;
        check_dim("svd", n, w.cols)?;
        check_dim("svd", n, v.rows)?;
        check_dim("svd", n, v.cols)?;

        let factors = match factor(self, config) {
            Ok(f) => f,
            Err(index) => {
                log::warn!(
                    "SVD did not converge: singular value {} after {} iterations",
                    index,
                    config.max_iterations
                );
                return Ok(SvdOutcome::NotConverged {
                    index,
                    iterations: config.max_iterations,
                });
            }
        };

        u.data = factors.u;
        v.data = factors.v;
        w.set_zero();
        for (i, &s) in factors.w.iter().enumerate() {
            let k = w.idx(i, i);
            w.data[k] = s;
        }

        let rank = factors.w.iter().filter(|&&s| s > 0.0).count();
        log::debug!(
            "SVD of {}x{} matrix converged with rank {} ({} sweeps at most)",
            m,
            n,
            rank,
            factors.sweeps
        );
        Ok(SvdOutcome::Converged { rank })
    }
}

/// Factor `a`; `Err(index)` names the singular value that failed to converge
fn factor(a: &DenseMatrix, config: &SvdConfig) -> std::result::Result<Factors, usize> {
    let (m, n) = a.shape();
    if m < n {
        // Aᵗ = U' W' V'ᵗ  gives  A = V' W'ᵗ U'ᵗ
        let f = factor(&a.transposed(), config)?;
        return Ok(Factors {
            u: f.v,
            w: f.w,
            v: f.u,
            sweeps: f.sweeps,
        });
    }

    let s = m;
    let mut work = vec![0.0; s * s];
    for i in 0..m {
        work[i * s..i * s + n].copy_from_slice(&a.data[i * n..(i + 1) * n]);
    }
    let mut w = vec![0.0; s];
    let mut v = vec![0.0; s * s];
    let sweeps = golub_reinsch(&mut work, s, s, &mut w, &mut v, config)?;

    let mut v_n = vec![0.0; n * n];
    for i in 0..n {
        v_n[i * n..(i + 1) * n].copy_from_slice(&v[i * s..i * s + n]);
    }
    w.truncate(n);
    flush_negligible(&mut w, s);

    Ok(Factors {
        u: work,
        w,
        v: v_n,
        sweeps,
    })
}

/// Zero the singular values that are pure round-off relative to the largest
/// one, so that rank counting (strictly positive values) sees exact zeros.
///
/// This rewrites `w` itself: a value at or below `dim * ε * max(w)` comes
/// back as exactly `0.0` in W, in `singular_values()` and in the back-solve,
/// not only in the rank count.
fn flush_negligible(w: &mut [f64], dim: usize) {
    let largest = w.iter().copied().fold(0.0, f64::max);
    let threshold = dim as f64 * f64::EPSILON * largest;
    for s in w.iter_mut() {
        if *s <= threshold {
            *s = 0.0;
        }
    }
}

#[inline]
fn sign(a: f64, b: f64) -> f64 {
    if b >= 0.0 { a.abs() } else { -a.abs() }
}

/// Golub-Reinsch SVD of the `m x n` (m >= n) row-major buffer `a`
///
/// On success `a` holds U (m x n), `w` the n singular values and `v` the
/// n x n matrix V, and the result is the largest number of QR sweeps any
/// single value needed. Each value gets at most `config.max_iterations`
/// sweeps. Convergence and splitting are decided by `|x| + anorm == anorm`.
#[allow(clippy::needless_range_loop)]
fn golub_reinsch(
    a: &mut [f64],
    m: usize,
    n: usize,
    w: &mut [f64],
    v: &mut [f64],
    config: &SvdConfig,
) -> std::result::Result<usize, usize> {
    let mut rv1 = vec![0.0; n];
    let mut g = 0.0;
    let mut scale = 0.0;
    let mut anorm: f64 = 0.0;
    let mut l = 0;

    // Householder reduction to bidiagonal form
    for i in 0..n {
        l = i + 1;
        rv1[i] = scale * g;
        g = 0.0;
        scale = 0.0;
        let mut s = 0.0;
        if i < m {
            for k in i..m {
                scale += a[k * n + i].abs();
            }
            if scale != 0.0 {
                for k in i..m {
                    a[k * n + i] /= scale;
                    s += a[k * n + i] * a[k * n + i];
                }
                let f = a[i * n + i];
                g = -sign(s.sqrt(), f);
                let h = f * g - s;
                a[i * n + i] = f - g;
                for j in l..n {
                    let mut s = 0.0;
                    for k in i..m {
                        s += a[k * n + i] * a[k * n + j];
                    }
                    let f = s / h;
                    for k in i..m {
                        a[k * n + j] += f * a[k * n + i];
                    }
                }
                for k in i..m {
                    a[k * n + i] *= scale;
                }
            }
        }
        w[i] = scale * g;

        g = 0.0;
        scale = 0.0;
        s = 0.0;
        if i < m && i + 1 != n {
            for k in l..n {
                scale += a[i * n + k].abs();
            }
            if scale != 0.0 {
                for k in l..n {
                    a[i * n + k] /= scale;
                    s += a[i * n + k] * a[i * n + k];
                }
                let f = a[i * n + l];
                g = -sign(s.sqrt(), f);
                let h = f * g - s;
                a[i * n + l] = f - g;
                for k in l..n {
                    rv1[k] = a[i * n + k] / h;
                }
                for j in l..m {
                    let mut s = 0.0;
                    for k in l..n {
                        s += a[j * n + k] * a[i * n + k];
                    }
                    for k in l..n {
                        a[j * n + k] += s * rv1[k];
                    }
                }
                for k in l..n {
                    a[i * n + k] *= scale;
                }
            }
        }
        anorm = anorm.max(w[i].abs() + rv1[i].abs());
    }

    // Accumulation of right-hand transformations
    for i in (0..n).rev() {
        if i + 1 < n {
            if g != 0.0 {
                // Double division avoids a possible underflow
                for j in l..n {
                    v[j * n + i] = (a[i * n + j] / a[i * n + l]) / g;
                }
                for j in l..n {
                    let mut s = 0.0;
                    for k in l..n {
                        s += a[i * n + k] * v[k * n + j];
                    }
                    for k in l..n {
                        v[k * n + j] += s * v[k * n + i];
                    }
                }
            }
            for j in l..n {
                v[i * n + j] = 0.0;
                v[j * n + i] = 0.0;
            }
        }
        v[i * n + i] = 1.0;
        g = rv1[i];
        l = i;
    }

    // Accumulation of left-hand transformations
    for i in (0..m.min(n)).rev() {
        l = i + 1;
        g = w[i];
        for j in l..n {
            a[i * n + j] = 0.0;
        }
        if g != 0.0 {
            g = 1.0 / g;
            for j in l..n {
                let mut s = 0.0;
                for k in l..m {
                    s += a[k * n + i] * a[k * n + j];
                }
                let f = (s / a[i * n + i]) * g;
                for k in i..m {
                    a[k * n + j] += f * a[k * n + i];
                }
            }
            for j in i..m {
                a[j * n + i] *= g;
            }
        } else {
            for j in i..m {
                a[j * n + i] = 0.0;
            }
        }
        a[i * n + i] += 1.0;
    }

    // Diagonalization of the bidiagonal form
    let mut sweeps = 0;
    for k in (0..n).rev() {
        let mut its = 0;
        loop {
            its += 1;

            // Test for splitting; rv1[0] is always zero
            let mut cancel = true;
            let mut l = k;
            loop {
                if l == 0 || rv1[l].abs() + anorm == anorm {
                    cancel = false;
                    break;
                }
                if w[l - 1].abs() + anorm == anorm {
                    break;
                }
                l -= 1;
            }

            // Cancellation of rv1[l] when w[l - 1] is negligible
            if cancel {
                let nm = l - 1;
                let mut c = 0.0;
                let mut s = 1.0;
                for i in l..=k {
                    let f = s * rv1[i];
                    rv1[i] *= c;
                    if f.abs() + anorm == anorm {
                        break;
                    }
                    let g = w[i];
                    let h = f.hypot(g);
                    w[i] = h;
                    let h = 1.0 / h;
                    c = g * h;
                    s = -f * h;
                    for j in 0..m {
                        let y = a[j * n + nm];
                        let z = a[j * n + i];
                        a[j * n + nm] = y * c + z * s;
                        a[j * n + i] = z * c - y * s;
                    }
                }
            }

            let z = w[k];
            if l == k {
                // Converged; make the singular value non-negative
                if z < 0.0 {
                    w[k] = -z;
                    for j in 0..n {
                        v[j * n + k] = -v[j * n + k];
                    }
                }
                sweeps = sweeps.max(its - 1);
                break;
            }

            if its > config.max_iterations {
                return Err(k);
            }
            if config.print_interval > 0 && its % config.print_interval == 0 {
                log::debug!("SVD singular value {}: QR sweep {}", k, its);
            }

            // Shift from the bottom 2x2 minor
            let nm = k - 1;
            let mut x = w[l];
            let mut y = w[nm];
            let mut g = rv1[nm];
            let mut h = rv1[k];
            let mut f = ((y - z) * (y + z) + (g - h) * (g + h)) / (2.0 * h * y);
            g = f.hypot(1.0);
            f = ((x - z) * (x + z) + h * ((y / (f + sign(g, f))) - h)) / x;

            // Next QR transformation
            let mut c = 1.0;
            let mut s = 1.0;
            for j in l..=nm {
                let i = j + 1;
                g = rv1[i];
                y = w[i];
                h = s * g;
                g *= c;
                let mut z = f.hypot(h);
                rv1[j] = z;
                c = f / z;
                s = h / z;
                f = x * c + g * s;
                g = g * c - x * s;
                h = y * s;
                y *= c;
                for jj in 0..n {
                    let x = v[jj * n + j];
                    let z = v[jj * n + i];
                    v[jj * n + j] = x * c + z * s;
                    v[jj * n + i] = z * c - x * s;
                }
                z = f.hypot(h);
                w[j] = z;
                // Rotation can be arbitrary if z == 0
                if z != 0.0 {
                    z = 1.0 / z;
                    c = f * z;
                    s = h * z;
                }
                f = c * g + s * y;
                x = c * y - s * g;
                for jj in 0..m {
                    let y = a[jj * n + j];
                    let z = a[jj * n + i];
                    a[jj * n + j] = y * c + z * s;
                    a[jj * n + i] = z * c - y * s;
                }
            }
            rv1[l] = 0.0;
            rv1[k] = f;
            w[k] = x;
        }
    }

    Ok(sweeps)
}

/// Solve `A x = b` from the SVD factors of A (m x n)
///
/// `x = V * diag(1 / w_j) * Uᵗ * b`, where any exactly zero `w_j` contributes
/// nothing. For singular or rectangular systems this is the minimum-norm
/// least-squares solution.
pub fn svd_back_solve(
    u: &DenseMatrix,
    w: &DenseMatrix,
    v: &DenseMatrix,
    b: &[f64],
    x: &mut [f64],
) -> Result<()> {
    let (m, n) = w.shape();
    check_dim("svd_back_solve", m, u.rows)?;
    check_dim("svd_back_solve", m, u.cols)?;
    check_dim("svd_back_solve", n, v.rows)?;
    check_dim("svd_back_solve", n, v.cols)?;
    check_dim("svd_back_solve", m, b.len())?;
    check_dim("svd_back_solve", n, x.len())?;

    let mut tmp = vec![0.0; n];
    for (j, t) in tmp.iter_mut().enumerate().take(m.min(n)) {
        let wj = w.data[w.idx(j, j)];
        if wj != 0.0 {
            let mut s = 0.0;
            for (i, bi) in b.iter().enumerate() {
                s += u.data[i * m + j] * bi;
            }
            *t = s / wj;
        }
    }

    for (i, xi) in x.iter_mut().enumerate() {
        let row = &v.data[i * n..(i + 1) * n];
        *xi = row.iter().zip(&tmp).map(|(a, b)| a * b).sum();
    }
    Ok(())
}

impl DenseVector {
    /// `self = x` solving `(U W Vᵗ) x = b`, see [`svd_back_solve`]
    pub fn svd_back_solve(
        &mut self,
        u: &DenseMatrix,
        w: &DenseMatrix,
        v: &DenseMatrix,
        b: &DenseVector,
    ) -> Result<()> {
        svd_back_solve(u, w, v, b.as_slice(), self.as_mut_slice())
    }
}

/// SVD factorization result
///
/// Owns `U`, `W` and `V` with `A = U * W * Vᵗ`.
#[derive(Debug, Clone)]
pub struct SvdDecomposition {
    /// Left singular vectors (m x m)
    pub u: DenseMatrix,
    /// Singular values on the leading diagonal (m x n)
    pub w: DenseMatrix,
    /// Right singular vectors (n x n)
    pub v: DenseMatrix,
    /// Number of strictly positive singular values
    pub rank: usize,
}

impl SvdDecomposition {
    /// Decompose `a` with the default [`SvdConfig`]
    pub fn new(a: &DenseMatrix) -> Result<Self> {
        Self::with_config(a, &SvdConfig::default())
    }

    /// Decompose `a`, turning a non-converged sweep into [`LinalgError::NoConvergence`]
    pub fn with_config(a: &DenseMatrix, config: &SvdConfig) -> Result<Self> {
        let (m, n) = a.shape();
        let mut u = DenseMatrix::zeros(m, m);
        let mut w = DenseMatrix::zeros(m, n);
        let mut v = DenseMatrix::zeros(n, n);
        match a.svd_with_config(&mut u, &mut w, &mut v, config)? {
            SvdOutcome::Converged { rank } => Ok(Self { u, w, v, rank }),
            SvdOutcome::NotConverged { index, iterations } => {
                Err(LinalgError::NoConvergence { index, iterations })
            }
        }
    }

    /// The min(m, n) values on the diagonal of W, in decomposition order
    pub fn singular_values(&self) -> Vec<f64> {
        let k = self.w.rows.min(self.w.cols);
        (0..k).map(|i| self.w.data[self.w.idx(i, i)]).collect()
    }

    /// Minimum-norm least-squares solution of `A x = b`
    pub fn solve(&self, b: &DenseVector) -> Result<DenseVector> {
        let mut x = DenseVector::zeros(self.v.rows);
        x.svd_back_solve(&self.u, &self.w, &self.v, b)?;
        Ok(x)
    }

    /// `U * W * Vᵗ`
    pub fn reconstruct(&self) -> DenseMatrix {
        let (m, n) = self.w.shape();
        let sv = self.singular_values();
        DenseMatrix::from_fn(m, n, |i, j| {
            sv.iter()
                .enumerate()
                .map(|(k, s)| self.u.data[i * m + k] * s * self.v.data[j * n + k])
                .sum()
        })
    }

    /// Moore-Penrose pseudo-inverse `V * W⁺ * Uᵗ` (n x m)
    pub fn pseudo_inverse(&self) -> DenseMatrix {
        let (m, n) = self.w.shape();
        let sv = self.singular_values();
        DenseMatrix::from_fn(n, m, |i, j| {
            sv.iter()
                .enumerate()
                .filter(|(_, s)| **s != 0.0)
                .map(|(k, s)| self.v.data[i * n + k] * self.u.data[j * m + k] / s)
                .sum()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_orthonormal(q: &DenseMatrix, tol: f64) {
        let mut qtq = DenseMatrix::zeros(q.num_cols(), q.num_cols());
        qtq.mul_transpose_left(q, q).unwrap();
        let id = DenseMatrix::new(q.num_cols(), q.num_cols());
        assert!(qtq.epsilon_equals(&id, tol), "not orthonormal:\n{}", qtq);
    }

    #[test]
    fn test_svd_identity() {
        let a = DenseMatrix::new(3, 3);
        let svd = SvdDecomposition::new(&a).unwrap();
        assert_eq!(svd.rank, 3);
        for s in svd.singular_values() {
            assert_relative_eq!(s, 1.0, epsilon = 1e-12);
        }
        assert!(svd.reconstruct().epsilon_equals(&a, 1e-12));
    }

    #[test]
    fn test_svd_tall_shapes_and_reconstruction() {
        let a = DenseMatrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let mut u = DenseMatrix::zeros(3, 3);
        let mut w = DenseMatrix::zeros(3, 2);
        let mut v = DenseMatrix::zeros(2, 2);
        let outcome = a.svd(&mut u, &mut w, &mut v).unwrap();
        assert_eq!(outcome, SvdOutcome::Converged { rank: 2 });

        assert_orthonormal(&u, 1e-12);
        assert_orthonormal(&v, 1e-12);
        assert_eq!(w.get(2, 0).unwrap(), 0.0);
        assert_eq!(w.get(0, 1).unwrap(), 0.0);

        let mut uw = DenseMatrix::zeros(3, 2);
        uw.set_product(&u, &w).unwrap();
        let mut usv = DenseMatrix::zeros(3, 2);
        usv.mul_transpose_right(&uw, &v).unwrap();
        assert!(usv.epsilon_equals(&a, 1e-12));
    }

    #[test]
    fn test_svd_wide_matrix() {
        let a = DenseMatrix::from_row_slice(2, 4, &[1.0, 0.0, 2.0, -1.0, 3.0, 1.0, 0.0, 2.0])
            .unwrap();
        let svd = SvdDecomposition::new(&a).unwrap();
        assert_eq!(svd.u.shape(), (2, 2));
        assert_eq!(svd.w.shape(), (2, 4));
        assert_eq!(svd.v.shape(), (4, 4));
        assert_eq!(svd.rank, 2);
        assert_orthonormal(&svd.u, 1e-12);
        assert_orthonormal(&svd.v, 1e-12);
        assert!(svd.reconstruct().epsilon_equals(&a, 1e-12));
    }

    #[test]
    fn test_singular_values_non_negative() {
        let a = DenseMatrix::from_row_slice(2, 2, &[-4.0, 0.0, 0.0, -2.0]).unwrap();
        let svd = SvdDecomposition::new(&a).unwrap();
        let mut sv = svd.singular_values();
        sv.sort_by(|x, y| x.total_cmp(y));
        assert_relative_eq!(sv[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(sv[1], 4.0, epsilon = 1e-12);
        assert!(svd.reconstruct().epsilon_equals(&a, 1e-12));
    }

    #[test]
    fn test_rank_of_identical_rows() {
        let a =
            DenseMatrix::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0])
                .unwrap();
        let svd = SvdDecomposition::new(&a).unwrap();
        assert_eq!(svd.rank, 1);
        assert!(svd.reconstruct().epsilon_equals(&a, 1e-9));
    }

    #[test]
    fn test_zero_matrix_has_rank_zero() {
        let a = DenseMatrix::zeros(3, 2);
        let mut u = DenseMatrix::zeros(3, 3);
        let mut w = DenseMatrix::zeros(3, 2);
        let mut v = DenseMatrix::zeros(2, 2);
        let outcome = a.svd(&mut u, &mut w, &mut v).unwrap();
        assert_eq!(outcome, SvdOutcome::Converged { rank: 0 });
        assert_eq!(outcome.rank(), Some(0));
        assert_orthonormal(&u, 1e-15);
        assert_orthonormal(&v, 1e-15);
    }

    fn hilbert(n: usize) -> DenseMatrix {
        DenseMatrix::from_fn(n, n, |i, j| 1.0 / (i + j + 1) as f64)
    }

    #[test]
    fn test_not_converged_is_distinct_from_rank_zero() {
        let a = hilbert(4);
        let config = SvdConfig {
            max_iterations: 1,
            ..Default::default()
        };
        let mut u = DenseMatrix::zeros(4, 4);
        let mut w = DenseMatrix::zeros(4, 4);
        let mut v = DenseMatrix::zeros(4, 4);
        let outcome = a.svd_with_config(&mut u, &mut w, &mut v, &config).unwrap();
        assert!(!outcome.is_converged());
        assert_eq!(outcome.rank(), None);
        assert!(matches!(
            outcome,
            SvdOutcome::NotConverged { iterations: 1, .. }
        ));
        assert_eq!(w, DenseMatrix::zeros(4, 4));

        assert!(matches!(
            SvdDecomposition::with_config(&a, &config),
            Err(LinalgError::NoConvergence { iterations: 1, .. })
        ));
    }

    #[test]
    fn test_sweep_budget_is_inclusive() {
        let run = |max_iterations: usize| {
            let mut a = hilbert(4).as_slice().to_vec();
            let mut w = vec![0.0; 4];
            let mut v = vec![0.0; 16];
            let config = SvdConfig {
                max_iterations,
                ..Default::default()
            };
            golub_reinsch(&mut a, 4, 4, &mut w, &mut v, &config)
        };

        let needed = run(SvdConfig::default().max_iterations).unwrap();
        assert!(needed >= 2, "only {} sweeps needed", needed);

        // Exactly `needed` sweeps are allowed with a budget of `needed`
        assert_eq!(run(needed), Ok(needed));
        assert!(run(needed - 1).is_err());
        assert!(run(0).is_err());
    }

    #[test]
    fn test_output_shapes_checked() {
        let a = DenseMatrix::zeros(3, 2);
        let mut u = DenseMatrix::zeros(3, 3);
        let mut w = DenseMatrix::zeros(2, 3);
        let mut v = DenseMatrix::zeros(2, 2);
        let err = a.svd(&mut u, &mut w, &mut v).unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_back_solve_square() {
        let a = DenseMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]).unwrap();
        let svd = SvdDecomposition::new(&a).unwrap();
        let x = svd.solve(&DenseVector::from_slice(&[9.0, 8.0])).unwrap();
        assert_relative_eq!(x.get(0).unwrap(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(x.get(1).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_back_solve_singular_minimum_norm() {
        // x + y = 2 twice: minimum-norm solution is (1, 1)
        let a = DenseMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]).unwrap();
        let svd = SvdDecomposition::new(&a).unwrap();
        assert_eq!(svd.rank, 1);
        let x = svd.solve(&DenseVector::from_slice(&[2.0, 2.0])).unwrap();
        let expected = DenseVector::from_slice(&[1.0, 1.0]);
        assert!(x.epsilon_equals(&expected, 1e-12));
    }

    #[test]
    fn test_back_solve_least_squares() {
        // Fit y = c0 + c1 t through (0, 1), (1, 3), (2, 5): exact line 1 + 2t
        let a = DenseMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]).unwrap();
        let svd = SvdDecomposition::new(&a).unwrap();
        let mut x = DenseVector::zeros(2);
        let b = DenseVector::from_slice(&[1.0, 3.0, 5.0]);
        x.svd_back_solve(&svd.u, &svd.w, &svd.v, &b).unwrap();
        let expected = DenseVector::from_slice(&[1.0, 2.0]);
        assert!(x.epsilon_equals(&expected, 1e-12));

        let mut wrong = DenseVector::zeros(3);
        assert!(
            wrong
                .svd_back_solve(&svd.u, &svd.w, &svd.v, &DenseVector::zeros(3))
                .is_err()
        );
    }

    #[test]
    fn test_back_solve_wide_minimum_norm() {
        // x + y + z = 3 has minimum-norm solution (1, 1, 1)
        let a = DenseMatrix::from_row_slice(1, 3, &[1.0, 1.0, 1.0]).unwrap();
        let svd = SvdDecomposition::new(&a).unwrap();
        assert_eq!(svd.rank, 1);
        let x = svd.solve(&DenseVector::from_slice(&[3.0])).unwrap();
        assert_eq!(x.len(), 3);
        let expected = DenseVector::from_slice(&[1.0, 1.0, 1.0]);
        assert!(x.epsilon_equals(&expected, 1e-12));

        // Two equations in four unknowns: solution lies in the row space
        let a = DenseMatrix::from_row_slice(2, 4, &[1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0])
            .unwrap();
        let svd = SvdDecomposition::new(&a).unwrap();
        let x = svd.solve(&DenseVector::from_slice(&[2.0, 4.0])).unwrap();
        let expected = DenseVector::from_slice(&[1.0, 2.0, 1.0, 2.0]);
        assert!(x.epsilon_equals(&expected, 1e-12));
    }

    #[test]
    fn test_round_off_values_flushed_in_w() {
        let a = DenseMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1e-16]).unwrap();
        let svd = SvdDecomposition::new(&a).unwrap();
        assert_eq!(svd.rank, 1);
        assert_eq!(svd.w.get(1, 1).unwrap(), 0.0);
        assert!(svd.singular_values().contains(&0.0));
    }

    #[test]
    fn test_pseudo_inverse() {
        let a = DenseMatrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let svd = SvdDecomposition::new(&a).unwrap();
        let pinv = svd.pseudo_inverse();
        assert_eq!(pinv.shape(), (2, 3));

        // A⁺ A = I for a full column rank A
        let mut pa = DenseMatrix::zeros(2, 2);
        pa.set_product(&pinv, &a).unwrap();
        assert!(pa.epsilon_equals(&DenseMatrix::new(2, 2), 1e-12));
    }
}

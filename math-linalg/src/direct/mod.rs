//! Direct factorizations of dense matrices
//!
//! This module provides:
//! - [`lu_decompose`] / [`lu_back_solve`]: Crout LU with partial pivoting
//! - [`svd_back_solve`] and [`DenseMatrix::svd`](crate::DenseMatrix::svd): Golub-Reinsch SVD
//! - [`DenseMatrix::invert`](crate::DenseMatrix::invert): inversion through LU

mod inverse;
mod lu;
mod svd;

pub use lu::{LuFactorization, lu_back_solve, lu_decompose, lu_solve};
pub use svd::{SvdConfig, SvdDecomposition, SvdOutcome, svd_back_solve};

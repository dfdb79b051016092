//! Dense general-size matrices and vectors
//!
//! This crate provides row-major [`DenseMatrix`] and [`DenseVector`] types of
//! any size, together with the classic direct factorizations built on them.
//!
//! # Features
//!
//! - **Element-wise and product algebra**: add, subtract, scale, transpose,
//!   products with either operand transposed, outer products
//! - **LU decomposition**: Crout's method with partial pivoting, back-substitution,
//!   determinant and inversion
//! - **Singular value decomposition**: Golub-Reinsch with rank detection,
//!   back-substitution (least squares) and pseudo-inverse
//! - **Interop**: conversions to and from `ndarray` and fixed-size arrays,
//!   optional `serde` support
//!
//! # Example
//!
//! ```
//! use math_audio_linalg::{DenseMatrix, DenseVector, LuFactorization};
//!
//! let a = DenseMatrix::from_row_slice(2, 2, &[4.0, 3.0, 6.0, 3.0]).unwrap();
//! let b = DenseVector::from_slice(&[10.0, 12.0]);
//!
//! let lu = LuFactorization::new(&a).unwrap();
//! let x = lu.solve(&b).unwrap();
//! assert!((x.get(0).unwrap() - 1.0).abs() < 1e-12);
//! assert!((x.get(1).unwrap() - 2.0).abs() < 1e-12);
//! ```

pub mod dense;
pub mod direct;
pub mod error;

// Re-export main types
pub use dense::{DenseMatrix, DenseVector};
pub use error::{LinalgError, Result};

// Re-export factorizations
pub use direct::{
    LuFactorization, SvdConfig, SvdDecomposition, SvdOutcome, lu_back_solve, lu_decompose,
    lu_solve, svd_back_solve,
};

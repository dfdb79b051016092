//! Dense general-size matrix and vector containers
//!
//! - [`DenseMatrix`]: row-major `rows x cols` storage with element-wise
//!   arithmetic, products, transposes, block copies and resizing
//! - [`DenseVector`]: vector with a logical length over a growable buffer

mod convert;
mod matrix;
mod vector;

pub use matrix::DenseMatrix;
pub use vector::DenseVector;

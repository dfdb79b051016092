//! Error types for dense matrix and vector operations
//!
//! All variants describe programmer errors detected synchronously at the
//! call site (shape or index problems), except [`LinalgError::Singular`] and
//! [`LinalgError::NoConvergence`] which report numerical outcomes.

use thiserror::Error;

/// Errors that can occur in dense linear algebra operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinalgError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("dimension mismatch in {op}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the operation that rejected its operands
        op: &'static str,
        /// Dimension required by the operation
        expected: usize,
        /// Dimension actually supplied
        got: usize,
    },

    /// A square-only operation was called on a rectangular matrix.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// Row, column or element index outside the valid range.
    #[error("{axis} index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Which axis was indexed ("row", "column" or "element")
        axis: &'static str,
        /// The offending index
        index: usize,
        /// Length of the indexed axis
        len: usize,
    },

    /// Construction or resize requested with a negative size.
    #[error("negative size requested: {requested}")]
    NegativeSize {
        /// The requested (negative) size
        requested: i64,
    },

    /// The matrix has an exactly zero (or non-finite) pivot and cannot be inverted.
    #[error("matrix is singular")]
    Singular,

    /// The SVD QR sweeps did not converge for one singular value.
    #[error("SVD failed to converge for singular value {index} after {iterations} iterations")]
    NoConvergence {
        /// Index of the singular value that did not converge
        index: usize,
        /// Number of QR sweeps attempted
        iterations: usize,
    },
}

/// A specialized `Result` type for linear algebra operations.
pub type Result<T> = std::result::Result<T, LinalgError>;

impl LinalgError {
    /// Returns `true` for shape-related errors (`DimensionMismatch`, `NotSquare`).
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            LinalgError::DimensionMismatch { .. } | LinalgError::NotSquare { .. }
        )
    }

    /// Returns `true` for errors describing a numerical outcome rather than misuse.
    pub fn is_numerical_error(&self) -> bool {
        matches!(
            self,
            LinalgError::Singular | LinalgError::NoConvergence { .. }
        )
    }
}

/// Check that `got == expected`, reporting `op` on failure.
#[inline]
pub(crate) fn check_dim(op: &'static str, expected: usize, got: usize) -> Result<()> {
    if expected == got {
        Ok(())
    } else {
        Err(LinalgError::DimensionMismatch { op, expected, got })
    }
}

/// Check `index < len` along `axis`.
#[inline]
pub(crate) fn check_index(axis: &'static str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(LinalgError::IndexOutOfRange { axis, index, len })
    }
}

/// Convert a signed size into `usize`, rejecting negative values.
pub(crate) fn checked_size(requested: i64) -> Result<usize> {
    usize::try_from(requested).map_err(|_| LinalgError::NegativeSize { requested })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LinalgError::DimensionMismatch {
            op: "mul",
            expected: 3,
            got: 4,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch in mul: expected 3, got 4"
        );

        let err = LinalgError::IndexOutOfRange {
            axis: "row",
            index: 5,
            len: 2,
        };
        assert_eq!(err.to_string(), "row index 5 out of range for length 2");
    }

    #[test]
    fn test_error_categories() {
        let err = LinalgError::NotSquare { rows: 2, cols: 3 };
        assert!(err.is_dimension_error());
        assert!(!LinalgError::Singular.is_dimension_error());
        assert!(LinalgError::Singular.is_numerical_error());
        assert!(
            LinalgError::NoConvergence {
                index: 1,
                iterations: 30
            }
            .is_numerical_error()
        );
        assert!(!LinalgError::NegativeSize { requested: -1 }.is_numerical_error());
    }

    #[test]
    fn test_checked_size() {
        assert_eq!(checked_size(4), Ok(4));
        assert_eq!(
            checked_size(-2),
            Err(LinalgError::NegativeSize { requested: -2 })
        );
    }
}

//! Error types for the descent methods.

use thiserror::Error;

/// Result type alias using [`DescentError`].
pub type Result<T> = std::result::Result<T, DescentError>;

/// Reasons a quadratic problem or a solver configuration is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DescentError {
    /// `A` is not a square matrix
    #[error("A must be square, got shape {shape:?}")]
    NotSquare {
        /// Actual shape of `A`
        shape: Vec<usize>,
    },

    /// The problem has no unknowns
    #[error("Problem dimension must be at least 1")]
    Empty,

    /// An operand that must be a matrix is not 2-D
    #[error("{operand} must be a matrix, got shape {shape:?}")]
    NotAMatrix {
        /// Which operand is wrong
        operand: &'static str,
        /// Actual shape
        shape: Vec<usize>,
    },

    /// An operand does not have the shape the problem requires
    #[error("Shape mismatch for {operand}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Which operand is wrong
        operand: &'static str,
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// `A` is not symmetric
    #[error("A is not symmetric: A[{row}][{col}] = {upper}, A[{col}][{row}] = {lower}")]
    NotSymmetric {
        row: usize,
        col: usize,
        upper: f64,
        lower: f64,
    },

    /// A diagonal entry of `A` is zero or negative
    #[error("A[{index}][{index}] = {value} must be strictly positive")]
    NonPositiveDiagonal {
        /// Diagonal index
        index: usize,
        /// Offending value
        value: f64,
    },

    /// An input contains NaN or infinity
    #[error("{operand} contains non-finite values")]
    NonFinite {
        /// Which operand is affected
        operand: &'static str,
    },

    /// `A` failed the positive-definiteness check
    #[error("A is not positive-definite")]
    NotPositiveDefinite,

    /// A ridge penalty is negative or not finite
    #[error("Invalid regularization strength {lambda}")]
    InvalidRegularization {
        /// Offending value
        lambda: f64,
    },

    /// A step size or relaxation factor is zero, negative, or not finite
    #[error("Invalid step size {step}")]
    InvalidStep {
        /// Offending value
        step: f64,
    },
}

impl DescentError {
    /// Create a shape mismatch error
    pub fn shape_mismatch(operand: &'static str, expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            operand,
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }
}

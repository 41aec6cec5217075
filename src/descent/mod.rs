//! # Descent Methods for Convex Quadratics
//!
//! Minimizes `f(w) = ½wᵀAw − bᵀw` with `A` symmetric positive-definite, whose unique
//! minimizer is `w* = A⁻¹b`.
//!
//! ## Submodules
//!
//! - [`quadratic`]: Validated problem: objective, gradient, minimizer, spectrum bound
//! - [`coordinate`]: Cyclic coordinate descent (exact or relaxed updates)
//! - [`gradient`]: Full gradient descent with a fixed or canonical step
//! - [`trajectory`]: Recorded iterates and the convergence curves derived from them
//! - [`error`]: Validation errors
//!
//! ## Behavior
//!
//! - Both methods start at `w = 0` and run for a fixed number of iterations; there is
//!   no convergence-based stopping.
//! - The full trajectory (`n_iters + 1` iterates) is returned for analysis.
//! - Malformed input (non-square, asymmetric or indefinite `A`, mismatched `b`,
//!   invalid step) is rejected with a [`DescentError`] before any iteration runs.
//!
//! ## Example
//!
//! ```rust
//! use quadgrad::descent::{coordinate_descent, gradient_descent};
//! use quadgrad::tensor;
//!
//! let a = tensor!([[3.0, 1.0], [1.0, 2.0]]);
//! let b = tensor!([1.0, 1.0]);
//! let cd = coordinate_descent(&a, &b, 40).unwrap();
//! let gd = gradient_descent(&a, &b, 40, 0.25).unwrap();
//! assert_eq!(cd.len(), 41);
//! assert!((cd.last().data[0] - 0.2).abs() < 1e-9);
//! assert!((gd.last().data[1] - 0.4).abs() < 1e-3);
//! ```

pub mod coordinate;
pub mod error;
pub mod gradient;
pub mod quadratic;
pub mod trajectory;

pub use coordinate::{
    coordinate_descent, coordinate_descent_with, CoordinateDescent, CoordinateDescentConfig,
};
pub use error::{DescentError, Result};
pub use gradient::{
    canonical_step, gradient_descent, gradient_descent_with, GradientDescentConfig, StepSize,
};
pub use quadratic::QuadraticProblem;
pub use trajectory::Trajectory;

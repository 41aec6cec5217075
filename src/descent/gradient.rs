//! Full gradient descent, the baseline coordinate descent is compared against.
//!
//! Every iteration moves all coordinates at once: `w ← w − step · (Aw − b)`.
//! With `step = 1/λ_max(A)` the iteration never diverges on a convex quadratic.

use log::{debug, trace};

use crate::descent::error::{DescentError, Result};
use crate::descent::quadratic::QuadraticProblem;
use crate::descent::trajectory::Trajectory;
use crate::linalg;
use crate::tensors::{Ten64, Tensor};

/// How the step size is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StepSize {
    /// `1 / λ_max(A)`, computed by power iteration.
    #[default]
    Canonical,
    /// A fixed positive step.
    Fixed(f64),
}

/// Configuration for [`gradient_descent_with`].
#[derive(Debug, Clone)]
pub struct GradientDescentConfig {
    /// Number of full-gradient updates (default: 100).
    pub n_iters: usize,
    /// Step size rule (default: canonical).
    pub step: StepSize,
}

impl Default for GradientDescentConfig {
    fn default() -> Self {
        GradientDescentConfig {
            n_iters: 100,
            step: StepSize::Canonical,
        }
    }
}

/// The canonical step `1 / λ_max(A)`.
pub fn canonical_step(problem: &QuadraticProblem) -> f64 {
    1.0 / problem.largest_eigenvalue()
}

/// Runs `n_iters` gradient steps of size `step` on `f(w) = ½wᵀAw − bᵀw` from `w = 0`.
///
/// Returns all `n_iters + 1` iterates.
///
/// # Errors
/// Any validation error of [`QuadraticProblem::new`], or
/// [`DescentError::InvalidStep`] if `step` is not positive and finite.
pub fn gradient_descent(a: &Ten64, b: &Ten64, n_iters: usize, step: f64) -> Result<Trajectory> {
    let problem = QuadraticProblem::new(a.clone(), b.clone())?;
    gradient_descent_with(
        &problem,
        &GradientDescentConfig {
            n_iters,
            step: StepSize::Fixed(step),
        },
    )
}

/// Runs gradient descent on a validated problem.
///
/// # Errors
/// [`DescentError::InvalidStep`] if the resolved step is not positive and finite.
pub fn gradient_descent_with(
    problem: &QuadraticProblem,
    config: &GradientDescentConfig,
) -> Result<Trajectory> {
    let step = match config.step {
        StepSize::Canonical => canonical_step(problem),
        StepSize::Fixed(step) => step,
    };
    if !(step > 0.0 && step.is_finite()) {
        return Err(DescentError::InvalidStep { step });
    }
    debug!(
        "gradient descent: p={} n_iters={} step={step:.6e}",
        problem.dim(),
        config.n_iters
    );

    let mut w = Tensor::zeros(vec![problem.dim()]);
    let mut trajectory = Trajectory::with_capacity(w.clone(), config.n_iters);
    for t in 0..config.n_iters {
        let grad = problem.gradient(&w);
        linalg::axpy(-step, &grad, &mut w);
        trace!("gradient descent t={} f={:.6e}", t + 1, problem.objective(&w));
        trajectory.push(w.clone());
    }

    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor;
    use approx::assert_relative_eq;

    #[test]
    fn canonical_step_is_reciprocal_of_largest_eigenvalue() {
        let problem = QuadraticProblem::new(tensor!([[2.0, 0.0], [0.0, 8.0]]), tensor!([1.0, 1.0])).unwrap();
        assert_relative_eq!(canonical_step(&problem), 0.125, max_relative = 1e-9);
    }

    #[test]
    fn single_step_follows_negative_gradient() {
        let a = tensor!([[1.0, 0.0], [0.0, 2.0]]);
        let b = tensor!([2.0, 4.0]);
        let traj = gradient_descent(&a, &b, 1, 0.5).unwrap();
        assert_eq!(traj.len(), 2);
        assert_eq!(traj.last().data, vec![1.0, 2.0]);
    }

    #[test]
    fn rejects_negative_step() {
        let a = tensor!([[1.0]]);
        let b = tensor!([1.0]);
        assert_eq!(
            gradient_descent(&a, &b, 5, -0.1).unwrap_err(),
            DescentError::InvalidStep { step: -0.1 }
        );
    }
}

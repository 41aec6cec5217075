//! Cyclic coordinate descent.
//!
//! At iteration `t` only coordinate `i = t mod p` moves. The exact minimizer of `f`
//! along that coordinate is
//!
//! ```text
//! w_i* = (b_i − Σ_{j≠i} A_ij w_j) / A_ii
//! ```
//!
//! and the relaxed update with factor `γ` is
//!
//! ```text
//! w_i ← w_i − γ · (Σ_j A_ij w_j − b_i) / A_ii  =  w_i + γ · (w_i* − w_i)
//! ```
//!
//! so `γ = 1` lands exactly on the coordinate minimizer. For SPD `A`, any
//! `γ ∈ (0, 2)` never increases `f`.

use log::{debug, trace};

use crate::descent::error::{DescentError, Result};
use crate::descent::quadratic::QuadraticProblem;
use crate::descent::trajectory::Trajectory;
use crate::tensors::{Ten64, Tensor};

/// Configuration for [`coordinate_descent_with`].
#[derive(Debug, Clone)]
pub struct CoordinateDescentConfig {
    /// Number of single-coordinate updates (default: 100).
    pub n_iters: usize,
    /// Relaxation factor `γ` (default: 1, the exact coordinate minimizer).
    pub relaxation: f64,
}

impl Default for CoordinateDescentConfig {
    fn default() -> Self {
        CoordinateDescentConfig {
            n_iters: 100,
            relaxation: 1.0,
        }
    }
}

/// Coordinate-descent state: the iterate `w` and the iteration counter `t`.
#[derive(Debug, Clone)]
pub struct CoordinateDescent<'a> {
    problem: &'a QuadraticProblem,
    w: Ten64,
    t: usize,
    relaxation: f64,
}

impl<'a> CoordinateDescent<'a> {
    /// Starts at `w = 0`.
    ///
    /// # Errors
    /// [`DescentError::InvalidStep`] if `relaxation` is not a positive finite number.
    pub fn new(problem: &'a QuadraticProblem, relaxation: f64) -> Result<Self> {
        if !(relaxation > 0.0 && relaxation.is_finite()) {
            return Err(DescentError::InvalidStep { step: relaxation });
        }
        Ok(Self {
            problem,
            w: Tensor::zeros(vec![problem.dim()]),
            t: 0,
            relaxation,
        })
    }

    /// Updates coordinate `t mod p` and advances the counter. Returns the index updated.
    pub fn step(&mut self) -> usize {
        let p = self.problem.dim();
        let i = self.t % p;
        let a = self.problem.a();
        let b = self.problem.b();

        let row = a.row(i);
        let off_diagonal: f64 = row
            .iter()
            .zip(&self.w.data)
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, (a_ij, w_j))| a_ij * w_j)
            .sum();
        let exact = (b.data[i] - off_diagonal) / row[i];

        let w_i = self.w.data[i];
        self.w.data[i] = w_i + self.relaxation * (exact - w_i);
        self.t += 1;
        i
    }

    /// Current iterate.
    pub fn iterate(&self) -> &Ten64 {
        &self.w
    }

    /// Number of updates performed so far.
    pub fn iteration(&self) -> usize {
        self.t
    }
}

/// Runs `n_iters` exact coordinate updates on `f(w) = ½wᵀAw − bᵀw` from `w = 0`.
///
/// Returns all `n_iters + 1` iterates.
///
/// # Errors
/// Any validation error of [`QuadraticProblem::new`].
pub fn coordinate_descent(a: &Ten64, b: &Ten64, n_iters: usize) -> Result<Trajectory> {
    let problem = QuadraticProblem::new(a.clone(), b.clone())?;
    coordinate_descent_with(
        &problem,
        &CoordinateDescentConfig {
            n_iters,
            ..Default::default()
        },
    )
}

/// Runs coordinate descent on a validated problem.
///
/// # Errors
/// [`DescentError::InvalidStep`] if the relaxation factor is not positive and finite.
pub fn coordinate_descent_with(
    problem: &QuadraticProblem,
    config: &CoordinateDescentConfig,
) -> Result<Trajectory> {
    let mut state = CoordinateDescent::new(problem, config.relaxation)?;
    debug!(
        "coordinate descent: p={} n_iters={} relaxation={}",
        problem.dim(),
        config.n_iters,
        config.relaxation
    );

    let mut trajectory = Trajectory::with_capacity(state.iterate().clone(), config.n_iters);
    for _ in 0..config.n_iters {
        let i = state.step();
        trace!(
            "coordinate descent t={} i={i} f={:.6e}",
            state.iteration(),
            problem.objective(state.iterate())
        );
        trajectory.push(state.iterate().clone());
    }

    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor;

    #[test]
    fn cycles_through_coordinates() {
        let problem = QuadraticProblem::new(tensor!([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]), tensor!([1.0, 1.0, 1.0])).unwrap();
        let mut cd = CoordinateDescent::new(&problem, 1.0).unwrap();
        let visited: Vec<usize> = (0..7).map(|_| cd.step()).collect();
        assert_eq!(visited, vec![0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(cd.iteration(), 7);
    }

    #[test]
    fn exact_update_matches_closed_form() {
        // w = 0 → w_0 = b_0 / A_00; then w_1 = (b_1 − A_10 w_0) / A_11
        let problem = QuadraticProblem::new(tensor!([[4.0, 1.0], [1.0, 2.0]]), tensor!([2.0, 3.0])).unwrap();
        let mut cd = CoordinateDescent::new(&problem, 1.0).unwrap();
        cd.step();
        assert_eq!(cd.iterate().data, vec![0.5, 0.0]);
        cd.step();
        assert_eq!(cd.iterate().data, vec![0.5, 1.25]);
    }

    #[test]
    fn rejects_non_positive_relaxation() {
        let problem = QuadraticProblem::new(tensor!([[1.0]]), tensor!([1.0])).unwrap();
        let err = CoordinateDescent::new(&problem, 0.0).unwrap_err();
        assert_eq!(err, DescentError::InvalidStep { step: 0.0 });
    }
}

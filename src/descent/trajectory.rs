//! Recorded iterate sequences and the convergence curves derived from them.

use crate::descent::quadratic::QuadraticProblem;
use crate::linalg;
use crate::tensors::Ten64;

/// Every iterate of a descent run, starting with the initial point.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    iterates: Vec<Ten64>,
}

impl Trajectory {
    /// Starts a trajectory with room for `n_iters` further iterates.
    pub fn with_capacity(initial: Ten64, n_iters: usize) -> Self {
        let mut iterates = Vec::with_capacity(n_iters + 1);
        iterates.push(initial);
        Self { iterates }
    }

    /// Appends the next iterate.
    ///
    /// # Panics
    /// Panics if `w` does not have the shape of the initial point.
    pub fn push(&mut self, w: Ten64) {
        assert_eq!(w.shape, self.iterates[0].shape, "iterate shape changed");
        self.iterates.push(w);
    }

    /// Number of recorded iterates, including the initial point.
    pub fn len(&self) -> usize {
        self.iterates.len()
    }

    /// Always `false`: a trajectory holds at least its initial point. Present
    /// alongside [`Trajectory::len`] for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iterates(&self) -> &[Ten64] {
        &self.iterates
    }

    pub fn first(&self) -> &Ten64 {
        &self.iterates[0]
    }

    /// The final iterate.
    pub fn last(&self) -> &Ten64 {
        &self.iterates[self.iterates.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ten64> {
        self.iterates.iter()
    }

    /// Every `p`-th iterate, starting with the initial point.
    ///
    /// For cyclic coordinate descent on `p` unknowns this is the iterate after
    /// each full sweep.
    ///
    /// # Panics
    /// Panics if `p == 0`.
    pub fn sweeps(&self, p: usize) -> impl Iterator<Item = &Ten64> + '_ {
        assert!(p > 0, "sweep length must be positive");
        self.iterates.iter().step_by(p)
    }

    /// `f(wᵗ)` for every iterate.
    pub fn objective_values(&self, problem: &QuadraticProblem) -> Vec<f64> {
        self.iter().map(|w| problem.objective(w)).collect()
    }

    /// `f(wᵗ) − f(w*)` for every iterate.
    pub fn suboptimality(&self, problem: &QuadraticProblem) -> Vec<f64> {
        let best = problem.optimal_value();
        self.iter()
            .map(|w| problem.objective(w) - best)
            .collect()
    }

    /// `‖wᵗ − target‖` for every iterate.
    pub fn distances_to(&self, target: &Ten64) -> Vec<f64> {
        self.iter()
            .map(|w| linalg::norm(&linalg::sub(w, target)))
            .collect()
    }

    /// Whether `f` never increases along the trajectory by more than `tol`
    /// (relative to the magnitude of the values compared).
    pub fn is_monotone(&self, problem: &QuadraticProblem, tol: f64) -> bool {
        self.objective_values(problem).windows(2).all(|pair| {
            let scale = pair[0].abs().max(pair[1].abs()).max(1.0);
            pair[1] <= pair[0] + tol * scale
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor;

    #[test]
    fn sweeps_sample_every_pth_iterate() {
        let mut t = Trajectory::with_capacity(tensor!([0.0]), 6);
        for k in 1..=6 {
            t.push(tensor!([k as f64]));
        }
        let sampled: Vec<f64> = t.sweeps(3).map(|w| w.data[0]).collect();
        assert_eq!(sampled, vec![0.0, 3.0, 6.0]);
        assert_eq!(t.len(), 7);
        assert!(!t.is_empty());
        assert_eq!(t.last().data, vec![6.0]);
    }

    #[test]
    #[should_panic(expected = "iterate shape changed")]
    fn push_rejects_shape_change() {
        let mut t = Trajectory::with_capacity(tensor!([0.0, 0.0]), 1);
        t.push(tensor!([1.0]));
    }
}

//! Convex quadratic objectives `f(w) = ½wᵀAw − bᵀw`.

use crate::descent::error::{DescentError, Result};
use crate::linalg;
use crate::tensors::{Ten64, Tensor};

/// Relative tolerance used when checking `A` for symmetry.
const SYMMETRY_TOL: f64 = 1e-10;

/// A validated quadratic problem with symmetric positive-definite `A`.
///
/// Validation happens once in [`QuadraticProblem::new`]; every method afterwards can
/// rely on `A` being square, symmetric, positive-definite and finite, and on `b`
/// having matching length. The minimizer `w* = A⁻¹b` is computed during
/// validation, since the Cholesky factorization doubles as the definiteness check.
#[derive(Debug, Clone)]
pub struct QuadraticProblem {
    a: Ten64,
    b: Ten64,
    solution: Ten64,
}

impl QuadraticProblem {
    /// Validates `A` and `b` and builds the problem.
    ///
    /// # Errors
    /// - [`DescentError::NotSquare`] if `A` is not an `n × n` matrix
    /// - [`DescentError::Empty`] if `n = 0`
    /// - [`DescentError::ShapeMismatch`] if `b` is not a length-`n` vector
    /// - [`DescentError::NonFinite`] if either operand holds NaN or infinity
    /// - [`DescentError::NotSymmetric`] if `A ≠ Aᵀ`
    /// - [`DescentError::NonPositiveDiagonal`] if some `A_ii ≤ 0`
    /// - [`DescentError::NotPositiveDefinite`] if the Cholesky factorization fails
    pub fn new(a: Ten64, b: Ten64) -> Result<Self> {
        if a.ndim() != 2 || a.shape[0] != a.shape[1] {
            return Err(DescentError::NotSquare { shape: a.shape });
        }
        let n = a.shape[0];
        if n == 0 {
            return Err(DescentError::Empty);
        }
        if b.shape != [n] {
            return Err(DescentError::shape_mismatch("b", &[n], &b.shape));
        }
        if !a.is_finite() {
            return Err(DescentError::NonFinite { operand: "A" });
        }
        if !b.is_finite() {
            return Err(DescentError::NonFinite { operand: "b" });
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let upper = a.get(i, j);
                let lower = a.get(j, i);
                let scale = upper.abs().max(lower.abs()).max(1.0);
                if (upper - lower).abs() > SYMMETRY_TOL * scale {
                    return Err(DescentError::NotSymmetric {
                        row: i,
                        col: j,
                        upper,
                        lower,
                    });
                }
            }
        }

        if let Some(index) = (0..n).find(|&i| a.get(i, i) <= 0.0) {
            return Err(DescentError::NonPositiveDiagonal {
                index,
                value: a.get(index, index),
            });
        }

        let solution =
            linalg::cholesky_solve(&a, &b).ok_or(DescentError::NotPositiveDefinite)?;

        Ok(Self { a, b, solution })
    }

    /// Builds the ridge least-squares problem `min ½‖Xw − y‖² + ½λ‖w‖²`.
    ///
    /// This is the quadratic with `A = XᵀX + λI` and `b = Xᵀy`.
    ///
    /// # Errors
    /// - [`DescentError::NotAMatrix`] if `X` is not 2-D
    /// - [`DescentError::ShapeMismatch`] if `y` does not have one entry per row of `X`
    /// - [`DescentError::InvalidRegularization`] if `λ` is negative or not finite
    /// - any error of [`QuadraticProblem::new`] (e.g. rank-deficient `X` with `λ = 0`)
    pub fn from_least_squares(x: &Ten64, y: &Ten64, lambda: f64) -> Result<Self> {
        if x.ndim() != 2 {
            return Err(DescentError::NotAMatrix {
                operand: "X",
                shape: x.shape.clone(),
            });
        }
        let (rows, cols) = (x.rows(), x.cols());
        if y.shape != [rows] {
            return Err(DescentError::shape_mismatch("y", &[rows], &y.shape));
        }
        if !(lambda >= 0.0 && lambda.is_finite()) {
            return Err(DescentError::InvalidRegularization { lambda });
        }

        let mut a = Tensor::zeros(vec![cols, cols]);
        for r in 0..rows {
            let row = x.row(r);
            for i in 0..cols {
                for j in 0..cols {
                    a.data[i * cols + j] += row[i] * row[j];
                }
            }
        }
        linalg::axpy(lambda, &Tensor::identity(cols), &mut a);
        let b = linalg::matvec_t(x, y);

        Self::new(a, b)
    }

    /// Number of unknowns `p`.
    pub fn dim(&self) -> usize {
        self.b.len()
    }

    pub fn a(&self) -> &Ten64 {
        &self.a
    }

    pub fn b(&self) -> &Ten64 {
        &self.b
    }

    /// `f(w) = ½wᵀAw − bᵀw`.
    ///
    /// # Panics
    /// Panics if `w` does not have length `p`.
    pub fn objective(&self, w: &Ten64) -> f64 {
        let aw = linalg::matvec(&self.a, w);
        0.5 * linalg::dot(w, &aw) - linalg::dot(&self.b, w)
    }

    /// `∇f(w) = Aw − b`.
    pub fn gradient(&self, w: &Ten64) -> Ten64 {
        linalg::sub(&linalg::matvec(&self.a, w), &self.b)
    }

    /// Partial derivative `∂f/∂w_i = Σ_j A_ij w_j − b_i`.
    pub fn partial(&self, w: &Ten64, i: usize) -> f64 {
        assert_eq!(w.shape, self.b.shape, "iterate length mismatch");
        let row = self.a.row(i);
        row.iter().zip(&w.data).map(|(a, x)| a * x).sum::<f64>() - self.b.data[i]
    }

    /// The minimizer `w* = A⁻¹b`.
    pub fn solution(&self) -> &Ten64 {
        &self.solution
    }

    /// `f(w*)`.
    pub fn optimal_value(&self) -> f64 {
        self.objective(&self.solution)
    }

    /// Largest eigenvalue of `A`, which for SPD `A` equals its largest singular value.
    ///
    /// Power iteration can only underestimate it. The result is floored by the
    /// Rayleigh quotients at the basis vectors (the diagonal entries), which are
    /// also lower bounds.
    pub fn largest_eigenvalue(&self) -> f64 {
        let estimate = linalg::power_iteration(&self.a, 10_000, 1e-12);
        (0..self.dim())
            .map(|i| self.a.get(i, i))
            .fold(estimate, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_non_square_matrix() {
        let err = QuadraticProblem::new(tensor!([[1.0, 0.0, 0.0]]), tensor!([1.0])).unwrap_err();
        assert_eq!(err, DescentError::NotSquare { shape: vec![1, 3] });
    }

    #[test]
    fn rejects_wrong_rhs_length() {
        let err = QuadraticProblem::new(tensor!([[1.0, 0.0], [0.0, 1.0]]), tensor!([1.0])).unwrap_err();
        assert!(matches!(err, DescentError::ShapeMismatch { operand: "b", .. }));
    }

    #[test]
    fn rejects_asymmetric_matrix() {
        let err = QuadraticProblem::new(tensor!([[2.0, 1.0], [0.0, 2.0]]), tensor!([1.0, 1.0])).unwrap_err();
        assert!(matches!(err, DescentError::NotSymmetric { row: 0, col: 1, .. }));
    }

    #[test]
    fn rejects_zero_diagonal() {
        let err = QuadraticProblem::new(tensor!([[0.0, 0.0], [0.0, 1.0]]), tensor!([1.0, 1.0])).unwrap_err();
        assert_eq!(err, DescentError::NonPositiveDiagonal { index: 0, value: 0.0 });
    }

    #[test]
    fn rejects_indefinite_matrix() {
        let err = QuadraticProblem::new(tensor!([[1.0, 2.0], [2.0, 1.0]]), tensor!([1.0, 1.0])).unwrap_err();
        assert_eq!(err, DescentError::NotPositiveDefinite);
    }

    #[test]
    fn rejects_nan() {
        let err = QuadraticProblem::new(tensor!([[1.0, 0.0], [0.0, 1.0]]), tensor!([f64::NAN, 1.0])).unwrap_err();
        assert_eq!(err, DescentError::NonFinite { operand: "b" });
    }

    #[test]
    fn gradient_vanishes_at_solution() {
        let p = QuadraticProblem::new(tensor!([[3.0, 1.0], [1.0, 2.0]]), tensor!([1.0, -1.0])).unwrap();
        let g = p.gradient(p.solution());
        assert!(linalg::norm(&g) < 1e-12);
        assert_relative_eq!(p.partial(p.solution(), 1), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn largest_eigenvalue_when_all_ones_is_not_dominant() {
        // eigenpairs (1, [1, 1]) and (3, [1, -1])
        let p = QuadraticProblem::new(tensor!([[2.0, -1.0], [-1.0, 2.0]]), tensor!([1.0, 0.0])).unwrap();
        assert_relative_eq!(p.largest_eigenvalue(), 3.0, max_relative = 1e-9);
    }

    #[test]
    fn least_squares_normal_equations() {
        let x = tensor!([[1.0, 0.0], [0.0, 2.0], [1.0, 1.0]]);
        let y = tensor!([1.0, 2.0, 3.0]);
        let p = QuadraticProblem::from_least_squares(&x, &y, 0.5).unwrap();
        assert_eq!(p.a().data, vec![2.5, 1.0, 1.0, 5.5]);
        assert_eq!(p.b().data, vec![4.0, 7.0]);
    }
}

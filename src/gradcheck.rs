//! Numerical oracles for derivative code.
//!
//! Two independent checks:
//!
//! - **Finite differences**: a JVP must agree with `(f(x + εv) − f(x)) / ε` up to the
//!   first-order truncation error.
//! - **Adjoint identity**: for any direction `v` and seed `u`,
//!   `⟨VJP(x, u), v⟩ = ⟨JVP(x, v), u⟩`. This holds to floating-point precision and
//!   does not depend on a step size.

use crate::linalg;
use crate::tensors::Ten64;

/// Step used for forward differences.
pub const FD_EPS: f64 = 1e-7;

/// Relative agreement expected between a JVP and a forward difference at [`FD_EPS`].
pub const FD_TOLERANCE: f64 = 1e-4;

/// Relative agreement expected from the adjoint identity.
pub const ADJOINT_TOLERANCE: f64 = 1e-6;

/// Forward difference `(f(x + εv) − f(x)) / ε` for a function of several inputs.
///
/// Every input is perturbed along its own direction at once, so the result
/// approximates the JVP in the joint direction `(v₁, …, vₖ)`.
///
/// # Panics
/// Panics if `inputs` and `directions` differ in length or shape.
pub fn finite_difference(
    f: impl Fn(&[Ten64]) -> Ten64,
    inputs: &[Ten64],
    directions: &[Ten64],
    eps: f64,
) -> Ten64 {
    assert_eq!(
        inputs.len(),
        directions.len(),
        "one direction is needed per input"
    );
    let shifted: Vec<Ten64> = inputs
        .iter()
        .zip(directions)
        .map(|(x, v)| {
            let mut xs = x.clone();
            linalg::axpy(eps, v, &mut xs);
            xs
        })
        .collect();

    let base = f(inputs);
    let moved = f(&shifted);
    linalg::scale(&linalg::sub(&moved, &base), 1.0 / eps)
}

/// `‖a − b‖ / max(‖a‖, ‖b‖)`, or `0` when both are zero.
pub fn relative_error(a: &Ten64, b: &Ten64) -> f64 {
    let scale = linalg::norm(a).max(linalg::norm(b));
    if scale == 0.0 {
        return 0.0;
    }
    linalg::norm(&linalg::sub(a, b)) / scale
}

/// Relative mismatch of the adjoint identity.
///
/// `inputs` pairs each input cotangent (VJP result) with the direction it is tested
/// against; `outputs` pairs each output tangent (JVP result) with its seed.
/// Returns `|Σ⟨x̄ᵢ, vᵢ⟩ − Σ⟨ẏⱼ, uⱼ⟩| / max(|lhs|, |rhs|)`.
pub fn adjoint_gap(inputs: &[(&Ten64, &Ten64)], outputs: &[(&Ten64, &Ten64)]) -> f64 {
    let lhs: f64 = inputs.iter().map(|(c, v)| linalg::dot(c, v)).sum();
    let rhs: f64 = outputs.iter().map(|(t, u)| linalg::dot(t, u)).sum();
    let scale = lhs.abs().max(rhs.abs());
    if scale == 0.0 {
        return 0.0;
    }
    (lhs - rhs).abs() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor;

    #[test]
    fn finite_difference_of_linear_map_is_exact_enough() {
        let m = tensor!([[1.0, 2.0], [3.0, 4.0]]);
        let fd = finite_difference(
            |xs| linalg::matvec(&m, &xs[0]),
            &[tensor!([0.5, -0.5])],
            &[tensor!([1.0, 0.0])],
            FD_EPS,
        );
        assert!(relative_error(&fd, &tensor!([1.0, 3.0])) < 1e-6);
    }

    #[test]
    fn relative_error_of_identical_zero_tensors_is_zero() {
        assert_eq!(relative_error(&tensor!([0.0, 0.0]), &tensor!([0.0, 0.0])), 0.0);
    }

    #[test]
    fn adjoint_gap_detects_mismatch() {
        let c = tensor!([1.0, 2.0]);
        let v = tensor!([1.0, 1.0]);
        let t = tensor!([3.0]);
        let u = tensor!([1.0]);
        assert_eq!(adjoint_gap(&[(&c, &v)], &[(&t, &u)]), 0.0);
        let wrong = tensor!([4.0]);
        assert!(adjoint_gap(&[(&c, &v)], &[(&wrong, &u)]) > 0.2);
    }
}

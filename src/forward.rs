//! Forward-mode (tangent) propagation rules.
//!
//! Every function takes its inputs as [`WithTangent`] pairs `(x, ẋ)` and returns the
//! output pair `(y, ẏ)` where `ẏ = dy/dx · ẋ`, using the operation's closed-form
//! local derivative. Chaining these functions evaluates a Jacobian-vector product
//! alongside the primal computation in a single pass without materializing the Jacobian.
//!
//! | operation | tangent rule |
//! |-----------|--------------|
//! | `y = xⁿ`  | `ẏ = n·xⁿ⁻¹·ẋ` |
//! | `y = sin(x)` | `ẏ = cos(x)·ẋ` |
//! | `y = M @ x`, `M` constant | `ẏ = M @ ẋ` |
//! | `y = M @ x`, both varying | `ẏ = M @ ẋ + Ṁ @ x` |
//! | `y = a + b` | `ẏ = ȧ + ḃ` |
//!
//! # Panics
//! Shape mismatches panic, like the reverse-mode rules in [`crate::backprop`].

use crate::linalg;
use crate::tensors::{Ten64, WithTangent};

/// Elementwise power `y = xⁿ`.
pub fn powi(x: &WithTangent<Ten64>, n: i32) -> WithTangent<Ten64> {
    let value = linalg::map(&x.value, |xi| xi.powi(n));
    let tangent = linalg::zip_map(&x.value, &x.tangent, |xi, vi| {
        f64::from(n) * xi.powi(n - 1) * vi
    });
    WithTangent::new(value, tangent)
}

/// Elementwise square `y = x²`.
pub fn square(x: &WithTangent<Ten64>) -> WithTangent<Ten64> {
    powi(x, 2)
}

/// Elementwise sine.
pub fn sin(x: &WithTangent<Ten64>) -> WithTangent<Ten64> {
    let value = linalg::map(&x.value, f64::sin);
    let tangent = linalg::zip_map(&x.value, &x.tangent, |xi, vi| xi.cos() * vi);
    WithTangent::new(value, tangent)
}

/// `y = M @ x` with a constant matrix `M`.
pub fn matvec_const(m: &Ten64, x: &WithTangent<Ten64>) -> WithTangent<Ten64> {
    WithTangent::new(linalg::matvec(m, &x.value), linalg::matvec(m, &x.tangent))
}

/// `y = M @ x` where both the matrix and the vector vary.
///
/// Product rule for the bilinear map: `ẏ = M @ ẋ + Ṁ @ x`.
pub fn matvec(m: &WithTangent<Ten64>, x: &WithTangent<Ten64>) -> WithTangent<Ten64> {
    let value = linalg::matvec(&m.value, &x.value);
    let mut tangent = linalg::matvec(&m.value, &x.tangent);
    linalg::add_assign(&mut tangent, &linalg::matvec(&m.tangent, &x.value));
    WithTangent::new(value, tangent)
}

/// `y = a + b`.
pub fn add(a: &WithTangent<Ten64>, b: &WithTangent<Ten64>) -> WithTangent<Ten64> {
    WithTangent::new(
        linalg::add(&a.value, &b.value),
        linalg::add(&a.tangent, &b.tangent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor;
    use approx::assert_relative_eq;

    #[test]
    fn power_rule_matches_closed_form() {
        let x = WithTangent::new(tensor!([2.0, -1.0]), tensor!([1.0, 0.5]));
        let y = powi(&x, 3);
        assert_eq!(y.value.data, vec![8.0, -1.0]);
        assert_eq!(y.tangent.data, vec![12.0, 1.5]);
    }

    #[test]
    fn sine_tangent_uses_cosine_of_input() {
        let x = WithTangent::new(tensor!([0.0, 1.0]), tensor!([2.0, 1.0]));
        let y = sin(&x);
        assert_relative_eq!(y.tangent.data[0], 2.0);
        assert_relative_eq!(y.tangent.data[1], 1.0f64.cos());
    }

    #[test]
    fn bilinear_product_rule() {
        let m = WithTangent::new(tensor!([[1.0, 0.0], [0.0, 2.0]]), tensor!([[0.0, 1.0], [1.0, 0.0]]));
        let x = WithTangent::new(tensor!([3.0, 4.0]), tensor!([1.0, -1.0]));
        let y = matvec(&m, &x);
        assert_eq!(y.value.data, vec![3.0, 8.0]);
        // M ẋ = [1, -2], Ṁ x = [4, 3]
        assert_eq!(y.tangent.data, vec![5.0, 1.0]);
    }

    #[test]
    fn constant_matrix_ignores_matrix_tangent() {
        let m = tensor!([[1.0, 2.0]]);
        let x = WithTangent::new(tensor!([1.0, 1.0]), tensor!([0.5, 0.25]));
        assert_eq!(matvec_const(&m, &x).tangent.data, vec![1.0]);
    }
}

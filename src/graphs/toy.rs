//! The toy vector function `func(x, A) = (x² + sin(x²), A @ sin(x²))`.
//!
//! Intermediates:
//!
//! ```text
//! y1 = x²          (consumed by y2 and z1)
//! y2 = sin(y1)     (consumed by z1 and z2)
//! z1 = y1 + y2
//! z2 = A @ y2
//! ```
//!
//! `A` is a constant; only `x` is differentiated.

use crate::backprop::{self, accumulate};
use crate::forward;
use crate::linalg;
use crate::tensors::{Ten64, WithGrad, WithTangent};

/// The two outputs of [`func`], or their tangents/cotangents.
#[derive(Debug, Clone, PartialEq)]
pub struct ToyOutput {
    pub z1: Ten64,
    pub z2: Ten64,
}

impl ToyOutput {
    /// Concatenates `z1` and `z2` into one vector.
    pub fn flatten(&self) -> Ten64 {
        let mut data = self.z1.data.clone();
        data.extend_from_slice(&self.z2.data);
        Ten64::vector(data)
    }
}

fn check_inputs(x: &Ten64, a: &Ten64) {
    super::assert_matvec_shapes("toy", a, x);
}

/// Evaluates `(x² + sin(x²), A @ sin(x²))`.
///
/// # Panics
/// Panics if `x` is not a vector or `A` does not have `x.len()` columns.
pub fn func(x: &Ten64, a: &Ten64) -> ToyOutput {
    check_inputs(x, a);
    let y1 = linalg::map(x, |xi| xi.powi(2));
    let y2 = linalg::map(&y1, f64::sin);
    ToyOutput {
        z1: linalg::add(&y1, &y2),
        z2: linalg::matvec(a, &y2),
    }
}

/// Forward-mode derivative: returns `(func(x, A), d func(x, A)/dx · v)`.
///
/// # Panics
/// Panics on inconsistent shapes, including `v.shape != x.shape`.
pub fn jvp(x: &Ten64, a: &Ten64, v: &Ten64) -> (ToyOutput, ToyOutput) {
    check_inputs(x, a);
    let x = WithTangent::new(x.clone(), v.clone());

    let y1 = forward::square(&x);
    let y2 = forward::sin(&y1);
    let z1 = forward::add(&y1, &y2);
    let z2 = forward::matvec_const(a, &y2);

    (
        ToyOutput {
            z1: z1.value,
            z2: z2.value,
        },
        ToyOutput {
            z1: z1.tangent,
            z2: z2.tangent,
        },
    )
}

/// Reverse-mode derivative: maps the output cotangents `(u1, u2)` to `x̄`.
///
/// # Panics
/// Panics on inconsistent shapes, including seeds that do not match the outputs.
pub fn vjp(x: &Ten64, a: &Ten64, u1: &Ten64, u2: &Ten64) -> Ten64 {
    check_inputs(x, a);
    let mut x = WithGrad::new(x.clone());

    // forward pass, keeping every intermediate
    let (y1, square_back) = backprop::square(&x);
    let mut y1 = WithGrad::new(y1);
    let (y2, sin_back) = backprop::sin(&y1);
    let mut y2 = WithGrad::new(y2);
    let (z1, sum_back) = backprop::add(&y1, &y2);
    let (z2, matvec_back) = backprop::matvec_const(a, &y2);
    assert_eq!(u1.shape, z1.shape, "toy: seed for z1 has wrong shape");
    assert_eq!(u2.shape, z2.shape, "toy: seed for z2 has wrong shape");

    // backward pass; y2 must be complete before it flows into y1
    let (dy1, dy2) = sum_back(u1);
    accumulate(&mut y1, &dy1);
    accumulate(&mut y2, &dy2);
    accumulate(&mut y2, &matvec_back(u2));

    accumulate(&mut y1, &sin_back(&y2.grad));
    accumulate(&mut x, &square_back(&y1.grad));

    x.grad
}

/// `Σ z1² + Σ z2²`.
pub fn loss(x: &Ten64, a: &Ten64) -> f64 {
    let out = func(x, a);
    linalg::dot(&out.z1, &out.z1) + linalg::dot(&out.z2, &out.z2)
}

/// Value and gradient of [`loss`] with respect to `x`.
///
/// The gradient is the VJP seeded with `(2·z1, 2·z2)`.
pub fn loss_grad(x: &Ten64, a: &Ten64) -> (f64, Ten64) {
    let out = func(x, a);
    let (l1, back1) = backprop::squared_norm_loss(&out.z1);
    let (l2, back2) = backprop::squared_norm_loss(&out.z2);
    let grad = vjp(x, a, &back1(1.0), &back2(1.0));
    (l1 + l2, grad)
}

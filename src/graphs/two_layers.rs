//! The two-layer quadratic network `two_layers(x, B, A) = A @ ((B @ x)²)`.
//!
//! ```text
//! h = B @ x
//! g = h²
//! z = A @ g
//! ```
//!
//! All three inputs are differentiated. The reference configuration is
//! `x ∈ R²`, `B ∈ R^{4×2}`, `A ∈ R^{3×4}`, but any consistent shapes work.

use log::trace;

use crate::backprop::{self, accumulate, sgd};
use crate::forward;
use crate::linalg;
use crate::tensors::{Ten64, WithGrad, WithTangent};

/// Cotangents of the three inputs of [`two_layers`].
#[derive(Debug, Clone, PartialEq)]
pub struct TwoLayerGrads {
    pub x: Ten64,
    pub b: Ten64,
    pub a: Ten64,
}

fn check_inputs(x: &Ten64, b: &Ten64, a: &Ten64) {
    super::assert_matvec_shapes("two_layers (first layer)", b, x);
    assert_eq!(a.ndim(), 2, "two_layers: A must be a matrix, got shape {:?}", a.shape);
    assert_eq!(
        a.cols(),
        b.rows(),
        "two_layers: A {:?} does not chain with B {:?}",
        a.shape,
        b.shape
    );
}

/// Evaluates `A @ ((B @ x)²)`.
///
/// # Panics
/// Panics if the shapes do not chain.
pub fn two_layers(x: &Ten64, b: &Ten64, a: &Ten64) -> Ten64 {
    check_inputs(x, b, a);
    let h = linalg::matvec(b, x);
    let g = linalg::map(&h, |hi| hi.powi(2));
    linalg::matvec(a, &g)
}

/// Forward-mode derivative in direction `(vx, vB, vA)`; returns `(z, ż)`.
///
/// # Panics
/// Panics if the shapes do not chain or a direction does not match its input.
pub fn jvp(
    x: &Ten64,
    b: &Ten64,
    a: &Ten64,
    vx: &Ten64,
    vb: &Ten64,
    va: &Ten64,
) -> (Ten64, Ten64) {
    check_inputs(x, b, a);
    let x = WithTangent::new(x.clone(), vx.clone());
    let b = WithTangent::new(b.clone(), vb.clone());
    let a = WithTangent::new(a.clone(), va.clone());

    let h = forward::matvec(&b, &x);
    let g = forward::square(&h);
    let z = forward::matvec(&a, &g);

    (z.value, z.tangent)
}

/// Reverse-mode derivative: maps the output cotangent `u` to `(x̄, B̄, Ā)`.
///
/// # Panics
/// Panics if the shapes do not chain or `u` does not match the output.
pub fn vjp(x: &Ten64, b: &Ten64, a: &Ten64, u: &Ten64) -> TwoLayerGrads {
    check_inputs(x, b, a);
    let mut x = WithGrad::new(x.clone());
    let mut b = WithGrad::new(b.clone());
    let mut a = WithGrad::new(a.clone());

    let (h, first_back) = backprop::matvec(&b, &x);
    let mut h = WithGrad::new(h);
    let (g, square_back) = backprop::square(&h);
    let mut g = WithGrad::new(g);
    let (z, second_back) = backprop::matvec(&a, &g);
    assert_eq!(u.shape, z.shape, "two_layers: seed has wrong shape");

    let (da, dg) = second_back(u);
    accumulate(&mut a, &da);
    accumulate(&mut g, &dg);

    accumulate(&mut h, &square_back(&g.grad));

    let (db, dx) = first_back(&h.grad);
    accumulate(&mut b, &db);
    accumulate(&mut x, &dx);

    TwoLayerGrads {
        x: x.grad,
        b: b.grad,
        a: a.grad,
    }
}

/// `Σ z²` for `z = two_layers(x, B, A)`.
pub fn loss(x: &Ten64, b: &Ten64, a: &Ten64) -> f64 {
    let z = two_layers(x, b, a);
    linalg::dot(&z, &z)
}

/// Value and gradient of [`loss`] with respect to all three inputs.
///
/// The gradient is the VJP seeded with `2z`.
pub fn loss_grad(x: &Ten64, b: &Ten64, a: &Ten64) -> (f64, TwoLayerGrads) {
    let z = two_layers(x, b, a);
    let (loss, back) = backprop::squared_norm_loss(&z);
    (loss, vjp(x, b, a, &back(1.0)))
}

/// Trainable weights of the two-layer network.
#[derive(Debug, Clone)]
pub struct TwoLayerNet {
    pub b: WithGrad<Ten64>,
    pub a: WithGrad<Ten64>,
}

impl TwoLayerNet {
    pub fn new(b: Ten64, a: Ten64) -> Self {
        Self {
            b: WithGrad::new(b),
            a: WithGrad::new(a),
        }
    }

    /// Output for input `x`.
    pub fn predict(&self, x: &Ten64) -> Ten64 {
        two_layers(x, &self.b.value, &self.a.value)
    }

    /// One gradient step on `Σ z²` for input `x`, updating both weight matrices.
    ///
    /// Returns the loss before the step.
    pub fn step(&mut self, x: &Ten64, lr: f64) -> f64 {
        let (loss, grads) = loss_grad(x, &self.b.value, &self.a.value);
        accumulate(&mut self.b, &grads.b);
        accumulate(&mut self.a, &grads.a);
        sgd(&mut self.b, lr);
        sgd(&mut self.a, lr);
        loss
    }

    /// Runs `steps` gradient steps on a fixed input and returns the loss history.
    pub fn fit(&mut self, x: &Ten64, lr: f64, steps: usize) -> Vec<f64> {
        let mut history = Vec::with_capacity(steps);
        for t in 0..steps {
            let loss = self.step(x, lr);
            trace!("two_layers fit step={t} loss={loss:.6e}");
            history.push(loss);
        }
        history
    }
}

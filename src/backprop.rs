//! Reverse-mode rules and gradient utilities.
//!
//! # Backpropagation Primitives
//!
//! Each differentiable operation returns its forward output together with a
//! backward closure mapping the output cotangent `ȳ = ∂L/∂y` to the cotangent(s)
//! of its inputs.
//!
//! **Rules:**
//! - **Sum** `y = a + b`: both inputs receive `ȳ`.
//! - **Constant linear map** `y = M @ x`: `x̄ = Mᵀȳ`.
//! - **Bilinear map** `y = M @ x`: `M̄ = ȳ xᵀ`, `x̄ = Mᵀȳ`.
//! - **Sine**: `x̄ = cos(x)·ȳ`.
//! - **Power** `y = xⁿ`: `x̄ = n·xⁿ⁻¹·ȳ`.
//! - **Squared-norm loss** `l = Σ z²`: `z̄ = 2z·l̄`.
//!
//! ## Autograd Pattern
//!
//! 1. **Inputs** are references to `WithGrad<Ten64>` nodes.
//! 2. **Forward Pass** computes an output `Ten64`.
//! 3. **Backward Pass** returns a closure capturing minimal cloned data to compute
//!    input cotangents.
//! 4. **Accumulation** adds each returned cotangent into the input node with
//!    [`accumulate`]. A node consumed by several operations receives one
//!    contribution per consumer, and they sum.
//!
//! ## Usage Guidelines
//!
//! - Operations **panic** on shape mismatches; ensure consistent tensor dimensions.
//! - The backward closures implement `Fn`, allowing multiple invocations (e.g. one
//!   per seed).

use crate::linalg;
use crate::tensors::{Ten64, WithGrad};

/// Adds `contribution` into the node's cotangent.
///
/// Cotangents are summed, never overwritten, so a node with several consumers
/// ends up with the total of their contributions.
///
/// # Panics
/// Panics if the contribution does not match the node's shape.
pub fn accumulate(node: &mut WithGrad<Ten64>, contribution: &Ten64) {
    assert_eq!(
        node.grad.shape, contribution.shape,
        "cotangent shape mismatch"
    );
    linalg::add_assign(&mut node.grad, contribution);
}

/// Computes `a + b`.
///
/// # Returns
/// - `out`: elementwise sum.
/// - `back`: closure mapping `ȳ` to `(ā, b̄) = (ȳ, ȳ)`.
///
/// # Example
/// ```rust
/// use quadgrad::{backprop, tensor, tensors::WithGrad};
///
/// let a = WithGrad::new(tensor!([1.0, 2.0]));
/// let b = WithGrad::new(tensor!([3.0, 4.0]));
/// let (y, back) = backprop::add(&a, &b);
/// let (da, db) = back(&tensor!([1.0, -1.0]));
/// assert_eq!(y.data, vec![4.0, 6.0]);
/// assert_eq!(da, db);
/// ```
pub fn add(a: &WithGrad<Ten64>, b: &WithGrad<Ten64>) -> (Ten64, impl Fn(&Ten64) -> (Ten64, Ten64) + use<>) {
    let out = linalg::add(&a.value, &b.value);
    let shape = out.shape.clone();

    let back = move |grad_output: &Ten64| {
        assert_eq!(grad_output.shape, shape, "sum cotangent shape mismatch");
        (grad_output.clone(), grad_output.clone())
    };

    (out, back)
}

/// Computes `M @ x` with `M` held constant.
///
/// # Returns
/// - `out`: `M @ x`.
/// - `back`: closure mapping `ȳ` to `x̄ = Mᵀȳ`.
pub fn matvec_const(m: &Ten64, x: &WithGrad<Ten64>) -> (Ten64, impl Fn(&Ten64) -> Ten64 + use<>) {
    let out = linalg::matvec(m, &x.value);
    let m = m.clone();

    let back = move |grad_output: &Ten64| linalg::matvec_t(&m, grad_output);

    (out, back)
}

/// Computes `M @ x` differentiating both the matrix and the vector.
///
/// # Returns
/// - `out`: `M @ x`.
/// - `back`: closure mapping `ȳ` to `(M̄, x̄) = (ȳ xᵀ, Mᵀȳ)`.
///
/// # Panics
/// Panics if `M.cols() != x.len()`.
pub fn matvec(m: &WithGrad<Ten64>, x: &WithGrad<Ten64>) -> (Ten64, impl Fn(&Ten64) -> (Ten64, Ten64) + use<>) {
    let out = linalg::matvec(&m.value, &x.value);
    let m_val = m.value.clone();
    let x_val = x.value.clone();

    let back = move |grad_output: &Ten64| {
        (
            linalg::outer(grad_output, &x_val),
            linalg::matvec_t(&m_val, grad_output),
        )
    };

    (out, back)
}

/// Applies `sin` elementwise.
///
/// The backward closure keeps the forward input, since `cos(x)` is needed.
pub fn sin(x: &WithGrad<Ten64>) -> (Ten64, impl Fn(&Ten64) -> Ten64 + use<>) {
    let out = linalg::map(&x.value, f64::sin);
    let cos_x = linalg::map(&x.value, f64::cos);

    let back = move |grad_output: &Ten64| linalg::zip_map(&cos_x, grad_output, |c, g| c * g);

    (out, back)
}

/// Raises every element to the integer power `n`.
pub fn powi(x: &WithGrad<Ten64>, n: i32) -> (Ten64, impl Fn(&Ten64) -> Ten64 + use<>) {
    let out = linalg::map(&x.value, |xi| xi.powi(n));
    let local = linalg::map(&x.value, |xi| f64::from(n) * xi.powi(n - 1));

    let back = move |grad_output: &Ten64| linalg::zip_map(&local, grad_output, |d, g| d * g);

    (out, back)
}

/// Squares every element; backward is `2x·ȳ`.
pub fn square(x: &WithGrad<Ten64>) -> (Ten64, impl Fn(&Ten64) -> Ten64 + use<>) {
    powi(x, 2)
}

/// Computes the squared-norm loss `l = Σ zᵢ²`.
///
/// # Returns
/// - Scalar loss value
/// - Closure mapping `l̄` to `z̄ = 2z·l̄`, the seed for the VJP of whatever produced `z`
///
/// # Example
/// ```rust
/// use quadgrad::{backprop::squared_norm_loss, tensor};
///
/// let (loss, back) = squared_norm_loss(&tensor!([1.0, -2.0]));
/// assert_eq!(loss, 5.0);
/// assert_eq!(back(1.0).data, vec![2.0, -4.0]);
/// ```
pub fn squared_norm_loss(z: &Ten64) -> (f64, impl Fn(f64) -> Ten64 + use<>) {
    let loss = linalg::dot(z, z);
    let z = z.clone();

    let back = move |grad_output: f64| linalg::scale(&z, 2.0 * grad_output);

    (loss, back)
}

/// Performs an in-place gradient step: `param -= lr * grad`, then resets the gradient to zero.
///
/// # Panics
/// Panics if shapes of `value` and `grad` mismatch.
pub fn sgd(w: &mut WithGrad<Ten64>, lr: f64) {
    assert_eq!(w.value.shape, w.grad.shape, "parameter/gradient shape mismatch");
    for (param, grad) in w.value.data.iter_mut().zip(&w.grad.data) {
        *param -= lr * *grad;
    }
    for grad in &mut w.grad.data {
        *grad = 0.0;
    }
}

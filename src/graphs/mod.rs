//! Hand-differentiated computational graphs.
//!
//! Each graph is a fixed sequence of elementary operations. Its JVP chains the
//! rules of [`crate::forward`]; its VJP runs a forward pass that keeps every
//! intermediate, then walks the operations in reverse with the closures of
//! [`crate::backprop`], summing cotangents wherever a value has several consumers.
//!
//! - [`toy`]: `func(x, A) = (x² + sin(x²), A @ sin(x²))`, two outputs, fan-out on
//!   both intermediates.
//! - [`two_layers`]: `two_layers(x, B, A) = A @ ((B @ x)²)`, differentiated with
//!   respect to the input and both weight matrices.

pub mod toy;
pub mod two_layers;

use crate::tensors::Ten64;

/// Panics unless `x` is a vector and `m` is a matrix with `x.len()` columns.
pub(crate) fn assert_matvec_shapes(name: &str, m: &Ten64, x: &Ten64) {
    assert_eq!(x.ndim(), 1, "{name}: input must be a vector, got shape {:?}", x.shape);
    assert_eq!(m.ndim(), 2, "{name}: weights must be a matrix, got shape {:?}", m.shape);
    assert_eq!(
        m.cols(),
        x.len(),
        "{name}: matrix {:?} cannot multiply vector {:?}",
        m.shape,
        x.shape
    );
}

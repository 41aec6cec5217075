//! quadgrad: hand-written automatic differentiation and descent methods in Rust.
//!
//! Two small, independent numerical toolkits built on dense row-major tensors.
//!
//! # Features
//!
//! - Forward-mode (JVP) and reverse-mode (VJP) rules for a handful of elementary
//!   operations: power, sine, matrix-vector products and sums.
//! - Two fixed computational graphs differentiated by hand with those rules: a toy
//!   vector function with fan-out and a two-layer quadratic network.
//! - Coordinate descent and gradient descent for `f(w) = ½wᵀAw − bᵀw`, recording
//!   the full trajectory of iterates.
//! - Numerical oracles (finite differences, adjoint identity) for checking
//!   derivative code.
//!
//! # Goals
//!
//! - Keep every derivative rule explicit and readable; there is no tape and no
//!   operator overloading.
//! - Fail fast on malformed input instead of returning wrong numbers.
//!
//! # Modules
//!
//! - [`tensors`]: Core tensor type, gradient/tangent pairs and the `tensor!` macro.
//! - [`linalg`]: Dense linear-algebra primitives.
//! - [`forward`]: Forward-mode (tangent) propagation rules.
//! - [`backprop`]: Reverse-mode rules returning backward closures.
//! - [`graphs`]: The two hand-differentiated computational graphs.
//! - [`gradcheck`]: Finite-difference and adjoint-identity oracles.
//! - [`descent`]: Coordinate descent and gradient descent on quadratics.
//!
//! # Example
//!
//! ```rust
//! use quadgrad::{graphs::toy, tensor};
//!
//! let x = tensor!([1.0, 2.0, -1.0]);
//! let v = tensor!([1.0, 3.0, 4.0]);
//! let a = tensor!([[0.0, 2.0, -1.0], [3.0, 1.5, 2.0]]);
//! let (_, tangent) = toy::jvp(&x, &a, &v);
//! assert!((tangent.z1.data[0] - 3.0806).abs() < 1e-4);
//! ```

pub mod backprop;
pub mod descent;
pub mod forward;
pub mod gradcheck;
pub mod graphs;
pub mod linalg;
pub mod tensors;

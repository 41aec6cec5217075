//! Vectors, matrices and the value pairs the differentiation rules pass around.
//!
//! A [`Tensor`] is a flat row-major buffer plus its shape. The crate only ever
//! builds vectors (`[n]`) and matrices (`[m, n]`): inputs and intermediates of the
//! two graphs, weight matrices, and the `A`, `b`, `w` of a quadratic problem.
//! Matrix accessors ([`Tensor::rows`], [`Tensor::row`], [`Tensor::get`]) assert
//! rank 2.
//!
//! The two pairs mirror the two differentiation modes:
//!
//! - [`WithTangent`] carries `(y, ẏ)` forward, where `ẏ = dy/dx · v`. Both halves
//!   always share a shape.
//! - [`WithGrad`] holds `(y, ȳ)` for reverse mode. `ȳ` starts at zero and only
//!   grows through [`crate::backprop::accumulate`].
//!
//! Literals go through [`tensor!`](crate::tensor), which accepts negative entries
//! and rejects ragged rows.
//!
//! ## Example
//!
//! ```rust
//! use quadgrad::tensors::Tensor;
//! let t = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! assert_eq!(t.shape, vec![2, 3]);
//! assert_eq!(t.get(1, 0), 4.0);
//! ```

/// Represents an N-dimensional tensor with a shape and flat row-major data.
///
/// - All elements must be the same type (`T`).
/// - `shape` defines the structure, e.g., `[2, 3]` for a 2×3 matrix.
/// - `data` holds the flattened content in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

/// The `f64` tensor every numerical routine in this crate works on.
pub type Ten64 = Tensor<f64>;

impl<T> Tensor<T> {
    /// Creates a new tensor with the given shape and flat data.
    ///
    /// # Panics
    /// Panics if the number of elements in `data` does not match the shape product.
    pub fn new(shape: impl Into<Vec<usize>>, data: Vec<T>) -> Self {
        let shape = shape.into();
        assert_eq!(
            shape.iter().product::<usize>(),
            data.len(),
            "shape {:?} is incompatible with {} data elements",
            shape,
            data.len()
        );
        Self { shape, data }
    }

    /// Creates a 1-D tensor owning `data`.
    pub fn vector(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Creates a `rows × cols` matrix from row-major `data`.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn matrix(rows: usize, cols: usize, data: Vec<T>) -> Self {
        Self::new(vec![rows, cols], data)
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of rows of a matrix.
    ///
    /// # Panics
    /// Panics if the tensor is not 2-D.
    pub fn rows(&self) -> usize {
        assert_eq!(self.ndim(), 2, "expected a matrix, got shape {:?}", self.shape);
        self.shape[0]
    }

    /// Number of columns of a matrix.
    ///
    /// # Panics
    /// Panics if the tensor is not 2-D.
    pub fn cols(&self) -> usize {
        assert_eq!(self.ndim(), 2, "expected a matrix, got shape {:?}", self.shape);
        self.shape[1]
    }

    /// Row `i` of a matrix as a slice.
    pub fn row(&self, i: usize) -> &[T] {
        let n = self.cols();
        &self.data[i * n..(i + 1) * n]
    }
}

impl<T: Copy> Tensor<T> {
    /// Element `(i, j)` of a matrix.
    pub fn get(&self, i: usize, j: usize) -> T {
        self.row(i)[j]
    }
}

impl Tensor<f64> {
    /// A tensor of the given shape filled with `0.0`.
    pub fn zeros(shape: impl Into<Vec<usize>>) -> Self {
        let shape = shape.into();
        let len = shape.iter().product();
        Self {
            shape,
            data: vec![0.0; len],
        }
    }

    /// A zero tensor with the same shape as `self`.
    pub fn zeros_like(&self) -> Self {
        Self::zeros(self.shape.clone())
    }

    /// The `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut out = Self::zeros(vec![n, n]);
        for i in 0..n {
            out.data[i * n + i] = 1.0;
        }
        out
    }

    /// Whether every element is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

/// A container for tracking gradients of values (used in reverse mode).
///
/// `grad` holds the cotangent accumulated so far. Contributions from several
/// consumers of the same value are summed into it, see [`crate::backprop::accumulate`].
#[derive(Debug, Clone)]
pub struct WithGrad<T> {
    pub value: T,
    pub grad: T,
}

impl WithGrad<Ten64> {
    /// Wraps a value with a zeroed gradient of matching shape.
    pub fn new(value: Ten64) -> Self {
        let grad = value.zeros_like();
        Self { value, grad }
    }
}

/// A value paired with its directional derivative (used in forward mode).
///
/// For an intermediate `y` of a graph evaluated at input `x` in direction `v`,
/// `tangent` is `dy/dx · v`.
#[derive(Debug, Clone, PartialEq)]
pub struct WithTangent<T> {
    pub value: T,
    pub tangent: T,
}

impl WithTangent<Ten64> {
    /// Pairs `value` with `tangent`.
    ///
    /// # Panics
    /// Panics if the shapes differ.
    pub fn new(value: Ten64, tangent: Ten64) -> Self {
        assert_eq!(
            value.shape, tangent.shape,
            "tangent shape must match value shape"
        );
        Self { value, tangent }
    }
}

/// Defines a tensor from nested literal arrays.
///
/// Supports vectors and matrices (or deeper nesting) as long as sublists are
/// uniform in shape. Elements may be arbitrary expressions, including negative
/// literals.
///
/// # Example
/// ```
/// use quadgrad::tensor;
/// let t = tensor!([[1.0, 2.0], [3.0, -4.0]]);
/// assert_eq!(t.shape, vec![2, 2]);
/// assert_eq!(t.data, vec![1.0, 2.0, 3.0, -4.0]);
/// ```
#[macro_export]
macro_rules! tensor {
    ([ $( [ $($inner:tt)* ] ),+ $(,)? ]) => {{
        let children = vec![ $( $crate::tensor!([ $($inner)* ]) ),+ ];
        let first_shape = children[0].shape.clone();
        assert!(children.iter().all(|c| c.shape == first_shape),
            "ragged tensor literal (rows have mismatched shapes)");
        let mut shape = vec![children.len()];
        shape.extend_from_slice(&first_shape);
        let mut data = Vec::with_capacity(children.len() * children[0].data.len());
        for c in children { data.extend(c.data); }
        $crate::tensors::Tensor::new(shape, data)
    }};

    ([ $( $x:expr ),+ $(,)? ]) => {
        $crate::tensors::Tensor::vector(vec![ $( $x ),+ ])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_builds_matrix_with_negative_entries() {
        let t = tensor!([[0.0, 2.0, -1.0], [3.0, 1.5, 2.0]]);
        assert_eq!(t.shape, vec![2, 3]);
        assert_eq!(t.get(0, 2), -1.0);
        assert_eq!(t.row(1), &[3.0, 1.5, 2.0]);
    }

    #[test]
    #[should_panic(expected = "ragged")]
    fn macro_rejects_ragged_rows() {
        let _ = tensor!([[1.0, 2.0], [3.0]]);
    }

    #[test]
    fn identity_has_unit_diagonal() {
        let i = Tensor::identity(3);
        assert_eq!(i.get(1, 1), 1.0);
        assert_eq!(i.get(0, 1), 0.0);
        assert_eq!(i.data.iter().sum::<f64>(), 3.0);
    }

    #[test]
    #[should_panic(expected = "tangent shape")]
    fn tangent_shape_is_checked() {
        let _ = WithTangent::new(tensor!([1.0, 2.0]), tensor!([1.0]));
    }
}

//! Dense linear-algebra primitives.
//!
//! # CPU Kernels
//!
//! Everything the derivative rules and descent methods need from linear algebra:
//! inner products, matrix-vector products (plain and transposed), outer products,
//! elementwise maps and a small SPD solver.
//!
//! ## Features
//!
//! - Row-parallel matrix-vector products using [`rayon`](https://docs.rs/rayon)
//! - Elementwise maps over matching shapes
//! - Power iteration for the largest eigenvalue of a symmetric matrix
//! - Cholesky factorization for solving `A w = b` with `A` symmetric positive-definite
//!
//! ## Determinism
//!
//! Each output element is reduced sequentially by exactly one worker, so results do
//! not depend on scheduling.
//!
//! ## Panics
//!
//! Shape mismatches panic. Callers validate shapes at their boundary.

use rayon::prelude::*;

use crate::tensors::{Ten64, Tensor};

/// Inner product of two tensors of equal shape (Frobenius product for matrices).
///
/// # Panics
/// Panics if shapes differ.
pub fn dot(a: &Ten64, b: &Ten64) -> f64 {
    assert_eq!(a.shape, b.shape, "dot shape mismatch");
    a.data.iter().zip(&b.data).map(|(x, y)| x * y).sum()
}

/// Euclidean (Frobenius) norm.
pub fn norm(a: &Ten64) -> f64 {
    a.data.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Computes `M @ x` for an `m×n` matrix and a length-`n` vector.
///
/// # Panics
/// Panics if `x.len() != n` or `m` is not 2-D.
pub fn matvec(m: &Ten64, x: &Ten64) -> Ten64 {
    let rows = m.rows();
    let cols = m.cols();
    assert_eq!(
        x.shape,
        vec![cols],
        "matvec shape mismatch: matrix {:?}, vector {:?}",
        m.shape,
        x.shape
    );

    let mut out = vec![0.0; rows];
    out.par_iter_mut().enumerate().for_each(|(i, o)| {
        *o = m.data[i * cols..(i + 1) * cols]
            .iter()
            .zip(&x.data)
            .map(|(a, b)| a * b)
            .sum();
    });

    Tensor::vector(out)
}

/// Computes `Mᵀ @ y` for an `m×n` matrix and a length-`m` vector without forming `Mᵀ`.
///
/// # Panics
/// Panics if `y.len() != m`.
pub fn matvec_t(m: &Ten64, y: &Ten64) -> Ten64 {
    let rows = m.rows();
    let cols = m.cols();
    assert_eq!(
        y.shape,
        vec![rows],
        "transposed matvec shape mismatch: matrix {:?}, vector {:?}",
        m.shape,
        y.shape
    );

    let mut out = vec![0.0; cols];
    out.par_iter_mut().enumerate().for_each(|(j, o)| {
        let mut acc = 0.0;
        for i in 0..rows {
            acc += m.data[i * cols + j] * y.data[i];
        }
        *o = acc;
    });

    Tensor::vector(out)
}

/// Outer product `u vᵀ`, an `len(u) × len(v)` matrix.
pub fn outer(u: &Ten64, v: &Ten64) -> Ten64 {
    assert_eq!(u.ndim(), 1, "outer expects vectors");
    assert_eq!(v.ndim(), 1, "outer expects vectors");
    let n = v.len();

    let mut out = vec![0.0; u.len() * n];
    out.par_chunks_mut(n.max(1))
        .zip(u.data.par_iter())
        .for_each(|(row, &ui)| {
            for (o, &vj) in row.iter_mut().zip(&v.data) {
                *o = ui * vj;
            }
        });

    Tensor::matrix(u.len(), n, out)
}

/// Applies `f` elementwise.
pub fn map(a: &Ten64, f: impl Fn(f64) -> f64) -> Ten64 {
    Tensor::new(a.shape.clone(), a.data.iter().map(|&x| f(x)).collect())
}

/// Combines two tensors of equal shape elementwise.
///
/// # Panics
/// Panics if shapes differ.
pub fn zip_map(a: &Ten64, b: &Ten64, f: impl Fn(f64, f64) -> f64) -> Ten64 {
    assert_eq!(a.shape, b.shape, "elementwise shape mismatch");
    Tensor::new(
        a.shape.clone(),
        a.data.iter().zip(&b.data).map(|(&x, &y)| f(x, y)).collect(),
    )
}

/// `a + b`.
pub fn add(a: &Ten64, b: &Ten64) -> Ten64 {
    zip_map(a, b, |x, y| x + y)
}

/// `a - b`.
pub fn sub(a: &Ten64, b: &Ten64) -> Ten64 {
    zip_map(a, b, |x, y| x - y)
}

/// `alpha · a`.
pub fn scale(a: &Ten64, alpha: f64) -> Ten64 {
    map(a, |x| alpha * x)
}

/// In-place `y += alpha · x`.
///
/// # Panics
/// Panics if shapes differ.
pub fn axpy(alpha: f64, x: &Ten64, y: &mut Ten64) {
    assert_eq!(x.shape, y.shape, "axpy shape mismatch");
    for (yi, &xi) in y.data.iter_mut().zip(&x.data) {
        *yi += alpha * xi;
    }
}

/// In-place `y += x`.
pub fn add_assign(y: &mut Ten64, x: &Ten64) {
    axpy(1.0, x, y);
}

/// Unit vector with entries `1 + frac((i + 1)·φ)`, free of the sign and symmetry
/// patterns that make structured vectors (all-ones, basis vectors) eigenvectors.
fn irregular_unit(n: usize) -> Ten64 {
    const PHI: f64 = 0.618_033_988_749_895;
    let v = Tensor::vector((0..n).map(|i| 1.0 + ((i + 1) as f64 * PHI).fract()).collect());
    let len = norm(&v);
    scale(&v, 1.0 / len)
}

/// Largest eigenvalue of a symmetric positive semi-definite matrix by power iteration.
///
/// Starts from an irregular unit vector and stops after `max_iter` steps or when
/// the Rayleigh quotient changes by less than `tol` (relative).
pub fn power_iteration(a: &Ten64, max_iter: usize, tol: f64) -> f64 {
    let n = a.rows();
    assert_eq!(n, a.cols(), "power iteration needs a square matrix");
    if n == 0 {
        return 0.0;
    }

    let mut v = irregular_unit(n);
    let mut lambda = 0.0;
    for _ in 0..max_iter {
        let w = matvec(a, &v);
        let next = dot(&v, &w);
        let w_norm = norm(&w);
        if w_norm == 0.0 {
            return 0.0;
        }
        v = scale(&w, 1.0 / w_norm);
        let converged = (next - lambda).abs() <= tol * next.abs();
        lambda = next;
        if converged {
            break;
        }
    }
    lambda
}

/// Lower-triangular Cholesky factor `L` with `A = L Lᵀ`.
///
/// Returns `None` if `A` is not (numerically) positive-definite.
// Explicit indexing mirrors the textbook recurrence.
#[allow(clippy::needless_range_loop)]
pub fn cholesky(a: &Ten64) -> Option<Ten64> {
    let n = a.rows();
    assert_eq!(n, a.cols(), "cholesky needs a square matrix");

    let mut l = Tensor::zeros(vec![n, n]);
    for i in 0..n {
        for j in 0..=i {
            let mut s = a.data[i * n + j];
            for k in 0..j {
                s -= l.data[i * n + k] * l.data[j * n + k];
            }
            if i == j {
                if s <= 0.0 || !s.is_finite() {
                    return None;
                }
                l.data[i * n + i] = s.sqrt();
            } else {
                l.data[i * n + j] = s / l.data[j * n + j];
            }
        }
    }
    Some(l)
}

/// Solves `A w = b` for symmetric positive-definite `A`.
///
/// Returns `None` if the Cholesky factorization fails.
pub fn cholesky_solve(a: &Ten64, b: &Ten64) -> Option<Ten64> {
    let n = a.rows();
    assert_eq!(b.shape, vec![n], "right-hand side length mismatch");
    let l = cholesky(a)?;

    // L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let s: f64 = (0..i).map(|k| l.data[i * n + k] * y[k]).sum();
        y[i] = (b.data[i] - s) / l.data[i * n + i];
    }

    // Lᵀ w = y
    let mut w = vec![0.0; n];
    for i in (0..n).rev() {
        let s: f64 = (i + 1..n).map(|k| l.data[k * n + i] * w[k]).sum();
        w[i] = (y[i] - s) / l.data[i * n + i];
    }

    Some(Tensor::vector(w))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor;
    use approx::assert_relative_eq;

    #[test]
    fn matvec_and_transpose_agree_with_hand_computation() {
        let m = tensor!([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(matvec(&m, &tensor!([1.0, 0.0, -1.0])).data, vec![-2.0, -2.0]);
        assert_eq!(matvec_t(&m, &tensor!([1.0, 1.0])).data, vec![5.0, 7.0, 9.0]);
    }

    #[test]
    #[should_panic(expected = "matvec shape mismatch")]
    fn matvec_rejects_wrong_length() {
        let m = tensor!([[1.0, 2.0], [3.0, 4.0]]);
        matvec(&m, &tensor!([1.0, 2.0, 3.0]));
    }

    #[test]
    fn outer_product_layout() {
        let o = outer(&tensor!([1.0, 2.0]), &tensor!([3.0, 4.0, 5.0]));
        assert_eq!(o.shape, vec![2, 3]);
        assert_eq!(o.data, vec![3.0, 4.0, 5.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn power_iteration_finds_dominant_eigenvalue() {
        let a = tensor!([[2.0, 1.0], [1.0, 2.0]]);
        assert_relative_eq!(power_iteration(&a, 500, 1e-14), 3.0, max_relative = 1e-9);
    }

    #[test]
    fn power_iteration_escapes_non_dominant_symmetric_start() {
        // all-ones is the eigenvector of the smaller eigenvalue 1 here
        let a = tensor!([[2.0, -1.0], [-1.0, 2.0]]);
        assert_relative_eq!(power_iteration(&a, 500, 1e-14), 3.0, max_relative = 1e-9);

        // dominant direction is a basis vector
        let b = tensor!([[3.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_relative_eq!(power_iteration(&b, 500, 1e-14), 3.0, max_relative = 1e-9);
    }

    #[test]
    fn cholesky_solve_recovers_solution() {
        let a = tensor!([[4.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]]);
        let w = tensor!([1.0, -2.0, 0.5]);
        let b = matvec(&a, &w);
        let solved = cholesky_solve(&a, &b).unwrap();
        for (x, y) in solved.data.iter().zip(&w.data) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn cholesky_rejects_indefinite_matrix() {
        let a = tensor!([[1.0, 2.0], [2.0, 1.0]]);
        assert!(cholesky(&a).is_none());
    }
}

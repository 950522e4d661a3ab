//! Dense complex linear algebra backed by `faer`.
//!
//! Matrices live in `ndarray` storage everywhere else in mnemo; this module
//! copies them into `faer` for the decompositions it is good at (SVD and the
//! Hermitian eigensolver) and copies the factors back.
//!
//! Singular values and eigenvalues are recovered from the returned factors as
//! `Re(u_k† · A · v_k)` rather than read from the backend's diagonal, so the
//! values are always paired with the columns they belong to.

use faer::{Mat, MatRef, Side};
use ndarray::{Array2, Axis};
use num_complex::Complex64;
use tracing::{debug, warn};

use crate::error::{ChannelError, ChannelResult};

/// Default relative cutoff for [`pseudo_inverse`], matching the usual
/// `rcond = 1e-15` convention.
pub const DEFAULT_RCOND: f64 = 1e-15;

/// Singular value decomposition `A = U · diag(s) · V†`.
#[derive(Debug, Clone)]
pub struct Svd {
    /// Left singular vectors (columns).
    pub u: Array2<Complex64>,
    /// Singular values, one per column of `u` / `v`.
    pub s: Vec<f64>,
    /// Right singular vectors (columns).
    pub v: Array2<Complex64>,
}

/// Eigendecomposition `A = V · diag(values) · V†` of a Hermitian matrix.
#[derive(Debug, Clone)]
pub struct HermitianEigen {
    /// Real eigenvalues, one per column of `vectors`.
    pub values: Vec<f64>,
    /// Orthonormal eigenvectors (columns).
    pub vectors: Array2<Complex64>,
}

impl HermitianEigen {
    /// Rebuild `V · diag(f(λ)) · V†`.
    pub fn reconstruct_with(&self, f: impl Fn(f64) -> f64) -> Array2<Complex64> {
        let mut scaled = self.vectors.clone();
        for (mut col, &lambda) in scaled.axis_iter_mut(Axis(1)).zip(&self.values) {
            let w = f(lambda);
            col.mapv_inplace(|z| z * w);
        }
        scaled.dot(&adjoint(&self.vectors))
    }

    /// Rebuild `V · diag(λ) · V†`.
    pub fn reconstruct(&self) -> Array2<Complex64> {
        self.reconstruct_with(|lambda| lambda)
    }
}

fn to_faer(a: &Array2<Complex64>) -> Mat<Complex64> {
    Mat::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

fn from_faer(m: MatRef<'_, Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Conjugate transpose of an array.
pub fn adjoint(a: &Array2<Complex64>) -> Array2<Complex64> {
    a.t().mapv(|z| z.conj())
}

/// `Re(x† · y)` for two columns.
fn real_inner(x: ndarray::ArrayView1<'_, Complex64>, y: ndarray::ArrayView1<'_, Complex64>) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| a.conj() * b).sum::<Complex64>().re
}

fn check_finite(a: &Array2<Complex64>) -> ChannelResult<()> {
    if a.iter().all(|z| z.re.is_finite() && z.im.is_finite()) {
        Ok(())
    } else {
        Err(ChannelError::NonFinite)
    }
}

/// Full singular value decomposition of a square matrix.
pub fn svd(a: &Array2<Complex64>) -> ChannelResult<Svd> {
    check_finite(a)?;
    let dec = to_faer(a)
        .as_ref()
        .svd()
        .map_err(|e| ChannelError::Decomposition(format!("SVD did not converge: {e:?}")))?;
    let u = from_faer(dec.U());
    let v = from_faer(dec.V());

    let av = a.dot(&v);
    let k = a.nrows().min(a.ncols());
    let s = (0..k)
        .map(|j| real_inner(u.column(j), av.column(j)).max(0.0))
        .collect();

    Ok(Svd { u, s, v })
}

/// Singular values of a square matrix.
pub fn singular_values(a: &Array2<Complex64>) -> ChannelResult<Vec<f64>> {
    Ok(svd(a)?.s)
}

/// Moore–Penrose pseudo-inverse.
///
/// Singular values at or below `rcond · σ_max` are treated as zero.
pub fn pseudo_inverse(a: &Array2<Complex64>, rcond: f64) -> ChannelResult<Array2<Complex64>> {
    let Svd { u, s, v } = svd(a)?;
    let sigma_max = s.iter().copied().fold(0.0, f64::max);
    let cutoff = rcond * sigma_max;

    let mut truncated = 0usize;
    let mut v_scaled = v;
    for (mut col, &sigma) in v_scaled.axis_iter_mut(Axis(1)).zip(&s) {
        if sigma > cutoff {
            let inv = 1.0 / sigma;
            col.mapv_inplace(|z| z * inv);
        } else {
            truncated += 1;
            col.fill(Complex64::new(0.0, 0.0));
        }
    }

    if truncated > 0 {
        warn!(
            truncated,
            dim = a.nrows(),
            cutoff,
            "pseudo-inverse dropped near-zero singular values"
        );
    } else {
        debug!(dim = a.nrows(), sigma_max, "pseudo-inverse at full rank");
    }

    Ok(v_scaled.dot(&adjoint(&u)))
}

/// Eigendecomposition of a Hermitian matrix (the lower triangle is read).
pub fn hermitian_eigen(a: &Array2<Complex64>) -> ChannelResult<HermitianEigen> {
    check_finite(a)?;
    let dec = to_faer(a)
        .as_ref()
        .self_adjoint_eigen(Side::Lower)
        .map_err(|e| ChannelError::Decomposition(format!("eigensolver did not converge: {e:?}")))?;
    let vectors = from_faer(dec.U());

    let av = a.dot(&vectors);
    let values = (0..vectors.ncols())
        .map(|j| real_inner(vectors.column(j), av.column(j)))
        .collect();

    Ok(HermitianEigen { values, vectors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn max_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_svd_reconstructs() {
        let a = array![[c(1.0, 2.0), c(0.5, 0.0)], [c(-1.0, 0.0), c(0.0, 3.0)]];
        let Svd { u, s, v } = svd(&a).unwrap();
        let mut us = u.clone();
        for (mut col, &sigma) in us.axis_iter_mut(Axis(1)).zip(&s) {
            col.mapv_inplace(|z| z * sigma);
        }
        let rebuilt = us.dot(&adjoint(&v));
        assert!(max_diff(&rebuilt, &a) < 1e-12);
    }

    #[test]
    fn test_singular_values_of_diagonal() {
        let a = array![[c(3.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(0.0, -2.0)]];
        let mut s = singular_values(&a).unwrap();
        s.sort_by(|x, y| y.total_cmp(x));
        assert!((s[0] - 3.0).abs() < 1e-12);
        assert!((s[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_pseudo_inverse_of_invertible_is_inverse() {
        let a = array![[c(2.0, 0.0), c(1.0, 1.0)], [c(0.0, 0.0), c(1.0, 0.0)]];
        let p = pseudo_inverse(&a, DEFAULT_RCOND).unwrap();
        let id: Array2<Complex64> = Array2::eye(2);
        assert!(max_diff(&a.dot(&p), &id) < 1e-12);
    }

    #[test]
    fn test_pseudo_inverse_of_singular() {
        // rank-1 projector is its own pseudo-inverse
        let a = array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(0.0, 0.0)]];
        let p = pseudo_inverse(&a, DEFAULT_RCOND).unwrap();
        assert!(max_diff(&p, &a) < 1e-12);
    }

    #[test]
    fn test_pseudo_inverse_penrose_conditions() {
        let a = array![
            [c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0)],
            [c(2.0, 0.0), c(4.0, 0.0), c(6.0, 0.0)],
            [c(0.0, 1.0), c(0.0, 0.0), c(1.0, 0.0)]
        ];
        let p = pseudo_inverse(&a, 1e-12).unwrap();
        assert!(max_diff(&a.dot(&p).dot(&a), &a) < 1e-10);
        assert!(max_diff(&p.dot(&a).dot(&p), &p) < 1e-10);
    }

    #[test]
    fn test_hermitian_eigen_values() {
        // eigenvalues of [[2, i], [-i, 2]] are 1 and 3
        let a = array![[c(2.0, 0.0), c(0.0, 1.0)], [c(0.0, -1.0), c(2.0, 0.0)]];
        let eig = hermitian_eigen(&a).unwrap();
        let mut vals = eig.values.clone();
        vals.sort_by(f64::total_cmp);
        assert!((vals[0] - 1.0).abs() < 1e-12);
        assert!((vals[1] - 3.0).abs() < 1e-12);
        assert!(max_diff(&eig.reconstruct(), &a) < 1e-12);
    }

    #[test]
    fn test_non_finite_rejected() {
        let a = array![[c(f64::NAN, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]];
        assert!(matches!(svd(&a), Err(ChannelError::NonFinite)));
    }
}

//! Matrix utilities: trace norm, trace distance, Kraus application and
//! Choi extension.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChannelError, ChannelResult};
use crate::linalg;
use crate::operator::Operator;
use crate::state::DensityMatrix;

/// Default tolerance of [`TraceNormPolicy::Strict`].
pub const DEFAULT_TRACE_NORM_TOLERANCE: f64 = 1e-9;

/// How [`trace_norm`] treats the square root of `M·M†`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TraceNormPolicy {
    /// Eigendecompose `M·M†` and fail with
    /// [`ChannelError::NotDiagonalizable`] if the eigenbasis does not
    /// reproduce it within `tolerance` (relative to its largest entry).
    Strict {
        /// Relative reconstruction tolerance.
        tolerance: f64,
    },
    /// Sum the singular values of `M` without any check.
    Relaxed,
}

impl Default for TraceNormPolicy {
    fn default() -> Self {
        TraceNormPolicy::Strict {
            tolerance: DEFAULT_TRACE_NORM_TOLERANCE,
        }
    }
}

/// Trace norm `tr √(M·M†)`.
pub fn trace_norm(m: &Operator, policy: TraceNormPolicy) -> ChannelResult<f64> {
    if !m.is_finite() {
        return Err(ChannelError::NonFinite);
    }
    match policy {
        TraceNormPolicy::Relaxed => Ok(linalg::singular_values(m.as_array())?.iter().sum()),
        TraceNormPolicy::Strict { tolerance } => {
            let gram = m.as_array().dot(&linalg::adjoint(m.as_array()));
            let eig = linalg::hermitian_eigen(&gram)?;

            let scale = gram.iter().map(|z| z.norm()).fold(1.0, f64::max);
            let residual = max_abs_diff(&eig.reconstruct(), &gram) / scale;
            if residual > tolerance {
                return Err(ChannelError::NotDiagonalizable {
                    residual,
                    tolerance,
                });
            }
            // M·M† is PSD; a clearly negative eigenvalue means the basis is unusable
            let min_eig = eig.values.iter().copied().fold(f64::INFINITY, f64::min) / scale;
            if min_eig < -tolerance {
                return Err(ChannelError::NotDiagonalizable {
                    residual: -min_eig,
                    tolerance,
                });
            }

            let root = eig.reconstruct_with(|lambda| lambda.max(0.0).sqrt());
            let tr: Complex64 = root.diag().sum();
            trace!(trace_norm = tr.re, residual, "strict trace norm");
            Ok(tr.re)
        }
    }
}

fn max_abs_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// `|ψ⟩⟨ψ|` for `ψ` the all-ones vector on `n` qubits scaled by `1/√dim`.
///
/// Trace 1, rank 1. This is the probe state the divisibility measure feeds
/// through Choi-extended maps. Fails with [`ChannelError::TooManyQubits`]
/// when `2^n × 2^n` entries cannot be indexed.
pub fn maximally_entangled_density_matrix(n: u32) -> ChannelResult<DensityMatrix> {
    let dim = qubit_dim(n)?;
    let amp = 1.0 / dim as f64;
    let data = Array2::from_elem((dim, dim), Complex64::new(amp, 0.0));
    Ok(DensityMatrix::new(Operator::from_square(data)))
}

/// `2^n`, provided a `2^n × 2^n` matrix is addressable.
pub fn qubit_dim(n: u32) -> ChannelResult<usize> {
    1usize
        .checked_shl(n)
        .filter(|dim| dim.checked_mul(*dim).is_some())
        .ok_or(ChannelError::TooManyQubits(n))
}

/// `Σ_i K_i ρ K_i†`, accumulated in complex arithmetic.
///
/// An empty operator list yields the zero matrix.
pub fn apply_kraus_map(operators: &[Operator], rho: &Operator) -> ChannelResult<Operator> {
    let mut acc = Operator::zeros(rho.dim());
    for k in operators {
        let term = k.matmul(rho)?.matmul(&k.adjoint())?;
        acc = acc.add(&term)?;
    }
    Ok(acc)
}

/// `{I₂ ⊗ K_i}` for each Kraus operator.
pub fn extended_choi_operators(kraus: &[Operator]) -> Vec<Operator> {
    let id2 = Operator::identity(2);
    kraus.iter().map(|k| id2.kron(k)).collect()
}

/// Trace distance `½ ‖ρ₁ − ρ₂‖₁` (half the nuclear norm of the difference).
pub fn trace_distance(rho1: &DensityMatrix, rho2: &DensityMatrix) -> ChannelResult<f64> {
    let diff = rho1.as_operator().sub(rho2.as_operator())?;
    let s = linalg::singular_values(diff.as_array())?;
    Ok(0.5 * s.iter().sum::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_trace_norm_of_identity() {
        let id = Operator::identity(4);
        let strict = trace_norm(&id, TraceNormPolicy::default()).unwrap();
        let relaxed = trace_norm(&id, TraceNormPolicy::Relaxed).unwrap();
        assert!((strict - 4.0).abs() < 1e-12);
        assert!((relaxed - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_trace_norm_of_non_normal_matrix() {
        // singular values of [[0, 2], [0, 0]] are 2 and 0
        let m = Operator::new(array![[c(0.0, 0.0), c(2.0, 0.0)], [c(0.0, 0.0), c(0.0, 0.0)]])
            .unwrap();
        let strict = trace_norm(&m, TraceNormPolicy::default()).unwrap();
        let relaxed = trace_norm(&m, TraceNormPolicy::Relaxed).unwrap();
        assert!((strict - 2.0).abs() < 1e-12);
        assert!((relaxed - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_trace_norm_rejects_non_finite() {
        let m = Operator::new(array![[c(f64::INFINITY, 0.0)]]).unwrap();
        assert!(matches!(
            trace_norm(&m, TraceNormPolicy::Relaxed),
            Err(ChannelError::NonFinite)
        ));
    }

    #[test]
    fn test_maximally_entangled_trace_and_rank() {
        let rho = maximally_entangled_density_matrix(2).unwrap();
        assert_eq!(rho.dim(), 4);
        assert!((rho.as_operator().trace().re - 1.0).abs() < 1e-15);
        let eig = linalg::hermitian_eigen(rho.as_operator().as_array()).unwrap();
        let nonzero = eig.values.iter().filter(|v| v.abs() > 1e-12).count();
        assert_eq!(nonzero, 1);
        let max = eig.values.iter().copied().fold(f64::MIN, f64::max);
        assert!((max - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_qubit_dim_overflow() {
        assert_eq!(qubit_dim(3).unwrap(), 8);
        for n in [32, 64, u32::MAX] {
            assert!(matches!(qubit_dim(n), Err(ChannelError::TooManyQubits(q)) if q == n));
        }
        assert!(matches!(
            maximally_entangled_density_matrix(u32::MAX),
            Err(ChannelError::TooManyQubits(_))
        ));
    }

    #[test]
    fn test_strict_trace_norm_zero_tolerance_not_diagonalizable() {
        // eigen reconstruction of a generic dense gram matrix is never exact
        let m = Operator::new(array![
            [c(0.3, 0.7), c(1.1, -0.2), c(0.0, 0.4)],
            [c(-0.5, 0.9), c(0.2, 0.1), c(1.3, 0.0)],
            [c(0.8, -0.6), c(-0.4, 0.3), c(0.6, 0.5)]
        ])
        .unwrap();
        let strict = TraceNormPolicy::Strict { tolerance: -1.0 };
        assert!(matches!(
            trace_norm(&m, strict),
            Err(ChannelError::NotDiagonalizable { tolerance, .. }) if tolerance == -1.0
        ));
        assert!(trace_norm(&m, TraceNormPolicy::default()).is_ok());
    }

    #[test]
    fn test_apply_kraus_empty_is_zero() {
        let rho = Operator::identity(2);
        let out = apply_kraus_map(&[], &rho).unwrap();
        assert!(out.approx_eq(&Operator::zeros(2), 0.0));
    }

    #[test]
    fn test_apply_kraus_dimension_mismatch() {
        let rho = Operator::identity(2);
        let k = Operator::identity(4);
        assert!(matches!(
            apply_kraus_map(&[k], &rho),
            Err(ChannelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_extended_operators_block_diagonal() {
        let x = Operator::new(array![[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]])
            .unwrap();
        let ext = extended_choi_operators(std::slice::from_ref(&x));
        assert_eq!(ext.len(), 1);
        let e = &ext[0];
        assert_eq!(e.dim(), 4);
        assert_eq!(e.get(0, 1), Some(c(1.0, 0.0)));
        assert_eq!(e.get(2, 3), Some(c(1.0, 0.0)));
        assert_eq!(e.get(0, 3), Some(c(0.0, 0.0)));
    }

    #[test]
    fn test_trace_distance_orthogonal_states() {
        let a = DensityMatrix::from_diagonal(&[1.0, 0.0]).unwrap();
        let b = DensityMatrix::from_diagonal(&[0.0, 1.0]).unwrap();
        assert!((trace_distance(&a, &b).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_trace_distance_diagonal_states() {
        let a = DensityMatrix::from_diagonal(&[0.5, 0.5]).unwrap();
        let b = DensityMatrix::from_diagonal(&[0.8, 0.2]).unwrap();
        assert!((trace_distance(&a, &b).unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&TraceNormPolicy::default()).unwrap();
        assert_eq!(json, r#"{"mode":"strict","tolerance":1e-9}"#);
        let relaxed: TraceNormPolicy = serde_json::from_str(r#"{"mode":"relaxed"}"#).unwrap();
        assert_eq!(relaxed, TraceNormPolicy::Relaxed);
    }
}

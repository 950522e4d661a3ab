//! Density matrices.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ChannelError, ChannelResult};
use crate::linalg;
use crate::operator::Operator;

/// Density matrix of a quantum state.
///
/// Construction does not validate; call [`DensityMatrix::validate`] when
/// the data comes from an untrusted source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DensityMatrix(Operator);

impl DensityMatrix {
    /// Wrap an operator.
    pub fn new(op: Operator) -> Self {
        Self(op)
    }

    /// Diagonal (classical) state with the given populations.
    pub fn from_diagonal(populations: &[f64]) -> ChannelResult<Self> {
        Operator::from_diagonal(populations).map(Self)
    }

    /// Pure state `|ψ⟩⟨ψ|` of a (not necessarily normalised) amplitude
    /// vector; the result is normalised.
    pub fn pure(amplitudes: &[Complex64]) -> ChannelResult<Self> {
        let n = amplitudes.len();
        let norm_sq: f64 = amplitudes.iter().map(Complex64::norm_sqr).sum();
        if n == 0 || norm_sq == 0.0 {
            return Err(ChannelError::NotSquare { rows: n, cols: n });
        }
        let data = ndarray::Array2::from_shape_fn((n, n), |(i, j)| {
            amplitudes[i] * amplitudes[j].conj() / norm_sq
        });
        Operator::new(data).map(Self)
    }

    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.0.dim()
    }

    /// Borrow the matrix.
    pub fn as_operator(&self) -> &Operator {
        &self.0
    }

    /// Consume into the matrix.
    pub fn into_operator(self) -> Operator {
        self.0
    }

    /// Check Hermiticity, unit trace and positivity within `tol`.
    pub fn validate(&self, tol: f64) -> ChannelResult<()> {
        let tr = self.0.trace();
        if (tr.re - 1.0).abs() > tol || tr.im.abs() > tol {
            return Err(ChannelError::InvalidTrace(tr.re));
        }

        let dev = self.0.hermitian_deviation();
        if dev > tol {
            return Err(ChannelError::NotHermitian(dev));
        }

        let eig = linalg::hermitian_eigen(self.0.as_array())?;
        let min_ev = eig.values.iter().copied().fold(f64::INFINITY, f64::min);
        if min_ev < -tol {
            return Err(ChannelError::NotPositive(min_ev));
        }
        Ok(())
    }
}

impl From<Operator> for DensityMatrix {
    fn from(op: Operator) -> Self {
        Self(op)
    }
}

//! Square complex matrix value type.
//!
//! Every matrix handled by mnemo is square. [`Operator`] checks that once at
//! construction so the rest of the crate can assume it, and every binary
//! operation checks that both operands have the same dimension.

use ndarray::{Array2, linalg::kron};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ChannelError, ChannelResult};

/// A square, non-empty complex matrix.
///
/// Serialised as a list of rows, each row a list of `[re, im]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Complex64>>", into = "Vec<Vec<Complex64>>")]
pub struct Operator {
    data: Array2<Complex64>,
}

impl Operator {
    /// Wrap a matrix, rejecting empty or non-square input.
    pub fn new(data: Array2<Complex64>) -> ChannelResult<Self> {
        let (rows, cols) = data.dim();
        if rows == 0 || rows != cols {
            return Err(ChannelError::NotSquare { rows, cols });
        }
        Ok(Self { data })
    }

    /// Build from row vectors.
    pub fn from_rows(rows: Vec<Vec<Complex64>>) -> ChannelResult<Self> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != n) {
            return Err(ChannelError::NotSquare {
                rows: n,
                cols: bad.len(),
            });
        }
        let flat: Vec<Complex64> = rows.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((n, n), flat).map_err(|_| ChannelError::NotSquare {
            rows: n,
            cols: n,
        })?;
        Self::new(data)
    }

    /// Diagonal matrix with the given real entries.
    pub fn from_diagonal(diag: &[f64]) -> ChannelResult<Self> {
        let n = diag.len();
        let mut data = Array2::zeros((n, n));
        for (i, &d) in diag.iter().enumerate() {
            data[[i, i]] = Complex64::new(d, 0.0);
        }
        Self::new(data)
    }

    /// Wrap an array already known to be square.
    pub(crate) fn from_square(data: Array2<Complex64>) -> Self {
        debug_assert!(data.is_square() && !data.is_empty());
        Self { data }
    }

    /// `dim × dim` identity.
    pub fn identity(dim: usize) -> Self {
        Self::from_square(Array2::eye(dim))
    }

    /// `dim × dim` zero matrix.
    pub fn zeros(dim: usize) -> Self {
        Self::from_square(Array2::zeros((dim, dim)))
    }

    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.data.nrows()
    }

    /// Number of qubits if the dimension is a power of two.
    pub fn num_qubits(&self) -> ChannelResult<u32> {
        qubits_for_dim(self.dim())
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array2<Complex64> {
        &self.data
    }

    /// Consume into the underlying array.
    pub fn into_array(self) -> Array2<Complex64> {
        self.data
    }

    /// Element access.
    pub fn get(&self, row: usize, col: usize) -> Option<Complex64> {
        self.data.get([row, col]).copied()
    }

    fn check_same_dim(&self, other: &Self) -> ChannelResult<()> {
        if self.dim() != other.dim() {
            return Err(ChannelError::DimensionMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        Ok(())
    }

    /// Matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &Self) -> ChannelResult<Self> {
        self.check_same_dim(rhs)?;
        Ok(Self::from_square(self.data.dot(&rhs.data)))
    }

    /// Element-wise sum.
    pub fn add(&self, rhs: &Self) -> ChannelResult<Self> {
        self.check_same_dim(rhs)?;
        Ok(Self::from_square(&self.data + &rhs.data))
    }

    /// Element-wise difference `self − rhs`.
    pub fn sub(&self, rhs: &Self) -> ChannelResult<Self> {
        self.check_same_dim(rhs)?;
        Ok(Self::from_square(&self.data - &rhs.data))
    }

    /// Multiply every entry by a real scalar.
    pub fn scale(&self, factor: f64) -> Self {
        Self::from_square(self.data.mapv(|z| z * factor))
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        Self::from_square(self.data.t().mapv(|z| z.conj()))
    }

    /// Entry-wise complex conjugate.
    pub fn conj(&self) -> Self {
        Self::from_square(self.data.mapv(|z| z.conj()))
    }

    /// Kronecker product `self ⊗ rhs`.
    pub fn kron(&self, rhs: &Self) -> Self {
        Self::from_square(kron(&self.data, &rhs.data))
    }

    /// Sum of diagonal entries.
    pub fn trace(&self) -> Complex64 {
        self.data.diag().sum()
    }

    /// Largest entry-wise modulus of `self − other`.
    pub fn max_abs_diff(&self, other: &Self) -> ChannelResult<f64> {
        self.check_same_dim(other)?;
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max))
    }

    /// True if both matrices agree entry-wise within `tol`.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.max_abs_diff(other).is_ok_and(|d| d <= tol)
    }

    /// Largest entry-wise modulus.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().map(|z| z.norm()).fold(0.0, f64::max)
    }

    /// True if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|z| z.re.is_finite() && z.im.is_finite())
    }

    /// Largest deviation from Hermiticity, `max |A − A†|`.
    pub fn hermitian_deviation(&self) -> f64 {
        let n = self.dim();
        let mut worst = 0.0_f64;
        for i in 0..n {
            for j in i..n {
                worst = worst.max((self.data[[i, j]] - self.data[[j, i]].conj()).norm());
            }
        }
        worst
    }
}

impl TryFrom<Vec<Vec<Complex64>>> for Operator {
    type Error = ChannelError;

    fn try_from(rows: Vec<Vec<Complex64>>) -> ChannelResult<Self> {
        Self::from_rows(rows)
    }
}

impl From<Operator> for Vec<Vec<Complex64>> {
    fn from(op: Operator) -> Self {
        op.data.rows().into_iter().map(|r| r.to_vec()).collect()
    }
}

/// Number of qubits `n` such that `dim == 2^n`.
pub fn qubits_for_dim(dim: usize) -> ChannelResult<u32> {
    if dim == 0 || !dim.is_power_of_two() {
        return Err(ChannelError::NotQubitDimension(dim));
    }
    Ok(dim.trailing_zeros())
}

//! Choi and superoperator representations of a quantum channel.
//!
//! Both representations of a q-qubit channel are `4^q × 4^q` matrices, so
//! nothing in the raw data tells them apart. They are separate types here;
//! converting between them is an explicit, exact reshuffle.
//!
//! Conventions (input dimension `d = 2^q`):
//!
//! - vectorisation stacks columns: `vec(ρ)[c·d + r] = ρ[r, c]`
//! - superoperator: `vec(E(ρ)) = S · vec(ρ)`
//! - Choi matrix: `Λ = Σ_ij |i⟩⟨j| ⊗ E(|i⟩⟨j|)`, unnormalised, trace `d` for
//!   a trace-preserving map
//!
//! so that `S[b·d + a, j·d + i] = Λ[i·d + a, j·d + b] = E(|i⟩⟨j|)[a, b]`.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ChannelError, ChannelResult};
use crate::linalg;
use crate::operator::Operator;
use crate::state::DensityMatrix;

/// Number of qubits `q` such that `dim == 4^q`, `q >= 1`.
pub fn qubits_for_channel_dim(dim: usize) -> ChannelResult<u32> {
    let bits = crate::operator::qubits_for_dim(dim)
        .map_err(|_| ChannelError::InvalidChannelDimension(dim))?;
    if bits == 0 || bits % 2 != 0 {
        return Err(ChannelError::InvalidChannelDimension(dim));
    }
    Ok(bits / 2)
}

/// Map `Λ[i·d + a, j·d + b] → S[b·d + a, j·d + i]`.
fn choi_to_superop_data(choi: &Array2<Complex64>, d: usize) -> Array2<Complex64> {
    let mut out = Array2::zeros(choi.dim());
    for i in 0..d {
        for j in 0..d {
            for a in 0..d {
                for b in 0..d {
                    out[[b * d + a, j * d + i]] = choi[[i * d + a, j * d + b]];
                }
            }
        }
    }
    out
}

/// Inverse of [`choi_to_superop_data`].
fn superop_to_choi_data(superop: &Array2<Complex64>, d: usize) -> Array2<Complex64> {
    let mut out = Array2::zeros(superop.dim());
    for i in 0..d {
        for j in 0..d {
            for a in 0..d {
                for b in 0..d {
                    out[[i * d + a, j * d + b]] = superop[[b * d + a, j * d + i]];
                }
            }
        }
    }
    out
}

/// Choi matrix of a q-qubit channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Operator", into = "Operator")]
pub struct Choi {
    matrix: Operator,
    num_qubits: u32,
}

impl Choi {
    /// Wrap a `4^q × 4^q` matrix as a Choi matrix.
    pub fn new(matrix: Operator) -> ChannelResult<Self> {
        let num_qubits = qubits_for_channel_dim(matrix.dim())?;
        Ok(Self { matrix, num_qubits })
    }

    /// Choi matrix of the identity channel on `num_qubits` qubits.
    pub fn identity(num_qubits: u32) -> Self {
        SuperOp::identity(num_qubits).to_choi()
    }

    /// Number of qubits the channel acts on.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Input (and output) Hilbert space dimension, `2^q`.
    pub fn input_dim(&self) -> usize {
        1 << self.num_qubits
    }

    /// Borrow the matrix.
    pub fn as_operator(&self) -> &Operator {
        &self.matrix
    }

    /// Consume into the matrix.
    pub fn into_operator(self) -> Operator {
        self.matrix
    }

    /// Choi matrix divided by the input dimension (trace 1 for a
    /// trace-preserving map).
    pub fn normalized(&self) -> Operator {
        self.matrix.scale(1.0 / self.input_dim() as f64)
    }

    /// Equivalent superoperator.
    pub fn to_superop(&self) -> SuperOp {
        let data = choi_to_superop_data(self.matrix.as_array(), self.input_dim());
        SuperOp {
            matrix: Operator::from_square(data),
            num_qubits: self.num_qubits,
        }
    }
}

impl TryFrom<Operator> for Choi {
    type Error = ChannelError;

    fn try_from(matrix: Operator) -> ChannelResult<Self> {
        Self::new(matrix)
    }
}

impl From<Choi> for Operator {
    fn from(choi: Choi) -> Self {
        choi.matrix
    }
}

/// Superoperator of a q-qubit channel, acting on column-stacked density
/// matrices. Composition of channels is matrix multiplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Operator", into = "Operator")]
pub struct SuperOp {
    matrix: Operator,
    num_qubits: u32,
}

impl SuperOp {
    /// Wrap a `4^q × 4^q` matrix as a superoperator.
    pub fn new(matrix: Operator) -> ChannelResult<Self> {
        let num_qubits = qubits_for_channel_dim(matrix.dim())?;
        Ok(Self { matrix, num_qubits })
    }

    /// The identity channel on `num_qubits` qubits.
    pub fn identity(num_qubits: u32) -> Self {
        Self {
            matrix: Operator::identity(1 << (2 * num_qubits)),
            num_qubits,
        }
    }

    /// Number of qubits the channel acts on.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Matrix dimension, `4^q`.
    pub fn dim(&self) -> usize {
        self.matrix.dim()
    }

    /// Borrow the matrix.
    pub fn as_operator(&self) -> &Operator {
        &self.matrix
    }

    /// Consume into the matrix.
    pub fn into_operator(self) -> Operator {
        self.matrix
    }

    /// Equivalent Choi matrix.
    pub fn to_choi(&self) -> Choi {
        let data = superop_to_choi_data(self.matrix.as_array(), 1 << self.num_qubits);
        Choi {
            matrix: Operator::from_square(data),
            num_qubits: self.num_qubits,
        }
    }

    fn check_same_qubits(&self, other: &Self) -> ChannelResult<()> {
        if self.num_qubits != other.num_qubits {
            return Err(ChannelError::DimensionMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        Ok(())
    }

    /// Matrix product `self · rhs`: the channel that applies `rhs` first,
    /// then `self`.
    pub fn matmul(&self, rhs: &Self) -> ChannelResult<Self> {
        self.check_same_qubits(rhs)?;
        Ok(Self {
            matrix: self.matrix.matmul(&rhs.matrix)?,
            num_qubits: self.num_qubits,
        })
    }

    /// The channel that applies `self` first, then `next`.
    pub fn then(&self, next: &Self) -> ChannelResult<Self> {
        next.matmul(self)
    }

    /// Moore–Penrose pseudo-inverse with relative cutoff `rcond`.
    pub fn pseudo_inverse(&self, rcond: f64) -> ChannelResult<Self> {
        let data = linalg::pseudo_inverse(self.matrix.as_array(), rcond)?;
        Ok(Self {
            matrix: Operator::from_square(data),
            num_qubits: self.num_qubits,
        })
    }

    /// Apply the channel to a density matrix.
    pub fn apply(&self, rho: &DensityMatrix) -> ChannelResult<DensityMatrix> {
        let d = 1usize << self.num_qubits;
        if rho.dim() != d {
            return Err(ChannelError::DimensionMismatch {
                expected: d,
                actual: rho.dim(),
            });
        }
        let r = rho.as_operator().as_array();
        let vec_rho = ndarray::Array1::from_shape_fn(d * d, |k| r[[k % d, k / d]]);
        let out = self.matrix.as_array().dot(&vec_rho);
        let data = Array2::from_shape_fn((d, d), |(row, col)| out[col * d + row]);
        Ok(DensityMatrix::new(Operator::from_square(data)))
    }
}

impl TryFrom<Operator> for SuperOp {
    type Error = ChannelError;

    fn try_from(matrix: Operator) -> ChannelResult<Self> {
        Self::new(matrix)
    }
}

impl From<SuperOp> for Operator {
    fn from(superop: SuperOp) -> Self {
        superop.matrix
    }
}

impl From<&Choi> for SuperOp {
    fn from(choi: &Choi) -> Self {
        choi.to_superop()
    }
}

impl From<&SuperOp> for Choi {
    fn from(superop: &SuperOp) -> Self {
        superop.to_choi()
    }
}

/// A channel in whichever representation it was produced in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rep", content = "data", rename_all = "snake_case")]
pub enum Channel {
    /// Choi representation.
    Choi(Choi),
    /// Superoperator representation.
    SuperOp(SuperOp),
}

impl Channel {
    /// Number of qubits the channel acts on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            Channel::Choi(c) => c.num_qubits(),
            Channel::SuperOp(s) => s.num_qubits(),
        }
    }

    /// The channel as a superoperator, converting if necessary.
    pub fn to_superop(&self) -> SuperOp {
        match self {
            Channel::Choi(c) => c.to_superop(),
            Channel::SuperOp(s) => s.clone(),
        }
    }

    /// The channel as a Choi matrix, converting if necessary.
    pub fn to_choi(&self) -> Choi {
        match self {
            Channel::Choi(c) => c.clone(),
            Channel::SuperOp(s) => s.to_choi(),
        }
    }

    /// The superoperator, if that is the stored form.
    pub fn as_superop(&self) -> Option<&SuperOp> {
        match self {
            Channel::SuperOp(s) => Some(s),
            Channel::Choi(_) => None,
        }
    }

    /// The Choi matrix, if that is the stored form.
    pub fn as_choi(&self) -> Option<&Choi> {
        match self {
            Channel::Choi(c) => Some(c),
            Channel::SuperOp(_) => None,
        }
    }
}

impl From<Choi> for Channel {
    fn from(c: Choi) -> Self {
        Channel::Choi(c)
    }
}

impl From<SuperOp> for Channel {
    fn from(s: SuperOp) -> Self {
        Channel::SuperOp(s)
    }
}

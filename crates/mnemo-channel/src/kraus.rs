//! Kraus representation of a quantum channel.

use serde::{Deserialize, Serialize};

use crate::channel::{Choi, SuperOp};
use crate::error::{ChannelError, ChannelResult};
use crate::matrix::{apply_kraus_map, extended_choi_operators};
use crate::operator::{Operator, qubits_for_dim};

/// A channel `ρ ↦ Σ_i K_i ρ K_i†`.
///
/// Holds at least one operator, all of the same dimension. Trace
/// preservation (`Σ K_i† K_i = I`) is assumed by callers but not enforced;
/// see [`KrausMap::is_trace_preserving`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Operator>", into = "Vec<Operator>")]
pub struct KrausMap {
    operators: Vec<Operator>,
}

impl KrausMap {
    /// Build from operators, checking they are non-empty and equally sized.
    pub fn new(operators: Vec<Operator>) -> ChannelResult<Self> {
        let first = operators.first().ok_or(ChannelError::EmptyKrausMap)?;
        let dim = first.dim();
        if let Some(bad) = operators.iter().find(|k| k.dim() != dim) {
            return Err(ChannelError::DimensionMismatch {
                expected: dim,
                actual: bad.dim(),
            });
        }
        Ok(Self { operators })
    }

    /// Single-operator map `{U}`.
    pub fn unitary(u: Operator) -> Self {
        Self { operators: vec![u] }
    }

    /// Identity channel `{I}` on `num_qubits` qubits.
    pub fn identity(num_qubits: u32) -> Self {
        Self::unitary(Operator::identity(1 << num_qubits))
    }

    /// The Kraus operators.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Number of operators.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Always false; a Kraus map holds at least one operator.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Dimension of the system the map acts on.
    pub fn dim(&self) -> usize {
        self.operators[0].dim()
    }

    /// True if `Σ K_i† K_i` equals the identity within `tol`.
    pub fn is_trace_preserving(&self, tol: f64) -> bool {
        let dim = self.dim();
        let sum = self
            .operators
            .iter()
            .try_fold(Operator::zeros(dim), |acc, k| acc.add(&k.adjoint().matmul(k)?));
        sum.is_ok_and(|s| s.approx_eq(&Operator::identity(dim), tol))
    }

    /// Apply the map to a matrix.
    pub fn apply(&self, rho: &Operator) -> ChannelResult<Operator> {
        apply_kraus_map(&self.operators, rho)
    }

    /// `{I₂ ⊗ K_i}`: the same map acting on the lower half of a register
    /// with one extra auxiliary qubit.
    pub fn extended(&self) -> Self {
        Self {
            operators: extended_choi_operators(&self.operators),
        }
    }

    /// Superoperator `Σ_i conj(K_i) ⊗ K_i`.
    pub fn to_superop(&self) -> ChannelResult<SuperOp> {
        qubits_for_dim(self.dim())?;
        let dim = self.dim();
        let data = self
            .operators
            .iter()
            .fold(Operator::zeros(dim * dim), |acc, k| {
                // operands have equal dimension by construction
                Operator::from_square(acc.as_array() + k.conj().kron(k).as_array())
            });
        SuperOp::new(data)
    }

    /// Choi matrix of the map.
    pub fn to_choi(&self) -> ChannelResult<Choi> {
        Ok(self.to_superop()?.to_choi())
    }
}

impl TryFrom<Vec<Operator>> for KrausMap {
    type Error = ChannelError;

    fn try_from(operators: Vec<Operator>) -> ChannelResult<Self> {
        Self::new(operators)
    }
}

impl From<KrausMap> for Vec<Operator> {
    fn from(map: KrausMap) -> Self {
        map.operators
    }
}

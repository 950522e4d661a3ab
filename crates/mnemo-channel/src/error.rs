//! Error types for the channel crate.

use thiserror::Error;

/// Errors produced by matrix and channel operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChannelError {
    /// Matrix is empty or not square.
    #[error("matrix must be square and non-empty, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Two operands have incompatible dimensions.
    #[error("dimension mismatch: expected {expected}x{expected}, got {actual}x{actual}")]
    DimensionMismatch {
        /// Dimension required by the operation.
        expected: usize,
        /// Dimension that was supplied.
        actual: usize,
    },

    /// Dimension is not 2^n, so it cannot describe a register of qubits.
    #[error("dimension {0} is not a power of two")]
    NotQubitDimension(usize),

    /// Register of this many qubits has no addressable `2^n × 2^n` matrix.
    #[error("{0} qubits exceed the addressable matrix size")]
    TooManyQubits(u32),

    /// Dimension is not 4^q, so it cannot hold a Choi matrix or superoperator.
    #[error("dimension {0} is not a channel dimension (expected 4^q with q >= 1)")]
    InvalidChannelDimension(usize),

    /// A Kraus map needs at least one operator.
    #[error("Kraus map has no operators")]
    EmptyKrausMap,

    /// Input contains NaN or infinite entries.
    #[error("matrix contains non-finite entries")]
    NonFinite,

    /// Strict trace norm: the eigenbasis of M·M† does not reproduce it.
    #[error(
        "M·M† is not diagonalizable within tolerance {tolerance:e} \
         (reconstruction residual {residual:e})"
    )]
    NotDiagonalizable {
        /// Max-entry residual of V·Λ·V† − M·M†.
        residual: f64,
        /// Tolerance that was exceeded.
        tolerance: f64,
    },

    /// Density matrix is not Hermitian.
    #[error("not Hermitian (max deviation {0:e})")]
    NotHermitian(f64),

    /// Density matrix trace differs from 1.
    #[error("trace is not 1 (got {0})")]
    InvalidTrace(f64),

    /// Density matrix has a negative eigenvalue.
    #[error("not positive semi-definite (min eigenvalue {0:e})")]
    NotPositive(f64),

    /// A time-ordered sequence needs at least one entry.
    #[error("timeline is empty")]
    EmptyTimeline,

    /// Timeline entries must have finite, strictly increasing times.
    #[error("timeline entry {index} at t={current} does not follow t={previous}")]
    NonMonotonicTime {
        /// Index of the offending entry.
        index: usize,
        /// Time of the previous entry.
        previous: f64,
        /// Time of the offending entry.
        current: f64,
    },

    /// Dense decomposition backend reported a failure.
    #[error("decomposition failed: {0}")]
    Decomposition(String),
}

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

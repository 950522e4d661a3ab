//! Error types for the non-Markovianity crate.

use thiserror::Error;

/// Errors produced by intermediate-map computation and the measures.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NmError {
    /// A measure was given no maps or states.
    #[error("{0} sequence is empty")]
    EmptySequence(&'static str),

    /// Maps in one sequence act on different numbers of qubits.
    #[error("entry {index} acts on {actual} qubits, expected {expected}")]
    QubitMismatch {
        /// Position of the offending entry.
        index: usize,
        /// Qubit count of the first entry.
        expected: u32,
        /// Qubit count of the offending entry.
        actual: u32,
    },

    /// Base circuit duration must be positive and finite.
    #[error("base circuit time must be positive and finite, got {0}")]
    InvalidCircuitTime(f64),

    /// Summed divisibility terms cannot be mapped onto `[0, 1)`.
    #[error("divisibility total {0} is not finite or is <= -1; maps may not preserve trace")]
    DegenerateTotal(f64),

    /// Time step must be positive and finite.
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    /// Configuration file could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Channel or matrix error.
    #[error("Channel error: {0}")]
    Channel(#[from] mnemo_channel::ChannelError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for non-Markovianity operations.
pub type NmResult<T> = Result<T, NmError>;

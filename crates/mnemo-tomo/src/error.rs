//! Error types for the tomography crate.

use thiserror::Error;

/// Errors produced while reading tomography results or planning batches.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TomoError {
    /// The batch has no child results.
    #[error("batch result has no child experiments")]
    EmptyBatch,

    /// A child result carries no analysis rows (missing or failed tomography).
    #[error("child experiment {index} ('{experiment_id}') has no analysis result")]
    MissingAnalysisValue {
        /// Position of the child in submission order.
        index: usize,
        /// Identifier of the child experiment.
        experiment_id: String,
    },

    /// The first-ranked analysis value of a child is not a channel matrix.
    #[error("child experiment {index}: first analysis value is a {kind}, expected a Choi matrix")]
    UnexpectedValue {
        /// Position of the child in submission order.
        index: usize,
        /// Kind of value that was found.
        kind: &'static str,
    },

    /// A child is itself a composite result; flatten the batch first.
    #[error("child {index} is a composite result; flatten the batch before extraction")]
    NestedComposite {
        /// Position of the child in submission order.
        index: usize,
    },

    /// A child lacks the repetition count needed to place it in time.
    #[error("child experiment {index} has no repetition count; cannot assign an elapsed time")]
    MissingRepetitions {
        /// Position of the child in submission order.
        index: usize,
    },

    /// Base circuit duration must be positive and finite.
    #[error("base circuit time must be positive and finite, got {0}")]
    InvalidCircuitTime(f64),

    /// Experiment layout request cannot be satisfied.
    #[error("invalid experiment plan: {0}")]
    InvalidPlan(String),

    /// More experiments requested than qubit partitions available.
    #[error("{required} experiments requested but only {available} qubit partitions available")]
    NotEnoughPartitions {
        /// Number of experiments requested.
        required: usize,
        /// Number of partitions the device provides.
        available: usize,
    },

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

/// Result type for tomography operations.
pub type TomoResult<T> = Result<T, TomoError>;

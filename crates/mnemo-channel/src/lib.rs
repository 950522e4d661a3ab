//! `mnemo-channel`: quantum channel representations and matrix utilities.
//!
//! Provides the numeric layer under mnemo's non-Markovianity pipeline:
//!
//! - [`Operator`]: a square complex matrix with dimension-checked construction
//! - [`Choi`] and [`SuperOp`]: the two `4^q × 4^q` channel representations,
//!   kept as distinct types with exact conversions between them
//! - [`KrausMap`] and [`DensityMatrix`]
//! - [`Timeline`]: time-ordered values with explicit elapsed times
//! - matrix utilities: [`trace_norm`], [`trace_distance`],
//!   [`apply_kraus_map`], [`extended_choi_operators`],
//!   [`maximally_entangled_density_matrix`]
//! - [`linalg`]: SVD, pseudo-inverse and Hermitian eigensolver (via `faer`)
//!
//! # Quick start
//!
//! ```rust
//! use mnemo_channel::{KrausMap, TraceNormPolicy, trace_norm};
//!
//! let identity = KrausMap::identity(1);
//! let superop = identity.to_superop().unwrap();
//! let choi = superop.to_choi();
//!
//! // A trace-preserving map has a normalised Choi matrix of trace norm 1.
//! let norm = trace_norm(&choi.normalized(), TraceNormPolicy::default()).unwrap();
//! assert!((norm - 1.0).abs() < 1e-9);
//! ```

pub mod channel;
pub mod error;
pub mod kraus;
pub mod linalg;
pub mod matrix;
pub mod operator;
pub mod state;
pub mod timeline;

pub use channel::{Channel, Choi, SuperOp, qubits_for_channel_dim};
pub use error::{ChannelError, ChannelResult};
pub use kraus::KrausMap;
pub use matrix::{
    TraceNormPolicy, apply_kraus_map, extended_choi_operators, maximally_entangled_density_matrix,
    qubit_dim, trace_distance, trace_norm,
};
pub use operator::Operator;
pub use state::DensityMatrix;
pub use timeline::{Timed, Timeline};

pub use num_complex::Complex64;

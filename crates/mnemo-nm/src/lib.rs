//! `mnemo-nm`: non-Markovianity of a channel's time evolution.
//!
//! Starting from snapshots of an evolving channel, this crate computes the
//! intermediate maps between consecutive snapshots and quantifies how far
//! the evolution is from Markovian:
//!
//! - [`compute_intermediate_maps`]: `M_i = S_i · (S_0⁺ ⋯ S_{i-1}⁺)`
//! - [`first_non_markovianity_measure`]: divisibility of Kraus maps probed
//!   with a maximally entangled state
//! - [`second_non_markovian_measure`]: trace-distance revivals per basis
//! - [`compute_drhp`]: Rivas–Huelga–Plenio measure on intermediate maps
//! - [`analyze`]: intermediate maps and D_RHP in one [`NmReport`]
//!
//! # Example
//!
//! ```rust
//! use mnemo_channel::{SuperOp, Timeline, TraceNormPolicy};
//! use mnemo_nm::{compute_drhp, compute_intermediate_maps};
//!
//! let snapshots = Timeline::uniform(0.0, 90.0, vec![SuperOp::identity(1); 3]).unwrap();
//! let maps = compute_intermediate_maps(&snapshots, 1e-15).unwrap();
//! let d = compute_drhp(&maps, 90.0, TraceNormPolicy::default()).unwrap();
//! assert!(d.abs() < 1e-12);
//! ```

pub mod config;
pub mod distinguishability;
pub mod divisibility;
pub mod error;
pub mod intermediate;
pub mod report;

pub use config::{AnalysisConfig, DEFAULT_BASE_CIRCUIT_TIME, ExportConfig};
pub use distinguishability::{
    Basis, BasisStates, StatePair, basis_witnesses, second_non_markovian_measure,
};
pub use divisibility::{
    DeltaTScaling, compute_drhp, divisibility_terms, first_non_markovianity_measure,
};
pub use error::{NmError, NmResult};
pub use intermediate::compute_intermediate_maps;
pub use report::{NmReport, SCHEMA_VERSION, StepReport, analyze, to_file, to_json};

//! `mnemo-tomo`: process-tomography batches.
//!
//! The input boundary of the mnemo pipeline:
//!
//! - [`result`]: completed batch/parallel result trees with ranked analysis
//!   tables, loadable from JSON
//! - [`extract`]: one channel per child experiment, in submission order,
//!   optionally tagged with elapsed time
//! - [`plan`]: which qubits and how many base-circuit repetitions each
//!   tomography experiment uses, grouped into parallel jobs
//!
//! # Example
//!
//! ```rust
//! use mnemo_channel::Choi;
//! use mnemo_tomo::{AnalysisResult, AnalysisValue, CompositeResult, ExperimentResult};
//! use mnemo_tomo::extract::extract_timeline;
//!
//! let batch = (0..3).fold(CompositeResult::new("qpt"), |b, i| {
//!     b.with_experiment(
//!         ExperimentResult::new(format!("qpt-{i}"))
//!             .with_repetitions(i)
//!             .with_analysis(AnalysisResult::new("state", AnalysisValue::Choi(Choi::identity(1)))),
//!     )
//! });
//!
//! let timeline = extract_timeline(&batch, 90.0).unwrap();
//! assert_eq!(timeline.times(), vec![0.0, 90.0, 180.0]);
//! ```

pub mod error;
pub mod extract;
pub mod plan;
pub mod result;

pub use error::{TomoError, TomoResult};
pub use extract::{
    extract_channel, extract_choi_matrices, extract_superoperators, extract_timeline,
};
pub use plan::{BatchPlan, ParallelGroup, PlanConfig, TomographyExperiment, qubit_partitions};
pub use result::{AnalysisResult, AnalysisValue, CompositeResult, ExperimentData, ExperimentResult};

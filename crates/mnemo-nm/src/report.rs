//! Analysis report: runs the pipeline on a snapshot timeline and collects
//! everything needed to interpret and reproduce the result.

use std::path::Path;

use chrono::{DateTime, Utc};
use mnemo_channel::{SuperOp, Timeline};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{AnalysisConfig, ExportConfig};
use crate::divisibility::{divisibility_terms, normalize};
use crate::error::{NmError, NmResult};
use crate::intermediate::compute_intermediate_maps;

/// Output format version.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// One time step of the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Elapsed time of the snapshot.
    pub time: f64,
    /// Divisibility term of the intermediate map at this step.
    pub g: f64,
}

/// Result of [`analyze`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NmReport {
    /// Schema version for forward compatibility.
    pub schema_version: String,
    /// Crate version that produced the report.
    pub mnemo_version: String,
    /// Timestamp of the analysis.
    pub timestamp: DateTime<Utc>,
    /// Qubits the channel acts on.
    pub num_qubits: u32,
    /// Rivas–Huelga–Plenio measure in `[0, 1)`.
    pub drhp: f64,
    /// Sum of the divisibility terms.
    pub total: f64,
    /// Per-step terms in time order.
    pub steps: Vec<StepReport>,
    /// Settings used.
    pub config: AnalysisConfig,
}

impl NmReport {
    /// Whether any step violates divisibility by more than `tol`.
    pub fn is_non_markovian(&self, tol: f64) -> bool {
        self.steps.iter().any(|s| s.g > tol)
    }
}

/// Intermediate maps, then the RHP measure, of a snapshot timeline.
pub fn analyze(timeline: &Timeline<SuperOp>, config: &AnalysisConfig) -> NmResult<NmReport> {
    let num_qubits = timeline.first().value.num_qubits();
    let maps = compute_intermediate_maps(timeline, config.pinv_rcond)?;
    let terms = divisibility_terms(&maps, config.base_circuit_time, config.trace_norm)?;

    let total: f64 = terms.iter().sum();
    let drhp = normalize(total)?;
    info!(steps = terms.len(), drhp, "analysis complete");

    let steps = maps
        .times()
        .into_iter()
        .zip(terms)
        .map(|(time, g)| StepReport { time, g })
        .collect();

    Ok(NmReport {
        schema_version: SCHEMA_VERSION.into(),
        mnemo_version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        num_qubits,
        drhp,
        total,
        steps,
        config: config.clone(),
    })
}

/// Export a report to a JSON string.
pub fn to_json(report: &NmReport, config: &ExportConfig) -> NmResult<String> {
    if config.pretty {
        serde_json::to_string_pretty(report).map_err(NmError::from)
    } else {
        serde_json::to_string(report).map_err(NmError::from)
    }
}

/// Export a report to a JSON file.
pub fn to_file(report: &NmReport, path: &Path, config: &ExportConfig) -> NmResult<()> {
    let json = to_json(report, config)?;
    std::fs::write(path, json)
        .map_err(|e| NmError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_identity() {
        let tl = Timeline::uniform(0.0, 90.0, vec![SuperOp::identity(1); 3]).unwrap();
        let report = analyze(&tl, &AnalysisConfig::default()).unwrap();
        assert_eq!(report.num_qubits, 1);
        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.steps[2].time, 180.0);
        assert!(report.drhp.abs() < 1e-12);
        assert!(!report.is_non_markovian(1e-9));
        assert_eq!(report.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_compact_json() {
        let tl = Timeline::uniform(0.0, 90.0, vec![SuperOp::identity(1)]).unwrap();
        let report = analyze(&tl, &AnalysisConfig::default()).unwrap();
        let json = to_json(&report, &ExportConfig { pretty: false }).unwrap();
        assert!(!json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["config"]["base_circuit_time"], 90.0);
        assert_eq!(value["steps"][0]["time"], 0.0);
    }

    #[test]
    fn test_analyze_rejects_vanishing_channel() {
        // g = -1 at T = 1 puts the total on the pole of G / (G + 1)
        let zero = SuperOp::new(mnemo_channel::Operator::zeros(4)).unwrap();
        let tl = Timeline::uniform(0.0, 1.0, vec![zero]).unwrap();
        let config = AnalysisConfig {
            base_circuit_time: 1.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            analyze(&tl, &config),
            Err(NmError::DegenerateTotal(_))
        ));
    }
}

//! Analysis configuration.
//!
//! Read from YAML or JSON. Every field has a default, so a config file only
//! needs the values it changes:
//!
//! ```yaml
//! base_circuit_time: 120.0
//! trace_norm:
//!   mode: relaxed
//! export:
//!   pretty: false
//! ```

use std::path::Path;

use mnemo_channel::TraceNormPolicy;
use mnemo_channel::linalg::DEFAULT_RCOND;
use serde::{Deserialize, Serialize};

use crate::divisibility::DeltaTScaling;
use crate::error::{NmError, NmResult};

/// Default duration of one base-circuit repetition.
pub const DEFAULT_BASE_CIRCUIT_TIME: f64 = 90.0;

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Settings of a non-Markovianity analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Trace norm evaluation.
    pub trace_norm: TraceNormPolicy,
    /// Relative singular-value cutoff of the pseudo-inverse.
    pub pinv_rcond: f64,
    /// Duration of one base-circuit repetition.
    pub base_circuit_time: f64,
    /// Weighting of divisibility terms in the first measure.
    pub delta_t_scaling: DeltaTScaling,
    /// Report export settings.
    pub export: ExportConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trace_norm: TraceNormPolicy::default(),
            pinv_rcond: DEFAULT_RCOND,
            base_circuit_time: DEFAULT_BASE_CIRCUIT_TIME,
            delta_t_scaling: DeltaTScaling::default(),
            export: ExportConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse from YAML.
    pub fn from_yaml(yaml: &str) -> NmResult<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| NmError::Config(e.to_string()))
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> NmResult<Self> {
        serde_json::from_str(json).map_err(|e| NmError::Config(e.to_string()))
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_file(path: &Path) -> NmResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| NmError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }
}

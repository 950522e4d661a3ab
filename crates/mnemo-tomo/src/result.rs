//! Completed tomography result containers.
//!
//! A process-tomography run produces a tree of results: composite (batch or
//! parallel) nodes whose leaves are single tomography experiments. Each leaf
//! carries a ranked analysis table; for process tomography the first row
//! holds the reconstructed Choi matrix.
//!
//! ```text
//!   CompositeResult (batch)
//!   ├── CompositeResult (parallel, experiments 0..63)
//!   │   ├── ExperimentResult  rep=0  qubits=[0,1]   analysis: [Choi, fidelity, …]
//!   │   └── …
//!   └── CompositeResult (parallel, experiments 63..)
//!       └── …
//! ```

use std::path::Path;

use mnemo_channel::Choi;
use serde::{Deserialize, Serialize};

use crate::error::{TomoError, TomoResult};

/// One value of an analysis table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AnalysisValue {
    /// A reconstructed channel in Choi form.
    Choi(Choi),
    /// A scalar figure of merit (fidelity, purity, …).
    Scalar(f64),
    /// Free-form text.
    Text(String),
}

impl AnalysisValue {
    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisValue::Choi(_) => "choi matrix",
            AnalysisValue::Scalar(_) => "scalar",
            AnalysisValue::Text(_) => "text value",
        }
    }
}

/// One row of an analysis table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Name of the analysed quantity (e.g. `state`, `process_fidelity`).
    pub name: String,
    /// The value.
    pub value: AnalysisValue,
    /// Fit quality reported by the analysis, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

impl AnalysisResult {
    /// Create a new row.
    pub fn new(name: impl Into<String>, value: AnalysisValue) -> Self {
        Self {
            name: name.into(),
            value,
            quality: None,
        }
    }

    /// Set the fit quality.
    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }
}

/// Result of a single process-tomography experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Identifier of the experiment.
    pub experiment_id: String,
    /// Physical qubits the experiment ran on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub physical_qubits: Vec<u32>,
    /// How many times the base circuit was repeated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<u32>,
    /// Ranked analysis table; the first row is the primary result.
    #[serde(default)]
    pub analysis_results: Vec<AnalysisResult>,
}

impl ExperimentResult {
    /// Create an empty result.
    pub fn new(experiment_id: impl Into<String>) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            physical_qubits: Vec::new(),
            repetitions: None,
            analysis_results: Vec::new(),
        }
    }

    /// Set the physical qubits.
    pub fn with_qubits(mut self, qubits: impl IntoIterator<Item = u32>) -> Self {
        self.physical_qubits = qubits.into_iter().collect();
        self
    }

    /// Set the repetition count.
    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = Some(repetitions);
        self
    }

    /// Append an analysis row.
    pub fn with_analysis(mut self, row: AnalysisResult) -> Self {
        self.analysis_results.push(row);
        self
    }

    /// First-ranked analysis value, if any.
    pub fn first_value(&self) -> Option<&AnalysisValue> {
        self.analysis_results.first().map(|r| &r.value)
    }
}

/// A node of the result tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExperimentData {
    /// A single tomography experiment.
    Tomography(ExperimentResult),
    /// A batch or parallel group of experiments.
    Composite(CompositeResult),
}

/// Batch or parallel experiment result: an ordered list of children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
    /// Name of the composite experiment.
    #[serde(default)]
    pub name: String,
    /// Children in submission order.
    #[serde(default)]
    pub children: Vec<ExperimentData>,
}

impl CompositeResult {
    /// Create an empty composite.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Append a tomography child.
    pub fn with_experiment(mut self, child: ExperimentResult) -> Self {
        self.children.push(ExperimentData::Tomography(child));
        self
    }

    /// Append a composite child.
    pub fn with_composite(mut self, child: CompositeResult) -> Self {
        self.children.push(ExperimentData::Composite(child));
        self
    }

    /// Direct children in submission order.
    pub fn child_data(&self) -> &[ExperimentData] {
        &self.children
    }

    /// All tomography leaves, depth-first in submission order.
    pub fn leaves(&self) -> Vec<&ExperimentResult> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    /// A single-level composite holding every leaf of this tree in order.
    pub fn flattened(&self) -> CompositeResult {
        CompositeResult {
            name: self.name.clone(),
            children: self
                .leaves()
                .into_iter()
                .cloned()
                .map(ExperimentData::Tomography)
                .collect(),
        }
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> TomoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn from_file(path: &Path) -> TomoResult<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| TomoError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

fn collect_leaves<'a>(node: &'a CompositeResult, out: &mut Vec<&'a ExperimentResult>) {
    for child in &node.children {
        match child {
            ExperimentData::Tomography(e) => out.push(e),
            ExperimentData::Composite(c) => collect_leaves(c, out),
        }
    }
}

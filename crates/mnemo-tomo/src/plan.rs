//! Experiment layout for time-resolved process tomography.
//!
//! Snapshot `i` of the channel is measured by a tomography experiment on the
//! base circuit repeated `i` times. Experiments run side by side on disjoint
//! groups of physical qubits; a device with `P` disjoint groups can run at
//! most `P` experiments in one parallel job, so longer sequences are split
//! over several parallel groups that reuse the same qubits.
//!
//! Only the layout is produced here. Building and submitting the circuits is
//! left to the caller's circuit framework.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TomoError, TomoResult};

/// Default upper bound on experiments per parallel group.
pub const DEFAULT_MAX_PARALLEL: usize = 63;

/// Consecutive disjoint groups of `qubits_per_experiment` physical qubits.
///
/// A trailing group with fewer qubits is dropped. With `repeat` the list is
/// appended to itself, so every group appears twice.
pub fn qubit_partitions(
    total_qubits: u32,
    qubits_per_experiment: u32,
    repeat: bool,
) -> TomoResult<Vec<Vec<u32>>> {
    if qubits_per_experiment == 0 {
        return Err(TomoError::InvalidPlan(
            "qubits_per_experiment must be at least 1".into(),
        ));
    }
    if total_qubits < qubits_per_experiment {
        return Err(TomoError::InvalidPlan(format!(
            "{total_qubits} qubits cannot hold a {qubits_per_experiment}-qubit experiment"
        )));
    }

    let qubits: Vec<u32> = (0..total_qubits).collect();
    let mut partitions: Vec<Vec<u32>> = qubits
        .chunks_exact(qubits_per_experiment as usize)
        .map(<[u32]>::to_vec)
        .collect();

    let leftover = total_qubits % qubits_per_experiment;
    if leftover > 0 {
        debug!(leftover, "dropping incomplete trailing qubit group");
    }
    if repeat {
        partitions.extend_from_within(..);
    }
    Ok(partitions)
}

/// Inputs of [`BatchPlan::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Physical qubits available on the device.
    pub total_qubits: u32,
    /// Qubits the channel under study acts on.
    pub qubits_per_experiment: u32,
    /// Number of channel snapshots (experiments) to measure.
    pub num_snapshots: usize,
    /// Reuse every qubit group twice when there are too few groups.
    #[serde(default)]
    pub repeat: bool,
    /// Upper bound on experiments per parallel group.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
}

fn default_max_parallel() -> usize {
    DEFAULT_MAX_PARALLEL
}

impl PlanConfig {
    /// Config with `repeat = false` and the default parallel bound.
    pub fn new(total_qubits: u32, qubits_per_experiment: u32, num_snapshots: usize) -> Self {
        Self {
            total_qubits,
            qubits_per_experiment,
            num_snapshots,
            repeat: false,
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }

    /// Enable or disable partition reuse.
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set the parallel bound.
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel;
        self
    }
}

/// One process-tomography experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomographyExperiment {
    /// Snapshot index (also the submission index).
    pub index: usize,
    /// Number of base-circuit repetitions.
    pub repetitions: u32,
    /// Physical qubits to run on.
    pub physical_qubits: Vec<u32>,
}

/// Experiments that run simultaneously on disjoint qubits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelGroup {
    /// Experiments in submission order.
    pub experiments: Vec<TomographyExperiment>,
}

/// Full layout of a time-resolved tomography batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPlan {
    /// The request this plan satisfies.
    pub config: PlanConfig,
    /// Parallel groups in submission order.
    pub groups: Vec<ParallelGroup>,
}

impl BatchPlan {
    /// Lay out `num_snapshots` experiments over the device.
    pub fn build(config: &PlanConfig) -> TomoResult<Self> {
        if config.num_snapshots == 0 {
            return Err(TomoError::InvalidPlan("num_snapshots must be at least 1".into()));
        }
        if config.max_parallel == 0 {
            return Err(TomoError::InvalidPlan("max_parallel must be at least 1".into()));
        }

        let disjoint = qubit_partitions(config.total_qubits, config.qubits_per_experiment, false)?;
        let partitions =
            qubit_partitions(config.total_qubits, config.qubits_per_experiment, config.repeat)?;
        if partitions.len() < config.num_snapshots {
            return Err(TomoError::NotEnoughPartitions {
                required: config.num_snapshots,
                available: partitions.len(),
            });
        }

        // a group never holds more experiments than there are disjoint groups
        let group_size = config.max_parallel.min(disjoint.len());
        let experiments: Vec<TomographyExperiment> = (0..config.num_snapshots)
            .map(|index| TomographyExperiment {
                index,
                repetitions: index as u32,
                physical_qubits: disjoint[index % disjoint.len()].clone(),
            })
            .collect();

        let groups: Vec<ParallelGroup> = experiments
            .chunks(group_size)
            .map(|chunk| ParallelGroup {
                experiments: chunk.to_vec(),
            })
            .collect();

        debug!(
            experiments = config.num_snapshots,
            groups = groups.len(),
            group_size,
            "built tomography batch plan"
        );

        Ok(Self {
            config: config.clone(),
            groups,
        })
    }

    /// All experiments in submission order.
    pub fn experiments(&self) -> impl Iterator<Item = &TomographyExperiment> {
        self.groups.iter().flat_map(|g| g.experiments.iter())
    }

    /// Total number of experiments.
    pub fn num_experiments(&self) -> usize {
        self.groups.iter().map(|g| g.experiments.len()).sum()
    }

    /// Serialise to pretty JSON.
    pub fn to_json(&self) -> TomoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

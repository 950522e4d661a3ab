//! Plan command implementation.
//!
//! `mnemo plan --total-qubits N --qubits-per-experiment k --partitions P [--repeat] [--max-parallel 63]`

use console::style;
use mnemo_tomo::{BatchPlan, PlanConfig};

/// Execute the plan command.
pub fn execute(
    total_qubits: u32,
    qubits_per_experiment: u32,
    snapshots: usize,
    repeat: bool,
    max_parallel: usize,
) -> anyhow::Result<()> {
    let config = PlanConfig::new(total_qubits, qubits_per_experiment, snapshots)
        .with_repeat(repeat)
        .with_max_parallel(max_parallel);
    let plan = BatchPlan::build(&config)?;

    println!("{}", plan.to_json()?);

    eprintln!(
        "{} {} experiments in {} parallel group(s)",
        style("OK").green().bold(),
        plan.num_experiments(),
        plan.groups.len()
    );
    Ok(())
}

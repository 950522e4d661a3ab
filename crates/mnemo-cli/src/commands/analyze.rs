//! Analyze command implementation.
//!
//! `mnemo analyze --input batch.json [--config cfg.yaml] [--base-circuit-time T] [--strict|--relaxed] [--export out.json]`

use std::path::Path;

use anyhow::Context;
use console::style;
use mnemo_channel::TraceNormPolicy;
use mnemo_tomo::{CompositeResult, extract_timeline};

use super::common;

/// Arguments of the analyze command.
pub struct AnalyzeArgs<'a> {
    /// Batch result file.
    pub input: &'a str,
    /// Explicit config file.
    pub config: Option<&'a str>,
    /// Override of the config's base circuit time.
    pub base_circuit_time: Option<f64>,
    /// `--strict` was given.
    pub strict: bool,
    /// `--relaxed` was given.
    pub relaxed: bool,
    /// Report destination; stdout when absent.
    pub export: Option<&'a str>,
}

/// Apply the `--strict`/`--relaxed` flags to the configured policy.
///
/// `--strict` keeps a tolerance the config already set.
pub fn resolve_trace_norm(
    current: TraceNormPolicy,
    strict: bool,
    relaxed: bool,
) -> TraceNormPolicy {
    match (strict, relaxed, current) {
        (_, true, _) => TraceNormPolicy::Relaxed,
        (true, false, TraceNormPolicy::Relaxed) => TraceNormPolicy::default(),
        _ => current,
    }
}

/// Execute the analyze command.
pub fn execute(args: &AnalyzeArgs<'_>) -> anyhow::Result<()> {
    let mut config = common::load_config(args.config)?;
    if let Some(t) = args.base_circuit_time {
        config.base_circuit_time = t;
    }
    config.trace_norm = resolve_trace_norm(config.trace_norm, args.strict, args.relaxed);

    let batch = CompositeResult::from_file(Path::new(args.input))
        .with_context(|| format!("Failed to load batch result from {}", args.input))?;
    let timeline = extract_timeline(&batch.flattened(), config.base_circuit_time)?;
    let report = mnemo_nm::analyze(&timeline, &config)?;

    // Output
    if let Some(path) = args.export {
        mnemo_nm::to_file(&report, Path::new(path), &config.export)?;
        eprintln!("{} Report written to {}", style("OK").green().bold(), path);
    } else {
        println!("{}", mnemo_nm::to_json(&report, &config.export)?);
    }

    // Print summary to stderr
    eprintln!();
    eprintln!("{}", style("Non-Markovianity Summary").bold().underlined());
    eprintln!(
        "  Snapshots:   {} on {} qubit(s), T = {}",
        report.steps.len(),
        report.num_qubits,
        config.base_circuit_time
    );
    for step in &report.steps {
        let g = format!("{:+.3e}", step.g);
        let g = if step.g > 1e-9 {
            style(g).yellow()
        } else {
            style(g).dim()
        };
        eprintln!("  t = {:<10} g = {}", step.time, g);
    }
    let verdict = if report.is_non_markovian(1e-9) {
        style("non-Markovian").red().bold()
    } else {
        style("Markovian").green().bold()
    };
    eprintln!("  D_RHP:       {:.6} ({})", report.drhp, verdict);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_flag_keeps_configured_tolerance() {
        let configured = TraceNormPolicy::Strict { tolerance: 1e-6 };
        assert_eq!(resolve_trace_norm(configured, true, false), configured);
        assert_eq!(resolve_trace_norm(configured, false, false), configured);
    }

    #[test]
    fn test_flags_switch_policy() {
        assert_eq!(
            resolve_trace_norm(TraceNormPolicy::Relaxed, true, false),
            TraceNormPolicy::default()
        );
        assert_eq!(
            resolve_trace_norm(TraceNormPolicy::default(), false, true),
            TraceNormPolicy::Relaxed
        );
        assert_eq!(
            resolve_trace_norm(TraceNormPolicy::Relaxed, false, false),
            TraceNormPolicy::Relaxed
        );
    }
}

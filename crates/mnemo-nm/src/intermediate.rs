//! Intermediate maps between consecutive snapshots.
//!
//! Given snapshots `S_0, S_1, …` of a channel's evolution, the intermediate
//! map at step `i` is
//!
//! ```text
//!   M_0 = S_0
//!   M_i = S_i · (S_0⁺ · S_1⁺ · … · S_{i-1}⁺)
//! ```
//!
//! with `⁺` the Moore–Penrose pseudo-inverse. Tomographic snapshots are
//! often near-singular, so the pseudo-inverse replaces a plain inverse and
//! singular values below `rcond · σ_max` are discarded.

use mnemo_channel::{SuperOp, Timed, Timeline};
use tracing::{debug, info};

use crate::error::{NmError, NmResult};

/// Check every entry acts on the same number of qubits as the first.
pub(crate) fn check_qubits(timeline: &Timeline<SuperOp>) -> NmResult<u32> {
    let expected = timeline.first().value.num_qubits();
    for (index, entry) in timeline.iter().enumerate() {
        let actual = entry.value.num_qubits();
        if actual != expected {
            return Err(NmError::QubitMismatch {
                index,
                expected,
                actual,
            });
        }
    }
    Ok(expected)
}

/// Intermediate maps of a snapshot timeline, at the same times.
///
/// A single snapshot is returned unchanged. The product of pseudo-inverses
/// is built up one factor per step, so each snapshot is inverted once.
pub fn compute_intermediate_maps(
    timeline: &Timeline<SuperOp>,
    rcond: f64,
) -> NmResult<Timeline<SuperOp>> {
    let num_qubits = check_qubits(timeline)?;

    let entries = timeline.entries();
    let mut maps = Vec::with_capacity(entries.len());
    maps.push(timeline.first().clone());

    // acc = S_0⁺ · … · S_{i-1}⁺
    let mut acc: Option<SuperOp> = None;
    for window in entries.windows(2) {
        let inv = window[0].value.pseudo_inverse(rcond)?;
        let product = match acc.take() {
            None => inv,
            Some(a) => a.matmul(&inv)?,
        };
        let current = &window[1];
        maps.push(Timed::new(current.time, current.value.matmul(&product)?));
        acc = Some(product);
    }
    let maps = Timeline::new(maps)?;

    for (i, entry) in maps.iter().enumerate() {
        debug!(step = i, time = entry.time, "intermediate map");
    }
    info!(steps = maps.len(), num_qubits, "computed intermediate maps");
    Ok(maps)
}

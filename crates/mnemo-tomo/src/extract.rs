//! Channel extraction: one channel per child experiment, in submission order.
//!
//! Index `i` of the output always corresponds to child `i` of the input. A
//! child without a channel is an error rather than a skipped entry, since
//! dropping one would shift every later snapshot onto the wrong time step.

use mnemo_channel::{Channel, Choi, SuperOp, Timed, Timeline};
use tracing::{debug, info};

use crate::error::{TomoError, TomoResult};
use crate::result::{AnalysisValue, CompositeResult, ExperimentData, ExperimentResult};

/// Direct tomography children of a composite, in order.
fn tomography_children(batch: &CompositeResult) -> TomoResult<Vec<&ExperimentResult>> {
    if batch.children.is_empty() {
        return Err(TomoError::EmptyBatch);
    }
    batch
        .children
        .iter()
        .enumerate()
        .map(|(index, child)| match child {
            ExperimentData::Tomography(e) => Ok(e),
            ExperimentData::Composite(_) => Err(TomoError::NestedComposite { index }),
        })
        .collect()
}

/// First-ranked Choi matrix of child `index`.
fn first_choi(index: usize, child: &ExperimentResult) -> TomoResult<&Choi> {
    match child.first_value() {
        Some(AnalysisValue::Choi(choi)) => Ok(choi),
        Some(other) => Err(TomoError::UnexpectedValue {
            index,
            kind: other.kind(),
        }),
        None => Err(TomoError::MissingAnalysisValue {
            index,
            experiment_id: child.experiment_id.clone(),
        }),
    }
}

/// Pull one channel per child.
///
/// With `as_superoperator` each Choi matrix is converted to superoperator
/// form; otherwise the Choi matrix is returned as-is.
pub fn extract_channel(batch: &CompositeResult, as_superoperator: bool) -> TomoResult<Vec<Channel>> {
    let children = tomography_children(batch)?;
    let channels = children
        .into_iter()
        .enumerate()
        .map(|(index, child)| {
            let choi = first_choi(index, child)?;
            debug!(
                index,
                experiment = %child.experiment_id,
                num_qubits = choi.num_qubits(),
                "extracted channel"
            );
            Ok(if as_superoperator {
                Channel::SuperOp(choi.to_superop())
            } else {
                Channel::Choi(choi.clone())
            })
        })
        .collect::<TomoResult<Vec<_>>>()?;

    info!(
        batch = %batch.name,
        count = channels.len(),
        as_superoperator,
        "channel extraction complete"
    );
    Ok(channels)
}

/// Pull the Choi matrix of every child.
pub fn extract_choi_matrices(batch: &CompositeResult) -> TomoResult<Vec<Choi>> {
    tomography_children(batch)?
        .into_iter()
        .enumerate()
        .map(|(index, child)| first_choi(index, child).cloned())
        .collect()
}

/// Pull the superoperator of every child.
pub fn extract_superoperators(batch: &CompositeResult) -> TomoResult<Vec<SuperOp>> {
    tomography_children(batch)?
        .into_iter()
        .enumerate()
        .map(|(index, child)| first_choi(index, child).map(Choi::to_superop))
        .collect()
}

/// Pull the superoperator of every child, tagged with its elapsed time
/// `repetitions × base_circuit_time`.
///
/// Every child must report its repetition count, and the resulting times
/// must increase strictly with the child index.
pub fn extract_timeline(
    batch: &CompositeResult,
    base_circuit_time: f64,
) -> TomoResult<Timeline<SuperOp>> {
    if !(base_circuit_time.is_finite() && base_circuit_time > 0.0) {
        return Err(TomoError::InvalidCircuitTime(base_circuit_time));
    }
    let entries = tomography_children(batch)?
        .into_iter()
        .enumerate()
        .map(|(index, child)| {
            let reps = child
                .repetitions
                .ok_or(TomoError::MissingRepetitions { index })?;
            let superop = first_choi(index, child)?.to_superop();
            Ok(Timed::new(f64::from(reps) * base_circuit_time, superop))
        })
        .collect::<TomoResult<Vec<_>>>()?;
    Ok(Timeline::new(entries)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::AnalysisResult;

    fn child(reps: u32) -> ExperimentResult {
        ExperimentResult::new(format!("qpt-{reps}"))
            .with_repetitions(reps)
            .with_analysis(AnalysisResult::new(
                "state",
                AnalysisValue::Choi(Choi::identity(1)),
            ))
    }

    #[test]
    fn test_empty_batch() {
        let batch = CompositeResult::new("empty");
        assert!(matches!(
            extract_channel(&batch, true),
            Err(TomoError::EmptyBatch)
        ));
    }

    #[test]
    fn test_nested_composite_rejected() {
        let batch = CompositeResult::new("b")
            .with_experiment(child(0))
            .with_composite(CompositeResult::new("inner").with_experiment(child(1)));
        assert!(matches!(
            extract_channel(&batch, false),
            Err(TomoError::NestedComposite { index: 1 })
        ));
    }

    #[test]
    fn test_representation_switch() {
        let batch = CompositeResult::new("b").with_experiment(child(0));
        let as_choi = extract_channel(&batch, false).unwrap();
        let as_superop = extract_channel(&batch, true).unwrap();
        assert!(as_choi[0].as_choi().is_some());
        assert_eq!(as_superop[0].as_superop(), Some(&SuperOp::identity(1)));
    }

    #[test]
    fn test_timeline_times() {
        let batch = CompositeResult::new("b")
            .with_experiment(child(0))
            .with_experiment(child(1))
            .with_experiment(child(2));
        let tl = extract_timeline(&batch, 90.0).unwrap();
        assert_eq!(tl.times(), vec![0.0, 90.0, 180.0]);
    }

    #[test]
    fn test_timeline_rejects_bad_circuit_time() {
        let batch = CompositeResult::new("b").with_experiment(child(0));
        assert!(matches!(
            extract_timeline(&batch, 0.0),
            Err(TomoError::InvalidCircuitTime(_))
        ));
        assert!(extract_timeline(&batch, f64::NAN).is_err());
    }
}

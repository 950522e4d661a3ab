//! Divisibility-based measures.
//!
//! A map `Λ` is a genuine quantum channel exactly when its Choi-extension
//! `(I ⊗ Λ)` leaves the trace norm of every state at 1. Intermediate maps of
//! a Markovian (CP-divisible) evolution are all channels, so each term
//!
//! ```text
//!   g = ‖(I ⊗ Λ)(|Φ⟩⟨Φ|)‖₁ − 1
//! ```
//!
//! vanishes; a positive `g` witnesses non-Markovianity. Both measures here
//! sum the `g` terms over time into `G` and report `G / (G + 1)`.

use mnemo_channel::{
    ChannelError, KrausMap, SuperOp, Timeline, TraceNormPolicy, maximally_entangled_density_matrix,
    qubit_dim, trace_norm,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::{NmError, NmResult};
use crate::intermediate::check_qubits;

/// How the divisibility terms are weighted before summing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaTScaling {
    /// Plain sum `Σ g`; the time step is not applied.
    #[default]
    Unscaled,
    /// Riemann sum `Σ g · Δt`.
    Riemann,
}

/// Map a total onto `G / (G + 1)`.
///
/// Totals at or below `-1` only arise from maps that shrink the trace norm
/// and have no meaningful image, so they are rejected.
pub(crate) fn normalize(total: f64) -> NmResult<f64> {
    if !total.is_finite() || total <= -1.0 {
        return Err(NmError::DegenerateTotal(total));
    }
    Ok(total / (total + 1.0))
}

fn check_circuit_time(base_circuit_time: f64) -> NmResult<()> {
    if base_circuit_time.is_finite() && base_circuit_time > 0.0 {
        Ok(())
    } else {
        Err(NmError::InvalidCircuitTime(base_circuit_time))
    }
}

/// Divisibility measure over a sequence of intermediate Kraus maps.
///
/// Every map acts on `qubit_count` qubits. Each is extended by one auxiliary
/// qubit (`I₂ ⊗ K`) and applied to the maximally entangled state of
/// `qubit_count + 1` qubits. With [`DeltaTScaling::Unscaled`] `delta_t` is
/// accepted but unused.
pub fn first_non_markovianity_measure(
    kraus_maps: &[KrausMap],
    qubit_count: u32,
    delta_t: f64,
    config: &AnalysisConfig,
) -> NmResult<f64> {
    if kraus_maps.is_empty() {
        return Err(NmError::EmptySequence("Kraus map"));
    }
    let weight = match config.delta_t_scaling {
        DeltaTScaling::Unscaled => 1.0,
        DeltaTScaling::Riemann if delta_t.is_finite() && delta_t > 0.0 => delta_t,
        DeltaTScaling::Riemann => return Err(NmError::InvalidTimeStep(delta_t)),
    };

    let extended = qubit_count
        .checked_add(1)
        .ok_or(ChannelError::TooManyQubits(qubit_count))?;
    let probe = maximally_entangled_density_matrix(extended)?;
    let dim = qubit_dim(qubit_count)?;

    let mut total = 0.0;
    for (index, map) in kraus_maps.iter().enumerate() {
        if map.dim() != dim {
            return Err(NmError::QubitMismatch {
                index,
                expected: qubit_count,
                actual: map.dim().trailing_zeros(),
            });
        }
        let out = map.extended().apply(probe.as_operator())?;
        let g = trace_norm(&out, config.trace_norm)? - 1.0;
        if g < 0.0 {
            warn!(index, g, "negative divisibility term; map may not preserve trace");
        }
        debug!(index, g, "divisibility term");
        total += g * weight;
    }

    let measure = normalize(total)?;
    info!(maps = kraus_maps.len(), total, measure, "first non-Markovianity measure");
    Ok(measure)
}

/// Per-step Rivas–Huelga–Plenio terms `(‖Choi(M)/d‖₁ − 1) / T`.
///
/// The Choi matrix is normalised to unit trace first, so any CPTP map
/// contributes exactly zero.
pub fn divisibility_terms(
    intermediate_maps: &Timeline<SuperOp>,
    base_circuit_time: f64,
    policy: TraceNormPolicy,
) -> NmResult<Vec<f64>> {
    check_circuit_time(base_circuit_time)?;
    check_qubits(intermediate_maps)?;

    intermediate_maps
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let choi = entry.value.to_choi();
            let norm = trace_norm(&choi.normalized(), policy)?;
            let g = (norm - 1.0) / base_circuit_time;
            if g < 0.0 {
                warn!(index, g, "negative divisibility term; map may not preserve trace");
            }
            debug!(index, time = entry.time, norm, g, "RHP term");
            Ok(g)
        })
        .collect()
}

/// Rivas–Huelga–Plenio measure `D = N / (1 + N)` with `N` the sum of
/// [`divisibility_terms`].
pub fn compute_drhp(
    intermediate_maps: &Timeline<SuperOp>,
    base_circuit_time: f64,
    policy: TraceNormPolicy,
) -> NmResult<f64> {
    let terms = divisibility_terms(intermediate_maps, base_circuit_time, policy)?;
    let total: f64 = terms.iter().sum();
    let measure = normalize(total)?;
    info!(steps = terms.len(), total, measure, "RHP measure");
    Ok(measure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_channel::{Complex64, Operator};

    fn amplitude_damping(gamma: f64) -> KrausMap {
        let k0 = Operator::from_diagonal(&[1.0, (1.0 - gamma).sqrt()]).unwrap();
        let k1 = Operator::from_rows(vec![
            vec![Complex64::new(0.0, 0.0), Complex64::new(gamma.sqrt(), 0.0)],
            vec![Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0)],
        ])
        .unwrap();
        KrausMap::new(vec![k0, k1]).unwrap()
    }

    #[test]
    fn test_identity_kraus_maps_are_markovian() {
        let maps = vec![KrausMap::identity(1); 5];
        let d = first_non_markovianity_measure(&maps, 1, 0.1, &AnalysisConfig::default()).unwrap();
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_scaled_identity_is_non_markovian() {
        // 1.2·I is not trace preserving; trace norm grows by 1.44
        let k = Operator::identity(2).scale(1.2);
        let maps = vec![KrausMap::unitary(k)];
        let d = first_non_markovianity_measure(&maps, 1, 1.0, &AnalysisConfig::default()).unwrap();
        let g: f64 = 1.44 - 1.0;
        assert!((d - g / (g + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_riemann_scaling_multiplies_by_delta_t() {
        let maps = vec![KrausMap::unitary(Operator::identity(2).scale(1.2))];
        let config = AnalysisConfig {
            delta_t_scaling: DeltaTScaling::Riemann,
            ..AnalysisConfig::default()
        };
        let d = first_non_markovianity_measure(&maps, 1, 0.5, &config).unwrap();
        let total = 0.44 * 0.5;
        assert!((d - total / (total + 1.0)).abs() < 1e-9);

        assert!(matches!(
            first_non_markovianity_measure(&maps, 1, 0.0, &config),
            Err(NmError::InvalidTimeStep(_))
        ));
    }

    #[test]
    fn test_amplitude_damping_is_markovian() {
        let maps = vec![amplitude_damping(0.3), amplitude_damping(0.6)];
        let d = first_non_markovianity_measure(&maps, 1, 1.0, &AnalysisConfig::default()).unwrap();
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_first_measure_rejects_wrong_size() {
        let maps = vec![KrausMap::identity(2)];
        assert!(matches!(
            first_non_markovianity_measure(&maps, 1, 1.0, &AnalysisConfig::default()),
            Err(NmError::QubitMismatch { expected: 1, actual: 2, .. })
        ));
        assert!(matches!(
            first_non_markovianity_measure(&[], 1, 1.0, &AnalysisConfig::default()),
            Err(NmError::EmptySequence(_))
        ));
    }

    #[test]
    fn test_drhp_identity_is_zero() {
        let maps = Timeline::uniform(0.0, 90.0, vec![SuperOp::identity(1); 3]).unwrap();
        let d = compute_drhp(&maps, 90.0, TraceNormPolicy::default()).unwrap();
        assert!(d.abs() < 1e-12);
    }

    #[test]
    fn test_drhp_terms_scale_with_circuit_time() {
        let s = amplitude_damping(0.2).to_superop().unwrap();
        let inflated = SuperOp::new(s.as_operator().scale(1.5)).unwrap();
        let maps = Timeline::uniform(0.0, 1.0, vec![inflated]).unwrap();

        let t1 = divisibility_terms(&maps, 1.0, TraceNormPolicy::Relaxed).unwrap();
        let t2 = divisibility_terms(&maps, 2.0, TraceNormPolicy::Relaxed).unwrap();
        assert!(t1[0] > 0.0);
        assert!((t1[0] - 2.0 * t2[0]).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_rejects_degenerate_totals() {
        assert!((normalize(1.0).unwrap() - 0.5).abs() < 1e-15);
        assert!((normalize(-0.5).unwrap() + 1.0).abs() < 1e-15);
        for total in [-1.0, -3.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(normalize(total), Err(NmError::DegenerateTotal(_))));
        }
    }

    #[test]
    fn test_first_measure_rejects_zero_map() {
        // the zero map sends the probe to 0, so g = -1
        let maps = vec![KrausMap::unitary(Operator::zeros(2))];
        assert!(matches!(
            first_non_markovianity_measure(&maps, 1, 1.0, &AnalysisConfig::default()),
            Err(NmError::DegenerateTotal(t)) if (t + 1.0).abs() < 1e-12
        ));
    }

    #[test]
    fn test_first_measure_rejects_huge_qubit_count() {
        let maps = vec![KrausMap::identity(1)];
        for q in [u32::MAX, 40] {
            assert!(matches!(
                first_non_markovianity_measure(&maps, q, 1.0, &AnalysisConfig::default()),
                Err(NmError::Channel(ChannelError::TooManyQubits(_)))
            ));
        }
    }

    #[test]
    fn test_drhp_rejects_zero_superop() {
        let zero = SuperOp::new(Operator::zeros(4)).unwrap();
        let maps = Timeline::uniform(0.0, 1.0, vec![zero]).unwrap();
        assert!(matches!(
            compute_drhp(&maps, 1.0, TraceNormPolicy::Relaxed),
            Err(NmError::DegenerateTotal(_))
        ));
    }

    #[test]
    fn test_drhp_rejects_bad_circuit_time() {
        let maps = Timeline::uniform(0.0, 1.0, vec![SuperOp::identity(1)]).unwrap();
        for t in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                compute_drhp(&maps, t, TraceNormPolicy::default()),
                Err(NmError::InvalidCircuitTime(_))
            ));
        }
    }
}

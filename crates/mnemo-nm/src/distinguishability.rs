//! Trace-distance revival measure.
//!
//! Under Markovian dynamics the distinguishability of any two states can
//! only shrink. Each basis contributes the total of its trace-distance
//! increases over time; the measure is the largest of those totals.

use std::fmt;

use mnemo_channel::{DensityMatrix, Timeline, trace_distance};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::NmResult;

/// Measurement basis of a state pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// Pauli X eigenstates.
    X,
    /// Pauli Y eigenstates.
    Y,
    /// Pauli Z eigenstates.
    Z,
}

impl Basis {
    /// All bases in X, Y, Z order.
    pub const ALL: [Basis; 3] = [Basis::X, Basis::Y, Basis::Z];
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::X => write!(f, "X"),
            Basis::Y => write!(f, "Y"),
            Basis::Z => write!(f, "Z"),
        }
    }
}

/// Two initial preparations evolved to the same time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePair {
    /// State evolved from the first preparation.
    pub first: DensityMatrix,
    /// State evolved from the second preparation.
    pub second: DensityMatrix,
}

impl StatePair {
    /// Create a new pair.
    pub fn new(first: DensityMatrix, second: DensityMatrix) -> Self {
        Self { first, second }
    }

    /// Trace distance between the two states.
    pub fn distance(&self) -> NmResult<f64> {
        Ok(trace_distance(&self.first, &self.second)?)
    }
}

/// State pairs over time, one timeline per basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisStates {
    /// X-basis pairs.
    pub x: Timeline<StatePair>,
    /// Y-basis pairs.
    pub y: Timeline<StatePair>,
    /// Z-basis pairs.
    pub z: Timeline<StatePair>,
}

impl BasisStates {
    /// Create from the three per-basis timelines.
    pub fn new(x: Timeline<StatePair>, y: Timeline<StatePair>, z: Timeline<StatePair>) -> Self {
        Self { x, y, z }
    }

    /// The timeline of one basis.
    pub fn get(&self, basis: Basis) -> &Timeline<StatePair> {
        match basis {
            Basis::X => &self.x,
            Basis::Y => &self.y,
            Basis::Z => &self.z,
        }
    }
}

/// Sum of positive trace-distance increments of one timeline.
fn revival(basis: Basis, pairs: &Timeline<StatePair>) -> NmResult<f64> {
    let distances = pairs
        .values()
        .map(StatePair::distance)
        .collect::<NmResult<Vec<f64>>>()?;

    let total: f64 = distances
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .sum();
    debug!(%basis, ?distances, total, "trace-distance revival");
    Ok(total)
}

/// Per-basis revival totals in X, Y, Z order.
pub fn basis_witnesses(states: &BasisStates) -> NmResult<[f64; 3]> {
    Ok([
        revival(Basis::X, &states.x)?,
        revival(Basis::Y, &states.y)?,
        revival(Basis::Z, &states.z)?,
    ])
}

/// Largest per-basis revival total.
pub fn second_non_markovian_measure(states: &BasisStates) -> NmResult<f64> {
    let witnesses = basis_witnesses(states)?;
    let measure = witnesses.iter().copied().fold(0.0, f64::max);
    info!(?witnesses, measure, "second non-Markovianity measure");
    Ok(measure)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Diagonal qubit states at trace distance `d`.
    fn pair_at(d: f64) -> StatePair {
        let p = 0.5 + d / 2.0;
        StatePair::new(
            DensityMatrix::from_diagonal(&[p, 1.0 - p]).unwrap(),
            DensityMatrix::from_diagonal(&[1.0 - p, p]).unwrap(),
        )
    }

    fn timeline(distances: &[f64]) -> Timeline<StatePair> {
        Timeline::uniform(0.0, 1.0, distances.iter().map(|&d| pair_at(d)).collect()).unwrap()
    }

    #[test]
    fn test_pair_distance() {
        // diagonal entries differ by d on both sides: ½(d + d) = d
        assert!((pair_at(0.4).distance().unwrap() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_decreasing_distances_are_markovian() {
        let states = BasisStates::new(
            timeline(&[0.9, 0.5]),
            timeline(&[0.8, 0.3]),
            timeline(&[0.6, 0.1]),
        );
        assert_eq!(basis_witnesses(&states).unwrap(), [0.0, 0.0, 0.0]);
        assert_eq!(second_non_markovian_measure(&states).unwrap(), 0.0);
    }

    #[test]
    fn test_revival_in_one_basis() {
        let states = BasisStates::new(
            timeline(&[0.9, 0.5]),
            timeline(&[0.1, 0.3]),
            timeline(&[0.6, 0.1]),
        );
        let w = basis_witnesses(&states).unwrap();
        assert!((w[1] - 0.2).abs() < 1e-12);
        assert!(second_non_markovian_measure(&states).unwrap() >= 0.2 - 1e-12);
    }

    #[test]
    fn test_only_positive_increments_count() {
        let states = BasisStates::new(
            timeline(&[0.2, 0.5, 0.1, 0.4]),
            timeline(&[0.5]),
            timeline(&[0.5]),
        );
        let w = basis_witnesses(&states).unwrap();
        assert!((w[0] - 0.6).abs() < 1e-12);
        assert_eq!(w[1], 0.0);
    }

    #[test]
    fn test_basis_lookup() {
        let states = BasisStates::new(timeline(&[0.1]), timeline(&[0.2]), timeline(&[0.3]));
        for (basis, d) in Basis::ALL.into_iter().zip([0.1, 0.2, 0.3]) {
            let got = states.get(basis).first().value.distance().unwrap();
            assert!((got - d).abs() < 1e-12, "{basis}");
        }
    }
}

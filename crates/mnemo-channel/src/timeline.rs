//! Time-ordered sequences with explicit elapsed-time metadata.
//!
//! A [`Timeline`] pairs every value with the elapsed time it was taken at.
//! Times are finite and strictly increasing; construction enforces this, so
//! an out-of-order or missing snapshot shows up as an error instead of a
//! silent shift of every later index.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ChannelError, ChannelResult};

/// A value tagged with the elapsed time it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timed<T> {
    /// Elapsed time since the start of the evolution.
    pub time: f64,
    /// The value at that time.
    pub value: T,
}

impl<T> Timed<T> {
    /// Create a new entry.
    pub fn new(time: f64, value: T) -> Self {
        Self { time, value }
    }
}

/// Non-empty sequence of [`Timed`] values with strictly increasing times.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Timeline<T> {
    entries: Vec<Timed<T>>,
}

impl<T> Timeline<T> {
    /// Build from entries, checking they are non-empty and ordered.
    pub fn new(entries: Vec<Timed<T>>) -> ChannelResult<Self> {
        if entries.is_empty() {
            return Err(ChannelError::EmptyTimeline);
        }
        let mut previous = f64::NEG_INFINITY;
        for (index, entry) in entries.iter().enumerate() {
            if !entry.time.is_finite() || entry.time <= previous {
                return Err(ChannelError::NonMonotonicTime {
                    index,
                    previous,
                    current: entry.time,
                });
            }
            previous = entry.time;
        }
        Ok(Self { entries })
    }

    /// Values sampled at `start, start + step, start + 2·step, …`.
    pub fn uniform(start: f64, step: f64, values: Vec<T>) -> ChannelResult<Self> {
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Timed::new(start + step * i as f64, v))
            .collect();
        Self::new(entries)
    }

    /// Number of entries (at least one).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a timeline holds at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in time order.
    pub fn entries(&self) -> &[Timed<T>] {
        &self.entries
    }

    /// Iterate entries in time order.
    pub fn iter(&self) -> std::slice::Iter<'_, Timed<T>> {
        self.entries.iter()
    }

    /// Iterate values in time order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    /// Times in order.
    pub fn times(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.time).collect()
    }

    /// The earliest entry.
    pub fn first(&self) -> &Timed<T> {
        &self.entries[0]
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&Timed<T>> {
        self.entries.get(index)
    }

    /// Transform every value, keeping the times.
    pub fn try_map<U, E>(&self, mut f: impl FnMut(&T) -> Result<U, E>) -> Result<Timeline<U>, E> {
        let entries = self
            .entries
            .iter()
            .map(|e| Ok(Timed::new(e.time, f(&e.value)?)))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Timeline { entries })
    }

    /// Consume into the values, dropping the times.
    pub fn into_values(self) -> Vec<T> {
        self.entries.into_iter().map(|e| e.value).collect()
    }
}

impl<'a, T> IntoIterator for &'a Timeline<T> {
    type Item = &'a Timed<T>;
    type IntoIter = std::slice::Iter<'a, Timed<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Timeline<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<Timed<T>>::deserialize(deserializer)?;
        Timeline::new(entries).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            Timeline::<u8>::new(vec![]),
            Err(ChannelError::EmptyTimeline)
        ));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let r = Timeline::new(vec![Timed::new(0.0, 'a'), Timed::new(2.0, 'b'), Timed::new(1.0, 'c')]);
        assert!(matches!(r, Err(ChannelError::NonMonotonicTime { index: 2, .. })));
    }

    #[test]
    fn test_duplicate_time_rejected() {
        let r = Timeline::new(vec![Timed::new(1.0, 'a'), Timed::new(1.0, 'b')]);
        assert!(r.is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let r = Timeline::new(vec![Timed::new(f64::NAN, 'a')]);
        assert!(r.is_err());
    }

    #[test]
    fn test_uniform() {
        let t = Timeline::uniform(0.0, 90.0, vec![1, 2, 3]).unwrap();
        assert_eq!(t.times(), vec![0.0, 90.0, 180.0]);
        assert_eq!(t.values().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_uniform_zero_step_rejected() {
        assert!(Timeline::uniform(0.0, 0.0, vec![1, 2]).is_err());
    }

    #[test]
    fn test_try_map_keeps_times() {
        let t = Timeline::uniform(1.0, 2.0, vec![1, 2]).unwrap();
        let doubled: Timeline<i32> = t.try_map(|v| Ok::<_, ()>(v * 2)).unwrap();
        assert_eq!(doubled.times(), vec![1.0, 3.0]);
        assert_eq!(doubled.into_values(), vec![2, 4]);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Timeline<u8> =
            serde_json::from_str(r#"[{"time":0.0,"value":1},{"time":1.0,"value":2}]"#).unwrap();
        assert_eq!(ok.len(), 2);
        let bad = serde_json::from_str::<Timeline<u8>>(r#"[{"time":1.0,"value":1},{"time":0.0,"value":2}]"#);
        assert!(bad.is_err());
    }
}

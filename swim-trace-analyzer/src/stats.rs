use std::cmp::Ordering;

use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::model::Percentile;

/// Descriptive statistics over one non-empty group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
    /// Population standard deviation.
    pub jitter: f64,
}

impl Summary {
    /// Returns `None` for an empty slice; callers report "no data" instead.
    pub fn from_values(values: &[f64]) -> Option<Summary> {
        let sorted = sorted_copy(values);
        Self::from_sorted(&sorted)
    }

    pub fn from_sorted(data: &[f64]) -> Option<Summary> {
        let (min, max) = match data.iter().copied().minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        let pick = |p: Percentile| percentile(data, p.q()).unwrap_or(f64::NAN);

        Some(Summary {
            count: data.len(),
            mean: mean(data)?,
            min,
            max,
            p50: pick(Percentile::P50),
            p95: pick(Percentile::P95),
            p99: pick(Percentile::P99),
            jitter: jitter(data)?,
        })
    }

    pub fn value_for(&self, p: Percentile) -> f64 {
        match p {
            Percentile::P50 => self.p50,
            Percentile::P95 => self.p95,
            Percentile::P99 => self.p99,
        }
    }
}

pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut data = values.to_vec();
    data.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    data
}

pub fn mean(values: &[f64]) -> Option<f64> {
    match values.len() {
        0 => None,
        n => Some(values.iter().sum::<f64>() / n as f64),
    }
}

/// Nearest-rank percentile over ascending `sorted` values.
///
/// Picks index `floor(n * p)` clamped to `[0, n - 1]`, so `p = 0.5` is the
/// upper median for even `n` and no interpolation happens.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    // `as usize` saturates negative ranks to 0
    let idx = ((n as f64) * p).floor() as usize;
    Some(sorted[idx.min(n - 1)])
}

/// Population standard deviation: `sqrt(mean((x - mean)^2))`.
pub fn jitter(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let variance = values.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Jitter over a trailing window of `window` samples.
///
/// Position `i` (for `i` in `window..n`) covers `values[i - window..i]`, which
/// yields `n - window` values, or none when `n <= window` or `window == 0`.
pub fn rolling_jitter(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() <= window {
        return Vec::new();
    }
    (window..values.len())
        .filter_map(|i| jitter(&values[i - window..i]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_to_hundred() -> Vec<f64> { (1..=100).map(f64::from).collect() }

    #[test]
    fn test_nearest_rank_percentiles() {
        let data = one_to_hundred();
        assert_eq!(percentile(&data, 0.99), Some(100.0));
        assert_eq!(percentile(&data, 0.5), Some(51.0));
        assert_eq!(percentile(&data, 0.95), Some(96.0));
        assert_eq!(percentile(&data, 0.0), Some(1.0));
        assert_eq!(percentile(&data, 1.0), Some(100.0));
    }

    #[test]
    fn test_median_is_not_averaged() {
        assert_eq!(percentile(&[10.0, 20.0, 30.0, 40.0], 0.5), Some(30.0));
        assert_eq!(percentile(&[7.0], 0.99), Some(7.0));
    }

    #[test]
    fn test_empty_inputs_have_no_statistics() {
        assert_eq!(percentile(&[], 0.5), None);
        assert_eq!(mean(&[]), None);
        assert_eq!(jitter(&[]), None);
        assert_eq!(Summary::from_values(&[]), None);
        assert!(rolling_jitter(&[], 20).is_empty());
    }

    #[test]
    fn test_jitter_is_population_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(jitter(&values), Some(2.0));
        assert_eq!(jitter(&[5.0, 5.0, 5.0]), Some(0.0));
    }

    #[test]
    fn test_summary_from_unsorted_values() {
        let mut values = one_to_hundred();
        values.reverse();
        let s = Summary::from_values(&values).unwrap();
        assert_eq!(s.count, 100);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 100.0);
        assert_eq!(s.mean, 50.5);
        assert_eq!(s.p50, 51.0);
        assert_eq!(s.p95, 96.0);
        assert_eq!(s.p99, 100.0);
        assert_eq!(s.value_for(Percentile::P99), 100.0);
    }

    #[test]
    fn test_rolling_jitter_length() {
        for n in [0usize, 5, 20, 21, 57] {
            let values: Vec<f64> = (0..n).map(|i| (i % 7) as f64).collect();
            assert_eq!(rolling_jitter(&values, 20).len(), n.saturating_sub(20), "n={n}");
        }
        assert!(rolling_jitter(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_rolling_jitter_windows() {
        let values: Vec<f64> = (0..25).map(f64::from).collect();
        let rolling = rolling_jitter(&values, 20);
        assert_eq!(rolling.len(), 5);
        for (j, value) in rolling.iter().enumerate() {
            let expected = jitter(&values[j..j + 20]).unwrap();
            assert_eq!(*value, expected);
        }
        // every window of 20 consecutive integers has the same spread
        assert!(rolling.iter().all(|v| (v - rolling[0]).abs() < 1e-12));
    }
}

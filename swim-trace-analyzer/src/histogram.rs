use serde::Serialize;

use crate::error::{AnalyzerError, Result};

/// Lower edges of a bucket layout.
///
/// Bucket `i` is `[edges[i], edges[i + 1])`; the last bucket is
/// `[edges[last], +inf)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketBounds {
    edges: Vec<f64>,
}

impl BucketBounds {
    /// Accepts strictly increasing finite edges. A trailing `+inf` is allowed
    /// and dropped, so `[0, 1, 10, inf]` describes three buckets.
    pub fn new(edges: &[f64]) -> Result<Self> {
        let edges: Vec<f64> = match edges.split_last() {
            Some((last, rest)) if *last == f64::INFINITY => rest.to_vec(),
            _ => edges.to_vec(),
        };
        if edges.is_empty() {
            return Err(AnalyzerError::InvalidBuckets("no finite edges".to_string()));
        }
        if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(AnalyzerError::InvalidBuckets(format!("non-finite edge {bad}")));
        }
        if let Some(w) = edges.windows(2).find(|w| w[0] >= w[1]) {
            return Err(AnalyzerError::InvalidBuckets(format!(
                "edges not strictly increasing at {} >= {}",
                w[0], w[1]
            )));
        }
        Ok(Self { edges })
    }

    /// `count` equal-width buckets starting at `min` and covering `max`.
    /// A zero span collapses to a single bucket.
    pub fn equal_width(min: f64, max: f64, count: usize) -> Result<Self> {
        let span = max - min;
        if count <= 1 || !(span > 0.0) {
            return Self::new(&[min]);
        }
        let width = span / count as f64;
        let edges: Vec<f64> = (0..count).map(|i| min + width * i as f64).collect();
        Self::new(&edges)
    }

    pub fn edges(&self) -> &[f64] { &self.edges }

    pub fn len(&self) -> usize { self.edges.len() }

    pub fn is_empty(&self) -> bool { self.edges.is_empty() }

    /// Index of the bucket holding `value`. Values below the first edge (and
    /// NaN) land in bucket 0 so classification stays total.
    pub fn bucket_of(&self, value: f64) -> usize {
        self.edges.partition_point(|e| *e <= value).saturating_sub(1)
    }

    /// Upper edge of bucket `i`, `+inf` for the last one.
    pub fn upper(&self, i: usize) -> f64 { self.edges.get(i + 1).copied().unwrap_or(f64::INFINITY) }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bounds: BucketBounds,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn classify(bounds: &BucketBounds, values: impl IntoIterator<Item = f64>) -> Self {
        let mut counts = vec![0usize; bounds.len()];
        for v in values {
            counts[bounds.bucket_of(v)] += 1;
        }
        Self {
            bounds: bounds.clone(),
            counts,
        }
    }

    pub fn total(&self) -> usize { self.counts.iter().sum() }

    pub fn max_count(&self) -> usize { self.counts.iter().copied().max().unwrap_or(0) }

    /// Bar length per bucket, scaled so the fullest bucket spans `width`.
    pub fn bar_lengths(&self, width: usize) -> Vec<usize> {
        let max = self.max_count().max(1);
        self.counts.iter().map(|c| width * c / max).collect()
    }

    /// Share of the total per bucket in percent; all zeros when empty.
    pub fn percentages(&self) -> Vec<f64> {
        let total = self.total();
        self.counts
            .iter()
            .map(|c| match total {
                0 => 0.0,
                t => 100.0 * *c as f64 / t as f64,
            })
            .collect()
    }
}

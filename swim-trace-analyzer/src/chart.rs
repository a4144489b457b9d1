//! Comparative chart data: four views over RTT series, one series per source.

use crate::config::FREQUENCY_BINS;
use crate::error::{AnalyzerError, Result};
use crate::histogram::{BucketBounds, Histogram};
use crate::model::Percentile;
use crate::stats::{rolling_jitter, sorted_copy};
use crate::store::EventStore;

/// A finite color cycle. Series pick `colors[index % len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: &'static [&'static str],
}

impl Palette {
    pub const TAB10: Palette = Palette {
        colors: &[
            "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
            "#bcbd22", "#17becf",
        ],
    };

    pub fn new(colors: &'static [&'static str]) -> Option<Self> {
        (!colors.is_empty()).then_some(Self { colors })
    }

    pub fn color(&self, index: usize) -> &'static str { self.colors[index % self.colors.len()] }

    pub fn len(&self) -> usize { self.colors.len() }

    pub fn is_empty(&self) -> bool { self.colors.is_empty() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartView {
    RawSeries,
    Frequency,
    Cdf,
    RollingJitter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub color_index: usize,
    pub points: Vec<(f64, f64)>,
}

/// Horizontal reference line.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: &'static str,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub view: ChartView,
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<Series>,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatencyChart {
    pub title: String,
    pub palette: Palette,
    pub panels: Vec<Panel>,
}

impl LatencyChart {
    pub fn panel(&self, view: ChartView) -> Option<&Panel> { self.panels.iter().find(|p| p.view == view) }
}

/// Builds the raw, frequency, CDF and rolling-jitter views. Series keep the
/// store's key order and that order fixes their palette index.
pub fn build_latency_chart(series: &EventStore<String, f64>, window: usize, palette: Palette) -> LatencyChart {
    let mut raw = Vec::new();
    let mut freq = Vec::new();
    let mut cdf = Vec::new();
    let mut jitter = Vec::new();

    for (color_index, (label, values)) in series.groups().enumerate() {
        let make = |points: Vec<(f64, f64)>| Series {
            label: label.clone(),
            color_index,
            points,
        };
        raw.push(make(index_points(values, 0)));
        freq.push(make(frequency_points(values, FREQUENCY_BINS)));
        cdf.push(make(cdf_points(values)));
        let rolling = rolling_jitter(values, window);
        if !rolling.is_empty() {
            jitter.push(make(index_points(&rolling, window)));
        }
    }

    let markers = Percentile::all_in_order()
        .iter()
        .map(|p| Marker {
            label: p.name(),
            y: p.q(),
        })
        .collect();

    LatencyChart {
        title: "SWIM Protocol Latency Analysis".to_string(),
        palette,
        panels: vec![
            Panel {
                view: ChartView::RawSeries,
                title: "RTT Over Time".to_string(),
                x_label: "Sample #",
                y_label: "RTT (µs)",
                series: raw,
                markers: Vec::new(),
            },
            Panel {
                view: ChartView::Frequency,
                title: "RTT Distribution".to_string(),
                x_label: "RTT (µs)",
                y_label: "Frequency",
                series: freq,
                markers: Vec::new(),
            },
            Panel {
                view: ChartView::Cdf,
                title: "Cumulative Distribution".to_string(),
                x_label: "RTT (µs)",
                y_label: "CDF",
                series: cdf,
                markers,
            },
            Panel {
                view: ChartView::RollingJitter,
                title: format!("Rolling Jitter (window={window})"),
                x_label: "Sample #",
                y_label: "Jitter (µs)",
                series: jitter,
                markers: Vec::new(),
            },
        ],
    }
}

/// Like [`build_latency_chart`], but refuses to build a chart when no input
/// produced a single sample.
pub fn chart_for_samples(series: &EventStore<String, f64>, window: usize, palette: Palette) -> Result<LatencyChart> {
    if series.total() == 0 {
        return Err(AnalyzerError::EmptyResult("any input".to_string()));
    }
    Ok(build_latency_chart(series, window, palette))
}

fn index_points(values: &[f64], first_index: usize) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| ((first_index + i) as f64, *v))
        .collect()
}

/// Equal-width bins over the series' own range, as (bin center, count).
fn frequency_points(values: &[f64], bins: usize) -> Vec<(f64, f64)> {
    let sorted = sorted_copy(values);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    let Ok(bounds) = BucketBounds::equal_width(min, max, bins) else {
        return Vec::new();
    };
    let half_width = match bounds.edges() {
        [a, b, ..] => (b - a) / 2.0,
        _ => 0.0,
    };
    let hist = Histogram::classify(&bounds, sorted.iter().copied());
    bounds
        .edges()
        .iter()
        .zip(&hist.counts)
        .map(|(edge, count)| (edge + half_width, *count as f64))
        .collect()
}

fn cdf_points(values: &[f64]) -> Vec<(f64, f64)> {
    let sorted = sorted_copy(values);
    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (*v, (i + 1) as f64 / n))
        .collect()
}

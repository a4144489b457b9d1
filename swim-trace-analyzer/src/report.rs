//! Text and JSON rendering of trace and RTT summaries.
//!
//! Summaries are computed first (`summarize_*`, serializable) and the text
//! renderers only format them, so both output formats agree on every value.

use std::fmt::Write;

use prettytable::{format, Cell, Row, Table};
use serde::Serialize;

use crate::analyzer::{rtt_values, samples_by_target, TraceAnalysis};
use crate::config::{
    idle_wait_buckets, idle_wait_phases, network_io_call_names, rtt_histogram_buckets,
    wait_histogram_buckets, LabeledBuckets, BAR_WIDTH, IDLE_WAIT_CALL,
};
use crate::histogram::Histogram;
use crate::model::LatencySample;
use crate::stats::Summary;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Serialize)]
pub struct NamedSummary {
    pub name: String,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseShare {
    pub phase: &'static str,
    pub meaning: &'static str,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LabeledHistogram {
    pub labels: Vec<&'static str>,
    pub histogram: Histogram,
}

impl LabeledHistogram {
    fn classify(layout: LabeledBuckets, values: &[f64]) -> Self {
        Self {
            histogram: Histogram::classify(&layout.bounds, values.iter().copied()),
            labels: layout.labels,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceSummary {
    pub file: String,
    pub total_calls: usize,
    /// Per call name, ascending. Durations in µs.
    pub calls: Vec<NamedSummary>,
    /// `None` when the trace has no idle-wait calls.
    pub idle_wait: Option<Vec<PhaseShare>>,
    pub network_io: Vec<NamedSummary>,
    /// Idle-wait durations in ms.
    pub wait_histogram: Option<LabeledHistogram>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RttSummary {
    pub file: String,
    /// `None` when the file had no RTT samples. Values in µs.
    pub summary: Option<Summary>,
    pub histogram: Option<LabeledHistogram>,
    pub peers: Vec<NamedSummary>,
}

pub fn summarize_trace(file: &str, analysis: &TraceAnalysis) -> TraceSummary {
    let calls: Vec<NamedSummary> = analysis
        .by_call
        .keys()
        .filter_map(|name| {
            let summary = Summary::from_values(&analysis.durations_micros(name)?)?;
            Some(NamedSummary {
                name: name.clone(),
                summary,
            })
        })
        .collect();

    let net_calls = network_io_call_names();
    let network_io = calls
        .iter()
        .filter(|c| net_calls.contains(c.name.as_str()))
        .cloned()
        .collect();

    let waits_ms = analysis
        .durations_millis(IDLE_WAIT_CALL)
        .filter(|w| !w.is_empty());

    TraceSummary {
        file: file.to_string(),
        total_calls: analysis.total_events(),
        calls,
        idle_wait: waits_ms.as_deref().map(classify_idle_waits),
        network_io,
        wait_histogram: waits_ms
            .as_deref()
            .map(|w| LabeledHistogram::classify(wait_histogram_buckets(), w)),
    }
}

/// Splits idle-wait durations (ms) into immediate/short/medium/long phases.
pub fn classify_idle_waits(waits_ms: &[f64]) -> Vec<PhaseShare> {
    let layout = idle_wait_buckets();
    let histogram = Histogram::classify(&layout.bounds, waits_ms.iter().copied());
    idle_wait_phases()
        .into_iter()
        .zip(histogram.counts.iter().zip(histogram.percentages()))
        .map(|((phase, meaning), (count, percent))| PhaseShare {
            phase,
            meaning,
            count: *count,
            percent,
        })
        .collect()
}

pub fn summarize_rtt(file: &str, samples: &[LatencySample]) -> RttSummary {
    let values = rtt_values(samples);
    let peers = samples_by_target(samples)
        .groups()
        .filter_map(|(target, vs)| {
            Some(NamedSummary {
                name: target.clone(),
                summary: Summary::from_values(vs)?,
            })
        })
        .collect();

    RttSummary {
        file: file.to_string(),
        summary: Summary::from_values(&values),
        histogram: (!values.is_empty())
            .then(|| LabeledHistogram::classify(rtt_histogram_buckets(), &values)),
        peers,
    }
}

fn rule() -> String { "=".repeat(RULE_WIDTH) }

fn banner<S: AsRef<str>>(out: &mut String, lines: &[S]) {
    let _ = writeln!(out, "{}", rule());
    for line in lines {
        let _ = writeln!(out, "{}", line.as_ref());
    }
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out);
}

pub fn build_table_title(key_name: &str) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(vec![
        Cell::new(key_name),
        Cell::new("Count"),
        Cell::new("Mean (µs)"),
        Cell::new("P50 (µs)"),
        Cell::new("P99 (µs)"),
        Cell::new("Max (µs)"),
    ]));
    table
}

fn row_from_summary(name: &str, s: &Summary) -> Row {
    let f = |v: f64| -> String { format!("{:.2}", v) };
    Row::new(vec![
        Cell::new(name),
        Cell::new(&format!("{}", s.count)),
        Cell::new(&f(s.mean)),
        Cell::new(&f(s.p50)),
        Cell::new(&f(s.p99)),
        Cell::new(&f(s.max)),
    ])
}

pub fn summary_table(key_name: &str, rows: &[NamedSummary]) -> Table {
    let mut table = build_table_title(key_name);
    for row in rows {
        table.add_row(row_from_summary(&row.name, &row.summary));
    }
    table
}

/// One line per bucket: label, a bar scaled to the fullest bucket, the count
/// and optionally the bucket's share of all values.
pub fn render_bars(hist: &LabeledHistogram, width: usize, with_percent: bool) -> String {
    let mut out = String::new();
    let bars = hist.histogram.bar_lengths(width);
    let percents = hist.histogram.percentages();
    for (i, label) in hist.labels.iter().enumerate() {
        let bar = "█".repeat(bars[i]);
        let count = hist.histogram.counts[i];
        let _ = match with_percent {
            true => writeln!(
                out,
                "  {:>12}: {:<width$} {:>5} ({:>5.1}%)",
                label, bar, count, percents[i]
            ),
            false => writeln!(out, "{:>12}: {:<width$} {}", label, bar, count),
        };
    }
    out
}

pub fn render_trace_report(summary: &TraceSummary) -> String {
    if summary.calls.is_empty() {
        return "No syscalls found in trace file\n".to_string();
    }

    let mut out = String::new();
    banner(
        &mut out,
        &[
            "SWIM Protocol Syscall Analysis".to_string(),
            format!("Trace file: {}", summary.file),
            format!("Total syscalls: {}", summary.total_calls),
        ],
    );

    let _ = writeln!(out, "{}", summary_table("Syscall", &summary.calls));

    banner(&mut out, &[format!("{IDLE_WAIT_CALL} Analysis (event loop efficiency)")]);
    match &summary.idle_wait {
        Some(phases) => {
            let _ = writeln!(out, "Wait time distribution:");
            for p in phases {
                let _ = writeln!(
                    out,
                    "  {:<21} {:>6} ({:>5.1}%) - {}",
                    format!("{}:", p.phase),
                    p.count,
                    p.percent,
                    p.meaning
                );
            }
            let _ = writeln!(out);
        }
        None => {
            let _ = writeln!(out, "No {IDLE_WAIT_CALL} calls in trace, no data\n");
        }
    }

    if !summary.network_io.is_empty() {
        banner(&mut out, &["Network I/O Analysis"]);
        for call in &summary.network_io {
            let _ = writeln!(out, "{}: {} calls", call.name, call.summary.count);
            let _ = writeln!(out, "  Mean: {:.2} µs", call.summary.mean);
            let _ = writeln!(out, "  Max:  {:.2} µs", call.summary.max);
            let _ = writeln!(out);
        }
    }

    banner(&mut out, &[format!("{IDLE_WAIT_CALL} Duration Histogram (ASCII)")]);
    match &summary.wait_histogram {
        Some(hist) => out.push_str(&render_bars(hist, BAR_WIDTH, false)),
        None => {
            let _ = writeln!(out, "No {IDLE_WAIT_CALL} calls in trace, no data");
        }
    }
    out
}

pub fn render_rtt_report(summary: &RttSummary) -> String {
    let mut out = String::new();
    let Some(s) = &summary.summary else {
        let _ = writeln!(out, "No RTT samples found in {}", summary.file);
        return out;
    };

    let _ = writeln!(out);
    banner(&mut out, &[format!("RTT Statistics: {}", summary.file)]);
    let _ = writeln!(out, "Samples:    {}", s.count);
    for (name, v) in [
        ("Min:", s.min),
        ("Max:", s.max),
        ("Mean:", s.mean),
        ("P50:", s.p50),
        ("P95:", s.p95),
        ("P99:", s.p99),
        ("Jitter:", s.jitter),
    ] {
        let _ = writeln!(out, "{:<11} {:.2} µs", name, v);
    }
    let _ = writeln!(out);

    if let Some(hist) = &summary.histogram {
        let _ = writeln!(out, "RTT Distribution:");
        out.push_str(&render_bars(hist, BAR_WIDTH, true));
        let _ = writeln!(out);
    }

    if !summary.peers.is_empty() {
        let _ = writeln!(out, "RTT by peer:");
        let _ = write!(out, "{}", summary_table("Peer", &summary.peers));
    }
    out
}

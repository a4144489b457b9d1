use std::collections::HashSet;

use crate::histogram::BucketBounds;

/// Call whose durations measure event-loop idle waits.
pub const IDLE_WAIT_CALL: &str = "epoll_wait";

pub const DEFAULT_JITTER_WINDOW: usize = 20;
pub const BAR_WIDTH: usize = 40;
pub const FREQUENCY_BINS: usize = 50;
pub const DEFAULT_CHART_PATH: &str = "latency_report.svg";

pub fn network_io_call_names() -> HashSet<&'static str> {
    let mut set = HashSet::new();
    set.insert("sendto");
    set.insert("recvfrom");
    set
}

/// A bucket layout with a caption per bucket.
#[derive(Debug, Clone)]
pub struct LabeledBuckets {
    pub bounds: BucketBounds,
    pub labels: Vec<&'static str>,
}

impl LabeledBuckets {
    fn new(edges: &[f64], labels: Vec<&'static str>) -> Self {
        let bounds = BucketBounds::new(edges).unwrap_or_else(|e| panic!("static bucket layout: {e}"));
        assert_eq!(bounds.len(), labels.len());
        Self { bounds, labels }
    }
}

/// Idle-wait phases in milliseconds, with what each phase says about the
/// event loop.
pub fn idle_wait_phases() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Immediate (<1ms)", "processing events"),
        ("Short (1-100ms)", "active communication"),
        ("Medium (100ms-1s)", "waiting for tick"),
        ("Long (>=1s)", "idle waiting"),
    ]
}

pub fn idle_wait_buckets() -> LabeledBuckets {
    let labels = idle_wait_phases().into_iter().map(|(name, _)| name).collect();
    LabeledBuckets::new(&[0.0, 1.0, 100.0, 1000.0, f64::INFINITY], labels)
}

/// `epoll_wait` duration histogram, milliseconds.
pub fn wait_histogram_buckets() -> LabeledBuckets {
    LabeledBuckets::new(
        &[0.0, 1.0, 10.0, 100.0, 500.0, 1000.0, f64::INFINITY],
        vec!["0-1ms", "1-10ms", "10-100ms", "100-500ms", "500ms-1s", ">1s"],
    )
}

/// RTT histogram, microseconds.
pub fn rtt_histogram_buckets() -> LabeledBuckets {
    LabeledBuckets::new(
        &[0.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0, f64::INFINITY],
        vec![
            "0-50µs",
            "50-100µs",
            "100-200µs",
            "200-500µs",
            "500µs-1ms",
            "1-2ms",
            "2-5ms",
            ">5ms",
        ],
    )
}

pub fn profile_enabled() -> bool {
    std::env::var("SWIM_TRACE_PROFILE")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One system call observed in an `strace -r -T` trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEvent {
    /// Relative timestamp printed at the start of the line, in seconds.
    pub offset_secs: f64,
    pub call: String,
    /// Time spent in the call, 0 when the line has no `<...>` suffix.
    pub duration_secs: f64,
    /// Raw return token, e.g. `1`, `-1`, `0x7f...`.
    pub result: String,
}

impl TraceEvent {
    pub fn duration_micros(&self) -> f64 { self.duration_secs * 1_000_000.0 }

    pub fn duration_millis(&self) -> f64 { self.duration_secs * 1_000.0 }
}

/// Where a sample's timestamp came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleTimestamp {
    /// Parsed from the log line.
    Logged(DateTime<Utc>),
    /// Processing time; only usable for index ordering.
    Synthesized(DateTime<Utc>),
}

impl SampleTimestamp {
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            SampleTimestamp::Logged(t) | SampleTimestamp::Synthesized(t) => *t,
        }
    }

    pub fn is_logged(&self) -> bool { matches!(self, SampleTimestamp::Logged(_)) }
}

/// One probe round trip reported by a node log.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySample {
    pub timestamp: SampleTimestamp,
    pub value_micros: f64,
    /// Peer address the ACK came from, verbatim.
    pub target: String,
    /// File or series the sample was read from.
    pub source_label: String,
}

/// Result of running a line through the grammar list.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Trace(TraceEvent),
    Latency(LatencySample),
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Percentile {
    P50,
    P95,
    P99,
}

impl Percentile {
    pub fn all_in_order() -> &'static [Percentile] {
        use Percentile::*;
        &[P50, P95, P99]
    }

    pub fn name(self) -> &'static str {
        match self {
            Percentile::P50 => "P50",
            Percentile::P95 => "P95",
            Percentile::P99 => "P99",
        }
    }

    pub fn q(self) -> f64 {
        match self {
            Percentile::P50 => 0.5,
            Percentile::P95 => 0.95,
            Percentile::P99 => 0.99,
        }
    }
}

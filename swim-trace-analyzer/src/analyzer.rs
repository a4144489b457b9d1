use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use crate::error::{AnalyzerError, Result};
use crate::io_utils::{for_each_line, open_input, source_label};
use crate::model::{LatencySample, ParsedLine, TraceEvent};
use crate::parser::LineParser;
use crate::store::EventStore;

#[derive(Debug, Default)]
pub struct TraceAnalysis {
    pub lines: usize,
    pub by_call: EventStore<String, TraceEvent>,
}

impl TraceAnalysis {
    pub fn total_events(&self) -> usize { self.by_call.total() }

    pub fn is_empty(&self) -> bool { self.by_call.is_empty() }

    pub fn durations_micros(&self, call: &str) -> Option<Vec<f64>> {
        self.by_call
            .group(call)
            .map(|events| events.iter().map(TraceEvent::duration_micros).collect())
    }

    pub fn durations_millis(&self, call: &str) -> Option<Vec<f64>> {
        self.by_call
            .group(call)
            .map(|events| events.iter().map(TraceEvent::duration_millis).collect())
    }
}

/// Groups every syscall line of a trace by call name.
pub fn analyze_trace<R: BufRead>(reader: R) -> std::io::Result<TraceAnalysis> {
    let mut parser = LineParser::default();
    let mut by_call = EventStore::new();
    let lines = for_each_line(reader, |line| {
        if let ParsedLine::Trace(event) = parser.parse_line(line) {
            by_call.add(event.call.clone(), event);
        }
    })?;
    let analysis = TraceAnalysis { lines, by_call };
    debug!(
        lines = analysis.lines,
        events = analysis.total_events(),
        calls = analysis.by_call.len(),
        "parsed trace"
    );
    Ok(analysis)
}

pub fn analyze_trace_file(path: &Path) -> Result<TraceAnalysis> {
    let reader = open_input(path)?;
    analyze_trace(reader).map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Extracts RTT samples from a node log, in file order.
pub fn collect_rtt_samples<R: BufRead>(reader: R, label: &str) -> std::io::Result<Vec<LatencySample>> {
    let mut parser = LineParser::new(label);
    let mut samples = Vec::new();
    let lines = for_each_line(reader, |line| {
        if let ParsedLine::Latency(sample) = parser.parse_line(line) {
            samples.push(sample);
        }
    })?;
    debug!(label, lines, samples = samples.len(), "parsed node log");
    Ok(samples)
}

pub fn collect_rtt_samples_from_file(path: &Path) -> Result<Vec<LatencySample>> {
    let reader = open_input(path)?;
    collect_rtt_samples(reader, &source_label(path)).map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn rtt_values(samples: &[LatencySample]) -> Vec<f64> { samples.iter().map(|s| s.value_micros).collect() }

/// Groups samples by the peer address they were measured against.
pub fn samples_by_target(samples: &[LatencySample]) -> EventStore<String, f64> {
    samples
        .iter()
        .map(|s| (s.target.clone(), s.value_micros))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = "\
     0.000000 epoll_wait(3, [], 1024, 1000) = 0 <1.000912>
     0.001012 recvfrom(5, \"\\x01\", 65536, 0, {sa_family=AF_INET}, [16]) = 42 <0.000011>
     0.000054 sendto(5, \"\\x02\", 42, 0, {sa_family=AF_INET}, 16) = 42 <0.000023>
     0.000031 epoll_wait(3, [{EPOLLIN, {u32=5, u64=5}}], 1024, 999) = 1 <0.000420>
strace: Process 4242 attached
     0.000009 epoll_wait(3, [], 1024, 0) = 0 <0.000002>
";

    #[test]
    fn test_analyze_trace_groups_calls() {
        let analysis = analyze_trace(TRACE.as_bytes()).unwrap();
        assert_eq!(analysis.lines, 6);
        assert_eq!(analysis.total_events(), 5);
        let calls: Vec<&str> = analysis.by_call.keys().map(String::as_str).collect();
        assert_eq!(calls, ["epoll_wait", "recvfrom", "sendto"]);

        let waits = analysis.durations_millis("epoll_wait").unwrap();
        assert_eq!(waits.len(), 3);
        assert!((waits[0] - 1000.912).abs() < 1e-9);
        assert!(analysis.durations_micros("write").is_none());
    }

    #[test]
    fn test_collect_rtt_samples() {
        let log = "\
2024-01-15T10:30:45.000001Z  INFO swim_rs::protocol::node: Sent PING seq=1 to 127.0.0.1:9001
2024-01-15T10:30:45.000301Z  INFO swim_rs::protocol::node: Received ACK seq=1 from 127.0.0.1:9001 (RTT: 300µs)
2024-01-15T10:30:46.000301Z  INFO swim_rs::protocol::node: Received ACK seq=2 from 127.0.0.1:9002 (RTT: 1.2ms)
2024-01-15T10:30:47.000301Z  INFO swim_rs::protocol::node: Received ACK seq=3 from 127.0.0.1:9001 (no matching probe)
";
        let samples = collect_rtt_samples(log.as_bytes(), "node_9000").unwrap();
        assert_eq!(rtt_values(&samples), vec![300.0, 1200.0]);
        assert!(samples.iter().all(|s| s.source_label == "node_9000"));

        let by_target = samples_by_target(&samples);
        assert_eq!(by_target.group("127.0.0.1:9001"), Some(&[300.0][..]));
        assert_eq!(by_target.group("127.0.0.1:9002"), Some(&[1200.0][..]));
    }

    #[test]
    fn test_empty_input() {
        let analysis = analyze_trace(&b""[..]).unwrap();
        assert!(analysis.is_empty());
        assert!(collect_rtt_samples(&b"nothing here\n"[..], "x").unwrap().is_empty());
    }
}

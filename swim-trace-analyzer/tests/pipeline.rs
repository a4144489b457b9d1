use std::fs;
use std::path::Path;

use swim_trace_analyzer::analyzer::{analyze_trace_file, collect_rtt_samples_from_file, rtt_values};
use swim_trace_analyzer::chart::{build_latency_chart, ChartView, Palette};
use swim_trace_analyzer::io_utils::{expand_inputs, source_label};
use swim_trace_analyzer::render::{select_renderer, RenderOutcome};
use swim_trace_analyzer::report::{render_rtt_report, render_trace_report, summarize_rtt, summarize_trace};
use swim_trace_analyzer::store::EventStore;
use swim_trace_analyzer::AnalyzerError;

const TRACE: &str = "\
     0.000000 epoll_create1(EPOLL_CLOEXEC) = 3 <0.000012>
     0.000123 epoll_wait(3, {}, 10, -1) = 1 <0.000045>
     0.000050 recvfrom(4, \"\\x01\\x00\", 65536, 0, {sa_family=AF_INET, sin_port=htons(9001)}, [16]) = 24 <0.000009>
     0.000040 sendto(4, \"\\x02\\x00\", 24, 0, {sa_family=AF_INET, sin_port=htons(9001)}, 16) = 24 <0.000017>
     0.000031 epoll_wait(3, [], 10, 1000) = 0 <1.001045>
     0.000022 epoll_wait(3, [], 10, 250) = 0 <0.250101>
     0.000015 epoll_wait(3, [{EPOLLIN, {u32=4, u64=4}}], 10, 750) = 1 <0.012000>
+++ exited with 0 +++
";

fn node_log(port: u16, rtts: &[&str]) -> String {
    let mut log = String::new();
    for (seq, rtt) in rtts.iter().enumerate() {
        log.push_str(&format!(
            "2024-01-15T10:30:{:02}.000100Z  INFO swim_rs::protocol::node: Sent PING seq={seq} to 127.0.0.1:{port}\n",
            seq % 60
        ));
        log.push_str(&format!(
            "2024-01-15T10:30:{:02}.000400Z  INFO swim_rs::protocol::node: Received ACK seq={seq} from 127.0.0.1:{port} (RTT: {rtt})\n",
            seq % 60
        ));
    }
    log
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn trace_file_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "syscalls_9000.log", TRACE);

    let analysis = analyze_trace_file(&path).unwrap();
    assert_eq!(analysis.total_events(), 7);

    let summary = summarize_trace("syscalls_9000.log", &analysis);
    let epoll = summary.calls.iter().find(|c| c.name == "epoll_wait").unwrap();
    assert_eq!(epoll.summary.count, 4);

    let phases = summary.idle_wait.as_ref().unwrap();
    let counts: Vec<usize> = phases.iter().map(|p| p.count).collect();
    assert_eq!(counts, vec![1, 1, 1, 1]);

    let report = render_trace_report(&summary);
    assert!(report.contains("Trace file: syscalls_9000.log"));
    assert!(report.contains("Network I/O Analysis"));
    assert!(report.contains("recvfrom: 1 calls"));
    assert!(report.contains("epoll_wait Duration Histogram (ASCII)"));
}

#[test]
fn missing_inputs_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "node_9000.log", &node_log(9001, &["120µs", "1.5ms"]));
    write(dir.path(), "node_9001.log", &node_log(9000, &["80us", "250000ns", "2ms"]));
    write(dir.path(), "notes.txt", "Received ACK seq=1 from 127.0.0.1:9 (RTT: 1us)\n");

    let pattern = format!("{}/node_*.log", dir.path().display());
    let missing = dir.path().join("node_9002.log").display().to_string();
    let inputs = expand_inputs(&[pattern, missing]);
    assert_eq!(inputs.len(), 3);

    let mut series: EventStore<String, f64> = EventStore::new();
    let mut skipped = 0;
    for path in &inputs {
        match collect_rtt_samples_from_file(path) {
            Ok(samples) => {
                for v in rtt_values(&samples) {
                    series.add(source_label(path), v);
                }
            }
            Err(AnalyzerError::MissingFile(_)) => skipped += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(skipped, 1);
    assert_eq!(series.group("node_9000"), Some(&[120.0, 1500.0][..]));
    assert_eq!(series.group("node_9001"), Some(&[80.0, 250.0, 2000.0][..]));
}

#[test]
fn empty_log_reports_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "quiet.log", "2024-01-15T10:30:00Z  INFO Node started on 127.0.0.1:9000\n");
    let samples = collect_rtt_samples_from_file(&path).unwrap();
    let report = render_rtt_report(&summarize_rtt("quiet.log", &samples));
    assert_eq!(report, "No RTT samples found in quiet.log\n");
}

#[test]
fn chart_written_for_collected_series() {
    let dir = tempfile::tempdir().unwrap();
    let rtts: Vec<String> = (0..45).map(|i| format!("{}µs", 100 + (i * 37) % 200)).collect();
    let rtt_refs: Vec<&str> = rtts.iter().map(String::as_str).collect();
    let path = write(dir.path(), "node_9000.log", &node_log(9001, &rtt_refs));

    let samples = collect_rtt_samples_from_file(&path).unwrap();
    assert_eq!(samples.len(), 45);
    let series: EventStore<String, f64> = samples
        .iter()
        .map(|s| (s.source_label.clone(), s.value_micros))
        .collect();

    let chart = build_latency_chart(&series, 20, Palette::TAB10);
    let jitter = chart.panel(ChartView::RollingJitter).unwrap();
    assert_eq!(jitter.series[0].points.len(), 25);

    let out = dir.path().join("latency_report.svg");
    let outcome = select_renderer().render(&chart, Some(&out)).unwrap();
    if cfg!(feature = "chart") {
        assert_eq!(outcome, RenderOutcome::Written(out.clone()));
        assert!(fs::read_to_string(&out).unwrap().starts_with("<svg"));
    } else {
        assert_eq!(outcome, RenderOutcome::Skipped);
    }
}

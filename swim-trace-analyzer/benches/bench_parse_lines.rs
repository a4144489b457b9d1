use criterion::{black_box, criterion_group, criterion_main, Criterion};

use swim_trace_analyzer::analyzer::{analyze_trace, collect_rtt_samples};
use swim_trace_analyzer::parser::LineParser;
use swim_trace_analyzer::stats::{rolling_jitter, Summary};

fn trace_text(lines: usize) -> String {
    let mut s = String::new();
    for i in 0..lines {
        match i % 3 {
            0 => s.push_str("     0.000123 epoll_wait(3, [], 1024, 1000) = 0 <0.250045>\n"),
            1 => s.push_str("     0.000040 sendto(4, \"\\x02\", 24, 0, {sa_family=AF_INET}, 16) = 24 <0.000017>\n"),
            _ => s.push_str("strace: Process 4242 detached\n"),
        }
    }
    s
}

fn log_text(lines: usize) -> String {
    let mut s = String::new();
    for i in 0..lines {
        s.push_str(&format!(
            "2024-01-15T10:30:45.{:06}Z  INFO swim_rs::protocol::node: Received ACK seq={i} from 127.0.0.1:9001 (RTT: {}.{}µs)\n",
            i % 1_000_000,
            100 + i % 400,
            i % 100
        ));
        s.push_str("2024-01-15T10:30:45.000000Z  INFO swim_rs::protocol::node: Sent PING seq=1 to 127.0.0.1:9001\n");
    }
    s
}

fn bench_parse_lines(c: &mut Criterion) {
    let trace = trace_text(10_000);
    let log = log_text(10_000);

    c.bench_function("parse_line syscall", |b| {
        let mut parser = LineParser::default();
        b.iter(|| parser.parse_line(black_box("  0.000123 epoll_wait(3, {}, 10, -1) = 1 <0.000045>")))
    });
    c.bench_function("analyze_trace 10k lines", |b| {
        b.iter(|| analyze_trace(black_box(trace.as_bytes())).unwrap())
    });
    c.bench_function("collect_rtt_samples 20k lines", |b| {
        b.iter(|| collect_rtt_samples(black_box(log.as_bytes()), "node_9000").unwrap())
    });

    let values: Vec<f64> = (0..10_000).map(|i| 100.0 + (i * 37 % 400) as f64).collect();
    c.bench_function("summary 10k values", |b| b.iter(|| Summary::from_values(black_box(&values))));
    c.bench_function("rolling_jitter 10k values", |b| {
        b.iter(|| rolling_jitter(black_box(&values), 20))
    });
}

criterion_group!(benches, bench_parse_lines);
criterion_main!(benches);

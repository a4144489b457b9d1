//! Line recognition for `strace -r -T` traces and SWIM node logs.
//!
//! Every line is offered to the grammars in [`GRAMMARS`] order. The first
//! grammar whose pattern matches decides the outcome: it either produces an
//! event or, when one of its sub-tokens does not parse, drops the line.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::trace;

use crate::duration::normalize;
use crate::error::AnalyzerError;
use crate::model::{LatencySample, ParsedLine, SampleTimestamp, TraceEvent};

const ACK_MARKER: &str = "Received ACK";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `<rel-secs> <call>(<args>) = <result> [<<secs>>]`
    Syscall,
    /// `<iso-timestamp> ... Received ACK ... from <addr> (RTT: <token>)`
    TimestampedAck,
    /// The ACK phrase without a timestamp.
    BareAck,
}

pub const GRAMMARS: [Grammar; 3] = [Grammar::Syscall, Grammar::TimestampedAck, Grammar::BareAck];

enum Attempt {
    Matched(ParsedLine),
    Malformed(AnalyzerError),
    NoMatch,
}

pub struct LineParser {
    source_label: String,
    clock: fn() -> DateTime<Utc>,
    last_synthesized: Option<DateTime<Utc>>,
}

impl Default for LineParser {
    fn default() -> Self { Self::new("") }
}

impl LineParser {
    pub fn new(source_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            clock: Utc::now,
            last_synthesized: None,
        }
    }

    /// Replaces the clock used for lines without a timestamp.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn parse_line(&mut self, line: &str) -> ParsedLine {
        for grammar in GRAMMARS {
            match self.attempt(grammar, line) {
                Attempt::Matched(parsed) => return parsed,
                Attempt::Malformed(err) => {
                    trace!(?grammar, %err, "dropping line");
                    return ParsedLine::Unrecognized;
                }
                Attempt::NoMatch => {}
            }
        }
        ParsedLine::Unrecognized
    }

    fn attempt(&mut self, grammar: Grammar, line: &str) -> Attempt {
        match grammar {
            Grammar::Syscall => parse_syscall(line),
            Grammar::TimestampedAck | Grammar::BareAck if !line.contains(ACK_MARKER) => {
                Attempt::NoMatch
            }
            Grammar::TimestampedAck => self.parse_timestamped_ack(line),
            Grammar::BareAck => self.parse_bare_ack(line),
        }
    }

    fn parse_timestamped_ack(&self, line: &str) -> Attempt {
        let Some(caps) = regex!(
            r"(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})?).*?Received ACK.*?from\s+([^\s(]+)\s*\(RTT:\s*([^)]+)\)"
        )
        .captures(line) else {
            return Attempt::NoMatch;
        };

        let Some(logged) = parse_log_timestamp(&caps[1]) else {
            return Attempt::Malformed(AnalyzerError::MalformedLine(format!(
                "bad timestamp '{}'",
                &caps[1]
            )));
        };
        self.sample(SampleTimestamp::Logged(logged), &caps[2], &caps[3])
    }

    fn parse_bare_ack(&mut self, line: &str) -> Attempt {
        let Some(caps) = regex!(r"Received ACK.*?from\s+([^\s(]+)\s*\(RTT:\s*([^)]+)\)").captures(line)
        else {
            return Attempt::NoMatch;
        };

        let timestamp = SampleTimestamp::Synthesized(self.synthesize_timestamp());
        self.sample(timestamp, &caps[1], &caps[2])
    }

    fn sample(&self, timestamp: SampleTimestamp, target: &str, rtt: &str) -> Attempt {
        match normalize(rtt) {
            Ok(value_micros) => Attempt::Matched(ParsedLine::Latency(LatencySample {
                timestamp,
                value_micros,
                target: target.to_string(),
                source_label: self.source_label.clone(),
            })),
            Err(err) => Attempt::Malformed(err),
        }
    }

    /// Processing time, never earlier than a previously synthesized value.
    fn synthesize_timestamp(&mut self) -> DateTime<Utc> {
        let now = (self.clock)();
        let ts = match self.last_synthesized {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_synthesized = Some(ts);
        ts
    }
}

fn parse_syscall(line: &str) -> Attempt {
    let Some(caps) = regex!(r"^\s*(\d+(?:\.\d+)?)\s+(\w+)\(.*\)\s*=\s*([^\s<]+)").captures(line)
    else {
        return Attempt::NoMatch;
    };

    let Ok(offset_secs) = caps[1].parse::<f64>() else {
        return Attempt::Malformed(AnalyzerError::MalformedLine(format!(
            "bad relative timestamp '{}'",
            &caps[1]
        )));
    };

    let duration_secs = match regex!(r"<(\d+(?:\.\d+)?)>\s*$").captures(line) {
        Some(d) => match d[1].parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                return Attempt::Malformed(AnalyzerError::MalformedLine(format!(
                    "bad duration '{}'",
                    &d[1]
                )))
            }
        },
        None => 0.0,
    };

    Attempt::Matched(ParsedLine::Trace(TraceEvent {
        offset_secs,
        call: caps[2].to_string(),
        duration_secs,
        result: caps[3].to_string(),
    }))
}

fn parse_log_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| t.and_utc())
}

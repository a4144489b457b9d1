extern crate swim_trace_analyzer;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use swim_trace_analyzer::analyzer::{analyze_trace_file, TraceAnalysis};
use swim_trace_analyzer::cli::{init_logging, warn_skipped, OutputFormat};
use swim_trace_analyzer::config::profile_enabled;
use swim_trace_analyzer::io_utils::display_name;
use swim_trace_analyzer::report::{render_trace_report, summarize_trace};
use swim_trace_analyzer::AnalyzerError;

#[derive(Parser, Debug)]
#[command(about = "Analyze strace output of a SWIM node to show epoll performance and syscall latency")]
struct Args {
    /// Trace recorded with `strace -r -T`, e.g. traces/syscalls_9000.log
    trace: PathBuf,

    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    init_logging();
    let profile_enabled = profile_enabled();
    let t0 = Instant::now();

    let args = Args::parse();
    let file = display_name(&args.trace);

    let analysis = match analyze_trace_file(&args.trace) {
        Ok(analysis) => analysis,
        Err(e @ (AnalyzerError::MissingFile(_) | AnalyzerError::Io { .. })) => {
            warn_skipped(&e, args.format);
            TraceAnalysis::default()
        }
        Err(e) => return Err(e.into()),
    };
    if profile_enabled {
        eprintln!("[profile] parse trace: {:.3}s", t0.elapsed().as_secs_f64());
    }

    let t_report = Instant::now();
    let summary = summarize_trace(&file, &analysis);
    match args.format {
        OutputFormat::Table => print!("{}", render_trace_report(&summary)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }
    if profile_enabled {
        eprintln!("[profile] summarize/print: {:.3}s", t_report.elapsed().as_secs_f64());
        eprintln!("[profile] total main: {:.3}s", t0.elapsed().as_secs_f64());
    }

    Ok(())
}

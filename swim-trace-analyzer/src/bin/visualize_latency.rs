extern crate swim_trace_analyzer;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use swim_trace_analyzer::analyzer::collect_rtt_samples_from_file;
use swim_trace_analyzer::chart::{chart_for_samples, Palette};
use swim_trace_analyzer::cli::{init_logging, warn_skipped, OutputFormat};
use swim_trace_analyzer::config::{profile_enabled, DEFAULT_JITTER_WINDOW};
use swim_trace_analyzer::io_utils::{display_name, expand_inputs, source_label};
use swim_trace_analyzer::render::{check_chart_path, select_renderer, RenderOutcome};
use swim_trace_analyzer::report::{render_rtt_report, summarize_rtt};
use swim_trace_analyzer::store::EventStore;
use swim_trace_analyzer::AnalyzerError;

#[derive(Parser, Debug)]
#[command(about = "Visualize SWIM protocol latency: RTT distribution, latency over time and jitter")]
struct Args {
    /// Node log files to analyze; glob patterns are expanded
    #[arg(required = true)]
    files: Vec<String>,

    /// Output file for the chart, must end in .svg
    #[arg(short = 'o', long = "output", value_parser = parse_output)]
    output: Option<PathBuf>,

    /// Skip plotting, only print stats
    #[arg(long = "no-plot")]
    no_plot: bool,

    /// Samples per rolling jitter window
    #[arg(
        short = 'w',
        long = "window",
        env = "SWIM_JITTER_WINDOW",
        default_value_t = DEFAULT_JITTER_WINDOW,
        value_parser = parse_window
    )]
    window: usize,

    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

fn parse_window(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("window must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_output(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    check_chart_path(&path).map_err(|e| e.to_string())?;
    Ok(path)
}

fn main() -> Result<()> {
    init_logging();
    let profile_enabled = profile_enabled();
    let t0 = Instant::now();

    let args = Args::parse();
    let json = args.format == OutputFormat::Json;

    let mut series: EventStore<String, f64> = EventStore::new();
    let mut summaries = Vec::new();
    for path in expand_inputs(&args.files) {
        let samples = match collect_rtt_samples_from_file(&path) {
            Ok(samples) => samples,
            Err(e @ (AnalyzerError::MissingFile(_) | AnalyzerError::Io { .. })) => {
                warn_skipped(&e, args.format);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let summary = summarize_rtt(&display_name(&path), &samples);
        if !json {
            print!("{}", render_rtt_report(&summary));
        }
        summaries.push(summary);

        let label = source_label(&path);
        for sample in &samples {
            series.add(label.clone(), sample.value_micros);
        }
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }
    if profile_enabled {
        eprintln!("[profile] parse/summarize {} files: {:.3}s", summaries.len(), t0.elapsed().as_secs_f64());
    }

    if args.no_plot {
        return Ok(());
    }

    let t_render = Instant::now();
    let chart = match chart_for_samples(&series, args.window, Palette::TAB10) {
        Ok(chart) => chart,
        Err(e @ AnalyzerError::EmptyResult(_)) => {
            eprintln!("\n{e}, no chart written");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let renderer = select_renderer();
    match renderer.render(&chart, args.output.as_deref()) {
        Ok(RenderOutcome::Written(path)) => eprintln!("\nChart saved to: {}", path.display()),
        Ok(RenderOutcome::Skipped) => {}
        Err(e) => {
            eprintln!("\n{e}");
            eprintln!("Skipping graphical visualization.");
        }
    }
    if profile_enabled {
        eprintln!("[profile] render chart: {:.3}s", t_render.elapsed().as_secs_f64());
    }

    Ok(())
}

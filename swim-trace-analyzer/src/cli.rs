use std::io::IsTerminal;

use clap::ValueEnum;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::error::AnalyzerError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and ASCII histograms
    #[default]
    Table,
    /// Pretty-printed JSON summaries
    Json,
}

/// Logs go to stderr so stdout only carries the report. `RUST_LOG` overrides
/// the default `warn` level. Colors only when stderr is a terminal.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

pub fn skip_notice(err: &AnalyzerError) -> String { format!("Warning: {err}, skipping") }

/// Reports an input that could not be read. The notice is printed regardless
/// of the log filter: on stdout next to the text report, on stderr when
/// stdout carries JSON.
pub fn warn_skipped(err: &AnalyzerError, format: OutputFormat) {
    warn!("{err}, skipping");
    match format {
        OutputFormat::Table => println!("{}", skip_notice(err)),
        OutputFormat::Json => eprintln!("{}", skip_notice(err)),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_skip_notice() {
        let err = AnalyzerError::MissingFile(PathBuf::from("nope.log"));
        assert_eq!(skip_notice(&err), "Warning: nope.log not found, skipping");
    }
}

//! Offline analysis of SWIM node artifacts: `strace -r -T` syscall traces and
//! node logs carrying `Received ACK ... (RTT: ...)` lines.

#[macro_use]
mod macros;

pub mod analyzer;
pub mod chart;
pub mod cli;
pub mod config;
pub mod duration;
pub mod error;
pub mod histogram;
pub mod io_utils;
pub mod model;
pub mod parser;
pub mod render;
pub mod report;
pub mod stats;
pub mod store;

pub use error::{AnalyzerError, Result};

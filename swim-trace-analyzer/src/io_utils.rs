use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use glob::glob;
use tracing::warn;

use crate::error::{AnalyzerError, Result};

/// Opens `path` for line-by-line reading.
pub fn open_input(path: &Path) -> Result<BufReader<File>> {
    if !path.is_file() {
        return Err(AnalyzerError::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => AnalyzerError::MissingFile(path.to_path_buf()),
        _ => AnalyzerError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(BufReader::new(file))
}

/// Calls `f` on every line with the trailing newline removed. Invalid UTF-8
/// is replaced rather than treated as an error, since traces quote raw
/// buffers. Returns the number of lines read.
pub fn for_each_line<R: BufRead>(mut reader: R, mut f: impl FnMut(&str)) -> std::io::Result<usize> {
    let mut buf = Vec::new();
    let mut lines = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(lines);
        }
        lines += 1;
        let text = String::from_utf8_lossy(&buf);
        f(text.trim_end_matches(&['\n', '\r'][..]));
    }
}

/// Expands arguments containing glob metacharacters. Patterns that match
/// nothing, and plain paths, are passed through so the caller can report them
/// as missing.
pub fn expand_inputs<S: AsRef<str>>(args: &[S]) -> Vec<PathBuf> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        let arg = arg.as_ref();
        if !arg.contains(&['*', '?', '['][..]) {
            out.push(PathBuf::from(arg));
            continue;
        }
        let mut matched: Vec<PathBuf> = match glob(arg) {
            Ok(paths) => paths.filter_map(|entry| entry.ok()).collect(),
            Err(e) => {
                warn!(pattern = arg, error = %e, "invalid glob pattern");
                Vec::new()
            }
        };
        if matched.is_empty() {
            out.push(PathBuf::from(arg));
        } else {
            matched.sort();
            out.append(&mut matched);
        }
    }
    out
}

/// Series label for a file: its name without the extension.
pub fn source_label(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// File name for report headers.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

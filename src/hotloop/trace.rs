use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};

lazy_static! {
    /// Trace files written by the C simulation testbench.
    static ref TRACE_FILE: Regex = Regex::new(r"^trace-.*\.json$").unwrap();
}

/// Directory of the trace files, relative to the solution directory.
const TRACE_DIR: &str = "sim/wrapc_pc";

/// One record of a trace file. Only the line number is used.
#[derive(Debug, Deserialize)]
struct TraceEntry {
    line: u32,
}

/// Find all trace files of a solution. Returns an empty list if the trace
/// directory does not exist.
pub fn find_traces(solution_dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = solution_dir.join(TRACE_DIR);
    if !dir.is_dir() {
        return Ok(vec![]);
    }

    let mut acc = vec![];
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        let matches = path.file_name()
                          .and_then(|n| n.to_str())
                          .map_or(false, |n| TRACE_FILE.is_match(n));
        if matches && path.is_file() {
            acc.push(path);
        }
    }

    acc.sort();
    return Ok(acc);
}

/// Parse a trace, keeping only the executed line numbers in order. A run that
/// recorded nothing is written as `null`.
pub fn parse_trace(content: &str) -> std::result::Result<Vec<u32>, serde_json::Error> {
    let entries: Option<Vec<TraceEntry>> = serde_json::from_str(content)?;
    Ok(entries.unwrap_or_default().into_iter().map(|e| e.line).collect())
}

/// Read a trace file from disk.
pub fn read_trace(path: &Path) -> Result<Vec<u32>> {
    let malformed = |reason: String| Error::MalformedTrace { path: path.to_path_buf(), reason };

    let content = fs::read_to_string(path).map_err(|e| malformed(e.to_string()))?;
    parse_trace(&content).map_err(|e| malformed(e.to_string()))
}

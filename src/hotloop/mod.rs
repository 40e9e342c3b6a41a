// Finding the hottest loop of a module.
//
// The candidate pass lists every top-level loop with its line range. Each
// trace file records the source lines executed during one run of the C
// simulation, so a loop is hot if it shows up in many traces.

mod candidate;
mod select;
mod trace;

pub use candidate::LoopCandidate;
pub use select::{Occurrence, Score, Selection, Selector};
pub use trace::{find_traces, parse_trace, read_trace};

use std::fs;
use std::path::Path;
use log::{debug, info};

use crate::error::{Error, Result};

/// Read the candidate report written by the candidate pass.
pub fn read_candidates(report: &Path) -> Result<Vec<LoopCandidate>> {
    let content = fs::read_to_string(report)?;
    let candidates = LoopCandidate::parse_report(&content)?;
    if candidates.is_empty() {
        return Err(Error::NoCandidates);
    }
    info!("Candidate loops found: {}", candidates.iter()
                                                  .map(|c| c.name.as_str())
                                                  .collect::<Vec<_>>()
                                                  .join(", "));
    return Ok(candidates);
}

/// Find the hottest loop among the candidates in REPORT using the traces in
/// SOLUTION_DIR.
pub fn identify_hotloop(report: &Path, solution_dir: &Path, score: &dyn Score) -> Result<Selection> {
    let candidates = read_candidates(report)?;
    let mut selector = Selector::new(candidates, score)?;

    let traces = find_traces(solution_dir)?;
    if traces.is_empty() {
        return Err(Error::NoTraces);
    }

    // Each trace is read, counted & dropped
    for path in &traces {
        debug!("Counting trace {:?}", path);
        let trace = read_trace(path)?;
        selector.observe(&trace);
    }
    info!("Counted {} trace files", traces.len());

    selector.select()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_trace(solution: &Path, name: &str, lines: &[u32]) {
        let dir = solution.join("sim/wrapc_pc");
        fs::create_dir_all(&dir).unwrap();
        let entries: Vec<String> = lines.iter()
                                        .map(|l| format!(r#"{{"line": {}, "column": 1}}"#, l))
                                        .collect();
        fs::write(dir.join(name), format!("[{}]", entries.join(", "))).unwrap();
    }

    #[test]
    fn test_identify_hotloop() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("loop-analysis.txt");
        fs::write(&report, "IF_LOOP 5 8\nELSE_LOOP 10 13\n").unwrap();
        write_trace(dir.path(), "trace-3.json", &[3, 5, 6, 5, 6, 15]);
        write_trace(dir.path(), "trace-4.json", &[3, 10, 11, 15]);
        write_trace(dir.path(), "trace-5.json", &[3, 10, 11, 15]);

        let selection = identify_hotloop(&report, dir.path(), &Occurrence).unwrap();
        assert_eq!(selection.hottest.name, "ELSE_LOOP");
        assert_eq!(selection.hottest.occurrence, 2);
        assert_eq!(selection.ties, 1);
    }

    #[test]
    fn test_empty_run_still_counts_as_trace() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("loop-analysis.txt");
        fs::write(&report, "IF_LOOP 5 8\n").unwrap();
        let traces = dir.path().join("sim/wrapc_pc");
        fs::create_dir_all(&traces).unwrap();
        fs::write(traces.join("trace-1.json"), "null").unwrap();

        let selection = identify_hotloop(&report, dir.path(), &Occurrence).unwrap();
        assert_eq!(selection.hottest.name, "IF_LOOP");
        assert_eq!(selection.hottest.occurrence, 0);
    }

    #[test]
    fn test_empty_report() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("loop-analysis.txt");
        fs::write(&report, "\n").unwrap();
        write_trace(dir.path(), "trace-1.json", &[1]);

        let result = identify_hotloop(&report, dir.path(), &Occurrence);
        assert!(matches!(result, Err(Error::NoCandidates)));
    }

    #[test]
    fn test_missing_traces() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("loop-analysis.txt");
        fs::write(&report, "L 1 4\n").unwrap();

        let result = identify_hotloop(&report, dir.path(), &Occurrence);
        assert!(matches!(result, Err(Error::NoTraces)));
    }

    #[test]
    fn test_malformed_report_is_fatal() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("loop-analysis.txt");
        fs::write(&report, "L 1 4\nM 5\n").unwrap();
        write_trace(dir.path(), "trace-1.json", &[1]);

        let result = identify_hotloop(&report, dir.path(), &Occurrence);
        assert!(matches!(result, Err(Error::MalformedRecord(_))));
    }
}

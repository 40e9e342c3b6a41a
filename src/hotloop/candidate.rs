use std::fmt;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A top-level loop reported by the candidate pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopCandidate {
    pub name: String,
    pub line_range: (u32, u32),     // Inclusive, min <= max
    pub occurrence: u64,            // Number of traces the loop appears in
}

impl LoopCandidate {
    /// Create a candidate that has not been seen in any trace yet.
    pub fn new(name: &str, min_line: u32, max_line: u32) -> Result<Self> {
        if min_line > max_line {
            return Err(Error::MalformedRecord(
                format!("{} {} {}", name, min_line, max_line)
            ));
        }
        return Ok(Self { name: name.to_string(), line_range: (min_line, max_line), occurrence: 0 });
    }

    /// Parse one `name min_line max_line` record of the candidate report.
    pub fn parse(line: &str) -> Result<Self> {
        let malformed = || Error::MalformedRecord(line.trim().to_string());

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [name, min_line, max_line] = tokens.as_slice() else {
            return Err(malformed());
        };
        let min_line = min_line.parse::<u32>().map_err(|_| malformed())?;
        let max_line = max_line.parse::<u32>().map_err(|_| malformed())?;

        Self::new(name, min_line, max_line).map_err(|_| malformed())
    }

    /// Parse the whole candidate report. Blank lines are skipped, any other
    /// bad record fails the whole report.
    pub fn parse_report(report: &str) -> Result<Vec<Self>> {
        report.lines()
              .filter(|l| !l.trim().is_empty())
              .map(Self::parse)
              .collect()
    }

    /// True if LINE is inside the loop's line range.
    pub fn contains(&self, line: u32) -> bool {
        let (min, max) = self.line_range;
        return min <= line && line <= max;
    }

    /// True if the loop executed at least once in TRACE.
    pub fn appears_in(&self, trace: &[u32]) -> bool {
        trace.iter().any(|l| self.contains(*l))
    }

    /// The loop with the highest temperature is the hottest one.
    pub fn temperature(&self) -> u64 {
        self.occurrence
    }
}

impl fmt::Display for LoopCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = self.line_range;
        write!(f, "{} (lines {}-{}, occurrence {})", self.name, min, max, self.occurrence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record() {
        let candidate = LoopCandidate::parse("loopA 10 20").unwrap();
        assert_eq!(candidate, LoopCandidate {
            name: "loopA".to_string(),
            line_range: (10, 20),
            occurrence: 0,
        });
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        let candidate = LoopCandidate::parse("  IF_LOOP\t5   9\n").unwrap();
        assert_eq!(candidate.name, "IF_LOOP");
        assert_eq!(candidate.line_range, (5, 9));
    }

    #[test]
    fn test_parse_malformed_records() {
        for record in ["loopA 10", "loopA ten 20", "loopA 10 20 30", "loopA -1 20", "", "loopA 20 10"] {
            assert!(
                matches!(LoopCandidate::parse(record), Err(Error::MalformedRecord(_))),
                "accepted '{}'", record
            );
        }
    }

    #[test]
    fn test_parse_report() {
        let loops = LoopCandidate::parse_report("IF_LOOP 5 8\n\nELSE_LOOP 10 13\n").unwrap();
        assert_eq!(loops.len(), 2);
        assert_eq!(loops[1].name, "ELSE_LOOP");

        let bad = LoopCandidate::parse_report("IF_LOOP 5 8\nELSE_LOOP 10\n");
        assert!(matches!(bad, Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn test_appears_in_is_inclusive() {
        let candidate = LoopCandidate::new("loop", 10, 20).unwrap();
        assert!(candidate.appears_in(&[1, 2, 10]));
        assert!(candidate.appears_in(&[20]));
        assert!(!candidate.appears_in(&[9, 21, 100]));
        assert!(!candidate.appears_in(&[]));
    }

    #[test]
    fn test_temperature_is_occurrence() {
        let mut candidate = LoopCandidate::new("loop", 1, 2).unwrap();
        candidate.occurrence = 7;
        assert_eq!(candidate.temperature(), 7);
    }
}

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::data::SweepResult;
use crate::backend::SynthOutput;
use crate::error::{Error, Result};

lazy_static! {
    /// Last record of the latency report, e.g. `$TOTAL_EXECUTE_TIME = "2345"`.
    /// The count is delimited by either quotes or parentheses.
    static ref LATENCY: Regex = {
        let mut pattern = "".to_string();
        pattern.push_str(r" = ");
        pattern.push_str(r#"(?:\((\d+)\)|"(\d+)")"#);
        pattern.push_str(r"\s*$");
        Regex::new(&pattern).unwrap()
    };
}

/// Extract the total latency from the last record of a latency report.
pub fn parse_latency(factor: u32, report: &str) -> Result<u64> {
    let malformed = || Error::MalformedLatencyReport { factor };

    let last = report.lines()
                     .rev()
                     .find(|l| !l.trim().is_empty())
                     .ok_or_else(malformed)?;
    let caps = LATENCY.captures(last).ok_or_else(malformed)?;
    let count = caps.get(1).or_else(|| caps.get(2)).ok_or_else(malformed)?;

    count.as_str().parse::<u64>().map_err(|_| malformed())
}

/// Extract the FF & LUT counts of TOP_FUNCTION from a solution data report.
pub fn parse_resources(factor: u32, report: &str, top_function: &str) -> Result<(u64, u64)> {
    let malformed = |reason: String| Error::MalformedResourceReport { factor, reason };

    let json: Value = serde_json::from_str(report).map_err(|e| malformed(e.to_string()))?;
    let area = json.get("ModuleInfo")
                   .and_then(|m| m.get("Metrics"))
                   .and_then(|m| m.get(top_function))
                   .ok_or_else(|| malformed(format!("no metrics for '{}'", top_function)))?
                   .get("Area")
                   .ok_or_else(|| malformed(format!("no area section for '{}'", top_function)))?;

    let ff = counter(area, "FF").ok_or_else(|| malformed("missing FF count".to_string()))?;
    let lut = counter(area, "LUT").ok_or_else(|| malformed("missing LUT count".to_string()))?;
    return Ok((ff, lut));
}

/// Counters are written as strings, but accept plain numbers too.
fn counter(area: &Value, name: &str) -> Option<u64> {
    match area.get(name)? {
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Read a report that the backend should have produced.
fn read_report(factor: u32, path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::BackendInvocationFailed {
            factor,
            reason: format!("missing report {:?}", path),
        },
        _ => Error::Io(e),
    })
}

/// Parse both reports of one synthesis run.
pub fn read_result(factor: u32, output: &SynthOutput, top_function: &str) -> Result<SweepResult> {
    let latency = parse_latency(factor, &read_report(factor, &output.latency_report)?)?;
    let (ff, lut) = parse_resources(
        factor,
        &read_report(factor, &output.resource_report)?,
        top_function,
    )?;
    return Ok(SweepResult { factor, latency, ff, lut });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LAT_RPT: &str = "\
$MAX_LATENCY = \"1103\"
$MIN_LATENCY = \"675\"
$AVER_LATENCY = \"889\"
$MAX_THROUGHPUT = \"1103\"
$TOTAL_EXECUTE_TIME = \"1778\"
";

    const SOLUTION_DATA: &str = r#"{
  "ModuleInfo": {
    "Metrics": {
      "top": {
        "Latency": {"LatencyBest": "675"},
        "Area": {"BRAM_18K": "2", "DSP": "0", "FF": "1234", "LUT": "2345", "URAM": "0"}
      }
    }
  }
}"#;

    #[test]
    fn test_parse_latency_quoted() {
        assert_eq!(parse_latency(1, LAT_RPT).unwrap(), 1778);
    }

    #[test]
    fn test_parse_latency_parenthesized() {
        assert_eq!(parse_latency(2, "total = (42)").unwrap(), 42);
        assert_eq!(parse_latency(2, "first = (1)\nlast = (99)\n\n").unwrap(), 99);
    }

    #[test]
    fn test_parse_latency_malformed() {
        for report in ["", "\n\n", "$TOTAL_EXECUTE_TIME = 1778", "total = (abc)", "total (42)"] {
            assert!(
                matches!(parse_latency(4, report), Err(Error::MalformedLatencyReport { factor: 4 })),
                "accepted '{}'", report
            );
        }
        // Only the last record counts
        let report = "total = (42)\ntrailer\n";
        assert!(parse_latency(4, report).is_err());
    }

    #[test]
    fn test_parse_resources() {
        assert_eq!(parse_resources(1, SOLUTION_DATA, "top").unwrap(), (1234, 2345));

        let numeric = r#"{"ModuleInfo": {"Metrics": {"k": {"Area": {"FF": 10, "LUT": 20}}}}}"#;
        assert_eq!(parse_resources(1, numeric, "k").unwrap(), (10, 20));
    }

    #[test]
    fn test_parse_resources_malformed() {
        let check = |report: &str, top: &str| {
            assert!(matches!(
                parse_resources(3, report, top),
                Err(Error::MalformedResourceReport { factor: 3, .. })
            ));
        };
        check(SOLUTION_DATA, "other");
        check("not json", "top");
        check(r#"{"ModuleInfo": {"Metrics": {"top": {}}}}"#, "top");
        check(r#"{"ModuleInfo": {"Metrics": {"top": {"Area": {"FF": "1"}}}}}"#, "top");
        check(r#"{"ModuleInfo": {"Metrics": {"top": {"Area": {"FF": "x", "LUT": "1"}}}}}"#, "top");
    }

    #[test]
    fn test_read_result() {
        let dir = TempDir::new().unwrap();
        let output = SynthOutput {
            latency_report: dir.path().join("lat.rpt"),
            resource_report: dir.path().join("solution_data.json"),
        };
        fs::write(&output.latency_report, LAT_RPT).unwrap();
        fs::write(&output.resource_report, SOLUTION_DATA).unwrap();

        let result = read_result(2, &output, "top").unwrap();
        assert_eq!(result, SweepResult { factor: 2, latency: 1778, ff: 1234, lut: 2345 });
    }

    #[test]
    fn test_missing_report_is_backend_failure() {
        let dir = TempDir::new().unwrap();
        let output = SynthOutput {
            latency_report: dir.path().join("lat.rpt"),
            resource_report: dir.path().join("solution_data.json"),
        };
        let result = read_result(6, &output, "top");
        assert!(matches!(result, Err(Error::BackendInvocationFailed { factor: 6, .. })));
    }
}

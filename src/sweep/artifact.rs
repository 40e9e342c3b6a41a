// Writing & reading sweep results, as nested JSON or a flat CSV table.

use std::fs;
use std::path::Path;

use super::data::{SweepReport, SweepResult};
use crate::error::{Error, Result};

pub const CSV_HEADER: &str = "factor,latency,ff,lut";

impl SweepReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(str: &str) -> Result<Self> {
        Ok(serde_json::from_str(str)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()? + "\n")?;
        return Ok(());
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        fs::write(path, to_csv(&self.results))?;
        return Ok(());
    }
}

/// Format results as a flat table.
pub fn to_csv(results: &[SweepResult]) -> String {
    let mut acc = format!("{}\n", CSV_HEADER);
    for r in results {
        acc.push_str(&format!("{},{},{},{}\n", r.factor, r.latency, r.ff, r.lut));
    }
    acc
}

/// Parse a flat table written by [`to_csv`].
pub fn from_csv(str: &str) -> Result<Vec<SweepResult>> {
    let mut lines = str.lines().filter(|l| !l.trim().is_empty());
    match lines.next() {
        Some(header) if header.trim() == CSV_HEADER => {},
        other => {
            return Err(Error::MalformedArtifact(format!("unexpected CSV header: {:?}", other)));
        },
    }

    let mut acc = vec![];
    for line in lines {
        let bad_row = || Error::MalformedArtifact(format!("malformed CSV row '{}'", line));
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        let [factor, latency, ff, lut] = fields.as_slice() else {
            return Err(bad_row());
        };
        acc.push(SweepResult {
            factor: factor.parse().map_err(|_| bad_row())?,
            latency: latency.parse().map_err(|_| bad_row())?,
            ff: ff.parse().map_err(|_| bad_row())?,
            lut: lut.parse().map_err(|_| bad_row())?,
        });
    }
    return Ok(acc);
}

pub fn read_csv(path: &Path) -> Result<Vec<SweepResult>> {
    from_csv(&fs::read_to_string(path)?)
}

/// Read results from either artifact, chosen by extension.
pub fn read_results(path: &Path) -> Result<Vec<SweepResult>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_csv(path),
        _ => Ok(SweepReport::read_json(path)?.results),
    }
}

// Resource efficiency of each unroll factor.
//
// Efficiency is the inverse of resource usage times latency, so a factor
// that halves latency while doubling the flip-flop count is no better than
// the rolled loop. Zero counters are rejected instead of producing infinities.

use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::sweep::SweepResult;

pub const CSV_HEADER: &str = "factor,ff_efficiency,lut_efficiency";

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EfficiencyRecord {
    pub factor: u32,
    pub ff_efficiency: f64,
    pub lut_efficiency: f64,
}

/// How resource counts are scaled before computing efficiency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalization {
    /// Use the raw counters.
    Absolute,
    /// Divide counters by those of a baseline run. Without an explicit
    /// baseline the smallest factor is used.
    Relative { baseline: Option<u32> },
}

/// Compute one record per result, sorted by factor.
pub fn derive(results: &[SweepResult], normalization: Normalization) -> Result<Vec<EfficiencyRecord>> {
    let (ff_base, lut_base) = match normalization {
        Normalization::Absolute => (1.0, 1.0),
        Normalization::Relative { baseline } => {
            let base = find_baseline(results, baseline)?;
            if base.ff == 0 || base.lut == 0 {
                return Err(Error::DegenerateMetric { factor: base.factor });
            }
            info!("Normalizing resources against unroll factor {}", base.factor);
            (base.ff as f64, base.lut as f64)
        },
    };

    let mut sorted = results.to_vec();
    sorted.sort_by_key(|r| r.factor);

    sorted.iter()
          .map(|r| {
              if r.latency == 0 || r.ff == 0 || r.lut == 0 {
                  return Err(Error::DegenerateMetric { factor: r.factor });
              }
              let latency = r.latency as f64;
              let ff = r.ff as f64 / ff_base;
              let lut = r.lut as f64 / lut_base;
              Ok(EfficiencyRecord {
                  factor: r.factor,
                  ff_efficiency: 1.0 / (ff * latency),
                  lut_efficiency: 1.0 / (lut * latency),
              })
          })
          .collect()
}

fn find_baseline(results: &[SweepResult], baseline: Option<u32>) -> Result<&SweepResult> {
    let found = match baseline {
        Some(factor) => results.iter().find(|r| r.factor == factor),
        None => results.iter().min_by_key(|r| r.factor),
    };
    found.ok_or(Error::MissingBaseline)
}

/// Format records as a flat table for plotting.
pub fn to_csv(records: &[EfficiencyRecord]) -> String {
    let mut acc = format!("{}\n", CSV_HEADER);
    for r in records {
        acc.push_str(&format!("{},{:e},{:e}\n", r.factor, r.ff_efficiency, r.lut_efficiency));
    }
    acc
}

pub fn write_csv(records: &[EfficiencyRecord], path: &Path) -> Result<()> {
    fs::write(path, to_csv(records))?;
    return Ok(());
}

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use chrono::Local;
use log::LevelFilter;
use serde::Deserialize;

use crate::efficiency::Normalization;
use crate::error::{Error, Result};

/// Top level configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub sweep: Sweep,
    pub output: Output,
    pub log: Log,
}

/// Configuration for the synthesis backend.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Backend {
    pub command: String,
    pub candidate_script: PathBuf,
    pub candidate_log: PathBuf,
    pub candidate_report: PathBuf,
    pub template: PathBuf,
    pub timeout: Option<u64>,   // Seconds, no limit if unset
}

/// Configuration for the unroll factor sweep.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Sweep {
    pub threads: usize,
    pub factors: Vec<u32>,
    pub work_dir: PathBuf,
}

/// Where the results are written.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Output {
    pub json: PathBuf,
    pub csv: PathBuf,
    pub efficiency: PathBuf,
    pub normalization: NormalizationKind,
    pub baseline: Option<u32>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationKind {
    #[default]
    Absolute,
    Relative,
}

/// Configuration for logging.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Log {
    pub dir: PathBuf,
    pub level: String,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            command: "vitis_hls".to_string(),
            candidate_script: PathBuf::from("pass/run_pass.tcl"),
            candidate_log: PathBuf::from("pass/vitis_hls.log"),
            candidate_report: PathBuf::from("loop-analysis.txt"),
            template: PathBuf::from("run_unroll.tcl.template"),
            timeout: None,
        }
    }
}

impl Default for Sweep {
    fn default() -> Self {
        Self { threads: 5, factors: (1..=8).collect(), work_dir: PathBuf::from(".") }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self {
            json: PathBuf::from("unroll-result.json"),
            csv: PathBuf::from("unroll-result.csv"),
            efficiency: PathBuf::from("unroll-efficiency.csv"),
            normalization: NormalizationKind::Absolute,
            baseline: None,
        }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self { dir: PathBuf::from("logs"), level: "info".to_string() }
    }
}

impl Config {
    /// The log level as a filter.
    pub fn log_level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log.level)
            .map_err(|_| Error::Config(format!("invalid log level '{}'", self.log.level)))
    }

    /// The normalization policy used by the efficiency table.
    pub fn normalization(&self) -> Normalization {
        match self.output.normalization {
            NormalizationKind::Absolute => Normalization::Absolute,
            NormalizationKind::Relative => Normalization::Relative {
                baseline: self.output.baseline,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.sweep.threads == 0 {
            return Err(Error::Config("sweep.threads must be at least 1".to_string()));
        }
        if self.sweep.factors.is_empty() {
            return Err(Error::Config("sweep.factors must not be empty".to_string()));
        }
        if let Some(f) = self.sweep.factors.iter().find(|f| **f == 0) {
            return Err(Error::Config(format!("invalid unroll factor {}", f)));
        }
        self.log_level()?;
        return Ok(());
    }
}

/// Parse a configuration from a TOML string.
pub fn parse_config(str: &str) -> Result<Config> {
    let config: Config = toml::from_str(str)?;
    config.validate()?;
    return Ok(config);
}

pub fn read_config(path: &Path) -> Result<Config> {
    let str = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("unable to read {:?}: {}", path, e)))?;
    let mut config = parse_config(&str)?;

    // Set the log directory based on the time
    let now = Local::now();
    let sub_dir = now.format("%Y-%m-%dT%H-%M-%S").to_string();
    config.log.dir = config.log.dir.join(sub_dir);

    return Ok(config);
}

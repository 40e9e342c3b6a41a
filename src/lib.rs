// Loop unrolling design-space exploration.
//
// Finds the hottest loop of an HLS design from its C simulation traces, then
// synthesizes the design once per unroll factor of that loop & measures how
// latency and resource usage trade off.

pub mod backend;
pub mod config;
pub mod efficiency;
pub mod error;
pub mod hotloop;
pub mod logging;
pub mod sweep;

pub use error::{Error, Result};

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use backend::{AnyBackend, CandidateInput};
use config::Config;
use efficiency::EfficiencyRecord;
use hotloop::{Occurrence, Selection};
use sweep::{SweepParams, SweepReport};

/// Arguments of a full exploration run.
#[derive(Clone, Debug)]
pub struct RunArgs {
    pub user_code: PathBuf,
    pub solution_dir: PathBuf,
    pub top_function: String,
    pub array_name: String,
    pub skip_candidate_pass: bool,
}

/// Run the whole exploration: candidate pass, hot loop selection, sweep, and
/// the result & efficiency artifacts.
pub fn run(config: &Config, backend: AnyBackend, args: &RunArgs) -> Result<SweepReport> {
    // The backend runs inside the work directory
    let user_code = fs::canonicalize(&args.user_code)?;
    let work_dir = &config.sweep.work_dir;
    fs::create_dir_all(work_dir)?;

    // Find the candidate loops
    let report = match args.skip_candidate_pass {
        true => work_dir.join(&config.backend.candidate_report),
        false => backend.find_candidates(CandidateInput {
            work_dir,
            user_code: &user_code,
            top_function: &args.top_function,
        })?,
    };

    // Pick the loop to unroll
    let selection = hotloop::identify_hotloop(&report, &args.solution_dir, &Occurrence)?;

    // Try every unroll factor
    let params = SweepParams {
        user_code,
        top_function: args.top_function.clone(),
        array_name: args.array_name.clone(),
        factors: config.sweep.factors.clone(),
        work_dir: work_dir.clone(),
        threads: config.sweep.threads,
    };
    let result = sweep::sweep(backend, &selection.hottest, &params)?;

    // Save the raw results
    result.write_json(&config.output.json)?;
    result.write_csv(&config.output.csv)?;
    info!("Saved results to {:?} and {:?}", config.output.json, config.output.csv);

    // Save the efficiency table for plotting
    let records = efficiency::derive(&result.results, config.normalization())?;
    efficiency::write_csv(&records, &config.output.efficiency)?;
    info!("Saved efficiency table to {:?}", config.output.efficiency);

    return Ok(result);
}

/// Only select the hottest loop, using an existing candidate report.
pub fn hotloop(config: &Config, solution_dir: &Path) -> Result<Selection> {
    let report = config.sweep.work_dir.join(&config.backend.candidate_report);
    hotloop::identify_hotloop(&report, solution_dir, &Occurrence)
}

/// Derive the efficiency table from an existing JSON or CSV result.
pub fn efficiency(config: &Config, results: &Path) -> Result<Vec<EfficiencyRecord>> {
    let results = sweep::artifact::read_results(results)?;
    let records = efficiency::derive(&results, config.normalization())?;
    efficiency::write_csv(&records, &config.output.efficiency)?;
    info!("Saved efficiency table to {:?}", config.output.efficiency);
    return Ok(records);
}

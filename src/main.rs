use clap::{arg, ArgMatches, Command};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use unroll_explorer::backend::{AnyBackend, VitisBackend};
use unroll_explorer::config::{self, Config};
use unroll_explorer::{logging, Result, RunArgs};

fn cli() -> Command {
    Command::new("unroll_explorer")
        .about("Explore loop unroll factors of the hottest loop in an HLS design")
        // Configuration
        .arg_required_else_help(true)
        .arg(arg!(config: <CONFIG>)
             .value_parser(clap::value_parser!(PathBuf))
        )
        .subcommand_required(true)
        // Full exploration
        .subcommand(
            Command::new("run")
                .about("Find the hottest loop & sweep its unroll factor")
                .arg_required_else_help(true)
                .arg(arg!(user_code: <USER_CODE> "Path to the user code")
                     .value_parser(clap::value_parser!(PathBuf)))
                .arg(arg!(solution_dir: <SOLUTION_DIR> "Path to the Vitis project solution directory")
                     .value_parser(clap::value_parser!(PathBuf)))
                .arg(arg!(--"top-function" <NAME> "The name of the top-level function")
                     .required(false)
                     .default_value("top"))
                .arg(arg!(--"array-name" <NAME> "The name of the array to partition")
                     .required(false)
                     .default_value("acc"))
                .arg(arg!(--"skip-candidate-pass" "Reuse the existing candidate report"))
        )
        // Hot loop only
        .subcommand(
            Command::new("hotloop")
                .about("Only find the hottest loop from an existing candidate report")
                .arg_required_else_help(true)
                .arg(arg!(solution_dir: <SOLUTION_DIR>)
                     .value_parser(clap::value_parser!(PathBuf)))
        )
        // Efficiency only
        .subcommand(
            Command::new("efficiency")
                .about("Derive the efficiency table from saved sweep results")
                .arg_required_else_help(true)
                .arg(arg!(results: <RESULTS> "A result JSON or CSV file")
                     .value_parser(clap::value_parser!(PathBuf)))
        )
}

fn get_path(args: &ArgMatches, name: &str) -> PathBuf {
    args.get_one::<PathBuf>(name)
        .expect("required")
        .to_path_buf()
}

fn get_string(args: &ArgMatches, name: &str) -> String {
    args.get_one::<String>(name)
        .expect("defaulted")
        .to_string()
}

fn dispatch(matches: &ArgMatches, config: &Config) -> Result<()> {
    match matches.subcommand() {
        Some(("run", sub)) => {
            let args = RunArgs {
                user_code: get_path(sub, "user_code"),
                solution_dir: get_path(sub, "solution_dir"),
                top_function: get_string(sub, "top-function"),
                array_name: get_string(sub, "array-name"),
                skip_candidate_pass: sub.get_flag("skip-candidate-pass"),
            };
            let backend: AnyBackend = Arc::new(VitisBackend::from_config(&config.backend)?);
            let report = unroll_explorer::run(config, backend, &args)?;
            info!("Swept {} unroll factors of '{}'",
                  report.results.len(), report.metadata.unrolled_loop_name);
        },
        Some(("hotloop", sub)) => {
            let selection = unroll_explorer::hotloop(config, &get_path(sub, "solution_dir"))?;
            println!("{}", selection.hottest);
        },
        Some(("efficiency", sub)) => {
            let records = unroll_explorer::efficiency(config, &get_path(sub, "results"))?;
            info!("Derived efficiency for {} unroll factors", records.len());
        },
        _ => unreachable!(),
    }
    return Ok(());
}

fn main() -> ExitCode {
    // Parse arguments
    let matches = cli().get_matches();

    // Load the configuration file
    let config_path = get_path(&matches, "config");
    let config = match config::read_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };
    if let Err(e) = logging::init(&config) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match dispatch(&matches, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        },
    }
}

//! Renders the phase scripts of the registered upgrade checks into a directory
//! of testdrive files.
//!
//! Usage:
//!   checks --list
//!   checks --base-version v0.74.0 --out-dir checks-out
//!   checks --base-version v0.73.0 --check CheckSchemas --check UnifiedCluster

use std::process;

use clap::Parser;
use harness_core::MzVersion;

use checks::all_checks::{all_checks, find_check};
use checks::check::Check;
use checks::executor::ScriptDirExecutor;
use checks::scenario::run_scenario;

#[derive(Parser, Debug)]
#[command(name = "checks", about = "Render upgrade check scripts for testdrive")]
struct Args {
    /// Version the upgrade starts from; gates checks that need newer features.
    #[arg(long, default_value = "v0.74.0", env = "CHECKS_BASE_VERSION")]
    base_version: MzVersion,

    /// Directory receiving one sub-directory of `.td` files per check.
    #[arg(long, default_value = "checks-out")]
    out_dir: String,

    /// Only render these checks (case-insensitive). Repeat for several.
    #[arg(long = "check")]
    checks: Vec<String>,

    /// Print the registered checks and exit.
    #[arg(long, default_value_t = false)]
    list: bool,

    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

fn main() {
    let args = Args::parse();

    harness_core::initialize_logger(args.log_level, None).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logger: {}. Exiting.", e);
        process::exit(1);
    });

    if args.list {
        for check in all_checks() {
            println!("{}", check.name());
        }
        return;
    }

    let selected: Vec<Box<dyn Check>> = if args.checks.is_empty() {
        all_checks()
    } else {
        let mut selected = Vec::new();
        for name in &args.checks {
            match find_check(name) {
                Some(check) => selected.push(check),
                None => {
                    log::error!("Unknown check {name:?}; use --list to see valid names.");
                    process::exit(1);
                }
            }
        }
        selected
    };

    let mut executor = ScriptDirExecutor::new(&args.out_dir, args.base_version);
    match run_scenario(&selected, &mut executor) {
        Ok(report) => {
            log::info!(
                "Wrote {} scripts for {} checks to {} ({} skipped: {})",
                report.scripts_applied,
                report.ran.len(),
                executor.dir().display(),
                report.skipped.len(),
                report.skipped.join(", ")
            );
        }
        Err(e) => {
            log::error!("Failed to render checks: {e:#}");
            process::exit(1);
        }
    }
}

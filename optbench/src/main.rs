//! Command-line entry point.
//!
//! Usage:
//!   optbench init tpch
//!   optbench run tpch --repeat 10 --output results/tpch.json
//!   OPTBENCH_PORT=5432 OPTBENCH_USER=postgres optbench run tpch   # PostgreSQL baseline

use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use optbench::config::{Command, Config};
use optbench::report::{print_report, write_json_report, BenchmarkReport, QueryReport};
use optbench::runner::{run_workload, RunOptions};
use optbench::scenario::Scenario;
use optbench::sql::{parse_from_file, Database, Query};

fn init(config: &Config, scenario: Scenario, schema: Option<&Path>) -> Result<()> {
    let schema = schema
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| scenario.default_schema_path());
    let statements = parse_from_file(&schema)
        .with_context(|| format!("reading schema {}", schema.display()))?;

    let params = config.connection.params();
    let mut db = Database::connect(&params)
        .with_context(|| format!("connecting to {}:{}", params.host, params.port))?;
    db.drop_database(scenario.as_str())?;
    db.create_database(scenario.as_str())?;
    db.close()?;

    let mut db = Database::connect(&params.with_database(scenario.as_str()))?;
    db.execute_all(&statements)?;
    log::info!(
        "Initialized {} with {} statements from {}",
        scenario,
        statements.len(),
        schema.display()
    );
    db.close()
}

fn run(
    config: &Config,
    scenario: Scenario,
    workload: Option<&Path>,
    options: RunOptions,
    output: &Path,
) -> Result<()> {
    let workload = workload
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| scenario.default_workload_path());
    let queries: Vec<Query> = parse_from_file(&workload)
        .with_context(|| format!("reading workload {}", workload.display()))?
        .into_iter()
        .map(Query::new)
        .collect();

    let params = config.connection.params().with_database(scenario.as_str());
    let mut db = Database::connect(&params)
        .with_context(|| format!("connecting to {}:{}", params.host, params.port))?;

    let version = db.version()?;
    let mz_version = db.mz_version()?;
    log::info!("Benchmarking {} queries against {}", queries.len(), version);

    let results = run_workload(&mut db, &queries, options)?;
    let dialect = db.dialect();
    db.close()?;

    let report = BenchmarkReport {
        timestamp: chrono::Utc::now().to_rfc3339(),
        scenario,
        version,
        mz_version,
        dialect,
        repeat: options.repeat,
        warmup: options.warmup,
        queries: results.iter().map(QueryReport::from).collect(),
    };

    print_report(&report, &results);
    write_json_report(&report, output)
        .with_context(|| format!("writing report {}", output.display()))?;
    log::info!("JSON report: {}", output.display());
    Ok(())
}

fn main() {
    // A missing .env file is fine; flags and the real environment still apply.
    let _ = dotenvy::dotenv();
    let config = Config::parse();

    harness_core::initialize_logger(config.log_level, config.log_file.as_deref())
        .unwrap_or_else(|e| {
            eprintln!("Failed to initialize logger: {}. Exiting.", e);
            process::exit(1);
        });

    let outcome = match &config.command {
        Command::Init { scenario, schema } => init(&config, *scenario, schema.as_deref()),
        Command::Run {
            scenario,
            workload,
            repeat,
            warmup,
            output,
        } => run(
            &config,
            *scenario,
            workload.as_deref(),
            RunOptions {
                repeat: *repeat,
                warmup: *warmup,
            },
            output,
        ),
    };

    if let Err(e) = outcome {
        log::error!("{e:#}");
        process::exit(1);
    }
}

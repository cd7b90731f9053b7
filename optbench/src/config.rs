use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::client::ConnectionParams;
use crate::scenario::Scenario;

/// CLI configuration for the optimizer benchmark.
///
/// Connection flags fall back to `OPTBENCH_*` environment variables, which
/// may also come from a `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(name = "optbench", about = "Optimizer benchmark for Materialize and PostgreSQL")]
pub struct Config {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Log level for stderr.
    #[arg(long, default_value = "info", global = true)]
    pub log_level: log::LevelFilter,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    #[arg(long, default_value = "localhost", env = "OPTBENCH_HOST", global = true)]
    pub host: String,

    #[arg(long, default_value_t = 6875, env = "OPTBENCH_PORT", global = true)]
    pub port: u16,

    #[arg(long, default_value = "materialize", env = "OPTBENCH_USER", global = true)]
    pub user: String,

    #[arg(long, env = "OPTBENCH_PASSWORD", global = true)]
    pub password: Option<String>,

    /// Database to connect to before the scenario database exists.
    #[arg(long, env = "OPTBENCH_DATABASE", global = true)]
    pub database: Option<String>,

    /// Connect with `sslmode=require`.
    #[arg(long, default_value_t = false, env = "OPTBENCH_REQUIRE_SSL", global = true)]
    pub require_ssl: bool,
}

impl ConnectionArgs {
    pub fn params(&self) -> ConnectionParams {
        ConnectionParams {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            require_ssl: self.require_ssl,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Drop and recreate the scenario database and load its schema.
    Init {
        #[arg(value_enum)]
        scenario: Scenario,

        /// Schema file; defaults to `schema/<scenario>.sql`.
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Time `EXPLAIN` for every query of a workload file.
    Run {
        #[arg(value_enum)]
        scenario: Scenario,

        /// Workload file; defaults to `workload/<scenario>.sql`.
        #[arg(long)]
        workload: Option<PathBuf>,

        /// Sampled runs per query.
        #[arg(long, default_value_t = 5)]
        repeat: u32,

        /// Unsampled runs per query before sampling.
        #[arg(long, default_value_t = 1)]
        warmup: u32,

        /// Where to write the JSON report.
        #[arg(long, default_value = "results/optbench.json")]
        output: PathBuf,
    },
}

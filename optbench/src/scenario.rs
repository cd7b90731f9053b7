use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

/// A benchmark scenario. Its name doubles as the database the schema is
/// loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Tpch,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Tpch => "tpch",
        }
    }

    /// Default schema file, relative to the `optbench` crate root.
    pub fn default_schema_path(&self) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("schema")
            .join(format!("{}.sql", self.as_str()))
    }

    /// Default workload file, relative to the `optbench` crate root.
    pub fn default_workload_path(&self) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("workload")
            .join(format!("{}.sql", self.as_str()))
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

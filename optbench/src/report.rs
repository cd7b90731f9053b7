//! Report module: prints per-query optimization times and writes the JSON
//! report consumed by later comparisons.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::scenario::Scenario;
use crate::sql::Dialect;

/// Optimization times collected for one workload query.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub name: String,
    pub samples: Vec<Duration>,
    /// Runs whose `EXPLAIN` output carried no timing line.
    pub missing: usize,
}

impl QueryResult {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            samples: Vec::new(),
            missing: 0,
        }
    }

    pub fn add_sample(&mut self, sample: Option<Duration>) {
        match sample {
            Some(d) => self.samples.push(d),
            None => self.missing += 1,
        }
    }

    fn samples_us(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|d| d.as_nanos() as f64 / 1e3)
            .collect()
    }

    pub fn mean_us(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples_us().iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn percentile_us(&self, pct: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted = self.samples_us();
        sorted.sort_by(f64::total_cmp);
        let idx = ((pct / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    pub fn min_us(&self) -> f64 {
        self.samples_us().into_iter().reduce(f64::min).unwrap_or(0.0)
    }

    pub fn max_us(&self) -> f64 {
        self.samples_us().into_iter().reduce(f64::max).unwrap_or(0.0)
    }
}

/// Everything a benchmark run records about itself.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub timestamp: String,
    pub scenario: Scenario,
    pub version: String,
    pub mz_version: Option<String>,
    pub dialect: Dialect,
    pub repeat: u32,
    pub warmup: u32,
    pub queries: Vec<QueryReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub name: String,
    pub samples_us: Vec<f64>,
    pub missing: usize,
    pub mean_us: f64,
    pub p50_us: f64,
    pub p95_us: f64,
}

impl From<&QueryResult> for QueryReport {
    fn from(result: &QueryResult) -> Self {
        Self {
            name: result.name.clone(),
            samples_us: result.samples_us(),
            missing: result.missing,
            mean_us: result.mean_us(),
            p50_us: result.percentile_us(50.0),
            p95_us: result.percentile_us(95.0),
        }
    }
}

/// Serialize `report` as pretty JSON, creating parent directories as needed.
pub fn write_json_report(report: &BenchmarkReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()?;
    Ok(())
}

/// Print a formatted table of optimization times.
pub fn print_report(report: &BenchmarkReport, results: &[QueryResult]) {
    println!("\n{}", "=".repeat(80));
    println!("  Optimizer Benchmark Report");
    println!(
        "  Scenario: {} | Dialect: {} | Repeat: {} (+{} warmup)",
        report.scenario, report.dialect, report.repeat, report.warmup
    );
    println!("  Version:  {}", report.version);
    if let Some(mz) = &report.mz_version {
        println!("  Materialize: {}", mz);
    }
    println!("{}", "=".repeat(80));

    println!(
        "\n  {:20} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Query", "Samples", "Mean (µs)", "p50 (µs)", "p95 (µs)", "Min (µs)", "Max (µs)"
    );
    println!("  {}", "-".repeat(96));

    for r in results {
        if r.samples.is_empty() {
            println!("  {:20} {:>8} {:>12}", r.name, 0, "no timing");
            continue;
        }
        println!(
            "  {:20} {:>8} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>12.0}",
            r.name,
            r.samples.len(),
            r.mean_us(),
            r.percentile_us(50.0),
            r.percentile_us(95.0),
            r.min_us(),
            r.max_us(),
        );
    }

    let total_mean: f64 = results.iter().map(QueryResult::mean_us).sum();
    println!("  {}", "-".repeat(96));
    println!(
        "  Sum of means: {:.0}µs ({:.2}ms)",
        total_mean,
        total_mean / 1000.0
    );
    println!();
}

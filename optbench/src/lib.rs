//! Optimizer benchmark
//!
//! Times how long Materialize (or PostgreSQL, as a baseline) spends planning
//! the queries of a workload. Each query is run as `EXPLAIN` with timing
//! enabled and the optimization time is scraped from the plan text.
//!
//! Run benchmarks: `cargo run -p optbench -- run tpch`
//! Run tests: `cargo test -p optbench`

pub mod client;
pub mod config;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod sql;
pub mod tls;

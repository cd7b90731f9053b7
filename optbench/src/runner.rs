use anyhow::Result;

use crate::client::SqlClient;
use crate::report::QueryResult;
use crate::sql::{Database, Query};

/// How often each workload query is explained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Sampled runs per query.
    pub repeat: u32,
    /// Unsampled runs per query before sampling starts.
    pub warmup: u32,
}

/// Explain every query `warmup + repeat` times with timing enabled and collect
/// the optimization time of the sampled runs.
pub fn run_workload<C: SqlClient>(
    db: &mut Database<C>,
    queries: &[Query],
    options: RunOptions,
) -> Result<Vec<QueryResult>> {
    let mut results = Vec::with_capacity(queries.len());

    for (idx, query) in queries.iter().enumerate() {
        log::info!("[{}/{}] {}", idx + 1, queries.len(), query.name());

        for _ in 0..options.warmup {
            db.explain(query, true)?;
        }

        let mut result = QueryResult::new(query.name());
        for _ in 0..options.repeat {
            let output = db.explain(query, true)?;
            let time = output.optimization_time();
            if time.is_none() {
                log::warn!("No optimization time in EXPLAIN output of {}", query.name());
            }
            result.add_sample(time);
        }
        results.push(result);
    }

    Ok(results)
}

//! Workload queries, `EXPLAIN` output and the database under test.

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Result};
use harness_core::parse_duration;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

use crate::client::{self, ConnectionParams, Row, SqlClient};

/// Name reported for queries without a `-- name:` comment.
pub const ANONYMOUS_QUERY: &str = "anonymous";

/// `EXPLAIN` flavour understood by the connected product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dialect {
    Pg,
    Mz,
}

impl Dialect {
    /// Classify a `SELECT version()` result.
    pub fn from_version(version: &str) -> Self {
        if version.contains("Materialize") {
            Dialect::Mz
        } else {
            Dialect::Pg
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Pg => f.write_str("PG"),
            Dialect::Mz => f.write_str("MZ"),
        }
    }
}

/// A single workload query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    query: String,
}

impl Query {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.query
    }

    /// The value of the first `-- name: <name>` comment line, or
    /// [`ANONYMOUS_QUERY`].
    pub fn name(&self) -> &str {
        lazy_static! {
            static ref NAME_RE: Regex = Regex::new(r"(?m)-- name: (?P<name>.+)").unwrap();
        }

        NAME_RE
            .captures(&self.query)
            .and_then(|caps| caps.name("name"))
            .map(|m| m.as_str().trim_end())
            .unwrap_or(ANONYMOUS_QUERY)
    }

    /// The query prefixed with the `EXPLAIN` form for `dialect`.
    pub fn explain(&self, timing: bool, dialect: Dialect) -> String {
        let prefix = match (dialect, timing) {
            (Dialect::Pg, true) => "EXPLAIN (ANALYZE, TIMING TRUE)",
            (Dialect::Pg, false) => "EXPLAIN",
            (Dialect::Mz, true) => "EXPLAIN WITH(timing)",
            (Dialect::Mz, false) => "EXPLAIN",
        };
        format!("{prefix}\n{}", self.query)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}

/// Raw text returned by an `EXPLAIN` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainOutput {
    output: String,
}

impl ExplainOutput {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.output
    }

    /// Time the optimizer (Materialize) or planner (PostgreSQL) took, if the
    /// output reports it.
    pub fn optimization_time(&self) -> Option<Duration> {
        lazy_static! {
            static ref TIME_RE: Regex = Regex::new(
                r"(?m)(Optimization time|Planning Time): (?P<time>[0-9]+(\.[0-9]+)?\s?\S+)"
            )
            .unwrap();
        }

        let caps = TIME_RE.captures(&self.output)?;
        parse_duration(&caps["time"])
    }
}

impl fmt::Display for ExplainOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output)
    }
}

/// The database under test, reached through a single connection.
pub struct Database<C: SqlClient = postgres::Client> {
    client: C,
    dialect: Dialect,
}

impl Database<postgres::Client> {
    pub fn connect(params: &ConnectionParams) -> Result<Self> {
        log::debug!(
            "Initialize Database with host={} port={}, user={}",
            params.host,
            params.port,
            params.user
        );
        let client = client::connect(params)?;
        Self::with_client(client)
    }
}

impl<C: SqlClient> Database<C> {
    /// Wrap an open connection and detect its dialect.
    pub fn with_client(client: C) -> Result<Self> {
        let mut db = Self {
            client,
            dialect: Dialect::Pg,
        };
        db.dialect = Dialect::from_version(&db.version()?);
        log::debug!("Detected {} dialect", db.dialect);
        Ok(db)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn close(self) -> Result<()> {
        self.client.close()
    }

    pub fn version(&mut self) -> Result<String> {
        self.query_scalar("SELECT version()")
    }

    /// `None` unless connected to Materialize.
    pub fn mz_version(&mut self) -> Result<Option<String>> {
        match self.dialect {
            Dialect::Mz => self.query_scalar("SELECT mz_version()").map(Some),
            Dialect::Pg => Ok(None),
        }
    }

    /// `name` is interpolated as-is and must be a safe identifier.
    pub fn drop_database(&mut self, name: &str) -> Result<()> {
        log::debug!("Drop database \"{name}\"");
        self.execute(&format!("DROP DATABASE IF EXISTS {name}"))
    }

    /// `name` is interpolated as-is and must be a safe identifier.
    pub fn create_database(&mut self, name: &str) -> Result<()> {
        log::debug!("Create database \"{name}\"");
        self.execute(&format!("CREATE DATABASE {name}"))
    }

    pub fn explain(&mut self, query: &Query, timing: bool) -> Result<ExplainOutput> {
        let rows = self.query_all(&query.explain(timing, self.dialect))?;
        let text = rows.into_iter().flatten().flatten().collect::<Vec<_>>();
        Ok(ExplainOutput::new(text.join("\n")))
    }

    pub fn execute(&mut self, statement: &str) -> Result<()> {
        self.client.execute(statement)
    }

    /// Stops at the first failing statement.
    pub fn execute_all<S: AsRef<str>>(&mut self, statements: &[S]) -> Result<()> {
        for statement in statements {
            self.client.execute(statement.as_ref())?;
        }
        Ok(())
    }

    pub fn query_one(&mut self, query: &str) -> Result<Option<Row>> {
        Ok(self.client.query(query)?.into_iter().next())
    }

    pub fn query_all(&mut self, query: &str) -> Result<Vec<Row>> {
        self.client.query(query)
    }

    fn query_scalar(&mut self, query: &str) -> Result<String> {
        self.query_one(query)?
            .and_then(|row| row.into_iter().next().flatten())
            .ok_or_else(|| anyhow!("{query} returned no value"))
    }
}

/// Split a `*.sql` file into its statements.
pub fn parse_from_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(split_statements(&text))
}

/// Split SQL text on top-level `;` tokens.
///
/// Statements keep their leading comments and trailing `;` and are trimmed.
/// Fragments holding only whitespace or comments are dropped.
///
/// Text the tokenizer rejects (e.g. an unterminated quote) is returned whole
/// as a single statement and left for the server to report.
pub fn split_statements(sql: &str) -> Vec<String> {
    let dialect = PostgreSqlDialect {};
    let tokens = match Tokenizer::new(&dialect, sql).tokenize_with_location() {
        Ok(tokens) => tokens,
        Err(e) => {
            log::warn!("Cannot tokenize SQL, keeping it as one statement: {e}");
            let whole = sql.trim();
            return if whole.is_empty() {
                Vec::new()
            } else {
                vec![whole.to_string()]
            };
        }
    };
    let line_starts = line_start_offsets(sql);

    let mut statements = Vec::new();
    let mut start = 0;
    let mut has_content = false;

    for token in tokens {
        match token.token {
            Token::SemiColon => {
                let loc = token.span.start;
                let end = byte_offset(sql, &line_starts, loc.line, loc.column) + 1;
                if has_content {
                    statements.push(sql[start..end].trim().to_string());
                }
                start = end;
                has_content = false;
            }
            Token::Whitespace(_) | Token::EOF => {}
            _ => has_content = true,
        }
    }

    if has_content {
        statements.push(sql[start..].trim().to_string());
    }

    statements
}

fn line_start_offsets(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// Convert the tokenizer's 1-based line/column (in characters) to a byte offset.
fn byte_offset(text: &str, line_starts: &[usize], line: u64, column: u64) -> usize {
    let line_start = line_starts
        .get(line.saturating_sub(1) as usize)
        .copied()
        .unwrap_or(text.len());
    let chars_in = column.saturating_sub(1) as usize;
    text[line_start..]
        .char_indices()
        .nth(chars_in)
        .map(|(i, _)| line_start + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_name_from_comment() {
        assert_eq!(Query::new("-- name: foo\nSELECT 1").name(), "foo");
        assert_eq!(
            Query::new("-- leading comment\n-- name: Q01\nSELECT 1").name(),
            "Q01"
        );
    }

    #[test]
    fn query_without_name_is_anonymous() {
        assert_eq!(Query::new("SELECT 1").name(), ANONYMOUS_QUERY);
        assert_eq!(Query::new("-- name:\nSELECT 1").name(), ANONYMOUS_QUERY);
    }

    #[test]
    fn first_name_comment_wins() {
        assert_eq!(Query::new("-- name: a\n-- name: b\nSELECT 1").name(), "a");
    }

    #[test]
    fn explain_templates() {
        let q = Query::new("SELECT 1");
        assert_eq!(q.explain(false, Dialect::Mz), "EXPLAIN\nSELECT 1");
        assert_eq!(q.explain(true, Dialect::Mz), "EXPLAIN WITH(timing)\nSELECT 1");
        assert_eq!(q.explain(false, Dialect::Pg), "EXPLAIN\nSELECT 1");
        assert_eq!(
            q.explain(true, Dialect::Pg),
            "EXPLAIN (ANALYZE, TIMING TRUE)\nSELECT 1"
        );
    }

    #[test]
    fn dialect_from_version_string() {
        let mz = "PostgreSQL 9.5.0 on x86_64-unknown-linux-gnu, Materialize v0.74.0";
        let pg = "PostgreSQL 15.3 (Debian 15.3-1.pgdg120+1) on x86_64-pc-linux-gnu";
        assert_eq!(Dialect::from_version(mz), Dialect::Mz);
        assert_eq!(Dialect::from_version(pg), Dialect::Pg);
    }

    #[test]
    fn optimization_time_from_materialize_output() {
        let out = ExplainOutput::new("Optimization time: 12.3 ms");
        assert_eq!(out.optimization_time(), Some(Duration::from_micros(12_300)));

        let out = ExplainOutput::new(
            "Explained Query:\n  Constant\n    - (1)\n\nOptimization time: 850µs\n",
        );
        assert_eq!(out.optimization_time(), Some(Duration::from_micros(850)));
    }

    #[test]
    fn planning_time_from_postgres_output() {
        let out = ExplainOutput::new(
            "Result  (cost=0.00..0.01 rows=1 width=4) (actual time=0.001..0.001 rows=1 loops=1)\nPlanning Time: 0.031 ms\nExecution Time: 0.012 ms",
        );
        assert_eq!(out.optimization_time(), Some(Duration::from_nanos(31_000)));
    }

    #[test]
    fn no_timing_label_yields_none() {
        assert_eq!(ExplainOutput::new("Constant\n  - (1)").optimization_time(), None);
        assert_eq!(ExplainOutput::new("Execution Time: 1 ms").optimization_time(), None);
    }

    #[test]
    fn split_two_statements_in_order() {
        let stmts = split_statements("SELECT 1; SELECT 2;");
        assert_eq!(stmts, vec!["SELECT 1;", "SELECT 2;"]);
    }

    #[test]
    fn split_keeps_name_comments_and_literals() {
        let sql = "-- name: q1\nSELECT 'a;b', 'it''s' FROM t;\n\n-- name: q2\nSELECT $$x;y$$\n";
        let stmts = split_statements(sql);
        assert_eq!(
            stmts,
            vec![
                "-- name: q1\nSELECT 'a;b', 'it''s' FROM t;",
                "-- name: q2\nSELECT $$x;y$$",
            ]
        );
        assert_eq!(Query::new(stmts[1].clone()).name(), "q2");
    }

    #[test]
    fn split_drops_empty_and_comment_only_fragments() {
        let stmts = split_statements(";;\n  SELT ünïcode;  -- trailing\n");
        assert_eq!(stmts, vec!["SELT ünïcode;"]);
        assert!(split_statements("  \n-- nothing here\n").is_empty());
    }

    #[test]
    fn unterminated_quote_keeps_text_as_one_statement() {
        let stmts = split_statements("  SELECT 'unterminated; SELECT 2;\n");
        assert_eq!(stmts, vec!["SELECT 'unterminated; SELECT 2;"]);
    }
}

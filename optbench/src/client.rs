//! The connection seam between [`crate::sql::Database`] and the wire client.

use anyhow::Result;
use postgres::config::SslMode;
use postgres::SimpleQueryMessage;
use tokio_postgres_rustls::MakeRustlsConnect;

use crate::tls;

/// One result row, every column rendered as text (`None` for SQL `NULL`).
pub type Row = Vec<Option<String>>;

/// Minimal statement/query surface the benchmark needs from a connection.
///
/// Each call holds the connection for exactly its own duration, whether it
/// succeeds or fails.
pub trait SqlClient {
    /// Run a statement, discarding any rows it returns.
    fn execute(&mut self, statement: &str) -> Result<()>;

    /// Run a query and return every row it produced.
    fn query(&mut self, query: &str) -> Result<Vec<Row>>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// Connection parameters for the database under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: Option<String>,
    pub require_ssl: bool,
}

impl ConnectionParams {
    pub fn ssl_mode(&self) -> SslMode {
        if self.require_ssl {
            SslMode::Require
        } else {
            SslMode::Disable
        }
    }

    /// Same server and credentials, different database.
    pub fn with_database(&self, database: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            ..self.clone()
        }
    }
}

/// Open a connection. Statements run outside explicit transactions, so every
/// statement commits on its own.
pub fn connect(params: &ConnectionParams) -> Result<postgres::Client> {
    let mut config = postgres::Config::new();
    config
        .host(&params.host)
        .port(params.port)
        .user(&params.user)
        .ssl_mode(params.ssl_mode());
    if let Some(password) = &params.password {
        config.password(password);
    }
    if let Some(database) = &params.database {
        config.dbname(database);
    }

    let tls = MakeRustlsConnect::new(tls::build_rustls_client_config()?);
    Ok(config.connect(tls)?)
}

impl SqlClient for postgres::Client {
    fn execute(&mut self, statement: &str) -> Result<()> {
        self.batch_execute(statement)?;
        Ok(())
    }

    fn query(&mut self, query: &str) -> Result<Vec<Row>> {
        let rows = self
            .simple_query(query)?
            .into_iter()
            .filter_map(|message| match message {
                SimpleQueryMessage::Row(row) => {
                    Some((0..row.len()).map(|i| row.get(i).map(str::to_owned)).collect())
                }
                _ => None,
            })
            .collect();
        Ok(rows)
    }

    fn close(self) -> Result<()> {
        postgres::Client::close(self)?;
        Ok(())
    }
}

//! Database handle: connection opener and user queries

use super::schema::MYSQL_INIT;
use super::user::User;
use crate::config::ConnectionConfig;
use crate::connection::TrustRegistry;
use crate::metrics::{counters, histograms, labels};
use crate::Result;
use futures::TryStreamExt;
use sqlx::mysql::MySqlConnection;
use sqlx::Connection as _;
use std::time::Instant;
use tracing::Instrument;

const SELECT_USERS: &str = "SELECT id, cat, uat, name FROM `user` ORDER BY cat, id";
const SELECT_USERS_RAW: &str = "SELECT id, CAST(cat AS CHAR) AS cat, CAST(uat AS CHAR) AS uat, name \
     FROM `user` ORDER BY cat, id";
const INSERT_USER: &str = "INSERT INTO `user` (name) VALUES (?)";
const UPDATE_USER_NAME: &str = "UPDATE `user` SET name = ? WHERE name = ?";
const DELETE_USER: &str = "DELETE FROM `user` WHERE name = ?";

/// Open connection to the CRUD database
///
/// One connection, used sequentially. Every query is a single parameterized
/// statement.
pub struct Database {
    conn: MySqlConnection,
    parse_time: bool,
}

impl Database {
    /// Connect and ping.
    ///
    /// # Errors
    ///
    /// * [`Error::Config`](crate::Error::Config) if the config cannot be turned into
    ///   driver options (bad address, unregistered trust profile)
    /// * [`Error::Sql`](crate::Error::Sql) if connecting or the ping fails
    pub async fn open(config: &ConnectionConfig, registry: &TrustRegistry) -> Result<Self> {
        let parse_time = config.parse_time;
        async {
            let options = config.connect_options(registry)?;
            let started = Instant::now();

            let result: Result<MySqlConnection> = async {
                let mut conn = MySqlConnection::connect_with(&options).await?;
                conn.ping().await?;
                Ok(conn)
            }
            .await;
            let conn = record(labels::OP_OPEN, started, result)?;

            tracing::info!(tls = config.tls_enabled(), "connection established");
            Ok(Self { conn, parse_time })
        }
        .instrument(tracing::info_span!("open", dsn = %config.dsn()))
        .await
    }

    /// Create the `user` table and its UUID trigger if missing
    pub async fn init_schema(&mut self) -> Result<()> {
        let started = Instant::now();
        let result: Result<()> = async {
            for stmt in MYSQL_INIT {
                // Text protocol: CREATE TRIGGER cannot be prepared
                sqlx::raw_sql(stmt).execute(&mut self.conn).await?;
            }
            Ok(())
        }
        .instrument(tracing::debug_span!("init_schema"))
        .await;
        record(labels::OP_INIT_SCHEMA, started, result)?;
        tracing::info!("schema ready");
        Ok(())
    }

    /// All users, ordered by creation time (`cat`) and then by id.
    ///
    /// `cat` has one-second resolution and ids are `uuid()` text, so rows created
    /// within the same second are not guaranteed to come back in insertion order.
    pub async fn users(&mut self) -> Result<Vec<User>> {
        let parse_time = self.parse_time;
        let sql = if parse_time {
            SELECT_USERS
        } else {
            SELECT_USERS_RAW
        };

        let started = Instant::now();
        let result: Result<Vec<User>> = async {
            let mut users = Vec::new();
            let mut rows = sqlx::query(sql).fetch(&mut self.conn);
            while let Some(row) = rows.try_next().await? {
                users.push(User::from_row(&row, parse_time)?);
            }
            Ok(users)
        }
        .instrument(tracing::debug_span!("users"))
        .await;

        let users = record(labels::OP_LIST, started, result)?;
        tracing::debug!(count = users.len(), "listed users");
        Ok(users)
    }

    /// Insert a user; the server assigns id and timestamps. Returns rows affected.
    pub async fn add_user(&mut self, name: &str) -> Result<u64> {
        let started = Instant::now();
        let result: Result<u64> = sqlx::query(INSERT_USER)
            .bind(name)
            .execute(&mut self.conn)
            .instrument(tracing::debug_span!("add_user", name = %name))
            .await
            .map(|done| done.rows_affected())
            .map_err(Into::into);
        record(labels::OP_ADD, started, result)
    }

    /// Rename every user called `old_name`. Returns rows affected.
    pub async fn rename_user(&mut self, old_name: &str, new_name: &str) -> Result<u64> {
        let started = Instant::now();
        let result: Result<u64> = sqlx::query(UPDATE_USER_NAME)
            .bind(new_name)
            .bind(old_name)
            .execute(&mut self.conn)
            .instrument(tracing::debug_span!("rename_user", old = %old_name, new = %new_name))
            .await
            .map(|done| done.rows_affected())
            .map_err(Into::into);
        record(labels::OP_RENAME, started, result)
    }

    /// Delete every user called `name`. Returns rows affected.
    pub async fn delete_user(&mut self, name: &str) -> Result<u64> {
        let started = Instant::now();
        let result: Result<u64> = sqlx::query(DELETE_USER)
            .bind(name)
            .execute(&mut self.conn)
            .instrument(tracing::debug_span!("delete_user", name = %name))
            .await
            .map(|done| done.rows_affected())
            .map_err(Into::into);
        record(labels::OP_DELETE, started, result)
    }

    /// Close the connection gracefully
    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }
}

fn record<T>(operation: &'static str, started: Instant, result: Result<T>) -> Result<T> {
    histograms::query_duration(operation, started.elapsed());
    match result {
        Ok(value) => {
            counters::query_executed(operation);
            Ok(value)
        }
        Err(e) => {
            counters::query_failed(operation, e.category());
            tracing::debug!(operation, error = %e, "database operation failed");
            Err(e)
        }
    }
}

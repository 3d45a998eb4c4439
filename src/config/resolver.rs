//! Connection configuration resolved from the environment

use super::env::Env;
use crate::connection::{load_trust_profile, TrustRegistry};
use crate::{Error, Result};
use std::path::Path;

/// Environment variable names
pub mod vars {
    /// Overrides the username
    pub const DB_USER: &str = "DB_USER";
    /// Overrides the password
    pub const DB_PASS: &str = "DB_PASS";
    /// Overrides the `host:port` address
    pub const DB_ADDR: &str = "DB_ADDR";
    /// Overrides the database name
    pub const DB_NAME: &str = "DB_NAME";
    /// Presence disables the TLS requirement
    pub const DB_SKIP_TLS: &str = "DB_SKIP_TLS";
    /// Path to the CA bundle
    pub const DB_CA_CERT_PATH: &str = "DB_CA_CERT_PATH";
    /// Path to the client certificate
    pub const DB_CLIENT_CERT_PATH: &str = "DB_CLIENT_CERT_PATH";
    /// Path to the client private key
    pub const DB_CLIENT_KEY_PATH: &str = "DB_CLIENT_KEY_PATH";
}

/// Default username
pub const DEFAULT_USER: &str = "root";
/// Default address
pub const DEFAULT_ADDR: &str = "localhost:3306";
/// Default database name
pub const DEFAULT_DATABASE: &str = "mycrud";

/// Network transport. Only TCP is supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Network {
    /// TCP socket
    #[default]
    Tcp,
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
        }
    }
}

/// Session timezone. Fixed to UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timezone {
    /// Coordinated Universal Time
    #[default]
    Utc,
}

impl Timezone {
    /// Offset string sent to the server as `time_zone`
    pub fn offset(&self) -> &'static str {
        match self {
            Self::Utc => "+00:00",
        }
    }
}

impl std::fmt::Display for Timezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utc => write!(f, "UTC"),
        }
    }
}

/// Connection configuration
///
/// Resolved once per process by [`ConnectionConfig::from_env`] and handed to
/// [`Database::open`](crate::Database::open). When `tls` is set it names a trust
/// profile in the [`TrustRegistry`] the config was resolved against.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Username
    pub user: String,
    /// Password (empty means none)
    pub password: String,
    /// Network transport
    pub net: Network,
    /// Server address as `host:port`
    pub addr: String,
    /// Database name
    pub database: String,
    /// Session timezone
    pub timezone: Timezone,
    /// Decode temporal columns into native timestamps
    pub parse_time: bool,
    /// Trust profile key, `None` when TLS is skipped
    pub tls: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            net: Network::Tcp,
            addr: DEFAULT_ADDR.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            timezone: Timezone::Utc,
            parse_time: true,
            tls: None,
        }
    }
}

impl ConnectionConfig {
    /// Resolve configuration from an environment source.
    ///
    /// `DB_USER`, `DB_PASS`, `DB_ADDR` and `DB_NAME` override the defaults whenever
    /// they are set, even to an empty value. If `DB_SKIP_TLS` is set the config is
    /// returned without a trust profile. Otherwise `DB_CA_CERT_PATH`,
    /// `DB_CLIENT_CERT_PATH` and `DB_CLIENT_KEY_PATH` are required (checked in that
    /// order) and the trust material they name is loaded into `registry`.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingEnv`] for the first missing path variable
    /// * any loader error from [`load_trust_profile`]
    pub fn from_env(env: &impl Env, registry: &mut TrustRegistry) -> Result<Self> {
        let mut config = Self::default();

        if let Some(user) = env.lookup(vars::DB_USER) {
            config.user = user;
        }
        if let Some(password) = env.lookup(vars::DB_PASS) {
            config.password = password;
        }
        if let Some(addr) = env.lookup(vars::DB_ADDR) {
            config.addr = addr;
        }
        if let Some(database) = env.lookup(vars::DB_NAME) {
            config.database = database;
        }

        if env.is_set(vars::DB_SKIP_TLS) {
            tracing::warn!("{} is set, connecting without TLS", vars::DB_SKIP_TLS);
            crate::metrics::counters::config_resolved(false);
            return Ok(config);
        }

        let ca_cert_path = require(env, vars::DB_CA_CERT_PATH)?;
        let client_cert_path = require(env, vars::DB_CLIENT_CERT_PATH)?;
        let client_key_path = require(env, vars::DB_CLIENT_KEY_PATH)?;

        let key = load_trust_profile(
            Path::new(&ca_cert_path),
            Path::new(&client_cert_path),
            Path::new(&client_key_path),
            registry,
        )?;
        config.tls = Some(key);

        crate::metrics::counters::config_resolved(true);
        Ok(config)
    }

    /// Whether the connection must be encrypted
    pub fn tls_enabled(&self) -> bool {
        self.tls.is_some()
    }
}

fn require(env: &impl Env, var: &'static str) -> Result<String> {
    env.lookup(var).ok_or(Error::MissingEnv { var })
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("ConnectionConfig")
            .field("user", &self.user)
            .field("password", &password)
            .field("net", &self.net)
            .field("addr", &self.addr)
            .field("database", &self.database)
            .field("timezone", &self.timezone)
            .field("parse_time", &self.parse_time)
            .field("tls", &self.tls)
            .finish()
    }
}

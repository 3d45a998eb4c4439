//! Error types for mycrud

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// A required environment variable was not set
    #[error("{var} is required and was not set")]
    MissingEnv {
        /// Name of the missing variable
        var: &'static str,
    },

    /// Certificate or key material could not be read
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The CA bundle produced no usable certificate
    #[error(
        "trusted conn with DB not established, cannot parse cert PEM from '{}'",
        path.display()
    )]
    CertificateParse {
        /// CA bundle path
        path: PathBuf,
    },

    /// Client certificate/key pair is malformed or mismatched
    #[error("client key pair error: {0}")]
    KeyPair(String),

    /// Trust profile could not be registered
    #[error("trust profile registration failed: {0}")]
    Registration(String),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Database driver error (connect, ping, query)
    #[error("database error: {0}")]
    Sql(#[from] sqlx::Error),

    /// JSON rendering error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Stable short label for this error kind
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingEnv { .. } => "missing_env",
            Self::Io { .. } => "io",
            Self::CertificateParse { .. } => "certificate_parse",
            Self::KeyPair(_) => "key_pair",
            Self::Registration(_) => "registration",
            Self::Config(_) => "config",
            Self::Sql(_) => "sql",
            Self::Json(_) => "json",
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

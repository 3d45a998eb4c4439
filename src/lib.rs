//! mycrud: a minimal MySQL CRUD client over mutually authenticated TLS
//!
//! The crate resolves connection parameters from the environment, loads a CA bundle
//! and a client certificate/key pair into a named trust profile, and runs four
//! parameterized statements against a single `user` table.
//!
//! Flow:
//! * [`ConnectionConfig::from_env`] reads `DB_*` variables and, unless `DB_SKIP_TLS`
//!   is present, loads the trust material into a [`TrustRegistry`]
//! * [`Database::open`] builds driver options from the config (resolving the trust
//!   profile by key), connects and pings
//! * [`Database`] methods list, add, rename and delete users
//!
//! ```no_run
//! # async fn example() -> mycrud::Result<()> {
//! use mycrud::{ConnectionConfig, Database, ProcessEnv, TrustRegistry};
//!
//! let mut registry = TrustRegistry::new();
//! let config = ConnectionConfig::from_env(&ProcessEnv, &mut registry)?;
//! let mut db = Database::open(&config, &registry).await?;
//! for user in db.users().await? {
//!     println!("{}", user);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod metrics;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{Database, Timestamp, User};
pub use config::{ConnectionConfig, Env, ProcessEnv};
pub use connection::{TrustProfile, TrustRegistry, TRUST_PROFILE_KEY};
pub use error::{Error, Result};

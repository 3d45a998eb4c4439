//! Database client
//!
//! This module handles:
//! * Connection string building (DSN rendering, driver options)
//! * Opening and pinging the connection
//! * The four user queries and the schema bootstrap

pub mod connection_string;
mod database;
pub mod schema;
mod user;

pub use connection_string::split_addr;
pub use database::Database;
pub use user::{Timestamp, User};

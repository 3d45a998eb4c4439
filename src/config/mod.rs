//! Configuration resolution
//!
//! This module handles:
//! * Environment sources (process environment or an in-memory map)
//! * Defaults and presence-based overrides
//! * The TLS decision and delegation to the trust loader

mod env;
mod resolver;

pub use env::{Env, ProcessEnv};
pub use resolver::{
    vars, ConnectionConfig, Network, Timezone, DEFAULT_ADDR, DEFAULT_DATABASE, DEFAULT_USER,
};

//! Trusted-connection material
//!
//! This module handles:
//! * Loading a CA bundle and client certificate/key pair into a trust profile
//! * Validating that the trust set is non-empty and the key pair matches
//! * Registering profiles by key for the connection-string builder

mod registry;
mod tls;

pub use registry::TrustRegistry;
pub use tls::{load_trust_profile, TrustProfile, TrustProfileBuilder, TRUST_PROFILE_KEY};

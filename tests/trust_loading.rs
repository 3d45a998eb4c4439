//! End-to-end configuration resolution against real PEM files

mod common;

use mycrud::{ConnectionConfig, Error, TrustRegistry, TRUST_PROFILE_KEY};
use std::collections::HashMap;
use std::fs;

fn skip_tls_only() -> HashMap<String, String> {
    let mut env = HashMap::new();
    env.insert("DB_SKIP_TLS".to_string(), String::new());
    env
}

#[test]
fn test_skip_tls_only_yields_defaults() {
    let mut registry = TrustRegistry::new();
    let config = ConnectionConfig::from_env(&skip_tls_only(), &mut registry).unwrap();

    assert!(config.tls.is_none());
    assert_eq!(config.user, "root");
    assert_eq!(config.password, "");
    assert_eq!(config.addr, "localhost:3306");
    assert_eq!(config.database, "mycrud");
    assert!(registry.is_empty());
}

#[test]
fn test_tls_required_and_loaded() {
    let pki = common::write_pki();
    let mut env = pki.env();
    env.insert("DB_USER".to_string(), "app".to_string());
    env.insert("DB_ADDR".to_string(), "db.internal:3307".to_string());

    let mut registry = TrustRegistry::new();
    let config = ConnectionConfig::from_env(&env, &mut registry).unwrap();

    assert_eq!(config.user, "app");
    assert_eq!(config.addr, "db.internal:3307");
    assert_eq!(config.tls.as_deref(), Some(TRUST_PROFILE_KEY));

    let profile = registry.get(TRUST_PROFILE_KEY).expect("profile registered");
    assert_eq!(profile.root_count(), 1);
    assert!(config.connect_options(&registry).is_ok());
    assert!(config.dsn().ends_with("tls=custom"));
}

#[test]
fn test_resolving_twice_overwrites_profile() {
    let pki = common::write_pki();
    let env = pki.env();
    let mut registry = TrustRegistry::new();

    let first = ConnectionConfig::from_env(&env, &mut registry).unwrap();
    let second = ConnectionConfig::from_env(&env, &mut registry).unwrap();

    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_skip_tls_wins_over_paths() {
    let pki = common::write_pki();
    let mut env = pki.env();
    env.insert("DB_SKIP_TLS".to_string(), "false".to_string());

    let mut registry = TrustRegistry::new();
    let config = ConnectionConfig::from_env(&env, &mut registry).unwrap();

    assert!(config.tls.is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_missing_key_variable_named() {
    let pki = common::write_pki();
    let mut env = pki.env();
    env.remove("DB_CLIENT_KEY_PATH");

    let err = ConnectionConfig::from_env(&env, &mut TrustRegistry::new()).unwrap_err();
    assert_eq!(err.to_string(), "DB_CLIENT_KEY_PATH is required and was not set");
}

#[test]
fn test_empty_ca_bundle() {
    let pki = common::write_pki();
    fs::write(&pki.ca, "").unwrap();

    let err = ConnectionConfig::from_env(&pki.env(), &mut TrustRegistry::new()).unwrap_err();
    assert!(matches!(err, Error::CertificateParse { .. }), "got {:?}", err);
}

#[test]
fn test_mismatched_key_pair() {
    let pki = common::write_pki();
    let mut env = pki.env();
    env.insert(
        "DB_CLIENT_KEY_PATH".to_string(),
        pki.other_key.display().to_string(),
    );

    let mut registry = TrustRegistry::new();
    let err = ConnectionConfig::from_env(&env, &mut registry).unwrap_err();
    assert!(matches!(err, Error::KeyPair(_)), "got {:?}", err);
    assert!(registry.is_empty());
}

#[test]
fn test_unreadable_client_cert() {
    let pki = common::write_pki();
    fs::remove_file(&pki.client_cert).unwrap();

    let err = ConnectionConfig::from_env(&pki.env(), &mut TrustRegistry::new()).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got {:?}", err);
    assert_eq!(err.category(), "io");
}

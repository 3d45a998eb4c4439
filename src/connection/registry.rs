//! Trust profile registry

use super::tls::TrustProfile;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Boolean spellings the MySQL DSN `tls` parameter reads as on/off. Matched exactly.
const BOOL_KEYS: &[&str] = &["1", "true", "TRUE", "True", "0", "false", "FALSE", "False"];

/// Modes the `tls` parameter names. Matched case-insensitively.
const MODE_KEYS: &[&str] = &["skip-verify", "preferred"];

/// Trust profiles by key.
///
/// Owned by the caller and passed explicitly to the loader and to the
/// connection-string builder. Registering a key that already exists replaces the
/// earlier profile.
#[derive(Debug, Default)]
pub struct TrustRegistry {
    profiles: HashMap<String, Arc<TrustProfile>>,
}

impl TrustRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a profile under its key, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// [`Error::Registration`] if the key is empty or reserved.
    pub fn register(&mut self, profile: TrustProfile) -> Result<()> {
        let key = profile.key().to_string();
        validate_key(&key)?;

        let replaced = self.profiles.insert(key.clone(), Arc::new(profile)).is_some();
        if replaced {
            tracing::debug!(key = %key, "replaced trust profile");
        } else {
            tracing::debug!(key = %key, "registered trust profile");
        }
        crate::metrics::counters::trust_profile_registered(replaced);
        Ok(())
    }

    /// Look up a profile
    pub fn get(&self, key: &str) -> Option<Arc<TrustProfile>> {
        self.profiles.get(key).cloned()
    }

    /// Number of registered profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no profile is registered
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::Registration("trust profile key is empty".into()));
    }
    let is_mode = MODE_KEYS.iter().any(|mode| key.eq_ignore_ascii_case(mode));
    if BOOL_KEYS.contains(&key) || is_mode {
        return Err(Error::Registration(format!("key '{}' is reserved", key)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_pki;
    use crate::TRUST_PROFILE_KEY;

    #[test]
    fn test_register_and_get() {
        let pki = write_pki();
        let mut registry = TrustRegistry::new();
        assert!(registry.is_empty());

        registry.register(pki.builder().build().unwrap()).unwrap();

        assert_eq!(registry.len(), 1);
        let profile = registry.get(TRUST_PROFILE_KEY).expect("registered");
        assert_eq!(profile.key(), TRUST_PROFILE_KEY);
        assert!(registry.get("other").is_none());
    }

    #[test]
    fn test_register_same_key_replaces() {
        let pki = write_pki();
        let mut registry = TrustRegistry::new();

        registry.register(pki.builder().build().unwrap()).unwrap();
        let first = registry.get(TRUST_PROFILE_KEY).unwrap();

        let mut bundle = std::fs::read(&pki.ca).unwrap();
        bundle.extend_from_slice(&std::fs::read(&pki.client_cert).unwrap());
        std::fs::write(&pki.ca, bundle).unwrap();
        registry.register(pki.builder().build().unwrap()).unwrap();
        let second = registry.get(TRUST_PROFILE_KEY).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(first.root_count(), 1);
        assert_eq!(second.root_count(), 2);
    }

    #[test]
    fn test_distinct_keys_coexist() {
        let pki = write_pki();
        let mut registry = TrustRegistry::new();

        registry.register(pki.builder().build().unwrap()).unwrap();
        registry
            .register(pki.builder().key("replica").build().unwrap())
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("replica").is_some());
        assert!(registry.get(TRUST_PROFILE_KEY).is_some());
    }

    #[test]
    fn test_reserved_keys_rejected() {
        let pki = write_pki();
        let mut registry = TrustRegistry::new();

        for key in ["", "true", "FALSE", "skip-verify", "Preferred", "1"] {
            let profile = pki.builder().key(key).build().unwrap();
            let err = registry.register(profile).unwrap_err();
            assert!(matches!(err, Error::Registration(_)), "key {:?}", key);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unusual_bool_spellings_are_plain_keys() {
        let pki = write_pki();
        let mut registry = TrustRegistry::new();

        for key in ["tRuE", "fAlSe", "yes"] {
            let profile = pki.builder().key(key).build().unwrap();
            registry.register(profile).unwrap();
        }
        assert_eq!(registry.len(), 3);
        assert!(validate_key("SKIP-VERIFY").is_err());
        assert!(validate_key("True").is_err());
    }
}

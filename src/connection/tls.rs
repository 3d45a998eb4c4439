//! Trust profiles: CA bundle plus client certificate/key for mutual TLS.
//!
//! A [`TrustProfile`] is built from three PEM files. Building it validates everything
//! the server handshake would later depend on: the CA bundle must yield at least one
//! parsable root, and the client key must belong to the client certificate.

use super::registry::TrustRegistry;
use crate::{Error, Result};
use rustls::crypto::CryptoProvider;
use rustls::sign::CertifiedKey;
use rustls::{ClientConfig, RootCertStore};
use rustls_pemfile::Item;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Key under which [`load_trust_profile`] registers its profile.
///
/// Single-profile: loading again replaces the previous profile.
pub const TRUST_PROFILE_KEY: &str = "custom";

/// Validated trust material for one mutually authenticated connection.
///
/// Holds the PEM text as read from disk; the database driver takes its TLS
/// material in that form.
#[derive(Clone)]
pub struct TrustProfile {
    key: String,
    root_count: usize,
    ca_pem: Vec<u8>,
    client_cert_pem: Vec<u8>,
    client_key_pem: Vec<u8>,
}

impl TrustProfile {
    /// Create a new trust profile builder.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let profile = TrustProfile::builder()
    ///     .ca_cert_path("/etc/mysql/ca.pem")
    ///     .client_cert_path("/etc/mysql/client-cert.pem")
    ///     .client_key_path("/etc/mysql/client-key.pem")
    ///     .build()?;
    /// ```
    pub fn builder() -> TrustProfileBuilder {
        TrustProfileBuilder::default()
    }

    /// Registry key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of trusted roots parsed from the CA bundle (never zero)
    pub fn root_count(&self) -> usize {
        self.root_count
    }

    /// CA bundle as read from disk
    pub fn ca_pem(&self) -> &[u8] {
        &self.ca_pem
    }

    /// Client certificate chain as read from disk
    pub fn client_cert_pem(&self) -> &[u8] {
        &self.client_cert_pem
    }

    /// Client private key as read from disk
    pub fn client_key_pem(&self) -> &[u8] {
        &self.client_key_pem
    }
}

impl std::fmt::Debug for TrustProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustProfile")
            .field("key", &self.key)
            .field("root_count", &self.root_count)
            .field("client_key_pem", &"<redacted>")
            .finish()
    }
}

/// Builder for [`TrustProfile`].
#[derive(Debug, Clone)]
pub struct TrustProfileBuilder {
    key: String,
    ca_cert_path: Option<PathBuf>,
    client_cert_path: Option<PathBuf>,
    client_key_path: Option<PathBuf>,
}

impl Default for TrustProfileBuilder {
    fn default() -> Self {
        Self {
            key: TRUST_PROFILE_KEY.to_string(),
            ca_cert_path: None,
            client_cert_path: None,
            client_key_path: None,
        }
    }
}

impl TrustProfileBuilder {
    /// Registry key (default: [`TRUST_PROFILE_KEY`])
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Path to the CA bundle (one or more PEM certificates)
    pub fn ca_cert_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert_path = Some(path.into());
        self
    }

    /// Path to the client certificate chain (PEM)
    pub fn client_cert_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.client_cert_path = Some(path.into());
        self
    }

    /// Path to the client private key (PEM; PKCS#8, PKCS#1 or SEC1)
    pub fn client_key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.client_key_path = Some(path.into());
        self
    }

    /// Read and validate the trust material.
    ///
    /// The CA bundle is read first, then the client certificate, then the key.
    ///
    /// # Errors
    ///
    /// * [`Error::Config`] if a path was not set on the builder
    /// * [`Error::Io`] if a file cannot be read
    /// * [`Error::CertificateParse`] if the CA bundle yields no usable certificate
    /// * [`Error::KeyPair`] if the client certificate or key is missing, malformed,
    ///   or the key does not belong to the certificate
    pub fn build(self) -> Result<TrustProfile> {
        let ca_path = required_path(self.ca_cert_path, "CA certificate")?;
        let cert_path = required_path(self.client_cert_path, "client certificate")?;
        let key_path = required_path(self.client_key_path, "client key")?;

        let started = Instant::now();
        let provider = crypto_provider();

        let ca_pem = read_file(&ca_path)?;
        let root_store = parse_root_store(&ca_pem, &ca_path)?;
        let root_count = root_store.len();

        let client_cert_pem = read_file(&cert_path)?;
        let client_key_pem = read_file(&key_path)?;
        let chain = parse_cert_chain(&client_cert_pem, &cert_path)?;
        let key = parse_private_key(&client_key_pem, &key_path)?;
        verify_key_pair(&provider, &chain, &key, &key_path)?;

        // rustls must accept the material for a client handshake
        ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| Error::Config(format!("unusable TLS crypto provider: {}", e)))?
            .with_root_certificates(root_store)
            .with_client_auth_cert(chain, key)
            .map_err(|e| Error::KeyPair(format!("rejected client certificate: {}", e)))?;

        tracing::debug!(
            key = %self.key,
            roots = root_count,
            ca = %ca_path.display(),
            cert = %cert_path.display(),
            "trust profile loaded"
        );
        crate::metrics::histograms::trust_load_duration(started.elapsed());

        Ok(TrustProfile {
            key: self.key,
            root_count,
            ca_pem,
            client_cert_pem,
            client_key_pem,
        })
    }
}

/// Load trust material and register it under [`TRUST_PROFILE_KEY`].
///
/// Returns the key so a connection-string builder can refer to the profile by name.
/// Registering again under the same key replaces the earlier profile.
///
/// # Errors
///
/// Any error from [`TrustProfileBuilder::build`] or [`TrustRegistry::register`].
pub fn load_trust_profile(
    ca_cert_path: &Path,
    client_cert_path: &Path,
    client_key_path: &Path,
    registry: &mut TrustRegistry,
) -> Result<String> {
    let profile = TrustProfile::builder()
        .ca_cert_path(ca_cert_path)
        .client_cert_path(client_cert_path)
        .client_key_path(client_key_path)
        .build()?;
    let key = profile.key().to_string();
    registry.register(profile)?;
    Ok(key)
}

fn required_path(path: Option<PathBuf>, what: &str) -> Result<PathBuf> {
    path.ok_or_else(|| Error::Config(format!("{} path not set", what)))
}

fn crypto_provider() -> Arc<CryptoProvider> {
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::io(path, e))
}

/// Parse a PEM bundle into a root store, keeping every certificate webpki accepts.
///
/// Each `-----BEGIN` section is read on its own, so a malformed section (bad
/// base64, missing END line) is skipped without losing the sections after it.
fn parse_root_store(pem: &[u8], path: &Path) -> Result<RootCertStore> {
    let mut root_store = RootCertStore::empty();

    for section in pem_sections(pem) {
        let mut reader = section;
        loop {
            match rustls_pemfile::read_one(&mut reader) {
                Ok(Some(Item::X509Certificate(cert))) => {
                    let (_added, ignored) =
                        root_store.add_parsable_certificates(std::iter::once(cert));
                    if ignored > 0 {
                        tracing::debug!(path = %path.display(), "skipping unparsable CA certificate");
                    }
                }
                Ok(Some(_)) => {
                    // Skip non-certificate items (private keys, etc.)
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "skipping malformed PEM section");
                    break;
                }
            }
        }
    }

    if root_store.is_empty() {
        return Err(Error::CertificateParse {
            path: path.to_path_buf(),
        });
    }

    Ok(root_store)
}

/// Split a PEM bundle at every `-----BEGIN` marker. Text before the first marker is dropped.
fn pem_sections(pem: &[u8]) -> Vec<&[u8]> {
    const BEGIN: &[u8] = b"-----BEGIN";

    let starts: Vec<usize> = pem
        .windows(BEGIN.len())
        .enumerate()
        .filter(|(_, window)| *window == BEGIN)
        .map(|(i, _)| i)
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(pem.len());
            &pem[start..end]
        })
        .collect()
}

fn parse_cert_chain(pem: &[u8], path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = pem;
    let chain = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| {
            Error::KeyPair(format!(
                "malformed client certificate '{}': {}",
                path.display(),
                e
            ))
        })?;

    if chain.is_empty() {
        return Err(Error::KeyPair(format!(
            "no certificate found in '{}'",
            path.display()
        )));
    }

    Ok(chain)
}

fn parse_private_key(pem: &[u8], path: &Path) -> Result<PrivateKeyDer<'static>> {
    let mut reader = pem;
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| {
            Error::KeyPair(format!(
                "malformed client key '{}': {}",
                path.display(),
                e
            ))
        })?
        .ok_or_else(|| Error::KeyPair(format!("no private key found in '{}'", path.display())))
}

fn verify_key_pair(
    provider: &CryptoProvider,
    chain: &[CertificateDer<'static>],
    key: &PrivateKeyDer<'static>,
    key_path: &Path,
) -> Result<()> {
    let signing_key = provider
        .key_provider
        .load_private_key(key.clone_key())
        .map_err(|e| {
            Error::KeyPair(format!(
                "unsupported client key '{}': {}",
                key_path.display(),
                e
            ))
        })?;

    CertifiedKey::new(chain.to_vec(), signing_key)
        .keys_match()
        .map_err(|e| {
            Error::KeyPair(format!(
                "client key '{}' does not match client certificate: {}",
                key_path.display(),
                e
            ))
        })
}

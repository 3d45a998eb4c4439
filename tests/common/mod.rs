//! Shared fixtures: throwaway CA and client certificates on disk

use mycrud::config::vars;
use rcgen::{BasicConstraints, CertificateParams, IsCa, Issuer, KeyPair};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub struct Pki {
    pub dir: TempDir,
    pub ca: PathBuf,
    pub client_cert: PathBuf,
    pub client_key: PathBuf,
    pub other_key: PathBuf,
}

impl Pki {
    /// Environment requiring TLS with this PKI
    pub fn env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert(vars::DB_CA_CERT_PATH.to_string(), self.ca.display().to_string());
        env.insert(
            vars::DB_CLIENT_CERT_PATH.to_string(),
            self.client_cert.display().to_string(),
        );
        env.insert(
            vars::DB_CLIENT_KEY_PATH.to_string(),
            self.client_key.display().to_string(),
        );
        env
    }
}

pub fn write_pki() -> Pki {
    let dir = tempfile::tempdir().expect("tempdir");

    let ca_key = KeyPair::generate().expect("ca key");
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).expect("ca params");
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let ca_cert = ca_params.self_signed(&ca_key).expect("ca cert");
    let issuer = Issuer::from_params(&ca_params, &ca_key);

    let client_key = KeyPair::generate().expect("client key");
    let client_params =
        CertificateParams::new(vec!["mycrud-client".to_string()]).expect("client params");
    let client_cert = client_params
        .signed_by(&client_key, &issuer)
        .expect("client cert");
    let other_key = KeyPair::generate().expect("other key");

    let pki = Pki {
        ca: dir.path().join("ca.pem"),
        client_cert: dir.path().join("client-cert.pem"),
        client_key: dir.path().join("client-key.pem"),
        other_key: dir.path().join("other-key.pem"),
        dir,
    };
    fs::write(&pki.ca, ca_cert.pem()).expect("write ca");
    fs::write(&pki.client_cert, client_cert.pem()).expect("write cert");
    fs::write(&pki.client_key, client_key.serialize_pem()).expect("write key");
    fs::write(&pki.other_key, other_key.serialize_pem()).expect("write other key");
    pki
}

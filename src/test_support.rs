//! Test fixtures: throwaway CA and client certificates on disk

use crate::config::vars;
use crate::connection::TrustProfileBuilder;
use crate::TrustProfile;
use rcgen::{BasicConstraints, CertificateParams, IsCa, Issuer, KeyPair};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub(crate) struct Pki {
    pub dir: TempDir,
    pub ca: PathBuf,
    pub client_cert: PathBuf,
    pub client_key: PathBuf,
    /// Valid key that belongs to no certificate here
    pub other_key: PathBuf,
}

impl Pki {
    pub fn builder(&self) -> TrustProfileBuilder {
        TrustProfile::builder()
            .ca_cert_path(&self.ca)
            .client_cert_path(&self.client_cert)
            .client_key_path(&self.client_key)
    }

    pub fn env(&self) -> HashMap<String, String> {
        [
            (vars::DB_CA_CERT_PATH, &self.ca),
            (vars::DB_CLIENT_CERT_PATH, &self.client_cert),
            (vars::DB_CLIENT_KEY_PATH, &self.client_key),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.display().to_string()))
        .collect()
    }
}

pub(crate) fn write_pki() -> Pki {
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

//! Certificate credentials configured by the application.

use std::fmt;
use std::sync::Arc;

use ferrotls_crypto::{DhParams, RsaPrivateKey};
use ferrotls_types::{PkAlgorithm, TlsError};

use crate::cert::{Certificate, PrivateKey};

/// A certificate chain (leaf first) with its private key.
#[derive(Debug, Clone)]
pub struct CertPair {
    pub chain: Vec<Certificate>,
    pub key: PrivateKey,
}

/// The certificate/key pair a session settled on for this handshake.
#[derive(Debug, Clone)]
pub struct SelectedCert {
    pub chain: Vec<Certificate>,
    pub key: PrivateKey,
}

impl SelectedCert {
    pub fn leaf(&self) -> &Certificate {
        &self.chain[0]
    }
}

/// Application callback overriding automatic client certificate selection.
///
/// Receives the acceptable issuer DNs and public key algorithms from the
/// server's CertificateRequest and returns the index of the credential
/// pair to use, or `None` to send no certificate.
pub type RetrieveCallback = Arc<dyn Fn(&[Vec<u8>], &[PkAlgorithm]) -> Option<usize> + Send + Sync>;

/// Certificates, keys and key exchange parameters shared across sessions.
#[derive(Default)]
pub struct CertificateCredentials {
    pairs: Vec<CertPair>,
    dh_params: Option<DhParams>,
    rsa_export_key: Option<RsaPrivateKey>,
    retrieve: Option<RetrieveCallback>,
}

impl CertificateCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a certificate chain and its private key.
    ///
    /// The chain must be non-empty and the key algorithm must match the
    /// leaf certificate.
    pub fn add_pair(&mut self, chain: Vec<Certificate>, key: PrivateKey) -> Result<(), TlsError> {
        let leaf = chain.first().ok_or(TlsError::InvalidRequest)?;
        if leaf.pk_algorithm() != key.pk_algorithm() {
            return Err(TlsError::InvalidRequest);
        }
        self.pairs.push(CertPair { chain, key });
        Ok(())
    }

    pub fn pairs(&self) -> &[CertPair] {
        &self.pairs
    }

    /// Diffie-Hellman group used by the DHE key exchanges on the server.
    pub fn set_dh_params(&mut self, params: DhParams) {
        self.dh_params = Some(params);
    }

    pub fn dh_params(&self) -> Option<&DhParams> {
        self.dh_params.as_ref()
    }

    /// Ephemeral RSA key for RSA-EXPORT when the certified key exceeds
    /// the 512-bit export limit.
    pub fn set_rsa_export_key(&mut self, key: RsaPrivateKey) -> Result<(), TlsError> {
        if key.bits() > 512 {
            return Err(TlsError::InvalidRequest);
        }
        self.rsa_export_key = Some(key);
        Ok(())
    }

    pub fn rsa_export_key(&self) -> Option<&RsaPrivateKey> {
        self.rsa_export_key.as_ref()
    }

    pub fn set_retrieve_callback(&mut self, callback: RetrieveCallback) {
        self.retrieve = Some(callback);
    }

    pub fn retrieve_callback(&self) -> Option<&RetrieveCallback> {
        self.retrieve.as_ref()
    }
}

impl fmt::Debug for CertificateCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateCredentials")
            .field("pairs", &self.pairs.len())
            .field("dh_params", &self.dh_params.is_some())
            .field("rsa_export_key", &self.rsa_export_key.is_some())
            .field("retrieve", &self.retrieve.is_some())
            .finish()
    }
}

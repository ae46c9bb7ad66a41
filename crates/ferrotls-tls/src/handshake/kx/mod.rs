//! Key exchange strategies.
//!
//! Each cipher suite family implements [`KeyExchange`]; the handshake
//! driver looks the strategy up once via [`key_exchange`] and calls the
//! four hooks at the corresponding points of the flight schedule. A
//! strategy that does not send a ServerKeyExchange returns `Ok(None)`
//! from [`KeyExchange::generate_server_kx`].

use ferrotls_types::{KxAlgorithm, TlsError};

use crate::credentials::CertificateCredentials;
use crate::session::Session;

pub mod dhe;
pub mod rsa;
pub mod rsa_export;

pub trait KeyExchange {
    /// Build the ServerKeyExchange body, or `None` when the suite does
    /// not send one in this configuration.
    fn generate_server_kx(
        &self,
        session: &mut Session,
        credentials: &CertificateCredentials,
    ) -> Result<Option<Vec<u8>>, TlsError>;

    /// Client side: consume the server's ServerKeyExchange body.
    fn process_server_kx(&self, session: &mut Session, body: &[u8]) -> Result<(), TlsError>;

    /// Client side: build the ClientKeyExchange body. On success the
    /// session holds the premaster secret.
    fn generate_client_kx(&self, session: &mut Session) -> Result<Vec<u8>, TlsError>;

    /// Server side: consume the client's ClientKeyExchange body. On
    /// success the session holds the premaster secret.
    fn process_client_kx(
        &self,
        session: &mut Session,
        credentials: &CertificateCredentials,
        body: &[u8],
    ) -> Result<(), TlsError>;
}

/// The strategy for a negotiated key exchange algorithm.
pub fn key_exchange(kx: KxAlgorithm) -> &'static dyn KeyExchange {
    match kx {
        KxAlgorithm::Rsa => &rsa::RsaKeyExchange,
        KxAlgorithm::RsaExport => &rsa_export::RsaExportKeyExchange,
        KxAlgorithm::DheRsa | KxAlgorithm::DheDss => &dhe::DheKeyExchange,
    }
}

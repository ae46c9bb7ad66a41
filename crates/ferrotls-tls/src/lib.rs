#![forbid(unsafe_code)]
#![doc = "Certificate authentication and key exchange for the ferrotls handshake."]
//!
//! This crate covers the certificate-based part of an SSL3/TLS 1.x
//! handshake: encoding and decoding the Certificate, CertificateRequest,
//! CertificateVerify, ServerKeyExchange and ClientKeyExchange messages,
//! selecting a certificate/key pair from the configured credentials, and
//! deriving the premaster secret for the RSA, RSA-EXPORT, DHE-RSA and
//! DHE-DSS key exchanges. Record framing, the handshake state machine and
//! X.509 chain validation live elsewhere; certificates enter this layer
//! already parsed through the [`CertificateDecoder`] seam.

pub mod cert;
pub mod credentials;
pub mod extensions;
pub mod handshake;
pub mod select;
pub mod session;

pub use cert::{AuthInfo, Certificate, CertificateDecoder, PrivateKey};
pub use credentials::{CertPair, CertificateCredentials, SelectedCert};
pub use handshake::cert_msgs::CertificateRequest;
pub use handshake::kx::{key_exchange, KeyExchange};
pub use session::{Role, Session};

pub use ferrotls_types::{
    Asn1Error, CertificateType, CryptoError, KxAlgorithm, PkAlgorithm, ProtocolVersion, TlsError,
};

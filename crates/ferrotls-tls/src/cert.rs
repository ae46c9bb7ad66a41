//! Parsed certificates, private keys, and the peer authentication record.
//!
//! X.509/DER parsing is not done here. An external parser implements
//! [`CertificateDecoder`] and hands back a [`Certificate`] holding the raw
//! DER, the extracted public key parameters, and the byte ranges of the
//! subject and issuer distinguished names within the DER.

use std::ops::Range;

use ferrotls_crypto::{DsaPrivateKey, DsaPublicKey, Mpi, RsaPrivateKey, RsaPublicKey};
use ferrotls_types::{Asn1Error, PkAlgorithm, TlsError};

/// Seam to the external X.509 parser.
pub trait CertificateDecoder {
    /// Parse one DER-encoded certificate.
    fn decode(&self, der: &[u8]) -> Result<Certificate, Asn1Error>;
}

/// A parsed certificate: raw DER plus the fields this layer consults.
///
/// Public key parameters are positional: RSA carries `[n, e]`, DSA
/// carries `[p, q, g, y]`.
#[derive(Debug, Clone)]
pub struct Certificate {
    der: Vec<u8>,
    pk_algorithm: PkAlgorithm,
    params: Vec<Mpi>,
    subject_dn: Range<usize>,
    issuer_dn: Range<usize>,
}

impl Certificate {
    pub fn new(
        der: Vec<u8>,
        pk_algorithm: PkAlgorithm,
        params: Vec<Mpi>,
        subject_dn: Range<usize>,
        issuer_dn: Range<usize>,
    ) -> Result<Self, TlsError> {
        if params.len() != pk_algorithm.param_count() {
            return Err(TlsError::InvalidRequest);
        }
        if subject_dn.start > subject_dn.end
            || issuer_dn.start > issuer_dn.end
            || subject_dn.end > der.len()
            || issuer_dn.end > der.len()
        {
            return Err(TlsError::InvalidRequest);
        }
        Ok(Certificate {
            der,
            pk_algorithm,
            params,
            subject_dn,
            issuer_dn,
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn pk_algorithm(&self) -> PkAlgorithm {
        self.pk_algorithm
    }

    /// The DER bytes of the subject distinguished name.
    pub fn subject_dn(&self) -> &[u8] {
        &self.der[self.subject_dn.clone()]
    }

    /// The DER bytes of the issuer distinguished name.
    pub fn issuer_dn(&self) -> &[u8] {
        &self.der[self.issuer_dn.clone()]
    }

    /// Size of the public key in bits (RSA modulus, DSA prime).
    pub fn public_key_bits(&self) -> usize {
        self.params[0].bit_len()
    }

    pub fn rsa_public_key(&self) -> Result<RsaPublicKey, TlsError> {
        match self.pk_algorithm {
            PkAlgorithm::Rsa => {
                Ok(RsaPublicKey::from_parts(self.params[0].clone(), self.params[1].clone())?)
            }
            _ => Err(TlsError::UnknownPkAlgorithm),
        }
    }

    pub fn dsa_public_key(&self) -> Result<DsaPublicKey, TlsError> {
        match self.pk_algorithm {
            PkAlgorithm::Dsa => Ok(DsaPublicKey::from_parts(
                self.params[0].clone(),
                self.params[1].clone(),
                self.params[2].clone(),
                self.params[3].clone(),
            )?),
            _ => Err(TlsError::UnknownPkAlgorithm),
        }
    }
}

/// A private key usable for certificate authentication.
#[derive(Debug, Clone)]
pub enum PrivateKey {
    Rsa(RsaPrivateKey),
    Dsa(DsaPrivateKey),
}

impl PrivateKey {
    pub fn pk_algorithm(&self) -> PkAlgorithm {
        match self {
            PrivateKey::Rsa(_) => PkAlgorithm::Rsa,
            PrivateKey::Dsa(_) => PkAlgorithm::Dsa,
        }
    }
}

/// The peer's certificate chain as received in its Certificate message.
///
/// Both the raw DER list (for the application to re-validate) and the
/// parsed forms are kept; index 0 is the leaf.
#[derive(Debug, Default)]
pub struct AuthInfo {
    raw_chain: Vec<Vec<u8>>,
    chain: Vec<Certificate>,
}

impl AuthInfo {
    pub fn is_empty(&self) -> bool {
        self.raw_chain.is_empty()
    }

    pub fn count(&self) -> usize {
        self.raw_chain.len()
    }

    pub fn raw_chain(&self) -> &[Vec<u8>] {
        &self.raw_chain
    }

    /// The peer's end-entity certificate, if a chain was received.
    pub fn peer_leaf(&self) -> Option<&Certificate> {
        self.chain.first()
    }

    pub(crate) fn install(&mut self, raw_chain: Vec<Vec<u8>>, chain: Vec<Certificate>) {
        self.raw_chain = raw_chain;
        self.chain = chain;
    }

    pub(crate) fn clear(&mut self) {
        self.raw_chain.clear();
        self.chain.clear();
    }
}

//! Certificate, CertificateRequest and CertificateVerify codecs.
//!
//! Certificate wire format (RFC 2246 §7.4.2):
//!
//! ```text
//! opaque ASN.1Cert<1..2^24-1>;
//! struct {
//!     ASN.1Cert certificate_list<0..2^24-1>;
//! } Certificate;
//! ```
//!
//! An empty certificate_list is legal for clients that decline a
//! CertificateRequest; it decodes to [`TlsError::NoCertificateFound`],
//! which the driver may treat as non-fatal.

use ferrotls_types::{PkAlgorithm, ProtocolVersion, TlsError};

use crate::cert::Certificate;
use crate::cert::CertificateDecoder;
use crate::handshake::codec::{put_u16_prefixed, put_u24, Reader};
use crate::handshake::sign;
use crate::session::{Role, Session};

/// A decoded CertificateRequest message.
#[derive(Debug, Default, Clone)]
pub struct CertificateRequest {
    /// Acceptable public key algorithms, unknown types already dropped.
    pub algorithms: Vec<PkAlgorithm>,
    /// Raw signature/hash algorithm bytes (TLS 1.2 only), kept as
    /// received for the application to inspect.
    pub hash_algorithms: Vec<u8>,
    /// Acceptable issuer distinguished names, DER-encoded.
    pub issuers: Vec<Vec<u8>>,
}

pub fn encode_certificate_request(
    request: &CertificateRequest,
    version: ProtocolVersion,
) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(request.algorithms.len() as u8);
    for alg in &request.algorithms {
        out.push(alg.client_cert_type_code());
    }
    if version == ProtocolVersion::Tls12 {
        out.push(request.hash_algorithms.len() as u8);
        out.extend_from_slice(&request.hash_algorithms);
    }
    let mut dn_block = Vec::new();
    for dn in &request.issuers {
        put_u16_prefixed(&mut dn_block, dn);
    }
    put_u16_prefixed(&mut out, &dn_block);
    out
}

pub fn decode_certificate_request(
    body: &[u8],
    version: ProtocolVersion,
) -> Result<CertificateRequest, TlsError> {
    let mut r = Reader::new(body);
    let mut request = CertificateRequest::default();

    let count = r.read_u8()? as usize;
    for &code in r.take(count)? {
        match PkAlgorithm::from_client_cert_type_code(code) {
            Some(alg) => request.algorithms.push(alg),
            None => {
                tracing::debug!(code, "skipping unsupported client certificate type");
            }
        }
    }

    if version == ProtocolVersion::Tls12 {
        let hash_count = r.read_u8()? as usize;
        request.hash_algorithms = r.take(hash_count)?.to_vec();
    }

    let mut dns = Reader::new(r.read_u16_prefixed()?);
    while !dns.is_done() {
        request.issuers.push(dns.read_u16_prefixed()?.to_vec());
    }
    if !r.is_done() {
        return Err(TlsError::UnexpectedPacketLength);
    }
    Ok(request)
}

/// Build the CertificateRequest a server sends. `issuers` are the DER
/// DNs of the CAs the application trusts for client authentication.
pub fn generate_certificate_request(session: &Session, issuers: &[Vec<u8>]) -> Vec<u8> {
    let request = CertificateRequest {
        algorithms: vec![PkAlgorithm::Rsa, PkAlgorithm::Dsa],
        hash_algorithms: if session.version() == ProtocolVersion::Tls12 {
            vec![2] // sha1
        } else {
            Vec::new()
        },
        issuers: issuers.to_vec(),
    };
    encode_certificate_request(&request, session.version())
}

pub fn encode_certificate(chain: &[Certificate]) -> Vec<u8> {
    let mut list = Vec::new();
    if chain.is_empty() {
        // A single zero-length entry, the historic empty-list encoding.
        put_u24(&mut list, 0);
    } else {
        for cert in chain {
            put_u24(&mut list, cert.der().len());
            list.extend_from_slice(cert.der());
        }
    }
    let mut out = Vec::with_capacity(list.len() + 3);
    put_u24(&mut out, list.len());
    out.extend_from_slice(&list);
    out
}

pub fn decode_certificate(body: &[u8]) -> Result<Vec<Vec<u8>>, TlsError> {
    let mut r = Reader::new(body);
    let total = r.read_u24()?;
    if total != r.remaining() {
        return Err(TlsError::UnexpectedPacketLength);
    }
    // 0 is an absent list; 3 is a single zero-length entry. Both mean
    // the peer sent no certificate.
    if total == 0 || total == 3 {
        return Err(TlsError::NoCertificateFound);
    }
    let mut chain = Vec::new();
    while !r.is_done() {
        let len = r.read_u24()?;
        if len == 0 {
            return Err(TlsError::UnexpectedPacketLength);
        }
        chain.push(r.take(len)?.to_vec());
    }
    Ok(chain)
}

/// Decode and parse the peer's Certificate message into the session's
/// [`AuthInfo`](crate::cert::AuthInfo). The raw DER chain is retained
/// alongside the parsed certificates for external validation.
pub fn process_certificate(
    session: &mut Session,
    body: &[u8],
    decoder: &dyn CertificateDecoder,
) -> Result<(), TlsError> {
    let raw_chain = match decode_certificate(body) {
        Ok(chain) => chain,
        Err(e) => {
            session.auth_info.clear();
            return Err(e);
        }
    };
    let mut chain = Vec::with_capacity(raw_chain.len());
    for der in &raw_chain {
        chain.push(decoder.decode(der)?);
    }
    session.auth_info.install(raw_chain, chain);
    Ok(())
}

/// Build this endpoint's Certificate message from the cached selection.
///
/// A client without a usable certificate sends the empty list; a server
/// must have selected one.
pub fn generate_certificate(session: &Session) -> Result<Vec<u8>, TlsError> {
    match session.selected() {
        Some(selected) => Ok(encode_certificate(&selected.chain)),
        None => match session.role() {
            Role::Client => Ok(encode_certificate(&[])),
            Role::Server => Err(TlsError::InsufficientCredentials),
        },
    }
}

/// Sign the handshake transcript hash for CertificateVerify.
pub fn generate_certificate_verify(
    session: &Session,
    transcript_hash: &[u8],
) -> Result<Vec<u8>, TlsError> {
    let selected = session.selected().ok_or(TlsError::InternalError)?;
    let signature = sign::sign_transcript(&selected.key, transcript_hash)?;
    let mut out = Vec::with_capacity(signature.len() + 2);
    put_u16_prefixed(&mut out, &signature);
    Ok(out)
}

/// Check the peer's CertificateVerify signature against the transcript
/// hash, using the leaf certificate received earlier in the handshake.
pub fn process_certificate_verify(
    session: &Session,
    body: &[u8],
    transcript_hash: &[u8],
) -> Result<(), TlsError> {
    let leaf = session
        .auth_info()
        .peer_leaf()
        .ok_or(TlsError::InternalError)?;
    let mut r = Reader::new(body);
    let signature = r.read_u16_prefixed()?;
    if !r.is_done() {
        return Err(TlsError::UnexpectedPacketLength);
    }
    sign::verify_transcript(leaf, transcript_hash, signature)
}

//! The cert_type extension (certificate format negotiation).
//!
//! The client offers a list of certificate types in preference order
//! (u8 length prefix); the server answers with the single type it
//! picked. Only X.509 is ever selected here; a client list without it
//! fails the handshake.

use ferrotls_types::{CertificateType, TlsError};

use crate::handshake::codec::Reader;
use crate::session::{Role, Session};

pub(super) fn send(session: &mut Session, out: &mut Vec<u8>) -> Result<(), TlsError> {
    match session.role() {
        Role::Client => {
            if session.ext.offered_cert_types.is_empty() {
                return Ok(());
            }
            out.push(session.ext.offered_cert_types.len() as u8);
            for t in &session.ext.offered_cert_types {
                out.push(t.code());
            }
        }
        Role::Server => {
            if session.ext.cert_type_requested {
                out.push(session.cert_type().code());
            }
        }
    }
    Ok(())
}

pub(super) fn recv(session: &mut Session, body: &[u8]) -> Result<(), TlsError> {
    match session.role() {
        Role::Server => {
            let mut r = Reader::new(body);
            let count = r.read_u8()? as usize;
            let codes = r.take(count)?;
            if !r.is_done() {
                return Err(TlsError::UnexpectedPacketLength);
            }
            if !codes.contains(&CertificateType::X509.code()) {
                return Err(TlsError::UnsupportedCertificateType);
            }
            session.set_cert_type(CertificateType::X509);
            session.ext.cert_type_requested = true;
        }
        Role::Client => {
            if body.len() != 1 {
                return Err(TlsError::UnexpectedPacketLength);
            }
            let picked = CertificateType::from_code(body[0])
                .ok_or(TlsError::ReceivedIllegalParameter)?;
            if !session.ext.offered_cert_types.contains(&picked) {
                return Err(TlsError::ReceivedIllegalParameter);
            }
            session.set_cert_type(picked);
        }
    }
    Ok(())
}

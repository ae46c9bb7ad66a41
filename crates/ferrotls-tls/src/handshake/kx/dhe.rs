//! Ephemeral Diffie-Hellman key exchange (DHE-RSA and DHE-DSS).
//!
//! ServerKeyExchange body:
//!
//! ```text
//! opaque dh_p<1..2^16-1>;
//! opaque dh_g<1..2^16-1>;
//! opaque dh_Ys<1..2^16-1>;
//! signed_params signature<0..2^16-1>;
//! ```
//!
//! The signature covers client_random || server_random || the three
//! parameter fields, hashed per the server certificate's algorithm.

use ferrotls_types::TlsError;

use ferrotls_crypto::{DhKeyPair, DhParams, Mpi};

use crate::credentials::CertificateCredentials;
use crate::handshake::codec::{put_u16_prefixed, Reader};
use crate::handshake::kx::KeyExchange;
use crate::handshake::sign;
use crate::session::Session;

pub struct DheKeyExchange;

impl KeyExchange for DheKeyExchange {
    fn generate_server_kx(
        &self,
        session: &mut Session,
        credentials: &CertificateCredentials,
    ) -> Result<Option<Vec<u8>>, TlsError> {
        let params = credentials
            .dh_params()
            .ok_or(TlsError::InsufficientCredentials)?
            .clone();
        let keypair = DhKeyPair::generate(&params)?;

        let mut body = Vec::new();
        put_u16_prefixed(&mut body, &params.prime_bytes());
        put_u16_prefixed(&mut body, &params.generator_bytes());
        put_u16_prefixed(&mut body, &keypair.public_bytes());

        let key = session
            .selected()
            .ok_or(TlsError::InsufficientCredentials)?
            .key
            .clone();
        let signature = sign::sign_params(session, &key, &body)?;
        put_u16_prefixed(&mut body, &signature);

        session.dh_group = Some(params);
        session.dh_keypair = Some(keypair);
        Ok(Some(body))
    }

    fn process_server_kx(&self, session: &mut Session, body: &[u8]) -> Result<(), TlsError> {
        let mut r = Reader::new(body);
        let p = r.read_u16_prefixed()?;
        let g = r.read_u16_prefixed()?;
        let y = r.read_u16_prefixed()?;
        let params_len = r.consumed();
        let signature = r.read_u16_prefixed()?;
        if !r.is_done() {
            return Err(TlsError::UnexpectedPacketLength);
        }

        let params = DhParams::new(p, g).map_err(|_| TlsError::ReceivedIllegalParameter)?;
        let bits = params.prime_bits();
        if bits < session.min_dh_bits() {
            return Err(TlsError::DhPrimeUnacceptable { bits });
        }
        let peer_public =
            Mpi::from_bytes_be(y).map_err(|_| TlsError::ReceivedIllegalParameter)?;

        let leaf = session
            .auth_info()
            .peer_leaf()
            .ok_or(TlsError::InternalError)?;
        sign::verify_params(session, leaf, &body[..params_len], signature)?;

        session.dh_group = Some(params);
        session.peer_dh_public = Some(peer_public);
        Ok(())
    }

    fn generate_client_kx(&self, session: &mut Session) -> Result<Vec<u8>, TlsError> {
        let params = session.dh_group.take().ok_or(TlsError::InternalError)?;
        let peer_public = session
            .peer_dh_public
            .take()
            .ok_or(TlsError::InternalError)?;

        let keypair = DhKeyPair::generate(&params)?;
        let secret = keypair
            .compute_shared_secret(&params, &peer_public)
            .map_err(|_| TlsError::ReceivedIllegalParameter)?;
        session.set_premaster(secret);

        let mut out = Vec::new();
        put_u16_prefixed(&mut out, &keypair.public_bytes());
        Ok(out)
    }

    fn process_client_kx(
        &self,
        session: &mut Session,
        _credentials: &CertificateCredentials,
        body: &[u8],
    ) -> Result<(), TlsError> {
        let mut r = Reader::new(body);
        let y = r.read_u16_prefixed()?;
        if !r.is_done() {
            return Err(TlsError::UnexpectedPacketLength);
        }
        let peer_public =
            Mpi::from_bytes_be(y).map_err(|_| TlsError::ReceivedIllegalParameter)?;

        let params = session.dh_group.take().ok_or(TlsError::InternalError)?;
        let keypair = session.dh_keypair.take().ok_or(TlsError::InternalError)?;
        let secret = keypair
            .compute_shared_secret(&params, &peer_public)
            .map_err(|_| TlsError::ReceivedIllegalParameter)?;
        session.set_premaster(secret);
        Ok(())
    }
}

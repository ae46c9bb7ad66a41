//! Static RSA key exchange.
//!
//! The client generates the 48-byte premaster secret, stamps the version
//! it advertised in ClientHello into the first two bytes, and encrypts it
//! to the server's certified key (or, for export suites, to the ephemeral
//! key from ServerKeyExchange). SSL3 sends the ciphertext bare; TLS
//! prefixes it with a u16 length.
//!
//! Decryption on the server deliberately never reports a padding failure
//! to the peer: a bad PKCS#1 block or a wrong plaintext length is
//! replaced by 48 fresh random bytes and the handshake proceeds until the
//! Finished check fails. Turning these paths into early errors would
//! reopen the Bleichenbacher padding oracle.

use ferrotls_types::{KxAlgorithm, TlsError};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::credentials::CertificateCredentials;
use crate::handshake::codec::{put_u16_prefixed, Reader};
use crate::handshake::kx::KeyExchange;
use crate::session::Session;

const PREMASTER_LEN: usize = 48;

/// Export suites may only encrypt to keys of at most 512 bits; larger
/// certified keys force an ephemeral ServerKeyExchange key.
const EXPORT_KEY_BITS: usize = 512;

pub struct RsaKeyExchange;

impl KeyExchange for RsaKeyExchange {
    fn generate_server_kx(
        &self,
        _session: &mut Session,
        _credentials: &CertificateCredentials,
    ) -> Result<Option<Vec<u8>>, TlsError> {
        Ok(None)
    }

    fn process_server_kx(&self, _session: &mut Session, _body: &[u8]) -> Result<(), TlsError> {
        // Static RSA never sends a ServerKeyExchange.
        Err(TlsError::InvalidRequest)
    }

    fn generate_client_kx(&self, session: &mut Session) -> Result<Vec<u8>, TlsError> {
        let mut premaster = Zeroizing::new(vec![0u8; PREMASTER_LEN]);
        OsRng.fill_bytes(&mut premaster[..]);
        let version = session.premaster_version().to_bytes();
        premaster[0] = version[0];
        premaster[1] = version[1];

        let leaf = session
            .auth_info()
            .peer_leaf()
            .ok_or(TlsError::InternalError)?;
        let ciphertext = if session.kx() == KxAlgorithm::RsaExport
            && leaf.public_key_bits() > EXPORT_KEY_BITS
        {
            let temp = session
                .peer_rsa_export
                .as_ref()
                .ok_or(TlsError::ReceivedIllegalParameter)?;
            temp.encrypt(&premaster)?
        } else {
            leaf.rsa_public_key()?.encrypt(&premaster)?
        };
        session.set_premaster(premaster);

        if session.version().is_ssl3() {
            Ok(ciphertext)
        } else {
            let mut out = Vec::with_capacity(ciphertext.len() + 2);
            put_u16_prefixed(&mut out, &ciphertext);
            Ok(out)
        }
    }

    fn process_client_kx(
        &self,
        session: &mut Session,
        credentials: &CertificateCredentials,
        body: &[u8],
    ) -> Result<(), TlsError> {
        let ciphertext = if session.version().is_ssl3() {
            body
        } else {
            let mut r = Reader::new(body);
            let ct = r.read_u16_prefixed()?;
            if !r.is_done() {
                return Err(TlsError::UnexpectedPacketLength);
            }
            ct
        };

        let selected = session.selected().ok_or(TlsError::InternalError)?;
        let own_bits = selected.leaf().public_key_bits();
        let key = if session.kx() == KxAlgorithm::RsaExport && own_bits > EXPORT_KEY_BITS {
            credentials
                .rsa_export_key()
                .ok_or(TlsError::InsufficientCredentials)?
                .clone()
        } else {
            match &selected.key {
                crate::cert::PrivateKey::Rsa(k) => k.clone(),
                _ => return Err(TlsError::InternalError),
            }
        };

        let expected = session.premaster_version().to_bytes();
        let mut premaster = match key.decrypt(ciphertext) {
            Ok(pt) if pt.len() == PREMASTER_LEN => {
                if pt[0] != expected[0] || pt[1] != expected[1] {
                    // Logged but absorbed; see the module comment.
                    tracing::debug!(
                        got = ?(pt[0], pt[1]),
                        expected = ?(expected[0], expected[1]),
                        "premaster secret version mismatch"
                    );
                }
                pt
            }
            _ => {
                // Bad padding or wrong length: substitute random bytes
                // and let the Finished check fail later.
                let mut forged = Zeroizing::new(vec![0u8; PREMASTER_LEN]);
                OsRng.fill_bytes(&mut forged[..]);
                forged
            }
        };
        // The version bytes the derivation sees are always the expected
        // ones, regardless of what the ciphertext contained.
        premaster[0] = expected[0];
        premaster[1] = expected[1];
        session.set_premaster(premaster);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::{Certificate, PrivateKey};
    use crate::credentials::SelectedCert;
    use crate::session::Role;
    use ferrotls_crypto::{Mpi, RsaPrivateKey};
    use ferrotls_types::{PkAlgorithm, ProtocolVersion};

    const N512: &str = "a79149454d5dc4753819f7b976065541bbe57878f0d5c3f01a68a3aba960d6b5\
                        96abf6df0097b4cb2580e8d3da0456a9a15c8ef09f23da418e92411350491cd3";
    const E512: &str = "010001";
    const D512: &str = "73d66ad97ebf3885740ff7817d06a9bf745e10a7428df412b29eedae48bc0a10\
                        8201e8b03052a043701852be447815af6ed75e9072e98bf9573d169a35df11d1";

    fn rsa_key() -> RsaPrivateKey {
        RsaPrivateKey::new(
            &hex::decode(N512).unwrap(),
            &hex::decode(E512).unwrap(),
            &hex::decode(D512).unwrap(),
        )
        .unwrap()
    }

    fn rsa_cert() -> Certificate {
        Certificate::new(
            b"server der".to_vec(),
            PkAlgorithm::Rsa,
            vec![
                Mpi::from_bytes_be(&hex::decode(N512).unwrap()).unwrap(),
                Mpi::from_bytes_be(&hex::decode(E512).unwrap()).unwrap(),
            ],
            0..0,
            0..0,
        )
        .unwrap()
    }

    fn sessions(version: ProtocolVersion) -> (Session, Session) {
        let mut client = Session::new(Role::Client, version, KxAlgorithm::Rsa);
        client
            .auth_info
            .install(vec![b"server der".to_vec()], vec![rsa_cert()]);
        let mut server = Session::new(Role::Server, version, KxAlgorithm::Rsa);
        server.set_selected(Some(SelectedCert {
            chain: vec![rsa_cert()],
            key: PrivateKey::Rsa(rsa_key()),
        }));
        (client, server)
    }

    #[test]
    fn test_exchange_agrees() {
        let (mut client, mut server) = sessions(ProtocolVersion::Tls10);
        let creds = CertificateCredentials::new();
        let wire = RsaKeyExchange.generate_client_kx(&mut client).unwrap();
        RsaKeyExchange
            .process_client_kx(&mut server, &creds, &wire)
            .unwrap();
        let c = client.take_premaster().unwrap();
        let s = server.take_premaster().unwrap();
        assert_eq!(&c[..], &s[..]);
        assert_eq!(&c[..2], &[3, 1]);
    }

    #[test]
    fn test_ssl3_omits_length_prefix() {
        let (mut client, mut server) = sessions(ProtocolVersion::Ssl3);
        let creds = CertificateCredentials::new();
        let wire = RsaKeyExchange.generate_client_kx(&mut client).unwrap();
        // 512-bit key: bare 64-byte ciphertext.
        assert_eq!(wire.len(), 64);
        RsaKeyExchange
            .process_client_kx(&mut server, &creds, &wire)
            .unwrap();
        assert_eq!(
            &client.take_premaster().unwrap()[..],
            &server.take_premaster().unwrap()[..]
        );
    }

    #[test]
    fn test_bad_padding_is_absorbed() {
        // An undecryptable ciphertext must not error; the server carries
        // on with a random premaster so padding failures stay
        // indistinguishable on the wire.
        let (_, mut server) = sessions(ProtocolVersion::Tls10);
        let creds = CertificateCredentials::new();
        let mut wire = Vec::new();
        put_u16_prefixed(&mut wire, &[0x5Au8; 64]);
        RsaKeyExchange
            .process_client_kx(&mut server, &creds, &wire)
            .unwrap();
        let pms = server.take_premaster().unwrap();
        assert_eq!(pms.len(), 48);
        assert_eq!(&pms[..2], &[3, 1]);
    }

    #[test]
    fn test_version_mismatch_is_absorbed_and_overwritten() {
        // A rolled-back version in the premaster is logged, not fatal,
        // and the expected version is stamped over it.
        let (mut client, mut server) = sessions(ProtocolVersion::Tls10);
        let creds = CertificateCredentials::new();
        client.force_premaster_version(Some(ProtocolVersion::Ssl3));
        let wire = RsaKeyExchange.generate_client_kx(&mut client).unwrap();
        RsaKeyExchange
            .process_client_kx(&mut server, &creds, &wire)
            .unwrap();
        let pms = server.take_premaster().unwrap();
        assert_eq!(&pms[..2], &[3, 1]);
    }

    #[test]
    fn test_server_kx_not_sent_or_accepted() {
        let (mut client, mut server) = sessions(ProtocolVersion::Tls10);
        let creds = CertificateCredentials::new();
        assert!(RsaKeyExchange
            .generate_server_kx(&mut server, &creds)
            .unwrap()
            .is_none());
        assert!(RsaKeyExchange
            .process_server_kx(&mut client, &[0u8; 4])
            .is_err());
    }
}

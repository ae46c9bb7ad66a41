//! RSA-EXPORT key exchange.
//!
//! Export suites cap the encryption key at 512 bits. When the certified
//! key fits the cap the exchange degenerates to static RSA and no
//! ServerKeyExchange is sent. Otherwise the server sends a signed
//! ephemeral modulus and exponent:
//!
//! ```text
//! opaque rsa_modulus<1..2^16-1>;
//! opaque rsa_exponent<1..2^16-1>;
//! signed_params signature<0..2^16-1>;
//! ```
//!
//! and the client encrypts the premaster secret to that ephemeral key.
//! The ClientKeyExchange legs are shared with the static RSA strategy.

use ferrotls_types::TlsError;

use ferrotls_crypto::RsaPublicKey;

use crate::credentials::CertificateCredentials;
use crate::handshake::codec::{put_u16_prefixed, Reader};
use crate::handshake::kx::rsa::RsaKeyExchange;
use crate::handshake::kx::KeyExchange;
use crate::handshake::sign;
use crate::session::Session;

const EXPORT_KEY_BITS: usize = 512;

pub struct RsaExportKeyExchange;

impl KeyExchange for RsaExportKeyExchange {
    fn generate_server_kx(
        &self,
        session: &mut Session,
        credentials: &CertificateCredentials,
    ) -> Result<Option<Vec<u8>>, TlsError> {
        let selected = session
            .selected()
            .ok_or(TlsError::InsufficientCredentials)?;
        if selected.leaf().public_key_bits() <= EXPORT_KEY_BITS {
            return Ok(None);
        }
        let key = selected.key.clone();

        let temp = credentials
            .rsa_export_key()
            .ok_or(TlsError::InsufficientCredentials)?
            .public_key();
        let mut body = Vec::new();
        put_u16_prefixed(&mut body, &temp.n_bytes());
        put_u16_prefixed(&mut body, &temp.e_bytes());

        let signature = sign::sign_params(session, &key, &body)?;
        put_u16_prefixed(&mut body, &signature);
        Ok(Some(body))
    }

    fn process_server_kx(&self, session: &mut Session, body: &[u8]) -> Result<(), TlsError> {
        let mut r = Reader::new(body);
        let modulus = r.read_u16_prefixed()?;
        let exponent = r.read_u16_prefixed()?;
        let params_len = r.consumed();
        let signature = r.read_u16_prefixed()?;
        if !r.is_done() {
            return Err(TlsError::UnexpectedPacketLength);
        }

        let temp = RsaPublicKey::new(modulus, exponent)
            .map_err(|_| TlsError::ReceivedIllegalParameter)?;

        let leaf = session
            .auth_info()
            .peer_leaf()
            .ok_or(TlsError::InternalError)?;
        sign::verify_params(session, leaf, &body[..params_len], signature)?;

        session.peer_rsa_export = Some(temp);
        Ok(())
    }

    fn generate_client_kx(&self, session: &mut Session) -> Result<Vec<u8>, TlsError> {
        RsaKeyExchange.generate_client_kx(session)
    }

    fn process_client_kx(
        &self,
        session: &mut Session,
        credentials: &CertificateCredentials,
        body: &[u8],
    ) -> Result<(), TlsError> {
        RsaKeyExchange.process_client_kx(session, credentials, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::{Certificate, PrivateKey};
    use crate::credentials::SelectedCert;
    use crate::session::Role;
    use ferrotls_crypto::{Mpi, RsaPrivateKey};
    use ferrotls_types::{KxAlgorithm, PkAlgorithm, ProtocolVersion};

    const N512: &str = "a79149454d5dc4753819f7b976065541bbe57878f0d5c3f01a68a3aba960d6b5\
                        96abf6df0097b4cb2580e8d3da0456a9a15c8ef09f23da418e92411350491cd3";
    const E512: &str = "010001";
    const D512: &str = "73d66ad97ebf3885740ff7817d06a9bf745e10a7428df412b29eedae48bc0a10\
                        8201e8b03052a043701852be447815af6ed75e9072e98bf9573d169a35df11d1";

    const N1024: &str = "a30cdbfb82624865b5517d5467795c87a82487b960ebf1fd69ea74365f514963\
                         3fdcd63d3210c92d5e0a935b7a0f97e23e4ca56e26f8fc203abf7b0c6bfc042a\
                         8c5772e3389521d18e6b0ee1b2458e41216262aa11e419efceb202c82cc77dfa\
                         d90175c5e7e2cff18cb2c5b44d56217d25a7bac3f09e95eb140ab05e39739e2f";
    const E1024: &str = "010001";
    const D1024: &str = "0f2a930bc2050256f396b0e1b8fe40ed1d66c87925dacc9795d2891cc5a0fa02\
                         915e294f67e8c7cdc0819b5356f73c597f1202114ceebc050371ec302b9b3587\
                         d91d0274d6c9f309cc2a1865c72bd2784de88c76de4c2d14119fe2c02d1e898d\
                         aac67714b6d9bc349d53bf88302ef67d357ff6d09156b70ca0128937091cbb81";

    fn key(n: &str, e: &str, d: &str) -> RsaPrivateKey {
        RsaPrivateKey::new(
            &hex::decode(n).unwrap(),
            &hex::decode(e).unwrap(),
            &hex::decode(d).unwrap(),
        )
        .unwrap()
    }

    fn cert(n: &str, e: &str) -> Certificate {
        Certificate::new(
            b"server der".to_vec(),
            PkAlgorithm::Rsa,
            vec![
                Mpi::from_bytes_be(&hex::decode(n).unwrap()).unwrap(),
                Mpi::from_bytes_be(&hex::decode(e).unwrap()).unwrap(),
            ],
            0..0,
            0..0,
        )
        .unwrap()
    }

    fn sessions(cert_n: &str, cert_e: &str, cert_d: &str) -> (Session, Session) {
        let mut client =
            Session::new(Role::Client, ProtocolVersion::Tls10, KxAlgorithm::RsaExport);
        client
            .auth_info
            .install(vec![b"server der".to_vec()], vec![cert(cert_n, cert_e)]);
        let mut server =
            Session::new(Role::Server, ProtocolVersion::Tls10, KxAlgorithm::RsaExport);
        server.set_selected(Some(SelectedCert {
            chain: vec![cert(cert_n, cert_e)],
            key: PrivateKey::Rsa(key(cert_n, cert_e, cert_d)),
        }));
        (client, server)
    }

    #[test]
    fn test_small_certified_key_sends_no_server_kx() {
        let (_, mut server) = sessions(N512, E512, D512);
        let creds = CertificateCredentials::new();
        assert!(RsaExportKeyExchange
            .generate_server_kx(&mut server, &creds)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_large_certified_key_requires_export_key() {
        let (_, mut server) = sessions(N1024, E1024, D1024);
        let creds = CertificateCredentials::new();
        assert!(matches!(
            RsaExportKeyExchange.generate_server_kx(&mut server, &creds),
            Err(TlsError::InsufficientCredentials)
        ));
    }

    #[test]
    fn test_full_exchange_through_ephemeral_key() {
        let (mut client, mut server) = sessions(N1024, E1024, D1024);
        let mut creds = CertificateCredentials::new();
        creds.set_rsa_export_key(key(N512, E512, D512)).unwrap();

        let ske = RsaExportKeyExchange
            .generate_server_kx(&mut server, &creds)
            .unwrap()
            .unwrap();
        RsaExportKeyExchange
            .process_server_kx(&mut client, &ske)
            .unwrap();
        assert!(client.peer_rsa_export.is_some());

        let cke = RsaExportKeyExchange
            .generate_client_kx(&mut client)
            .unwrap();
        // Ciphertext sized for the 512-bit ephemeral key, not the
        // 1024-bit certified one.
        assert_eq!(cke.len(), 2 + 64);
        RsaExportKeyExchange
            .process_client_kx(&mut server, &creds, &cke)
            .unwrap();
        assert_eq!(
            &client.take_premaster().unwrap()[..],
            &server.take_premaster().unwrap()[..]
        );
    }

    #[test]
    fn test_tampered_ephemeral_key_is_rejected() {
        let (mut client, mut server) = sessions(N1024, E1024, D1024);
        let mut creds = CertificateCredentials::new();
        creds.set_rsa_export_key(key(N512, E512, D512)).unwrap();
        let mut ske = RsaExportKeyExchange
            .generate_server_kx(&mut server, &creds)
            .unwrap()
            .unwrap();
        ske[4] ^= 0x01;
        assert!(RsaExportKeyExchange
            .process_server_kx(&mut client, &ske)
            .is_err());
    }

    #[test]
    fn test_client_without_server_kx_uses_certified_key() {
        // Export suite with a small certified key behaves as static RSA.
        let (mut client, mut server) = sessions(N512, E512, D512);
        let creds = CertificateCredentials::new();
        let cke = RsaExportKeyExchange
            .generate_client_kx(&mut client)
            .unwrap();
        RsaExportKeyExchange
            .process_client_kx(&mut server, &creds, &cke)
            .unwrap();
        assert_eq!(
            &client.take_premaster().unwrap()[..],
            &server.take_premaster().unwrap()[..]
        );
    }
}

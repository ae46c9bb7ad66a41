//! Digital signatures over key exchange parameters and the handshake
//! transcript.
//!
//! RSA signatures use the SSL3/TLS 1.0 convention: a raw PKCS#1 type-1
//! signature over MD5(input) || SHA-1(input), 36 bytes, with no DigestInfo
//! wrapper. DSS signatures sign SHA-1(input) only; when handed a 36-byte
//! combined hash the MD5 half is discarded.

use ferrotls_types::{PkAlgorithm, TlsError};
use md5::Md5;
use sha1::{Digest, Sha1};

use crate::cert::{Certificate, PrivateKey};
use crate::session::Session;

/// Hash ServerKeyExchange parameters together with both hello randoms.
pub(crate) fn hash_signed_params(
    alg: PkAlgorithm,
    client_random: &[u8; 32],
    server_random: &[u8; 32],
    params: &[u8],
) -> Vec<u8> {
    match alg {
        PkAlgorithm::Rsa => {
            let mut md5 = Md5::new();
            md5.update(client_random);
            md5.update(server_random);
            md5.update(params);
            let mut sha1 = Sha1::new();
            sha1.update(client_random);
            sha1.update(server_random);
            sha1.update(params);
            let mut out = Vec::with_capacity(36);
            out.extend_from_slice(&md5.finalize());
            out.extend_from_slice(&sha1.finalize());
            out
        }
        PkAlgorithm::Dsa => {
            let mut sha1 = Sha1::new();
            sha1.update(client_random);
            sha1.update(server_random);
            sha1.update(params);
            sha1.finalize().to_vec()
        }
    }
}

pub(crate) fn sign_params(
    session: &Session,
    key: &PrivateKey,
    params: &[u8],
) -> Result<Vec<u8>, TlsError> {
    let digest = hash_signed_params(
        key.pk_algorithm(),
        session.client_random(),
        session.server_random(),
        params,
    );
    sign_digest(key, &digest)
}

pub(crate) fn verify_params(
    session: &Session,
    cert: &Certificate,
    params: &[u8],
    signature: &[u8],
) -> Result<(), TlsError> {
    let digest = hash_signed_params(
        cert.pk_algorithm(),
        session.client_random(),
        session.server_random(),
        params,
    );
    verify_digest(cert, &digest, signature)
}

/// Sign a transcript hash for CertificateVerify.
pub(crate) fn sign_transcript(key: &PrivateKey, hash: &[u8]) -> Result<Vec<u8>, TlsError> {
    sign_digest(key, hash)
}

/// Verify a CertificateVerify signature against a transcript hash.
pub(crate) fn verify_transcript(
    cert: &Certificate,
    hash: &[u8],
    signature: &[u8],
) -> Result<(), TlsError> {
    verify_digest(cert, hash, signature)
}

fn sign_digest(key: &PrivateKey, digest: &[u8]) -> Result<Vec<u8>, TlsError> {
    match key {
        PrivateKey::Rsa(k) => Ok(k.sign_raw(digest)?),
        PrivateKey::Dsa(k) => Ok(k.sign(dss_portion(digest))?),
    }
}

fn verify_digest(cert: &Certificate, digest: &[u8], signature: &[u8]) -> Result<(), TlsError> {
    match cert.pk_algorithm() {
        PkAlgorithm::Rsa => cert
            .rsa_public_key()?
            .verify_raw(digest, signature)
            .map_err(|_| TlsError::PkSigVerifyFailed),
        PkAlgorithm::Dsa => cert
            .dsa_public_key()?
            .verify(dss_portion(digest), signature)
            .map_err(|_| TlsError::PkSigVerifyFailed),
    }
}

/// DSS signs only the SHA-1 half of a combined MD5 || SHA-1 hash.
fn dss_portion(digest: &[u8]) -> &[u8] {
    if digest.len() == 36 {
        &digest[16..]
    } else {
        digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrotls_crypto::{Mpi, RsaPublicKey};

    // 1024-bit fixture key.
    const N1024: &str = "a30cdbfb82624865b5517d5467795c87a82487b960ebf1fd69ea74365f514963\
                         3fdcd63d3210c92d5e0a935b7a0f97e23e4ca56e26f8fc203abf7b0c6bfc042a\
                         8c5772e3389521d18e6b0ee1b2458e41216262aa11e419efceb202c82cc77dfa\
                         d90175c5e7e2cff18cb2c5b44d56217d25a7bac3f09e95eb140ab05e39739e2f";
    const E1024: &str = "010001";

    #[test]
    fn test_combined_hash_layout() {
        let digest = hash_signed_params(PkAlgorithm::Rsa, &[1u8; 32], &[2u8; 32], b"test params");
        assert_eq!(
            hex::encode(&digest),
            "2233ebb8fdb87a7a34cafcbf2530a28a8f3834aea711b46f3b58773ba0fa07331578515e"
        );
        // The DSS hash is exactly the SHA-1 half.
        let dss = hash_signed_params(PkAlgorithm::Dsa, &[1u8; 32], &[2u8; 32], b"test params");
        assert_eq!(dss.as_slice(), &digest[16..]);
        assert_eq!(dss.as_slice(), dss_portion(&digest));
    }

    #[test]
    fn test_rsa_signature_known_answer() {
        // Signature produced independently over MD5 || SHA-1 of
        // "ServerKeyExchange test params" with the 1024-bit fixture key.
        let key = RsaPublicKey::from_parts(
            Mpi::from_bytes_be(&hex::decode(N1024).unwrap()).unwrap(),
            Mpi::from_bytes_be(&hex::decode(E1024).unwrap()).unwrap(),
        )
        .unwrap();
        let digest = hex::decode(
            "21de63c0086dbe591d04cb4b7544f4eb99aec3d1d57bae07d7384b487dccf326f38d453b",
        )
        .unwrap();
        let sig = hex::decode(
            "3afac5e910a36a36a0f5fae905a65a2fdec52b599570ea52844b4b4e0affc5cb\
             ba45ed003c29c7c8cf9068c25ded619dbe02cc37cf3b895888a7a081ca600735\
             82c36837ff8ece8bb50bf48c941f0424074b31c9450297d8a6497b89ec20a5f4\
             49175841a67765a750dd065f5add6f74ea70610142d06468fffaac0e3d00e47a",
        )
        .unwrap();
        key.verify_raw(&digest, &sig).unwrap();
        let mut bad = sig.clone();
        bad[0] ^= 1;
        assert!(key.verify_raw(&digest, &bad).is_err());
    }
}

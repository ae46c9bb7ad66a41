//! RSA with PKCS#1 v1.5 padding.
//!
//! Encryption uses block type 2, signatures block type 1 over an externally
//! supplied digest with no DigestInfo wrapper (the SSL3/TLS 1.0 signing
//! convention). Unpadding after decryption is constant-time; distinguishing
//! behavior on padding failure is the caller's concern.

use std::fmt;

use ferrotls_types::CryptoError;
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, ConstantTimeGreater};
use zeroize::Zeroizing;

use crate::mpi::Mpi;

/// An RSA public key (modulus, exponent).
#[derive(Debug, Clone)]
pub struct RsaPublicKey {
    n: Mpi,
    e: Mpi,
}

impl RsaPublicKey {
    /// Build a key from big-endian modulus and exponent bytes.
    pub fn new(n: &[u8], e: &[u8]) -> Result<Self, CryptoError> {
        Self::from_parts(Mpi::from_bytes_be(n)?, Mpi::from_bytes_be(e)?)
    }

    pub fn from_parts(n: Mpi, e: Mpi) -> Result<Self, CryptoError> {
        if n.is_zero() || n.is_even() || e.is_zero() {
            return Err(CryptoError::InvalidKey);
        }
        Ok(RsaPublicKey { n, e })
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.n.bit_len()
    }

    /// Modulus size in bytes.
    pub fn modulus_len(&self) -> usize {
        self.bits().div_ceil(8)
    }

    pub fn n_bytes(&self) -> Vec<u8> {
        self.n.to_bytes_be()
    }

    pub fn e_bytes(&self) -> Vec<u8> {
        self.e.to_bytes_be()
    }

    /// PKCS#1 v1.5 block-type-2 encryption.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let k = self.modulus_len();
        if plaintext.len() + 11 > k {
            return Err(CryptoError::InputOverflow);
        }

        // EM = 00 || 02 || PS (nonzero random, >= 8 bytes) || 00 || M
        let ps_len = k - 3 - plaintext.len();
        let mut em = Zeroizing::new(vec![0u8; k]);
        em[1] = 0x02;
        OsRng.fill_bytes(&mut em[2..2 + ps_len]);
        for byte in em[2..2 + ps_len].iter_mut() {
            while *byte == 0 {
                let mut fresh = [0u8; 1];
                OsRng.fill_bytes(&mut fresh);
                *byte = fresh[0];
            }
        }
        em[2 + ps_len] = 0x00;
        em[3 + ps_len..].copy_from_slice(plaintext);

        let m = Mpi::from_bytes_be(&em)?;
        let c = m.mod_exp(&self.e, &self.n)?;
        c.to_bytes_be_padded(k)
    }

    /// Verify a raw PKCS#1 v1.5 block-type-1 signature over `digest`.
    pub fn verify_raw(&self, digest: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
        let k = self.modulus_len();
        if signature.is_empty() || signature.len() > k {
            return Err(CryptoError::RsaVerifyFail);
        }
        let s = Mpi::from_bytes_be(signature)?;
        if s >= self.n {
            return Err(CryptoError::RsaVerifyFail);
        }
        let em = s.mod_exp(&self.e, &self.n)?.to_bytes_be_padded(k)?;
        let expected = type1_pad(digest, k)?;
        if bool::from(em.as_slice().ct_eq(&expected)) {
            Ok(())
        } else {
            Err(CryptoError::RsaVerifyFail)
        }
    }
}

/// An RSA private key (modulus, public exponent, private exponent).
#[derive(Clone)]
pub struct RsaPrivateKey {
    n: Mpi,
    e: Mpi,
    d: Mpi,
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("n", &self.n)
            .field("e", &self.e)
            .field("d", &"<redacted>")
            .finish()
    }
}

impl RsaPrivateKey {
    /// Build a key from big-endian component bytes.
    pub fn new(n: &[u8], e: &[u8], d: &[u8]) -> Result<Self, CryptoError> {
        let n = Mpi::from_bytes_be(n)?;
        let e = Mpi::from_bytes_be(e)?;
        let d = Mpi::from_bytes_be(d)?;
        if n.is_zero() || n.is_even() || e.is_zero() || d.is_zero() {
            return Err(CryptoError::InvalidKey);
        }
        Ok(RsaPrivateKey { n, e, d })
    }

    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            n: self.n.clone(),
            e: self.e.clone(),
        }
    }

    pub fn bits(&self) -> usize {
        self.n.bit_len()
    }

    pub fn modulus_len(&self) -> usize {
        self.bits().div_ceil(8)
    }

    /// PKCS#1 v1.5 block-type-2 decryption with constant-time unpadding.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let k = self.modulus_len();
        if ciphertext.is_empty() || ciphertext.len() > k {
            return Err(CryptoError::RsaInvalidPadding);
        }
        let c = Mpi::from_bytes_be(ciphertext)?;
        if c >= self.n {
            return Err(CryptoError::RsaInvalidPadding);
        }
        let em = Zeroizing::new(c.mod_exp(&self.d, &self.n)?.to_bytes_be_padded(k)?);

        // Scan for the 00 separator without branching on secret bytes.
        let mut found = Choice::from(0u8);
        let mut sep: u32 = 0;
        for (i, byte) in em.iter().enumerate().skip(2) {
            let is_zero = byte.ct_eq(&0u8);
            sep = u32::conditional_select(&sep, &(i as u32), is_zero & !found);
            found |= is_zero;
        }
        // Valid when EM = 00 02 || >= 8 nonzero bytes || 00 || M.
        let ok = em[0].ct_eq(&0x00) & em[1].ct_eq(&0x02) & found & sep.ct_gt(&9);
        if bool::from(ok) {
            Ok(Zeroizing::new(em[sep as usize + 1..].to_vec()))
        } else {
            Err(CryptoError::RsaInvalidPadding)
        }
    }

    /// Produce a raw PKCS#1 v1.5 block-type-1 signature over `digest`.
    pub fn sign_raw(&self, digest: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let k = self.modulus_len();
        let em = type1_pad(digest, k)?;
        let m = Mpi::from_bytes_be(&em)?;
        let s = m.mod_exp(&self.d, &self.n)?;
        s.to_bytes_be_padded(k)
    }
}

/// EM = 00 || 01 || FF.. (>= 8 bytes) || 00 || digest
fn type1_pad(digest: &[u8], k: usize) -> Result<Vec<u8>, CryptoError> {
    if digest.len() + 11 > k {
        return Err(CryptoError::InputOverflow);
    }
    let mut em = vec![0xFFu8; k];
    em[0] = 0x00;
    em[1] = 0x01;
    em[k - digest.len() - 1] = 0x00;
    em[k - digest.len()..].copy_from_slice(digest);
    Ok(em)
}

//! Classic finite-field Diffie-Hellman key agreement.
//!
//! Parameters are application-supplied (p, g) pairs; the shared secret is
//! returned exactly as the modular exponentiation prints it, with no forced
//! left-padding, matching what the master-secret derivation consumes.

use std::fmt;

use ferrotls_types::CryptoError;
use zeroize::Zeroizing;

use crate::mpi::Mpi;

/// Diffie-Hellman domain parameters (prime modulus, generator).
#[derive(Debug, Clone)]
pub struct DhParams {
    p: Mpi,
    g: Mpi,
}

impl DhParams {
    /// Create parameters from big-endian prime and generator bytes.
    pub fn new(p: &[u8], g: &[u8]) -> Result<Self, CryptoError> {
        Self::from_parts(Mpi::from_bytes_be(p)?, Mpi::from_bytes_be(g)?)
    }

    pub fn from_parts(p: Mpi, g: Mpi) -> Result<Self, CryptoError> {
        if p.bit_len() < 2 || p.is_even() {
            return Err(CryptoError::InvalidArg);
        }
        if g <= Mpi::from_u64(1) || g >= p {
            return Err(CryptoError::InvalidArg);
        }
        Ok(DhParams { p, g })
    }

    pub fn prime_bits(&self) -> usize {
        self.p.bit_len()
    }

    pub fn prime_bytes(&self) -> Vec<u8> {
        self.p.to_bytes_be()
    }

    pub fn generator_bytes(&self) -> Vec<u8> {
        self.g.to_bytes_be()
    }
}

/// An ephemeral Diffie-Hellman key pair.
#[derive(Clone)]
pub struct DhKeyPair {
    private: Mpi,
    public: Mpi,
}

impl fmt::Debug for DhKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DhKeyPair")
            .field("private", &"<redacted>")
            .field("public", &self.public)
            .finish()
    }
}

impl DhKeyPair {
    /// Generate a key pair: x random in [2, p-2], y = g^x mod p.
    pub fn generate(params: &DhParams) -> Result<Self, CryptoError> {
        let mut x = Mpi::random_below(&params.p.sub_u64(2)?)?;
        if x < Mpi::from_u64(2) {
            x = Mpi::from_u64(2);
        }
        let y = params.g.mod_exp(&x, &params.p)?;
        Ok(DhKeyPair {
            private: x,
            public: y,
        })
    }

    pub fn public_bytes(&self) -> Vec<u8> {
        self.public.to_bytes_be()
    }

    /// Compute `peer^x mod p` as big-endian bytes.
    ///
    /// Peer values outside [2, p-2] are rejected.
    pub fn compute_shared_secret(
        &self,
        params: &DhParams,
        peer_public: &Mpi,
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        if *peer_public < Mpi::from_u64(2) || *peer_public > params.p.sub_u64(2)? {
            return Err(CryptoError::InvalidKey);
        }
        let secret = peer_public.mod_exp(&self.private, &params.p)?;
        Ok(Zeroizing::new(secret.to_bytes_be()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Small prime for cheap tests; real exchanges use 768+ bit primes.
    const P: u64 = 0xFFFF_FFFF_FFFF_FFC5;
    const G: u64 = 5;

    fn params() -> DhParams {
        DhParams::from_parts(Mpi::from_u64(P), Mpi::from_u64(G)).unwrap()
    }

    #[test]
    fn test_agreement() {
        let params = params();
        let a = DhKeyPair::generate(&params).unwrap();
        let b = DhKeyPair::generate(&params).unwrap();
        let pa = Mpi::from_bytes_be(&a.public_bytes()).unwrap();
        let pb = Mpi::from_bytes_be(&b.public_bytes()).unwrap();
        let s1 = a.compute_shared_secret(&params, &pb).unwrap();
        let s2 = b.compute_shared_secret(&params, &pa).unwrap();
        assert_eq!(&s1[..], &s2[..]);
    }

    #[test]
    fn test_rejects_degenerate_peer_values() {
        let params = params();
        let kp = DhKeyPair::generate(&params).unwrap();
        for bad in [0u64, 1] {
            assert!(kp
                .compute_shared_secret(&params, &Mpi::from_u64(bad))
                .is_err());
        }
        // p - 1 is also degenerate
        let p_minus_1 = Mpi::from_u64(P - 1);
        assert!(kp.compute_shared_secret(&params, &p_minus_1).is_err());
    }

    #[test]
    fn test_rejects_bad_params() {
        // even modulus
        assert!(DhParams::from_parts(Mpi::from_u64(16), Mpi::from_u64(2)).is_err());
        // generator of 1
        assert!(DhParams::from_parts(Mpi::from_u64(23), Mpi::from_u64(1)).is_err());
        // generator >= p
        assert!(DhParams::from_parts(Mpi::from_u64(23), Mpi::from_u64(29)).is_err());
    }

    #[test]
    fn test_debug_redacts_private_scalar() {
        let params = params();
        let kp = DhKeyPair::generate(&params).unwrap();
        let rendered = format!("{:?}", kp);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(&format!("{:?}", kp.private)));
    }

    #[test]
    fn test_shared_secret_has_no_forced_padding() {
        // The secret is printed minimal-width; leading zero bytes are absent.
        let params = params();
        let kp = DhKeyPair::generate(&params).unwrap();
        let peer = Mpi::from_u64(2);
        let secret = kp.compute_shared_secret(&params, &peer).unwrap();
        assert!(secret[0] != 0);
    }
}

//! Opaque arbitrary-precision integer behind a narrow interface.
//!
//! Wraps `num_bigint::BigUint`; only the operations the authentication
//! layer needs are exposed (scan from bytes, print to bytes, modular
//! exponentiation, bit length, modular reduction, ordering).

use ferrotls_types::CryptoError;
use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::rngs::OsRng;

/// An unsigned big integer. Always treated as big-endian with no fixed
/// width on the wire.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mpi(BigUint);

impl Mpi {
    /// Scan an unsigned big-endian byte string.
    ///
    /// A zero-length input is rejected: on the wire it signals a protocol
    /// violation, never the value zero.
    pub fn from_bytes_be(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.is_empty() {
            return Err(CryptoError::MpiScanFailed);
        }
        Ok(Mpi(BigUint::from_bytes_be(bytes)))
    }

    pub fn from_u64(value: u64) -> Self {
        Mpi(BigUint::from(value))
    }

    /// Print as minimal-width big-endian bytes (no forced left-padding;
    /// zero prints as a single `0x00` byte).
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }

    /// Print as big-endian bytes left-padded with zeros to `width`.
    pub fn to_bytes_be_padded(&self, width: usize) -> Result<Vec<u8>, CryptoError> {
        let raw = self.0.to_bytes_be();
        if raw.len() > width {
            return Err(CryptoError::MpiPrintFailed);
        }
        let mut out = vec![0u8; width - raw.len()];
        out.extend_from_slice(&raw);
        Ok(out)
    }

    pub fn bit_len(&self) -> usize {
        self.0.bits() as usize
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_even(&self) -> bool {
        !self.0.bit(0)
    }

    /// `self ^ exp mod modulus`.
    pub fn mod_exp(&self, exp: &Mpi, modulus: &Mpi) -> Result<Mpi, CryptoError> {
        if modulus.is_zero() {
            return Err(CryptoError::DivisionByZero);
        }
        Ok(Mpi(self.0.modpow(&exp.0, &modulus.0)))
    }

    /// `self mod modulus`.
    pub fn mod_reduce(&self, modulus: &Mpi) -> Result<Mpi, CryptoError> {
        if modulus.is_zero() {
            return Err(CryptoError::DivisionByZero);
        }
        Ok(Mpi(&self.0 % &modulus.0))
    }

    pub fn add(&self, other: &Mpi) -> Mpi {
        Mpi(&self.0 + &other.0)
    }

    pub fn mul(&self, other: &Mpi) -> Mpi {
        Mpi(&self.0 * &other.0)
    }

    /// `self - value`, failing if the result would be negative.
    pub fn sub_u64(&self, value: u64) -> Result<Mpi, CryptoError> {
        let v = BigUint::from(value);
        if self.0 < v {
            return Err(CryptoError::InvalidArg);
        }
        Ok(Mpi(&self.0 - v))
    }

    /// Uniform random value in `[0, bound)` from the system RNG.
    pub fn random_below(bound: &Mpi) -> Result<Mpi, CryptoError> {
        if bound.is_zero() {
            return Err(CryptoError::InvalidArg);
        }
        let mut rng = OsRng;
        Ok(Mpi(rng.gen_biguint_below(&bound.0)))
    }
}

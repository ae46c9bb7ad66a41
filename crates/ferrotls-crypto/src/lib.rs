#![forbid(unsafe_code)]
#![doc = "Public-key primitives backing the ferrotls authentication layer."]
//!
//! This crate is deliberately narrow: an opaque arbitrary-precision integer
//! ([`Mpi`]) behind a scan/print/modexp/bit-length interface, PKCS#1 v1.5
//! RSA, DSA with DER-encoded signature values, and classic finite-field
//! Diffie-Hellman. Bignum arithmetic itself is delegated to `num-bigint`;
//! nothing here reimplements it.

pub mod dh;
pub mod dsa;
pub mod mpi;
pub mod rsa;

pub use dh::{DhKeyPair, DhParams};
pub use dsa::{DsaPrivateKey, DsaPublicKey};
pub use mpi::Mpi;
pub use rsa::{RsaPrivateKey, RsaPublicKey};

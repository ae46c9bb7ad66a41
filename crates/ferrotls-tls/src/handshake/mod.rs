//! Handshake message codecs and key exchange strategies.

pub mod cert_msgs;
pub mod codec;
pub mod kx;
pub(crate) mod sign;

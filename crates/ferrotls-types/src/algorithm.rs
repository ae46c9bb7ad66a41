/// Public key algorithm of a certificate or private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PkAlgorithm {
    Rsa,
    Dsa,
}

impl PkAlgorithm {
    /// Number of public key parameters a certificate of this algorithm
    /// must carry (RSA: modulus + exponent, DSA: p, q, g, y).
    pub fn param_count(self) -> usize {
        match self {
            PkAlgorithm::Rsa => 2,
            PkAlgorithm::Dsa => 4,
        }
    }

    /// ClientCertificateType wire code (RFC 2246 §7.4.4).
    pub fn client_cert_type_code(self) -> u8 {
        match self {
            PkAlgorithm::Rsa => 1,
            PkAlgorithm::Dsa => 2,
        }
    }

    /// Map a ClientCertificateType wire code back to an algorithm.
    /// Unrecognized codes yield `None` and are skipped by the caller.
    pub fn from_client_cert_type_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PkAlgorithm::Rsa),
            2 => Some(PkAlgorithm::Dsa),
            _ => None,
        }
    }
}

/// Key exchange algorithm negotiated by the cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KxAlgorithm {
    Rsa,
    RsaExport,
    DheRsa,
    DheDss,
}

impl KxAlgorithm {
    /// Public key algorithm the server certificate must carry for this
    /// key exchange. `None` means any algorithm is acceptable.
    pub fn required_pk_algorithm(self) -> Option<PkAlgorithm> {
        match self {
            KxAlgorithm::Rsa | KxAlgorithm::RsaExport | KxAlgorithm::DheRsa => {
                Some(PkAlgorithm::Rsa)
            }
            KxAlgorithm::DheDss => Some(PkAlgorithm::Dsa),
        }
    }

    /// Whether a ServerKeyExchange message may be sent for this algorithm.
    ///
    /// Static RSA never sends one; RSA-EXPORT sends one conditionally
    /// (the strategy itself decides via its "do not send" result).
    pub fn sends_server_kx(self) -> bool {
        !matches!(self, KxAlgorithm::Rsa)
    }
}

/// Certificate type negotiated through the cert_type hello extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificateType {
    X509,
    OpenPgp,
}

impl CertificateType {
    pub fn code(self) -> u8 {
        match self {
            CertificateType::X509 => 0,
            CertificateType::OpenPgp => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CertificateType::X509),
            1 => Some(CertificateType::OpenPgp),
            _ => None,
        }
    }
}

/// SSL/TLS protocol version, as carried in the premaster secret and used
/// to select wire-format variants (SSL3 omits some length prefixes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtocolVersion {
    Ssl3,
    Tls10,
    Tls11,
    Tls12,
}

impl ProtocolVersion {
    /// The (major, minor) byte pair used on the wire.
    pub fn to_bytes(self) -> [u8; 2] {
        match self {
            ProtocolVersion::Ssl3 => [3, 0],
            ProtocolVersion::Tls10 => [3, 1],
            ProtocolVersion::Tls11 => [3, 2],
            ProtocolVersion::Tls12 => [3, 3],
        }
    }

    pub fn from_bytes(major: u8, minor: u8) -> Option<Self> {
        match (major, minor) {
            (3, 0) => Some(ProtocolVersion::Ssl3),
            (3, 1) => Some(ProtocolVersion::Tls10),
            (3, 2) => Some(ProtocolVersion::Tls11),
            (3, 3) => Some(ProtocolVersion::Tls12),
            _ => None,
        }
    }

    pub fn is_ssl3(self) -> bool {
        matches!(self, ProtocolVersion::Ssl3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pk_param_counts() {
        assert_eq!(PkAlgorithm::Rsa.param_count(), 2);
        assert_eq!(PkAlgorithm::Dsa.param_count(), 4);
    }

    #[test]
    fn test_client_cert_type_codes_roundtrip() {
        for alg in [PkAlgorithm::Rsa, PkAlgorithm::Dsa] {
            let code = alg.client_cert_type_code();
            assert_eq!(PkAlgorithm::from_client_cert_type_code(code), Some(alg));
        }
        // ecdsa_sign and friends are not recognized
        assert_eq!(PkAlgorithm::from_client_cert_type_code(64), None);
    }

    #[test]
    fn test_kx_required_algorithms() {
        assert_eq!(
            KxAlgorithm::DheDss.required_pk_algorithm(),
            Some(PkAlgorithm::Dsa)
        );
        assert_eq!(
            KxAlgorithm::RsaExport.required_pk_algorithm(),
            Some(PkAlgorithm::Rsa)
        );
        assert!(!KxAlgorithm::Rsa.sends_server_kx());
        assert!(KxAlgorithm::DheRsa.sends_server_kx());
    }

    #[test]
    fn test_protocol_version_bytes() {
        assert_eq!(ProtocolVersion::Tls10.to_bytes(), [3, 1]);
        assert_eq!(ProtocolVersion::from_bytes(3, 0), Some(ProtocolVersion::Ssl3));
        assert_eq!(ProtocolVersion::from_bytes(2, 0), None);
        assert!(ProtocolVersion::Ssl3.is_ssl3());
        assert!(!ProtocolVersion::Tls12.is_ssl3());
    }
}

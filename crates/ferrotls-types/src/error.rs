/// Cryptographic operation errors (the narrow crypto seam).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("mpi: cannot scan an empty byte string")]
    MpiScanFailed,
    #[error("mpi: cannot print the requested value")]
    MpiPrintFailed,
    #[error("invalid argument")]
    InvalidArg,
    #[error("invalid key")]
    InvalidKey,
    #[error("input data too long for the key modulus")]
    InputOverflow,
    #[error("rsa: invalid PKCS#1 padding")]
    RsaInvalidPadding,
    #[error("rsa: signature verification failed")]
    RsaVerifyFail,
    #[error("dsa: signature verification failed")]
    DsaVerifyFail,
    #[error("dsa: malformed DER signature value")]
    DsaInvalidSigData,
    #[error("division by zero")]
    DivisionByZero,
}

/// Errors reported by the external ASN.1/DER certificate parser.
///
/// The parser itself is an external collaborator; these variants mirror the
/// failures it can surface so they can be translated into [`TlsError`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Asn1Error {
    #[error("asn1: element not found")]
    ElementNotFound,
    #[error("asn1: value not found")]
    ValueNotFound,
    #[error("asn1: DER encoding error")]
    DerError,
    #[error("asn1: generic parsing error")]
    GenericError,
}

/// TLS authentication and key-exchange errors.
///
/// Every variant carries a stable negative numeric code ([`TlsError::code`])
/// and a fatal/recoverable classification ([`TlsError::is_fatal`]) consulted
/// by the external alerting layer.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("insufficient credentials for the requested operation")]
    InsufficientCredentials,
    #[error("no certificate was found")]
    NoCertificateFound,
    #[error("error in the length of a TLS packet")]
    UnexpectedPacketLength,
    #[error("received an illegal TLS extension")]
    ReceivedIllegalExtension,
    #[error("received an illegal TLS parameter")]
    ReceivedIllegalParameter,
    #[error("the Diffie-Hellman prime sent by the server is not acceptable ({bits} bits)")]
    DhPrimeUnacceptable { bits: usize },
    #[error("an unknown public key algorithm was requested")]
    UnknownPkAlgorithm,
    #[error("the certificate type is not supported")]
    UnsupportedCertificateType,
    #[error("the signature algorithm is not supported")]
    UnsupportedSignatureAlgorithm,
    #[error("public key signature verification failed")]
    PkSigVerifyFailed,
    #[error("the request is invalid")]
    InvalidRequest,
    #[error("internal error in the authentication layer")]
    InternalError,
    #[error("asn1 parse error: {0}")]
    Asn1(#[from] Asn1Error),
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl TlsError {
    /// Stable numeric code for this error (always negative).
    pub fn code(&self) -> i32 {
        match self {
            TlsError::InsufficientCredentials => -40,
            TlsError::NoCertificateFound => -49,
            TlsError::UnexpectedPacketLength => -10,
            TlsError::ReceivedIllegalExtension => -12,
            TlsError::ReceivedIllegalParameter => -13,
            TlsError::DhPrimeUnacceptable { .. } => -55,
            TlsError::UnknownPkAlgorithm => -21,
            TlsError::UnsupportedCertificateType => -61,
            TlsError::UnsupportedSignatureAlgorithm => -62,
            TlsError::PkSigVerifyFailed => -64,
            TlsError::InvalidRequest => -71,
            TlsError::InternalError => -80,
            TlsError::Asn1(_) => -90,
            TlsError::Crypto(_) => -95,
        }
    }

    /// Whether this error must abort the connection with a fatal alert.
    ///
    /// Non-fatal errors may be reported to the peer as a warning and the
    /// handshake allowed to continue at the driver's discretion.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TlsError::NoCertificateFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_negative_and_distinct() {
        let errors = [
            TlsError::InsufficientCredentials,
            TlsError::NoCertificateFound,
            TlsError::UnexpectedPacketLength,
            TlsError::ReceivedIllegalExtension,
            TlsError::ReceivedIllegalParameter,
            TlsError::DhPrimeUnacceptable { bits: 512 },
            TlsError::UnknownPkAlgorithm,
            TlsError::UnsupportedCertificateType,
            TlsError::UnsupportedSignatureAlgorithm,
            TlsError::PkSigVerifyFailed,
            TlsError::InvalidRequest,
            TlsError::InternalError,
            TlsError::Asn1(Asn1Error::DerError),
            TlsError::Crypto(CryptoError::MpiScanFailed),
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.code()).collect();
        assert!(codes.iter().all(|&c| c < 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_no_certificate_found_is_recoverable() {
        assert!(!TlsError::NoCertificateFound.is_fatal());
        assert!(TlsError::UnexpectedPacketLength.is_fatal());
        assert!(TlsError::DhPrimeUnacceptable { bits: 256 }.is_fatal());
    }

    #[test]
    fn test_asn1_error_translation() {
        let err: TlsError = Asn1Error::ElementNotFound.into();
        assert_eq!(err.code(), -90);
        assert!(err.is_fatal());
    }
}

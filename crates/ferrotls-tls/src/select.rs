//! Certificate selection against the configured credentials.

use ferrotls_types::{CertificateType, TlsError};

use crate::credentials::{CertificateCredentials, SelectedCert};
use crate::handshake::cert_msgs::CertificateRequest;
use crate::session::Session;

/// Pick the client certificate to answer a CertificateRequest with.
///
/// If the application installed a retrieve callback it decides alone;
/// otherwise the first credential pair whose leaf was issued by one of
/// the requested DNs and whose key algorithm is acceptable wins. The
/// outcome, including "send no certificate", is cached in the session,
/// so repeated queries within one handshake do no further work.
///
/// Returns whether a certificate was selected.
pub fn select_client_certificate(
    session: &mut Session,
    credentials: &CertificateCredentials,
    request: &CertificateRequest,
) -> Result<bool, TlsError> {
    if session.selection_done() {
        return Ok(session.selected().is_some());
    }

    let index = match credentials.retrieve_callback() {
        Some(callback) => {
            let picked = callback(&request.issuers, &request.algorithms);
            match picked {
                Some(i) if i >= credentials.pairs().len() => {
                    return Err(TlsError::InvalidRequest);
                }
                other => other,
            }
        }
        None => credentials.pairs().iter().position(|pair| {
            let leaf = &pair.chain[0];
            request.algorithms.contains(&leaf.pk_algorithm())
                && request
                    .issuers
                    .iter()
                    .any(|dn| dn.as_slice() == leaf.issuer_dn())
        }),
    };

    match index {
        Some(i) => {
            let pair = &credentials.pairs()[i];
            session.set_selected(Some(SelectedCert {
                chain: pair.chain.clone(),
                key: pair.key.clone(),
            }));
            Ok(true)
        }
        None => {
            session.set_selected(None);
            Ok(false)
        }
    }
}

/// Pick the server certificate for the negotiated key exchange.
///
/// The first credential pair whose leaf algorithm satisfies the key
/// exchange is selected and cached; later calls within the handshake
/// return immediately.
pub fn select_server_certificate(
    session: &mut Session,
    credentials: &CertificateCredentials,
) -> Result<(), TlsError> {
    if session.selected().is_some() {
        return Ok(());
    }
    if credentials.pairs().is_empty() {
        return Err(TlsError::InsufficientCredentials);
    }
    if session.cert_type() != CertificateType::X509 {
        return Err(TlsError::UnsupportedCertificateType);
    }

    let required = session.kx().required_pk_algorithm();
    let index = credentials
        .pairs()
        .iter()
        .position(|pair| required.map_or(true, |alg| pair.chain[0].pk_algorithm() == alg));

    match index {
        Some(i) => {
            let pair = &credentials.pairs()[i];
            session.set_selected(Some(SelectedCert {
                chain: pair.chain.clone(),
                key: pair.key.clone(),
            }));
            Ok(())
        }
        None => Err(TlsError::InsufficientCredentials),
    }
}

//! Per-connection handshake state for the authentication layer.

use std::fmt;

use ferrotls_crypto::{DhKeyPair, DhParams, Mpi, RsaPublicKey};
use ferrotls_types::{CertificateType, KxAlgorithm, ProtocolVersion, TlsError};
use zeroize::Zeroizing;

use crate::cert::AuthInfo;
use crate::credentials::SelectedCert;

/// Which end of the connection this session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
}

/// Record size limit when the max_record_size extension is not negotiated.
pub const DEFAULT_MAX_RECORD_SIZE: usize = 16384;

/// Minimum acceptable bit length for a server-supplied DH prime.
pub const DEFAULT_MIN_DH_BITS: usize = 768;

/// Extension negotiation results, reset per handshake.
#[derive(Debug)]
pub struct NegotiatedExtensions {
    /// Host names received in the server_name extension (type 0 entries).
    pub server_names: Vec<Vec<u8>>,
    /// Negotiated record size limit.
    pub max_record_size: usize,
    /// Certificate types this endpoint is willing to use, in preference
    /// order. Empty means the extension is not sent.
    pub offered_cert_types: Vec<CertificateType>,
    /// Set on the server once a client asked for a certificate type.
    pub(crate) cert_type_requested: bool,
}

impl Default for NegotiatedExtensions {
    fn default() -> Self {
        NegotiatedExtensions {
            server_names: Vec::new(),
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
            offered_cert_types: Vec::new(),
            cert_type_requested: false,
        }
    }
}

/// State one handshake accumulates while authenticating the peer and
/// agreeing on a premaster secret.
///
/// The session owns the peer's certificate chain ([`AuthInfo`]), the
/// locally selected certificate/key pair, any ephemeral key exchange
/// values, and the premaster secret until the key derivation layer
/// [takes](Session::take_premaster) it.
pub struct Session {
    role: Role,
    version: ProtocolVersion,
    adv_version: ProtocolVersion,
    forced_pms_version: Option<ProtocolVersion>,
    kx: KxAlgorithm,
    cert_type: CertificateType,
    min_dh_bits: usize,
    client_random: [u8; 32],
    server_random: [u8; 32],
    pub(crate) selected: Option<SelectedCert>,
    selection_done: bool,
    pub(crate) auth_info: AuthInfo,
    pub(crate) premaster: Option<Zeroizing<Vec<u8>>>,
    pub(crate) dh_group: Option<DhParams>,
    pub(crate) dh_keypair: Option<DhKeyPair>,
    pub(crate) peer_dh_public: Option<Mpi>,
    pub(crate) peer_rsa_export: Option<RsaPublicKey>,
    exts_sent: Vec<u16>,
    pub(crate) ext: NegotiatedExtensions,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("role", &self.role)
            .field("version", &self.version)
            .field("adv_version", &self.adv_version)
            .field("kx", &self.kx)
            .field("cert_type", &self.cert_type)
            .field("min_dh_bits", &self.min_dh_bits)
            .field("selected", &self.selected.is_some())
            .field("auth_info", &self.auth_info)
            .field("premaster", &self.premaster.as_ref().map(|_| "<redacted>"))
            .field("ext", &self.ext)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(role: Role, version: ProtocolVersion, kx: KxAlgorithm) -> Self {
        Session {
            role,
            version,
            adv_version: version,
            forced_pms_version: None,
            kx,
            cert_type: CertificateType::X509,
            min_dh_bits: DEFAULT_MIN_DH_BITS,
            client_random: [0u8; 32],
            server_random: [0u8; 32],
            selected: None,
            selection_done: false,
            auth_info: AuthInfo::default(),
            premaster: None,
            dh_group: None,
            dh_keypair: None,
            peer_dh_public: None,
            peer_rsa_export: None,
            exts_sent: Vec::new(),
            ext: NegotiatedExtensions::default(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn kx(&self) -> KxAlgorithm {
        self.kx
    }

    pub fn cert_type(&self) -> CertificateType {
        self.cert_type
    }

    pub(crate) fn set_cert_type(&mut self, cert_type: CertificateType) {
        self.cert_type = cert_type;
    }

    /// The highest version the client advertised in its hello. This, not
    /// the negotiated version, is what the RSA premaster secret carries.
    pub fn advertised_version(&self) -> ProtocolVersion {
        self.adv_version
    }

    pub fn set_advertised_version(&mut self, version: ProtocolVersion) {
        self.adv_version = version;
    }

    /// Force the version bytes placed in the RSA premaster secret.
    ///
    /// A workaround knob for broken peers that expect the negotiated
    /// version instead of the advertised one.
    pub fn force_premaster_version(&mut self, version: Option<ProtocolVersion>) {
        self.forced_pms_version = version;
    }

    pub(crate) fn premaster_version(&self) -> ProtocolVersion {
        self.forced_pms_version.unwrap_or(self.adv_version)
    }

    pub fn min_dh_bits(&self) -> usize {
        self.min_dh_bits
    }

    pub fn set_min_dh_bits(&mut self, bits: usize) {
        self.min_dh_bits = bits;
    }

    pub fn set_randoms(&mut self, client: [u8; 32], server: [u8; 32]) {
        self.client_random = client;
        self.server_random = server;
    }

    pub(crate) fn client_random(&self) -> &[u8; 32] {
        &self.client_random
    }

    pub(crate) fn server_random(&self) -> &[u8; 32] {
        &self.server_random
    }

    // ---- local certificate selection ----

    pub fn selected(&self) -> Option<&SelectedCert> {
        self.selected.as_ref()
    }

    /// Install a selection result, dropping any previously cached one.
    /// `None` is itself a cached outcome ("send no certificate").
    pub fn set_selected(&mut self, selected: Option<SelectedCert>) {
        self.selected = selected;
        self.selection_done = true;
    }

    /// Whether a selection outcome (positive or negative) is cached.
    pub fn selection_done(&self) -> bool {
        self.selection_done
    }

    /// Forget the cached outcome so the next query selects afresh.
    pub fn clear_selected(&mut self) {
        self.selected = None;
        self.selection_done = false;
    }

    // ---- peer authentication info ----

    pub fn auth_info(&self) -> &AuthInfo {
        &self.auth_info
    }

    // ---- premaster secret ----

    pub(crate) fn set_premaster(&mut self, premaster: Zeroizing<Vec<u8>>) {
        self.premaster = Some(premaster);
    }

    /// Hand the premaster secret to the key derivation layer. The session
    /// keeps no copy.
    pub fn take_premaster(&mut self) -> Option<Zeroizing<Vec<u8>>> {
        self.premaster.take()
    }

    /// Drop all ephemeral key exchange state and any unconsumed premaster
    /// secret. Called when a handshake is aborted or completed.
    pub fn clear_key_exchange_state(&mut self) {
        self.premaster = None;
        self.dh_group = None;
        self.dh_keypair = None;
        self.peer_dh_public = None;
        self.peer_rsa_export = None;
    }

    // ---- extension bookkeeping ----

    /// Host name to request via the server_name extension (clients), or
    /// names received from the client (servers).
    pub fn server_names(&self) -> &[Vec<u8>] {
        &self.ext.server_names
    }

    pub fn add_server_name(&mut self, name: &[u8]) {
        self.ext.server_names.push(name.to_vec());
    }

    pub fn max_record_size(&self) -> usize {
        self.ext.max_record_size
    }

    /// Request a record size limit. Only the RFC 6066 sizes and the
    /// protocol default are representable.
    pub fn set_max_record_size(&mut self, size: usize) -> Result<(), TlsError> {
        match size {
            512 | 1024 | 2048 | 4096 | DEFAULT_MAX_RECORD_SIZE => {
                self.ext.max_record_size = size;
                Ok(())
            }
            _ => Err(TlsError::InvalidRequest),
        }
    }

    /// Certificate types to offer through the cert_type extension, in
    /// preference order.
    pub fn offer_cert_types(&mut self, types: &[CertificateType]) {
        self.ext.offered_cert_types = types.to_vec();
    }

    pub(crate) fn record_extension_sent(&mut self, ext_type: u16) {
        if !self.exts_sent.contains(&ext_type) {
            self.exts_sent.push(ext_type);
        }
    }

    pub(crate) fn extension_was_sent(&self, ext_type: u16) -> bool {
        self.exts_sent.contains(&ext_type)
    }
}

//! Hello extension negotiation.
//!
//! Extensions live in a static registry; each entry carries the wire
//! type, the phase it may appear in, and its send/receive hooks.
//! [`generate_extensions`] walks the registry in order and appends every
//! extension whose send hook produced a body; [`parse_extensions`] walks
//! a received block and dispatches known types to their receive hooks.
//!
//! A client rejects any extension type it did not offer, known or not
//! (RFC 2246 §7.4.1.4). A server silently skips unknown types.

use ferrotls_types::TlsError;

use crate::handshake::codec::{put_u16, put_u16_prefixed, Reader};
use crate::session::{Role, Session};

pub mod cert_type;
pub mod max_record;
pub mod server_name;

pub const EXT_SERVER_NAME: u16 = 0;
pub const EXT_MAX_RECORD_SIZE: u16 = 1;
pub const EXT_CERT_TYPE: u16 = 9;

/// Which negotiation phase an extension belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseContext {
    /// Affects the TLS protocol machinery itself.
    Tls,
    /// Carries application-level data.
    Application,
    /// Accept in any phase.
    Any,
}

type RecvFn = fn(&mut Session, &[u8]) -> Result<(), TlsError>;
type SendFn = fn(&mut Session, &mut Vec<u8>) -> Result<(), TlsError>;

pub struct ExtensionEntry {
    pub ext_type: u16,
    pub name: &'static str,
    pub context: ParseContext,
    recv: RecvFn,
    send: SendFn,
}

/// Supported extensions, in the order they are sent.
static EXTENSIONS: &[ExtensionEntry] = &[
    ExtensionEntry {
        ext_type: EXT_SERVER_NAME,
        name: "server_name",
        context: ParseContext::Application,
        recv: server_name::recv,
        send: server_name::send,
    },
    ExtensionEntry {
        ext_type: EXT_MAX_RECORD_SIZE,
        name: "max_record_size",
        context: ParseContext::Tls,
        recv: max_record::recv,
        send: max_record::send,
    },
    ExtensionEntry {
        ext_type: EXT_CERT_TYPE,
        name: "cert_type",
        context: ParseContext::Tls,
        recv: cert_type::recv,
        send: cert_type::send,
    },
];

/// Build the extensions block for this endpoint's hello.
///
/// Returns an empty vector when no extension has anything to say, in
/// which case the hello omits the block entirely.
pub fn generate_extensions(session: &mut Session) -> Result<Vec<u8>, TlsError> {
    let mut block = Vec::new();
    for entry in EXTENSIONS {
        let mut body = Vec::new();
        (entry.send)(session, &mut body)?;
        if body.is_empty() {
            continue;
        }
        put_u16(&mut block, entry.ext_type);
        put_u16_prefixed(&mut block, &body);
        if session.role() == Role::Client {
            session.record_extension_sent(entry.ext_type);
        }
    }
    if block.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = Vec::with_capacity(block.len() + 2);
    put_u16_prefixed(&mut out, &block);
    Ok(out)
}

/// Parse the extensions block of a received hello. An absent block
/// (empty input) is legal.
pub fn parse_extensions(
    session: &mut Session,
    context: ParseContext,
    data: &[u8],
) -> Result<(), TlsError> {
    if data.is_empty() {
        return Ok(());
    }
    let mut outer = Reader::new(data);
    let block = outer.read_u16_prefixed()?;
    if !outer.is_done() {
        return Err(TlsError::UnexpectedPacketLength);
    }

    let mut r = Reader::new(block);
    while !r.is_done() {
        let ext_type = r.read_u16()?;
        let body = r.read_u16_prefixed()?;
        if session.role() == Role::Client && !session.extension_was_sent(ext_type) {
            return Err(TlsError::ReceivedIllegalExtension);
        }
        match EXTENSIONS.iter().find(|e| e.ext_type == ext_type) {
            Some(entry)
                if context == ParseContext::Any
                    || entry.context == context
                    || entry.context == ParseContext::Any =>
            {
                (entry.recv)(session, body)?;
            }
            Some(entry) => {
                tracing::debug!(name = entry.name, "extension out of context, skipping");
            }
            None => {
                tracing::debug!(ext_type, "ignoring unsupported hello extension");
            }
        }
    }
    Ok(())
}

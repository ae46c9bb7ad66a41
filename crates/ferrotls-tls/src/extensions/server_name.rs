//! The server_name (SNI) extension, RFC 6066 §3.
//!
//! ```text
//! struct {
//!     NameType name_type;          // host_name(0)
//!     opaque HostName<1..2^16-1>;
//! } ServerName;
//! ServerNameList server_name_list<1..2^16-1>;
//! ```

use ferrotls_types::TlsError;

use crate::handshake::codec::{put_u16_prefixed, Reader};
use crate::session::{Role, Session};

const NAME_TYPE_HOST: u8 = 0;

pub(super) fn send(session: &mut Session, out: &mut Vec<u8>) -> Result<(), TlsError> {
    // Only the client names hosts; the server acknowledges by behavior,
    // not by echoing the extension.
    if session.role() != Role::Client || session.ext.server_names.is_empty() {
        return Ok(());
    }
    let mut list = Vec::new();
    for name in &session.ext.server_names {
        list.push(NAME_TYPE_HOST);
        put_u16_prefixed(&mut list, name);
    }
    put_u16_prefixed(out, &list);
    Ok(())
}

pub(super) fn recv(session: &mut Session, body: &[u8]) -> Result<(), TlsError> {
    // An empty body is the server's bare acknowledgement.
    if body.is_empty() {
        return Ok(());
    }
    let mut r = Reader::new(body);
    let mut list = Reader::new(r.read_u16_prefixed()?);
    if !r.is_done() {
        return Err(TlsError::UnexpectedPacketLength);
    }
    while !list.is_done() {
        let name_type = list.read_u8()?;
        let name = list.read_u16_prefixed()?;
        if name_type != NAME_TYPE_HOST {
            tracing::debug!(name_type, "skipping unknown server_name entry type");
            continue;
        }
        if name.is_empty() {
            return Err(TlsError::ReceivedIllegalParameter);
        }
        if session.role() == Role::Server {
            session.ext.server_names.push(name.to_vec());
        }
    }
    Ok(())
}

//! The max_fragment_length extension, RFC 6066 §4.
//!
//! One code byte on the wire: 1, 2, 3, 4 for 512, 1024, 2048, 4096
//! bytes. The protocol default of 16384 is never encoded; a client
//! wanting the default simply does not send the extension.

use ferrotls_types::TlsError;

use crate::session::{Role, Session, DEFAULT_MAX_RECORD_SIZE};

fn code_to_size(code: u8) -> Option<usize> {
    match code {
        1 => Some(512),
        2 => Some(1024),
        3 => Some(2048),
        4 => Some(4096),
        _ => None,
    }
}

fn size_to_code(size: usize) -> Option<u8> {
    match size {
        512 => Some(1),
        1024 => Some(2),
        2048 => Some(3),
        4096 => Some(4),
        _ => None,
    }
}

pub(super) fn send(session: &mut Session, out: &mut Vec<u8>) -> Result<(), TlsError> {
    // Client: request a reduced limit. Server: echo an accepted one.
    if session.ext.max_record_size == DEFAULT_MAX_RECORD_SIZE {
        return Ok(());
    }
    let code = size_to_code(session.ext.max_record_size).ok_or(TlsError::InvalidRequest)?;
    out.push(code);
    Ok(())
}

pub(super) fn recv(session: &mut Session, body: &[u8]) -> Result<(), TlsError> {
    if body.len() != 1 {
        return Err(TlsError::UnexpectedPacketLength);
    }
    let size = code_to_size(body[0]).ok_or(TlsError::ReceivedIllegalParameter)?;
    match session.role() {
        Role::Server => {
            session.ext.max_record_size = size;
        }
        Role::Client => {
            // The server must accept exactly what was requested.
            if size != session.ext.max_record_size {
                return Err(TlsError::ReceivedIllegalParameter);
            }
        }
    }
    Ok(())
}

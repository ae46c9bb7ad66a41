//! Bounds-checked reading and writing of handshake message bodies.
//!
//! Every short read maps to [`TlsError::UnexpectedPacketLength`]; callers
//! never index into a message body directly.

use ferrotls_types::TlsError;

/// Cursor over a handshake message body.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_done(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Bytes consumed so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], TlsError> {
        if self.remaining() < n {
            return Err(TlsError::UnexpectedPacketLength);
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, TlsError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, TlsError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u24(&mut self) -> Result<usize, TlsError> {
        let b = self.take(3)?;
        Ok(((b[0] as usize) << 16) | ((b[1] as usize) << 8) | b[2] as usize)
    }

    /// A field preceded by its u16 big-endian length.
    pub fn read_u16_prefixed(&mut self) -> Result<&'a [u8], TlsError> {
        let len = self.read_u16()? as usize;
        self.take(len)
    }
}

pub fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

pub fn put_u24(out: &mut Vec<u8>, value: usize) {
    debug_assert!(value <= 0x00FF_FFFF, "value does not fit in a u24 field");
    out.push((value >> 16) as u8);
    out.push((value >> 8) as u8);
    out.push(value as u8);
}

pub fn put_u16_prefixed(out: &mut Vec<u8>, data: &[u8]) {
    debug_assert!(
        data.len() <= usize::from(u16::MAX),
        "field too long for a u16 length prefix"
    );
    put_u16(out, data.len() as u16);
    out.extend_from_slice(data);
}

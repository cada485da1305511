//! Tag/length/value primitives over a raw DER buffer.
//!
//! The cursor never interprets tag semantics. Callers track the offset
//! themselves and ask for one primitive at a time, so the same walker
//! serves any SEQUENCE/INTEGER/OCTET STRING skeleton regardless of how many
//! fields a given catalog puts inside it.

use crate::error::{MetadataError, MetadataResult};

pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_BMP_STRING: u8 = 0x1E;
pub const TAG_SEQUENCE: u8 = 0x30;

/// Stateless byte-offset walker over a borrowed buffer
#[derive(Debug, Clone, Copy)]
pub struct DerCursor<'a> {
    buffer: &'a [u8],
}

impl<'a> DerCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        DerCursor { buffer }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Reads the tag byte at `pos`, returning it with the offset just past it.
    pub fn read_tag(&self, pos: usize) -> MetadataResult<(u8, usize)> {
        match self.buffer.get(pos) {
            Some(&tag) => Ok((tag, pos + 1)),
            None => Err(MetadataError::malformed(pos, "tag past end of buffer")),
        }
    }

    /// Returns the tag at `pos` without failing when the buffer is exhausted.
    pub fn peek_tag(&self, pos: usize) -> Option<u8> {
        self.buffer.get(pos).copied()
    }

    /// Reads a definite length at `pos`.
    ///
    /// Returns `(length, header_bytes)` where `header_bytes` counts the
    /// length octets themselves (1 for short form, 1 + n for long form).
    /// Indefinite length (`0x80`) is rejected.
    pub fn read_length(&self, pos: usize) -> MetadataResult<(usize, usize)> {
        let first = *self
            .buffer
            .get(pos)
            .ok_or_else(|| MetadataError::malformed(pos, "length past end of buffer"))?;

        if first <= 0x7F {
            return Ok((first as usize, 1));
        }

        let count = (first & 0x7F) as usize;
        if count == 0 {
            return Err(MetadataError::malformed(pos, "indefinite length"));
        }
        if count > std::mem::size_of::<usize>() {
            return Err(MetadataError::malformed(pos, "length does not fit in usize"));
        }

        let start = pos + 1;
        let octets = self
            .buffer
            .get(start..start + count)
            .ok_or_else(|| MetadataError::malformed(pos, "long-form length truncated"))?;

        let length = octets
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);
        Ok((length, 1 + count))
    }

    /// Borrows `len` content bytes starting at `pos`.
    pub fn value(&self, pos: usize, len: usize) -> MetadataResult<&'a [u8]> {
        pos.checked_add(len)
            .and_then(|end| self.buffer.get(pos..end))
            .ok_or_else(|| MetadataError::malformed(pos, "value runs past end of buffer"))
    }

    /// Reads a full TLV at `pos` whose tag must equal `expected`.
    ///
    /// Returns the content bytes and the offset of the next element.
    pub fn expect(&self, pos: usize, expected: u8) -> MetadataResult<(&'a [u8], usize)> {
        let (tag, len_pos) = self.read_tag(pos)?;
        if tag != expected {
            return Err(MetadataError::malformed(pos, "unexpected tag"));
        }
        let (len, header) = self.read_length(len_pos)?;
        let content_pos = len_pos + header;
        let content = self.value(content_pos, len)?;
        Ok((content, content_pos + len))
    }
}

//! Decoder for the name/value attributes a catalog signs into its trust list.
//!
//! Each attribute extension carries:
//!
//! ```text
//! SEQUENCE {
//!     BMPString      label   (UTF-16 big-endian)
//!     INTEGER        flags   (optional, ignored)
//!     OCTET STRING   value   (UTF-16 little-endian)
//! }
//! ```
//!
//! The label and value use opposite byte orders. That is how the catalog
//! format stores them and both must be preserved.

use crate::der::{DerCursor, TAG_BMP_STRING, TAG_INTEGER, TAG_OCTET_STRING, TAG_SEQUENCE};
use crate::error::{MetadataError, MetadataResult};

/// One label/value pair decoded from a catalog extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAttribute {
    pub label: String,
    pub value: String,
}

impl DecodedAttribute {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Decodes one extension blob, returning `None` if it does not have the
/// expected attribute shape.
pub fn decode_attribute(blob: &[u8]) -> Option<DecodedAttribute> {
    match try_decode_attribute(blob) {
        Ok(attribute) => Some(attribute),
        Err(e) => {
            log::debug!("Skipping catalog attribute: {e}");
            None
        }
    }
}

/// Fallible form of [`decode_attribute`] that reports where decoding stopped.
pub fn try_decode_attribute(blob: &[u8]) -> MetadataResult<DecodedAttribute> {
    let der = DerCursor::new(blob);

    let (tag, pos) = der.read_tag(0)?;
    if tag != TAG_SEQUENCE {
        return Err(MetadataError::malformed(0, "attribute is not a SEQUENCE"));
    }
    // Only the header is skipped; the fields are walked one by one.
    let (_, header) = der.read_length(pos)?;
    let pos = pos + header;

    if der.peek_tag(pos) != Some(TAG_BMP_STRING) {
        return Err(MetadataError::malformed(pos, "expected BMPString label"));
    }
    let (label_bytes, mut pos) = der.expect(pos, TAG_BMP_STRING)?;
    let label = clean_text(&decode_utf16_be(label_bytes));
    if label.is_empty() {
        return Err(MetadataError::malformed(pos, "empty attribute label"));
    }

    if der.peek_tag(pos) == Some(TAG_INTEGER) {
        let (_, next) = der.expect(pos, TAG_INTEGER)?;
        pos = next;
    }

    if der.peek_tag(pos) != Some(TAG_OCTET_STRING) {
        return Err(MetadataError::malformed(pos, "expected OCTET STRING value"));
    }
    let (value_bytes, _) = der.expect(pos, TAG_OCTET_STRING)?;
    let value = clean_text(&decode_utf16_le(value_bytes));

    Ok(DecodedAttribute { label, value })
}

fn decode_utf16_be(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

fn decode_utf16_le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Drops NUL padding and surrounding whitespace.
fn clean_text(raw: &str) -> String {
    raw.replace('\0', "").trim().to_string()
}

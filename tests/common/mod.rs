//! Shared builders for catalog attribute blobs.

#![allow(dead_code)]

use catmeta::{InMemoryTrustList, RawExtensionBlob, CATALOG_NAME_VALUE_OID};

fn der_len(len: usize) -> Vec<u8> {
    match len {
        0..=0x7F => vec![len as u8],
        0x80..=0xFF => vec![0x81, len as u8],
        _ => vec![0x82, (len >> 8) as u8, len as u8],
    }
}

fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(der_len(content.len()));
    out.extend_from_slice(content);
    out
}

/// SEQUENCE { BMPString label, INTEGER flags, OCTET STRING value }
pub fn attribute_blob(label: &str, value: &str) -> Vec<u8> {
    let label: Vec<u8> = label.encode_utf16().flat_map(|u| u.to_be_bytes()).collect();
    let value: Vec<u8> = value.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
    let body = [
        tlv(0x1E, &label),
        tlv(0x02, &[0x10, 0x01, 0x00, 0x01]),
        tlv(0x04, &value),
    ]
    .concat();
    tlv(0x30, &body)
}

pub fn attribute_extension(label: &str, value: &str) -> RawExtensionBlob {
    RawExtensionBlob::new(CATALOG_NAME_VALUE_OID, attribute_blob(label, value))
}

/// Trust list holding the given label/value attributes, in order
pub fn trust_list(attributes: &[(&str, &str)]) -> InMemoryTrustList {
    InMemoryTrustList::new(
        attributes
            .iter()
            .map(|(label, value)| attribute_extension(label, value))
            .collect(),
    )
}

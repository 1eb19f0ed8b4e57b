//! Document information dictionary.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object};
use serde::{Deserialize, Serialize};

use crate::graph::{ObjectGraph, reference};

/// Read the trailer's `/Info` dictionary as text.
///
/// Only string entries are kept, decoded from UTF-16BE or UTF-8 (with byte
/// order mark) or PDFDocEncoding; an entry holding a reference is followed
/// once. `/Info` must be a reference to a dictionary. A missing, direct,
/// dangling or mistyped `/Info` yields an empty map.
///
/// # Examples
///
/// ```
/// use pdfsplice::{Document, Object, dictionary};
///
/// let mut doc = Document::new();
/// let info = doc.add_object(dictionary! { "Title" => Object::string_literal("Report") });
/// doc.trailer.set("Info", info);
///
/// let metadata = pdfsplice::ops::metadata(&doc);
/// assert_eq!(metadata.get("Title").map(String::as_str), Some("Report"));
/// ```
pub fn metadata(doc: &Document) -> BTreeMap<String, String> {
    let Some(info) = info_dictionary(doc) else {
        return BTreeMap::new();
    };

    info.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Object::Reference(id) => doc.lookup(*id).found()?,
                direct => direct,
            };
            match value {
                Object::String(bytes, _) => Some((
                    String::from_utf8_lossy(key).into_owned(),
                    decode_text_string(bytes),
                )),
                _ => None,
            }
        })
        .collect()
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let Some(id) = reference(&doc.trailer, b"Info") else {
        if doc.trailer.has(b"Info") {
            log::debug!("Ignoring /Info that is not an indirect reference");
        }
        return None;
    };
    match doc.lookup(id).found()? {
        Object::Dictionary(dict) => Some(dict),
        other => {
            log::debug!("Ignoring /Info of type {}", other.enum_variant());
            None
        }
    }
}

/// Decode a PDF text string.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().map(|byte| pdf_doc_char(*byte)).collect()
}

/// PDFDocEncoding differs from Latin-1 in 0x18-0x1F and 0x80-0xA0.
fn pdf_doc_char(byte: u8) -> char {
    const LOW: [char; 8] = [
        '\u{02D8}', '\u{02C7}', '\u{02C6}', '\u{02D9}', '\u{02DD}', '\u{02DB}', '\u{02DA}',
        '\u{02DC}',
    ];
    const HIGH: [char; 33] = [
        '\u{2022}', '\u{2020}', '\u{2021}', '\u{2026}', '\u{2014}', '\u{2013}', '\u{0192}',
        '\u{2044}', '\u{2039}', '\u{203A}', '\u{2212}', '\u{2030}', '\u{201E}', '\u{201C}',
        '\u{201D}', '\u{2018}', '\u{2019}', '\u{201A}', '\u{2122}', '\u{FB01}', '\u{FB02}',
        '\u{0141}', '\u{0152}', '\u{0160}', '\u{0178}', '\u{017D}', '\u{0131}', '\u{0142}',
        '\u{0153}', '\u{0161}', '\u{017E}', '\u{FFFD}', '\u{20AC}',
    ];

    match byte {
        0x18..=0x1F => LOW[usize::from(byte - 0x18)],
        0x80..=0xA0 => HIGH[usize::from(byte - 0x80)],
        0xAD => '\u{FFFD}',
        other => char::from(other),
    }
}

/// Typed view of the standard information entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    /// `/Title`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `/Author`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// `/Subject`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// `/Keywords`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// `/Creator`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// `/Producer`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    /// `/CreationDate`, as stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    /// `/ModDate`, as stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_date: Option<String>,
    /// Every other entry.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub custom: BTreeMap<String, String>,
}

impl DocumentInfo {
    /// Split a metadata map into the standard fields and the rest.
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let mut info = Self::default();
        for (key, value) in map {
            let slot = match key.as_str() {
                "Title" => &mut info.title,
                "Author" => &mut info.author,
                "Subject" => &mut info.subject,
                "Keywords" => &mut info.keywords,
                "Creator" => &mut info.creator,
                "Producer" => &mut info.producer,
                "CreationDate" => &mut info.creation_date,
                "ModDate" => &mut info.mod_date,
                _ => {
                    info.custom.insert(key.clone(), value.clone());
                    continue;
                }
            };
            *slot = Some(value.clone());
        }
        info
    }

    /// Read the typed view straight from a document.
    pub fn from_document(doc: &Document) -> Self {
        Self::from_map(&metadata(doc))
    }
}

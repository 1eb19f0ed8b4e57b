//! Document serialization.
//!
//! The bytes are produced by lopdf's `save_to`. Before that, a copy of the
//! document is prepared: the trailer is reduced to `/Root`, `/Info` and `/ID`
//! with dangling entries dropped, identities are optionally compacted and
//! streams optionally compressed.

use std::collections::BTreeMap;

use lopdf::xref::{Xref, XrefType};
use lopdf::{Document, Object, ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{ObjectGraph, Ref, remap_dictionary, remap_references};
use crate::parser::document_trailer;

/// Output layout options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOptions {
    /// Emit a cross-reference stream instead of a classic table.
    pub xref_stream: bool,
    /// Flate-compress streams that carry no `/Filter`.
    pub compress: bool,
    /// Compact identities to `1..=n`, keeping their relative order.
    pub renumber: bool,
}

/// Serialize with default options.
pub fn write(document: &Document) -> Result<Vec<u8>> {
    write_with(document, &WriteOptions::default())
}

/// Serialize `document` into a complete PDF file.
///
/// # Errors
///
/// `MalformedPdf` when the trailer's `/Root` is missing or dangling.
pub fn write_with(document: &Document, options: &WriteOptions) -> Result<Vec<u8>> {
    document.catalog_id()?;

    let mut output = document.clone();
    output.trailer = document_trailer(&document.trailer);
    drop_dangling_trailer_entries(&mut output);

    if options.renumber {
        renumber(&mut output);
    }
    if options.compress {
        output.compress();
    }
    output.refresh_max_id();

    let layout = if options.xref_stream {
        XrefType::CrossReferenceStream
    } else {
        XrefType::CrossReferenceTable
    };
    output.reference_table = Xref::new(0, layout);

    let mut bytes = Vec::new();
    output.save_to(&mut bytes)?;
    log::debug!(
        "Serialized {} object(s) into {} bytes",
        output.objects.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn drop_dangling_trailer_entries(document: &mut Document) {
    let dangling: Vec<Vec<u8>> = document
        .trailer
        .iter()
        .filter_map(|(key, value)| match value {
            Object::Reference(id) if !document.objects.contains_key(id) => {
                log::warn!(
                    "Dropping trailer /{} pointing at missing object {}",
                    String::from_utf8_lossy(key),
                    Ref(*id)
                );
                Some(key.clone())
            }
            _ => None,
        })
        .collect();

    for key in dangling {
        document.trailer.remove(&key);
    }
}

/// Give the objects consecutive numbers and generation 0.
fn renumber(document: &mut Document) {
    let mapping: BTreeMap<ObjectId, ObjectId> = document
        .objects
        .keys()
        .zip(1u32..)
        .map(|(&old, number)| (old, (number, 0)))
        .collect();

    let mut map = |id: ObjectId| mapping.get(&id).copied();
    let objects = std::mem::take(&mut document.objects);
    for (old, mut object) in objects {
        remap_references(&mut object, &mut map);
        if let Some(&new) = mapping.get(&old) {
            document.objects.insert(new, object);
        }
    }
    remap_dictionary(&mut document.trailer, &mut map);
}

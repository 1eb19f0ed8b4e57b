//! Document loading.
//!
//! [`load`] hands the bytes to lopdf, which resolves the cross-reference
//! chain (classic tables, cross-reference streams, `/Prev` and `/XRefStm`)
//! and expands object streams. The result is then checked and normalized:
//! encrypted files are refused, a stream whose data cannot be read is
//! reported, object and cross-reference stream containers are dropped and
//! the trailer keeps only the entries that describe the document.

use lopdf::xref::XrefEntry;
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{PdfSpliceError, Result};
use crate::graph::{ObjectGraph, Ref};

/// How far into the file the `%PDF-` header may start.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Trailer keys that describe the document rather than the file layout.
pub(crate) const TRAILER_KEYS: [&[u8]; 3] = [b"Root", b"Info", b"ID"];

/// Parse a PDF file held in memory.
///
/// # Errors
///
/// * `MalformedPdf` when the header, cross-reference data or trailer is
///   unusable, a stream's data runs past the end of the file, or the
///   Catalog cannot be found
/// * `UnsupportedFeature` for encrypted files
///
/// # Examples
///
/// ```no_run
/// let bytes = std::fs::read("input.pdf").unwrap();
/// let document = pdfsplice::parser::load(&bytes).unwrap();
/// println!("PDF {}", document.version);
/// ```
pub fn load(data: &[u8]) -> Result<Document> {
    let (start, version) = read_header(data)?;
    let mut document = Document::load_mem(data)?;

    if document.trailer.has(b"Encrypt") {
        return Err(PdfSpliceError::unsupported("encryption"));
    }
    // lopdf measures offsets from the header
    check_unreadable(&data[start..], &document)?;

    document.objects.retain(|_, object| !is_container(object));
    document.trailer = document_trailer(&document.trailer);
    document.reference_table.clear();
    document.version = version;
    document.refresh_max_id();

    let catalog = document.dictionary(document.catalog_id()?)?;
    if let Ok(name) = catalog.get(b"Version").and_then(Object::as_name) {
        let catalog_version = String::from_utf8_lossy(name).into_owned();
        if parse_version(&catalog_version) > parse_version(&document.version) {
            document.version = catalog_version;
        }
    }

    log::debug!(
        "Loaded PDF {} with {} object(s)",
        document.version,
        document.objects.len()
    );
    Ok(document)
}

/// Offset of the `%PDF-x.y` header and its version.
fn read_header(data: &[u8]) -> Result<(usize, String)> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let start = window
        .windows(5)
        .position(|candidate| candidate == b"%PDF-")
        .ok_or_else(|| PdfSpliceError::malformed("missing %PDF header"))?;

    let rest = &data[start + 5..];
    let end = rest
        .iter()
        .position(|byte| !(byte.is_ascii_digit() || *byte == b'.'))
        .unwrap_or(rest.len());
    let version = String::from_utf8_lossy(&rest[..end]).into_owned();

    if parse_version(&version).is_none() {
        return Err(PdfSpliceError::malformed(format!(
            "invalid PDF header version '{version}'"
        )));
    }
    Ok((start, version))
}

fn parse_version(version: &str) -> Option<(u32, u32)> {
    let (major, minor) = version.split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// Look at every in-use entry lopdf could not materialize.
///
/// An entry that leads somewhere else is a dangling entry and only logged.
/// An entry that leads to its own object header and a stream means the
/// stream's data could not be read within the file.
fn check_unreadable(body: &[u8], document: &Document) -> Result<()> {
    for (&number, entry) in &document.reference_table.entries {
        let XrefEntry::Normal { offset, generation } = *entry else {
            continue;
        };
        let id = (number, generation);
        if document.objects.contains_key(&id) {
            continue;
        }

        let offset = offset as usize;
        if object_header(body, offset) == Some(id) && declares_stream(&body[offset..]) {
            return Err(PdfSpliceError::malformed(format!(
                "truncated stream in object {}",
                Ref(id)
            )));
        }
        log::warn!(
            "Object {}: no readable object at offset {offset}; references to it dangle",
            Ref(id)
        );
    }
    Ok(())
}

/// The `N G obj` header at `offset`, if there is one.
fn object_header(body: &[u8], offset: usize) -> Option<ObjectId> {
    let head = body.get(offset..)?;
    let head = &head[..head.len().min(64)];
    let mut fields = head
        .split(|byte| byte.is_ascii_whitespace())
        .filter(|field| !field.is_empty());

    let mut number = || -> Option<u32> { std::str::from_utf8(fields.next()?).ok()?.parse().ok() };
    let object_number = number()?;
    let generation = u16::try_from(number()?).ok()?;
    fields
        .next()
        .filter(|keyword| keyword.starts_with(b"obj"))
        .map(|_| (object_number, generation))
}

/// Whether the object starting here has a `stream` keyword before `endobj`.
fn declares_stream(object: &[u8]) -> bool {
    let end = find(object, b"endobj").unwrap_or(object.len());
    find(&object[..end], b"stream").is_some()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Object streams and cross-reference streams are file layout, not content.
fn is_container(object: &Object) -> bool {
    match object {
        Object::Stream(stream) => stream.dict.has_type(b"ObjStm") || stream.dict.has_type(b"XRef"),
        _ => false,
    }
}

/// The trailer entries that survive loading and are written back out.
pub(crate) fn document_trailer(trailer: &Dictionary) -> Dictionary {
    let mut kept = Dictionary::new();
    for key in TRAILER_KEYS {
        if let Ok(value) = trailer.get(key) {
            kept.set(key, value.clone());
        }
    }
    kept
}

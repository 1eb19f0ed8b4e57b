//! Shared fixtures for the integration tests.
//!
//! Documents are built in memory rather than checked in, so every test
//! states exactly what its input contains.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use pdfsplice::{Dictionary, Document, Object, ObjectGraph, ObjectId, Stream, dictionary, page_tree, writer};

/// A document with `pages` pages whose content streams read `"<label> p<n>"`.
///
/// The page tree is two levels deep when there are more than two pages, the
/// media box and a shared font live on the root and are inherited, and an
/// information dictionary carries `label` as its title.
pub fn sample_document(label: &str, pages: usize) -> Document {
    let mut doc = Document::with_version("1.4");
    let root = doc.new_object_id();
    let font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut leaves = Vec::with_capacity(pages);
    for number in 1..=pages {
        let content = doc.add_object(Stream::new(
            Dictionary::new(),
            format!("BT /F1 12 Tf ({label} p{number}) Tj ET").into_bytes(),
        ));
        leaves.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "Contents" => content,
        }));
    }

    // Split into two intermediate nodes so inheritance crosses a level
    let mut kids = Vec::new();
    if pages > 2 {
        let middle = pages / 2;
        for chunk in [&leaves[..middle], &leaves[middle..]] {
            let node = doc.new_object_id();
            for leaf in chunk {
                doc.dictionary_mut(*leaf).unwrap().set("Parent", node);
            }
            doc.set_object(
                node,
                dictionary! {
                    "Type" => "Pages",
                    "Parent" => root,
                    "Count" => chunk.len() as i64,
                    "Kids" => chunk.iter().copied().map(Object::Reference).collect::<Vec<_>>(),
                },
            );
            kids.push(node);
        }
    } else {
        for leaf in &leaves {
            doc.dictionary_mut(*leaf).unwrap().set("Parent", root);
        }
        kids = leaves.clone();
    }

    doc.set_object(
        root,
        dictionary! {
            "Type" => "Pages",
            "Count" => pages as i64,
            "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(612), Object::Integer(792)],
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font } },
        },
    );
    let catalog = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => root });
    let info = doc.add_object(dictionary! {
        "Title" => Object::string_literal(label),
        "Producer" => Object::string_literal("fixture"),
    });
    doc.trailer.set("Root", catalog);
    doc.trailer.set("Info", info);
    doc
}

/// Decoded content of every page, in page order.
pub fn page_contents(doc: &Document) -> Vec<Vec<u8>> {
    page_tree::pages(doc)
        .unwrap()
        .into_iter()
        .map(|page| page_content(doc, page))
        .collect()
}

/// Decoded content of one page; content arrays are concatenated.
pub fn page_content(doc: &Document, page: ObjectId) -> Vec<u8> {
    let Ok(contents) = doc.dictionary(page).unwrap().get(b"Contents") else {
        return Vec::new();
    };
    let parts = match doc.resolve(contents).found().unwrap() {
        Object::Array(items) => items.clone(),
        _ => vec![contents.clone()],
    };
    parts
        .iter()
        .flat_map(|part| {
            let stream = doc.resolve(part).found().unwrap().as_stream().unwrap();
            stream.get_plain_content().unwrap()
        })
        .collect()
}

/// Compare everything an operation could have changed.
pub fn assert_same_document(actual: &Document, expected: &Document) {
    assert_eq!(actual.version, expected.version);
    assert_eq!(actual.trailer, expected.trailer);
    assert_eq!(actual.objects, expected.objects);
    assert_eq!(actual.max_id, expected.max_id);
}

/// Serialize `doc` into `dir/name`.
pub fn write_pdf(dir: &Path, name: &str, doc: &Document) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, writer::write(doc).unwrap()).unwrap();
    path
}

/// Cross-reference entry for [`RawPdf::xref_stream`].
#[derive(Debug, Clone, Copy)]
pub enum Entry {
    /// Uncompressed object at a byte offset.
    InUse(usize),
    /// Member `index` of object stream `stream`.
    Compressed(u32, u32),
}

/// Hand-assembled PDF bytes with tracked object offsets.
///
/// Lets tests produce layouts the writer never emits: incremental updates,
/// hybrid files, object streams.
pub struct RawPdf {
    buf: Vec<u8>,
    offsets: BTreeMap<u32, usize>,
}

impl RawPdf {
    pub fn new(version: &str) -> Self {
        Self {
            buf: format!("%PDF-{version}\n%\u{e2}\u{e3}\n").into_bytes(),
            offsets: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn offset(&self, number: u32) -> usize {
        self.offsets[&number]
    }

    /// Append `number 0 obj <body> endobj`.
    pub fn object(&mut self, number: u32, body: &[u8]) -> &mut Self {
        self.offsets.insert(number, self.buf.len());
        self.buf.extend_from_slice(format!("{number} 0 obj\n").as_bytes());
        self.buf.extend_from_slice(body);
        self.buf.extend_from_slice(b"\nendobj\n");
        self
    }

    /// Append a classic cross-reference section for `numbers` (most recent
    /// offsets), then the trailer. Returns the section's offset.
    pub fn xref_section(&mut self, numbers: &[u32], trailer: &str) -> usize {
        let start = self.buf.len();
        let mut text = String::from("xref\n0 1\n0000000000 65535 f\r\n");
        for number in numbers {
            let _ = write!(text, "{number} 1\n{:010} 00000 n\r\n", self.offsets[number]);
        }
        let _ = write!(text, "trailer\n{trailer}\nstartxref\n{start}\n%%EOF\n");
        self.buf.extend_from_slice(text.as_bytes());
        start
    }

    /// Append an unfiltered cross-reference stream object `number` covering
    /// `0..size` and point `startxref` at it. Returns its offset.
    pub fn xref_stream(&mut self, number: u32, entries: &BTreeMap<u32, Entry>, extra: &str) -> usize {
        let start = self.buf.len();
        let size = number + 1;
        let mut rows = Vec::new();
        for n in 0..size {
            let (kind, field, tail): (u8, u32, u16) = match entries.get(&n) {
                _ if n == number => (1, start as u32, 0),
                Some(Entry::InUse(offset)) => (1, *offset as u32, 0),
                Some(Entry::Compressed(stream, index)) => (2, *stream, *index as u16),
                None => (0, 0, if n == 0 { 65535 } else { 0 }),
            };
            rows.push(kind);
            rows.extend_from_slice(&field.to_be_bytes());
            rows.extend_from_slice(&tail.to_be_bytes());
        }
        let mut body = format!(
            "<< /Type /XRef /Size {size} /W [1 4 2] /Length {} {extra} >>\nstream\n",
            rows.len()
        )
        .into_bytes();
        body.extend_from_slice(&rows);
        body.extend_from_slice(b"\nendstream");
        self.object(number, &body);
        self.buf.extend_from_slice(format!("startxref\n{start}\n%%EOF\n").as_bytes());
        start
    }

    /// Append raw bytes.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Body of an uncompressed object stream holding `members` in order.
pub fn object_stream_body(members: &[(u32, &str)]) -> Vec<u8> {
    let mut header = String::new();
    let mut objects = String::new();
    for (number, body) in members {
        let _ = write!(header, "{number} {} ", objects.len());
        objects.push_str(body);
        objects.push(' ');
    }
    let data = format!("{header}{objects}");
    format!(
        "<< /Type /ObjStm /N {} /First {} /Length {} >>\nstream\n{data}\nendstream",
        members.len(),
        header.len(),
        data.len()
    )
    .into_bytes()
}

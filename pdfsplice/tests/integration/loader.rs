//! Loading files in layouts the writer does not produce itself.

use std::collections::BTreeMap;

use pdfsplice::graph::Lookup;
use pdfsplice::{ObjectGraph, PdfSpliceError, ops, page_tree, parser, writer};

use crate::common::{Entry, RawPdf, object_stream_body, page_contents, sample_document};

fn content_stream(text: &str) -> Vec<u8> {
    format!("<< /Length {} >>\nstream\n{text}\nendstream", text.len()).into_bytes()
}

/// Catalog 1, Pages 2, Page 3 and content 4 as plain objects.
fn plain_body(pdf: &mut RawPdf, content: &str) {
    pdf.object(1, b"<< /Type /Catalog /Pages 2 0 R >>")
        .object(2, b"<< /Type /Pages /Kids [3 0 R] /Count 1 /MediaBox [0 0 200 200] >>")
        .object(3, b"<< /Type /Page /Parent 2 0 R /Contents 4 0 R >>")
        .object(4, &content_stream(content));
}

#[test]
fn xref_stream_with_object_stream() {
    let mut pdf = RawPdf::new("1.5");
    pdf.object(3, b"<< /Type /Page /Parent 2 0 R /MediaBox [0 0 100 100] /Contents 4 0 R >>")
        .object(4, &content_stream("packed"))
        .object(
            5,
            &object_stream_body(&[
                (1, "<< /Type /Catalog /Pages 2 0 R >>"),
                (2, "<< /Type /Pages /Kids [3 0 R] /Count 1 >>"),
            ]),
        );
    let entries = BTreeMap::from([
        (1, Entry::Compressed(5, 0)),
        (2, Entry::Compressed(5, 1)),
        (3, Entry::InUse(pdf.offset(3))),
        (4, Entry::InUse(pdf.offset(4))),
        (5, Entry::InUse(pdf.offset(5))),
    ]);
    pdf.xref_stream(6, &entries, "/Root 1 0 R");

    let doc = parser::load(&pdf.finish()).unwrap();

    assert_eq!(doc.version, "1.5");
    assert_eq!(page_contents(&doc), vec![b"packed".to_vec()]);
    assert_eq!(doc.catalog_id().unwrap(), (1, 0));
    // Containers are parsing machinery, not document content
    assert!(!doc.objects.contains_key(&(5, 0)));
    assert!(!doc.objects.contains_key(&(6, 0)));
}

#[test]
fn incremental_update_replaces_objects() {
    let mut pdf = RawPdf::new("1.4");
    plain_body(&mut pdf, "old");
    let first = pdf.xref_section(&[1, 2, 3, 4], "<< /Size 5 /Root 1 0 R >>");

    pdf.object(4, &content_stream("new"));
    pdf.object(5, b"<< /Title (Revised) >>");
    pdf.xref_section(
        &[4, 5],
        &format!("<< /Size 6 /Root 1 0 R /Info 5 0 R /Prev {first} >>"),
    );

    let doc = parser::load(&pdf.finish()).unwrap();

    assert_eq!(page_contents(&doc), vec![b"new".to_vec()]);
    assert_eq!(ops::metadata(&doc).get("Title").map(String::as_str), Some("Revised"));
}

#[test]
fn hybrid_update_reads_compressed_entries_from_xref_stream() {
    let mut pdf = RawPdf::new("1.5");
    plain_body(&mut pdf, "hybrid");
    let first = pdf.xref_section(&[1, 2, 3, 4], "<< /Size 5 /Root 1 0 R >>");

    pdf.object(6, &object_stream_body(&[(5, "<< /Title (Hybrid) >>")]));
    let entries = BTreeMap::from([
        (5, Entry::Compressed(6, 0)),
        (6, Entry::InUse(pdf.offset(6))),
    ]);
    let stream = pdf.xref_stream(7, &entries, "");
    pdf.xref_section(
        &[],
        &format!("<< /Size 8 /Root 1 0 R /Info 5 0 R /Prev {first} /XRefStm {stream} >>"),
    );

    let doc = parser::load(&pdf.finish()).unwrap();

    assert_eq!(page_contents(&doc), vec![b"hybrid".to_vec()]);
    assert_eq!(ops::metadata(&doc).get("Title").map(String::as_str), Some("Hybrid"));
}

#[test]
fn catalog_version_overrides_older_header() {
    let mut pdf = RawPdf::new("1.3");
    pdf.object(1, b"<< /Type /Catalog /Pages 2 0 R /Version /1.6 >>")
        .object(2, b"<< /Type /Pages /Kids [] /Count 0 >>");
    pdf.xref_section(&[1, 2], "<< /Size 3 /Root 1 0 R >>");

    let doc = parser::load(&pdf.finish()).unwrap();

    assert_eq!(doc.version, "1.6");
    assert_eq!(page_tree::page_count(&doc).unwrap(), 0);
}

#[test]
fn missing_startxref_is_malformed() {
    let bytes = writer::write(&sample_document("Lost", 2)).unwrap();
    let cut = bytes
        .windows(b"startxref".len())
        .rposition(|window| window == b"startxref")
        .unwrap();

    assert!(matches!(
        parser::load(&bytes[..cut]),
        Err(PdfSpliceError::MalformedPdf { .. })
    ));
}

#[test]
fn prev_offset_past_end_of_file_is_malformed() {
    let mut pdf = RawPdf::new("1.4");
    plain_body(&mut pdf, "prev");
    pdf.xref_section(&[1, 2, 3, 4], "<< /Size 5 /Root 1 0 R /Prev 999999 >>");

    assert!(matches!(
        parser::load(&pdf.finish()),
        Err(PdfSpliceError::MalformedPdf { .. })
    ));
}

#[test]
fn xref_stream_offset_past_end_of_file_is_malformed() {
    let mut pdf = RawPdf::new("1.5");
    plain_body(&mut pdf, "stm");
    let first = pdf.xref_section(&[1, 2, 3, 4], "<< /Size 5 /Root 1 0 R >>");
    pdf.xref_section(
        &[],
        &format!("<< /Size 5 /Root 1 0 R /Prev {first} /XRefStm 999999 >>"),
    );

    assert!(matches!(
        parser::load(&pdf.finish()),
        Err(PdfSpliceError::MalformedPdf { .. })
    ));
}

#[test]
fn prev_loop_is_followed_once() {
    let mut pdf = RawPdf::new("1.4");
    plain_body(&mut pdf, "loop");
    // The section's /Prev names its own offset
    let start = pdf.len();
    pdf.xref_section(
        &[1, 2, 3, 4],
        &format!("<< /Size 5 /Root 1 0 R /Prev {start} >>"),
    );

    let doc = parser::load(&pdf.finish()).unwrap();

    assert_eq!(page_contents(&doc), vec![b"loop".to_vec()]);
}

#[test]
fn prev_loop_between_two_sections_loads() {
    const PLACEHOLDER: &[u8] = b"9999999999";

    let mut pdf = RawPdf::new("1.4");
    plain_body(&mut pdf, "first");
    // The older section points back at the newer one once it is known
    let older = pdf.xref_section(&[1, 2, 3, 4], "<< /Size 5 /Root 1 0 R /Prev 9999999999 >>");
    pdf.object(4, &content_stream("second"));
    let newer = pdf.xref_section(&[4], &format!("<< /Size 5 /Root 1 0 R /Prev {older} >>"));

    let mut bytes = pdf.finish();
    let at = bytes
        .windows(PLACEHOLDER.len())
        .position(|window| window == PLACEHOLDER)
        .unwrap();
    bytes[at..at + PLACEHOLDER.len()].copy_from_slice(format!("{newer:010}").as_bytes());

    let doc = parser::load(&bytes).unwrap();

    assert_eq!(page_contents(&doc), vec![b"second".to_vec()]);
}

#[test]
fn truncated_file_is_malformed() {
    let bytes = writer::write(&sample_document("Cut", 4)).unwrap();
    let truncated = &bytes[..bytes.len() / 2];

    assert!(matches!(
        parser::load(truncated),
        Err(PdfSpliceError::MalformedPdf { .. })
    ));
}

#[test]
fn stream_running_past_end_of_file_is_malformed() {
    let mut pdf = RawPdf::new("1.4");
    pdf.object(1, b"<< /Type /Catalog /Pages 2 0 R >>")
        .object(2, b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>")
        .object(3, b"<< /Type /Page /Parent 2 0 R /Contents 4 0 R >>")
        .object(4, b"<< /Length 5000 >>\nstream\nshort\nendstream");
    pdf.xref_section(&[1, 2, 3, 4], "<< /Size 5 /Root 1 0 R >>");

    let err = parser::load(&pdf.finish()).unwrap_err();

    assert!(matches!(err, PdfSpliceError::MalformedPdf { .. }));
    assert!(err.to_string().contains("truncated stream"));
}

#[test]
fn file_without_trailer_is_malformed() {
    let mut pdf = RawPdf::new("1.4");
    plain_body(&mut pdf, "orphan");

    let err = parser::load(&pdf.finish()).unwrap_err();

    assert!(matches!(err, PdfSpliceError::MalformedPdf { .. }));
}

#[test]
fn non_pdf_input_is_malformed() {
    assert!(matches!(
        parser::load(b"just some text"),
        Err(PdfSpliceError::MalformedPdf { .. })
    ));
    assert!(matches!(
        parser::load(b""),
        Err(PdfSpliceError::MalformedPdf { .. })
    ));
}

#[test]
fn encrypted_file_is_unsupported() {
    let mut pdf = RawPdf::new("1.4");
    plain_body(&mut pdf, "secret");
    pdf.object(5, b"<< /Filter /Standard /V 2 /R 3 >>");
    pdf.xref_section(&[1, 2, 3, 4, 5], "<< /Size 6 /Root 1 0 R /Encrypt 5 0 R >>");

    assert!(matches!(
        parser::load(&pdf.finish()),
        Err(PdfSpliceError::UnsupportedFeature { .. })
    ));
}

#[test]
fn cyclic_page_tree_is_malformed() {
    let mut pdf = RawPdf::new("1.4");
    pdf.object(1, b"<< /Type /Catalog /Pages 2 0 R >>")
        .object(2, b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>")
        .object(3, b"<< /Type /Pages /Parent 2 0 R /Kids [2 0 R] /Count 1 >>");
    pdf.xref_section(&[1, 2, 3], "<< /Size 4 /Root 1 0 R >>");

    let doc = parser::load(&pdf.finish()).unwrap();

    assert!(matches!(
        page_tree::page_count(&doc),
        Err(PdfSpliceError::MalformedPdf { .. })
    ));
}

#[test]
fn dangling_reference_loads_as_dangling() {
    let mut pdf = RawPdf::new("1.4");
    pdf.object(1, b"<< /Type /Catalog /Pages 2 0 R >>")
        .object(2, b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>")
        .object(3, b"<< /Type /Page /Parent 2 0 R /Contents 9 0 R >>");
    pdf.xref_section(&[1, 2, 3], "<< /Size 4 /Root 1 0 R >>");

    let doc = parser::load(&pdf.finish()).unwrap();

    assert_eq!(page_tree::page_count(&doc).unwrap(), 1);
    assert!(matches!(doc.lookup((9, 0)), Lookup::Dangling(_)));
}

//! Agreement with lopdf's own page API: files built directly through lopdf
//! load here, and our output walks the same way under `get_pages`.

use pdfsplice::ops;
use pdfsplice::writer::{self, WriteOptions};
use pdfsplice::{page_tree, parser};
use rstest::rstest;

use crate::common::{page_contents, sample_document};

/// A file built and saved through lopdf alone, with `pages` pages reading `"<label> p<n>"`.
fn lopdf_file(label: &str, pages: usize, compress: bool) -> Vec<u8> {
    use lopdf::{Document, Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Roman",
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|number| {
            let content = Stream::new(
                dictionary! {},
                format!("BT /F1 10 Tf ({label} p{number}) Tj ET").into_bytes(),
            );
            let content_id = doc.add_object(content);
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_id.into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => Object::Array(vec![0.into(), 0.into(), 595.into(), 842.into()]),
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(label),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    if compress {
        doc.compress();
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn lopdf_page_contents(bytes: &[u8]) -> Vec<Vec<u8>> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page| doc.get_page_content(page).unwrap())
        .collect()
}

#[rstest(
    xref_stream,
    renumber,
    case(false, false),
    case(true, false),
    case(false, true),
    case(true, true)
)]
fn lopdf_reads_our_output(xref_stream: bool, renumber: bool) {
    let doc = sample_document("Ours", 5);
    let options = WriteOptions {
        xref_stream,
        compress: false,
        renumber,
    };

    let bytes = writer::write_with(&doc, &options).unwrap();

    assert_eq!(lopdf_page_contents(&bytes), page_contents(&doc));
}

#[test]
fn lopdf_reads_our_compressed_output() {
    let doc = sample_document("Packed", 3);
    let options = WriteOptions {
        compress: true,
        ..WriteOptions::default()
    };

    let bytes = writer::write_with(&doc, &options).unwrap();

    let reloaded = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(reloaded.get_pages().len(), 3);
}

#[rstest(compress, case(false), case(true))]
fn we_read_lopdf_output(compress: bool) {
    let bytes = lopdf_file("Theirs", 4, compress);

    let doc = parser::load(&bytes).unwrap();

    assert_eq!(page_tree::page_count(&doc).unwrap(), 4);
    let expected: Vec<Vec<u8>> = (1..=4)
        .map(|n| format!("BT /F1 10 Tf (Theirs p{n}) Tj ET").into_bytes())
        .collect();
    assert_eq!(page_contents(&doc), expected);
    assert_eq!(
        ops::metadata(&doc).get("Title").map(String::as_str),
        Some("Theirs")
    );
}

#[test]
fn merged_lopdf_inputs_open_in_lopdf() {
    let first = parser::load(&lopdf_file("One", 2, false)).unwrap();
    let second = parser::load(&lopdf_file("Two", 3, false)).unwrap();

    let merged = ops::merge(&[&first, &second]).unwrap();
    let bytes = writer::write(&merged).unwrap();

    let contents = lopdf_page_contents(&bytes);
    assert_eq!(contents.len(), 5);
    assert_eq!(contents[0], b"BT /F1 10 Tf (One p1) Tj ET".to_vec());
    assert_eq!(contents[4], b"BT /F1 10 Tf (Two p3) Tj ET".to_vec());

    let reloaded = lopdf::Document::load_mem(&bytes).unwrap();
    for page in reloaded.get_pages().into_values() {
        let dict = reloaded.get_dictionary(page).unwrap();
        assert!(dict.has(b"MediaBox"), "inherited MediaBox was not carried over");
    }
}

//! Whole-document guarantees of the operations, checked on generated inputs.

use pdfsplice::ops::{self, Rotation};
use pdfsplice::{PageSpec, PdfSpliceError, page_tree, parser, writer};
use rstest::rstest;

use crate::common::{assert_same_document, page_contents, sample_document};

#[rstest(
    a,
    b,
    case(1, 1),
    case(1, 4),
    case(3, 2),
    case(5, 7)
)]
fn merge_concatenates_pages_in_order(a: usize, b: usize) {
    let first = sample_document("A", a);
    let second = sample_document("B", b);

    let merged = ops::merge(&[&first, &second]).unwrap();

    assert_eq!(page_tree::page_count(&merged).unwrap(), a + b);
    let contents = page_contents(&merged);
    assert_eq!(contents[..a], page_contents(&first)[..]);
    assert_eq!(contents[a..], page_contents(&second)[..]);
}

#[test]
fn merge_keeps_inherited_attributes() {
    let first = sample_document("A", 3);
    let second = sample_document("B", 2);
    let merged = ops::merge(&[&first, &second]).unwrap();

    for page in page_tree::pages(&merged).unwrap() {
        let media_box = page_tree::inherited(&merged, page, b"MediaBox").unwrap();
        assert!(media_box.is_some(), "page {page:?} lost its MediaBox");
        let resources = page_tree::inherited(&merged, page, b"Resources").unwrap();
        assert!(resources.is_some(), "page {page:?} lost its Resources");
    }
}

#[rstest(
    spec,
    expected,
    case("1", vec![1]),
    case("2-4", vec![2, 3, 4]),
    case("6, 1, 3", vec![1, 3, 6]),
    case("1-6", vec![1, 2, 3, 4, 5, 6])
)]
fn extract_keeps_selected_pages_ascending(spec: &str, expected: Vec<usize>) {
    let doc = sample_document("D", 6);
    let source = page_contents(&doc);

    let extracted = ops::extract(&doc, &PageSpec::parse(spec).unwrap()).unwrap();

    let contents = page_contents(&extracted);
    assert_eq!(contents.len(), expected.len());
    for (content, number) in contents.iter().zip(&expected) {
        assert_eq!(content, &source[number - 1]);
    }
}

#[rstest(page, case(1), case(3), case(5))]
fn extract_single_page_matches_extract(page: u32) {
    let doc = sample_document("D", 5);

    let single = ops::extract_page(&doc, page).unwrap();
    let selected = ops::extract(&doc, &PageSpec::single(page)).unwrap();

    assert_same_document(&single, &selected);
}

#[test]
fn split_each_yields_one_document_per_page() {
    let doc = sample_document("D", 4);
    let parts = ops::split_each(&doc).unwrap();

    assert_eq!(parts.len(), 4);
    for (part, expected) in parts.iter().zip(page_contents(&doc)) {
        assert_eq!(page_contents(part), vec![expected]);
    }
}

#[rstest(
    first,
    second,
    case(90, 270),
    case(180, 180),
    case(270, 90),
    case(-90, 90)
)]
fn rotations_compose_to_identity(first: i64, second: i64) {
    let doc = sample_document("D", 3);
    let only_first = PageSpec::single(1);

    let once = ops::rotate(&doc, &only_first, Rotation::from_degrees(first).unwrap()).unwrap();
    let twice = ops::rotate(&once, &only_first, Rotation::from_degrees(second).unwrap()).unwrap();
    let untouched = ops::rotate(&doc, &only_first, Rotation::None).unwrap();

    let page = page_tree::page_id(&twice, 1).unwrap();
    let reference = page_tree::page_id(&untouched, 1).unwrap();
    assert_eq!(
        page_tree::rotation(&twice, page).unwrap(),
        page_tree::rotation(&untouched, reference).unwrap()
    );
}

#[test]
fn rotate_with_empty_selection_rotates_every_page() {
    let doc = sample_document("D", 4);
    let rotated = ops::rotate(&doc, &PageSpec::default(), Rotation::Clockwise90).unwrap();

    for page in page_tree::pages(&rotated).unwrap() {
        assert_eq!(page_tree::rotation(&rotated, page).unwrap(), 90);
    }
}

#[rstest(
    spec,
    survivors,
    case("1", vec![2, 3, 4, 5]),
    case("5", vec![1, 2, 3, 4]),
    case("2, 4", vec![1, 3, 5]),
    case("1-2", vec![3, 4, 5])
)]
fn delete_keeps_survivors_in_order(spec: &str, survivors: Vec<usize>) {
    let doc = sample_document("D", 5);
    let source = page_contents(&doc);

    let remaining = ops::delete(&doc, &PageSpec::parse(spec).unwrap()).unwrap();

    let contents = page_contents(&remaining);
    let expected: Vec<_> = survivors.iter().map(|n| source[n - 1].clone()).collect();
    assert_eq!(contents, expected);
    assert_eq!(page_tree::page_count(&remaining).unwrap(), survivors.len());
}

#[rstest(pages, case(1), case(2), case(9))]
fn written_documents_load_back(pages: usize) {
    let doc = sample_document("R", pages);

    let reloaded = parser::load(&writer::write(&doc).unwrap()).unwrap();

    assert_eq!(page_tree::page_count(&reloaded).unwrap(), pages);
    assert_eq!(page_contents(&reloaded), page_contents(&doc));
}

#[rstest(
    compress,
    xref_stream,
    renumber,
    case(true, false, false),
    case(false, true, false),
    case(true, true, true),
    case(false, false, true)
)]
fn every_write_option_round_trips(compress: bool, xref_stream: bool, renumber: bool) {
    let first = sample_document("A", 2);
    let second = sample_document("B", 3);
    let merged = ops::merge(&[&first, &second]).unwrap();
    let options = writer::WriteOptions {
        xref_stream,
        compress,
        renumber,
    };

    let reloaded = parser::load(&writer::write_with(&merged, &options).unwrap()).unwrap();

    assert_eq!(page_contents(&reloaded), page_contents(&merged));
    assert_eq!(ops::metadata(&reloaded), ops::metadata(&merged));
}

#[test]
fn boundary_failures() {
    let doc = sample_document("D", 3);

    assert!(matches!(
        ops::extract(&doc, &PageSpec::single(4)),
        Err(PdfSpliceError::PageOutOfRange { page: 4, total_pages: 3 })
    ));
    assert!(matches!(
        ops::merge(&[&doc]),
        Err(PdfSpliceError::InsufficientInput { required: 2, provided: 1 })
    ));
    assert!(matches!(
        ops::delete(&doc, &PageSpec::default()),
        Err(PdfSpliceError::EmptySelection { .. })
    ));
    assert!(matches!(
        ops::rotate(&doc, &PageSpec::single(9), Rotation::Rotate180),
        Err(PdfSpliceError::PageOutOfRange { page: 9, .. })
    ));
}

#[test]
fn operations_leave_their_inputs_unchanged() {
    let doc = sample_document("D", 4);
    let other = sample_document("E", 2);
    let snapshot = doc.clone();
    let selection = PageSpec::parse("2-3").unwrap();

    ops::merge(&[&doc, &other]).unwrap();
    ops::extract(&doc, &selection).unwrap();
    ops::split_each(&doc).unwrap();
    ops::rotate(&doc, &selection, Rotation::Clockwise90).unwrap();
    ops::delete(&doc, &selection).unwrap();
    ops::metadata(&doc);

    assert_same_document(&doc, &snapshot);
}

//! Extracting pages into new documents.

use lopdf::{Document, ObjectId};

use super::copy::{ObjectCopier, page_boundary};
use super::finish_page_tree;
use crate::error::{PdfSpliceError, Result};
use crate::page_spec::PageSpec;
use crate::page_tree;

/// Build a document holding only the selected pages, in ascending order.
///
/// Only objects reachable from the selected pages are copied. References
/// from them into the rest of the page tree, the Catalog or the document
/// information dictionary are replaced with `null`.
///
/// # Errors
///
/// * `EmptySelection` when `pages` is empty
/// * `PageOutOfRange` when a selected page does not exist
pub fn extract(doc: &Document, pages: &PageSpec) -> Result<Document> {
    if pages.is_empty() {
        return Err(PdfSpliceError::EmptySelection {
            operation: "extract",
        });
    }
    let all = page_tree::pages(doc)?;
    pages.check_bounds(all.len())?;

    let selected: Vec<ObjectId> = pages
        .iter()
        .filter_map(|number| all.get(number as usize - 1).copied())
        .collect();
    copy_pages(doc, &selected)
}

/// Build a single-page document from page `number`.
///
/// # Errors
///
/// `PageOutOfRange` when `number` is 0 or past the last page.
pub fn extract_page(doc: &Document, number: u32) -> Result<Document> {
    let page = page_tree::page_id(doc, number)?;
    copy_pages(doc, &[page])
}

/// Burst a document into one document per page.
pub fn split_each(doc: &Document) -> Result<Vec<Document>> {
    let all = page_tree::pages(doc)?;
    all.iter()
        .map(|page| copy_pages(doc, std::slice::from_ref(page)))
        .collect()
}

fn copy_pages(doc: &Document, selected: &[ObjectId]) -> Result<Document> {
    let boundary = page_boundary(doc, selected)?;
    let mut dest = Document::with_version(doc.version.clone());
    let mut copier = ObjectCopier::new(doc, &mut dest).boundary(boundary);

    let mut kids = Vec::with_capacity(selected.len());
    for page in selected {
        kids.push(copier.copy_page(*page)?);
    }
    log::debug!(
        "Extracted {} page(s) with {} object(s)",
        kids.len(),
        copier.copied()
    );

    finish_page_tree(&mut dest, &kids)?;
    Ok(dest)
}

//! Concatenating documents.

use lopdf::{Dictionary, Document, Object};

use super::copy::{ObjectCopier, page_boundary};
use super::{finish_page_tree, version_key};
use crate::error::{PdfSpliceError, Result};
use crate::graph::ObjectGraph;
use crate::page_tree;

/// Value written to `/Producer` of merged documents.
pub const PRODUCER: &str = "pdfsplice";

/// Concatenate the pages of `docs`, in order, into a new document.
///
/// Each page is copied with its resources and given a fresh identity. The
/// output has a flat page tree, the highest input version, and the first
/// input's document information with `/Producer` updated.
///
/// # Errors
///
/// * `InsufficientInput` when fewer than two documents are given
/// * `MalformedPdf` when a page tree cannot be walked
///
/// # Examples
///
/// ```
/// # fn example(a: &pdfsplice::Document, b: &pdfsplice::Document) -> pdfsplice::Result<()> {
/// let merged = pdfsplice::ops::merge(&[a, b])?;
/// println!("{} pages", pdfsplice::page_tree::page_count(&merged)?);
/// # Ok(())
/// # }
/// ```
pub fn merge(docs: &[&Document]) -> Result<Document> {
    if docs.len() < 2 {
        return Err(PdfSpliceError::InsufficientInput {
            required: 2,
            provided: docs.len(),
        });
    }

    let version = docs
        .iter()
        .map(|doc| doc.version.as_str())
        .max_by_key(|version| version_key(version))
        .unwrap_or("1.7");
    let mut dest = Document::with_version(version);
    let mut kids = Vec::new();
    let mut info = None;

    for (index, source) in docs.iter().enumerate() {
        let pages = page_tree::pages(source)?;
        let boundary = page_boundary(source, &pages)?;
        let mut copier = ObjectCopier::new(source, &mut dest).boundary(boundary);

        for page in &pages {
            kids.push(copier.copy_page(*page)?);
        }
        if index == 0 {
            info = copier.copy_info();
        }
        log::debug!(
            "Copied {} page(s) and {} object(s) from input {}",
            pages.len(),
            copier.copied(),
            index + 1
        );
    }

    let info = match info {
        Some(id) => id,
        None => dest.add_object(Dictionary::new()),
    };
    dest.dictionary_mut(info)?
        .set("Producer", Object::string_literal(PRODUCER));
    dest.trailer.set("Info", info);

    finish_page_tree(&mut dest, &kids)?;
    log::info!("Merged {} documents into {} pages", docs.len(), kids.len());
    Ok(dest)
}

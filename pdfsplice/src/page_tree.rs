//! Page tree traversal.
//!
//! Pages are the leaves of the tree rooted at the Catalog's `/Pages`, in
//! depth-first, left-to-right order. Nothing here caches the page list; it
//! is recomputed from the document on every call.

use std::collections::HashSet;

use crate::error::{PdfSpliceError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::graph::{ObjectGraph, Ref, reference};

/// Page attributes a leaf may inherit from its ancestors.
pub const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page tree nodes split into leaves and internal nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTree {
    /// Leaves in document order.
    pub pages: Vec<ObjectId>,
    /// Internal nodes in pre-order, starting with the root.
    pub nodes: Vec<ObjectId>,
}

/// Walk the whole page tree.
///
/// # Errors
///
/// `MalformedPdf` when the tree has a cycle, a node is shared between two
/// parents, or a kid reference dangles.
pub fn walk(doc: &Document) -> Result<PageTree> {
    let root = doc.pages_root_id()?;
    let mut tree = PageTree::default();
    let mut visited = HashSet::new();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            return Err(PdfSpliceError::malformed(format!(
                "cyclic page tree: node {} is reached twice",
                Ref(id)
            )));
        }
        let node = doc.dictionary(id)?;
        match kids(doc, id, node)? {
            Some(children) => {
                tree.nodes.push(id);
                stack.extend(children.into_iter().rev());
            }
            None => tree.pages.push(id),
        }
    }

    Ok(tree)
}

/// Page identities in document order.
pub fn pages(doc: &Document) -> Result<Vec<ObjectId>> {
    walk(doc).map(|tree| tree.pages)
}

/// Children of an internal node, skipping anything that is not a reference.
pub fn children(doc: &Document, node: ObjectId) -> Result<Vec<ObjectId>> {
    let dict = doc.dictionary(node)?;
    Ok(kids(doc, node, dict)?.unwrap_or_default())
}

/// Number of pages.
pub fn page_count(doc: &Document) -> Result<usize> {
    pages(doc).map(|pages| pages.len())
}

/// Identity of 1-based page `number`.
pub fn page_id(doc: &Document, number: u32) -> Result<ObjectId> {
    let pages = pages(doc)?;
    usize::try_from(number)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| pages.get(index).copied())
        .ok_or(PdfSpliceError::PageOutOfRange {
            page: number,
            total_pages: pages.len(),
        })
}

/// Value of `key` on `page` or the nearest ancestor that has it.
///
/// The value is returned as stored, so it may be a reference.
pub fn inherited(doc: &Document, page: ObjectId, key: &[u8]) -> Result<Option<Object>> {
    let mut visited = HashSet::new();
    let mut current = page;

    loop {
        if !visited.insert(current) {
            return Err(PdfSpliceError::malformed(format!(
                "cyclic /Parent chain above page {}",
                Ref(page)
            )));
        }
        let node = doc.dictionary(current)?;
        if let Ok(value) = node.get(key) {
            return Ok(Some(value.clone()));
        }
        match reference(node, b"Parent") {
            Some(parent) => current = parent,
            None => return Ok(None),
        }
    }
}

/// Effective `/Rotate` of `page`, one of 0, 90, 180 or 270.
pub fn rotation(doc: &Document, page: ObjectId) -> Result<i64> {
    let Some(value) = inherited(doc, page, b"Rotate")? else {
        return Ok(0);
    };
    let degrees = doc
        .resolve(&value)
        .found()
        .and_then(|value| value.as_i64().ok());
    match degrees {
        Some(degrees) if degrees % 90 == 0 => Ok(degrees.rem_euclid(360)),
        Some(degrees) => {
            log::warn!(
                "Page {} has /Rotate {degrees}, which is not a multiple of 90; using 0",
                Ref(page)
            );
            Ok(0)
        }
        None => Ok(0),
    }
}

/// Children of an internal node, or `None` for a leaf.
fn kids(doc: &Document, id: ObjectId, node: &Dictionary) -> Result<Option<Vec<ObjectId>>> {
    if node.has_type(b"Page") {
        return Ok(None);
    }
    let Ok(value) = node.get(b"Kids") else {
        // A /Pages node without /Kids is an empty subtree, not a page
        return Ok(node.has_type(b"Pages").then(Vec::new));
    };

    let items = doc
        .resolve(value)
        .required()?
        .as_array()
        .map_err(|_| PdfSpliceError::malformed(format!("/Kids of node {} is not an array", Ref(id))))?;

    let mut children = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Object::Reference(kid) => children.push(*kid),
            other => log::warn!(
                "Ignoring {} in /Kids of node {}",
                other.enum_variant(),
                Ref(id)
            ),
        }
    }
    Ok(Some(children))
}

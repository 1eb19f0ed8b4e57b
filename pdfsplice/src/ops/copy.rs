//! Copying object graphs between documents.
//!
//! [`ObjectCopier`] moves the transitive closure of some objects from a
//! source document into a destination, giving every copied object a fresh
//! identity. Objects already copied by the same copier are reused, so
//! resources shared by several pages land in the destination once.

use std::collections::{HashMap, HashSet, VecDeque};

use lopdf::{Document, Object, ObjectId};

use crate::error::{PdfSpliceError, Result};
use crate::graph::{ObjectGraph, Ref, collect_references, reference, remap_references};
use crate::page_tree::{self, INHERITABLE_KEYS};

/// Copies objects from `source` into `dest` with reference rewriting.
#[derive(Debug)]
pub struct ObjectCopier<'a> {
    /// Document objects are read from.
    source: &'a Document,

    /// Document objects are added to.
    dest: &'a mut Document,

    /// Source identity to destination identity.
    mapping: HashMap<ObjectId, ObjectId>,

    /// Source identities that are never copied.
    boundary: HashSet<ObjectId>,

    /// Dangling identities already reported.
    reported: HashSet<ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    /// Create a copier with an empty boundary.
    pub fn new(source: &'a Document, dest: &'a mut Document) -> Self {
        Self {
            source,
            dest,
            mapping: HashMap::new(),
            boundary: HashSet::new(),
            reported: HashSet::new(),
        }
    }

    /// Add identities that must not be copied.
    ///
    /// References to them inside copied objects are rewritten to `null`.
    pub fn boundary(mut self, ids: impl IntoIterator<Item = ObjectId>) -> Self {
        self.boundary.extend(ids);
        self
    }

    /// Destination identity of a source object, if it has been copied.
    pub fn mapped(&self, id: ObjectId) -> Option<ObjectId> {
        self.mapping.get(&id).copied()
    }

    /// Number of objects copied so far.
    pub fn copied(&self) -> usize {
        self.mapping.len()
    }

    /// Copy `id` and everything it references.
    ///
    /// Returns `None` when `id` is dangling or inside the boundary.
    pub fn copy_object(&mut self, id: ObjectId) -> Option<ObjectId> {
        self.copy_closure(vec![id]);
        self.mapped(id)
    }

    /// Copy everything `value` references and return it with rewritten
    /// references.
    pub fn copy_value(&mut self, value: &Object) -> Object {
        let mut roots = Vec::new();
        collect_references(value, &mut roots);
        self.copy_closure(roots);

        let mut copied = value.clone();
        let mapping = &self.mapping;
        remap_references(&mut copied, &mut |old| mapping.get(&old).copied());
        copied
    }

    /// Copy a page leaf as a standalone page.
    ///
    /// Inherited attributes are written onto the copy and `/Parent` is
    /// removed; the caller attaches it to a new tree.
    ///
    /// # Errors
    ///
    /// `MalformedPdf` when `page` is not a dictionary in the source or its
    /// parent chain is cyclic.
    pub fn copy_page(&mut self, page: ObjectId) -> Result<ObjectId> {
        let source = self.source;
        let source_page = source.dictionary(page)?;
        let new_id = self.copy_object(page).ok_or_else(|| {
            PdfSpliceError::malformed(format!("page {} cannot be copied", Ref(page)))
        })?;

        let mut flattened = Vec::new();
        for key in INHERITABLE_KEYS {
            if source_page.has(key) {
                continue;
            }
            if let Some(value) = page_tree::inherited(source, page, key)? {
                flattened.push((key, self.copy_value(&value)));
            }
        }

        let copy = self.dest.dictionary_mut(new_id)?;
        copy.remove(b"Parent");
        copy.set("Type", "Page");
        for (key, value) in flattened {
            copy.set(key, value);
        }

        Ok(new_id)
    }

    /// Copy the source's document information dictionary as a new object.
    ///
    /// Only an `/Info` stored as a reference to a dictionary is copied.
    pub fn copy_info(&mut self) -> Option<ObjectId> {
        let source = self.source;
        let info_id = reference(&source.trailer, b"Info")?;
        let info = source.lookup(info_id).found()?.as_dict().ok()?;
        let value = self.copy_value(&Object::Dictionary(info.clone()));
        Some(self.dest.add_object(value))
    }

    /// Mark breadth-first from `roots`, then copy every newly marked object.
    fn copy_closure(&mut self, roots: Vec<ObjectId>) {
        let mut queue: VecDeque<ObjectId> = roots.into();
        let mut marked = Vec::new();

        while let Some(id) = queue.pop_front() {
            if self.mapping.contains_key(&id) || self.boundary.contains(&id) {
                continue;
            }
            let Some(object) = self.source.objects.get(&id) else {
                if self.reported.insert(id) {
                    log::warn!("Dropping dangling reference to {}", Ref(id));
                }
                continue;
            };

            let new_id = self.dest.new_object_id();
            self.mapping.insert(id, new_id);
            marked.push((id, new_id));

            let mut references = Vec::new();
            collect_references(object, &mut references);
            queue.extend(references);
        }

        for (old_id, new_id) in marked {
            let Some(object) = self.source.objects.get(&old_id) else {
                continue;
            };
            let mut copy = object.clone();
            let mapping = &self.mapping;
            remap_references(&mut copy, &mut |old| mapping.get(&old).copied());
            self.dest.objects.insert(new_id, copy);
        }
    }
}

/// Identities a page copy must not pull in: the page tree apart from the
/// kept leaves, the Catalog and the document information dictionary.
pub fn page_boundary(source: &Document, keep: &[ObjectId]) -> Result<HashSet<ObjectId>> {
    let tree = page_tree::walk(source)?;
    let keep: HashSet<ObjectId> = keep.iter().copied().collect();

    let mut boundary: HashSet<ObjectId> = tree
        .nodes
        .into_iter()
        .chain(tree.pages.into_iter().filter(|page| !keep.contains(page)))
        .collect();
    boundary.insert(source.catalog_id()?);
    if let Some(info) = reference(&source.trailer, b"Info") {
        boundary.insert(info);
    }

    Ok(boundary)
}

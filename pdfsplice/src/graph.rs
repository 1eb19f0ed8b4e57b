//! Object graph queries over a [`Document`].
//!
//! A document is an arena of indirect objects keyed by identity, with
//! references as the only edges. [`ObjectGraph`] adds what the operations
//! need on top of lopdf's arena: lookups that report dangling identities
//! explicitly, typed errors for the Catalog and page tree root, and
//! reachability from the trailer. The free functions collect and rewrite
//! the references held inside a single value.

use std::collections::BTreeSet;
use std::fmt;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{PdfSpliceError, Result};

/// Longest chain of references-to-references followed before giving up.
const MAX_REFERENCE_CHAIN: usize = 32;

/// Displays an object identity the way PDF writes references, `N G R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ref(pub ObjectId);

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.0.0, self.0.1)
    }
}

/// Result of resolving an object identity.
///
/// A reference to an object the document does not contain is not an error
/// by itself; callers decide whether a dangling reference matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// The object exists.
    Found(&'a Object),
    /// Nothing in the document has this identity.
    Dangling(ObjectId),
}

impl<'a> Lookup<'a> {
    /// The object, if it exists.
    pub fn found(self) -> Option<&'a Object> {
        match self {
            Self::Found(object) => Some(object),
            Self::Dangling(_) => None,
        }
    }

    /// The object, treating a dangling reference as a broken document.
    pub fn required(self) -> Result<&'a Object> {
        match self {
            Self::Found(object) => Ok(object),
            Self::Dangling(id) => Err(PdfSpliceError::malformed(format!(
                "reference {} points to a missing object",
                Ref(id)
            ))),
        }
    }
}

/// Graph-level queries on a document.
pub trait ObjectGraph {
    /// Resolve an identity.
    fn lookup(&self, id: ObjectId) -> Lookup<'_>;

    /// Follow `object` through any references to a direct value.
    ///
    /// Direct values resolve to themselves. A reference loop resolves to
    /// `Dangling` of the identity where the chain was abandoned.
    fn resolve<'a>(&'a self, object: &'a Object) -> Lookup<'a>;

    /// Dictionary stored under `id`, or the dictionary of a stream.
    fn dictionary(&self, id: ObjectId) -> Result<&Dictionary>;

    /// Mutable dictionary stored under `id`.
    fn dictionary_mut(&mut self, id: ObjectId) -> Result<&mut Dictionary>;

    /// Identity of the Catalog named by the trailer.
    fn catalog_id(&self) -> Result<ObjectId>;

    /// Identity of the page tree root.
    fn pages_root_id(&self) -> Result<ObjectId>;

    /// Every identity reachable from `roots`, including the roots that exist.
    ///
    /// Dangling references are neither followed nor included.
    fn closure(&self, roots: Vec<ObjectId>) -> BTreeSet<ObjectId>;

    /// Every identity reachable from the trailer.
    fn reachable(&self) -> BTreeSet<ObjectId>;

    /// Drop every object the trailer cannot reach. Returns how many were removed.
    fn prune_unreachable(&mut self) -> usize;

    /// Recompute `max_id` from the stored objects.
    fn refresh_max_id(&mut self);
}

impl ObjectGraph for Document {
    fn lookup(&self, id: ObjectId) -> Lookup<'_> {
        match self.objects.get(&id) {
            Some(object) => Lookup::Found(object),
            None => Lookup::Dangling(id),
        }
    }

    fn resolve<'a>(&'a self, object: &'a Object) -> Lookup<'a> {
        let mut current = object;
        for _ in 0..MAX_REFERENCE_CHAIN {
            match current {
                Object::Reference(id) => match self.objects.get(id) {
                    Some(next) => current = next,
                    None => return Lookup::Dangling(*id),
                },
                direct => return Lookup::Found(direct),
            }
        }
        match current {
            Object::Reference(id) => Lookup::Dangling(*id),
            direct => Lookup::Found(direct),
        }
    }

    fn dictionary(&self, id: ObjectId) -> Result<&Dictionary> {
        match self.lookup(id).required()? {
            Object::Dictionary(dict) => Ok(dict),
            Object::Stream(stream) => Ok(&stream.dict),
            other => Err(PdfSpliceError::malformed(format!(
                "object {} is a {} where a dictionary was expected",
                Ref(id),
                other.enum_variant()
            ))),
        }
    }

    fn dictionary_mut(&mut self, id: ObjectId) -> Result<&mut Dictionary> {
        let object = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| PdfSpliceError::malformed(format!("object {} is missing", Ref(id))))?;
        match object {
            Object::Dictionary(dict) => Ok(dict),
            Object::Stream(stream) => Ok(&mut stream.dict),
            other => Err(PdfSpliceError::malformed(format!(
                "object {} is a {} where a dictionary was expected",
                Ref(id),
                other.enum_variant()
            ))),
        }
    }

    fn catalog_id(&self) -> Result<ObjectId> {
        let root = reference(&self.trailer, b"Root")
            .ok_or_else(|| PdfSpliceError::malformed("trailer has no /Root reference"))?;
        self.dictionary(root)?;
        Ok(root)
    }

    fn pages_root_id(&self) -> Result<ObjectId> {
        let catalog = self.dictionary(self.catalog_id()?)?;
        reference(catalog, b"Pages")
            .ok_or_else(|| PdfSpliceError::malformed("catalog has no /Pages reference"))
    }

    fn closure(&self, mut pending: Vec<ObjectId>) -> BTreeSet<ObjectId> {
        let mut marked = BTreeSet::new();

        while let Some(id) = pending.pop() {
            if marked.contains(&id) {
                continue;
            }
            if let Some(object) = self.objects.get(&id) {
                marked.insert(id);
                collect_references(object, &mut pending);
            }
        }

        marked
    }

    fn reachable(&self) -> BTreeSet<ObjectId> {
        let mut roots = Vec::new();
        for (_, value) in self.trailer.iter() {
            collect_references(value, &mut roots);
        }
        self.closure(roots)
    }

    fn prune_unreachable(&mut self) -> usize {
        let reachable = self.reachable();
        let before = self.objects.len();
        self.objects.retain(|id, _| reachable.contains(id));
        let removed = before - self.objects.len();
        if removed > 0 {
            log::debug!("Pruned {removed} unreachable object(s)");
        }
        removed
    }

    fn refresh_max_id(&mut self) {
        self.max_id = self.objects.keys().map(|id| id.0).max().unwrap_or(0);
    }
}

/// Identity stored directly under `key`, if the value is a reference.
pub fn reference(dict: &Dictionary, key: &[u8]) -> Option<ObjectId> {
    dict.get(key).and_then(Object::as_reference).ok()
}

/// Append every identity referenced anywhere inside `object`.
pub fn collect_references(object: &Object, out: &mut Vec<ObjectId>) {
    match object {
        Object::Reference(id) => out.push(*id),
        Object::Array(items) => {
            for item in items {
                collect_references(item, out);
            }
        }
        Object::Dictionary(dict) => collect_dictionary_references(dict, out),
        Object::Stream(stream) => collect_dictionary_references(&stream.dict, out),
        _ => {}
    }
}

fn collect_dictionary_references(dict: &Dictionary, out: &mut Vec<ObjectId>) {
    for (_, value) in dict.iter() {
        collect_references(value, out);
    }
}

/// Rewrite every reference inside `object` through `map`.
///
/// References `map` has no answer for become `null`.
pub fn remap_references<F>(object: &mut Object, map: &mut F)
where
    F: FnMut(ObjectId) -> Option<ObjectId>,
{
    match object {
        Object::Reference(id) => match map(*id) {
            Some(new) => *id = new,
            None => *object = Object::Null,
        },
        Object::Array(items) => {
            for item in items {
                remap_references(item, map);
            }
        }
        Object::Dictionary(dict) => remap_dictionary(dict, map),
        Object::Stream(stream) => remap_dictionary(&mut stream.dict, map),
        _ => {}
    }
}

/// [`remap_references`] over every value of a dictionary.
pub fn remap_dictionary<F>(dict: &mut Dictionary, map: &mut F)
where
    F: FnMut(ObjectId) -> Option<ObjectId>,
{
    for (_, value) in dict.iter_mut() {
        remap_references(value, map);
    }
}

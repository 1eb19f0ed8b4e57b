//! Document transformations.
//!
//! Every operation takes its input by shared reference and returns a new
//! [`Document`]; inputs are never modified. Merge and extract build a fresh
//! document by copying pages with [`ObjectCopier`]; rotate and delete work
//! on a clone and keep object identities stable.

pub mod copy;
pub mod delete;
pub mod extract;
pub mod merge;
pub mod metadata;
pub mod rotate;

pub use copy::ObjectCopier;
pub use delete::delete;
pub use extract::{extract, extract_page, split_each};
pub use merge::merge;
pub use metadata::{DocumentInfo, metadata};
pub use rotate::{Rotation, rotate};

use lopdf::{Document, Object, ObjectId, dictionary};

use crate::error::Result;
use crate::graph::ObjectGraph;

/// Attach `kids` to a new flat page tree and Catalog in `dest`.
fn finish_page_tree(dest: &mut Document, kids: &[ObjectId]) -> Result<ObjectId> {
    let root = dest.new_object_id();
    for kid in kids {
        dest.dictionary_mut(*kid)?.set("Parent", root);
    }

    dest.set_object(
        root,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids.iter().copied().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => kids.len() as i64,
        },
    );
    let catalog = dest.add_object(dictionary! { "Type" => "Catalog", "Pages" => root });
    dest.trailer.set("Root", catalog);
    Ok(catalog)
}

/// Numeric `(major, minor)` of a header version, for comparisons.
pub(crate) fn version_key(version: &str) -> (u32, u32) {
    version
        .split_once('.')
        .and_then(|(major, minor)| Some((major.parse().ok()?, minor.parse().ok()?)))
        .unwrap_or((1, 0))
}

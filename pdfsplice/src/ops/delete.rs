//! Page deletion.

use std::collections::{HashMap, HashSet};

use lopdf::{Document, Object, ObjectId};

use crate::error::{PdfSpliceError, Result};
use crate::graph::{ObjectGraph, remap_dictionary, remap_references};
use crate::page_spec::PageSpec;
use crate::page_tree;

/// Remove the selected pages.
///
/// Deleted leaves are unlinked from their parents, `/Count`s are recomputed
/// and internal nodes left without kids are removed (the root is kept even
/// when empty). Every other reference to a deleted page becomes `null`, and
/// objects no longer reachable from the trailer are dropped. Surviving
/// objects keep their identities.
///
/// # Errors
///
/// * `EmptySelection` when `pages` is empty
/// * `PageOutOfRange` when a selected page does not exist
pub fn delete(doc: &Document, pages: &PageSpec) -> Result<Document> {
    if pages.is_empty() {
        return Err(PdfSpliceError::EmptySelection {
            operation: "delete",
        });
    }
    let tree = page_tree::walk(doc)?;
    pages.check_bounds(tree.pages.len())?;

    let doomed: HashSet<ObjectId> = pages
        .iter()
        .filter_map(|number| tree.pages.get(number as usize - 1).copied())
        .collect();
    let leaves: HashSet<ObjectId> = tree.pages.iter().copied().collect();
    let root = tree.nodes.first().copied();

    let mut result = doc.clone();

    // Children come after their parents in pre-order, so walking backwards
    // settles every subtree before the node that holds it.
    let mut counts: HashMap<ObjectId, usize> = HashMap::new();
    let mut emptied: HashSet<ObjectId> = HashSet::new();
    for node in tree.nodes.iter().rev() {
        let mut kept = Vec::new();
        let mut count = 0;
        for kid in page_tree::children(doc, *node)? {
            if leaves.contains(&kid) {
                if !doomed.contains(&kid) {
                    kept.push(Object::Reference(kid));
                    count += 1;
                }
            } else if !emptied.contains(&kid) {
                kept.push(Object::Reference(kid));
                count += counts.get(&kid).copied().unwrap_or(0);
            }
        }

        if kept.is_empty() && Some(*node) != root {
            emptied.insert(*node);
        }
        counts.insert(*node, count);

        let dict = result.dictionary_mut(*node)?;
        dict.set("Kids", kept);
        dict.set("Count", count as i64);
    }

    let removed: HashSet<ObjectId> = doomed.union(&emptied).copied().collect();
    let mut keep = |id: ObjectId| (!removed.contains(&id)).then_some(id);
    for object in result.objects.values_mut() {
        remap_references(object, &mut keep);
    }
    remap_dictionary(&mut result.trailer, &mut keep);
    for id in &removed {
        result.objects.remove(id);
    }

    let pruned = result.prune_unreachable();
    log::debug!(
        "Deleted {} page(s), pruned {pruned} unreachable object(s)",
        doomed.len()
    );
    Ok(result)
}

//! Page rotation.

use std::fmt;

use lopdf::{Document, ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::{PdfSpliceError, Result};
use crate::graph::ObjectGraph;
use crate::page_spec::PageSpec;
use crate::page_tree;

/// A clockwise quarter-turn rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rotation {
    /// 0 degrees.
    None,
    /// 90 degrees clockwise.
    Clockwise90,
    /// 180 degrees.
    Rotate180,
    /// 270 degrees clockwise.
    Clockwise270,
}

impl Rotation {
    /// Normalize any multiple of 90, negative values included.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSpliceError::InvalidRotation`] for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfsplice::ops::Rotation;
    ///
    /// assert_eq!(Rotation::from_degrees(-90).unwrap(), Rotation::Clockwise270);
    /// assert_eq!(Rotation::from_degrees(450).unwrap().degrees(), 90);
    /// assert!(Rotation::from_degrees(45).is_err());
    /// ```
    pub fn from_degrees(degrees: i64) -> Result<Self> {
        if degrees % 90 != 0 {
            return Err(PdfSpliceError::InvalidRotation { degrees });
        }
        Ok(match degrees.rem_euclid(360) {
            90 => Self::Clockwise90,
            180 => Self::Rotate180,
            270 => Self::Clockwise270,
            _ => Self::None,
        })
    }

    /// Angle in degrees, one of 0, 90, 180 or 270.
    pub fn degrees(self) -> i64 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Rotate180 => 180,
            Self::Clockwise270 => 270,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Rotate the selected pages by `rotation` on top of their current rotation.
///
/// An empty selection rotates every page. Only the leaves' `/Rotate` entries
/// change; every object keeps its identity.
///
/// # Errors
///
/// `PageOutOfRange` when a selected page does not exist.
pub fn rotate(doc: &Document, pages: &PageSpec, rotation: Rotation) -> Result<Document> {
    let all = page_tree::pages(doc)?;
    pages.check_bounds(all.len())?;

    let targets: Vec<ObjectId> = if pages.is_empty() {
        all
    } else {
        pages
            .iter()
            .filter_map(|number| all.get(number as usize - 1).copied())
            .collect()
    };

    let mut rotated = doc.clone();
    for page in &targets {
        let current = page_tree::rotation(doc, *page)?;
        let angle = (current + rotation.degrees()).rem_euclid(360);
        rotated.dictionary_mut(*page)?.set("Rotate", angle);
    }

    log::debug!("Rotated {} page(s) by {rotation}", targets.len());
    Ok(rotated)
}

//! Page selection language.
//!
//! Users select pages with a short comma-separated list of page numbers and
//! inclusive ranges:
//! - `"3"` - a single page
//! - `"1-5"` - pages 1 through 5
//! - `"1, 3-5, 8"` - any combination, in any order
//!
//! The whole string is accepted or rejected as a unit. An empty string is a
//! valid, empty selection; whether that is acceptable is up to the operation.
//!
//! # Examples
//!
//! ```
//! use pdfsplice::page_spec::PageSpec;
//!
//! let spec = PageSpec::parse("8, 3-5, 1").unwrap();
//! assert_eq!(spec.to_vec(), vec![1, 3, 4, 5, 8]);
//! assert_eq!(spec.to_string(), "1,3-5,8");
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{PdfSpliceError, Result};

/// Largest page number the parser accepts.
pub const MAX_PAGE_NUMBER: u32 = 1_000_000;

/// A validated, deduplicated, ascending set of 1-based page numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PageSpec {
    pages: BTreeSet<u32>,
}

impl PageSpec {
    /// Parse a page specification string.
    ///
    /// # Arguments
    ///
    /// * `spec` - Page list such as `"1, 3-5, 8"`
    ///
    /// # Errors
    ///
    /// Returns [`PdfSpliceError::InvalidPageSpec`] if any token is not a
    /// positive integer or a `start-end` range with `start <= end`.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut pages = BTreeSet::new();

        if spec.trim().is_empty() {
            return Ok(Self { pages });
        }

        for token in spec.split(',') {
            let token = token.trim();
            if token.is_empty() {
                return Err(PdfSpliceError::invalid_page_spec(spec, "empty entry"));
            }

            match token.split_once('-') {
                Some((start, end)) => {
                    let start = parse_page_number(spec, start)?;
                    let end = parse_page_number(spec, end)?;
                    if start > end {
                        return Err(PdfSpliceError::invalid_page_spec(
                            spec,
                            format!("range {start}-{end} ends before it starts"),
                        ));
                    }
                    pages.extend(start..=end);
                }
                None => {
                    pages.insert(parse_page_number(spec, token)?);
                }
            }
        }

        Ok(Self { pages })
    }

    /// Build a selection from already-validated page numbers.
    pub fn from_pages(pages: impl IntoIterator<Item = u32>) -> Self {
        Self {
            pages: pages.into_iter().filter(|p| *p > 0).collect(),
        }
    }

    /// Select a single page.
    pub fn single(page: u32) -> Self {
        Self::from_pages([page])
    }

    /// Number of selected pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Whether `page` is selected.
    pub fn contains(&self, page: u32) -> bool {
        self.pages.contains(&page)
    }

    /// Lowest selected page, if any.
    pub fn first(&self) -> Option<u32> {
        self.pages.first().copied()
    }

    /// Highest selected page, if any.
    pub fn last(&self) -> Option<u32> {
        self.pages.last().copied()
    }

    /// Iterate the selected pages in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.pages.iter().copied()
    }

    /// Selected pages as an ascending vector.
    pub fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }

    /// Ensure every selected page exists in a document with `total_pages` pages.
    ///
    /// # Errors
    ///
    /// Returns [`PdfSpliceError::PageOutOfRange`] naming the first page that
    /// does not exist.
    pub fn check_bounds(&self, total_pages: usize) -> Result<()> {
        match self.pages.iter().find(|p| **p as usize > total_pages) {
            Some(page) => Err(PdfSpliceError::PageOutOfRange {
                page: *page,
                total_pages,
            }),
            None => Ok(()),
        }
    }
}

fn parse_page_number(spec: &str, raw: &str) -> Result<u32> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(PdfSpliceError::invalid_page_spec(spec, "missing page number"));
    }
    // `u32::from_str` would also accept a leading '+'
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PdfSpliceError::invalid_page_spec(
            spec,
            format!("'{raw}' is not a page number"),
        ));
    }

    let page: u32 = raw.parse().map_err(|_| {
        PdfSpliceError::invalid_page_spec(spec, format!("page number {raw} is too large"))
    })?;

    if page == 0 {
        return Err(PdfSpliceError::invalid_page_spec(
            spec,
            "page numbers start at 1",
        ));
    }
    if page > MAX_PAGE_NUMBER {
        return Err(PdfSpliceError::invalid_page_spec(
            spec,
            format!("page number {page} is too large"),
        ));
    }

    Ok(page)
}

impl FromStr for PageSpec {
    type Err = PdfSpliceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PageSpec {
    /// Writes the compact canonical form, collapsing consecutive runs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.pages.iter().copied().peekable();
        let mut first = true;

        while let Some(start) = iter.next() {
            let mut end = start;
            while iter.peek() == Some(&(end + 1)) {
                end += 1;
                iter.next();
            }

            if !first {
                f.write_str(",")?;
            }
            first = false;

            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
        }

        Ok(())
    }
}

impl IntoIterator for PageSpec {
    type Item = u32;
    type IntoIter = std::collections::btree_set::IntoIter<u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

impl<'a> IntoIterator for &'a PageSpec {
    type Item = u32;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, u32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter().copied()
    }
}

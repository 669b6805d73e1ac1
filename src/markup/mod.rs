//! Markup extraction.
//!
//! This module provides:
//! - The `TableExtractor` seam: first HTML table -> (first cell, second cell) map
//! - A pattern-matching extractor (default) and an HTML-tree extractor
//! - Extraction of the client-side redirect target of the source page
//!
//! Callers only see `TableMap`; an empty map means "no table yet", never
//! "no entitlements".

mod redirect;
mod table;
mod tree;

use std::collections::BTreeMap;

pub use redirect::extract_redirect;
pub use table::{extract_table, strip_tags, PatternTableExtractor};
pub use tree::TreeTableExtractor;

/// Identifier -> expiry, as read from the first table of a page.
///
/// A repeated identifier keeps the value of its last row.
pub type TableMap = BTreeMap<String, String>;

/// Extracts the first table of an HTML document.
pub trait TableExtractor: Send + Sync {
    /// Returns one entry per row with at least two non-empty cells.
    fn extract_table(&self, html: &str) -> TableMap;
}

/// Inserts a row if both cells are non-empty after trimming.
pub(crate) fn insert_row(table: &mut TableMap, first: &str, second: &str) {
    let identifier = first.trim();
    let expiry = second.trim();
    if identifier.is_empty() || expiry.is_empty() {
        log::debug!("Skipping row with an empty cell");
        return;
    }
    table.insert(identifier.to_string(), expiry.to_string());
}

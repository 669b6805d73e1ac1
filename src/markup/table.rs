//! Pattern-matching table extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::{insert_row, TableExtractor, TableMap};
use crate::utils::compile_regex_unsafe;

const TABLE_PATTERN: &str = r"(?s)(<table.*?</table>)";
const ROW_PATTERN: &str = r"(?s)<tr.*?>(.*?)</tr>";
const CELL_PATTERN: &str = r"(?s)<td.*?>(.*?)</td>";
const TAG_PATTERN: &str = r"<[^>]*>";

static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(TABLE_PATTERN, "TABLE_RE"));
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(ROW_PATTERN, "ROW_RE"));
static CELL_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(CELL_PATTERN, "CELL_RE"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(TAG_PATTERN, "TAG_RE"));

/// Table extractor working directly on the markup text.
///
/// Takes the first non-greedy `<table>…</table>` block, each `<tr>` in it and
/// each `<td>` in a row. Entities are left as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternTableExtractor;

impl TableExtractor for PatternTableExtractor {
    fn extract_table(&self, html: &str) -> TableMap {
        extract_table(html)
    }
}

/// Removes every tag from `html`, keeping the text between them.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Extracts the first table of `html` with the pattern-matching extractor.
pub fn extract_table(html: &str) -> TableMap {
    let mut table = TableMap::new();

    let Some(block) = TABLE_RE.captures(html).and_then(|c| c.get(1)) else {
        log::debug!("No table found in {} bytes of markup", html.len());
        return table;
    };

    for row in ROW_RE.captures_iter(block.as_str()) {
        let Some(row_body) = row.get(1) else {
            continue;
        };
        let cells: Vec<String> = CELL_RE
            .captures_iter(row_body.as_str())
            .filter_map(|c| c.get(1).map(|m| strip_tags(m.as_str())))
            .collect();
        if cells.len() < 2 {
            continue;
        }
        insert_row(&mut table, &cells[0], &cells[1]);
    }

    table
}

//! HTML-tree table extraction built on `scraper`.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{insert_row, TableExtractor, TableMap};
use crate::utils::parse_selector_unsafe;

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("table", "TABLE_SELECTOR"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("tr", "ROW_SELECTOR"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("td", "CELL_SELECTOR"));

/// Table extractor that parses the document into a tree first.
///
/// Unlike `PatternTableExtractor` it decodes entities and tolerates
/// unterminated tables the way a browser would.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeTableExtractor;

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>()
}

impl TableExtractor for TreeTableExtractor {
    fn extract_table(&self, html: &str) -> TableMap {
        let mut table = TableMap::new();
        let document = Html::parse_document(html);

        let Some(first) = document.select(&TABLE_SELECTOR).next() else {
            return table;
        };

        for row in first.select(&ROW_SELECTOR) {
            let cells: Vec<String> = row.select(&CELL_SELECTOR).map(|c| cell_text(&c)).collect();
            if cells.len() < 2 {
                continue;
            }
            insert_row(&mut table, &cells[0], &cells[1]);
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_are_decoded() {
        let html = "<table><tr><td>A&amp;B</td><td>2999-01-01</td></tr></table>";
        let table = TreeTableExtractor.extract_table(html);
        assert_eq!(table.get("A&B").map(String::as_str), Some("2999-01-01"));
    }

    #[test]
    fn test_unterminated_table_is_recovered() {
        let html = "<table><tr><td>A</td><td>2999-01-01</td></tr>";
        let table = TreeTableExtractor.extract_table(html);
        assert_eq!(table.get("A").map(String::as_str), Some("2999-01-01"));
    }
}

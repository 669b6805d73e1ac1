//! Entitlement data model.

use std::collections::BTreeMap;

/// One authorized subject: an identifier and its unparsed expiry.
///
/// Immutable once constructed; neither field is ever empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementRecord {
    identifier: String,
    expiry_raw: String,
}

impl EntitlementRecord {
    /// Builds a record, or `None` if either field is empty.
    pub fn new(identifier: impl Into<String>, expiry_raw: impl Into<String>) -> Option<Self> {
        let identifier = identifier.into();
        let expiry_raw = expiry_raw.into();
        if identifier.is_empty() || expiry_raw.is_empty() {
            return None;
        }
        Some(EntitlementRecord {
            identifier,
            expiry_raw,
        })
    }

    /// Opaque key (serial or machine fingerprint).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Expiry exactly as extracted from the remote source.
    pub fn expiry_raw(&self) -> &str {
        &self.expiry_raw
    }
}

/// Records of one fetch, unique by identifier.
///
/// Built from the extractor's map, so a repeated identifier keeps the value
/// of its last row. Records are ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitlementSet {
    records: Vec<EntitlementRecord>,
}

impl EntitlementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materializes an extracted table, dropping entries with an empty side.
    pub fn from_table(table: BTreeMap<String, String>) -> Self {
        let records = table
            .into_iter()
            .filter_map(|(identifier, expiry)| EntitlementRecord::new(identifier, expiry))
            .collect();
        EntitlementSet { records }
    }

    pub fn find(&self, identifier: &str) -> Option<&EntitlementRecord> {
        self.records.iter().find(|r| r.identifier == identifier)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntitlementRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a EntitlementSet {
    type Item = &'a EntitlementRecord;
    type IntoIter = std::slice::Iter<'a, EntitlementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

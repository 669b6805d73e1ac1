//! Per-resolver snapshot of the last fetched entitlement set.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::EntitlementSet;

/// Lock-protected snapshot.
///
/// Readers get a shared handle to a whole set and writers swap the handle,
/// so a reader never sees a half-updated set. The lock only guards the
/// handle swap and is never held across a fetch.
#[derive(Debug, Default)]
pub struct EntitlementCache {
    snapshot: Mutex<Arc<EntitlementSet>>,
}

impl EntitlementCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Arc<EntitlementSet>> {
        // A panicking writer cannot leave a torn snapshot behind, so poisoning is ignored
        self.snapshot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current snapshot.
    pub fn read(&self) -> Arc<EntitlementSet> {
        Arc::clone(&self.lock())
    }

    /// Replaces the snapshot and returns the handle now stored.
    pub fn write(&self, set: EntitlementSet) -> Arc<EntitlementSet> {
        let snapshot = Arc::new(set);
        *self.lock() = Arc::clone(&snapshot);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::thread;

    fn set_of(entries: &[(&str, &str)]) -> EntitlementSet {
        let table: BTreeMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EntitlementSet::from_table(table)
    }

    #[test]
    fn test_starts_empty() {
        assert!(EntitlementCache::new().read().is_empty());
    }

    #[test]
    fn test_write_replaces_whole_set() {
        let cache = EntitlementCache::new();
        cache.write(set_of(&[("A", "2999-01-01"), ("B", "2999-01-01")]));
        cache.write(set_of(&[("C", "2999-01-01")]));

        let snapshot = cache.read();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.find("A").is_none());
        assert!(snapshot.find("C").is_some());
    }

    #[test]
    fn test_reader_keeps_its_snapshot_across_writes() {
        let cache = EntitlementCache::new();
        cache.write(set_of(&[("A", "2999-01-01")]));
        let before = cache.read();
        cache.write(set_of(&[("B", "2999-01-01")]));

        assert!(before.find("A").is_some());
        assert!(cache.read().find("B").is_some());
    }

    #[test]
    fn test_concurrent_readers_see_complete_sets() {
        let cache = Arc::new(EntitlementCache::new());
        let small = set_of(&[("A", "1")]);
        let large = set_of(&[("A", "1"), ("B", "2"), ("C", "3"), ("D", "4")]);

        let writer = {
            let cache = Arc::clone(&cache);
            let (small, large) = (small.clone(), large.clone());
            thread::spawn(move || {
                for i in 0..500 {
                    cache.write(if i % 2 == 0 { small.clone() } else { large.clone() });
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let len = cache.read().len();
                        assert!(len == 0 || len == 1 || len == 4, "torn snapshot of {}", len);
                    }
                })
            })
            .collect();

        writer.join().expect("writer");
        for reader in readers {
            reader.join().expect("reader");
        }
    }
}

//! Resolver statistics tracking.
//!
//! Thread-safe counters for resolver events, shared by every caller of one
//! resolver instance.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::ResolverEvent;

/// Thread-safe resolver statistics tracker.
///
/// Uses one atomic counter per `ResolverEvent`, all initialized to zero on
/// creation, so concurrent checks never contend on a lock to record events.
pub struct ResolverStats {
    events: HashMap<ResolverEvent, AtomicUsize>,
}

impl ResolverStats {
    pub fn new() -> Self {
        let mut events = HashMap::new();
        for event in ResolverEvent::iter() {
            events.insert(event, AtomicUsize::new(0));
        }
        ResolverStats { events }
    }

    /// Increment the counter for `event`.
    pub fn record(&self, event: ResolverEvent) {
        if let Some(counter) = self.events.get(&event) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to record {:?} which is not in the map. \
                 This indicates a bug in ResolverStats initialization.",
                event
            );
        }
    }

    /// Get the count for `event`.
    pub fn get(&self, event: ResolverEvent) -> usize {
        self.events
            .get(&event)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Snapshot of every non-zero counter, for a one-line summary log.
    pub fn summary(&self) -> Vec<(ResolverEvent, usize)> {
        ResolverEvent::iter()
            .map(|event| (event, self.get(event)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

impl Default for ResolverStats {
    fn default() -> Self {
        Self::new()
    }
}

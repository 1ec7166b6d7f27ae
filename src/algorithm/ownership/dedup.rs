//! Calf deduplication set
//!
//! Scoped to a single aggregation pass. Identities are only ever added, so
//! whichever representation of a calf is seen first is the one counted.

use rustc_hash::FxHashSet;

/// Calf identities already seen in the current pass
#[derive(Debug, Default)]
pub struct CalfDedupSet {
    seen: FxHashSet<String>,
}

impl CalfDedupSet {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the identity was already recorded
    #[must_use]
    pub fn has(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    /// Record an identity
    pub fn add(&mut self, identity: &str) {
        if !self.seen.contains(identity) {
            self.seen.insert(identity.to_string());
        }
    }

    /// Record an identity, returning `true` if it was not seen before
    pub fn add_if_new(&mut self, identity: &str) -> bool {
        if self.has(identity) {
            false
        } else {
            self.seen.insert(identity.to_string());
            true
        }
    }

    /// Number of identities recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing was recorded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

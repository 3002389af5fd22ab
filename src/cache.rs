use std::collections::HashMap;

use crate::dates::DigestDate;
use crate::digest::Digest;

/// Session-scoped store of previously fetched digests, keyed by date.
///
/// Unbounded and process-lifetime: the navigable date range is small, and a
/// revisited date must never cost a second network call.
#[derive(Debug, Default)]
pub struct DigestCache {
    entries: HashMap<DigestDate, Digest>,
}

impl DigestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: &DigestDate) -> Option<&Digest> {
        self.entries.get(date)
    }

    pub fn contains(&self, date: &DigestDate) -> bool {
        self.entries.contains_key(date)
    }

    pub fn insert(&mut self, date: DigestDate, digest: Digest) {
        self.entries.insert(date, digest);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

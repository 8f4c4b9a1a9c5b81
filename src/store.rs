//! Insertion-ordered store of captured resources keyed by fetch URL.

use crate::resource::CapturedResource;

/// Ordered `capture_key → CapturedResource` mapping.
///
/// Iteration follows capture (insertion) order; replacing an existing key
/// keeps its position. The pipeline relies on explicit ordering here rather
/// than on any incidental map behaviour.
#[derive(Debug, Default, Clone)]
pub struct ResourceStore {
    entries: Vec<CapturedResource>,
}

impl ResourceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a record exists for the given capture key.
    pub fn contains_key(&self, capture_key: &str) -> bool {
        self.get(capture_key).is_some()
    }

    /// Record for the given capture key, if present.
    pub fn get(&self, capture_key: &str) -> Option<&CapturedResource> {
        self.entries
            .iter()
            .find(|entry| entry.capture_key() == capture_key)
    }

    /// Insert a record under its capture key.
    ///
    /// An existing record with the same key is replaced in place, preserving
    /// its position in the iteration order; otherwise the record is appended.
    pub fn insert(&mut self, resource: CapturedResource) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.capture_key() == resource.capture_key())
        {
            Some(slot) => *slot = resource,
            None => self.entries.push(resource),
        }
    }

    /// Visit every record in insertion order, replacing those for which the
    /// closure returns a new record.
    ///
    /// Replacements must keep the capture key of the record they replace.
    pub fn update<F>(&mut self, mut replace: F)
    where
        F: FnMut(&CapturedResource) -> Option<CapturedResource>,
    {
        for slot in &mut self.entries {
            if let Some(updated) = replace(slot) {
                debug_assert_eq!(slot.capture_key(), updated.capture_key());
                *slot = updated;
            }
        }
    }

    /// Iterate records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CapturedResource> {
        self.entries.iter()
    }

    /// Iterate capture keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(CapturedResource::capture_key)
    }
}

impl FromIterator<CapturedResource> for ResourceStore {
    fn from_iter<I: IntoIterator<Item = CapturedResource>>(iter: I) -> Self {
        let mut store = Self::new();
        for resource in iter {
            store.insert(resource);
        }
        store
    }
}

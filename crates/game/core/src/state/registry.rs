//! Identifier → record maps, one per tracked entity kind.

use std::collections::BTreeMap;

use super::types::{EntityId, TrackedRecord};

/// Registry of live records of one kind.
///
/// # Invariants
///
/// - At most one record (and therefore one sprite) per identifier.
/// - Inserting an identifier that is already present replaces the record in
///   place; callers update existing records instead of inserting duplicates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registry<R> {
    records: BTreeMap<EntityId, R>,
}

impl<R> Default for Registry<R> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<R: TrackedRecord> Registry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under its own identifier, returning any record it replaced.
    pub fn insert(&mut self, record: R) -> Option<R> {
        self.records.insert(record.id().clone(), record)
    }

    pub fn get(&self, id: &EntityId) -> Option<&R> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut R> {
        self.records.get_mut(id)
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<R> {
        self.records.remove(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifiers in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut R> {
        self.records.values_mut()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CoinRecord, Position, SpriteKey};

    #[test]
    fn reinserting_an_identifier_replaces_the_record() {
        let mut registry = Registry::new();
        let id = EntityId::coin(1);
        registry.insert(CoinRecord::new(id.clone(), SpriteKey(1), Position::ORIGIN, 1));
        let replaced = registry.insert(CoinRecord::new(id.clone(), SpriteKey(1), Position::ORIGIN, 5));

        assert_eq!(registry.len(), 1);
        assert_eq!(replaced.map(|r| r.value), Some(1));
        assert_eq!(registry.get(&id).map(|r| r.value), Some(5));
    }
}

//! Natural-key lookup tables built while a document loads.

use std::collections::HashMap;

use crate::domain::NaturalKey;

/// Map from [`NaturalKey`] to an entity id.
///
/// Each load builds its own registries; nothing is shared between loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry<Id> {
    by_key: HashMap<NaturalKey, Id>,
}

impl<Id> Default for Registry<Id> {
    fn default() -> Self {
        Self {
            by_key: HashMap::new(),
        }
    }
}

impl<Id: Copy> Registry<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the id registered for a raw name or title.
    pub fn get(&self, raw: &str) -> Option<Id> {
        self.by_key.get(&NaturalKey::new(raw)).copied()
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.by_key.contains_key(&NaturalKey::new(raw))
    }

    /// Registers `id` under `raw`, keeping any earlier registration.
    ///
    /// # Errors
    ///
    /// Returns the id already registered under the same natural key.
    pub fn insert(&mut self, raw: &str, id: Id) -> Result<(), Id> {
        match self.by_key.entry(NaturalKey::new(raw)) {
            std::collections::hash_map::Entry::Occupied(existing) => Err(*existing.get()),
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_registration_wins() {
        let mut registry = Registry::new();
        assert_eq!(registry.insert("Ana", 0usize), Ok(()));
        assert_eq!(registry.insert(" ana ", 1usize), Err(0));
        assert_eq!(registry.get("ANA"), Some(0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_key() {
        let registry: Registry<usize> = Registry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.get("Ghost"), None);
        assert!(!registry.contains("Ghost"));
    }
}

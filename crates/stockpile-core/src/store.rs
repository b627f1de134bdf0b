//! Item store port and an in-memory implementation.

use crate::item::Item;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Persistent collection of items keyed by identifier.
///
/// Each call is a single-document operation; `save` replaces the whole
/// document, audit log included.
pub trait ItemStore: Send + Sync {
    /// Error raised by the underlying storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load one item, `None` if the identifier does not resolve.
    fn load(&self, id: &str) -> Result<Option<Item>, Self::Error>;

    /// Load every stored item, in no particular order.
    fn load_all(&self) -> Result<Vec<Item>, Self::Error>;

    /// Insert or replace an item.
    fn save(&self, item: &Item) -> Result<(), Self::Error>;

    /// Remove an item, returning whether it existed.
    fn remove(&self, id: &str) -> Result<bool, Self::Error>;
}

/// Items held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, Item>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes (saves and effective removals) performed so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn items(&self) -> MutexGuard<'_, HashMap<String, Item>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ItemStore for MemoryStore {
    type Error = Infallible;

    fn load(&self, id: &str) -> Result<Option<Item>, Self::Error> {
        Ok(self.items().get(id).cloned())
    }

    fn load_all(&self) -> Result<Vec<Item>, Self::Error> {
        Ok(self.items().values().cloned().collect())
    }

    fn save(&self, item: &Item) -> Result<(), Self::Error> {
        self.items().insert(item.id.clone(), item.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<bool, Self::Error> {
        let removed = self.items().remove(id).is_some();
        if removed {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{new_item_id, NewItem};
    use chrono::Utc;

    fn sample(name: &str) -> Item {
        let attrs = NewItem::new(name, 1.0).validate().unwrap();
        Item::from_attributes(new_item_id(), attrs, Utc::now())
    }

    #[test]
    fn test_save_load_remove() {
        let store = MemoryStore::new();
        let item = sample("Pen");

        store.save(&item).unwrap();
        assert_eq!(store.load(&item.id).unwrap(), Some(item.clone()));
        assert_eq!(store.load_all().unwrap().len(), 1);

        assert!(store.remove(&item.id).unwrap());
        assert!(store.load(&item.id).unwrap().is_none());
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_remove_missing_is_not_a_write() {
        let store = MemoryStore::new();
        assert!(!store.remove("itm_missing").unwrap());
        assert_eq!(store.writes(), 0);
    }
}

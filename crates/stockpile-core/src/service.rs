//! Item service: create, read, update and delete with audit recording.

use crate::analytics::{self, Analytics};
use crate::audit::{self, AuditEntry, DEFAULT_CHANGED_BY};
use crate::error::{CoreError, Result};
use crate::item::{new_item_id, Item, ItemUpdate, NewItem};
use crate::search::{self, ItemFilter, SearchOptions};
use crate::store::ItemStore;
use chrono::Utc;
use tracing::{debug, info};

/// Orchestrates item operations over an [`ItemStore`].
#[derive(Debug)]
pub struct ItemService<S> {
    store: S,
    changed_by: String,
    search: SearchOptions,
}

impl<S: ItemStore> ItemService<S> {
    /// Create a service with default audit identity and search tuning.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            changed_by: DEFAULT_CHANGED_BY.to_string(),
            search: SearchOptions::default(),
        }
    }

    /// Set the identity recorded on audit entries.
    #[must_use]
    pub fn with_changed_by(mut self, changed_by: impl Into<String>) -> Self {
        self.changed_by = changed_by.into();
        self
    }

    /// Set free-text search tuning.
    #[must_use]
    pub fn with_search_options(mut self, options: SearchOptions) -> Self {
        self.search = options;
        self
    }

    /// Get the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Create an item with a single `creation` audit entry.
    ///
    /// # Errors
    /// Returns `CoreError::Validation` if `name` or `price` is missing or malformed.
    pub fn create_item(&self, new_item: NewItem) -> Result<Item> {
        let attributes = new_item.validate()?;
        let now = Utc::now();

        let creation = AuditEntry::creation(&attributes, &self.changed_by, now)?;
        let mut item = Item::from_attributes(new_item_id(), attributes, now);
        item.audit_log.push(creation);

        self.store.save(&item).map_err(CoreError::store)?;

        info!(id = %item.id, name = %item.name, "Created item");

        self.reload(&item.id)
    }

    /// Get an item by identifier.
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if the identifier does not resolve.
    pub fn get_item(&self, id: &str) -> Result<Item> {
        self.store
            .load(id)
            .map_err(CoreError::store)?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }

    /// List all items, newest first.
    ///
    /// # Errors
    /// Returns `CoreError::Store` if the store cannot be read.
    pub fn list_items(&self) -> Result<Vec<Item>> {
        let mut items = self.store.load_all().map_err(CoreError::store)?;
        search::sort_newest_first(&mut items);
        Ok(items)
    }

    /// Apply a partial update and append an audit entry per changed attribute.
    ///
    /// The item is written exactly once, attributes and audit log together,
    /// then re-read so the caller sees what was actually stored. An update
    /// that changes nothing leaves `updated_at` and the audit log as they were.
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if the identifier does not resolve, or
    /// `CoreError::Validation` if a supplied attribute is malformed. Neither
    /// performs a write.
    pub fn update_item(&self, id: &str, update: &ItemUpdate) -> Result<Item> {
        let mut item = self.get_item(id)?;
        update.validate()?;

        let snapshot = item.attributes();
        let now = Utc::now();
        let changes = audit::compute_changes(&snapshot, update, &self.changed_by, now);

        item.apply(update);
        if !changes.is_empty() {
            item.updated_at = now;
        }

        let change_count = changes.len();
        item.audit_log.extend(changes);

        self.store.save(&item).map_err(CoreError::store)?;

        info!(id = %id, changes = change_count, "Updated item");

        self.reload(id)
    }

    /// Permanently remove an item and its audit log.
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if the identifier does not resolve.
    pub fn delete_item(&self, id: &str) -> Result<()> {
        if !self.store.remove(id).map_err(CoreError::store)? {
            return Err(CoreError::NotFound(id.to_string()));
        }

        info!(id = %id, "Deleted item");

        Ok(())
    }

    /// Get an item's audit log, oldest entry first.
    ///
    /// # Errors
    /// Returns `CoreError::NotFound` if the identifier does not resolve.
    pub fn audit_log(&self, id: &str) -> Result<Vec<AuditEntry>> {
        Ok(self.get_item(id)?.audit_log)
    }

    /// Free-text search over name, description, category and tags.
    ///
    /// # Errors
    /// Returns `CoreError::Store` if the store cannot be read.
    pub fn search(&self, query: &str) -> Result<Vec<Item>> {
        let items = self.store.load_all().map_err(CoreError::store)?;
        let results = search::search(items, query, &self.search);

        debug!(query = %query, results = results.len(), "Searched items");

        Ok(results)
    }

    /// Structured search, newest first.
    ///
    /// # Errors
    /// Returns `CoreError::Store` if the store cannot be read.
    pub fn advanced_search(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        let mut items = self.list_items()?;
        items.retain(|item| filter.matches(item));

        debug!(?filter, results = items.len(), "Filtered items");

        Ok(items)
    }

    /// Aggregate summary statistics over all items.
    ///
    /// # Errors
    /// Returns `CoreError::Store` if the store cannot be read.
    pub fn analytics(&self) -> Result<Analytics> {
        let items = self.list_items()?;
        Ok(analytics::analyze(&items))
    }

    fn reload(&self, id: &str) -> Result<Item> {
        self.get_item(id)
    }
}

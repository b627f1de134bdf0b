//! stockpile-core: Domain models and item service for inventory management.
//!
//! This crate provides:
//! - `Item`: The inventory item model with its append-only audit log
//! - `compute_changes`: Field-level change detection for partial updates
//! - `ItemStore`: The persistence port, plus an in-memory implementation
//! - `ItemService`: Create/read/update/delete, search and analytics

pub mod analytics;
pub mod audit;
pub mod error;
pub mod item;
pub mod search;
pub mod service;
pub mod store;

pub use analytics::{analyze, Analytics, CategoryCount, PriceRange, Summary};
pub use audit::{compute_changes, AuditEntry, AuditField, DEFAULT_CHANGED_BY, MUTABLE_FIELDS};
pub use error::{CoreError, Result};
pub use item::{
    is_valid_item_id, new_item_id, parse_tag_list, Item, ItemAttributes, ItemUpdate, NewItem,
};
pub use search::{ItemFilter, SearchOptions};
pub use service::ItemService;
pub use store::{ItemStore, MemoryStore};

//! CLI command implementations.

use crate::output::{self, ItemSummary, OutputFormat};
use anyhow::{bail, Context, Result};
use std::path::Path;
use stockpile_core::{ItemFilter, ItemService, ItemUpdate, MemoryStore, NewItem};
use stockpile_fs::{Workspace, WorkspaceConfig};
use tracing::debug;

fn open(path: &Path) -> Result<ItemService<Workspace>> {
    debug!(path = %path.display(), "Opening workspace");
    let ws = Workspace::open(path).context("Failed to open workspace")?;
    Ok(ws.into_service())
}

/// Initialize a new workspace.
pub fn init(path: &Path, name: Option<String>, format: OutputFormat) -> Result<()> {
    let config = name.map_or_else(WorkspaceConfig::default, WorkspaceConfig::new);
    let ws = Workspace::init_with(path, config).context("Failed to initialize workspace")?;
    output::print_success(
        &format!("Initialized workspace at {}", ws.root().display()),
        format,
    )
}

/// Create a new item.
pub fn add(path: &Path, new_item: NewItem, format: OutputFormat) -> Result<()> {
    let service = open(path)?;
    let item = service
        .create_item(new_item)
        .context("Failed to create item")?;
    output::print(&item, format)
}

/// List all items.
pub fn list(path: &Path, format: OutputFormat) -> Result<()> {
    let service = open(path)?;
    let items = service.list_items().context("Failed to list items")?;

    let summaries: Vec<ItemSummary> = items.iter().map(ItemSummary::from).collect();
    output::print_item_list(&summaries, format)
}

/// Show one item.
pub fn get(path: &Path, id: &str, format: OutputFormat) -> Result<()> {
    let service = open(path)?;
    let item = service.get_item(id).context("Failed to get item")?;
    output::print(&item, format)
}

/// Apply a partial update.
pub fn update(path: &Path, id: &str, update: &ItemUpdate, format: OutputFormat) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to update: pass at least one attribute flag");
    }

    let service = open(path)?;
    let before = service.get_item(id).context("Failed to get item")?;
    let item = service
        .update_item(id, update)
        .context("Failed to update item")?;

    if item.audit_log.len() == before.audit_log.len() {
        output::print_notice("No changes", format);
    }
    output::print(&item, format)
}

/// Delete an item.
pub fn delete(path: &Path, id: &str, format: OutputFormat) -> Result<()> {
    let service = open(path)?;
    service.delete_item(id).context("Failed to delete item")?;
    output::print_success(&format!("Deleted {id}"), format)
}

/// Show the audit log of an item.
pub fn audit(path: &Path, id: &str, format: OutputFormat) -> Result<()> {
    let service = open(path)?;
    let entries = service.audit_log(id).context("Failed to read audit log")?;
    output::print_list(&entries, format)
}

/// Free-text search.
pub fn search(path: &Path, query: &str, format: OutputFormat) -> Result<()> {
    let service = open(path)?;
    let items = service.search(query).context("Search failed")?;

    let summaries: Vec<ItemSummary> = items.iter().map(ItemSummary::from).collect();
    output::print_item_list(&summaries, format)
}

/// Structured search.
pub fn find(path: &Path, filter: &ItemFilter, format: OutputFormat) -> Result<()> {
    let service = open(path)?;
    let items = service
        .advanced_search(filter)
        .context("Advanced search failed")?;

    let summaries: Vec<ItemSummary> = items.iter().map(ItemSummary::from).collect();
    output::print_item_list(&summaries, format)
}

/// Show inventory statistics.
pub fn analytics(path: &Path, format: OutputFormat) -> Result<()> {
    let service = open(path)?;
    let analytics = service.analytics().context("Failed to compute analytics")?;
    output::print(&analytics, format)
}

/// Start the HTTP server.
pub fn serve(path: &Path, host: &str, port: u16, ephemeral: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    if ephemeral {
        let service = ItemService::new(MemoryStore::new());
        rt.block_on(async { stockpile_server::serve(service, host, port).await })
    } else {
        let service = open(path)?;
        rt.block_on(async { stockpile_server::serve(service, host, port).await })
    }
}

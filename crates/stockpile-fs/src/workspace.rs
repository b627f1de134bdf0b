//! Workspace management and item document storage.

use crate::config::WorkspaceConfig;
use crate::error::{FsError, Result};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use stockpile_core::{is_valid_item_id, Item, ItemService, ItemStore};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Directory name for stockpile configuration.
const STOCKPILE_DIR: &str = ".stockpile";
/// Configuration file name.
const CONFIG_FILE: &str = "config.yml";
/// Items directory name.
const ITEMS_DIR: &str = "items";
/// Extension of item documents.
const ITEM_EXT: &str = "json";

/// A workspace stores items as JSON documents on the filesystem.
#[derive(Debug)]
pub struct Workspace {
    /// Root path of the workspace.
    root: PathBuf,
    /// Workspace configuration.
    config: WorkspaceConfig,
}

impl Workspace {
    /// Initialize a new workspace at the given path with default configuration.
    ///
    /// # Errors
    /// Returns error if workspace already exists or IO fails.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        Self::init_with(path, WorkspaceConfig::default())
    }

    /// Initialize a new workspace with the given configuration.
    ///
    /// # Errors
    /// Returns error if workspace already exists or IO fails.
    pub fn init_with(path: impl AsRef<Path>, config: WorkspaceConfig) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let stockpile_dir = root.join(STOCKPILE_DIR);

        if stockpile_dir.exists() {
            return Err(FsError::WorkspaceExists(root));
        }

        fs::create_dir_all(&stockpile_dir)?;
        fs::create_dir_all(root.join(ITEMS_DIR))?;

        let config_content = serde_yaml::to_string(&config)?;
        fs::write(stockpile_dir.join(CONFIG_FILE), config_content)?;

        info!(path = %root.display(), "Initialized workspace");

        Ok(Self { root, config })
    }

    /// Open an existing workspace at the given path.
    ///
    /// # Errors
    /// Returns error if workspace doesn't exist or config is invalid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let config_path = root.join(STOCKPILE_DIR).join(CONFIG_FILE);

        if !config_path.exists() {
            return Err(FsError::WorkspaceNotFound(root));
        }

        let config_content = fs::read_to_string(&config_path)?;
        let config: WorkspaceConfig = serde_yaml::from_str(&config_content)?;

        debug!(path = %root.display(), "Opened workspace");

        Ok(Self { root, config })
    }

    /// Get the workspace root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the workspace configuration.
    #[must_use]
    pub const fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Wrap this workspace in an item service configured from `config.yml`.
    #[must_use]
    pub fn into_service(self) -> ItemService<Self> {
        let changed_by = self.config.audit.changed_by.clone();
        let search = self.config.search;
        ItemService::new(self)
            .with_changed_by(changed_by)
            .with_search_options(search)
    }

    /// Get the items directory path.
    fn items_dir(&self) -> PathBuf {
        self.root.join(ITEMS_DIR)
    }

    /// Path of an item's document, `None` for identifiers that are not well-formed.
    fn item_path(&self, id: &str) -> Option<PathBuf> {
        is_valid_item_id(id).then(|| self.items_dir().join(format!("{id}.{ITEM_EXT}")))
    }

    fn read_item(path: &Path) -> Result<Item> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ItemStore for Workspace {
    type Error = FsError;

    fn load(&self, id: &str) -> Result<Option<Item>> {
        let Some(path) = self.item_path(id) else {
            return Ok(None);
        };

        match Self::read_item(&path) {
            Ok(item) => Ok(Some(item)),
            Err(FsError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn load_all(&self) -> Result<Vec<Item>> {
        let items_dir = self.items_dir();
        if !items_dir.exists() {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();

        for entry in fs::read_dir(&items_dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != ITEM_EXT) {
                continue;
            }

            match Self::read_item(&path) {
                Ok(item) => items.push(item),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Failed to read item, skipping");
                }
            }
        }

        Ok(items)
    }

    fn save(&self, item: &Item) -> Result<()> {
        let path = self
            .item_path(&item.id)
            .ok_or_else(|| FsError::InvalidId(item.id.clone()))?;

        // Write beside the target and rename over it so readers never see a partial document.
        let mut tmp = NamedTempFile::new_in(self.items_dir())?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, item)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&path)?;

        debug!(id = %item.id, entries = item.audit_log.len(), "Wrote item document");

        Ok(())
    }

    fn remove(&self, id: &str) -> Result<bool> {
        let Some(path) = self.item_path(id) else {
            return Ok(false);
        };

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(id = %id, "Removed item document");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

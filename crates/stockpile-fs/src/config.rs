//! Workspace configuration.

use serde::{Deserialize, Serialize};
use stockpile_core::{SearchOptions, DEFAULT_CHANGED_BY};

/// Workspace configuration stored in `.stockpile/config.yml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace settings.
    #[serde(default)]
    pub workspace: WorkspaceSettings,

    /// Audit log settings.
    #[serde(default)]
    pub audit: AuditSettings,

    /// Free-text search tuning.
    #[serde(default)]
    pub search: SearchOptions,
}

const fn default_version() -> u32 {
    1
}

/// Workspace-level settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Workspace name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Audit log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSettings {
    /// Identity recorded on every audit entry.
    #[serde(default = "default_changed_by")]
    pub changed_by: String,
}

fn default_changed_by() -> String {
    DEFAULT_CHANGED_BY.to_string()
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            changed_by: default_changed_by(),
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            workspace: WorkspaceSettings::default(),
            audit: AuditSettings::default(),
            search: SearchOptions::default(),
        }
    }
}

impl WorkspaceConfig {
    /// Create a new config with the given workspace name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            workspace: WorkspaceSettings {
                name: Some(name.into()),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: WorkspaceConfig = serde_yaml::from_str("search:\n  limit: 10\n").unwrap();

        assert_eq!(config.version, 1);
        assert_eq!(config.audit.changed_by, "admin");
        assert_eq!(config.search.limit, 10);
        assert_eq!(config.search.max_edits, 1);
    }
}

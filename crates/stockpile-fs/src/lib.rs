//! Filesystem backend for stockpile inventory storage.
//!
//! A workspace directory holds:
//! - `.stockpile/config.yml`: Workspace configuration
//! - `items/<id>.json`: One document per item, audit log included

pub mod config;
pub mod error;
pub mod workspace;

pub use config::WorkspaceConfig;
pub use error::{FsError, Result};
pub use workspace::Workspace;

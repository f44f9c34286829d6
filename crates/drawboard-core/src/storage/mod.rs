//! Persistence collaborators: workspace element storage and binary assets.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::{MemoryAssetStore, MemoryWorkspaceStore};

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileWorkspaceStore;

use crate::elements::Element;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Where a workspace's elements live between sessions.
///
/// The editor loads once when a workspace is attached and saves the whole
/// element sequence after every committed change.
pub trait WorkspaceStore: Send + Sync {
    /// Load a workspace. Unknown workspaces yield `StorageError::NotFound`.
    fn load_workspace_data(&self, workspace_id: &str) -> StorageResult<Vec<Element>>;

    /// Replace a workspace's stored elements.
    fn save_workspace_data(&self, workspace_id: &str, elements: &[Element]) -> StorageResult<()>;
}

/// Blob storage for images and stickers. Elements only keep the returned id.
pub trait AssetStore: Send + Sync {
    /// Store `bytes` and return the id to reference them by.
    fn save_asset(&self, bytes: &[u8]) -> StorageResult<String>;

    fn load_asset(&self, asset_id: &str) -> StorageResult<Vec<u8>>;
}

//! In-memory stores for tests and ephemeral sessions.

use super::{AssetStore, StorageError, StorageResult, WorkspaceStore};
use crate::elements::Element;
use std::collections::HashMap;
use std::sync::RwLock;

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

/// Workspaces kept in a map.
#[derive(Default)]
pub struct MemoryWorkspaceStore {
    workspaces: RwLock<HashMap<String, Vec<Element>>>,
}

impl MemoryWorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored workspaces.
    pub fn len(&self) -> usize {
        self.workspaces.read().map(|w| w.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WorkspaceStore for MemoryWorkspaceStore {
    fn load_workspace_data(&self, workspace_id: &str) -> StorageResult<Vec<Element>> {
        let workspaces = self.workspaces.read().map_err(lock_error)?;
        workspaces
            .get(workspace_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(workspace_id.to_string()))
    }

    fn save_workspace_data(&self, workspace_id: &str, elements: &[Element]) -> StorageResult<()> {
        let mut workspaces = self.workspaces.write().map_err(lock_error)?;
        workspaces.insert(workspace_id.to_string(), elements.to_vec());
        Ok(())
    }
}

/// Assets keyed by generated uuid.
#[derive(Default)]
pub struct MemoryAssetStore {
    assets: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetStore for MemoryAssetStore {
    fn save_asset(&self, bytes: &[u8]) -> StorageResult<String> {
        if bytes.is_empty() {
            return Err(StorageError::Other("Refusing to store an empty asset".to_string()));
        }
        let id = uuid::Uuid::new_v4().to_string();
        let mut assets = self.assets.write().map_err(lock_error)?;
        assets.insert(id.clone(), bytes.to_vec());
        Ok(id)
    }

    fn load_asset(&self, asset_id: &str) -> StorageResult<Vec<u8>> {
        let assets = self.assets.read().map_err(lock_error)?;
        assets
            .get(asset_id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(asset_id.to_string()))
    }
}

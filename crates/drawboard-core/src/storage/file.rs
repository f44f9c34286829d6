//! Workspace storage as JSON files, for native platforms.

use super::{StorageError, StorageResult, WorkspaceStore};
use crate::elements::Element;
use std::fs;
use std::path::{Path, PathBuf};

/// One `<workspace>.json` file per workspace under a base directory.
pub struct FileWorkspaceStore {
    base_path: PathBuf,
}

impl FileWorkspaceStore {
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// `<data dir>/drawboard/workspaces/`.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("drawboard").join("workspaces"))
    }

    fn workspace_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl WorkspaceStore for FileWorkspaceStore {
    fn load_workspace_data(&self, workspace_id: &str) -> StorageResult<Vec<Element>> {
        let path = self.workspace_path(workspace_id);
        if !path.exists() {
            return Err(StorageError::NotFound(workspace_id.to_string()));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn save_workspace_data(&self, workspace_id: &str, elements: &[Element]) -> StorageResult<()> {
        let path = self.workspace_path(workspace_id);
        let json = serde_json::to_string(elements)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{LinearElement, ShapeElement};
    use kurbo::{Point, Rect};
    use tempfile::tempdir;

    #[test]
    fn test_file_store_save_load() {
        let dir = tempdir().unwrap();
        let store = FileWorkspaceStore::new(dir.path().to_path_buf()).unwrap();
        let elements = vec![
            Element::Circle(ShapeElement::new(Rect::new(0.0, 0.0, 4.0, 4.0))),
            Element::Arrow(LinearElement::arrow(Point::ZERO, Point::new(3.0, 4.0))),
        ];

        store.save_workspace_data("board-1", &elements).unwrap();
        assert_eq!(store.load_workspace_data("board-1").unwrap(), elements);
    }

    #[test]
    fn test_file_store_not_found() {
        let dir = tempdir().unwrap();
        let store = FileWorkspaceStore::new(dir.path().to_path_buf()).unwrap();
        assert!(matches!(
            store.load_workspace_data("nonexistent"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_file_store_sanitizes_id() {
        let dir = tempdir().unwrap();
        let store = FileWorkspaceStore::new(dir.path().to_path_buf()).unwrap();
        store.save_workspace_data("team/board:1", &[]).unwrap();
        assert!(dir.path().join("team_board_1.json").exists());
        assert!(store.load_workspace_data("team/board:1").unwrap().is_empty());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempdir().unwrap();
        let store = FileWorkspaceStore::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join("bad.json"), "{").unwrap();
        assert!(matches!(
            store.load_workspace_data("bad"),
            Err(StorageError::Serialization(_))
        ));
    }
}

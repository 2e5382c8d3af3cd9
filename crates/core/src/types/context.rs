use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Snapshot of the editor state at the moment of a resolution call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceContext {
    /// Workspace root folders, in the order the host reports them
    pub workspace_folders: Vec<PathBuf>,

    /// File currently being edited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_file: Option<PathBuf>,

    /// Explicitly configured project root (highest priority)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explicit_root: Option<PathBuf>,
}

impl WorkspaceContext {
    pub fn new(workspace_folders: Vec<PathBuf>) -> Self {
        Self {
            workspace_folders,
            active_file: None,
            explicit_root: None,
        }
    }

    pub fn with_active_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.active_file = Some(file.into());
        self
    }

    pub fn with_explicit_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.explicit_root = Some(root.into());
        self
    }

    /// Directory of the active file, if any
    pub fn active_dir(&self) -> Option<&Path> {
        self.active_file.as_deref().and_then(|f| f.parent())
    }

    /// Workspace folder that contains the active file
    pub fn folder_of_active_file(&self) -> Option<&Path> {
        let active = self.active_file.as_deref()?;
        self.workspace_folders
            .iter()
            .filter(|folder| active.starts_with(folder))
            .max_by_key(|folder| folder.components().count())
            .map(|folder| folder.as_path())
    }
}

//! UI state - everything the views need that is not document data

use std::collections::HashSet;

use crate::markdown::ViewMode;

/// Presentation state owned by the model
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Latest status line, consumed by the view
    pub status: Option<String>,
    /// Relative paths of expanded folders. Never persisted.
    pub expanded: HashSet<String>,
    pub view_mode: ViewMode,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Take the pending status message, leaving none
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    /// Flip a folder's expansion, returning the new state
    pub fn toggle_folder(&mut self, path: &str) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.to_string());
            true
        }
    }

    /// Forget expanded folders that no longer exist
    pub fn prune_expanded(&mut self, folders: &HashSet<String>) {
        self.expanded.retain(|path| folders.contains(path));
    }
}

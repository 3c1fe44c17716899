//! Request/response surface over the vault
//!
//! A synchronous counterpart to the message-driven app, for embedding in a
//! front end that wants one call per operation. Every failure is logged and
//! reported as `None` or `false`; callers never see error details.

use std::path::{Path, PathBuf};

use crate::dialogs::{Dialogs, NoDialogs};
use crate::gateway::{self, DocumentTarget, GatewayError};
use crate::markdown;
use crate::model::tree::{self, TreeNode};
use crate::model::Session;

/// A markdown file opened through the file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    pub path: PathBuf,
    pub content: String,
    pub name: String,
}

/// Vault operations with sentinel results
#[derive(Debug)]
pub struct NotesApi<D: Dialogs = NoDialogs> {
    session: Session,
    dialogs: D,
}

impl Default for NotesApi<NoDialogs> {
    fn default() -> Self {
        Self::new(NoDialogs)
    }
}

impl<D: Dialogs> NotesApi<D> {
    pub fn new(dialogs: D) -> Self {
        Self {
            session: Session::new(),
            dialogs,
        }
    }

    /// Open `root` as the vault without asking
    pub fn with_vault(root: impl Into<PathBuf>, dialogs: D) -> Self {
        let mut api = Self::new(dialogs);
        api.session.open_vault(root.into());
        api
    }

    /// Ask for a folder and make it the vault. `None` if cancelled.
    pub fn select_folder(&mut self) -> Option<PathBuf> {
        let folder = self.dialogs.pick_folder()?;
        tracing::info!(root = %folder.display(), "vault selected");
        self.session.open_vault(folder.clone());
        Some(folder)
    }

    /// Scan the vault. `None` when no vault is open; an unreadable vault
    /// gives an empty list.
    pub fn get_files(&self) -> Option<Vec<TreeNode>> {
        let root = self.session.vault_root()?;
        match tree::scan(root) {
            Ok(tree) => Some(tree.roots),
            Err(e) => {
                tracing::warn!(error = %e, "vault scan failed");
                Some(Vec::new())
            }
        }
    }

    pub fn read_file(&self, relative: &str) -> Option<String> {
        self.vault_path(relative)
            .and_then(|path| gateway::read(&path))
            .map_err(|e| log_failure("read", relative, &e))
            .ok()
    }

    pub fn save_file(&self, relative: &str, content: &str) -> bool {
        self.vault_path(relative)
            .and_then(|path| gateway::write(&path, content))
            .map_err(|e| log_failure("save", relative, &e))
            .is_ok()
    }

    /// Create an empty document. Succeeds without touching an existing one.
    pub fn create_file(&self, relative: &str) -> bool {
        self.vault_path(relative)
            .and_then(|path| gateway::create(&path))
            .map_err(|e| log_failure("create", relative, &e))
            .is_ok()
    }

    pub fn delete_file(&self, relative: &str) -> bool {
        self.vault_path(relative)
            .and_then(|path| gateway::delete(&path))
            .map_err(|e| log_failure("delete", relative, &e))
            .is_ok()
    }

    pub fn get_vault_path(&self) -> Option<&Path> {
        self.session.vault_root()
    }

    /// Ask for a markdown file and read it. `None` if cancelled or unreadable.
    pub fn open_file(&mut self) -> Option<OpenedFile> {
        let path = self.dialogs.pick_markdown_file()?;
        let content = match gateway::read(&path) {
            Ok(content) => content,
            Err(e) => {
                log_failure("open", &path.display().to_string(), &e);
                return None;
            }
        };
        let target = DocumentTarget::External(path.clone());
        let name = target.file_name();
        self.session.open_document(target, content.clone());
        Some(OpenedFile {
            path,
            content,
            name,
        })
    }

    pub fn save_external_file(&self, path: &Path, content: &str) -> bool {
        gateway::write(path, content)
            .map_err(|e| log_failure("save", &path.display().to_string(), &e))
            .is_ok()
    }

    pub fn parse_markdown(&self, text: &str) -> String {
        markdown::render(text)
    }

    fn vault_path(&self, relative: &str) -> Result<PathBuf, GatewayError> {
        self.session.resolve(&DocumentTarget::Vault(relative.to_string()))
    }
}

fn log_failure(operation: &str, path: &str, error: &GatewayError) {
    tracing::warn!(operation, path, error = %error, "document operation failed");
}

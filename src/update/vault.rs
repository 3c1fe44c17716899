//! Vault message handlers (opening, tree browsing, file management)

use std::path::PathBuf;

use crate::commands::Cmd;
use crate::gateway::{self, DocumentTarget};
use crate::messages::VaultMsg;
use crate::model::{AppModel, LeaveAction, VaultTree};

use super::document::{release_document, Release};

/// Handle vault messages
pub fn update_vault(model: &mut AppModel, msg: VaultMsg) -> Option<Cmd> {
    match msg {
        VaultMsg::OpenVault(path) => open_vault(model, path),

        VaultMsg::Refresh => match model.session.vault_root() {
            Some(root) => Some(Cmd::ScanVault {
                root: root.to_path_buf(),
            }),
            None => {
                model.ui.set_status("No vault open");
                None
            }
        },

        VaultMsg::ToggleFolder(path) => {
            if model.tree.is_folder(&path) {
                let expanded = model.ui.toggle_folder(&path);
                tracing::trace!(folder = %path, expanded, "folder toggled");
            } else {
                tracing::debug!(path = %path, "toggle ignored, not a folder");
                model.ui.set_status(format!("Not a folder: {}", path));
            }
            None
        }

        VaultMsg::CreateDocument(relative) => {
            let (relative, path) = match vault_document(model, &relative, true) {
                Some(resolved) => resolved,
                None => return None,
            };
            Some(Cmd::CreateDocument { relative, path })
        }

        VaultMsg::DeleteDocument(relative) => {
            let (relative, path) = match vault_document(model, &relative, false) {
                Some(resolved) => resolved,
                None => return None,
            };
            Some(Cmd::DeleteDocument { relative, path })
        }

        VaultMsg::ShowOpenFolderDialog => Some(Cmd::ShowOpenFolderDialog),
    }
}

fn open_vault(model: &mut AppModel, path: PathBuf) -> Option<Cmd> {
    let root = path.canonicalize().unwrap_or(path);
    model.pending_load = None;

    // The outgoing buffer is flushed against the old root before switching
    match release_document(model, &LeaveAction::OpenVault(root.clone())) {
        Release::Ready => enter_vault(model, root),
        Release::Saving(cmd) => {
            tracing::debug!(root = %root.display(), "vault switch waits for flush");
            Some(cmd)
        }
        Release::Blocked => None,
    }
}

/// Make `root` the open vault and start scanning it
pub(super) fn enter_vault(model: &mut AppModel, root: PathBuf) -> Option<Cmd> {
    model.session.open_vault(root.clone());
    model.pending_load = None;
    model.pending_leave = None;
    model.autosave.cancel();
    model.tree = VaultTree::default();
    model.preview.clear();
    model.ui.expanded.clear();

    tracing::info!(root = %root.display(), "vault opened");
    model.ui.set_status(format!("Opened vault {}", root.display()));

    Some(Cmd::ScanVault { root })
}

/// Validate a vault-relative path for create/delete and resolve it.
/// Reports problems through the status line.
fn vault_document(
    model: &mut AppModel,
    relative: &str,
    add_extension: bool,
) -> Option<(String, PathBuf)> {
    if model.session.vault_root().is_none() {
        model.ui.set_status("No vault open");
        return None;
    }

    let normalized = match gateway::normalize_relative(relative) {
        Ok(rel) if add_extension => gateway::ensure_markdown_extension(&rel),
        Ok(rel) => rel,
        Err(e) => {
            tracing::warn!(path = %relative, error = %e, "rejected document path");
            model.ui.set_status(e.to_string());
            return None;
        }
    };

    match model
        .session
        .resolve(&DocumentTarget::Vault(normalized.clone()))
    {
        Ok(path) => Some((normalized, path)),
        Err(e) => {
            model.ui.set_status(e.to_string());
            None
        }
    }
}

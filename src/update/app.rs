//! App message handlers (async results, timers)

use crate::commands::Cmd;
use crate::gateway::DocumentTarget;
use crate::messages::{AppMsg, DocumentMsg, VaultMsg};
use crate::model::{AppModel, LeaveAction, VaultTree};

use super::document::{
    close_active, commit_load, release_document, snapshot_save, update_document, Release,
};
use super::vault::{enter_vault, update_vault};

/// Handle app messages (async results, timers)
pub fn update_app(model: &mut AppModel, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::VaultScanned { root, result } => {
            if model.session.vault_root() != Some(root.as_path()) {
                tracing::debug!(root = %root.display(), "dropping scan of a vault no longer open");
                return None;
            }
            match result {
                Ok(tree) => {
                    model.ui.prune_expanded(&tree.folder_paths());
                    tracing::info!(
                        root = %root.display(),
                        documents = tree.document_paths().len(),
                        "vault scanned"
                    );
                    model.tree = tree;
                }
                Err(e) => {
                    tracing::warn!(root = %root.display(), error = %e, "vault scan failed");
                    model.tree = VaultTree::default();
                    model.ui.expanded.clear();
                    model.ui.set_status(format!("Cannot read vault: {}", e));
                }
            }
            None
        }

        AppMsg::DocumentLoaded {
            request_id,
            target,
            result,
        } => {
            let pending = match model.pending_load {
                Some(pending) if pending.id == request_id => pending,
                _ => {
                    tracing::debug!(request = request_id, document = %target, "dropping stale load");
                    return None;
                }
            };
            model.pending_load = None;

            match result {
                Ok(content) => commit_load(model, pending, target, content),
                Err(e) => {
                    tracing::warn!(document = %target, error = %e, "load failed");
                    model.ui.set_status(format!("Cannot open {}: {}", target, e));
                    None
                }
            }
        }

        AppMsg::SaveCompleted {
            target,
            revision,
            result,
        } => match result {
            Ok(()) => {
                if model.session.mark_saved(&target, revision) {
                    model.ui.set_status(format!("Saved {}", target.file_name()));
                }
                tracing::debug!(document = %target, revision, "save completed");
                resume_leave(model, &target)
            }
            Err(e) => {
                tracing::warn!(document = %target, error = %e, "save failed");
                if model
                    .pending_leave
                    .as_ref()
                    .is_some_and(|leave| leave.target == target)
                {
                    model.pending_leave = None;
                    model.ui.set_status(format!(
                        "Save failed: {}. {} kept open",
                        e,
                        target.file_name()
                    ));
                } else {
                    model.ui.set_status(format!("Save failed: {}", e));
                }
                None
            }
        },

        AppMsg::DocumentCreated { path, result } => {
            match result {
                Ok(true) => model.ui.set_status(format!("Created {}", path)),
                Ok(false) => model.ui.set_status(format!("{} already exists", path)),
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "create failed");
                    model.ui.set_status(format!("Cannot create {}: {}", path, e));
                    return None;
                }
            }
            update_vault(model, VaultMsg::Refresh)
        }

        AppMsg::DocumentDeleted { path, result } => {
            if let Err(e) = result {
                tracing::warn!(path = %path, error = %e, "delete failed");
                model.ui.set_status(format!("Cannot delete {}: {}", path, e));
                return None;
            }

            if model.session.active_vault_path() == Some(path.as_str()) {
                model.autosave.cancel();
                close_active(model);
            }
            model.ui.set_status(format!("Deleted {}", path));
            update_vault(model, VaultMsg::Refresh)
        }

        AppMsg::OpenFolderDialogResult { folder } => match folder {
            Some(folder) => update_vault(model, VaultMsg::OpenVault(folder)),
            None => {
                tracing::debug!("open folder dialog cancelled");
                None
            }
        },

        AppMsg::OpenFileDialogResult { file } => match file {
            Some(file) => update_document(model, DocumentMsg::OpenExternal(file)),
            None => {
                tracing::debug!("open file dialog cancelled");
                None
            }
        },

        AppMsg::Tick(now) => {
            let fired = model.autosave.poll(now)?;
            if !model.session.is_active(&fired.target) || !model.session.is_dirty() {
                tracing::debug!(document = %fired.target, "autosave dropped");
                return None;
            }
            tracing::debug!(document = %fired.target, revision = model.session.revision(), "autosave fired");
            snapshot_save(model).map(Cmd::SaveDocument)
        }

        AppMsg::Flush => {
            model.autosave.cancel();
            if !model.session.is_dirty() {
                return None;
            }
            snapshot_save(model).map(Cmd::SaveDocument)
        }
    }
}

/// Carry out a close or vault switch that was waiting for `target` to be
/// written. Edits made while the flush was running are flushed first.
fn resume_leave(model: &mut AppModel, target: &DocumentTarget) -> Option<Cmd> {
    let leave = model.pending_leave.as_ref()?;
    if &leave.target != target
        || !model.session.is_active(target)
        || !model.session.is_saved(leave.revision)
    {
        return None;
    }
    let leave = model.pending_leave.take()?;

    match release_document(model, &leave.action) {
        Release::Ready => match leave.action {
            LeaveAction::Close => {
                close_active(model);
                None
            }
            LeaveAction::OpenVault(root) => enter_vault(model, root),
        },
        Release::Saving(cmd) => Some(cmd),
        Release::Blocked => None,
    }
}

//! Document message handlers (selection, editing, saving)

use std::path::PathBuf;
use std::time::Instant;

use crate::commands::{Cmd, LoadRequest, SaveRequest};
use crate::config::SwitchPolicy;
use crate::gateway::{DocumentTarget, GatewayError};
use crate::messages::DocumentMsg;
use crate::model::{AppModel, LeaveAction, PendingLeave, PendingLoad};

/// Handle document messages
pub fn update_document(model: &mut AppModel, msg: DocumentMsg) -> Option<Cmd> {
    match msg {
        DocumentMsg::SelectVaultDocument(relative) => {
            if model.session.vault_root().is_none() {
                tracing::warn!(path = %relative, "selection with no vault open");
                model.ui.set_status(GatewayError::NoVaultOpen.to_string());
                return None;
            }
            let target = match DocumentTarget::vault(&relative) {
                Ok(target) => target,
                Err(e) => {
                    model.ui.set_status(e.to_string());
                    return None;
                }
            };
            if let Some(rel) = target.vault_path() {
                if model.tree.is_folder(rel) {
                    model.ui.set_status(format!("{} is a folder", rel));
                    return None;
                }
            }
            begin_load(model, target)
        }

        DocumentMsg::OpenExternal(path) => {
            let path = path.canonicalize().unwrap_or(path);
            begin_load(model, DocumentTarget::External(path))
        }

        DocumentMsg::Edit(text) => {
            let Some(target) = model.session.active().cloned() else {
                tracing::debug!("edit ignored, no document open");
                return None;
            };
            let revision = model.session.set_buffer(text)?;
            model.preview.refresh(model.session.buffer(), revision);
            model.autosave.arm(target, revision, Instant::now());
            None
        }

        DocumentMsg::Save => {
            if !model.session.has_document() {
                model.ui.set_status("No document open");
                return None;
            }
            model.autosave.cancel();
            snapshot_save(model).map(Cmd::SaveDocument)
        }

        DocumentMsg::Close => {
            if !model.session.has_document() {
                return None;
            }
            model.pending_load = None;
            match release_document(model, &LeaveAction::Close) {
                Release::Ready => {
                    close_active(model);
                    None
                }
                Release::Saving(cmd) => Some(cmd),
                Release::Blocked => None,
            }
        }

        DocumentMsg::ShowOpenFileDialog => Some(Cmd::ShowOpenFileDialog),

        DocumentMsg::CycleViewMode => {
            model.ui.view_mode = model.ui.view_mode.next();
            model.ui.set_status(format!("View: {}", model.ui.view_mode.label()));
            None
        }
    }
}

/// Request a load of `target`, writing the outgoing buffer first when the
/// flush policy applies. The switch itself happens when the load result
/// arrives (see `commit_load`).
pub(super) fn begin_load(model: &mut AppModel, target: DocumentTarget) -> Option<Cmd> {
    // A new selection supersedes a close or vault switch still waiting on its flush
    model.pending_leave = None;

    if model.session.is_active(&target) {
        // Last selection wins, even if it points back at the open document
        model.pending_load = None;
        tracing::debug!(document = %target, "already open");
        return None;
    }

    let path = match model.session.resolve(&target) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(document = %target, error = %e, "cannot resolve document");
            model.ui.set_status(e.to_string());
            return None;
        }
    };

    let id = model.issue_request_id();
    let load = LoadRequest { id, target, path };

    let flush = if model.session.is_dirty() && model.config.switch_policy == SwitchPolicy::Flush {
        // Unsavable edits keep the current document open
        Some(snapshot_save(model)?)
    } else {
        None
    };

    model.pending_load = Some(PendingLoad {
        id,
        flushed_revision: flush.as_ref().map(|save| save.revision),
    });

    tracing::debug!(request = id, document = %load.target, "load requested");
    match flush {
        Some(save) => {
            model.autosave.cancel();
            Some(Cmd::FlushAndLoad { save, load })
        }
        None => Some(Cmd::LoadDocument(load)),
    }
}

/// Make a loaded document active. `pending` is the request it answers.
///
/// The switch is refused when the flush written ahead of the load did not
/// reach the disk, so the outgoing edits stay in the buffer.
pub(super) fn commit_load(
    model: &mut AppModel,
    pending: PendingLoad,
    target: DocumentTarget,
    content: String,
) -> Option<Cmd> {
    if let Some(flushed) = pending.flushed_revision {
        if !model.session.is_saved(flushed) {
            let name = active_name(model);
            tracing::warn!(document = %name, next = %target, "flush failed, switch cancelled");
            model.ui.set_status(format!(
                "Kept {} open: its changes could not be saved",
                name
            ));
            return None;
        }
    }

    if model.session.is_dirty() {
        match model.config.switch_policy {
            // Edited while the load was in flight: write again, then reload
            SwitchPolicy::Flush => return begin_load(model, target),
            SwitchPolicy::Discard => discard_changes(model),
        }
    }

    model.autosave.cancel();
    tracing::info!(document = %target, bytes = content.len(), "document opened");
    model.session.open_document(target, content);
    model
        .preview
        .refresh(model.session.buffer(), model.session.revision());
    None
}

/// Outcome of asking to drop the active buffer
pub(super) enum Release {
    /// Nothing unsaved is lost by dropping it now
    Ready,
    /// A flush was started and the drop waits for its result
    Saving(Cmd),
    /// The buffer cannot be written and stays open
    Blocked,
}

/// Decide what happens to the active buffer before it is dropped.
///
/// Under [`SwitchPolicy::Flush`] a dirty buffer is saved first and `action`
/// is recorded as a [`PendingLeave`], carried out when the write succeeds.
/// Under [`SwitchPolicy::Discard`] the edits are dropped with a warning.
/// Any pending autosave is cancelled either way.
pub(super) fn release_document(model: &mut AppModel, action: &LeaveAction) -> Release {
    model.autosave.cancel();
    if !model.session.is_dirty() {
        return Release::Ready;
    }

    match model.config.switch_policy {
        SwitchPolicy::Flush => match snapshot_save(model) {
            Some(save) => {
                model.pending_leave = Some(PendingLeave {
                    target: save.target.clone(),
                    revision: save.revision,
                    action: action.clone(),
                });
                Release::Saving(Cmd::SaveDocument(save))
            }
            None => Release::Blocked,
        },
        SwitchPolicy::Discard => {
            discard_changes(model);
            Release::Ready
        }
    }
}

/// Drop the active document and its preview
pub(super) fn close_active(model: &mut AppModel) {
    if let Some(target) = model.session.active() {
        tracing::info!(document = %target, "document closed");
    }
    model.pending_leave = None;
    model.session.close_document();
    model.preview.clear();
}

fn discard_changes(model: &mut AppModel) {
    let name = active_name(model);
    tracing::warn!(document = %name, "discarding unsaved changes");
    model
        .ui
        .set_status(format!("Discarded unsaved changes to {}", name));
}

fn active_name(model: &AppModel) -> String {
    model
        .session
        .active()
        .map(DocumentTarget::file_name)
        .unwrap_or_default()
}

/// Copy the buffer into a write of the active document
pub(super) fn snapshot_save(model: &mut AppModel) -> Option<SaveRequest> {
    let target = model.session.active()?.clone();
    let path: PathBuf = match model.session.resolve(&target) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(document = %target, error = %e, "cannot resolve save target");
            model.ui.set_status(e.to_string());
            return None;
        }
    };

    Some(SaveRequest {
        target,
        path,
        content: model.session.buffer().to_string(),
        revision: model.session.revision(),
    })
}

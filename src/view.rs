//! Text rendering of the model for the terminal shell

use std::fmt::Write as _;
use std::time::Instant;

use crate::model::{AppModel, NodeKind, SessionState};

/// Indentation per tree level
pub const INDENT: &str = "  ";

/// The visible part of the vault tree, one row per line.
///
/// Folders show `+` when collapsed and `-` when expanded; the active
/// document is marked with `>`.
pub fn render_tree(model: &AppModel) -> String {
    if model.session.vault_root().is_none() {
        return "(no vault open)\n".to_string();
    }
    if model.tree.is_empty() {
        return "(empty vault)\n".to_string();
    }

    let active = model.session.active_vault_path();
    let mut out = String::new();
    for (node, depth) in model.tree.visible_rows(&model.ui.expanded) {
        let indent = INDENT.repeat(depth);
        match node.kind {
            NodeKind::Folder => {
                let marker = if model.ui.is_expanded(&node.path) { '-' } else { '+' };
                let _ = writeln!(out, " {}{} {}/", indent, marker, node.name);
            }
            NodeKind::Document => {
                let marker = if active == Some(node.path.as_str()) { '>' } else { ' ' };
                let _ = writeln!(out, "{}{}  {}", marker, indent, node.name);
            }
        }
    }
    out
}

/// The active document in the current view mode
pub fn render_document(model: &AppModel) -> String {
    let Some(target) = model.session.active() else {
        return "(no document open)\n".to_string();
    };

    let mut out = String::new();
    let dirty = if model.session.is_dirty() { " [modified]" } else { "" };
    let _ = writeln!(out, "== {}{} ==", target, dirty);

    let mode = model.ui.view_mode;
    if mode.shows_editor() {
        out.push_str("--- text ---\n");
        out.push_str(model.session.buffer());
        if !model.session.buffer().ends_with('\n') {
            out.push('\n');
        }
    }
    if mode.shows_preview() {
        out.push_str("--- preview ---\n");
        out.push_str(&model.preview.html);
    }
    out
}

/// One-line summary of the session
pub fn render_status(model: &AppModel, now: Instant) -> String {
    let mut parts = Vec::new();

    match model.session.vault_root() {
        Some(root) => parts.push(format!("vault: {}", root.display())),
        None => parts.push("vault: none".to_string()),
    }

    match model.session.state() {
        SessionState::DocumentOpen(source) => {
            let name = model
                .session
                .active()
                .map(|t| t.file_name())
                .unwrap_or_default();
            let origin = match source {
                crate::gateway::Source::Vault => "vault",
                crate::gateway::Source::External => "external",
            };
            let dirty = if model.session.is_dirty() { ", modified" } else { "" };
            parts.push(format!("document: {} ({}{})", name, origin, dirty));
        }
        SessionState::VaultOpenNoDocument | SessionState::NoVaultOpen => {
            parts.push("document: none".to_string());
        }
    }

    parts.push(format!("view: {}", model.ui.view_mode.label()));

    if let Some(remaining) = model.autosave.time_remaining(now) {
        parts.push(format!("autosave in {:.1}s", remaining.as_secs_f32()));
    }
    if model.is_loading() {
        parts.push("loading".to_string());
    }

    parts.join(" | ")
}

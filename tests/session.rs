//! Integration tests for the document session state machine
//!
//! Drives `update` with real files, executing commands synchronously.

mod common;

use std::fs;
use std::path::Path;

use common::{config, drive, execute, model_with_vault, read_file, saves, vault_with};
use vellum::commands::Cmd;
use vellum::config::SwitchPolicy;
use vellum::gateway::{DocumentTarget, Source};
use vellum::messages::{AppMsg, DocumentMsg, Msg, VaultMsg};
use vellum::model::{AppModel, SessionState};
use vellum::update::update;

#[test]
fn test_open_vault_scans_tree() {
    let vault = vault_with(&[("notes/a.md", "# A"), ("readme.md", "hello")]);
    let model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));

    assert_eq!(model.session.state(), SessionState::VaultOpenNoDocument);
    assert_eq!(model.tree.roots.len(), 2);
    assert_eq!(
        model.session.vault_root(),
        Some(vault.path().canonicalize().unwrap().as_path())
    );
}

#[test]
fn test_select_loads_and_renders() {
    let vault = vault_with(&[("notes/a.md", "# Title\nline1\nline2")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));

    drive(&mut model, Msg::select("notes/a.md"));

    assert_eq!(model.session.state(), SessionState::DocumentOpen(Source::Vault));
    assert_eq!(model.session.active_vault_path(), Some("notes/a.md"));
    assert_eq!(model.session.buffer(), "# Title\nline1\nline2");
    assert_eq!(
        model.preview.html,
        "<h1 id=\"title\">Title</h1>\n<p>line1<br />\nline2</p>\n"
    );
}

#[test]
fn test_select_without_vault_is_rejected() {
    let mut model = AppModel::default();
    let cmd = update(&mut model, Msg::select("a.md"));

    assert!(cmd.is_none());
    assert_eq!(model.session.state(), SessionState::NoVaultOpen);
    assert_eq!(model.ui.take_status().as_deref(), Some("no vault is open"));
}

#[test]
fn test_select_escaping_path_is_rejected() {
    let vault = vault_with(&[("a.md", "")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));

    assert!(update(&mut model, Msg::select("../secret.md")).is_none());
    assert!(!model.session.has_document());
}

#[test]
fn test_load_failure_keeps_previous_document() {
    let vault = vault_with(&[("a.md", "alpha")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("a.md"));

    drive(&mut model, Msg::select("missing.md"));

    assert_eq!(model.session.active_vault_path(), Some("a.md"));
    assert_eq!(model.session.buffer(), "alpha");
    assert!(model.ui.take_status().unwrap().contains("missing.md"));
}

#[test]
fn test_selecting_active_document_is_noop() {
    let vault = vault_with(&[("a.md", "alpha")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("a.md"));
    drive(&mut model, Msg::edit("unsaved"));

    assert!(update(&mut model, Msg::select("a.md")).is_none());
    assert_eq!(model.session.buffer(), "unsaved");
}

#[test]
fn test_external_document_clears_vault_selection() {
    let vault = vault_with(&[("a.md", "alpha")]);
    let outside = vault_with(&[("x.md", "external")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("a.md"));

    drive(
        &mut model,
        Msg::Document(DocumentMsg::OpenExternal(outside.path().join("x.md"))),
    );

    assert_eq!(model.session.state(), SessionState::DocumentOpen(Source::External));
    assert_eq!(model.session.active_vault_path(), None);
    assert!(model.session.active_external_path().is_some());
    assert!(model.session.vault_root().is_some());
    assert_eq!(model.session.buffer(), "external");
}

#[test]
fn test_edit_without_document_is_ignored() {
    let vault = vault_with(&[]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));

    assert!(update(&mut model, Msg::edit("text")).is_none());
    assert_eq!(model.session.buffer(), "");
    assert!(!model.autosave.is_pending());
}

#[test]
fn test_edit_renders_and_arms_autosave() {
    let vault = vault_with(&[("a.md", "")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("a.md"));

    assert!(update(&mut model, Msg::edit("*new*")).is_none());

    assert_eq!(model.preview.html, "<p><em>new</em></p>\n");
    assert!(model.session.is_dirty());
    assert!(model.autosave.is_pending());
}

#[test]
fn test_explicit_save_writes_buffer() {
    let vault = vault_with(&[("a.md", "old")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("a.md"));
    drive(&mut model, Msg::edit("new"));

    drive(&mut model, Msg::Document(DocumentMsg::Save));

    assert_eq!(read_file(vault.path(), "a.md"), "new");
    assert!(!model.session.is_dirty());
    assert!(!model.autosave.is_pending());
}

#[test]
fn test_flush_policy_writes_before_switching() {
    let vault = vault_with(&[("a.md", "alpha"), ("b.md", "beta")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("a.md"));
    drive(&mut model, Msg::edit("alpha edited"));

    let cmd = update(&mut model, Msg::select("b.md"));
    match &cmd {
        Some(Cmd::FlushAndLoad { save, load }) => {
            assert_eq!(save.target, DocumentTarget::Vault("a.md".into()));
            assert_eq!(save.content, "alpha edited");
            assert_eq!(load.target, DocumentTarget::Vault("b.md".into()));
        }
        other => panic!("expected FlushAndLoad, got {:?}", other),
    }

    for msg in execute(cmd.unwrap()) {
        drive(&mut model, msg);
    }

    assert_eq!(read_file(vault.path(), "a.md"), "alpha edited");
    assert_eq!(model.session.active_vault_path(), Some("b.md"));
    assert!(!model.session.is_dirty());
    assert!(!model.autosave.is_pending());
}

#[test]
fn test_discard_policy_drops_edits() {
    let vault = vault_with(&[("a.md", "alpha"), ("b.md", "beta")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Discard));
    drive(&mut model, Msg::select("a.md"));
    drive(&mut model, Msg::edit("alpha edited"));

    let cmd = update(&mut model, Msg::select("b.md"));
    assert!(saves(&cmd).is_empty());
    assert!(matches!(cmd, Some(Cmd::LoadDocument(_))));

    for msg in execute(cmd.unwrap()) {
        let follow_up = update(&mut model, msg);
        assert!(saves(&follow_up).is_empty());
    }

    assert_eq!(read_file(vault.path(), "a.md"), "alpha");
    assert_eq!(model.session.buffer(), "beta");
    assert!(!model.autosave.is_pending());
    assert!(model
        .ui
        .take_status()
        .unwrap()
        .contains("Discarded unsaved changes to a.md"));
}

#[test]
fn test_edit_during_flush_is_saved_on_commit() {
    let vault = vault_with(&[("a.md", "alpha"), ("b.md", "beta")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("a.md"));
    drive(&mut model, Msg::edit("first"));

    let cmd = update(&mut model, Msg::select("b.md")).unwrap();
    // More typing lands before the load result comes back
    update(&mut model, Msg::edit("second"));

    let mut written = Vec::new();
    for msg in execute(cmd) {
        if let Some(follow_up) = update(&mut model, msg) {
            written.extend(saves(&Some(follow_up.clone())));
            for msg in execute(follow_up) {
                update(&mut model, msg);
            }
        }
    }

    assert_eq!(written.len(), 1);
    assert_eq!(written[0].content, "second");
    assert_eq!(read_file(vault.path(), "a.md"), "second");
    assert_eq!(model.session.active_vault_path(), Some("b.md"));
}

#[test]
fn test_stale_load_result_is_ignored() {
    let vault = vault_with(&[("a.md", "alpha"), ("b.md", "beta")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));

    let first = update(&mut model, Msg::select("a.md")).unwrap();
    let second = update(&mut model, Msg::select("b.md")).unwrap();

    // The second result arrives first, then the superseded one
    for msg in execute(second) {
        update(&mut model, msg);
    }
    for msg in execute(first) {
        update(&mut model, msg);
    }

    assert_eq!(model.session.active_vault_path(), Some("b.md"));
    assert_eq!(model.session.buffer(), "beta");
}

#[test]
fn test_save_completion_for_previous_document_is_ignored() {
    let vault = vault_with(&[("a.md", "alpha"), ("b.md", "beta")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("b.md"));
    drive(&mut model, Msg::edit("beta edited"));
    let revision = model.session.revision();

    update(
        &mut model,
        Msg::App(AppMsg::SaveCompleted {
            target: DocumentTarget::Vault("a.md".into()),
            revision,
            result: Ok(()),
        }),
    );

    assert!(model.session.is_dirty());
}

#[test]
fn test_close_flushes_and_returns_to_vault() {
    let vault = vault_with(&[("a.md", "alpha")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("a.md"));
    drive(&mut model, Msg::edit("closing"));

    drive(&mut model, Msg::Document(DocumentMsg::Close));

    assert_eq!(model.session.state(), SessionState::VaultOpenNoDocument);
    assert_eq!(model.session.buffer(), "");
    assert!(model.preview.html.is_empty());
    assert_eq!(read_file(vault.path(), "a.md"), "closing");
}

#[test]
fn test_open_vault_flushes_against_old_root() {
    let first = vault_with(&[("a.md", "alpha")]);
    let second = vault_with(&[("b.md", "beta")]);
    let mut model = model_with_vault(first.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("a.md"));
    drive(&mut model, Msg::edit("alpha edited"));
    model.ui.toggle_folder("whatever");

    drive(&mut model, Msg::open_vault(second.path()));

    assert_eq!(read_file(first.path(), "a.md"), "alpha edited");
    assert!(!second.path().join("a.md").exists());
    assert_eq!(model.session.state(), SessionState::VaultOpenNoDocument);
    assert!(model.ui.expanded.is_empty());
    assert_eq!(model.tree.document_paths(), vec!["b.md".to_string()]);
}

/// Replace the `notes/` folder with a plain file so writes under it fail
fn break_notes_folder(root: &Path) {
    fs::remove_dir_all(root.join("notes")).unwrap();
    fs::write(root.join("notes"), "not a dir").unwrap();
}

fn statuses(model: &mut AppModel) -> Vec<String> {
    std::iter::from_fn(|| model.ui.take_status()).collect()
}

#[test]
fn test_failed_flush_keeps_document_open_on_switch() {
    let vault = vault_with(&[("notes/a.md", "alpha"), ("b.md", "bee")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("notes/a.md"));
    drive(&mut model, Msg::edit("precious edit"));
    statuses(&mut model);

    break_notes_folder(vault.path());
    drive(&mut model, Msg::select("b.md"));

    assert_eq!(model.session.active_vault_path(), Some("notes/a.md"));
    assert_eq!(model.session.buffer(), "precious edit");
    assert!(model.session.is_dirty());
    assert!(!model.is_loading());
    assert!(statuses(&mut model)
        .iter()
        .any(|s| s.contains("Kept a.md open")));

    // Once the folder is writable again the switch goes through
    fs::remove_file(vault.path().join("notes")).unwrap();
    drive(&mut model, Msg::select("b.md"));

    assert_eq!(read_file(vault.path(), "notes/a.md"), "precious edit");
    assert_eq!(model.session.active_vault_path(), Some("b.md"));
    assert_eq!(model.session.buffer(), "bee");
}

#[test]
fn test_failed_flush_keeps_document_open_on_close() {
    let vault = vault_with(&[("notes/a.md", "alpha")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("notes/a.md"));
    drive(&mut model, Msg::edit("precious edit"));

    break_notes_folder(vault.path());
    drive(&mut model, Msg::Document(DocumentMsg::Close));

    assert_eq!(model.session.active_vault_path(), Some("notes/a.md"));
    assert_eq!(model.session.buffer(), "precious edit");
    assert!(model.session.is_dirty());
    assert!(model.pending_leave.is_none());
    assert!(statuses(&mut model)
        .iter()
        .any(|s| s.starts_with("Save failed") && s.contains("a.md kept open")));
}

#[test]
fn test_failed_flush_keeps_vault_open() {
    let first = vault_with(&[("notes/a.md", "alpha")]);
    let second = vault_with(&[("b.md", "beta")]);
    let mut model = model_with_vault(first.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("notes/a.md"));
    drive(&mut model, Msg::edit("precious edit"));
    let first_root = model.session.vault_root().unwrap().to_path_buf();

    break_notes_folder(first.path());
    drive(&mut model, Msg::open_vault(second.path()));

    assert_eq!(model.session.vault_root(), Some(first_root.as_path()));
    assert_eq!(model.session.active_vault_path(), Some("notes/a.md"));
    assert_eq!(model.session.buffer(), "precious edit");
    assert!(model.session.is_dirty());
}

#[test]
fn test_close_waits_for_flush_and_saves_later_edits() {
    let vault = vault_with(&[("a.md", "alpha")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("a.md"));
    drive(&mut model, Msg::edit("first"));

    let flush = update(&mut model, Msg::Document(DocumentMsg::Close)).unwrap();
    assert!(matches!(flush, Cmd::SaveDocument(_)));
    // Still open until the write lands
    assert_eq!(model.session.active_vault_path(), Some("a.md"));

    update(&mut model, Msg::edit("second"));
    for msg in execute(flush) {
        drive(&mut model, msg);
    }

    assert_eq!(read_file(vault.path(), "a.md"), "second");
    assert_eq!(model.session.state(), SessionState::VaultOpenNoDocument);
    assert!(model.pending_leave.is_none());
}

#[test]
fn test_create_adds_extension_and_rescans() {
    let vault = vault_with(&[]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));

    drive(&mut model, Msg::Vault(VaultMsg::CreateDocument("ideas/today".into())));

    assert_eq!(read_file(vault.path(), "ideas/today.md"), "");
    assert_eq!(model.tree.document_paths(), vec!["ideas/today.md".to_string()]);
}

#[test]
fn test_create_existing_keeps_content() {
    let vault = vault_with(&[("a.md", "keep me")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));

    drive(&mut model, Msg::Vault(VaultMsg::CreateDocument("a.md".into())));

    assert_eq!(read_file(vault.path(), "a.md"), "keep me");
    assert_eq!(model.ui.take_status().as_deref(), Some("a.md already exists"));
}

#[test]
fn test_delete_active_document_closes_it() {
    let vault = vault_with(&[("a.md", "alpha"), ("b.md", "beta")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::select("a.md"));
    drive(&mut model, Msg::edit("doomed"));

    drive(&mut model, Msg::Vault(VaultMsg::DeleteDocument("a.md".into())));

    assert!(!vault.path().join("a.md").exists());
    assert_eq!(model.session.state(), SessionState::VaultOpenNoDocument);
    assert!(!model.autosave.is_pending());
    assert_eq!(model.tree.document_paths(), vec!["b.md".to_string()]);
}

#[test]
fn test_delete_missing_document_reports_failure() {
    let vault = vault_with(&[]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));

    drive(&mut model, Msg::Vault(VaultMsg::DeleteDocument("nope.md".into())));

    assert!(model.ui.take_status().unwrap().starts_with("Cannot delete nope.md"));
}

#[test]
fn test_refresh_prunes_expanded_folders() {
    let vault = vault_with(&[("keep/a.md", ""), ("gone/b.md", "")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));
    drive(&mut model, Msg::Vault(VaultMsg::ToggleFolder("keep".into())));
    drive(&mut model, Msg::Vault(VaultMsg::ToggleFolder("gone".into())));
    assert_eq!(model.ui.expanded.len(), 2);

    std::fs::remove_dir_all(vault.path().join("gone")).unwrap();
    drive(&mut model, Msg::Vault(VaultMsg::Refresh));

    assert!(model.ui.is_expanded("keep"));
    assert!(!model.ui.is_expanded("gone"));
}

#[test]
fn test_toggle_document_is_not_expansion() {
    let vault = vault_with(&[("a.md", "")]);
    let mut model = model_with_vault(vault.path(), config(SwitchPolicy::Flush));

    drive(&mut model, Msg::Vault(VaultMsg::ToggleFolder("a.md".into())));
    assert!(model.ui.expanded.is_empty());
}

#[test]
fn test_scan_of_previous_vault_is_ignored() {
    let first = vault_with(&[("a.md", "")]);
    let second = vault_with(&[("b.md", "")]);
    let mut model = AppModel::new(config(SwitchPolicy::Flush));

    let stale_scan = update(&mut model, Msg::open_vault(first.path())).unwrap();
    drive(&mut model, Msg::open_vault(second.path()));
    for msg in execute(stale_scan) {
        update(&mut model, msg);
    }

    assert_eq!(model.tree.document_paths(), vec!["b.md".to_string()]);
}

#[test]
fn test_unreadable_vault_gives_empty_tree() {
    let parent = vault_with(&[]);
    let mut model = AppModel::new(config(SwitchPolicy::Flush));

    drive(&mut model, Msg::open_vault(parent.path().join("missing")));

    assert!(model.tree.is_empty());
    let statuses: Vec<String> = std::iter::from_fn(|| model.ui.take_status()).collect();
    assert!(statuses.iter().any(|s| s.starts_with("Cannot read vault")));
}

#[test]
fn test_dialog_results() {
    let vault = vault_with(&[("a.md", "")]);
    let mut model = AppModel::new(config(SwitchPolicy::Flush));

    drive(
        &mut model,
        Msg::App(AppMsg::OpenFolderDialogResult { folder: None }),
    );
    assert_eq!(model.session.state(), SessionState::NoVaultOpen);

    drive(
        &mut model,
        Msg::App(AppMsg::OpenFolderDialogResult {
            folder: Some(vault.path().to_path_buf()),
        }),
    );
    assert_eq!(model.session.state(), SessionState::VaultOpenNoDocument);
    assert_eq!(model.tree.document_paths(), vec!["a.md".to_string()]);
}

#[test]
fn test_cycle_view_mode() {
    let mut model = AppModel::default();
    drive(&mut model, Msg::Document(DocumentMsg::CycleViewMode));
    assert_eq!(model.ui.take_status().as_deref(), Some("View: editor"));
}

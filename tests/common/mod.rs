//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use vellum::commands::{Cmd, LoadRequest, SaveRequest};
use vellum::config::{SwitchPolicy, VellumConfig};
use vellum::dialogs::Dialogs;
use vellum::gateway;
use vellum::messages::{AppMsg, Msg};
use vellum::model::{tree, AppModel};
use vellum::update::update;

/// Create a vault directory containing `files` (relative path, content)
pub fn vault_with(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (relative, content) in files {
        write_file(dir.path(), relative, content);
    }
    dir
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, content).expect("Failed to write file");
}

pub fn read_file(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).expect("Failed to read file")
}

/// Config with a given switch policy and a short autosave delay
pub fn config(policy: SwitchPolicy) -> VellumConfig {
    VellumConfig {
        autosave_delay_ms: 100,
        switch_policy: policy,
        ..VellumConfig::default()
    }
}

/// Run one command synchronously, returning the result messages in the
/// order the runtime would deliver them
pub fn execute(cmd: Cmd) -> Vec<Msg> {
    match cmd {
        Cmd::ScanVault { root } => {
            let result = tree::scan(&root).map_err(|e| e.to_string());
            vec![Msg::App(AppMsg::VaultScanned { root, result })]
        }
        Cmd::LoadDocument(load) => vec![load_result(load)],
        Cmd::SaveDocument(save) => vec![save_result(save)],
        Cmd::FlushAndLoad { save, load } => vec![save_result(save), load_result(load)],
        Cmd::CreateDocument { relative, path } => vec![Msg::App(AppMsg::DocumentCreated {
            path: relative,
            result: gateway::create(&path),
        })],
        Cmd::DeleteDocument { relative, path } => vec![Msg::App(AppMsg::DocumentDeleted {
            path: relative,
            result: gateway::delete(&path),
        })],
        Cmd::ShowOpenFolderDialog => {
            vec![Msg::App(AppMsg::OpenFolderDialogResult { folder: None })]
        }
        Cmd::ShowOpenFileDialog => vec![Msg::App(AppMsg::OpenFileDialogResult { file: None })],
        Cmd::Batch(cmds) => cmds.into_iter().flat_map(execute).collect(),
    }
}

pub fn load_result(load: LoadRequest) -> Msg {
    Msg::App(AppMsg::DocumentLoaded {
        request_id: load.id,
        target: load.target,
        result: gateway::read(&load.path),
    })
}

pub fn save_result(save: SaveRequest) -> Msg {
    Msg::App(AppMsg::SaveCompleted {
        target: save.target,
        revision: save.revision,
        result: gateway::write(&save.path, &save.content),
    })
}

/// Feed `msg` through `update`, executing every resulting command until
/// the model settles
pub fn drive(model: &mut AppModel, msg: Msg) {
    let mut queue = VecDeque::from([msg]);
    while let Some(msg) = queue.pop_front() {
        if let Some(cmd) = update(model, msg) {
            queue.extend(execute(cmd));
        }
    }
}

/// A model with `root` open as a scanned vault
pub fn model_with_vault(root: &Path, config: VellumConfig) -> AppModel {
    let mut model = AppModel::new(config);
    drive(&mut model, Msg::open_vault(root));
    model
}

/// All writes a command would perform, flattened
pub fn saves(cmd: &Option<Cmd>) -> Vec<SaveRequest> {
    let Some(cmd) = cmd.clone() else {
        return Vec::new();
    };
    cmd.into_vec()
        .into_iter()
        .filter_map(|c| match c {
            Cmd::SaveDocument(save) => Some(save),
            Cmd::FlushAndLoad { save, .. } => Some(save),
            _ => None,
        })
        .collect()
}

/// Dialogs that return scripted answers, once each
#[derive(Debug, Default)]
pub struct FakeDialogs {
    folders: Mutex<VecDeque<Option<PathBuf>>>,
    files: Mutex<VecDeque<Option<PathBuf>>>,
}

impl FakeDialogs {
    pub fn with_folder(self, folder: Option<PathBuf>) -> Self {
        self.folders.lock().expect("lock").push_back(folder);
        self
    }

    pub fn with_file(self, file: Option<PathBuf>) -> Self {
        self.files.lock().expect("lock").push_back(file);
        self
    }
}

impl Dialogs for FakeDialogs {
    fn pick_folder(&self) -> Option<PathBuf> {
        self.folders.lock().ok()?.pop_front().flatten()
    }

    fn pick_markdown_file(&self) -> Option<PathBuf> {
        self.files.lock().ok()?.pop_front().flatten()
    }
}

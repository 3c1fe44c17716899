//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::path::PathBuf;
use std::time::Instant;

use crate::gateway::{DocumentTarget, GatewayError};
use crate::model::tree::VaultTree;

/// Vault-level messages (opening, browsing, file management)
#[derive(Debug, Clone)]
pub enum VaultMsg {
    /// Make a directory the active vault
    OpenVault(PathBuf),
    /// Rescan the open vault
    Refresh,
    /// Expand or collapse a folder in the tree
    ToggleFolder(String),
    /// Create an empty document at a vault-relative path
    CreateDocument(String),
    /// Delete a document at a vault-relative path
    DeleteDocument(String),
    /// Ask the user for a vault folder
    ShowOpenFolderDialog,
}

/// Active document messages
#[derive(Debug, Clone)]
pub enum DocumentMsg {
    /// Open a document from the vault tree
    SelectVaultDocument(String),
    /// Open a markdown file outside the vault
    OpenExternal(PathBuf),
    /// Replace the buffer with new text
    Edit(String),
    /// Save the buffer now
    Save,
    /// Close the active document
    Close,
    /// Ask the user for a markdown file to open
    ShowOpenFileDialog,
    /// Split → editor → preview
    CycleViewMode,
}

/// Application-level messages (async results, timers)
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// Vault scan finished
    VaultScanned {
        root: PathBuf,
        result: Result<VaultTree, String>,
    },
    /// Document load finished
    DocumentLoaded {
        request_id: u64,
        target: DocumentTarget,
        result: Result<String, GatewayError>,
    },
    /// Document write finished
    SaveCompleted {
        target: DocumentTarget,
        revision: u64,
        result: Result<(), GatewayError>,
    },
    /// Document creation finished; `Ok(false)` means it already existed
    DocumentCreated {
        path: String,
        result: Result<bool, GatewayError>,
    },
    /// Document deletion finished
    DocumentDeleted {
        path: String,
        result: Result<(), GatewayError>,
    },
    /// Open Folder dialog returned folder (or None if cancelled)
    OpenFolderDialogResult { folder: Option<PathBuf> },
    /// Open File dialog returned a file (or None if cancelled)
    OpenFileDialogResult { file: Option<PathBuf> },
    /// Timer tick from the runtime loop
    Tick(Instant),
    /// Persist a dirty buffer immediately (shutdown)
    Flush,
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    /// Vault messages (tree, file management)
    Vault(VaultMsg),
    /// Document messages (selection, editing, saving)
    Document(DocumentMsg),
    /// App messages (async results, timers)
    App(AppMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn open_vault(path: impl Into<PathBuf>) -> Self {
        Msg::Vault(VaultMsg::OpenVault(path.into()))
    }

    pub fn select(path: impl Into<String>) -> Self {
        Msg::Document(DocumentMsg::SelectVaultDocument(path.into()))
    }

    pub fn edit(text: impl Into<String>) -> Self {
        Msg::Document(DocumentMsg::Edit(text.into()))
    }

    pub fn tick(now: Instant) -> Self {
        Msg::App(AppMsg::Tick(now))
    }

    /// Short name for logging. Never includes buffer text.
    pub fn name(&self) -> &'static str {
        match self {
            Msg::Vault(msg) => match msg {
                VaultMsg::OpenVault(_) => "Vault::OpenVault",
                VaultMsg::Refresh => "Vault::Refresh",
                VaultMsg::ToggleFolder(_) => "Vault::ToggleFolder",
                VaultMsg::CreateDocument(_) => "Vault::CreateDocument",
                VaultMsg::DeleteDocument(_) => "Vault::DeleteDocument",
                VaultMsg::ShowOpenFolderDialog => "Vault::ShowOpenFolderDialog",
            },
            Msg::Document(msg) => match msg {
                DocumentMsg::SelectVaultDocument(_) => "Document::SelectVaultDocument",
                DocumentMsg::OpenExternal(_) => "Document::OpenExternal",
                DocumentMsg::Edit(_) => "Document::Edit",
                DocumentMsg::Save => "Document::Save",
                DocumentMsg::Close => "Document::Close",
                DocumentMsg::ShowOpenFileDialog => "Document::ShowOpenFileDialog",
                DocumentMsg::CycleViewMode => "Document::CycleViewMode",
            },
            Msg::App(msg) => match msg {
                AppMsg::VaultScanned { .. } => "App::VaultScanned",
                AppMsg::DocumentLoaded { .. } => "App::DocumentLoaded",
                AppMsg::SaveCompleted { .. } => "App::SaveCompleted",
                AppMsg::DocumentCreated { .. } => "App::DocumentCreated",
                AppMsg::DocumentDeleted { .. } => "App::DocumentDeleted",
                AppMsg::OpenFolderDialogResult { .. } => "App::OpenFolderDialogResult",
                AppMsg::OpenFileDialogResult { .. } => "App::OpenFileDialogResult",
                AppMsg::Tick(_) => "App::Tick",
                AppMsg::Flush => "App::Flush",
            },
        }
    }
}

//! Command types for the Elm-style architecture
//!
//! Commands describe side effects that should be performed after an update.
//! The runtime executes them off the model thread and reports back with
//! [`crate::messages::AppMsg`] results.

use std::path::PathBuf;

use crate::gateway::DocumentTarget;

/// A document read, tagged so stale results can be recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub id: u64,
    pub target: DocumentTarget,
    pub path: PathBuf,
}

/// A document write of a buffer snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub target: DocumentTarget,
    pub path: PathBuf,
    pub content: String,
    /// Buffer revision the snapshot was taken at
    pub revision: u64,
}

/// Side effects requested by `update`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    /// Walk the vault directory and rebuild the tree
    ScanVault { root: PathBuf },
    /// Read a document
    LoadDocument(LoadRequest),
    /// Write a document
    SaveDocument(SaveRequest),
    /// Write the outgoing document, then read the next one, in order
    FlushAndLoad { save: SaveRequest, load: LoadRequest },
    /// Create an empty document if none exists
    CreateDocument { relative: String, path: PathBuf },
    /// Remove a document
    DeleteDocument { relative: String, path: PathBuf },
    /// Show native open folder dialog
    ShowOpenFolderDialog,
    /// Show native open file dialog
    ShowOpenFileDialog,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Combine commands, collapsing empty and single-element batches
    pub fn batch(cmds: Vec<Cmd>) -> Option<Self> {
        let mut cmds = cmds;
        match cmds.len() {
            0 => None,
            1 => cmds.pop(),
            _ => Some(Cmd::Batch(cmds)),
        }
    }

    /// Flatten nested batches into execution order
    pub fn into_vec(self) -> Vec<Cmd> {
        match self {
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::into_vec).collect(),
            other => vec![other],
        }
    }
}

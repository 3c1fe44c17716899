//! Application model - the complete state of the notes app
//!
//! This module contains all the state types following the Elm Architecture pattern.

pub mod session;
pub mod tree;
pub mod ui;

pub use session::{Session, SessionState};
pub use tree::{NodeKind, TreeNode, VaultTree};
pub use ui::UiState;

use std::path::PathBuf;

use crate::autosave::AutosaveScheduler;
use crate::config::VellumConfig;
use crate::gateway::DocumentTarget;
use crate::markdown::Preview;

/// A document read that has been requested but not yet committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLoad {
    pub id: u64,
    /// Revision of the outgoing buffer written ahead of this load, if any
    pub flushed_revision: Option<u64>,
}

/// What to do with the active document once its flush reaches the disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveAction {
    Close,
    OpenVault(PathBuf),
}

/// A close or vault switch held back until the outgoing buffer is saved.
/// A failed write cancels it and the document stays open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLeave {
    pub target: DocumentTarget,
    /// Revision of the flush being waited on
    pub revision: u64,
    pub action: LeaveAction,
}

/// The complete application model
#[derive(Debug)]
pub struct AppModel {
    /// Vault root, active document and its buffer
    pub session: Session,
    /// Result of the last vault scan
    pub tree: VaultTree,
    /// Rendered form of the buffer
    pub preview: Preview,
    pub autosave: AutosaveScheduler,
    pub ui: UiState,
    pub config: VellumConfig,
    /// Only the most recent load request is committed
    pub pending_load: Option<PendingLoad>,
    pub pending_leave: Option<PendingLeave>,
    next_request_id: u64,
}

impl AppModel {
    pub fn new(config: VellumConfig) -> Self {
        Self {
            session: Session::new(),
            tree: VaultTree::default(),
            preview: Preview::default(),
            autosave: AutosaveScheduler::new(config.autosave_delay()),
            ui: UiState::new(),
            config,
            pending_load: None,
            pending_leave: None,
            next_request_id: 0,
        }
    }

    /// Allocate an id for a new load request
    pub fn issue_request_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    /// Whether a document load is in flight
    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(VellumConfig::default())
    }
}

//! Document session - the single active editing context
//!
//! Holds the open vault (if any), the active document (if any) and its text
//! buffer. The active document is a single [`DocumentTarget`], so a vault
//! selection and an external file can never be active at the same time.

use std::path::{Path, PathBuf};

use crate::gateway::{self, DocumentTarget, GatewayError, Source};

/// Coarse state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoVaultOpen,
    VaultOpenNoDocument,
    DocumentOpen(Source),
}

/// The active editing context
#[derive(Debug, Clone, Default)]
pub struct Session {
    vault_root: Option<PathBuf>,
    active: Option<DocumentTarget>,
    buffer: String,
    /// Incremented on every buffer change
    revision: u64,
    /// Revision last known to match the file on disk
    saved_revision: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match (&self.active, &self.vault_root) {
            (Some(target), _) => SessionState::DocumentOpen(target.source()),
            (None, Some(_)) => SessionState::VaultOpenNoDocument,
            (None, None) => SessionState::NoVaultOpen,
        }
    }

    pub fn vault_root(&self) -> Option<&Path> {
        self.vault_root.as_deref()
    }

    pub fn active(&self) -> Option<&DocumentTarget> {
        self.active.as_ref()
    }

    /// Vault-relative path of the active document, if it came from the vault
    pub fn active_vault_path(&self) -> Option<&str> {
        self.active.as_ref().and_then(DocumentTarget::vault_path)
    }

    /// Absolute path of the active document, if it was opened outside the vault
    pub fn active_external_path(&self) -> Option<&Path> {
        match &self.active {
            Some(DocumentTarget::External(path)) => Some(path),
            _ => None,
        }
    }

    pub fn is_active(&self, target: &DocumentTarget) -> bool {
        self.active.as_ref() == Some(target)
    }

    pub fn has_document(&self) -> bool {
        self.active.is_some()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the buffer has edits not yet confirmed on disk
    pub fn is_dirty(&self) -> bool {
        self.active.is_some() && self.revision != self.saved_revision
    }

    /// Whether `revision` (or something newer) is known to be on disk
    pub fn is_saved(&self, revision: u64) -> bool {
        self.saved_revision >= revision
    }

    /// Switch to a vault. Any active document is dropped; callers decide
    /// beforehand what happens to unsaved edits.
    pub fn open_vault(&mut self, root: PathBuf) {
        self.close_document();
        self.vault_root = Some(root);
    }

    /// Make `target` the active document with freshly loaded content
    pub fn open_document(&mut self, target: DocumentTarget, content: String) {
        self.active = Some(target);
        self.buffer = content;
        self.revision = self.revision.wrapping_add(1);
        self.saved_revision = self.revision;
    }

    /// Replace the buffer. Returns the new revision, or `None` when no
    /// document is open.
    pub fn set_buffer(&mut self, text: String) -> Option<u64> {
        self.active.as_ref()?;
        self.buffer = text;
        self.revision = self.revision.wrapping_add(1);
        Some(self.revision)
    }

    /// Record that `revision` of `target` reached the disk.
    ///
    /// Ignored when `target` is no longer active, so a write finishing after
    /// a document switch cannot mark the new document clean.
    pub fn mark_saved(&mut self, target: &DocumentTarget, revision: u64) -> bool {
        if !self.is_active(target) {
            return false;
        }
        if revision > self.saved_revision && revision <= self.revision {
            self.saved_revision = revision;
        }
        true
    }

    /// Drop the active document and its buffer
    pub fn close_document(&mut self) {
        self.active = None;
        self.buffer.clear();
        self.revision = self.revision.wrapping_add(1);
        self.saved_revision = self.revision;
    }

    /// Resolve a target against this session's vault
    pub fn resolve(&self, target: &DocumentTarget) -> Result<PathBuf, GatewayError> {
        gateway::resolve(self.vault_root(), target)
    }

    /// Debug-build consistency checks
    pub fn assert_invariants(&self) {
        debug_assert!(
            self.saved_revision <= self.revision,
            "saved revision {} ahead of buffer revision {}",
            self.saved_revision,
            self.revision
        );
        debug_assert!(
            self.active.is_some() || self.buffer.is_empty(),
            "buffer has content with no active document"
        );
    }
}

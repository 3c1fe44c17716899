//! File system watching for the open vault
//!
//! Uses the `notify` crate with debouncing. The watcher never edits the
//! tree itself; a relevant change only asks for a full rescan.

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind, Debouncer};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use crate::model::tree::{is_hidden, CONTENT_EXTENSION};

/// Debounced recursive watcher on a vault root
pub struct VaultWatcher {
    /// The debouncer handles watching and event coalescing
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    rx: Receiver<Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>>,
    root: PathBuf,
}

impl VaultWatcher {
    /// Watch `root` recursively. Events are debounced by 500ms to coalesce
    /// bursts such as a sync client writing many files.
    pub fn new(root: PathBuf) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

        debouncer
            .watcher()
            .watch(&root, notify::RecursiveMode::Recursive)?;

        tracing::info!("Started vault watcher for: {}", root.display());

        Ok(Self {
            _debouncer: debouncer,
            rx,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drain pending events (non-blocking) and return the distinct paths
    /// that could change the tree. Non-empty means "rescan".
    pub fn poll_changes(&self) -> Vec<PathBuf> {
        let mut changed: Vec<PathBuf> = Vec::new();

        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(events) => {
                    for event in events {
                        // Continuous events during active changes - wait for the final one
                        if matches!(event.kind, DebouncedEventKind::AnyContinuous) {
                            continue;
                        }
                        if !affects_tree(&self.root, &event.path) {
                            continue;
                        }
                        if !changed.contains(&event.path) {
                            changed.push(event.path);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Vault watcher error: {:?}", e);
                }
            }
        }

        if !changed.is_empty() {
            tracing::debug!("Vault watcher detected {} changes", changed.len());
        }
        changed
    }
}

/// Whether a change at `path` could show up in a scan of `root`.
///
/// Anything under a hidden component is ignored, as are files with an
/// extension other than markdown. Extension-less paths count, since a
/// removed directory can no longer be inspected.
pub fn affects_tree(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let mut last = None;
    for component in relative.components() {
        if let Component::Normal(name) = component {
            let name = name.to_string_lossy();
            if is_hidden(&name) {
                return false;
            }
            last = Some(name.into_owned());
        }
    }

    let Some(name) = last else {
        // The root itself
        return true;
    };
    if path.is_dir() || name.ends_with(CONTENT_EXTENSION) {
        return true;
    }
    Path::new(&name).extension().is_none()
}

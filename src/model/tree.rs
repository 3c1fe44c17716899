//! Vault file tree - scanning a directory into an ordered tree of notes
//!
//! The tree mirrors the vault on disk, filtered to markdown documents:
//! - folders whose name starts with `.` are skipped entirely
//! - files are kept only if they end with `.md`
//! - siblings are ordered folders first, then by name
//!
//! The tree is rebuilt wholesale by [`scan`]; nothing mutates it in place.
//! Folder expansion is UI state and lives outside the tree (see
//! [`crate::model::UiState::expanded`]).

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::ser::{Serialize, SerializeStruct, Serializer};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Recognized document extension
pub const CONTENT_EXTENSION: &str = ".md";

/// Leading character of hidden entries
pub const HIDDEN_MARKER: char = '.';

// ============================================================================
// Tree Nodes
// ============================================================================

/// Kind of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    Document,
}

/// A node in the vault tree (either a folder or a markdown document)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Base name of the entry
    pub name: String,
    /// Path relative to the vault root, always `/`-separated
    pub path: String,
    pub kind: NodeKind,
    /// Children (only populated for folders)
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn folder(name: impl Into<String>, path: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Folder,
            children,
        }
    }

    pub fn document(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Document,
            children: Vec::new(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

// Serialized in the shape the tree view consumes:
// `{ "name", "path", "type": "folder" | "file", "children"? }`
impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field_count = if self.is_folder() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("TreeNode", field_count)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("path", &self.path)?;
        match self.kind {
            NodeKind::Folder => {
                state.serialize_field("type", "folder")?;
                state.serialize_field("children", &self.children)?;
            }
            NodeKind::Document => {
                state.serialize_field("type", "file")?;
            }
        }
        state.end()
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// The vault root itself could not be listed
#[derive(Debug, thiserror::Error)]
#[error("cannot read vault {}: {source}", path.display())]
pub struct ScanError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Scan a vault root into a tree.
///
/// Only an unreadable root is an error. Subdirectories that cannot be listed
/// are logged and come back as folders without children.
pub fn scan(root: &Path) -> Result<VaultTree, ScanError> {
    let entries = fs::read_dir(root).map_err(|source| ScanError {
        path: root.to_path_buf(),
        source,
    })?;
    let roots = scan_entries(root, entries);
    tracing::debug!(root = %root.display(), top_level = roots.len(), "vault scanned");
    Ok(VaultTree { roots })
}

fn scan_directory(root: &Path, dir: &Path) -> Vec<TreeNode> {
    match fs::read_dir(dir) {
        Ok(entries) => scan_entries(root, entries),
        Err(e) => {
            tracing::warn!("Failed to list {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}

fn scan_entries(root: &Path, entries: fs::ReadDir) -> Vec<TreeNode> {
    let mut nodes = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        // file_type() does not follow symlinks, so links are skipped below
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::debug!("Skipping non UTF-8 name {:?}", file_name);
            continue;
        };
        let path = entry.path();

        if file_type.is_dir() {
            if is_hidden(name) {
                continue;
            }
            let children = scan_directory(root, &path);
            nodes.push(TreeNode::folder(name, relative_path(root, &path), children));
        } else if file_type.is_file() && is_document_name(name) {
            nodes.push(TreeNode::document(name, relative_path(root, &path)));
        }
    }

    sort_nodes(&mut nodes);
    nodes
}

/// Check if an entry name is hidden
pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER)
}

/// Check if a file name carries the recognized content extension
pub fn is_document_name(name: &str) -> bool {
    name.ends_with(CONTENT_EXTENSION)
}

/// Path of `path` relative to `root`, joined with `/` on every platform
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Sort nodes: folders first, then by name
pub fn sort_nodes(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| match (a.is_folder(), b.is_folder()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => locale_cmp(&a.name, &b.name),
    });
}

/// Locale-style name comparison.
///
/// Base letters first, ignoring case and accents (`est` < `été` < `fin`).
/// Ties are broken by accents (unaccented first), then by case (lowercase
/// first at the first differing position), then by code point.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .find(|(x, y)| x != y)
                .map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => Ordering::Equal,
                })
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.cmp(b))
}

/// Lowercased canonical decomposition, accents kept as combining marks
fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    folded(s).filter(|c| !is_combining_mark(*c))
}

// ============================================================================
// Vault Tree
// ============================================================================

/// Result of the last scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultTree {
    /// Entries at the vault root
    pub roots: Vec<TreeNode>,
}

impl VaultTree {
    pub fn new(roots: Vec<TreeNode>) -> Self {
        Self { roots }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Find a node by its relative path
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        let mut nodes = &self.roots;
        let mut found = None;
        let mut prefix = String::new();

        for part in path.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);

            let node = nodes.iter().find(|n| n.path == prefix)?;
            nodes = &node.children;
            found = Some(node);
        }

        found
    }

    /// Whether `path` names a folder in the tree
    pub fn is_folder(&self, path: &str) -> bool {
        self.find(path).is_some_and(TreeNode::is_folder)
    }

    /// All document paths, depth-first in display order
    pub fn document_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        for node in &self.roots {
            Self::collect_documents(node, &mut out);
        }
        out
    }

    fn collect_documents(node: &TreeNode, out: &mut Vec<String>) {
        match node.kind {
            NodeKind::Folder => {
                for child in &node.children {
                    Self::collect_documents(child, out);
                }
            }
            NodeKind::Document => out.push(node.path.clone()),
        }
    }

    /// All folder paths
    pub fn folder_paths(&self) -> HashSet<String> {
        let mut out = HashSet::new();
        let mut stack: Vec<&TreeNode> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            if node.is_folder() {
                out.insert(node.path.clone());
                stack.extend(node.children.iter());
            }
        }
        out
    }

    /// Count rows that would be displayed given the expanded folders
    pub fn count_visible(&self, expanded: &HashSet<String>) -> usize {
        self.roots
            .iter()
            .map(|node| Self::count_visible_node(node, expanded))
            .sum()
    }

    fn count_visible_node(node: &TreeNode, expanded: &HashSet<String>) -> usize {
        let mut count = 1;

        if node.is_folder() && expanded.contains(&node.path) {
            for child in &node.children {
                count += Self::count_visible_node(child, expanded);
            }
        }

        count
    }

    /// Displayed rows with their depth, in order
    pub fn visible_rows<'a>(&'a self, expanded: &HashSet<String>) -> Vec<(&'a TreeNode, usize)> {
        let mut rows = Vec::new();
        for node in &self.roots {
            Self::push_visible(node, 0, expanded, &mut rows);
        }
        rows
    }

    fn push_visible<'a>(
        node: &'a TreeNode,
        depth: usize,
        expanded: &HashSet<String>,
        rows: &mut Vec<(&'a TreeNode, usize)>,
    ) {
        rows.push((node, depth));
        if node.is_folder() && expanded.contains(&node.path) {
            for child in &node.children {
                Self::push_visible(child, depth + 1, expanded, rows);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Persistence gateway - document reads and writes
//!
//! Every document operation goes through a [`DocumentTarget`]: either a
//! path relative to the open vault, or an absolute path to a file opened
//! outside any vault. Vault targets are resolved against the vault root the
//! caller passes in; there is no process-wide "current vault".
//!
//! Failures are returned as [`GatewayError`]. Callers at the UI boundary
//! (see [`crate::api::NotesApi`] and the update handlers) log them and turn
//! them into status messages or sentinel values.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::model::tree::CONTENT_EXTENSION;

/// Identifies the document an operation applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentTarget {
    /// `/`-separated path relative to the vault root
    Vault(String),
    /// Absolute path of a file opened outside the vault
    External(PathBuf),
}

/// Where the active document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Vault,
    External,
}

impl DocumentTarget {
    /// Build a vault target, normalizing separators and rejecting paths that
    /// would escape the vault
    pub fn vault(relative: &str) -> Result<Self, GatewayError> {
        normalize_relative(relative).map(Self::Vault)
    }

    pub fn source(&self) -> Source {
        match self {
            Self::Vault(_) => Source::Vault,
            Self::External(_) => Source::External,
        }
    }

    /// The vault-relative path, if this is a vault target
    pub fn vault_path(&self) -> Option<&str> {
        match self {
            Self::Vault(rel) => Some(rel),
            Self::External(_) => None,
        }
    }

    /// Base name shown in titles and status messages
    pub fn file_name(&self) -> String {
        match self {
            Self::Vault(rel) => rel.rsplit('/').next().unwrap_or(rel).to_string(),
            Self::External(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

impl fmt::Display for DocumentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vault(rel) => write!(f, "{}", rel),
            Self::External(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Errors produced by gateway operations
///
/// Carries messages rather than `io::Error` so results can travel inside
/// cloneable messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("no vault is open")]
    NoVaultOpen,
    #[error("invalid document path: {0:?}")]
    InvalidPath(String),
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),
    #[error("cannot read {}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },
    #[error("cannot write {}: {message}", path.display())]
    WriteFailure { path: PathBuf, message: String },
}

/// Normalize a vault-relative path: `\` becomes `/`, surrounding slashes and
/// `.` components are dropped. Absolute paths and `..` are rejected.
pub fn normalize_relative(raw: &str) -> Result<String, GatewayError> {
    let trimmed = raw.trim();
    let unified = trimmed.replace('\\', "/");
    if unified.starts_with('/') || Path::new(trimmed).is_absolute() {
        return Err(GatewayError::InvalidPath(raw.to_string()));
    }

    let mut parts = Vec::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(GatewayError::InvalidPath(raw.to_string()));
            }
        }
    }

    if parts.is_empty() {
        return Err(GatewayError::InvalidPath(raw.to_string()));
    }
    Ok(parts.join("/"))
}

/// Append the markdown extension when a new document name lacks it
pub fn ensure_markdown_extension(relative: &str) -> String {
    if relative.ends_with(CONTENT_EXTENSION) {
        relative.to_string()
    } else {
        format!("{relative}{CONTENT_EXTENSION}")
    }
}

/// Resolve a target to an absolute filesystem path
pub fn resolve(vault_root: Option<&Path>, target: &DocumentTarget) -> Result<PathBuf, GatewayError> {
    match target {
        DocumentTarget::Vault(rel) => {
            let root = vault_root.ok_or(GatewayError::NoVaultOpen)?;
            let rel = normalize_relative(rel)?;
            Ok(rel.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part)))
        }
        DocumentTarget::External(path) => Ok(path.clone()),
    }
}

/// Read a document as UTF-8 text
pub fn read(path: &Path) -> Result<String, GatewayError> {
    let metadata = fs::metadata(path).map_err(|e| read_error(path, e))?;
    if metadata.is_dir() {
        return Err(GatewayError::Unreadable {
            path: path.to_path_buf(),
            message: "is a directory".to_string(),
        });
    }
    fs::read_to_string(path).map_err(|e| read_error(path, e))
}

/// Write a document, creating missing parent directories first.
/// Existing content is overwritten unconditionally.
pub fn write(path: &Path, content: &str) -> Result<(), GatewayError> {
    ensure_parent(path)?;
    fs::write(path, content).map_err(|e| write_error(path, e))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "document written");
    Ok(())
}

/// Create an empty document if none exists.
///
/// Returns `Ok(true)` when a file was created and `Ok(false)` when one was
/// already there (its content is left untouched).
pub fn create(path: &Path) -> Result<bool, GatewayError> {
    ensure_parent(path)?;
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            tracing::debug!(path = %path.display(), "document created");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(write_error(path, e)),
    }
}

/// Remove a document. Fails with `NotFound` if it does not exist.
pub fn delete(path: &Path) -> Result<(), GatewayError> {
    fs::remove_file(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GatewayError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => GatewayError::PermissionDenied(path.to_path_buf()),
        _ => GatewayError::WriteFailure {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;
    tracing::debug!(path = %path.display(), "document deleted");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), GatewayError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| write_error(parent, e))
        }
        _ => Ok(()),
    }
}

fn read_error(path: &Path, e: std::io::Error) -> GatewayError {
    match e.kind() {
        ErrorKind::NotFound => GatewayError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => GatewayError::PermissionDenied(path.to_path_buf()),
        _ => GatewayError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    }
}

fn write_error(path: &Path, e: std::io::Error) -> GatewayError {
    match e.kind() {
        ErrorKind::PermissionDenied => GatewayError::PermissionDenied(path.to_path_buf()),
        _ => GatewayError::WriteFailure {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    }
}

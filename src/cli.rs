//! Command-line argument parsing
//!
//! Supports:
//! - Opening a vault directory or a single markdown file
//! - Overriding autosave and switch settings for one session
//! - Rendering a file to HTML without starting the shell

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{SwitchPolicy, VellumConfig};

/// Markdown notes over a folder of files
#[derive(Parser, Debug)]
#[command(name = "vellum", version, about = "Markdown notes over a folder of files")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Vault directory or markdown file to open
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Rescan the vault when files change on disk
    #[arg(short = 'w', long)]
    pub watch: bool,

    /// Quiet period in milliseconds before an edit is saved
    #[arg(long, value_name = "MS")]
    pub autosave_ms: Option<u64>,

    /// What to do with unsaved edits when switching documents
    #[arg(long, value_enum)]
    pub policy: Option<SwitchPolicy>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a markdown file as HTML and exit
    Render {
        file: PathBuf,
        /// Emit a complete styled HTML page
        #[arg(long)]
        standalone: bool,
    },
}

/// The startup mode determines what to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupMode {
    /// Start with nothing open
    Empty,
    /// Open a directory as the vault
    Vault(PathBuf),
    /// Open a single file outside any vault
    External(PathBuf),
    /// Render and exit
    Render { file: PathBuf, standalone: bool },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub mode: StartupMode,
    /// Persisted config with command-line overrides applied
    pub config: VellumConfig,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self, base: VellumConfig) -> Result<StartupConfig, String> {
        let mut config = base;
        if self.watch {
            config.watch = true;
        }
        if let Some(ms) = self.autosave_ms {
            if ms == 0 {
                return Err("--autosave-ms must be greater than zero".to_string());
            }
            config.autosave_delay_ms = ms;
        }
        if let Some(policy) = self.policy {
            config.switch_policy = policy;
        }

        let mode = match (self.command, self.path) {
            (Some(Command::Render { file, standalone }), _) => {
                StartupMode::Render { file, standalone }
            }
            (None, None) => StartupMode::Empty,
            (None, Some(path)) if path.is_dir() => StartupMode::Vault(path),
            (None, Some(path)) if path.is_file() => StartupMode::External(path),
            (None, Some(path)) => {
                return Err(format!("No such file or directory: {}", path.display()));
            }
        };

        Ok(StartupConfig { mode, config })
    }
}

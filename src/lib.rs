//! Vellum - markdown notes over a folder of files
//!
//! This crate provides the core types and logic for a notes app
//! implementing the Elm Architecture pattern: a vault scanner, a single
//! document session with debounced autosave, and a markdown preview.

pub mod api;
pub mod autosave;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod dialogs;
pub mod fs_watcher;
pub mod gateway;
pub mod markdown;
pub mod messages;
pub mod model;
pub mod runtime;
pub mod tracing;
pub mod update;
pub mod view;

// Re-export commonly used types
pub use api::NotesApi;
pub use commands::Cmd;
pub use config::VellumConfig;
pub use messages::Msg;
pub use model::AppModel;

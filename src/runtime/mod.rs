//! Runtime - executes commands and drives the model
//!
//! - `app` - owns the model, runs commands on worker threads
//! - `input` - shell line to message mapping
//! - `shell` - interactive read/tick/print loop

pub mod app;
pub mod input;
pub mod shell;

pub use app::App;

//! Markdown preview module
//!
//! Renders the buffer to HTML on every edit, and optionally wraps it in a
//! styled standalone document.

mod preview;
mod renderer;
mod theme;

pub use preview::{Preview, ViewMode};
pub use renderer::{preview_document, render, render_options, slugify};
pub use theme::{PreviewTheme, PreviewThemeName};

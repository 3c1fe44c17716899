//! File pickers
//!
//! Native dialogs are optional (`native-dialogs` feature). Without them
//! every request behaves as if the user cancelled.

use std::path::PathBuf;
use std::sync::Arc;

/// Asks the user for a vault folder or a markdown file.
/// `None` means the user cancelled.
pub trait Dialogs: Send + Sync {
    fn pick_folder(&self) -> Option<PathBuf>;
    fn pick_markdown_file(&self) -> Option<PathBuf>;
}

/// Dialogs for headless use: always cancelled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDialogs;

impl Dialogs for NoDialogs {
    fn pick_folder(&self) -> Option<PathBuf> {
        tracing::debug!("no dialog backend, folder pick cancelled");
        None
    }

    fn pick_markdown_file(&self) -> Option<PathBuf> {
        tracing::debug!("no dialog backend, file pick cancelled");
        None
    }
}

/// Native pickers via `rfd`
#[cfg(feature = "native-dialogs")]
#[derive(Debug, Clone, Copy, Default)]
pub struct RfdDialogs;

#[cfg(feature = "native-dialogs")]
impl Dialogs for RfdDialogs {
    fn pick_folder(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select vault folder")
            .pick_folder()
    }

    fn pick_markdown_file(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Open markdown file")
            .add_filter("Markdown", &["md", "markdown"])
            .pick_file()
    }
}

/// The best dialog backend compiled in
pub fn default_dialogs() -> Arc<dyn Dialogs> {
    #[cfg(feature = "native-dialogs")]
    {
        Arc::new(RfdDialogs)
    }
    #[cfg(not(feature = "native-dialogs"))]
    {
        Arc::new(NoDialogs)
    }
}

impl<D: Dialogs + ?Sized> Dialogs for Arc<D> {
    fn pick_folder(&self) -> Option<PathBuf> {
        (**self).pick_folder()
    }

    fn pick_markdown_file(&self) -> Option<PathBuf> {
        (**self).pick_markdown_file()
    }
}

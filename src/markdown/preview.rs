//! Rendered preview of the active document

use super::render;

/// How the document is shown: raw text, rendered preview, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Split,
    Editor,
    Preview,
}

impl ViewMode {
    /// Next mode in the split → editor → preview cycle
    pub fn next(self) -> Self {
        match self {
            Self::Split => Self::Editor,
            Self::Editor => Self::Preview,
            Self::Preview => Self::Split,
        }
    }

    pub fn shows_editor(self) -> bool {
        matches!(self, Self::Split | Self::Editor)
    }

    pub fn shows_preview(self) -> bool {
        matches!(self, Self::Split | Self::Preview)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::Editor => "editor",
            Self::Preview => "preview",
        }
    }
}

/// HTML derived from the buffer, tagged with the revision it came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub html: String,
    pub revision: u64,
}

impl Preview {
    /// Re-render from `text`. Runs on every buffer change; there is no
    /// incremental path.
    pub fn refresh(&mut self, text: &str, revision: u64) {
        self.html = render(text);
        self.revision = revision;
    }

    pub fn clear(&mut self) {
        self.html.clear();
        self.revision = 0;
    }
}

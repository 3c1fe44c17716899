//! Preview theme - colors for standalone preview documents

use serde::{Deserialize, Serialize};

/// Named preview palettes selectable from config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewThemeName {
    #[default]
    Dark,
    Light,
}

/// Theme colors for markdown preview (CSS-formatted)
#[derive(Debug, Clone)]
pub struct PreviewTheme {
    pub background: String,
    pub text: String,
    pub heading: String,
    pub link: String,
    pub code_background: String,
    pub border: String,
    pub accent: String,
    pub muted: String,
}

impl PreviewTheme {
    pub fn named(name: PreviewThemeName) -> Self {
        match name {
            PreviewThemeName::Dark => Self::default(),
            PreviewThemeName::Light => Self::light(),
        }
    }

    pub fn light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#24292f".to_string(),
            heading: "#1f2328".to_string(),
            link: "#0969da".to_string(),
            code_background: "#f6f8fa".to_string(),
            border: "#d0d7de".to_string(),
            accent: "#8250df".to_string(),
            muted: "#57606a".to_string(),
        }
    }
}

impl Default for PreviewTheme {
    fn default() -> Self {
        Self {
            background: "#1e1e1e".to_string(),
            text: "#d4d4d4".to_string(),
            heading: "#569cd6".to_string(),
            link: "#ce9178".to_string(),
            code_background: "#252526".to_string(),
            border: "#3c3c3c".to_string(),
            accent: "#dcdcaa".to_string(),
            muted: "#858585".to_string(),
        }
    }
}

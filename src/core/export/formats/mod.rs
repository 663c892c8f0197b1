//! Document format implementations
//!
//! Provides renderers for the exportable plan document: Markdown and
//! plain text.

pub mod markdown;
pub mod text;

pub use markdown::MarkdownRenderer;
pub use text::TextRenderer;

use super::DocumentRenderer;
use std::fmt;
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Markdown document
    Markdown,
    /// Plain-text document
    Text,
}

impl ExportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Text => "txt",
        }
    }

    /// Build the renderer for this format
    #[must_use]
    pub fn renderer(&self) -> Box<dyn DocumentRenderer> {
        match self {
            Self::Markdown => Box::new(MarkdownRenderer::new()),
            Self::Text => Box::new(TextRenderer::new()),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "txt" | "text" => Ok(Self::Text),
            _ => Err(format!("Unknown export format: {s}")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Text => write!(f, "text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!(
            "Markdown".parse::<ExportFormat>().unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::Markdown.extension(), "md");
        assert_eq!(ExportFormat::Text.extension(), "txt");
    }
}

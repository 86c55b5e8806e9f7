//! Extraction options and configuration.

use crate::layout::LayoutConfig;
use crate::model::LayoutMode;

/// Options for opening a document and extracting its text.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Password for encrypted documents
    pub password: Option<String>,

    /// How page text is reconstructed
    pub layout_mode: LayoutMode,

    /// Error handling mode for whole-document reads
    pub error_mode: ErrorMode,

    /// Thresholds for physical layout
    pub layout: LayoutConfig,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set password for encrypted documents.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set layout mode.
    pub fn with_layout_mode(mut self, mode: LayoutMode) -> Self {
        self.layout_mode = mode;
        self
    }

    /// Raw content-stream order.
    pub fn raw(mut self) -> Self {
        self.layout_mode = LayoutMode::Raw;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (unreadable pages become empty).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set physical layout thresholds.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }
}

/// Error handling mode for whole-document reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first page that cannot be read
    #[default]
    Strict,
    /// Substitute an empty string for unreadable pages and continue
    Lenient,
}

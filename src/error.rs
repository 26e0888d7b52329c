//! Error types for the websift tool surface.
//!
//! Each error variant carries a stable error code (SCREAMING_SNAKE_CASE)
//! that is included in the Display output and accessible via [`ToolError::code()`].

use websift_search::SearchError;

/// Stable error codes for programmatic error handling.
///
/// Use these for distinguishing errors rather than parsing Display output.
pub mod error_codes {
    /// Invalid or unreadable configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// A required tool parameter was absent or blank.
    pub const MISSING_PARAMETER: &str = "MISSING_PARAMETER";

    /// The search pipeline failed.
    pub const SEARCH_FAILED: &str = "SEARCH_FAILED";

    /// The approval round-trip with the frontend broke down.
    pub const APPROVAL_FAILED: &str = "APPROVAL_FAILED";

    /// Filesystem or terminal I/O failed.
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// Errors produced while handling a tool invocation.
///
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid or unreadable configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),

    /// A required tool parameter was absent or blank.
    #[error("[{}] missing required parameter: {}", error_codes::MISSING_PARAMETER, .0)]
    MissingParameter(String),

    /// The search pipeline failed.
    #[error("[{}] {}", error_codes::SEARCH_FAILED, .0)]
    Search(#[source] SearchError),

    /// The approval round-trip with the frontend broke down.
    #[error("[{}] {}", error_codes::APPROVAL_FAILED, .0)]
    Approval(String),

    /// Filesystem or terminal I/O failed.
    #[error("[{}] {}", error_codes::IO_ERROR, .0)]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => error_codes::CONFIG_INVALID,
            Self::MissingParameter(_) => error_codes::MISSING_PARAMETER,
            Self::Search(_) => error_codes::SEARCH_FAILED,
            Self::Approval(_) => error_codes::APPROVAL_FAILED,
            Self::Io(_) => error_codes::IO_ERROR,
        }
    }

    /// Returns the message without the code prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Config(m) | Self::Approval(m) => m.clone(),
            Self::MissingParameter(param) => format!("missing required parameter: {param}"),
            Self::Search(err) => err.to_string(),
            Self::Io(err) => err.to_string(),
        }
    }
}

impl From<SearchError> for ToolError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Config(msg) => Self::Config(msg),
            SearchError::MissingParameter(param) => Self::MissingParameter(param),
            other => Self::Search(other),
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ToolError>;

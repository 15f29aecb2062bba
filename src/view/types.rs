//! View loading errors.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while loading a template.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The server answered outside the 2xx-3xx range.
    #[error("Failed to load view: {view} (status {status})")]
    Status { view: String, status: u16 },

    /// The request never completed.
    #[error("Network error loading view: {view}: {message}")]
    Transport { view: String, message: String },

    /// No answer within the configured timeout.
    #[error("Timed out loading view: {view} after {timeout:?}")]
    Timeout { view: String, timeout: Duration },

    /// Local template could not be read.
    #[error("Failed to read view: {view}: {source}")]
    Io {
        view: String,
        #[source]
        source: std::io::Error,
    },

    /// The view name does not form a valid location.
    #[error("Invalid location for view: {view}: {message}")]
    InvalidLocation { view: String, message: String },

    /// The configured base URL cannot be used.
    #[error("Invalid views base URL '{url}': {message}")]
    InvalidBase { url: String, message: String },
}

impl ViewError {
    pub(crate) fn transport(view: &str, err: impl std::fmt::Display) -> Self {
        ViewError::Transport {
            view: view.to_string(),
            message: err.to_string(),
        }
    }

    /// Name of the view that failed, when there is one.
    pub fn view(&self) -> Option<&str> {
        match self {
            ViewError::Status { view, .. }
            | ViewError::Transport { view, .. }
            | ViewError::Timeout { view, .. }
            | ViewError::Io { view, .. }
            | ViewError::InvalidLocation { view, .. } => Some(view),
            ViewError::InvalidBase { .. } => None,
        }
    }
}

/// Result type for view operations.
pub type ViewResult<T> = Result<T, ViewError>;

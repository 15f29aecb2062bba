//! Dispatch outcomes and error definitions.

use thiserror::Error;

use crate::dispatch::handler::HandlerError;
use crate::routing::Verb;
use crate::view::ViewError;

/// Errors that can occur while dispatching a navigation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No pattern matched for the verb.
    #[error("Route not found: {verb} '{path}'")]
    RouteNotFound { verb: Verb, path: String },

    /// A template could not be fetched.
    #[error("View load failure: {0}")]
    ViewLoadFailure(#[source] ViewError),

    /// The handler failed, panicked or its deferred result was rejected.
    #[error("Handler fault: {0}")]
    HandlerFault(#[source] HandlerError),

    /// The stashed form snapshot is not a JSON object of strings.
    #[error("Error parsing stored form data: {0}")]
    ParseFailure(String),

    /// The render target element does not exist.
    #[error("No element with id \"{0}\" found")]
    MissingRenderTarget(String),
}

impl DispatchError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::RouteNotFound { .. } => "route_not_found",
            DispatchError::ViewLoadFailure(_) => "view_load_failure",
            DispatchError::HandlerFault(_) => "handler_fault",
            DispatchError::ParseFailure(_) => "parse_failure",
            DispatchError::MissingRenderTarget(_) => "missing_render_target",
        }
    }
}

impl From<HandlerError> for DispatchError {
    fn from(err: HandlerError) -> Self {
        match err {
            HandlerError::View(e) => DispatchError::ViewLoadFailure(e),
            other => DispatchError::HandlerFault(other),
        }
    }
}

impl From<ViewError> for DispatchError {
    fn from(err: ViewError) -> Self {
        DispatchError::ViewLoadFailure(err)
    }
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// How a dispatch ended.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The handler's content was written to the render target.
    Rendered {
        verb: Verb,
        path: String,
        pattern: String,
    },
    /// The not-found view (or the fallback text) was written instead.
    NotFound {
        verb: Verb,
        path: String,
        cause: DispatchError,
    },
}

impl DispatchOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, DispatchOutcome::Rendered { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Rendered { .. } => "rendered",
            DispatchOutcome::NotFound { .. } => "not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_errors_from_handlers_are_view_failures() {
        let err: DispatchError = HandlerError::View(ViewError::Status {
            view: "about".into(),
            status: 404,
        })
        .into();
        assert_eq!(err.kind(), "view_load_failure");

        let err: DispatchError = HandlerError::msg("boom").into();
        assert_eq!(err.kind(), "handler_fault");
        assert_eq!(err.to_string(), "Handler fault: boom");
    }

    #[test]
    fn test_error_display() {
        let err = DispatchError::RouteNotFound {
            verb: Verb::Get,
            path: "/nope".into(),
        };
        assert_eq!(err.to_string(), "Route not found: GET '/nope'");

        let err = DispatchError::MissingRenderTarget("view".into());
        assert_eq!(err.to_string(), "No element with id \"view\" found");
    }
}

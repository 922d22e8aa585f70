//! Backend error type shared by the REST clients.

use courier_domain::ToolError;
use thiserror::Error;

/// Error raised while talking to a backend system.
///
/// Never leaves a tool provider: providers convert it with
/// [`BackendError::into_tool_error`] and return it as text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("Authentication failed (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Cannot read {path}: {message}")]
    File { path: String, message: String },

    /// The backend answered, but the operation cannot be carried out
    #[error("{0}")]
    Rejected(String),
}

impl BackendError {
    pub fn code(&self) -> &'static str {
        match self {
            BackendError::MissingConfig(_) => "CONFIGURATION",
            BackendError::Unauthorized { .. } => "PERMISSION_DENIED",
            BackendError::NotFound(_) => "NOT_FOUND",
            BackendError::Timeout(_) => "TIMEOUT",
            BackendError::File { .. } => "INVALID_ARGUMENT",
            BackendError::Status { .. }
            | BackendError::Transport(_)
            | BackendError::Decode(_)
            | BackendError::Rejected(_) => "EXECUTION_FAILED",
        }
    }

    pub fn into_tool_error(self) -> ToolError {
        ToolError::new(self.code(), self.to_string())
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout(e.to_string())
        } else if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_text() {
        let err = BackendError::MissingConfig("JIRA_URL").into_tool_error();
        assert_eq!(err.code, "CONFIGURATION");
        assert_eq!(err.to_text(), "Error: Missing configuration: JIRA_URL");
    }

    #[test]
    fn test_codes() {
        assert_eq!(BackendError::NotFound("DEMO-9".into()).code(), "NOT_FOUND");
        assert_eq!(
            BackendError::Unauthorized {
                status: 401,
                message: "bad token".into()
            }
            .code(),
            "PERMISSION_DENIED"
        );
        assert_eq!(BackendError::Rejected("no".into()).code(), "EXECUTION_FAILED");
    }
}

//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown backend system: {0}")]
    UnknownSystem(String),

    #[error("Invalid route plan: {0}")]
    InvalidPlan(String),

    #[error("No domain agent registered for {0}")]
    AgentNotRegistered(String),
}

impl DomainError {
    /// Check if this error came from malformed user input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidRequest(_) | DomainError::UnknownSystem(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DomainError::AgentNotRegistered("github".to_string());
        assert_eq!(error.to_string(), "No domain agent registered for github");
    }

    #[test]
    fn test_is_user_error() {
        assert!(DomainError::InvalidRequest("empty".to_string()).is_user_error());
        assert!(DomainError::UnknownSystem("trello".to_string()).is_user_error());
        assert!(!DomainError::InvalidPlan("duplicate step".to_string()).is_user_error());
    }
}

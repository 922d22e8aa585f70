//! Request value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Who said a line of the conversation history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// One earlier turn of the conversation.
///
/// History is opaque to the coordination core: it is carried along for the
/// routing brain and never interpreted by the coordinator itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// A single user turn submitted to the coordinator (Value Object)
///
/// Created per turn and discarded once the response is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    text: String,
    #[serde(default)]
    history: Vec<ConversationTurn>,
}

impl Request {
    /// Try to create a request, rejecting empty or whitespace-only text
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::InvalidRequest(
                "request text cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            text,
            history: Vec::new(),
        })
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    /// Get the request text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let request = Request::new("list backlog tickets for project DEMO").unwrap();
        assert_eq!(request.text(), "list backlog tickets for project DEMO");
        assert!(request.history().is_empty());
    }

    #[test]
    fn test_empty_request_rejected() {
        assert!(Request::new("").is_err());
        assert!(Request::new("   \n").is_err());
    }

    #[test]
    fn test_request_with_history() {
        let request = Request::new("and move it to Done")
            .unwrap()
            .with_history(vec![
                ConversationTurn::user("show DEMO-5"),
                ConversationTurn::assistant("Key: DEMO-5"),
            ]);
        assert_eq!(request.history().len(), 2);
        assert_eq!(request.history()[1].speaker, Speaker::Assistant);
    }
}

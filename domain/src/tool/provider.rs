//! Tool provider abstraction
//!
//! This module defines the [`ToolProvider`] trait: the uniform contract every
//! backend-specific tool adapter satisfies. One provider wraps one backend
//! system (Jira, Confluence, GitHub) and exposes its operations as
//! [`ToolDefinition`]s.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │     ToolRegistry (one per domain agent)  │
//! └──────────────────────────────────────────┘
//!           │              │              │
//!           ▼              ▼              ▼
//!    ┌──────────┐   ┌────────────┐   ┌──────────┐
//!    │   Jira   │   │ Confluence │   │  GitHub  │
//!    │ Provider │   │  Provider  │   │ Provider │
//!    └──────────┘   └────────────┘   └──────────┘
//! ```
//!
//! # Contract
//!
//! - [`ToolProvider::execute`] returns a [`ToolResult`], never a `Result`:
//!   every remote failure is folded into the result and rendered as an
//!   `Error: ...` string.
//! - Side effects on the remote system only happen inside `execute`.
//! - No retries: a failed remote call surfaces immediately.
//! - A provider never calls another provider.

use async_trait::async_trait;
use thiserror::Error;

use super::entities::{ToolCall, ToolDefinition};
use super::value_objects::ToolResult;

/// Error type for tool provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider is not available
    #[error("Provider not available: {0}")]
    NotAvailable(String),

    /// Failed to discover tools from the provider
    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    /// Tool not found in this provider
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
}

/// Tool provider abstraction - the adapter set for one backend system
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Unique identifier for this provider
    ///
    /// Examples: "jira", "confluence", "github"
    fn id(&self) -> &str;

    /// Display name for user-facing output
    fn display_name(&self) -> &str;

    /// Priority for tool resolution (higher = preferred)
    fn priority(&self) -> i32 {
        0
    }

    /// Check if the provider can be used at all.
    ///
    /// Credentials are validated lazily on the first call, so backend
    /// providers report themselves available even when unconfigured.
    async fn is_available(&self) -> bool {
        true
    }

    /// Discover available tools from this provider
    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError>;

    /// Alternative names (alias, canonical) for the tools of this provider
    fn aliases(&self) -> Vec<(&'static str, &'static str)> {
        Vec::new()
    }

    /// Execute a tool call
    ///
    /// The tool_name in the call must match one of the tools
    /// returned by `discover_tools()`.
    async fn execute(&self, call: &ToolCall) -> ToolResult;

    /// Check if this provider has a specific tool
    async fn has_tool(&self, tool_name: &str) -> bool {
        match self.discover_tools().await {
            Ok(tools) => tools.iter().any(|t| t.name == tool_name),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::RiskLevel;
    use crate::tool::value_objects::ToolError;

    /// A mock provider for testing
    struct MockProvider {
        id: String,
        tools: Vec<ToolDefinition>,
        available: bool,
    }

    impl MockProvider {
        fn new(id: &str, available: bool) -> Self {
            Self {
                id: id.to_string(),
                tools: Vec::new(),
                available,
            }
        }

        fn with_tool(mut self, name: &str) -> Self {
            self.tools.push(ToolDefinition::new(
                name,
                format!("Mock tool: {}", name),
                RiskLevel::Low,
            ));
            self
        }
    }

    #[async_trait]
    impl ToolProvider for MockProvider {
        fn id(&self) -> &str {
            &self.id
        }

        fn display_name(&self) -> &str {
            "Mock Provider"
        }

        async fn is_available(&self) -> bool {
            self.available
        }

        async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
            if self.available {
                Ok(self.tools.clone())
            } else {
                Err(ProviderError::NotAvailable("Mock not available".into()))
            }
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            if self.tools.iter().any(|t| t.name == call.tool_name) {
                ToolResult::success(&call.tool_name, "Mock output")
            } else {
                ToolResult::failure(&call.tool_name, ToolError::not_found(&call.tool_name))
            }
        }
    }

    #[tokio::test]
    async fn test_provider_discovery() {
        let provider = MockProvider::new("mock", true)
            .with_tool("search_jira")
            .with_tool("list_projects");

        assert!(provider.is_available().await);
        assert_eq!(provider.priority(), 0);

        let tools = provider.discover_tools().await.unwrap();
        assert_eq!(tools.len(), 2);
        assert!(tools.iter().any(|t| t.name == "search_jira"));
    }

    #[tokio::test]
    async fn test_provider_not_available() {
        let provider = MockProvider::new("mock", false);

        assert!(!provider.is_available().await);
        assert!(provider.discover_tools().await.is_err());
        assert!(!provider.has_tool("search_jira").await);
    }

    #[tokio::test]
    async fn test_provider_unknown_tool_is_text_not_fault() {
        let provider = MockProvider::new("mock", true).with_tool("search_jira");

        let result = provider.execute(&ToolCall::new("delete_everything")).await;
        assert!(!result.is_success());
        assert!(result.text().starts_with("Error: "));
    }
}

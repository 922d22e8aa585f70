//! Tool Registry
//!
//! The [`ToolRegistry`] aggregates tool providers and implements
//! [`ToolExecutorPort`]. Each domain agent owns one registry scoped to its
//! backend system.
//!
//! # Usage
//!
//! ```ignore
//! use courier_infrastructure::tools::{JiraProvider, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new().register(JiraProvider::new(backend));
//! registry.discover().await?;
//!
//! assert!(registry.has_tool("search_jira"));
//! assert!(registry.has_tool("jql_search")); // alias
//!
//! let call = ToolCall::new("get_backlog_tickets").with_arg("project_key", "DEMO");
//! let result = registry.execute(&call).await;
//! ```
//!
//! # Execution pipeline
//!
//! 1. Resolve aliases to the canonical tool name
//! 2. Validate the call against the tool's definition (no network on failure)
//! 3. Fill in declared defaults
//! 4. Route to the owning provider, highest priority first

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use courier_application::ports::tool_executor::ToolExecutorPort;
use courier_domain::tool::{
    entities::{ToolCall, ToolSpec},
    provider::ToolProvider,
    traits::{DefaultToolValidator, ToolValidator, apply_defaults},
    value_objects::{ToolError, ToolResult},
};

/// Tool registry that aggregates multiple providers
///
/// When multiple providers offer the same tool, the one with the higher
/// priority is used.
pub struct ToolRegistry {
    /// Registered providers
    providers: Vec<Arc<dyn ToolProvider>>,
    /// Tool name -> provider ID mapping (cached after discovery)
    tool_mapping: HashMap<String, String>,
    /// Merged tool specification, aliases included
    tool_spec: ToolSpec,
    /// Whether discovery has been run
    discovered: bool,
    validator: DefaultToolValidator,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            tool_mapping: HashMap::new(),
            tool_spec: ToolSpec::new(),
            discovered: false,
            validator: DefaultToolValidator,
        }
    }

    /// Register a tool provider
    pub fn register<P: ToolProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Arc::new(provider));
        self.discovered = false; // Invalidate cache
        self
    }

    /// Register a tool provider (Arc version)
    pub fn register_arc(mut self, provider: Arc<dyn ToolProvider>) -> Self {
        self.providers.push(provider);
        self.discovered = false;
        self
    }

    /// Discover tools and aliases from all providers
    ///
    /// This must be called before using the registry.
    pub async fn discover(&mut self) -> Result<(), String> {
        self.providers
            .sort_by_key(|p| std::cmp::Reverse(p.priority()));

        let mut tool_spec = ToolSpec::new();
        let mut tool_mapping = HashMap::new();

        for provider in &self.providers {
            if !provider.is_available().await {
                tracing::debug!(provider = provider.id(), "Provider not available, skipping");
                continue;
            }

            match provider.discover_tools().await {
                Ok(tools) => {
                    for tool in tools {
                        if !tool_mapping.contains_key(&tool.name) {
                            tracing::debug!(
                                tool = %tool.name,
                                provider = provider.id(),
                                "Registered tool"
                            );
                            tool_mapping.insert(tool.name.clone(), provider.id().to_string());
                            tool_spec = tool_spec.register(tool);
                        } else {
                            tracing::trace!(
                                tool = %tool.name,
                                provider = provider.id(),
                                "Tool already registered by higher priority provider"
                            );
                        }
                    }

                    // An alias never shadows a real tool name
                    for (alias, canonical) in provider.aliases() {
                        if !tool_mapping.contains_key(alias)
                            && tool_spec.resolve_alias(alias).is_none()
                        {
                            tool_spec = tool_spec.register_alias(alias, canonical);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.id(),
                        error = %e,
                        "Failed to discover tools from provider"
                    );
                }
            }
        }

        self.tool_spec = tool_spec;
        self.tool_mapping = tool_mapping;
        self.discovered = true;

        Ok(())
    }

    /// Get the provider for a canonical tool name
    fn provider_for(&self, tool_name: &str) -> Option<&Arc<dyn ToolProvider>> {
        let provider_id = self.tool_mapping.get(tool_name)?;
        self.providers.iter().find(|p| p.id() == provider_id)
    }

    /// Get a list of registered provider IDs
    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Get statistics about registered tools
    pub fn stats(&self) -> RegistryStats {
        let mut tools_per_provider = HashMap::new();
        for provider_id in self.tool_mapping.values() {
            *tools_per_provider.entry(provider_id.clone()).or_insert(0) += 1;
        }

        RegistryStats {
            total_providers: self.providers.len(),
            total_tools: self.tool_mapping.len(),
            tools_per_provider,
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the registry
#[derive(Debug, Clone)]
pub struct RegistryStats {
    pub total_providers: usize,
    pub total_tools: usize,
    pub tools_per_provider: HashMap<String, usize>,
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        if !self.discovered {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::execution_failed("Registry not initialized. Call discover() first."),
            );
        }

        let start = Instant::now();
        let Some(definition) = self.tool_spec.get_resolved(&call.tool_name) else {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(format!("Tool not found: {}", call.tool_name)),
            );
        };

        let mut call = call.clone();
        call.tool_name = definition.name.clone();

        if let Err(message) = self.validator.validate(&call, definition) {
            tracing::debug!(tool = %call.tool_name, %message, "Rejected tool call");
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(message))
                .with_duration(start.elapsed().as_millis() as u64);
        }
        let call = apply_defaults(&call, definition);

        let Some(provider) = self.provider_for(&call.tool_name) else {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(format!("No provider for tool: {}", call.tool_name)),
            );
        };

        let result = provider.execute(&call).await;
        if !result.is_success() {
            tracing::warn!(
                tool = %call.tool_name,
                provider = provider.id(),
                error = %result.text(),
                "Tool call failed"
            );
        }
        result.with_duration(start.elapsed().as_millis() as u64)
    }
}

//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Risk level of a tool operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk - read-only lookups (e.g., search_jira, read_confluence_page)
    Low,
    /// High risk - creates, updates or deletes a remote resource
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
        }
    }

    /// Whether calls at this level leave the remote system untouched.
    pub fn is_read_only(&self) -> bool {
        matches!(self, RiskLevel::Low)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Boolean,
}

impl ParamType {
    pub fn as_str(&self) -> &str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
        }
    }

    /// Check whether a JSON value fits this type.
    ///
    /// Integers written as strings ("42") are accepted, since intent
    /// parsers extract everything from free text.
    pub fn accepts(&self, value: &serde_json::Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_str().is_some_and(|s| s.trim().parse::<i64>().is_ok())
            }
            ParamType::Boolean => value.is_boolean(),
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool that a domain agent can invoke
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "get_backlog_tickets")
    pub name: String,
    /// Human-readable description, used for tool selection
    pub description: String,
    /// Risk level of this tool
    pub risk_level: RiskLevel,
    /// Parameter specifications, in declaration order
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type
    pub param_type: ParamType,
    /// Value used when the caller omits the parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Whether the parameter may be bound from data handed over by
    /// a previous agent (e.g. a page body built from ticket details)
    #[serde(default)]
    pub accepts_context: bool,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            risk_level,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.risk_level.is_read_only()
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Names of required parameters, in declaration order
    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }

    /// The parameter that receives handed-over context, if any
    pub fn context_parameter(&self) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.accepts_context)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: ParamType::String,
            default: None,
            accepts_context: false,
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    /// Set a default value. A parameter with a default is never required.
    pub fn with_default(mut self, default: impl Into<serde_json::Value>) -> Self {
        self.default = Some(default.into());
        self.required = false;
        self
    }

    pub fn accepting_context(mut self) -> Self {
        self.accepts_context = true;
        self
    }
}

/// Specification of the tools owned by one domain agent
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: HashMap<String, ToolDefinition>,
    /// Registration order, so listings are stable
    order: Vec<String>,
    /// Alias → canonical name mapping (e.g. "jql_search" → "search_jira")
    aliases: HashMap<String, String>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        if !self.tools.contains_key(&tool.name) {
            self.order.push(tool.name.clone());
        }
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    /// Register a single alias mapping (builder pattern)
    pub fn register_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }

    /// Register multiple aliases at once (builder pattern)
    pub fn register_aliases(
        mut self,
        mappings: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        for (alias, canonical) in mappings {
            self.aliases.insert(alias.into(), canonical.into());
        }
        self
    }

    /// Resolve an alias to its canonical name (aliases only, not canonical names)
    pub fn resolve_alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(|s| s.as_str())
    }

    /// Resolve a name: returns canonical name if it's a registered tool,
    /// or resolves alias, or None if unknown
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.tools.contains_key(name) {
            Some(name)
        } else {
            self.resolve_alias(name)
        }
    }

    /// Get tool definition by canonical name or alias
    pub fn get_resolved(&self, name: &str) -> Option<&ToolDefinition> {
        self.resolve(name).and_then(|canonical| self.tools.get(canonical))
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// All tools in registration order
    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn read_only_tools(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.all().filter(|t| t.is_read_only())
    }

    pub fn mutating_tools(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.all().filter(|t| !t.is_read_only())
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    pub arguments: HashMap<String, serde_json::Value>,
    /// Optional reasoning for why this tool is being called
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
            reasoning: None,
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn has_arg(&self, key: &str) -> bool {
        self.arguments.contains_key(key)
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an optional i64 argument (numeric strings are accepted)
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        let value = self.arguments.get(key)?;
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    }

    /// Get a required i64 argument or return an error message
    pub fn require_i64(&self, key: &str) -> Result<i64, String> {
        self.get_i64(key)
            .ok_or_else(|| format!("Missing or non-integer argument: {}", key))
    }

    /// Get an optional bool argument
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level() {
        assert!(RiskLevel::Low.is_read_only());
        assert!(!RiskLevel::High.is_read_only());
    }

    #[test]
    fn test_param_type_accepts() {
        assert!(ParamType::String.accepts(&serde_json::json!("DEMO")));
        assert!(!ParamType::String.accepts(&serde_json::json!(3)));
        assert!(ParamType::Integer.accepts(&serde_json::json!(42)));
        assert!(ParamType::Integer.accepts(&serde_json::json!("42")));
        assert!(!ParamType::Integer.accepts(&serde_json::json!("forty-two")));
        assert!(ParamType::Boolean.accepts(&serde_json::json!(true)));
    }

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("get_backlog_tickets", "Backlog lookup", RiskLevel::Low)
            .with_parameter(ToolParameter::new("project_key", "Project key", true));

        assert_eq!(tool.name, "get_backlog_tickets");
        assert!(tool.is_read_only());
        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.parameters[0].param_type, ParamType::String);
        assert!(tool.parameter("project_key").is_some());
    }

    #[test]
    fn test_default_makes_parameter_optional() {
        let param = ToolParameter::new("issuetype", "Issue type", true).with_default("Story");
        assert!(!param.required);
        assert_eq!(param.default, Some(serde_json::json!("Story")));
    }

    #[test]
    fn test_context_parameter() {
        let tool = ToolDefinition::new("create_confluence_page", "Create page", RiskLevel::High)
            .with_parameter(ToolParameter::new("space", "Space key", true))
            .with_parameter(ToolParameter::new("body", "Page body", true).accepting_context());

        assert_eq!(tool.context_parameter().unwrap().name, "body");
        assert_eq!(tool.required_parameters().count(), 2);
    }

    #[test]
    fn test_tool_spec_keeps_registration_order() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("search_jira", "Search", RiskLevel::Low))
            .register(ToolDefinition::new("create_issue", "Create", RiskLevel::High))
            .register(ToolDefinition::new("get_transitions", "Transitions", RiskLevel::Low));

        let names: Vec<&str> = spec.names().collect();
        assert_eq!(names, vec!["search_jira", "create_issue", "get_transitions"]);
        assert_eq!(spec.read_only_tools().count(), 2);
        assert_eq!(spec.mutating_tools().count(), 1);
        assert_eq!(spec.len(), 3);
    }

    #[test]
    fn test_tool_spec_aliases() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("search_jira", "Search", RiskLevel::Low))
            .register_aliases([("jql", "search_jira"), ("jira_search", "search_jira")]);

        assert_eq!(spec.resolve_alias("jql"), Some("search_jira"));
        assert_eq!(spec.resolve_alias("search_jira"), None);
        assert_eq!(spec.resolve("jira_search"), Some("search_jira"));
        assert_eq!(spec.get_resolved("jql").unwrap().name, "search_jira");
        assert!(spec.get("jql").is_none());
        assert!(spec.get_resolved("unknown").is_none());
    }

    #[test]
    fn test_tool_call_integer_from_string() {
        let call = ToolCall::new("get_sprint_issues")
            .with_arg("sprint_id", "42")
            .with_arg("board_id", 7);

        assert_eq!(call.get_i64("sprint_id"), Some(42));
        assert_eq!(call.require_i64("board_id").unwrap(), 7);
        assert!(call.require_i64("missing").is_err());
    }

    #[test]
    fn test_tool_call() {
        let call = ToolCall::new("get_issue_details")
            .with_arg("issue_key", "DEMO-5")
            .with_reasoning("Need the ticket body");

        assert_eq!(call.tool_name, "get_issue_details");
        assert_eq!(call.get_string("issue_key"), Some("DEMO-5"));
        assert!(call.require_string("missing").is_err());
        assert!(call.has_arg("issue_key"));
    }
}

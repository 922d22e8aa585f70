//! Tool domain module
//!
//! This module defines the **Tool Adapter contract**: how domain agents reach
//! a backend system (Jira, Confluence, GitHub) through small, stateless,
//! validated operations.
//!
//! # Overview
//!
//! Every tool is described by a [`ToolDefinition`] (name, description, ordered
//! typed parameters with optional defaults, risk level), invoked via a
//! [`ToolCall`], and returns a [`ToolResult`] whose textual form is always
//! defined.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (text)       │
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ aliases: "jql" → "search_jira"
//!        └─ tools:   "search_jira" → ToolDefinition
//! ```
//!
//! # Static validation
//!
//! The registry is explicit: before a provider touches the network the
//! [`DefaultToolValidator`] checks required parameters, rejects unknown ones,
//! and type-checks arguments; [`apply_defaults`] then fills in declared
//! defaults.
//!
//! # Risk levels
//!
//! | Risk | Examples | Parallel within a turn |
//! |------|----------|------------------------|
//! | **Low** | `search_jira`, `read_confluence_page` | Yes, when every call in the turn is Low |
//! | **High** | `create_issue`, `delete_confluence_page` | No |

pub mod entities;
pub mod provider;
pub mod traits;
pub mod value_objects;

pub use entities::{ParamType, RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use provider::{ProviderError, ToolProvider};
pub use traits::{DefaultToolValidator, ToolValidator, apply_defaults};
pub use value_objects::{ERROR_MARKER, ToolError, ToolResult, is_error_text};

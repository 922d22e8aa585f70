//! Domain layer for agent-courier
//!
//! This crate contains the core entities and value objects of the
//! coordination system. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool Adapter
//!
//! A stateless operation wrapping one remote API call. Structured input in,
//! human-readable string out; failures are folded into the string
//! (see [`tool`]).
//!
//! ## Domain Agent
//!
//! A bounded set of tools plus a routing policy for one backend system:
//! Jira, Confluence or GitHub (see [`agent`]).
//!
//! ## Coordinator
//!
//! The top-level router that owns no tools, decomposes a request into domain
//! agent invocations and threads data between them (see [`coordination`]).

pub mod agent;
pub mod config;
pub mod coordination;
pub mod core;
pub mod tool;
pub mod tracker;
pub mod util;

// Re-export commonly used types
pub use agent::{
    entities::{BackendSystem, DomainAgent},
    profiles,
    value_objects::{AgentReply, Handoff, ReplyStatus, SubRequest, ToolInvocation, ToolSelection},
};
pub use config::OutputFormat;
pub use coordination::{
    CoordinationOutcome, CoordinationStatus, ExecutionTrace, PlannedStep, RoutePlan, TraceStep,
};
pub use core::{
    error::DomainError,
    request::{ConversationTurn, Request, Speaker},
};
pub use tool::{
    entities::{ParamType, RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    provider::{ProviderError, ToolProvider},
    traits::{DefaultToolValidator, ToolValidator, apply_defaults},
    value_objects::{ERROR_MARKER, ToolError, ToolResult, ToolResultMetadata, is_error_text},
};
pub use tracker::{SprintHealth, StatusCategory, find_by_name};

//! Application layer for agent-courier
//!
//! This crate contains the coordinator and domain agent use cases, the port
//! definitions they depend on, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{CoordinationProgress, NoProgress},
    routing_brain::{BrainError, RoutingBrain},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::coordinate::{CoordinateError, CoordinateUseCase};
pub use use_cases::run_domain_agent::DomainAgentRunner;

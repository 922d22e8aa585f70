//! Routing brain port
//!
//! The "brain" is the pluggable capability that understands natural language:
//! it picks the agents a request needs and, per agent, the tools and their
//! arguments. It can be backed by a rules engine, a hosted language model or a
//! hand-written intent parser; the coordinator only relies on this contract.

use async_trait::async_trait;
use courier_domain::{DomainAgent, Request, RoutePlan, SubRequest, ToolSelection, ToolSpec};
use thiserror::Error;

/// Errors raised while interpreting a request
#[derive(Error, Debug)]
pub enum BrainError {
    #[error("No backend system matches the request")]
    NoMatchingSystem,

    #[error("Could not interpret request: {0}")]
    Unintelligible(String),

    #[error("Routing backend failed: {0}")]
    Backend(String),
}

/// Port for intent classification and parameter extraction
#[async_trait]
pub trait RoutingBrain: Send + Sync {
    /// Decide which agents a request involves, and in which order.
    ///
    /// `agents` lists the profiles the coordinator can dispatch to.
    async fn classify(
        &self,
        request: &Request,
        agents: &[DomainAgent],
    ) -> Result<RoutePlan, BrainError>;

    /// Choose tools and extract their arguments for one agent's sub-request.
    ///
    /// Data present in `sub_request.context` must be used rather than asked
    /// for again.
    async fn select_tools(
        &self,
        agent: &DomainAgent,
        sub_request: &SubRequest,
        tools: &ToolSpec,
    ) -> Result<ToolSelection, BrainError>;
}

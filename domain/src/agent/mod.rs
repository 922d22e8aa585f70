//! Domain agent module
//!
//! A **domain agent** is a bounded tool-using component scoped to exactly one
//! backend system. It owns a closed set of tools and a natural-language policy
//! describing how to use them, and answers only from what those tools return.
//!
//! - [`entities::DomainAgent`] — identity and routing policy
//! - [`entities::BackendSystem`] — Jira, Confluence or GitHub
//! - [`value_objects::SubRequest`] / [`value_objects::Handoff`] — agent input
//! - [`value_objects::AgentReply`] — synthesized, itemized agent output
//! - [`profiles`] — the built-in agent profiles

pub mod entities;
pub mod profiles;
pub mod value_objects;

pub use entities::{BackendSystem, DomainAgent};
pub use value_objects::{
    AgentReply, Handoff, ReplyStatus, SubRequest, ToolInvocation, ToolSelection,
};

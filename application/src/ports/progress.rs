//! Progress notification port
//!
//! Defines the interface for reporting progress while a request is coordinated.

use courier_domain::{BackendSystem, ReplyStatus, RoutePlan, ToolCall};

/// Callback for progress updates during coordination
///
/// Implementations live in the presentation layer (spinners, plain logs).
/// Every method has a no-op default.
pub trait CoordinationProgress: Send + Sync {
    /// Called once the request has been classified
    fn on_plan(&self, _plan: &RoutePlan) {}

    /// Called before a domain agent is invoked
    fn on_agent_start(&self, _agent: BackendSystem, _input: &str) {}

    /// Called before a tool runs
    fn on_tool_start(&self, _agent: BackendSystem, _call: &ToolCall) {}

    /// Called after a tool ran
    fn on_tool_complete(&self, _agent: BackendSystem, _tool: &str, _success: bool) {}

    /// Called after a domain agent replied
    fn on_agent_complete(&self, _agent: BackendSystem, _status: ReplyStatus) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl CoordinationProgress for NoProgress {}

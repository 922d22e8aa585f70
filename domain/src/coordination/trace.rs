//! Execution trace of one coordinated request.

use crate::agent::entities::BackendSystem;
use crate::agent::value_objects::ReplyStatus;
use serde::{Deserialize, Serialize};

/// One agent invocation: what went in, what came out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    pub agent: BackendSystem,
    pub input: String,
    pub output: String,
    pub status: ReplyStatus,
}

/// Ordered record of agent steps for a single request.
///
/// Local to the request that produced it; append-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    steps: Vec<TraceStep>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: TraceStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    pub fn last(&self) -> Option<&TraceStep> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the given agent was invoked during this request
    pub fn invoked(&self, agent: BackendSystem) -> bool {
        self.steps.iter().any(|s| s.agent == agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_records_in_order() {
        let mut trace = ExecutionTrace::new();
        trace.record(TraceStep {
            agent: BackendSystem::Jira,
            input: "get DEMO-5".to_string(),
            output: "Key: DEMO-5".to_string(),
            status: ReplyStatus::Answered,
        });
        trace.record(TraceStep {
            agent: BackendSystem::Confluence,
            input: "create page".to_string(),
            output: "Page created".to_string(),
            status: ReplyStatus::Answered,
        });

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.steps()[0].agent, BackendSystem::Jira);
        assert_eq!(trace.last().unwrap().agent, BackendSystem::Confluence);
        assert!(trace.invoked(BackendSystem::Confluence));
        assert!(!trace.invoked(BackendSystem::GitHub));
    }
}

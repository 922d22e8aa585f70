//! Route plan — which agents a request needs, and in which order.

use crate::agent::entities::BackendSystem;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One domain agent invocation in a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedStep {
    pub system: BackendSystem,
    /// Sub-request text for the agent
    pub instruction: String,
    /// Whether the previous step's output is handed to this step
    pub receives_context: bool,
}

impl PlannedStep {
    pub fn new(system: BackendSystem, instruction: impl Into<String>) -> Self {
        Self {
            system,
            instruction: instruction.into(),
            receives_context: false,
        }
    }

    pub fn receiving_context(mut self) -> Self {
        self.receives_context = true;
        self
    }
}

/// Ordered list of agent steps: source first, destination last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePlan {
    steps: Vec<PlannedStep>,
}

impl RoutePlan {
    /// Build a plan, checking its shape.
    ///
    /// A plan has at least one step, names each system once, and its first
    /// step has nothing to receive context from.
    pub fn new(steps: Vec<PlannedStep>) -> Result<Self, DomainError> {
        let Some(first) = steps.first() else {
            return Err(DomainError::InvalidPlan("plan has no steps".to_string()));
        };
        if first.receives_context {
            return Err(DomainError::InvalidPlan(
                "first step cannot receive context".to_string(),
            ));
        }
        for (i, step) in steps.iter().enumerate() {
            if steps[..i].iter().any(|s| s.system == step.system) {
                return Err(DomainError::InvalidPlan(format!(
                    "{} appears more than once",
                    step.system
                )));
            }
        }
        Ok(Self { steps })
    }

    /// A plan with a single agent
    pub fn single(system: BackendSystem, instruction: impl Into<String>) -> Self {
        Self {
            steps: vec![PlannedStep::new(system, instruction)],
        }
    }

    /// Source → destination plan where the destination receives the source output
    pub fn chain(
        source: (BackendSystem, String),
        destination: (BackendSystem, String),
    ) -> Result<Self, DomainError> {
        Self::new(vec![
            PlannedStep::new(source.0, source.1),
            PlannedStep::new(destination.0, destination.1).receiving_context(),
        ])
    }

    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }

    pub fn is_multi_system(&self) -> bool {
        self.steps.len() > 1
    }

    pub fn systems(&self) -> Vec<BackendSystem> {
        self.steps.iter().map(|s| s.system).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_plan() {
        let plan = RoutePlan::single(BackendSystem::Jira, "list projects");
        assert!(!plan.is_multi_system());
        assert_eq!(plan.systems(), vec![BackendSystem::Jira]);
    }

    #[test]
    fn test_chain_plan() {
        let plan = RoutePlan::chain(
            (BackendSystem::Jira, "get DEMO-5".to_string()),
            (BackendSystem::Confluence, "create page".to_string()),
        )
        .unwrap();
        assert!(plan.is_multi_system());
        assert!(!plan.steps()[0].receives_context);
        assert!(plan.steps()[1].receives_context);
    }

    #[test]
    fn test_empty_plan_rejected() {
        assert!(RoutePlan::new(vec![]).is_err());
    }

    #[test]
    fn test_duplicate_system_rejected() {
        let result = RoutePlan::new(vec![
            PlannedStep::new(BackendSystem::Jira, "a"),
            PlannedStep::new(BackendSystem::Jira, "b"),
        ]);
        assert!(matches!(result, Err(DomainError::InvalidPlan(_))));
    }

    #[test]
    fn test_first_step_context_rejected() {
        let result = RoutePlan::new(vec![
            PlannedStep::new(BackendSystem::Confluence, "a").receiving_context(),
        ]);
        assert!(result.is_err());
    }
}

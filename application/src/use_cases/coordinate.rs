//! Coordinate use case.
//!
//! The coordinator owns no tools. For each request it:
//!
//! 1. asks the routing brain which domain agents are involved and in which
//!    order ([`RoutePlan`]),
//! 2. invokes the source agent,
//! 3. hands the source output, verbatim, to the next agent,
//! 4. stops as soon as a step fails, asks for input, or produces nothing
//!    usable, and
//! 5. returns a single free-text response together with the
//!    [`ExecutionTrace`].
//!
//! ```text
//! Request ──▶ classify ──▶ [Jira] ──(Handoff)──▶ [Confluence] ──▶ response
//!                             │
//!                             └─ Error / question ──▶ halt, skip the rest
//! ```

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::CoordinationProgress;
use crate::ports::routing_brain::{BrainError, RoutingBrain};
use crate::use_cases::run_domain_agent::DomainAgentRunner;
use courier_domain::{
    AgentReply, BackendSystem, CoordinationOutcome, CoordinationStatus, DomainAgent, DomainError,
    ExecutionTrace, Handoff, ReplyStatus, Request, RoutePlan, SubRequest, TraceStep,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that prevent a request from being routed.
///
/// These never escape [`CoordinateUseCase::execute`]; they are rendered into
/// the response of an [`CoordinationStatus::Unrouted`] outcome.
#[derive(Error, Debug)]
pub enum CoordinateError {
    #[error("Could not route the request: {0}")]
    Brain(#[from] BrainError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Use case that routes a request across domain agents.
pub struct CoordinateUseCase {
    agents: BTreeMap<BackendSystem, DomainAgentRunner>,
    brain: Arc<dyn RoutingBrain>,
    params: ExecutionParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl CoordinateUseCase {
    pub fn new(brain: Arc<dyn RoutingBrain>) -> Self {
        Self {
            agents: BTreeMap::new(),
            brain,
            params: ExecutionParams::default(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Register a domain agent. A later registration for the same system
    /// replaces the earlier one.
    pub fn with_agent(mut self, runner: DomainAgentRunner) -> Self {
        self.agents.insert(runner.profile().system(), runner);
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Profiles of the registered agents, in stable order
    pub fn agents(&self) -> Vec<DomainAgent> {
        self.agents.values().map(|r| r.profile().clone()).collect()
    }

    pub fn runner(&self, system: BackendSystem) -> Option<&DomainAgentRunner> {
        self.agents.get(&system)
    }

    /// Classify a request into a route plan over registered agents.
    pub async fn plan(&self, request: &Request) -> Result<RoutePlan, CoordinateError> {
        let plan = self.brain.classify(request, &self.agents()).await?;
        if let Some(missing) = plan.systems().into_iter().find(|s| !self.agents.contains_key(s)) {
            return Err(DomainError::AgentNotRegistered(missing.to_string()).into());
        }
        Ok(plan)
    }

    /// Handle one request end to end.
    pub async fn execute(
        &self,
        request: &Request,
        progress: &dyn CoordinationProgress,
    ) -> CoordinationOutcome {
        info!("Coordinating request");
        self.conversation_logger.log(ConversationEvent::new(
            "request",
            json!({ "text": request.text(), "history_turns": request.history().len() }),
        ));

        let plan = match self.plan(request).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %e, "Request could not be routed");
                let response = format!(
                    "I could not determine which system ({}) this request is about. {}",
                    self.registered_names(),
                    e
                );
                return self.finish(response, CoordinationStatus::Unrouted, ExecutionTrace::new());
            }
        };

        debug!(systems = ?plan.systems(), "Route plan");
        progress.on_plan(&plan);
        self.conversation_logger.log(ConversationEvent::new(
            "route_plan",
            json!({ "steps": plan.steps() }),
        ));

        self.run_plan(&plan, progress).await
    }

    async fn run_plan(
        &self,
        plan: &RoutePlan,
        progress: &dyn CoordinationProgress,
    ) -> CoordinationOutcome {
        let mut trace = ExecutionTrace::new();
        let mut replies: Vec<AgentReply> = Vec::new();
        let steps = plan.steps();

        for (index, step) in steps.iter().enumerate() {
            let Some(runner) = self.agents.get(&step.system) else {
                // plan() only accepts registered systems
                continue;
            };

            let mut sub_request = SubRequest::new(&step.instruction);
            if step.receives_context {
                if let Some(previous) = replies.last() {
                    sub_request =
                        sub_request.with_context(Handoff::new(previous.system, &previous.text));
                }
            }

            progress.on_agent_start(step.system, &step.instruction);
            let reply = runner.handle(&sub_request, &self.params, progress).await;
            progress.on_agent_complete(step.system, reply.status);

            info!(agent = %runner.profile().name(), status = reply.status.as_str(), "Agent step finished");
            trace.record(TraceStep {
                agent: step.system,
                input: sub_request.render(),
                output: reply.text.clone(),
                status: reply.status,
            });
            self.conversation_logger.log(ConversationEvent::new(
                "agent_step",
                json!({
                    "agent": step.system.as_str(),
                    "input": sub_request.render(),
                    "output": reply.text,
                    "status": reply.status.as_str(),
                }),
            ));

            let skipped: Vec<BackendSystem> = steps[index + 1..].iter().map(|s| s.system).collect();

            if reply.status == ReplyStatus::NeedsInput {
                let agent = reply.system;
                replies.push(reply);
                let response = compose_response(&replies, &[]);
                return self.finish(response, CoordinationStatus::AwaitingInput { agent }, trace);
            }

            if !is_forwardable(&reply) {
                let agent = reply.system;
                if !skipped.is_empty() {
                    warn!(agent = %agent, skipped = ?skipped, "Chain halted");
                }
                replies.push(reply);
                let response = compose_response(&replies, &skipped);
                return self.finish(response, CoordinationStatus::Halted { agent, skipped }, trace);
            }

            replies.push(reply);
        }

        let response = compose_response(&replies, &[]);
        self.finish(response, CoordinationStatus::Completed, trace)
    }

    fn finish(
        &self,
        response: String,
        status: CoordinationStatus,
        trace: ExecutionTrace,
    ) -> CoordinationOutcome {
        self.conversation_logger.log(ConversationEvent::new(
            "response",
            json!({ "text": response, "status": status }),
        ));
        CoordinationOutcome {
            response,
            status,
            trace,
        }
    }

    fn registered_names(&self) -> String {
        self.agents
            .keys()
            .map(|s| s.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Whether a reply may be handed to the next agent.
///
/// Decided by the reply status, never by the text: a successful tool output
/// may itself begin with "Error:".
fn is_forwardable(reply: &AgentReply) -> bool {
    reply.status.is_usable() && !reply.text.trim().is_empty()
}

/// Build the single response text from the agent replies collected so far.
///
/// One reply is returned as-is. Several replies are sectioned per system.
fn compose_response(replies: &[AgentReply], skipped: &[BackendSystem]) -> String {
    let mut response = match replies {
        [only] => only.text.clone(),
        _ => replies
            .iter()
            .map(|r| format!("[{}]\n{}", r.system, r.text))
            .collect::<Vec<_>>()
            .join("\n\n"),
    };

    if !skipped.is_empty() {
        let names = skipped
            .iter()
            .map(|s| s.display_name())
            .collect::<Vec<_>>()
            .join(", ");
        let stopped_at = replies.last().map(|r| r.system.display_name()).unwrap_or("");
        response.push_str(&format!(
            "\n\nStopped after {}; nothing was sent to {}.",
            stopped_at, names
        ));
    }

    response
}

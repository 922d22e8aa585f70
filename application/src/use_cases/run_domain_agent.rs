//! Run Domain Agent use case.
//!
//! Handles one sub-request with one backend's tools: ask the routing brain
//! which tools to call, run them, and turn their outputs into an
//! [`AgentReply`].
//!
//! A domain agent never talks to another agent and keeps no state between
//! sub-requests. Its reply is built from tool output only.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::CoordinationProgress;
use crate::ports::routing_brain::RoutingBrain;
use crate::ports::tool_executor::ToolExecutorPort;
use courier_domain::util::preview;
use courier_domain::{
    AgentReply, DomainAgent, SubRequest, ToolCall, ToolInvocation, ToolSelection, ToolSpec,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A domain agent bound to its tools and the shared routing brain.
pub struct DomainAgentRunner {
    profile: DomainAgent,
    tools: Arc<dyn ToolExecutorPort>,
    brain: Arc<dyn RoutingBrain>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl DomainAgentRunner {
    pub fn new(
        profile: DomainAgent,
        tools: Arc<dyn ToolExecutorPort>,
        brain: Arc<dyn RoutingBrain>,
    ) -> Self {
        Self {
            profile,
            tools,
            brain,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn profile(&self) -> &DomainAgent {
        &self.profile
    }

    pub fn tool_spec(&self) -> &ToolSpec {
        self.tools.tool_spec()
    }

    /// Handle one sub-request.
    ///
    /// Never fails: brain errors and tool failures come back as an
    /// [`AgentReply`] whose text carries the `Error: ` marker.
    pub async fn handle(
        &self,
        sub_request: &SubRequest,
        params: &ExecutionParams,
        progress: &dyn CoordinationProgress,
    ) -> AgentReply {
        let system = self.profile.system();
        info!(agent = %self.profile.name(), "Handling sub-request");

        let selection = match self
            .brain
            .select_tools(&self.profile, sub_request, self.tools.tool_spec())
            .await
        {
            Ok(selection) => selection,
            Err(e) => {
                warn!(agent = %self.profile.name(), error = %e, "Tool selection failed");
                return AgentReply::failed(system, e.to_string());
            }
        };

        let calls = match selection {
            ToolSelection::Clarify { question } => {
                debug!(agent = %self.profile.name(), "Asking for clarification");
                return AgentReply::needs_input(system, question);
            }
            ToolSelection::Nothing { reason } => {
                return AgentReply::no_action(system, reason);
            }
            ToolSelection::Calls { calls } => calls,
        };

        let mut calls: Vec<ToolCall> = calls
            .into_iter()
            .map(|call| self.bind_context(call, sub_request))
            .collect();

        let not_attempted = if calls.len() > params.max_calls_per_turn {
            warn!(
                agent = %self.profile.name(),
                requested = calls.len(),
                max = params.max_calls_per_turn,
                "Too many tool calls in one turn, reporting the rest as not attempted"
            );
            calls.split_off(params.max_calls_per_turn)
        } else {
            Vec::new()
        };

        let invocations = if params.parallel_read_only
            && calls.len() > 1
            && calls.iter().all(|c| self.is_read_only(c))
        {
            self.execute_parallel(calls, progress).await
        } else {
            self.execute_sequential(calls, progress).await
        };

        AgentReply::synthesize(system, invocations).with_not_attempted(&not_attempted)
    }

    fn is_read_only(&self, call: &ToolCall) -> bool {
        self.tools
            .get_tool(&call.tool_name)
            .is_some_and(|def| def.is_read_only())
    }

    /// Fill the tool's context parameter with handed-over data when the
    /// brain left it empty.
    fn bind_context(&self, mut call: ToolCall, sub_request: &SubRequest) -> ToolCall {
        let Some(content) = sub_request.context_text() else {
            return call;
        };
        let Some(param) = self
            .tools
            .get_tool(&call.tool_name)
            .and_then(|def| def.context_parameter())
        else {
            return call;
        };

        let missing = call
            .arguments
            .get(&param.name)
            .is_none_or(|v| v.is_null() || v.as_str().is_some_and(|s| s.trim().is_empty()));
        if missing {
            debug!(tool = %call.tool_name, param = %param.name, "Binding handed-over data");
            call.arguments
                .insert(param.name.clone(), json!(content));
        }
        call
    }

    async fn execute_parallel(
        &self,
        calls: Vec<ToolCall>,
        progress: &dyn CoordinationProgress,
    ) -> Vec<ToolInvocation> {
        let system = self.profile.system();
        debug!(agent = %self.profile.name(), count = calls.len(), "Running read-only calls in parallel");

        let mut futures = Vec::new();
        for call in &calls {
            progress.on_tool_start(system, call);
            futures.push(self.tools.execute(call));
        }
        let results = futures::future::join_all(futures).await;

        calls
            .into_iter()
            .zip(results)
            .map(|(call, result)| {
                progress.on_tool_complete(system, &call.tool_name, result.is_success());
                self.log_tool_call(&call, &result.text(), result.is_success());
                ToolInvocation::from_result(call, &result)
            })
            .collect()
    }

    async fn execute_sequential(
        &self,
        calls: Vec<ToolCall>,
        progress: &dyn CoordinationProgress,
    ) -> Vec<ToolInvocation> {
        let system = self.profile.system();
        let mut invocations = Vec::with_capacity(calls.len());

        for call in calls {
            progress.on_tool_start(system, &call);
            let result = self.tools.execute(&call).await;
            progress.on_tool_complete(system, &call.tool_name, result.is_success());
            self.log_tool_call(&call, &result.text(), result.is_success());
            invocations.push(ToolInvocation::from_result(call, &result));
        }

        invocations
    }

    fn log_tool_call(&self, call: &ToolCall, text: &str, success: bool) {
        if !success {
            warn!(tool = %call.tool_name, "Tool call failed: {}", preview(text, 200));
        }
        self.conversation_logger.log(ConversationEvent::new(
            "tool_call",
            json!({
                "agent": self.profile.system().as_str(),
                "tool": call.tool_name,
                "arguments": call.arguments,
                "success": success,
                "output": text,
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::ports::routing_brain::BrainError;
    use async_trait::async_trait;
    use courier_domain::{
        BackendSystem, Handoff, ReplyStatus, Request, RiskLevel, RoutePlan, ToolDefinition,
        ToolError, ToolParameter, ToolResult, profiles,
    };
    use std::sync::Mutex;
    use std::time::Duration;

    struct FixedBrain {
        selection: Result<ToolSelection, String>,
    }

    #[async_trait]
    impl RoutingBrain for FixedBrain {
        async fn classify(
            &self,
            _request: &Request,
            _agents: &[DomainAgent],
        ) -> Result<RoutePlan, BrainError> {
            Err(BrainError::NoMatchingSystem)
        }

        async fn select_tools(
            &self,
            _agent: &DomainAgent,
            _sub_request: &SubRequest,
            _tools: &ToolSpec,
        ) -> Result<ToolSelection, BrainError> {
            self.selection
                .clone()
                .map_err(BrainError::Unintelligible)
        }
    }

    /// Records calls; fails any call whose `key` argument is "BAD-1".
    struct RecordingTools {
        spec: ToolSpec,
        calls: Mutex<Vec<ToolCall>>,
        in_flight: Mutex<(usize, usize)>,
    }

    impl RecordingTools {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new()
                    .register(
                        ToolDefinition::new("get_ticket_details", "Details", RiskLevel::Low)
                            .with_parameter(ToolParameter::new("key", "Issue key", true)),
                    )
                    .register(
                        ToolDefinition::new("comment_on_ticket", "Comment", RiskLevel::High)
                            .with_parameter(ToolParameter::new("key", "Issue key", true))
                            .with_parameter(
                                ToolParameter::new("comment", "Body", true).accepting_context(),
                            ),
                    ),
                calls: Mutex::new(Vec::new()),
                in_flight: Mutex::new((0, 0)),
            }
        }

        fn recorded(&self) -> Vec<ToolCall> {
            self.calls.lock().unwrap().clone()
        }

        fn max_in_flight(&self) -> usize {
            self.in_flight.lock().unwrap().1
        }
    }

    #[async_trait]
    impl ToolExecutorPort for RecordingTools {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            self.calls.lock().unwrap().push(call.clone());
            {
                let mut guard = self.in_flight.lock().unwrap();
                guard.0 += 1;
                guard.1 = guard.1.max(guard.0);
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.in_flight.lock().unwrap().0 -= 1;

            match call.get_string("key") {
                Some("BAD-1") => ToolResult::failure(
                    &call.tool_name,
                    ToolError::not_found("Issue BAD-1 does not exist"),
                ),
                Some(key) => ToolResult::success(&call.tool_name, format!("Key: {}", key)),
                None => ToolResult::failure(&call.tool_name, ToolError::invalid_argument("no key")),
            }
        }
    }

    fn runner(selection: Result<ToolSelection, String>, tools: Arc<RecordingTools>) -> DomainAgentRunner {
        DomainAgentRunner::new(
            profiles::jira_agent(),
            tools,
            Arc::new(FixedBrain { selection }),
        )
    }

    fn details(key: &str) -> ToolCall {
        ToolCall::new("get_ticket_details").with_arg("key", key)
    }

    #[tokio::test]
    async fn test_single_call_is_verbatim() {
        let tools = Arc::new(RecordingTools::new());
        let runner = runner(Ok(ToolSelection::calls(vec![details("DEMO-5")])), tools.clone());

        let reply = runner
            .handle(&SubRequest::new("details of DEMO-5"), &ExecutionParams::default(), &NoProgress)
            .await;

        assert_eq!(reply.status, ReplyStatus::Answered);
        assert_eq!(reply.text, "Key: DEMO-5");
        assert_eq!(tools.recorded().len(), 1);
    }

    #[tokio::test]
    async fn test_clarify_invokes_nothing() {
        let tools = Arc::new(RecordingTools::new());
        let runner = runner(Ok(ToolSelection::clarify("Which project?")), tools.clone());

        let reply = runner
            .handle(&SubRequest::new("create a ticket"), &ExecutionParams::default(), &NoProgress)
            .await;

        assert_eq!(reply.status, ReplyStatus::NeedsInput);
        assert_eq!(reply.text, "Which project?");
        assert!(tools.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_nothing_returns_reason() {
        let tools = Arc::new(RecordingTools::new());
        let runner = runner(Ok(ToolSelection::nothing("No Jira tool fits")), tools.clone());

        let reply = runner
            .handle(&SubRequest::new("order pizza"), &ExecutionParams::default(), &NoProgress)
            .await;

        assert_eq!(reply.status, ReplyStatus::NoAction);
        assert_eq!(reply.text, "No Jira tool fits");
    }

    #[tokio::test]
    async fn test_brain_error_becomes_error_text() {
        let tools = Arc::new(RecordingTools::new());
        let runner = runner(Err("garbled".to_string()), tools);

        let reply = runner
            .handle(&SubRequest::new("???"), &ExecutionParams::default(), &NoProgress)
            .await;

        assert_eq!(reply.status, ReplyStatus::Failed);
        assert!(reply.text.starts_with("Error: "));
    }

    #[tokio::test]
    async fn test_partial_failure_reported_per_item() {
        let tools = Arc::new(RecordingTools::new());
        let runner = runner(
            Ok(ToolSelection::calls(vec![details("DEMO-1"), details("BAD-1")])),
            tools,
        );

        let reply = runner
            .handle(&SubRequest::new("details"), &ExecutionParams::default(), &NoProgress)
            .await;

        assert_eq!(reply.status, ReplyStatus::Partial);
        assert!(reply.text.contains("[ok]"));
        assert!(reply.text.contains("Error: Issue BAD-1 does not exist"));
    }

    #[tokio::test]
    async fn test_read_only_calls_run_concurrently() {
        let tools = Arc::new(RecordingTools::new());
        let runner = runner(
            Ok(ToolSelection::calls(vec![details("DEMO-1"), details("DEMO-2"), details("DEMO-3")])),
            tools.clone(),
        );

        runner
            .handle(&SubRequest::new("details"), &ExecutionParams::default(), &NoProgress)
            .await;
        assert!(tools.max_in_flight() > 1);
    }

    #[tokio::test]
    async fn test_mutating_calls_run_sequentially() {
        let tools = Arc::new(RecordingTools::new());
        let calls = vec![
            details("DEMO-1"),
            ToolCall::new("comment_on_ticket")
                .with_arg("key", "DEMO-1")
                .with_arg("comment", "hi"),
        ];
        let runner = runner(Ok(ToolSelection::calls(calls)), tools.clone());

        runner
            .handle(&SubRequest::new("comment"), &ExecutionParams::default(), &NoProgress)
            .await;
        assert_eq!(tools.max_in_flight(), 1);
        assert_eq!(tools.recorded()[1].tool_name, "comment_on_ticket");
    }

    #[tokio::test]
    async fn test_max_calls_per_turn() {
        let tools = Arc::new(RecordingTools::new());
        let runner = runner(
            Ok(ToolSelection::calls(vec![details("DEMO-1"), details("DEMO-2"), details("DEMO-3")])),
            tools.clone(),
        );
        let params = ExecutionParams::default().with_max_calls_per_turn(2);

        let reply = runner.handle(&SubRequest::new("details"), &params, &NoProgress).await;
        assert_eq!(tools.recorded().len(), 2);

        // The dropped call is reported, not silently lost
        assert_eq!(reply.status, ReplyStatus::Partial);
        assert!(reply.text.contains("Not attempted (1 over the per-turn call limit)"));
        assert!(reply.text.contains("DEMO-3"));
        assert!(reply.status.is_usable());
    }

    #[tokio::test]
    async fn test_handed_over_data_bound_to_context_parameter() {
        let tools = Arc::new(RecordingTools::new());
        let call = ToolCall::new("comment_on_ticket").with_arg("key", "DEMO-7");
        let runner = runner(Ok(ToolSelection::calls(vec![call])), tools.clone());

        let data = "Title: Release notes\nContent: <p>v1.2</p>";
        let sub = SubRequest::new("comment the page on DEMO-7")
            .with_context(Handoff::new(BackendSystem::Confluence, data));

        runner.handle(&sub, &ExecutionParams::default(), &NoProgress).await;

        let recorded = tools.recorded();
        assert_eq!(recorded[0].get_string("comment"), Some(data));
    }
}

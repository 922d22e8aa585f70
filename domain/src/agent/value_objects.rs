//! Agent domain value objects - immutable types flowing through a domain agent turn.
//!
//! # Input
//! - [`SubRequest`] - the slice of a request scoped to one backend system,
//!   optionally carrying a [`Handoff`] from an earlier agent
//!
//! # Decision
//! - [`ToolSelection`] - what the routing brain chose to do
//!
//! # Output
//! - [`ToolInvocation`] - one executed tool call and its text
//! - [`AgentReply`] - the synthesized answer plus a [`ReplyStatus`]

use super::entities::BackendSystem;
use crate::tool::entities::ToolCall;
use crate::tool::value_objects::{ERROR_MARKER, ToolResult};
use serde::{Deserialize, Serialize};

/// Data obtained by one agent and carried, verbatim, to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handoff {
    pub from: BackendSystem,
    pub content: String,
}

impl Handoff {
    pub fn new(from: BackendSystem, content: impl Into<String>) -> Self {
        Self {
            from,
            content: content.into(),
        }
    }
}

/// The part of a request addressed to a single domain agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Handoff>,
}

impl SubRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, handoff: Handoff) -> Self {
        self.context = Some(handoff);
        self
    }

    /// Content handed over from the previous agent, if any
    pub fn context_text(&self) -> Option<&str> {
        self.context.as_ref().map(|h| h.content.as_str())
    }

    /// Single-string form of the sub-request, as recorded in the trace.
    ///
    /// The handed-over content is embedded byte-for-byte.
    pub fn render(&self) -> String {
        match &self.context {
            Some(handoff) => format!(
                "{}\n\n--- Data from {} ---\n{}\n--- End of data ---",
                self.text, handoff.from, handoff.content
            ),
            None => self.text.clone(),
        }
    }
}

/// Outcome of tool selection for one sub-request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolSelection {
    /// Invoke these tools, in order
    Calls { calls: Vec<ToolCall> },
    /// Ask the user for something that is neither in the request nor in the context
    Clarify { question: String },
    /// No tool applies; the reason is returned to the caller
    Nothing { reason: String },
}

impl ToolSelection {
    pub fn calls(calls: Vec<ToolCall>) -> Self {
        ToolSelection::Calls { calls }
    }

    pub fn clarify(question: impl Into<String>) -> Self {
        ToolSelection::Clarify {
            question: question.into(),
        }
    }

    pub fn nothing(reason: impl Into<String>) -> Self {
        ToolSelection::Nothing {
            reason: reason.into(),
        }
    }
}

/// One tool call executed during an agent turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub call: ToolCall,
    pub success: bool,
    pub text: String,
}

impl ToolInvocation {
    pub fn from_result(call: ToolCall, result: &ToolResult) -> Self {
        Self {
            call,
            success: result.is_success(),
            text: result.text(),
        }
    }
}

/// How a domain agent turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    /// Every invoked tool succeeded
    Answered,
    /// Some calls succeeded while others failed or were never run; the reply
    /// is itemized
    Partial,
    /// The agent needs information from the user
    NeedsInput,
    /// No tool was applicable
    NoAction,
    /// Every invoked tool failed
    Failed,
}

impl ReplyStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ReplyStatus::Answered => "answered",
            ReplyStatus::Partial => "partial",
            ReplyStatus::NeedsInput => "needs_input",
            ReplyStatus::NoAction => "no_action",
            ReplyStatus::Failed => "failed",
        }
    }

    /// Whether the reply holds data another agent may build on
    pub fn is_usable(&self) -> bool {
        matches!(self, ReplyStatus::Answered | ReplyStatus::Partial)
    }
}

/// The textual answer of one domain agent turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReply {
    pub system: BackendSystem,
    pub status: ReplyStatus,
    pub text: String,
    #[serde(default)]
    pub invocations: Vec<ToolInvocation>,
}

impl AgentReply {
    pub fn needs_input(system: BackendSystem, question: impl Into<String>) -> Self {
        Self {
            system,
            status: ReplyStatus::NeedsInput,
            text: question.into(),
            invocations: Vec::new(),
        }
    }

    pub fn no_action(system: BackendSystem, reason: impl Into<String>) -> Self {
        Self {
            system,
            status: ReplyStatus::NoAction,
            text: reason.into(),
            invocations: Vec::new(),
        }
    }

    pub fn failed(system: BackendSystem, message: impl Into<String>) -> Self {
        let message = message.into();
        let text = if message.starts_with(ERROR_MARKER) {
            message
        } else {
            format!("{}{}", ERROR_MARKER, message)
        };
        Self {
            system,
            status: ReplyStatus::Failed,
            text,
            invocations: Vec::new(),
        }
    }

    /// Build the reply from executed calls, using tool output only.
    ///
    /// A single call is returned verbatim. Several calls are itemized, and a
    /// mix of successes and failures is reported per item rather than
    /// collapsed into one verdict.
    pub fn synthesize(system: BackendSystem, invocations: Vec<ToolInvocation>) -> Self {
        let total = invocations.len();
        let succeeded = invocations.iter().filter(|i| i.success).count();

        let (status, text) = match (total, succeeded) {
            (0, _) => (
                ReplyStatus::NoAction,
                format!("No {} tool was invoked.", system),
            ),
            (1, 1) => (ReplyStatus::Answered, invocations[0].text.clone()),
            (1, _) => (ReplyStatus::Failed, invocations[0].text.clone()),
            (n, s) if s == n => (ReplyStatus::Answered, itemize(&invocations, false)),
            (n, 0) => (
                ReplyStatus::Failed,
                format!(
                    "{}All {} {} calls failed:\n{}",
                    ERROR_MARKER,
                    n,
                    system,
                    itemize(&invocations, false)
                ),
            ),
            (n, s) => (
                ReplyStatus::Partial,
                format!(
                    "{} of {} {} calls succeeded:\n{}",
                    s,
                    n,
                    system,
                    itemize(&invocations, true)
                ),
            ),
        };

        Self {
            system,
            status,
            text,
            invocations,
        }
    }

    /// Report calls the agent selected but never ran.
    ///
    /// An answer with skipped calls is only partial; a failed reply stays
    /// failed.
    pub fn with_not_attempted(mut self, calls: &[ToolCall]) -> Self {
        if calls.is_empty() {
            return self;
        }

        if self.status == ReplyStatus::Answered {
            self.status = ReplyStatus::Partial;
        }

        let items = calls
            .iter()
            .map(|call| {
                let args = serde_json::to_string(&call.arguments).unwrap_or_default();
                format!("- {} {}", call.tool_name, args)
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.text = format!(
            "{}\n\nNot attempted ({} over the per-turn call limit):\n{}",
            self.text,
            calls.len(),
            items
        );
        self
    }
}

fn itemize(invocations: &[ToolInvocation], mark: bool) -> String {
    invocations
        .iter()
        .enumerate()
        .map(|(i, inv)| {
            let marker = match (mark, inv.success) {
                (false, _) => "",
                (true, true) => " [ok]",
                (true, false) => " [failed]",
            };
            format!("{}. {}{}:\n{}", i + 1, inv.call.tool_name, marker, inv.text)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

//! Result of a coordinated request.

use super::trace::ExecutionTrace;
use crate::agent::entities::BackendSystem;
use serde::{Deserialize, Serialize};

/// How the coordinator's state machine ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CoordinationStatus {
    /// Every planned step ran
    Completed,
    /// A step asked the user for more information; later steps were skipped
    AwaitingInput { agent: BackendSystem },
    /// A step failed or produced nothing usable; later steps were skipped
    Halted {
        agent: BackendSystem,
        skipped: Vec<BackendSystem>,
    },
    /// The request could not be routed to any agent
    Unrouted,
}

impl CoordinationStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, CoordinationStatus::Completed)
    }
}

/// The single free-text response returned to the caller, with its trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationOutcome {
    pub response: String,
    pub status: CoordinationStatus,
    pub trace: ExecutionTrace,
}

//! Execution parameters — use case loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control how a
//! domain agent runs its tools. These are application-layer concerns, not
//! domain policy.

use serde::{Deserialize, Serialize};

/// Tool execution control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Run independent read-only calls of one agent turn concurrently.
    pub parallel_read_only: bool,
    /// Upper bound on tool calls executed in a single agent turn.
    pub max_calls_per_turn: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            parallel_read_only: true,
            max_calls_per_turn: 10,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_parallel_read_only(mut self, enabled: bool) -> Self {
        self.parallel_read_only = enabled;
        self
    }

    pub fn with_max_calls_per_turn(mut self, max: usize) -> Self {
        self.max_calls_per_turn = max;
        self
    }
}

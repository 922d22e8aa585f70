//! Execution configuration from TOML (`[execution]` section)

use courier_application::ExecutionParams;
use serde::{Deserialize, Serialize};

/// Raw execution configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Run read-only tool calls of one agent turn concurrently
    pub parallel_read_only: bool,
    /// Upper bound on tool calls per agent turn
    pub max_calls_per_turn: usize,
    /// HTTP timeout for backend requests
    pub http_timeout_seconds: u64,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            parallel_read_only: params.parallel_read_only,
            max_calls_per_turn: params.max_calls_per_turn,
            http_timeout_seconds: 30,
        }
    }
}

impl FileExecutionConfig {
    pub fn to_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_parallel_read_only(self.parallel_read_only)
            .with_max_calls_per_turn(self.max_calls_per_turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_params() {
        let config = FileExecutionConfig {
            parallel_read_only: false,
            max_calls_per_turn: 2,
            http_timeout_seconds: 5,
        };
        let params = config.to_params();
        assert!(!params.parallel_read_only);
        assert_eq!(params.max_calls_per_turn, 2);
    }
}

//! Application-level configuration.
//!
//! - [`ExecutionParams`] — tool execution control (parallelism, call limits)

pub mod execution_params;

pub use execution_params::ExecutionParams;

//! Interactive chat module
//!
//! Provides a line-editor based chat interface over the coordinator.

mod repl;

pub use repl::ChatRepl;

//! Coordination module — the data the coordinator works with.
//!
//! ```text
//! Request ──classify──▶ RoutePlan ──invoke steps──▶ ExecutionTrace ──▶ CoordinationOutcome
//!                        (source → destination)      ({agent, input, output}*)
//! ```
//!
//! Transitions are strictly forward: a step that fails, asks for input or
//! yields nothing usable ends the chain.

pub mod outcome;
pub mod plan;
pub mod trace;

pub use outcome::{CoordinationOutcome, CoordinationStatus};
pub use plan::{PlannedStep, RoutePlan};
pub use trace::{ExecutionTrace, TraceStep};

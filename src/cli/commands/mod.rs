//! CLI command implementations (facade).
//!
//! Re-exports the command surface used by `run.rs`. Implementations live in
//! `commands/*`.

mod common;
mod diff;
mod json_emit;
mod risk;
mod workflow;

pub use diff::execute_diff_command;
pub use risk::execute_risk_command;
pub use workflow::execute_workflow_command;

pub(crate) use json_emit::{DiffJsonOutput, RiskJsonOutput, WorkflowJsonOutput};

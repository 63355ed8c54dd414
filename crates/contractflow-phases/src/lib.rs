//! Contract lifecycle workflow
//!
//! A [`WorkflowGraph`] is a fixed, ordered list of phases, each with ordered
//! sub-phases. Its leaves form one total order. The [`PhaseStateMachine`]
//! walks that order: forward progression through [`PhaseStateMachine::advance`]
//! is gated by approvals, while [`PhaseStateMachine::jump_to`] navigates
//! freely without touching any node status.

pub mod graph;
pub mod machine;

pub use graph::{EntryRule, PhaseNode, SubPhaseNode, WorkflowGraph, WorkflowNode, contract_lifecycle};
pub use machine::{PhaseStateMachine, TransitionKind, TransitionRecord};

//! Approval gates for contractflow
//!
//! An [`ApprovalSet`] tracks the approvers assigned to one draft. Its
//! [`ApprovalSummary::can_advance`] flag is the single gating contract the
//! workflow consults: true only when every assigned approver has approved
//! and at least one approver is assigned.

pub mod approver;
pub mod registry;
pub mod set;
pub mod types;

// Re-exports for convenience
pub use approver::{Approver, Identity, StatusChange};
pub use registry::{ApprovalRegistry, GateSource};
pub use set::{ApprovalSet, ApprovalSummary};
pub use types::{GateCondition, GateResult};

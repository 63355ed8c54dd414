//! Status output generation for contractflow.
//!
//! Builds a [`WorkspaceStatus`] snapshot of a project workspace and emits it
//! as canonical JSON (JCS, RFC 8785) so repeated renders of the same state
//! are byte-identical apart from `emitted_at`.

pub mod status;

pub use status::{
    ApprovalEntry, ConfigValue, DraftEntry, NodeEntry, NodeKind, STATUS_SCHEMA_VERSION,
    StatusInputs, StatusManager, WorkspaceStatus,
};

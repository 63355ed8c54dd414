//! contractflow - contract lifecycle core
//!
//! Moves a contract through a fixed lifecycle of phases and sub-phases,
//! gates forward progress on unanimous approval, keeps a registry of
//! drafts derived from a baseline, and compares drafts with a diff engine
//! that feeds a clause-aware risk indicator.
//!
//! contractflow can be used in two ways:
//! - **CLI**: `contractflow diff`, `contractflow risk`, `contractflow workflow`
//! - **Library**: open a [`Workspace`] and drive it through its methods
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Line diff of two contract drafts
//! contractflow diff msa-v1.txt msa-v2.txt
//!
//! # Risk indicator with a custom clause taxonomy
//! contractflow risk msa-v1.txt msa-v2.txt --taxonomy taxonomy.toml --json
//!
//! # Lifecycle order and approval gates
//! contractflow workflow
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust
//! use contractflow::{Approver, ApprovalStatus, ContractId, NodeId, Workspace};
//!
//! let contract = ContractId::new("msa-7");
//! let mut ws = Workspace::open("proj-1", &contract, "1. Payment within 30 days.\n");
//! let base = ws.drafts().baseline_for(&contract).unwrap().id().clone();
//! let edit = ws.save_edit(&base, "1. Payment within 60 days.\n").unwrap();
//!
//! ws.add_approver(&edit.draft_id, Approver::new("legal", "Dana", "Counsel")).unwrap();
//! ws.bind_approval(&NodeId::new("approval"), &edit.draft_id).unwrap();
//! ws.set_approval(&edit.draft_id, &"legal".into(), ApprovalStatus::Approved, None).unwrap();
//!
//! ws.advance().unwrap(); // drafting -> comparison
//! ws.advance().unwrap(); // comparison -> approval
//! ws.advance().unwrap(); // approval -> execution (gate open)
//! assert_eq!(ws.machine().position().as_str(), "execution");
//! ```
//!
//! # JSON Contracts
//!
//! Status snapshots and CLI `--json` output are emitted in JCS (RFC 8785)
//! canonical form. Use [`emit_jcs`] for your own integrations.

// ============================================================================
// Stable Public API
// ============================================================================

/// The project workspace: single owner of workflow, draft and approval state.
pub use workspace::{SaveOutcome, Workspace};

/// External collaborators the core talks to through traits.
pub use collaborators::{
    CannedGenerator, DocumentStore, IdentityProvider, MemoryStore, PromptContext, StaticIdentity,
    TextGenerator,
};

/// Configuration with discovery and precedence:
/// CLI arguments > config file > built-in defaults.
///
/// Use [`Config::discover()`] for CLI-like behavior or [`Config::builder()`]
/// for programmatic configuration.
pub use contractflow_config::{CliArgs, Config, ConfigBuilder};

/// Library-level error type.
///
/// Library code returns `ContractFlowError` and does NOT call
/// `std::process::exit()`.
pub use contractflow_utils::error::ContractFlowError;

pub use contractflow_utils::error::{ErrorCategory, UserFriendlyError};

/// Exit codes matching the documented exit code table.
pub use contractflow_utils::exit_codes::ExitCode;

/// JCS (RFC 8785) canonical JSON emission.
pub use contractflow_utils::canonicalization::emit_jcs;

pub use contractflow_utils::types::{
    ApprovalStatus, ApproverId, ContractId, DraftId, NodeId, NodeStatus, ProjectStatus,
};

pub use contractflow_diff::{
    DiffLimits, DiffResult, DiffSegment, DiffStats, Granularity, InlineLine, SegmentKind, diff,
    diff_bytes, inline_changes, refine_lines, render_unified,
};
pub use contractflow_drafts::{Draft, DraftRegistry, DraftRole, RegisterOptions};
pub use contractflow_gate::{
    ApprovalRegistry, ApprovalSet, ApprovalSummary, Approver, GateResult, GateSource, Identity,
    StatusChange,
};
pub use contractflow_phases::{
    PhaseNode, PhaseStateMachine, SubPhaseNode, TransitionKind, TransitionRecord, WorkflowGraph,
    contract_lifecycle,
};
pub use contractflow_risk::{ClauseCategory, ClauseTaxonomy, RiskAssessment, RiskLevel, score};
pub use contractflow_status::WorkspaceStatus;

// ============================================================================
// Internal modules - accessible but not stable
// ============================================================================

#[doc(hidden)]
pub use contractflow_utils::{canonicalization, error, exit_codes, hash, logging, types};

#[doc(hidden)]
pub use contractflow_config as config;
#[doc(hidden)]
pub use contractflow_diff as diff_engine;
#[doc(hidden)]
pub use contractflow_drafts as drafts;
#[doc(hidden)]
pub use contractflow_gate as gate;
#[doc(hidden)]
pub use contractflow_phases as phases;
#[doc(hidden)]
pub use contractflow_risk as risk;
#[doc(hidden)]
pub use contractflow_status as status;

pub mod collaborators;
pub mod workspace;

// CLI module - used by main.rs, exported for white-box testing of flag parsing
#[doc(hidden)]
pub mod cli;

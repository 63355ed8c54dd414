//! Workspace status snapshot.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use contractflow_drafts::{DraftRegistry, DraftRole};
use contractflow_gate::{ApprovalRegistry, ApprovalSummary, Approver};
use contractflow_phases::{PhaseStateMachine, TransitionRecord};
use contractflow_utils::canonicalization::emit_jcs;
use contractflow_utils::types::{ContractId, DraftId, NodeId, NodeStatus, ProjectStatus};
use serde::{Deserialize, Serialize};

pub const STATUS_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Phase,
    SubPhase,
}

/// One workflow node, in graph order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    pub status: NodeStatus,
    pub gated: bool,
}

/// Approval state of one draft under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalEntry {
    pub draft_id: DraftId,
    /// Gated nodes currently bound to this draft.
    pub bound_to: Vec<NodeId>,
    pub summary: ApprovalSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_message: Option<String>,
    pub approvers: Vec<Approver>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEntry {
    pub id: DraftId,
    pub contract_id: ContractId,
    pub role: DraftRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<DraftId>,
    pub blake3_first8: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    pub value: String,
    pub source: String,
}

/// Snapshot of an open project workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceStatus {
    pub schema_version: String,
    pub emitted_at: DateTime<Utc>,
    pub project_id: String,
    pub project_status: ProjectStatus,
    pub current_phase: NodeId,
    pub position: NodeId,
    pub nodes: Vec<NodeEntry>,
    pub approvals: Vec<ApprovalEntry>,
    pub drafts: Vec<DraftEntry>,
    pub history: Vec<TransitionRecord>,
    pub effective_config: BTreeMap<String, ConfigValue>,
}

/// Borrowed workspace state the snapshot is built from.
#[derive(Debug, Clone, Copy)]
pub struct StatusInputs<'a> {
    pub project_id: &'a str,
    pub machine: &'a PhaseStateMachine,
    pub approvals: &'a ApprovalRegistry,
    pub drafts: &'a DraftRegistry,
}

pub struct StatusManager;

impl StatusManager {
    /// Build a snapshot. Lists are in a stable order: nodes in graph order,
    /// approvals by draft id, drafts by contract then creation order.
    #[must_use]
    pub fn generate(
        inputs: StatusInputs<'_>,
        effective_config: BTreeMap<String, (String, String)>,
    ) -> WorkspaceStatus {
        let machine = inputs.machine;

        let mut nodes = Vec::new();
        for phase in machine.graph().phases() {
            nodes.push(NodeEntry {
                id: phase.id().clone(),
                label: phase.label().to_string(),
                kind: NodeKind::Phase,
                parent: None,
                status: phase.status(),
                gated: false,
            });
            for sub in phase.sub_phases() {
                nodes.push(NodeEntry {
                    id: sub.id().clone(),
                    label: sub.label().to_string(),
                    kind: NodeKind::SubPhase,
                    parent: Some(phase.id().clone()),
                    status: sub.status(),
                    gated: sub.is_gated(),
                });
            }
        }

        let approvals = inputs
            .approvals
            .sets()
            .map(|set| {
                let summary = set.summary();
                ApprovalEntry {
                    draft_id: set.draft_id().clone(),
                    bound_to: inputs
                        .approvals
                        .bindings()
                        .filter(|(_, draft)| *draft == set.draft_id())
                        .map(|(node, _)| node.clone())
                        .collect(),
                    summary,
                    blocking_message: summary.blocking_message(),
                    approvers: set.approvers().to_vec(),
                }
            })
            .collect();

        let mut drafts: Vec<DraftEntry> = inputs
            .drafts
            .iter()
            .map(|draft| DraftEntry {
                id: draft.id().clone(),
                contract_id: draft.contract_id().clone(),
                role: draft.role(),
                parent_id: draft.parent_id().cloned(),
                blake3_first8: draft.short_hash().to_string(),
                created_at: draft.created_at(),
            })
            .collect();
        drafts.sort_by(|a, b| a.contract_id.cmp(&b.contract_id));

        let effective_config = effective_config
            .into_iter()
            .map(|(key, (value, source))| (key, ConfigValue { value, source }))
            .collect();

        WorkspaceStatus {
            schema_version: STATUS_SCHEMA_VERSION.to_string(),
            emitted_at: Utc::now(),
            project_id: inputs.project_id.to_string(),
            project_status: machine.project_status(),
            current_phase: machine.current_phase().id().clone(),
            position: machine.position().clone(),
            nodes,
            approvals,
            drafts,
            history: machine.history().to_vec(),
            effective_config,
        }
    }

    /// Emit a snapshot as JCS-canonical JSON.
    pub fn emit_json(status: &WorkspaceStatus) -> Result<String> {
        emit_jcs(status).context("Failed to emit workspace status")
    }
}

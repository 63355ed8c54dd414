//! JSON output types and emit functions for CLI output
//!
//! All CLI JSON is emitted as canonical JSON using JCS (RFC 8785) for
//! stable, deterministic output.

use anyhow::{Context, Result};
use contractflow_diff::{DiffSegment, DiffStats, Granularity};
use contractflow_phases::WorkflowGraph;
use contractflow_risk::RiskAssessment;
use contractflow_status::{NodeEntry, NodeKind};
use serde::Serialize;

use crate::emit_jcs;

pub const CLI_SCHEMA_VERSION: &str = "1";

/// `contractflow diff --json`
#[derive(Debug, Clone, Serialize)]
pub struct DiffJsonOutput {
    pub schema_version: String,
    pub original: String,
    pub modified: String,
    pub granularity: Granularity,
    pub identical: bool,
    pub stats: DiffStats,
    pub segments: Vec<DiffSegment>,
}

/// `contractflow risk --json`
#[derive(Debug, Clone, Serialize)]
pub struct RiskJsonOutput {
    pub schema_version: String,
    pub original: String,
    pub modified: String,
    /// Where the clause taxonomy came from: a file path, `config` or `default`.
    pub taxonomy_source: String,
    pub assessment: RiskAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

/// `contractflow workflow --json`
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowJsonOutput {
    pub schema_version: String,
    /// Leaf ids in the order `advance()` walks them.
    pub order: Vec<String>,
    pub nodes: Vec<NodeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_phase: Option<String>,
}

impl WorkflowJsonOutput {
    pub fn from_graph(graph: &WorkflowGraph) -> Self {
        let mut nodes = Vec::new();
        for phase in graph.phases() {
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

        Self {
            schema_version: CLI_SCHEMA_VERSION.to_string(),
            order: graph.leaves().into_iter().map(ToString::to_string).collect(),
            nodes,
            activation_phase: graph.activation_phase().map(|p| p.id().to_string()),
        }
    }
}

pub fn emit_diff_json(output: &DiffJsonOutput) -> Result<String> {
    emit_jcs(output).context("Failed to emit diff JSON")
}

pub fn emit_risk_json(output: &RiskJsonOutput) -> Result<String> {
    emit_jcs(output).context("Failed to emit risk JSON")
}

pub fn emit_workflow_json(output: &WorkflowJsonOutput) -> Result<String> {
    emit_jcs(output).context("Failed to emit workflow JSON")
}

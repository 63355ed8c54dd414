//! Workflow graph: phases, sub-phases and their fixed order.

use std::collections::HashSet;

use contractflow_utils::error::TransitionError;
use contractflow_utils::types::{NodeId, NodeStatus};
use serde::{Deserialize, Serialize};
use strum::Display;

/// How a phase may be entered during forward progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EntryRule {
    /// Reached by plain `advance()`.
    #[default]
    Advance,
    /// Reached only through contract activation.
    Activation,
}

/// A step inside a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubPhaseNode {
    id: NodeId,
    label: String,
    status: NodeStatus,
    /// Leaving this step forward requires unanimous approval.
    gated: bool,
}

impl SubPhaseNode {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            status: NodeStatus::Pending,
            gated: false,
        }
    }

    /// An approval-bearing step.
    pub fn gated(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            gated: true,
            ..Self::new(id, label)
        }
    }

    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn status(&self) -> NodeStatus {
        self.status
    }

    #[must_use]
    pub fn is_gated(&self) -> bool {
        self.gated
    }
}

/// A top-level lifecycle stage. A phase without sub-phases is itself a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseNode {
    id: NodeId,
    label: String,
    status: NodeStatus,
    entry: EntryRule,
    sub_phases: Vec<SubPhaseNode>,
}

impl PhaseNode {
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            status: NodeStatus::Pending,
            entry: EntryRule::Advance,
            sub_phases: Vec::new(),
        }
    }

    #[must_use]
    pub fn entered_by(mut self, entry: EntryRule) -> Self {
        self.entry = entry;
        self
    }

    #[must_use]
    pub fn with_sub_phase(mut self, sub_phase: SubPhaseNode) -> Self {
        self.sub_phases.push(sub_phase);
        self
    }

    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn status(&self) -> NodeStatus {
        self.status
    }

    #[must_use]
    pub fn entry(&self) -> EntryRule {
        self.entry
    }

    #[must_use]
    pub fn sub_phases(&self) -> &[SubPhaseNode] {
        &self.sub_phases
    }
}

/// Any node of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowNode<'a> {
    Phase(&'a PhaseNode),
    SubPhase {
        parent: &'a PhaseNode,
        node: &'a SubPhaseNode,
    },
}

impl<'a> WorkflowNode<'a> {
    #[must_use]
    pub fn id(&self) -> &'a NodeId {
        match *self {
            Self::Phase(phase) => &phase.id,
            Self::SubPhase { node, .. } => &node.id,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'a str {
        match *self {
            Self::Phase(phase) => &phase.label,
            Self::SubPhase { node, .. } => &node.label,
        }
    }

    #[must_use]
    pub fn status(&self) -> NodeStatus {
        match self {
            Self::Phase(phase) => phase.status,
            Self::SubPhase { node, .. } => node.status,
        }
    }

    #[must_use]
    pub fn is_gated(&self) -> bool {
        matches!(self, Self::SubPhase { node, .. } if node.gated)
    }
}

/// Location of a node: a phase index plus an optional sub-phase index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub(crate) phase: usize,
    pub(crate) sub: Option<usize>,
}

/// The validated lifecycle graph.
///
/// Only constructed through [`WorkflowGraph::new`] or [`contract_lifecycle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowGraph {
    phases: Vec<PhaseNode>,
}

impl WorkflowGraph {
    /// Validate and build a graph. All statuses start `Pending`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidGraph`] if there are no phases, an
    /// id is empty or repeated, or the activation rule is misplaced (more
    /// than one activation-entered phase, or on the first phase).
    pub fn new(mut phases: Vec<PhaseNode>) -> Result<Self, TransitionError> {
        let invalid = |reason: String| TransitionError::InvalidGraph { reason };

        if phases.is_empty() {
            return Err(invalid("workflow has no phases".to_string()));
        }

        let mut seen = HashSet::new();
        for phase in &phases {
            let ids = std::iter::once(&phase.id).chain(phase.sub_phases.iter().map(|s| &s.id));
            for id in ids {
                if id.as_str().trim().is_empty() {
                    return Err(invalid(format!("phase '{}' contains an empty node id", phase.id)));
                }
                if !seen.insert(id.as_str()) {
                    return Err(invalid(format!("node id '{id}' is used more than once")));
                }
            }
        }

        let activated: Vec<usize> = phases
            .iter()
            .enumerate()
            .filter(|(_, p)| p.entry == EntryRule::Activation)
            .map(|(i, _)| i)
            .collect();
        if activated.len() > 1 {
            return Err(invalid(
                "more than one phase is entered by activation".to_string(),
            ));
        }
        if activated.first() == Some(&0) {
            return Err(invalid(
                "the first phase cannot be entered by activation".to_string(),
            ));
        }

        for phase in &mut phases {
            phase.status = NodeStatus::Pending;
            for sub in &mut phase.sub_phases {
                sub.status = NodeStatus::Pending;
            }
        }

        Ok(Self { phases })
    }

    #[must_use]
    pub fn phases(&self) -> &[PhaseNode] {
        &self.phases
    }

    /// Leaf ids in the fixed total order walked by `advance()`.
    #[must_use]
    pub fn leaves(&self) -> Vec<&NodeId> {
        self.leaf_cursors()
            .into_iter()
            .map(|c| self.id_at(c))
            .collect()
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<WorkflowNode<'_>> {
        self.locate(id).map(|c| self.node_at(c))
    }

    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.locate(id).is_some()
    }

    /// The activation-entered phase, if the graph has one.
    #[must_use]
    pub fn activation_phase(&self) -> Option<&PhaseNode> {
        self.activation_index().map(|i| &self.phases[i])
    }

    pub(crate) fn activation_index(&self) -> Option<usize> {
        self.phases
            .iter()
            .position(|p| p.entry == EntryRule::Activation)
    }

    pub(crate) fn leaf_cursors(&self) -> Vec<Cursor> {
        let mut cursors = Vec::new();
        for (phase, node) in self.phases.iter().enumerate() {
            if node.sub_phases.is_empty() {
                cursors.push(Cursor { phase, sub: None });
            } else {
                cursors.extend((0..node.sub_phases.len()).map(|sub| Cursor {
                    phase,
                    sub: Some(sub),
                }));
            }
        }
        cursors
    }

    pub(crate) fn first_leaf(&self, phase: usize) -> Cursor {
        let sub = if self.phases[phase].sub_phases.is_empty() {
            None
        } else {
            Some(0)
        };
        Cursor { phase, sub }
    }

    pub(crate) fn locate(&self, id: &NodeId) -> Option<Cursor> {
        for (phase, node) in self.phases.iter().enumerate() {
            if node.id == *id {
                return Some(Cursor { phase, sub: None });
            }
            if let Some(sub) = node.sub_phases.iter().position(|s| s.id == *id) {
                return Some(Cursor {
                    phase,
                    sub: Some(sub),
                });
            }
        }
        None
    }

    pub(crate) fn node_at(&self, cursor: Cursor) -> WorkflowNode<'_> {
        let parent = &self.phases[cursor.phase];
        match cursor.sub {
            Some(sub) => WorkflowNode::SubPhase {
                parent,
                node: &parent.sub_phases[sub],
            },
            None => WorkflowNode::Phase(parent),
        }
    }

    pub(crate) fn id_at(&self, cursor: Cursor) -> &NodeId {
        self.node_at(cursor).id()
    }

    pub(crate) fn status_at(&self, cursor: Cursor) -> NodeStatus {
        self.node_at(cursor).status()
    }

    pub(crate) fn set_status(&mut self, cursor: Cursor, status: NodeStatus) {
        let phase = &mut self.phases[cursor.phase];
        match cursor.sub {
            Some(sub) => phase.sub_phases[sub].status = status,
            None => phase.status = status,
        }
    }

    pub(crate) fn set_phase_status(&mut self, phase: usize, status: NodeStatus) {
        self.phases[phase].status = status;
    }

    /// True when every leaf of the phase is `Complete`.
    pub(crate) fn phase_finished(&self, phase: usize) -> bool {
        let node = &self.phases[phase];
        if node.sub_phases.is_empty() {
            node.status == NodeStatus::Complete
        } else {
            node.sub_phases
                .iter()
                .all(|s| s.status == NodeStatus::Complete)
        }
    }
}

/// The standard construction contract lifecycle.
///
/// `pre-activation` [drafting, comparison, approval (gated)] →
/// `activation` [execution] → `post-activation` (entered by activation)
/// [obligations, disputes, variations] → `reports`.
#[must_use]
pub fn contract_lifecycle() -> WorkflowGraph {
    let phases = vec![
        PhaseNode::new("pre-activation", "Pre-Activation")
            .with_sub_phase(SubPhaseNode::new("drafting", "Drafting"))
            .with_sub_phase(SubPhaseNode::new("comparison", "Comparison"))
            .with_sub_phase(SubPhaseNode::gated("approval", "Approval")),
        PhaseNode::new("activation", "Activation")
            .with_sub_phase(SubPhaseNode::new("execution", "Execution")),
        PhaseNode::new("post-activation", "Post-Activation")
            .entered_by(EntryRule::Activation)
            .with_sub_phase(SubPhaseNode::new("obligations", "Obligations"))
            .with_sub_phase(SubPhaseNode::new("disputes", "Disputes"))
            .with_sub_phase(SubPhaseNode::new("variations", "Variations")),
        PhaseNode::new("reports", "Reports"),
    ];
    WorkflowGraph { phases }
}

//! Phase state machine over a [`WorkflowGraph`].
//!
//! Every operation validates before it mutates: an `Err` leaves statuses,
//! position, project status and history exactly as they were.

use chrono::{DateTime, Utc};
use contractflow_gate::GateSource;
use contractflow_utils::error::TransitionError;
use contractflow_utils::logging::{log_refused_transition, log_transition};
use contractflow_utils::types::{NodeId, NodeStatus, ProjectStatus};
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::info;

use crate::graph::{Cursor, PhaseNode, SubPhaseNode, WorkflowGraph, WorkflowNode, contract_lifecycle};

/// Kind of a recorded transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransitionKind {
    Advance,
    Enter,
    Jump,
    Activate,
}

/// One entry of the transition history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub kind: TransitionKind,
    pub from: NodeId,
    pub to: NodeId,
    pub at: DateTime<Utc>,
}

/// Current position and node statuses of one project workspace.
///
/// Callers must serialize mutations; the machine is a plain single-writer
/// value.
#[derive(Debug, Clone)]
pub struct PhaseStateMachine {
    graph: WorkflowGraph,
    position: Cursor,
    project_status: ProjectStatus,
    history: Vec<TransitionRecord>,
}

impl Default for PhaseStateMachine {
    fn default() -> Self {
        Self::new(contract_lifecycle())
    }
}

impl PhaseStateMachine {
    /// Start at the first leaf of the first phase; both are `Active`, every
    /// other node is `Pending`.
    #[must_use]
    pub fn new(mut graph: WorkflowGraph) -> Self {
        let position = graph.first_leaf(0);
        graph.set_phase_status(0, NodeStatus::Active);
        graph.set_status(position, NodeStatus::Active);
        Self {
            graph,
            position,
            project_status: ProjectStatus::PreActivation,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    /// Id of the current leaf.
    #[must_use]
    pub fn position(&self) -> &NodeId {
        self.graph.id_at(self.position)
    }

    #[must_use]
    pub fn current_node(&self) -> WorkflowNode<'_> {
        self.graph.node_at(self.position)
    }

    #[must_use]
    pub fn current_phase(&self) -> &PhaseNode {
        &self.graph.phases()[self.position.phase]
    }

    #[must_use]
    pub fn current_sub_phase(&self) -> Option<&SubPhaseNode> {
        self.position
            .sub
            .map(|sub| &self.current_phase().sub_phases()[sub])
    }

    #[must_use]
    pub fn status_of(&self, node: &NodeId) -> Option<NodeStatus> {
        self.graph.node(node).map(|n| n.status())
    }

    #[must_use]
    pub fn project_status(&self) -> ProjectStatus {
        self.project_status
    }

    #[must_use]
    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    #[must_use]
    pub fn leaves(&self) -> Vec<&NodeId> {
        self.graph.leaves()
    }

    /// Move forward to the next leaf in the fixed order that is not
    /// already `Complete`.
    ///
    /// A gated current leaf must have a unanimous, non-empty approval set.
    /// On success the current leaf becomes `Complete` (and its phase too,
    /// once all of the phase's leaves are), and the target leaf and its
    /// phase become `Active`.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::EmptyApprovalSet`] / [`TransitionError::Gating`]
    ///   when the gate is closed.
    /// - [`TransitionError::NoNextNode`] past the last leaf.
    /// - [`TransitionError::ActivationRequired`] when the target lies in or
    ///   after the activation-entered phase before the contract is active.
    pub fn advance(&mut self, gates: &dyn GateSource) -> Result<TransitionRecord, TransitionError> {
        match self.plan_advance(gates) {
            Ok(target) => Ok(self.move_forward(target, TransitionKind::Advance)),
            Err(err) => Err(self.refuse(TransitionKind::Advance, err)),
        }
    }

    fn plan_advance(&self, gates: &dyn GateSource) -> Result<Cursor, TransitionError> {
        self.check_gate(gates)?;

        let target = self
            .graph
            .leaf_cursors()
            .into_iter()
            .skip_while(|c| *c != self.position)
            .skip(1)
            .find(|c| self.graph.status_at(*c) != NodeStatus::Complete)
            .ok_or_else(|| TransitionError::NoNextNode {
                from: self.position().to_string(),
            })?;

        self.check_activation(target)?;
        Ok(target)
    }

    /// Navigate into a node, descending to its first sub-phase, and mark
    /// the node and that sub-phase `Active`. Other statuses are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidTransition`] for an unknown id, or
    /// [`TransitionError::ActivationRequired`] for a node in or after the
    /// activation-entered phase before the contract is active.
    pub fn enter(&mut self, node: &NodeId) -> Result<TransitionRecord, TransitionError> {
        let target = match self.resolve(node) {
            Ok(target) => target,
            Err(err) => return Err(self.refuse(TransitionKind::Enter, err)),
        };
        if let Err(err) = self.check_activation(target) {
            return Err(self.refuse(TransitionKind::Enter, err));
        }

        self.graph
            .set_phase_status(target.phase, NodeStatus::Active);
        self.graph.set_status(target, NodeStatus::Active);
        Ok(self.move_to(target, TransitionKind::Enter))
    }

    /// Unconditional navigation. Never gated and never changes a status;
    /// only the current position moves. A phase id lands on its first leaf.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidTransition`] for an unknown id.
    pub fn jump_to(&mut self, node: &NodeId) -> Result<TransitionRecord, TransitionError> {
        match self.resolve(node) {
            Ok(target) => Ok(self.move_to(target, TransitionKind::Jump)),
            Err(err) => Err(self.refuse(TransitionKind::Jump, err)),
        }
    }

    /// Leave the phase preceding the activation-entered phase and enter
    /// the latter, flipping the project status to `Active`.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::AlreadyActive`] if already activated.
    /// - [`TransitionError::NotAtActivation`] unless the current position
    ///   lies in the phase right before the activation-entered phase.
    /// - [`TransitionError::EmptyApprovalSet`] / [`TransitionError::Gating`]
    ///   if the current leaf is gated and its gate is closed.
    pub fn activate_contract(
        &mut self,
        gates: &dyn GateSource,
    ) -> Result<TransitionRecord, TransitionError> {
        match self.plan_activation(gates) {
            Ok(target) => {
                let record = self.move_forward(target, TransitionKind::Activate);
                self.project_status = ProjectStatus::Active;
                info!(
                    phase = %self.current_phase().id(),
                    position = %self.position(),
                    "Contract activated"
                );
                Ok(record)
            }
            Err(err) => Err(self.refuse(TransitionKind::Activate, err)),
        }
    }

    fn plan_activation(&self, gates: &dyn GateSource) -> Result<Cursor, TransitionError> {
        if self.project_status == ProjectStatus::Active {
            return Err(TransitionError::AlreadyActive);
        }
        let activation = self
            .graph
            .activation_index()
            .filter(|&act| self.position.phase + 1 == act)
            .ok_or_else(|| TransitionError::NotAtActivation {
                current: self.position().to_string(),
            })?;
        self.check_gate(gates)?;
        Ok(self.graph.first_leaf(activation))
    }

    fn check_gate(&self, gates: &dyn GateSource) -> Result<(), TransitionError> {
        let node = self.current_node();
        if !node.is_gated() {
            return Ok(());
        }
        let id = node.id().to_string();
        match gates.gate_summary(node.id()) {
            None => Err(TransitionError::EmptyApprovalSet { node: id }),
            Some(summary) if summary.total == 0 => {
                Err(TransitionError::EmptyApprovalSet { node: id })
            }
            Some(summary) if !summary.can_advance => Err(TransitionError::Gating {
                node: id,
                approved: summary.approved_count,
                total: summary.total,
                rejected: summary.rejected_count,
            }),
            Some(_) => Ok(()),
        }
    }

    fn check_activation(&self, target: Cursor) -> Result<(), TransitionError> {
        if self.project_status == ProjectStatus::Active {
            return Ok(());
        }
        match self.graph.activation_index() {
            Some(act) if target.phase >= act => Err(TransitionError::ActivationRequired {
                from: self.position().to_string(),
                to: self.graph.phases()[act].id().to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn resolve(&self, node: &NodeId) -> Result<Cursor, TransitionError> {
        let cursor = self
            .graph
            .locate(node)
            .ok_or_else(|| TransitionError::InvalidTransition {
                node: node.to_string(),
            })?;
        Ok(match cursor.sub {
            Some(_) => cursor,
            None => self.graph.first_leaf(cursor.phase),
        })
    }

    fn move_forward(&mut self, target: Cursor, kind: TransitionKind) -> TransitionRecord {
        let from = self.position;
        self.graph.set_status(from, NodeStatus::Complete);
        if target.phase != from.phase && self.graph.phase_finished(from.phase) {
            self.graph
                .set_phase_status(from.phase, NodeStatus::Complete);
        }
        self.graph
            .set_phase_status(target.phase, NodeStatus::Active);
        self.graph.set_status(target, NodeStatus::Active);
        self.move_to(target, kind)
    }

    fn move_to(&mut self, target: Cursor, kind: TransitionKind) -> TransitionRecord {
        let record = TransitionRecord {
            kind,
            from: self.position().clone(),
            to: self.graph.id_at(target).clone(),
            at: Utc::now(),
        };
        self.position = target;
        log_transition(
            &kind.to_string(),
            record.from.as_str(),
            record.to.as_str(),
        );
        self.history.push(record.clone());
        record
    }

    fn refuse(&self, kind: TransitionKind, err: TransitionError) -> TransitionError {
        log_refused_transition(&kind.to_string(), self.position().as_str(), &err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractflow_gate::ApprovalSummary;

    fn open(_: &NodeId) -> Option<ApprovalSummary> {
        Some(ApprovalSummary {
            approved_count: 4,
            total: 4,
            percent_approved: 100,
            can_advance: true,
            ..ApprovalSummary::default()
        })
    }

    fn three_of_four(_: &NodeId) -> Option<ApprovalSummary> {
        Some(ApprovalSummary {
            approved_count: 3,
            pending_count: 1,
            total: 4,
            percent_approved: 75,
            can_advance: false,
            ..ApprovalSummary::default()
        })
    }

    fn unbound(_: &NodeId) -> Option<ApprovalSummary> {
        None
    }

    fn id(s: &str) -> NodeId {
        NodeId::new(s)
    }

    fn at_approval() -> PhaseStateMachine {
        let mut machine = PhaseStateMachine::default();
        machine.advance(&open).unwrap();
        machine.advance(&open).unwrap();
        assert_eq!(machine.position().as_str(), "approval");
        machine
    }

    #[test]
    fn test_initial_state() {
        let machine = PhaseStateMachine::default();
        assert_eq!(machine.position().as_str(), "drafting");
        assert_eq!(machine.current_phase().id().as_str(), "pre-activation");
        assert_eq!(machine.status_of(&id("pre-activation")), Some(NodeStatus::Active));
        assert_eq!(machine.status_of(&id("drafting")), Some(NodeStatus::Active));
        assert_eq!(machine.status_of(&id("comparison")), Some(NodeStatus::Pending));
        assert_eq!(machine.status_of(&id("reports")), Some(NodeStatus::Pending));
        assert_eq!(machine.project_status(), ProjectStatus::PreActivation);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_unanimous_gate_allows_advance() {
        let mut machine = at_approval();
        let record = machine.advance(&open).unwrap();

        assert_eq!(record.from.as_str(), "approval");
        assert_eq!(record.to.as_str(), "execution");
        assert_eq!(machine.status_of(&id("approval")), Some(NodeStatus::Complete));
        assert_eq!(machine.status_of(&id("execution")), Some(NodeStatus::Active));
        assert_eq!(machine.status_of(&id("pre-activation")), Some(NodeStatus::Complete));
        assert_eq!(machine.status_of(&id("activation")), Some(NodeStatus::Active));
    }

    #[test]
    fn test_closed_gate_refuses_without_mutation() {
        let mut machine = at_approval();
        let before_graph = machine.graph().clone();
        let before_history = machine.history().len();

        let err = machine.advance(&three_of_four).unwrap_err();
        assert_eq!(
            err,
            TransitionError::Gating {
                node: "approval".to_string(),
                approved: 3,
                total: 4,
                rejected: 0
            }
        );
        assert_eq!(machine.graph(), &before_graph);
        assert_eq!(machine.position().as_str(), "approval");
        assert_eq!(machine.history().len(), before_history);
    }

    #[test]
    fn test_empty_or_unbound_gate_never_advances() {
        let mut machine = at_approval();
        let empty = |_: &NodeId| Some(ApprovalSummary::default());

        assert!(matches!(
            machine.advance(&empty),
            Err(TransitionError::EmptyApprovalSet { .. })
        ));
        assert!(matches!(
            machine.advance(&unbound),
            Err(TransitionError::EmptyApprovalSet { .. })
        ));
        assert_eq!(machine.position().as_str(), "approval");
    }

    #[test]
    fn test_ungated_nodes_ignore_gate_source() {
        let mut machine = PhaseStateMachine::default();
        machine.advance(&unbound).unwrap();
        assert_eq!(machine.position().as_str(), "comparison");
    }

    #[test]
    fn test_full_walk_visits_each_leaf_once_in_order() {
        let mut machine = PhaseStateMachine::default();
        let mut visited = vec![machine.position().to_string()];

        loop {
            match machine.advance(&open) {
                Ok(record) => visited.push(record.to.to_string()),
                Err(TransitionError::ActivationRequired { to, .. }) => {
                    assert_eq!(to, "post-activation");
                    let record = machine.activate_contract(&open).unwrap();
                    visited.push(record.to.to_string());
                }
                Err(TransitionError::NoNextNode { from }) => {
                    assert_eq!(from, "reports");
                    break;
                }
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }

        let expected: Vec<String> = machine.leaves().iter().map(|l| l.to_string()).collect();
        assert_eq!(visited, expected);
        assert_eq!(machine.project_status(), ProjectStatus::Active);
        for leaf in machine.leaves().into_iter().take(expected.len() - 1) {
            assert_eq!(machine.status_of(leaf), Some(NodeStatus::Complete));
        }
    }

    #[test]
    fn test_advance_skips_completed_leaves() {
        let mut machine = at_approval();
        machine.jump_to(&id("drafting")).unwrap();
        let record = machine.advance(&open).unwrap();
        assert_eq!(record.to.as_str(), "approval");
        assert_eq!(machine.status_of(&id("comparison")), Some(NodeStatus::Complete));
    }

    #[test]
    fn test_jump_is_ungated_and_status_neutral() {
        let mut machine = at_approval();
        let before = machine.graph().clone();

        let record = machine.jump_to(&id("reports")).unwrap();
        assert_eq!(record.kind, TransitionKind::Jump);
        assert_eq!(machine.position().as_str(), "reports");
        assert_eq!(machine.graph(), &before);

        machine.jump_to(&id("post-activation")).unwrap();
        assert_eq!(machine.position().as_str(), "obligations");
        assert_eq!(machine.graph(), &before);
    }

    #[test]
    fn test_unknown_node_is_invalid_transition() {
        let mut machine = PhaseStateMachine::default();
        let err = machine.jump_to(&id("billing")).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                node: "billing".to_string()
            }
        );
        assert!(machine.enter(&id("billing")).is_err());
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_activation_rules() {
        let mut machine = PhaseStateMachine::default();
        assert!(matches!(
            machine.activate_contract(&open),
            Err(TransitionError::NotAtActivation { .. })
        ));

        let mut machine = at_approval();
        machine.advance(&open).unwrap();
        assert!(matches!(
            machine.advance(&open),
            Err(TransitionError::ActivationRequired { .. })
        ));

        machine.activate_contract(&open).unwrap();
        assert_eq!(machine.position().as_str(), "obligations");
        assert_eq!(machine.project_status(), ProjectStatus::Active);
        assert_eq!(machine.status_of(&id("activation")), Some(NodeStatus::Complete));
        assert_eq!(
            machine.activate_contract(&open).unwrap_err(),
            TransitionError::AlreadyActive
        );
    }

    #[test]
    fn test_jump_past_closed_approval_gate_still_permits_activation() {
        let mut machine = at_approval();
        assert!(matches!(
            machine.activate_contract(&three_of_four),
            Err(TransitionError::NotAtActivation { .. })
        ));

        machine.jump_to(&id("execution")).unwrap();
        let record = machine.activate_contract(&three_of_four).unwrap();

        assert_eq!(record.kind, TransitionKind::Activate);
        assert_eq!(machine.position().as_str(), "obligations");
        assert_eq!(machine.project_status(), ProjectStatus::Active);
    }

    #[test]
    fn test_enter_descends_and_activates() {
        let mut machine = PhaseStateMachine::default();
        let record = machine.enter(&id("activation")).unwrap();
        assert_eq!(record.to.as_str(), "execution");
        assert_eq!(machine.status_of(&id("activation")), Some(NodeStatus::Active));
        assert_eq!(machine.status_of(&id("execution")), Some(NodeStatus::Active));
        assert_eq!(machine.status_of(&id("drafting")), Some(NodeStatus::Active));

        assert!(matches!(
            machine.enter(&id("post-activation")),
            Err(TransitionError::ActivationRequired { .. })
        ));
    }

    #[test]
    fn test_history_records_kinds() {
        let mut machine = PhaseStateMachine::default();
        machine.advance(&open).unwrap();
        machine.jump_to(&id("drafting")).unwrap();
        machine.enter(&id("pre-activation")).unwrap();

        let kinds: Vec<TransitionKind> = machine.history().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            [TransitionKind::Advance, TransitionKind::Jump, TransitionKind::Enter]
        );
    }
}

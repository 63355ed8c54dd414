use std::collections::BTreeMap;

use contractflow_utils::error::ApprovalError;
use contractflow_utils::types::{ApprovalStatus, ApproverId, DraftId, NodeId};

use crate::approver::{Approver, StatusChange};
use crate::set::{ApprovalSet, ApprovalSummary};

/// Source of approval state for gated workflow nodes.
///
/// The workflow only ever reads through this trait, so approval bookkeeping
/// and phase transitions stay independent.
pub trait GateSource {
    /// Summary of the approval set governing `node`, or `None` when no
    /// draft is bound to it.
    fn gate_summary(&self, node: &NodeId) -> Option<ApprovalSummary>;
}

impl<F> GateSource for F
where
    F: Fn(&NodeId) -> Option<ApprovalSummary>,
{
    fn gate_summary(&self, node: &NodeId) -> Option<ApprovalSummary> {
        self(node)
    }
}

/// Approval sets of a workspace, one per draft under review, plus the
/// binding from gated nodes to the draft each one reviews.
#[derive(Debug, Clone, Default)]
pub struct ApprovalRegistry {
    sets: BTreeMap<DraftId, ApprovalSet>,
    bindings: BTreeMap<NodeId, DraftId>,
}

impl ApprovalRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign an approver to a draft, creating the draft's set on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::DuplicateApprover`] if already assigned.
    pub fn add_approver(&mut self, draft: &DraftId, approver: Approver) -> Result<(), ApprovalError> {
        self.sets
            .entry(draft.clone())
            .or_insert_with(|| ApprovalSet::new(draft.clone()))
            .add_approver(approver)
    }

    /// Record a decision on a draft.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::UnknownApprovalSet`] if the draft has no
    /// approvers, or [`ApprovalError::UnknownApprover`] from the set.
    pub fn set_status(
        &mut self,
        draft: &DraftId,
        approver: &ApproverId,
        status: ApprovalStatus,
        comment: Option<String>,
    ) -> Result<StatusChange, ApprovalError> {
        self.sets
            .get_mut(draft)
            .ok_or_else(|| ApprovalError::UnknownApprovalSet {
                draft: draft.to_string(),
            })?
            .set_status(approver, status, comment)
    }

    #[must_use]
    pub fn set(&self, draft: &DraftId) -> Option<&ApprovalSet> {
        self.sets.get(draft)
    }

    /// Summary for a draft; a draft without approvers has an empty summary.
    #[must_use]
    pub fn summary(&self, draft: &DraftId) -> ApprovalSummary {
        self.sets
            .get(draft)
            .map(ApprovalSet::summary)
            .unwrap_or_default()
    }

    /// Make `draft` the subject of the gate at `node`, replacing any
    /// previous binding.
    pub fn bind(&mut self, node: NodeId, draft: DraftId) -> Option<DraftId> {
        self.bindings.insert(node, draft)
    }

    #[must_use]
    pub fn bound_draft(&self, node: &NodeId) -> Option<&DraftId> {
        self.bindings.get(node)
    }

    pub fn sets(&self) -> impl Iterator<Item = &ApprovalSet> {
        self.sets.values()
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&NodeId, &DraftId)> {
        self.bindings.iter()
    }
}

impl GateSource for ApprovalRegistry {
    fn gate_summary(&self, node: &NodeId) -> Option<ApprovalSummary> {
        self.bound_draft(node).map(|draft| self.summary(draft))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> DraftId {
        DraftId::new("msa-7@v2")
    }

    #[test]
    fn test_unbound_node_has_no_gate() {
        let registry = ApprovalRegistry::new();
        assert!(registry.gate_summary(&NodeId::new("approval")).is_none());
    }

    #[test]
    fn test_bound_node_without_approvers_reports_empty_set() {
        let mut registry = ApprovalRegistry::new();
        registry.bind(NodeId::new("approval"), draft());
        let summary = registry.gate_summary(&NodeId::new("approval")).unwrap();
        assert_eq!(summary.total, 0);
        assert!(!summary.can_advance);
    }

    #[test]
    fn test_decisions_flow_through_binding() {
        let mut registry = ApprovalRegistry::new();
        registry.bind(NodeId::new("approval"), draft());
        registry
            .add_approver(&draft(), Approver::new("legal", "Legal", "Counsel"))
            .unwrap();

        let node = NodeId::new("approval");
        assert!(!registry.gate_summary(&node).unwrap().can_advance);

        registry
            .set_status(&draft(), &ApproverId::new("legal"), ApprovalStatus::Approved, None)
            .unwrap();
        assert!(registry.gate_summary(&node).unwrap().can_advance);
    }

    #[test]
    fn test_decision_on_unknown_draft_fails() {
        let mut registry = ApprovalRegistry::new();
        let err = registry
            .set_status(&draft(), &ApproverId::new("legal"), ApprovalStatus::Approved, None)
            .unwrap_err();
        assert_eq!(
            err,
            ApprovalError::UnknownApprovalSet {
                draft: "msa-7@v2".to_string()
            }
        );
    }

    #[test]
    fn test_closures_act_as_gate_sources() {
        let open = |_: &NodeId| {
            Some(ApprovalSummary {
                approved_count: 1,
                total: 1,
                percent_approved: 100,
                can_advance: true,
                ..ApprovalSummary::default()
            })
        };
        assert!(open.gate_summary(&NodeId::new("approval")).unwrap().can_advance);
    }
}

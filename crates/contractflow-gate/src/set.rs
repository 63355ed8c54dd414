use contractflow_utils::error::ApprovalError;
use contractflow_utils::types::{ApprovalStatus, ApproverId, DraftId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::approver::{Approver, StatusChange};
use crate::types::{GateCondition, GateResult};

/// Counters derived from an approval set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApprovalSummary {
    pub approved_count: usize,
    pub pending_count: usize,
    pub rejected_count: usize,
    pub total: usize,
    /// Whole percentage approved, rounded down; 0 for an empty set.
    pub percent_approved: u8,
    /// Unanimous approval of a non-empty set.
    pub can_advance: bool,
}

impl ApprovalSummary {
    fn from_approvers(approvers: &[Approver]) -> Self {
        let mut summary = Self {
            total: approvers.len(),
            ..Self::default()
        };
        for approver in approvers {
            match approver.status() {
                ApprovalStatus::Approved => summary.approved_count += 1,
                ApprovalStatus::Pending => summary.pending_count += 1,
                ApprovalStatus::Rejected => summary.rejected_count += 1,
            }
        }
        if summary.total > 0 {
            let percent = summary.approved_count * 100 / summary.total;
            summary.percent_approved = u8::try_from(percent).unwrap_or(100);
        }
        summary.can_advance = summary.rejected_count == 0
            && summary.pending_count == 0
            && summary.approved_count == summary.total
            && summary.total > 0;
        summary
    }

    /// The unmet condition as shown to users, or `None` when the gate is open.
    #[must_use]
    pub fn blocking_message(&self) -> Option<String> {
        if self.can_advance {
            return None;
        }
        if self.total == 0 {
            return Some("No approvers assigned".to_string());
        }
        let mut message = format!(
            "{} of {} approvals received",
            self.approved_count, self.total
        );
        if self.rejected_count > 0 {
            message.push_str(&format!(", {} rejected", self.rejected_count));
        }
        Some(message)
    }
}

/// Approvers assigned to one draft under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalSet {
    draft_id: DraftId,
    approvers: Vec<Approver>,
}

impl ApprovalSet {
    #[must_use]
    pub fn new(draft_id: DraftId) -> Self {
        Self {
            draft_id,
            approvers: Vec::new(),
        }
    }

    #[must_use]
    pub fn draft_id(&self) -> &DraftId {
        &self.draft_id
    }

    /// Assign an approver.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::DuplicateApprover`] if the id is already
    /// assigned; the set is left unchanged.
    pub fn add_approver(&mut self, approver: Approver) -> Result<(), ApprovalError> {
        if self.get(approver.id()).is_some() {
            return Err(ApprovalError::DuplicateApprover {
                approver: approver.id().to_string(),
            });
        }
        debug!(
            draft_id = %self.draft_id,
            approver = %approver.id(),
            role = %approver.role(),
            "Approver assigned"
        );
        self.approvers.push(approver);
        Ok(())
    }

    /// Record an approver's decision.
    ///
    /// Idempotent for a repeated status. Never triggers a workflow
    /// transition.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::UnknownApprover`] if the id is not assigned.
    pub fn set_status(
        &mut self,
        approver_id: &ApproverId,
        status: ApprovalStatus,
        comment: Option<String>,
    ) -> Result<StatusChange, ApprovalError> {
        let draft_id = &self.draft_id;
        let approver = self
            .approvers
            .iter_mut()
            .find(|a| a.id() == approver_id)
            .ok_or_else(|| ApprovalError::UnknownApprover {
                approver: approver_id.to_string(),
            })?;

        let change = approver.record(status, comment);
        debug!(
            draft_id = %draft_id,
            approver = %approver_id,
            status = %status,
            changed = change.is_changed(),
            "Approval recorded"
        );
        Ok(change)
    }

    #[must_use]
    pub fn get(&self, approver_id: &ApproverId) -> Option<&Approver> {
        self.approvers.iter().find(|a| a.id() == approver_id)
    }

    /// Approvers in assignment order.
    #[must_use]
    pub fn approvers(&self) -> &[Approver] {
        &self.approvers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.approvers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.approvers.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> ApprovalSummary {
        ApprovalSummary::from_approvers(&self.approvers)
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.summary().can_advance
    }

    #[must_use]
    pub fn blocking_message(&self) -> Option<String> {
        self.summary().blocking_message()
    }

    /// Evaluate the gate as a report listing each condition.
    #[must_use]
    pub fn evaluate(&self) -> GateResult {
        let summary = self.summary();
        let conditions = vec![
            GateCondition::new(
                "approvers_assigned",
                "At least one approver is assigned",
                summary.total > 0,
                summary.total,
                ">= 1",
            ),
            GateCondition::new(
                "no_rejections",
                "No approver has rejected the draft",
                summary.rejected_count == 0,
                summary.rejected_count,
                0,
            ),
            GateCondition::new(
                "no_pending",
                "Every approver has recorded a decision",
                summary.pending_count == 0,
                summary.pending_count,
                0,
            ),
            GateCondition::new(
                "unanimous",
                "Every assigned approver has approved",
                summary.total > 0 && summary.approved_count == summary.total,
                format!("{}/{}", summary.approved_count, summary.total),
                format!("{}/{}", summary.total, summary.total),
            ),
        ];

        let mut failure_reasons = Vec::new();
        for approver in &self.approvers {
            match approver.status() {
                ApprovalStatus::Rejected => failure_reasons.push(match approver.comment() {
                    Some(comment) => format!("{} rejected: {comment}", approver.name()),
                    None => format!("{} rejected", approver.name()),
                }),
                ApprovalStatus::Pending => {
                    failure_reasons.push(format!("{} has not decided", approver.name()));
                }
                ApprovalStatus::Approved => {}
            }
        }
        if summary.total == 0 {
            failure_reasons.push("No approvers assigned".to_string());
        }

        let passed = conditions.iter().all(|c| c.passed);
        debug_assert_eq!(passed, summary.can_advance);

        let headline = match summary.blocking_message() {
            Some(message) => format!("Blocked: {message}"),
            None => format!("Approved by all {} approvers", summary.total),
        };

        GateResult {
            passed,
            summary: headline,
            conditions,
            failure_reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(statuses: &[ApprovalStatus]) -> ApprovalSet {
        let mut set = ApprovalSet::new(DraftId::new("msa-7@v2"));
        for (i, status) in statuses.iter().enumerate() {
            let id = ApproverId::new(format!("ap-{i}"));
            set.add_approver(Approver::new(id.clone(), format!("Approver {i}"), "Reviewer"))
                .unwrap();
            set.set_status(&id, *status, None).unwrap();
        }
        set
    }

    #[test]
    fn test_three_of_four_approved_is_blocked_at_75_percent() {
        use ApprovalStatus::*;
        let set = set_of(&[Approved, Approved, Approved, Pending]);
        let summary = set.summary();
        assert!(!summary.can_advance);
        assert_eq!(summary.percent_approved, 75);
        assert_eq!(summary.pending_count, 1);
        assert_eq!(
            set.blocking_message().as_deref(),
            Some("3 of 4 approvals received")
        );
    }

    #[test]
    fn test_unanimous_approval_opens_gate() {
        use ApprovalStatus::*;
        let set = set_of(&[Approved, Approved, Approved, Approved]);
        let summary = set.summary();
        assert!(summary.can_advance);
        assert_eq!(summary.percent_approved, 100);
        assert!(set.blocking_message().is_none());
        assert!(set.evaluate().passed);
    }

    #[test]
    fn test_empty_set_never_advances() {
        let set = ApprovalSet::new(DraftId::new("msa-7@v2"));
        let summary = set.summary();
        assert!(!summary.can_advance);
        assert_eq!(summary.percent_approved, 0);
        assert_eq!(set.blocking_message().as_deref(), Some("No approvers assigned"));

        let report = set.evaluate();
        assert!(!report.passed);
        assert!(!report.conditions[0].passed);
    }

    #[test]
    fn test_percent_rounds_down() {
        use ApprovalStatus::*;
        let set = set_of(&[Approved, Approved, Pending]);
        assert_eq!(set.summary().percent_approved, 66);
    }

    #[test]
    fn test_rejection_blocks_and_is_reported() {
        use ApprovalStatus::*;
        let mut set = set_of(&[Approved, Approved]);
        set.set_status(
            &ApproverId::new("ap-1"),
            Rejected,
            Some("Liability cap missing".to_string()),
        )
        .unwrap();

        assert_eq!(
            set.blocking_message().as_deref(),
            Some("1 of 2 approvals received, 1 rejected")
        );
        let report = set.evaluate();
        assert!(!report.passed);
        assert_eq!(
            report.failure_reasons,
            ["Approver 1 rejected: Liability cap missing"]
        );
        assert_eq!(report.summary, "Blocked: 1 of 2 approvals received, 1 rejected");
    }

    #[test]
    fn test_repeated_status_does_not_change_counts() {
        use ApprovalStatus::*;
        let mut set = set_of(&[Approved, Pending]);
        let before = set.summary();
        let change = set.set_status(&ApproverId::new("ap-0"), Approved, None).unwrap();
        assert_eq!(change, StatusChange::Unchanged);
        assert_eq!(set.summary(), before);
    }

    #[test]
    fn test_duplicate_and_unknown_approvers() {
        let mut set = set_of(&[ApprovalStatus::Pending]);
        let err = set
            .add_approver(Approver::new("ap-0", "Again", "Reviewer"))
            .unwrap_err();
        assert_eq!(
            err,
            ApprovalError::DuplicateApprover {
                approver: "ap-0".to_string()
            }
        );
        assert_eq!(set.len(), 1);

        let err = set
            .set_status(&ApproverId::new("ghost"), ApprovalStatus::Approved, None)
            .unwrap_err();
        assert!(matches!(err, ApprovalError::UnknownApprover { .. }));
    }
}

use chrono::{DateTime, Utc};
use contractflow_utils::types::{ApprovalStatus, ApproverId};
use serde::{Deserialize, Serialize};

/// Identity of a user as supplied by the identity provider.
///
/// The core never authenticates; it only records who decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: ApproverId,
    pub display_name: String,
    pub role: String,
}

/// A reviewer assigned to a draft, with their current decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approver {
    id: ApproverId,
    name: String,
    role: String,
    status: ApprovalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    decided_at: Option<DateTime<Utc>>,
}

impl Approver {
    /// A new approver with a `Pending` decision.
    pub fn new(id: impl Into<ApproverId>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            status: ApprovalStatus::Pending,
            comment: None,
            decided_at: None,
        }
    }

    #[must_use]
    pub fn from_identity(identity: &Identity) -> Self {
        Self::new(
            identity.id.clone(),
            identity.display_name.clone(),
            identity.role.clone(),
        )
    }

    #[must_use]
    pub fn id(&self) -> &ApproverId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    #[must_use]
    pub fn status(&self) -> ApprovalStatus {
        self.status
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// When the current non-pending decision was recorded.
    #[must_use]
    pub fn decided_at(&self) -> Option<DateTime<Utc>> {
        self.decided_at
    }

    /// Record a decision.
    ///
    /// Re-recording the current status leaves the status and timestamp
    /// alone and only replaces the comment when a new one is given. A
    /// different status replaces the prior comment with `comment`, even
    /// when that is `None`.
    pub(crate) fn record(&mut self, status: ApprovalStatus, comment: Option<String>) -> StatusChange {
        if status == self.status {
            if comment.is_some() {
                self.comment = comment;
            }
            return StatusChange::Unchanged;
        }

        let from = self.status;
        self.status = status;
        self.comment = comment;
        self.decided_at = match status {
            ApprovalStatus::Pending => None,
            ApprovalStatus::Approved | ApprovalStatus::Rejected => Some(Utc::now()),
        };
        StatusChange::Changed { from, to: status }
    }
}

/// Outcome of [`crate::ApprovalSet::set_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Unchanged,
    Changed {
        from: ApprovalStatus,
        to: ApprovalStatus,
    },
}

impl StatusChange {
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

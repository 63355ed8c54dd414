use chrono::{DateTime, Utc};
use contractflow_utils::hash::short_hash;
use contractflow_utils::types::{ContractId, DraftId};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Role of a draft within its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DraftRole {
    /// The current reference version; at most one per contract.
    Baseline,
    /// A former baseline replaced by a newer one.
    SupersededBaseline,
    /// An edited or contractor-submitted variant.
    Edited,
}

/// Immutable snapshot of document content.
///
/// Only [`DraftRole`] may change after creation, and only from `Baseline`
/// to `SupersededBaseline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub(crate) id: DraftId,
    pub(crate) contract_id: ContractId,
    pub(crate) content: String,
    pub(crate) content_hash: String,
    pub(crate) parent_id: Option<DraftId>,
    pub(crate) role: DraftRole,
    pub(crate) created_at: DateTime<Utc>,
}

impl Draft {
    #[must_use]
    pub fn id(&self) -> &DraftId {
        &self.id
    }

    #[must_use]
    pub fn contract_id(&self) -> &ContractId {
        &self.contract_id
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// BLAKE3 hex digest of the content.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    #[must_use]
    pub fn short_hash(&self) -> &str {
        short_hash(&self.content_hash)
    }

    #[must_use]
    pub fn parent_id(&self) -> Option<&DraftId> {
        self.parent_id.as_ref()
    }

    #[must_use]
    pub fn role(&self) -> DraftRole {
        self.role
    }

    /// True only for the contract's current baseline.
    #[must_use]
    pub fn is_baseline(&self) -> bool {
        self.role == DraftRole::Baseline
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

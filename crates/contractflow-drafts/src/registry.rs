use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use contractflow_diff::{Granularity, diff};
use contractflow_utils::error::DraftError;
use contractflow_utils::hash::content_hash;
use contractflow_utils::types::{ContractId, DraftId};
use tracing::debug;

use crate::draft::{Draft, DraftRole};

/// Options accepted by [`DraftRegistry::register`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    pub is_baseline: bool,
    pub parent_id: Option<DraftId>,
}

impl RegisterOptions {
    #[must_use]
    pub fn baseline() -> Self {
        Self {
            is_baseline: true,
            parent_id: None,
        }
    }

    #[must_use]
    pub fn edit_of(parent: DraftId) -> Self {
        Self {
            is_baseline: false,
            parent_id: Some(parent),
        }
    }
}

/// In-memory catalog of drafts per contract.
///
/// Drafts are append-only. Ids are minted as `<contract>@v<n>` where `n`
/// counts every draft ever registered for that contract.
#[derive(Debug, Default)]
pub struct DraftRegistry {
    drafts: Vec<Draft>,
    index: HashMap<DraftId, usize>,
    by_contract: BTreeMap<ContractId, Vec<usize>>,
}

impl DraftRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new draft and return its id.
    ///
    /// A baseline registration demotes the contract's current baseline to
    /// [`DraftRole::SupersededBaseline`].
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownDraft`] if `parent_id` is not registered,
    /// or [`DraftError::ContractMismatch`] if it belongs to another contract.
    /// Nothing is recorded on error.
    pub fn register(
        &mut self,
        contract_id: &ContractId,
        content: impl Into<String>,
        options: RegisterOptions,
    ) -> Result<DraftId, DraftError> {
        if let Some(parent_id) = &options.parent_id {
            let parent = self.get(parent_id)?;
            if parent.contract_id != *contract_id {
                return Err(DraftError::ContractMismatch {
                    draft: parent_id.to_string(),
                    expected: contract_id.to_string(),
                    actual: parent.contract_id.to_string(),
                });
            }
        }

        Ok(self.insert(contract_id, content.into(), options))
    }

    /// Register a baseline. Infallible: a baseline has no parent to check.
    pub fn register_baseline(
        &mut self,
        contract_id: &ContractId,
        content: impl Into<String>,
    ) -> DraftId {
        self.insert(contract_id, content.into(), RegisterOptions::baseline())
    }

    fn insert(
        &mut self,
        contract_id: &ContractId,
        content: String,
        options: RegisterOptions,
    ) -> DraftId {
        let version = self.by_contract.get(contract_id).map_or(0, Vec::len) + 1;
        let id = DraftId::new(format!("{contract_id}@v{version}"));
        let role = if options.is_baseline {
            self.demote_baseline(contract_id);
            DraftRole::Baseline
        } else {
            DraftRole::Edited
        };

        let draft = Draft {
            id: id.clone(),
            contract_id: contract_id.clone(),
            content_hash: content_hash(&content),
            content,
            parent_id: options.parent_id,
            role,
            created_at: Utc::now(),
        };

        debug!(
            draft_id = %draft.id,
            contract_id = %contract_id,
            role = %role,
            hash = %draft.short_hash(),
            "Registered draft"
        );

        let slot = self.drafts.len();
        self.drafts.push(draft);
        self.index.insert(id.clone(), slot);
        self.by_contract
            .entry(contract_id.clone())
            .or_default()
            .push(slot);

        id
    }

    fn demote_baseline(&mut self, contract_id: &ContractId) {
        let Some(slots) = self.by_contract.get(contract_id) else {
            return;
        };
        for &slot in slots {
            let draft = &mut self.drafts[slot];
            if draft.role == DraftRole::Baseline {
                draft.role = DraftRole::SupersededBaseline;
                debug!(draft_id = %draft.id, "Baseline superseded");
            }
        }
    }

    /// Look up a draft by id.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownDraft`] if the id was never registered.
    pub fn get(&self, id: &DraftId) -> Result<&Draft, DraftError> {
        self.index
            .get(id)
            .map(|&slot| &self.drafts[slot])
            .ok_or_else(|| DraftError::UnknownDraft {
                draft: id.to_string(),
            })
    }

    /// All drafts of a contract in registration order.
    #[must_use]
    pub fn list_for(&self, contract_id: &ContractId) -> Vec<&Draft> {
        self.by_contract
            .get(contract_id)
            .map(|slots| slots.iter().map(|&slot| &self.drafts[slot]).collect())
            .unwrap_or_default()
    }

    /// The contract's current baseline.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::NoBaseline`] if no baseline was ever registered.
    pub fn baseline_for(&self, contract_id: &ContractId) -> Result<&Draft, DraftError> {
        self.list_for(contract_id)
            .into_iter()
            .find(|d| d.is_baseline())
            .ok_or_else(|| DraftError::NoBaseline {
                contract: contract_id.to_string(),
            })
    }

    /// The draft followed by its ancestors, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownDraft`] if `id` is not registered.
    pub fn history(&self, id: &DraftId) -> Result<Vec<&Draft>, DraftError> {
        let mut current = self.get(id)?;
        let mut chain = vec![current];
        while let Some(parent_id) = &current.parent_id {
            current = self.get(parent_id)?;
            chain.push(current);
        }
        Ok(chain)
    }

    /// Drafts registered with `id` as their parent.
    #[must_use]
    pub fn children(&self, id: &DraftId) -> Vec<&Draft> {
        self.drafts
            .iter()
            .filter(|d| d.parent_id.as_ref() == Some(id))
            .collect()
    }

    /// True when a line diff of the two drafts has no additions or removals.
    ///
    /// Equal content hashes answer without diffing.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownDraft`] if either id is not registered.
    pub fn content_equals(&self, a: &DraftId, b: &DraftId) -> Result<bool, DraftError> {
        let a = self.get(a)?;
        let b = self.get(b)?;
        if a.content_hash == b.content_hash {
            return Ok(true);
        }
        Ok(diff(&a.content, &b.content, Granularity::Line).is_identical())
    }

    /// Contracts with at least one draft, in id order.
    pub fn contracts(&self) -> impl Iterator<Item = &ContractId> {
        self.by_contract.keys()
    }

    /// Every draft in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Draft> {
        self.drafts.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

//! External collaborators: document store, text generation, identity.
//!
//! The core only talks to these through the traits below. Their failures
//! surface as [`CollaboratorError`] and never change workflow, approval or
//! draft state.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use contractflow_gate::Identity;
use contractflow_utils::error::CollaboratorError;
use contractflow_utils::types::{ContractId, DraftId, NodeId};
use serde::{Deserialize, Serialize};

/// Source of template content and sink for edited drafts.
pub trait DocumentStore {
    /// Load the content of a template or stored document.
    fn load(&self, template_id: &str) -> Result<String, CollaboratorError>;

    /// Persist the content of a draft.
    fn save(&mut self, draft_id: &DraftId, content: &str) -> Result<(), CollaboratorError>;
}

/// Context handed to the text generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContext {
    pub project_id: String,
    pub contract_id: Option<ContractId>,
    pub draft_id: Option<DraftId>,
    /// Workflow position when the request was made.
    pub position: NodeId,
    pub message: String,
}

/// Opaque request/response text generation (chat, response drafting).
///
/// The core only needs *some* string back; it never inspects the content.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, context: &PromptContext) -> Result<String, CollaboratorError>;
}

/// Supplies the identity of the current user.
pub trait IdentityProvider {
    fn current_identity(&self) -> Result<Identity, CollaboratorError>;
}

/// In-memory [`DocumentStore`], seeded with templates.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    templates: HashMap<String, String>,
    saved: BTreeMap<DraftId, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_template(mut self, template_id: impl Into<String>, content: impl Into<String>) -> Self {
        self.templates.insert(template_id.into(), content.into());
        self
    }

    /// Content last saved for a draft.
    #[must_use]
    pub fn saved(&self, draft_id: &DraftId) -> Option<&str> {
        self.saved.get(draft_id).map(String::as_str)
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, template_id: &str) -> Result<String, CollaboratorError> {
        self.templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| CollaboratorError::Store {
                reason: format!("template '{template_id}' not found"),
            })
    }

    fn save(&mut self, draft_id: &DraftId, content: &str) -> Result<(), CollaboratorError> {
        self.saved.insert(draft_id.clone(), content.to_string());
        Ok(())
    }
}

/// [`IdentityProvider`] that always returns the same identity.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub Identity);

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> Result<Identity, CollaboratorError> {
        Ok(self.0.clone())
    }
}

/// [`TextGenerator`] returning a fixed reply.
#[derive(Debug, Clone)]
pub struct CannedGenerator {
    reply: String,
}

impl CannedGenerator {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _context: &PromptContext) -> Result<String, CollaboratorError> {
        Ok(self.reply.clone())
    }
}

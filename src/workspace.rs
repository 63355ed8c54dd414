//! The project workspace: one explicit state container per open project.
//!
//! A [`Workspace`] owns the phase state machine, the draft registry, the
//! approval registry and the comparison settings. Every mutation goes
//! through its methods; none of its state is reachable mutably from
//! outside. Callers serialize access (single writer).

use std::collections::BTreeMap;

use contractflow_config::Config;
use contractflow_diff::{
    DiffLimits, DiffResult, Granularity, InlineLine, diff_checked, refine_lines,
};
use contractflow_drafts::{Draft, DraftRegistry, DraftRole, RegisterOptions};
use contractflow_gate::{ApprovalRegistry, ApprovalSummary, Approver, GateResult, StatusChange};
use contractflow_phases::{PhaseStateMachine, TransitionRecord, WorkflowGraph};
use contractflow_risk::{ClauseTaxonomy, RiskAssessment, aggregate, score};
use contractflow_status::{StatusInputs, StatusManager, WorkspaceStatus};
use contractflow_utils::error::{ContractFlowError, TransitionError};
use contractflow_utils::logging::workspace_span;
use contractflow_utils::types::{ApprovalStatus, ApproverId, ContractId, DraftId, NodeId};
use tracing::{Span, debug, info, warn};

use crate::collaborators::{DocumentStore, IdentityProvider, PromptContext, TextGenerator};

/// Result of [`Workspace::save_edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// The new draft, or the parent when nothing changed.
    pub draft_id: DraftId,
    /// True when the content matched the parent and no draft was created.
    pub unchanged: bool,
}

#[derive(Debug)]
pub struct Workspace {
    project_id: String,
    machine: PhaseStateMachine,
    drafts: DraftRegistry,
    approvals: ApprovalRegistry,
    taxonomy: ClauseTaxonomy,
    limits: DiffLimits,
    effective_config: BTreeMap<String, (String, String)>,
    span: Span,
}

impl Workspace {
    /// An empty workspace on the standard contract lifecycle with built-in
    /// risk taxonomy and diff limits.
    pub fn new(project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        let span = workspace_span(&project_id);
        Self {
            project_id,
            machine: PhaseStateMachine::default(),
            drafts: DraftRegistry::new(),
            approvals: ApprovalRegistry::new(),
            taxonomy: ClauseTaxonomy::default(),
            limits: DiffLimits::default(),
            effective_config: Config::default().effective_config(),
            span,
        }
    }

    /// A workspace seeded with a contract's baseline content.
    pub fn open(
        project_id: impl Into<String>,
        contract_id: &ContractId,
        baseline: impl Into<String>,
    ) -> Self {
        let mut workspace = Self::new(project_id);
        workspace.register_baseline(contract_id, baseline);
        workspace
    }

    /// A workspace whose baseline is loaded from the document store.
    ///
    /// # Errors
    ///
    /// Returns [`ContractFlowError::Collaborator`] if the store cannot
    /// supply the template.
    pub fn open_from_store(
        project_id: impl Into<String>,
        contract_id: &ContractId,
        store: &dyn DocumentStore,
        template_id: &str,
    ) -> Result<Self, ContractFlowError> {
        let baseline = store.load(template_id)?;
        Ok(Self::open(project_id, contract_id, baseline))
    }

    /// Apply the comparison settings and clause taxonomy of a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ContractFlowError::Risk`] if the configured taxonomy is
    /// invalid.
    pub fn with_config(mut self, config: &Config) -> Result<Self, ContractFlowError> {
        self.taxonomy = config.taxonomy()?;
        self.limits = config.diff_limits();
        self.effective_config = config.effective_config();
        Ok(self)
    }

    /// Replace the taxonomy, e.g. with one loaded from a stand-alone file.
    #[must_use]
    pub fn with_taxonomy(mut self, taxonomy: ClauseTaxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// Use a custom workflow graph. Resets the workflow to its initial state.
    #[must_use]
    pub fn with_graph(mut self, graph: WorkflowGraph) -> Self {
        self.machine = PhaseStateMachine::new(graph);
        self
    }

    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    #[must_use]
    pub fn machine(&self) -> &PhaseStateMachine {
        &self.machine
    }

    #[must_use]
    pub fn drafts(&self) -> &DraftRegistry {
        &self.drafts
    }

    #[must_use]
    pub fn approvals(&self) -> &ApprovalRegistry {
        &self.approvals
    }

    #[must_use]
    pub fn taxonomy(&self) -> &ClauseTaxonomy {
        &self.taxonomy
    }

    // ------------------------------------------------------------------
    // Drafts
    // ------------------------------------------------------------------

    /// Register new baseline content for a contract, superseding any
    /// previous baseline.
    pub fn register_baseline(
        &mut self,
        contract_id: &ContractId,
        content: impl Into<String>,
    ) -> DraftId {
        let _guard = self.span.enter();
        let id = self.drafts.register_baseline(contract_id, content);
        info!(draft_id = %id, contract_id = %contract_id, "Baseline registered");
        id
    }

    /// Save edited content derived from `parent`.
    ///
    /// Content equal to the parent's creates no draft and reports
    /// `unchanged`.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownDraft`] if `parent` is not registered.
    pub fn save_edit(
        &mut self,
        parent: &DraftId,
        content: impl Into<String>,
    ) -> Result<SaveOutcome, ContractFlowError> {
        let _guard = self.span.enter();
        let content = content.into();
        let parent_draft = self.drafts.get(parent)?;

        if parent_draft.content() == content {
            debug!(draft_id = %parent, "No changes since last save");
            return Ok(SaveOutcome {
                draft_id: parent.clone(),
                unchanged: true,
            });
        }

        let contract_id = parent_draft.contract_id().clone();
        let draft_id = self.drafts.register(
            &contract_id,
            content,
            RegisterOptions::edit_of(parent.clone()),
        )?;
        info!(draft_id = %draft_id, parent = %parent, "Draft saved");
        Ok(SaveOutcome {
            draft_id,
            unchanged: false,
        })
    }

    /// Push a draft's content to the external store.
    ///
    /// # Errors
    ///
    /// Returns a draft error for an unknown id, or the store's failure.
    pub fn persist(
        &self,
        draft_id: &DraftId,
        store: &mut dyn DocumentStore,
    ) -> Result<(), ContractFlowError> {
        let draft = self.drafts.get(draft_id)?;
        store.save(draft_id, draft.content())?;
        debug!(draft_id = %draft_id, "Draft persisted");
        Ok(())
    }

    #[must_use]
    pub fn draft(&self, draft_id: &DraftId) -> Option<&Draft> {
        self.drafts.get(draft_id).ok()
    }

    /// Whether two drafts have the same content.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::UnknownDraft`] if either id is not registered.
    pub fn content_equals(&self, a: &DraftId, b: &DraftId) -> Result<bool, ContractFlowError> {
        Ok(self.drafts.content_equals(a, b)?)
    }

    // ------------------------------------------------------------------
    // Comparison and risk
    // ------------------------------------------------------------------

    /// Diff two drafts.
    ///
    /// # Errors
    ///
    /// Returns a draft error for unknown ids or
    /// [`ContractFlowError::DiffInput`] when either side exceeds the limit.
    pub fn compare(
        &self,
        original: &DraftId,
        modified: &DraftId,
        granularity: Granularity,
    ) -> Result<DiffResult, ContractFlowError> {
        let original = self.drafts.get(original)?;
        let modified = self.drafts.get(modified)?;
        Ok(diff_checked(
            original.content(),
            modified.content(),
            granularity,
            &self.limits,
        )?)
    }

    /// Line diff of two drafts with changed lines refined character by
    /// character.
    ///
    /// # Errors
    ///
    /// Same as [`Workspace::compare`].
    pub fn compare_inline(
        &self,
        original: &DraftId,
        modified: &DraftId,
    ) -> Result<Vec<InlineLine>, ContractFlowError> {
        let lines = self.compare(original, modified, Granularity::Line)?;
        Ok(refine_lines(&lines))
    }

    /// Risk of a draft against its contract's current baseline.
    ///
    /// # Errors
    ///
    /// Returns a draft error if the draft is unknown or its contract has no
    /// baseline, or a diff input error for oversized content.
    pub fn risk(&self, draft_id: &DraftId) -> Result<RiskAssessment, ContractFlowError> {
        let draft = self.drafts.get(draft_id)?;
        let baseline = self.drafts.baseline_for(draft.contract_id())?;
        let result = self.compare(baseline.id(), draft_id, Granularity::Line)?;
        Ok(score(&result, &self.taxonomy))
    }

    /// Highest risk among a contract's non-baseline drafts.
    ///
    /// `Ok(None)` when the contract has no drafts besides baselines.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::NoBaseline`] if the contract has no baseline.
    pub fn contract_risk(
        &self,
        contract_id: &ContractId,
    ) -> Result<Option<(DraftId, RiskAssessment)>, ContractFlowError> {
        self.drafts.baseline_for(contract_id)?;
        let mut assessed = Vec::new();
        for draft in self.drafts.list_for(contract_id) {
            if draft.role() != DraftRole::Edited {
                continue;
            }
            assessed.push((draft.id().clone(), self.risk(draft.id())?));
        }
        Ok(aggregate(assessed))
    }

    // ------------------------------------------------------------------
    // Approvals
    // ------------------------------------------------------------------

    /// Assign an approver to a draft.
    ///
    /// # Errors
    ///
    /// Returns a draft error for an unknown draft or
    /// [`contractflow_utils::error::ApprovalError::DuplicateApprover`].
    pub fn add_approver(
        &mut self,
        draft_id: &DraftId,
        approver: Approver,
    ) -> Result<(), ContractFlowError> {
        self.drafts.get(draft_id)?;
        self.approvals.add_approver(draft_id, approver)?;
        Ok(())
    }

    /// Assign the current user, as reported by the identity provider.
    ///
    /// # Errors
    ///
    /// As [`Workspace::add_approver`], plus identity provider failures.
    pub fn add_current_user(
        &mut self,
        draft_id: &DraftId,
        identity: &dyn IdentityProvider,
    ) -> Result<ApproverId, ContractFlowError> {
        let identity = identity.current_identity()?;
        let approver = Approver::from_identity(&identity);
        self.add_approver(draft_id, approver)?;
        Ok(identity.id)
    }

    /// Record an approver's decision. Never moves the workflow.
    ///
    /// # Errors
    ///
    /// Returns an approval error for an unknown set or approver.
    pub fn set_approval(
        &mut self,
        draft_id: &DraftId,
        approver: &ApproverId,
        status: ApprovalStatus,
        comment: Option<String>,
    ) -> Result<StatusChange, ContractFlowError> {
        Ok(self
            .approvals
            .set_status(draft_id, approver, status, comment)?)
    }

    #[must_use]
    pub fn approval_summary(&self, draft_id: &DraftId) -> ApprovalSummary {
        self.approvals.summary(draft_id)
    }

    /// Gate report for a draft's approval set, if it has one.
    #[must_use]
    pub fn evaluate_gate(&self, draft_id: &DraftId) -> Option<GateResult> {
        self.approvals.set(draft_id).map(|set| set.evaluate())
    }

    /// Make `draft_id` the subject of the gate at `node`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidTransition`] if the node is not a
    /// gated node of the graph, or a draft error for an unknown draft.
    pub fn bind_approval(
        &mut self,
        node: &NodeId,
        draft_id: &DraftId,
    ) -> Result<Option<DraftId>, ContractFlowError> {
        let gated = self
            .machine
            .graph()
            .node(node)
            .is_some_and(|n| n.is_gated());
        if !gated {
            return Err(TransitionError::InvalidTransition {
                node: node.to_string(),
            }
            .into());
        }
        self.drafts.get(draft_id)?;
        Ok(self.approvals.bind(node.clone(), draft_id.clone()))
    }

    // ------------------------------------------------------------------
    // Workflow
    // ------------------------------------------------------------------

    /// Move forward, consulting the approval gate of the current node.
    ///
    /// # Errors
    ///
    /// See [`PhaseStateMachine::advance`].
    pub fn advance(&mut self) -> Result<TransitionRecord, TransitionError> {
        let _guard = self.span.enter();
        self.machine.advance(&self.approvals)
    }

    /// # Errors
    ///
    /// See [`PhaseStateMachine::enter`].
    pub fn enter(&mut self, node: &NodeId) -> Result<TransitionRecord, TransitionError> {
        let _guard = self.span.enter();
        self.machine.enter(node)
    }

    /// Ungated navigation.
    ///
    /// # Errors
    ///
    /// See [`PhaseStateMachine::jump_to`].
    pub fn jump_to(&mut self, node: &NodeId) -> Result<TransitionRecord, TransitionError> {
        let _guard = self.span.enter();
        self.machine.jump_to(node)
    }

    /// # Errors
    ///
    /// See [`PhaseStateMachine::activate_contract`].
    pub fn activate_contract(&mut self) -> Result<TransitionRecord, TransitionError> {
        let _guard = self.span.enter();
        self.machine.activate_contract(&self.approvals)
    }

    // ------------------------------------------------------------------
    // Collaborators and reporting
    // ------------------------------------------------------------------

    /// Ask the text generator for a response. Takes `&self`: a failing or
    /// slow generator cannot touch workspace state.
    ///
    /// # Errors
    ///
    /// Returns [`ContractFlowError::Collaborator`] with the generator's
    /// failure.
    pub async fn generate_response(
        &self,
        generator: &dyn TextGenerator,
        contract_id: Option<&ContractId>,
        message: impl Into<String>,
    ) -> Result<String, ContractFlowError> {
        let draft_id = contract_id
            .and_then(|c| self.drafts.list_for(c).last().map(|d| d.id().clone()));
        let context = PromptContext {
            project_id: self.project_id.clone(),
            contract_id: contract_id.cloned(),
            draft_id,
            position: self.machine.position().clone(),
            message: message.into(),
        };

        match generator.generate(&context).await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                warn!(project_id = %self.project_id, error = %err, "Text generation failed");
                Err(err.into())
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> WorkspaceStatus {
        StatusManager::generate(
            StatusInputs {
                project_id: &self.project_id,
                machine: &self.machine,
                approvals: &self.approvals,
                drafts: &self.drafts,
            },
            self.effective_config.clone(),
        )
    }

    /// Status snapshot as canonical JSON.
    pub fn status_json(&self) -> anyhow::Result<String> {
        StatusManager::emit_json(&self.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractflow_utils::error::DraftError;

    fn contract() -> ContractId {
        ContractId::new("msa-7")
    }

    fn opened() -> (Workspace, DraftId) {
        let ws = Workspace::open("proj-1", &contract(), "1. Scope.\n2. Payment.\n");
        let base = ws.drafts().baseline_for(&contract()).unwrap().id().clone();
        (ws, base)
    }

    #[test]
    fn test_open_seeds_baseline_and_initial_position() {
        let (ws, base) = opened();
        assert_eq!(ws.project_id(), "proj-1");
        assert!(ws.draft(&base).unwrap().is_baseline());
        assert_eq!(ws.machine().position().as_str(), "drafting");
        assert!(!ws.taxonomy().is_empty());
    }

    #[test]
    fn test_compare_inline_highlights_within_replaced_line() {
        let (mut ws, base) = opened();
        let edit = ws
            .save_edit(&base, "1. Scope.\n2. Payment in 60 days.\n")
            .unwrap()
            .draft_id;

        let lines = ws.compare_inline(&base, &edit).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(matches!(lines[0], InlineLine::Unchanged { .. }));
        assert!(matches!(
            lines[1],
            InlineLine::Modified {
                original_line_no: 2,
                modified_line_no: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_compare_inline_respects_size_limit() {
        let config = Config::builder().diff_max_input_bytes(24).build().unwrap();
        let (ws, base) = opened();
        let mut ws = ws.with_config(&config).unwrap();
        let edit = ws
            .save_edit(&base, "1. Scope of works and deliverables.\n")
            .unwrap()
            .draft_id;

        let err = ws.compare_inline(&base, &edit).unwrap_err();
        assert!(matches!(err, ContractFlowError::DiffInput(_)));
    }

    #[test]
    fn test_save_edit_of_unknown_parent() {
        let (mut ws, _) = opened();
        let err = ws
            .save_edit(&DraftId::new("msa-7@v42"), "anything")
            .unwrap_err();
        assert!(matches!(
            err,
            ContractFlowError::Draft(DraftError::UnknownDraft { .. })
        ));
        assert_eq!(ws.drafts().len(), 1);
    }

    #[test]
    fn test_contract_risk_ignores_baselines() {
        let (mut ws, _) = opened();
        ws.register_baseline(&contract(), "1. Scope.\n2. Payment in 30 days.\n");
        assert_eq!(ws.contract_risk(&contract()).unwrap(), None);

        let err = ws.contract_risk(&ContractId::new("nda-1")).unwrap_err();
        assert!(matches!(
            err,
            ContractFlowError::Draft(DraftError::NoBaseline { .. })
        ));
    }

    #[test]
    fn test_risk_is_measured_against_current_baseline() {
        let (mut ws, base) = opened();
        let edit = ws
            .save_edit(&base, "1. Scope.\n2. Payment in 60 days.\n")
            .unwrap()
            .draft_id;
        let before = ws.risk(&edit).unwrap();

        ws.register_baseline(&contract(), "1. Scope.\n2. Payment in 60 days.\n");
        let after = ws.risk(&edit).unwrap();

        assert!(before.score > 0.0);
        assert_eq!(after.score, 0.0);
    }

    #[test]
    fn test_approvals_require_known_draft() {
        let (mut ws, _) = opened();
        let unknown = DraftId::new("msa-7@v9");
        assert!(
            ws.add_approver(&unknown, Approver::new("legal", "Dana", "Counsel"))
                .is_err()
        );
        assert!(ws.bind_approval(&NodeId::new("approval"), &unknown).is_err());
        assert!(ws.evaluate_gate(&unknown).is_none());
    }

    #[test]
    fn test_approval_change_never_moves_workflow() {
        let (mut ws, base) = opened();
        let edit = ws.save_edit(&base, "1. Scope.\n").unwrap().draft_id;
        ws.add_approver(&edit, Approver::new("legal", "Dana", "Counsel"))
            .unwrap();
        ws.bind_approval(&NodeId::new("approval"), &edit).unwrap();

        let change = ws
            .set_approval(&edit, &ApproverId::new("legal"), ApprovalStatus::Approved, None)
            .unwrap();
        assert!(change.is_changed());
        assert_eq!(ws.machine().position().as_str(), "drafting");
        assert!(ws.machine().history().is_empty());
    }
}

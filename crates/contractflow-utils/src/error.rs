use std::fmt;
use thiserror::Error;

/// Library-level error type with rich context and user-friendly reporting.
///
/// `ContractFlowError` is the primary error type returned by contractflow
/// library operations. It provides:
/// - Detailed error information for programmatic handling
/// - User-friendly messages with context and suggestions
/// - Mapping to CLI exit codes for consistent error reporting
///
/// # Error Categories
///
/// | Category | Description |
/// |----------|-------------|
/// | `Transition` | Workflow transitions refused (gating, unknown node, ...) |
/// | `Approval` | Approver bookkeeping errors |
/// | `Draft` | Unknown drafts or missing baselines |
/// | `DiffInput` | Comparison input rejected (undecodable or oversized) |
/// | `Risk` | Invalid clause taxonomy |
/// | `Config` | Configuration file or CLI argument errors |
/// | `Collaborator` | External store / generator / identity failures |
///
/// # Atomicity
///
/// Every operation returning one of these errors has already validated its
/// input before mutating anything: an `Err` means no state changed.
///
/// # Example
///
/// ```rust
/// use contractflow_utils::error::{ContractFlowError, TransitionError};
/// use contractflow_utils::exit_codes::ExitCode;
///
/// let err = ContractFlowError::from(TransitionError::Gating {
///     node: "approval".to_string(),
///     approved: 3,
///     total: 4,
///     rejected: 0,
/// });
/// assert!(err.display_for_user().contains("3 of 4 approvals received"));
/// assert_eq!(err.to_exit_code(), ExitCode::GATING_BLOCKED);
/// ```
#[derive(Error, Debug)]
pub enum ContractFlowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Workflow transition error: {0}")]
    Transition(#[from] TransitionError),

    #[error("Approval error: {0}")]
    Approval(#[from] ApprovalError),

    #[error("Draft error: {0}")]
    Draft(#[from] DraftError),

    #[error("Diff input error: {0}")]
    DiffInput(#[from] DiffInputError),

    #[error("Risk taxonomy error: {0}")]
    Risk(#[from] RiskError),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for providing user-friendly error reporting with context and suggestions
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;
}

/// Categories of errors for better organization and handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Workflow,
    Approval,
    Drafts,
    Comparison,
    Risk,
    Collaborator,
    FileSystem,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Workflow => write!(f, "Workflow"),
            Self::Approval => write!(f, "Approval"),
            Self::Drafts => write!(f, "Drafts"),
            Self::Comparison => write!(f, "Comparison"),
            Self::Risk => write!(f, "Risk"),
            Self::Collaborator => write!(f, "Collaborator"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

// ============================================================================
// Workflow transitions
// ============================================================================

/// Errors raised by the phase state machine.
///
/// `Gating` is the recoverable, user-visible case. `InvalidTransition`
/// signals a caller or configuration bug and should not be swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Cannot advance past {node}: {approved} of {total} approvals received")]
    Gating {
        node: String,
        approved: usize,
        total: usize,
        rejected: usize,
    },

    #[error("Node '{node}' is not part of the workflow graph")]
    InvalidTransition { node: String },

    #[error("Node '{node}' requires approval but no approvers are assigned")]
    EmptyApprovalSet { node: String },

    #[error("No node follows '{from}' in the workflow")]
    NoNextNode { from: String },

    #[error("Entering '{to}' from '{from}' requires contract activation")]
    ActivationRequired { from: String, to: String },

    #[error("Contract activation is only possible from the activation phase (current: {current})")]
    NotAtActivation { current: String },

    #[error("Contract is already active")]
    AlreadyActive,

    #[error("Invalid workflow graph: {reason}")]
    InvalidGraph { reason: String },
}

impl UserFriendlyError for TransitionError {
    fn user_message(&self) -> String {
        match self {
            Self::Gating {
                node,
                approved,
                total,
                rejected,
            } => {
                if *rejected > 0 {
                    format!(
                        "The {node} step is blocked: {approved} of {total} approvals received, {rejected} rejected"
                    )
                } else {
                    format!(
                        "The {node} step is blocked: {approved} of {total} approvals received"
                    )
                }
            }
            Self::InvalidTransition { node } => {
                format!("'{node}' is not a step of this contract workflow")
            }
            Self::EmptyApprovalSet { node } => {
                format!("The {node} step needs approval but nobody has been asked to approve")
            }
            Self::NoNextNode { from } => {
                format!("'{from}' is the last step of the workflow; there is nothing to advance to")
            }
            Self::ActivationRequired { from, to } => {
                format!("Moving from {from} to {to} requires activating the contract")
            }
            Self::NotAtActivation { current } => {
                format!("The contract can only be activated from the activation step, not from {current}")
            }
            Self::AlreadyActive => "The contract has already been activated".to_string(),
            Self::InvalidGraph { reason } => format!("The workflow definition is invalid: {reason}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Gating { .. } => Some(
                "Forward progression requires every assigned approver to approve the draft under review.".to_string(),
            ),
            Self::EmptyApprovalSet { .. } => Some(
                "An approval step with no reviewers is treated as a data-entry error, never as an automatic pass.".to_string(),
            ),
            Self::InvalidTransition { .. } | Self::InvalidGraph { .. } => Some(
                "Workflow node ids come from the workflow graph loaded when the workspace was opened.".to_string(),
            ),
            Self::ActivationRequired { .. } | Self::NotAtActivation { .. } => Some(
                "Post-activation work starts only once the contract is activated.".to_string(),
            ),
            Self::NoNextNode { .. } | Self::AlreadyActive => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Gating { rejected, .. } if *rejected > 0 => vec![
                "Address the rejecting approvers' comments and submit a revised draft".to_string(),
                "Ask the rejecting approvers to reconsider once the draft is revised".to_string(),
            ],
            Self::Gating { .. } => vec![
                "Wait for the remaining approvers to record their decision".to_string(),
                "Use navigation to review other steps while approval is pending".to_string(),
            ],
            Self::EmptyApprovalSet { .. } => vec![
                "Assign at least one approver to the draft under review".to_string(),
            ],
            Self::InvalidTransition { .. } => vec![
                "Check the node id against the workflow listing".to_string(),
            ],
            Self::ActivationRequired { .. } => vec![
                "Activate the contract instead of advancing".to_string(),
            ],
            Self::NotAtActivation { .. } => vec![
                "Advance to the activation step before activating".to_string(),
            ],
            Self::NoNextNode { .. } | Self::AlreadyActive => Vec::new(),
            Self::InvalidGraph { .. } => vec![
                "Ensure node ids are unique and every phase declares a label".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Workflow
    }
}

// ============================================================================
// Approvals
// ============================================================================

/// Errors raised while maintaining approval sets
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    #[error("Approver '{approver}' is already assigned")]
    DuplicateApprover { approver: String },

    #[error("Approver '{approver}' is not assigned to this draft")]
    UnknownApprover { approver: String },

    #[error("No approval set exists for draft '{draft}'")]
    UnknownApprovalSet { draft: String },
}

impl UserFriendlyError for ApprovalError {
    fn user_message(&self) -> String {
        match self {
            Self::DuplicateApprover { approver } => {
                format!("{approver} is already on the approver list")
            }
            Self::UnknownApprover { approver } => {
                format!("{approver} is not on the approver list for this draft")
            }
            Self::UnknownApprovalSet { draft } => {
                format!("Draft {draft} has not been submitted for approval")
            }
        }
    }

    fn context(&self) -> Option<String> {
        None
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DuplicateApprover { .. } => Vec::new(),
            Self::UnknownApprover { .. } => {
                vec!["Add the approver to the draft before recording a decision".to_string()]
            }
            Self::UnknownApprovalSet { .. } => {
                vec!["Add an approver to create the draft's approval set".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Approval
    }
}

// ============================================================================
// Drafts
// ============================================================================

/// Errors raised by the draft registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Unknown draft '{draft}'")]
    UnknownDraft { draft: String },

    #[error("Contract '{contract}' has no baseline draft")]
    NoBaseline { contract: String },

    #[error("Draft '{draft}' belongs to contract '{actual}', not '{expected}'")]
    ContractMismatch {
        draft: String,
        expected: String,
        actual: String,
    },
}

impl UserFriendlyError for DraftError {
    fn user_message(&self) -> String {
        match self {
            Self::UnknownDraft { draft } => format!("Draft {draft} does not exist"),
            Self::NoBaseline { contract } => {
                format!("Contract {contract} has no baseline template to compare against")
            }
            Self::ContractMismatch {
                draft,
                expected,
                actual,
            } => format!("Draft {draft} belongs to {actual}; it cannot be used for {expected}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::NoBaseline { .. } => Some(
                "Baselines are seeded from the template store when the workspace opens.".to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NoBaseline { .. } => {
                vec!["Register a baseline draft for the contract first".to_string()]
            }
            _ => Vec::new(),
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Drafts
    }
}

// ============================================================================
// Diff input
// ============================================================================

/// Which side of a comparison an input error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSide {
    Original,
    Modified,
}

impl fmt::Display for DiffSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Modified => write!(f, "modified"),
        }
    }
}

/// Comparison input rejected before any diffing happened
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffInputError {
    #[error("{side} input is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { side: DiffSide, valid_up_to: usize },

    #[error("{side} input is {bytes} bytes, over the {limit} byte limit")]
    TooLarge {
        side: DiffSide,
        bytes: usize,
        limit: usize,
    },
}

impl UserFriendlyError for DiffInputError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidUtf8 { side, .. } => {
                format!("The {side} document is not readable text and cannot be compared")
            }
            Self::TooLarge { side, bytes, limit } => format!(
                "The {side} document is too large to compare ({bytes} bytes, limit {limit})"
            ),
        }
    }

    fn context(&self) -> Option<String> {
        Some("Only this comparison was rejected; no other workspace state is affected.".to_string())
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidUtf8 { .. } => vec![
                "Export the document as plain UTF-8 text before comparing".to_string(),
            ],
            Self::TooLarge { .. } => vec![
                "Raise diff_max_input_bytes in .contractflow/config.toml".to_string(),
                "Compare individual sections instead of the whole document".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Comparison
    }
}

// ============================================================================
// Risk taxonomy
// ============================================================================

/// Invalid clause taxonomy or scoring configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Clause category '{category}' has weight {weight}; weights must be within 0..=1")]
    InvalidWeight { category: String, weight: f64 },

    #[error(
        "Score blend must sum to 1 (change_weight {change_weight} + category_weight {category_weight})"
    )]
    InvalidBlend {
        change_weight: f64,
        category_weight: f64,
    },

    #[error("Keyword '{keyword}' of category '{category}' is not a valid pattern: {reason}")]
    InvalidPattern {
        category: String,
        keyword: String,
        reason: String,
    },

    #[error("Clause category '{name}' is defined more than once")]
    DuplicateCategory { name: String },
}

impl UserFriendlyError for RiskError {
    fn user_message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Option<String> {
        Some("Clause weights come from the clause taxonomy configuration.".to_string())
    }

    fn suggestions(&self) -> Vec<String> {
        vec!["Check the [risk] section of .contractflow/config.toml".to_string()]
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Risk
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: String },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },

    #[error("Configuration validation failed: {error_count} errors")]
    ValidationFailed {
        errors: Vec<String>,
        error_count: usize,
    },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
            Self::DiscoveryFailed { reason } => {
                format!("Failed to discover configuration: {reason}")
            }
            Self::ValidationFailed { errors, .. } => format!(
                "Configuration validation failed with {} errors: {}",
                errors.len(),
                errors.join(", ")
            ),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files must be valid TOML with optional [defaults] and [risk] sections."
                    .to_string(),
            ),
            Self::NotFound { .. } | Self::DiscoveryFailed { .. } => Some(
                "contractflow searches for .contractflow/config.toml starting from the current directory upward."
                    .to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec![
                "Check the TOML syntax using a TOML validator".to_string(),
            ],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "granularity" => vec!["Use 'line' or 'char'".to_string()],
                "diff_max_input_bytes" => vec!["Use a positive integer value".to_string()],
                _ => vec!["Remove the option to use the default value".to_string()],
            },
            Self::NotFound { .. } => vec![
                "Create .contractflow/config.toml in your project root".to_string(),
                "Omit --config to use built-in defaults".to_string(),
            ],
            Self::DiscoveryFailed { .. } => vec![
                "Check read permissions on the directory tree".to_string(),
            ],
            Self::ValidationFailed { .. } => Vec::new(),
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

// ============================================================================
// External collaborators
// ============================================================================

/// Failures reported by external collaborators.
///
/// These never originate from, nor alter, workflow or approval state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("Document store failed: {reason}")]
    Store { reason: String },

    #[error("Text generation failed: {reason}")]
    Generation { reason: String },

    #[error("Identity provider failed: {reason}")]
    Identity { reason: String },
}

impl UserFriendlyError for CollaboratorError {
    fn user_message(&self) -> String {
        match self {
            Self::Store { reason } => format!("Could not reach the document store: {reason}"),
            Self::Generation { reason } => format!("No response could be generated: {reason}"),
            Self::Identity { reason } => format!("Could not determine the current user: {reason}"),
        }
    }

    fn context(&self) -> Option<String> {
        Some("The contract workflow itself is unchanged.".to_string())
    }

    fn suggestions(&self) -> Vec<String> {
        vec!["Retry the request".to_string()]
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Collaborator
    }
}

// ============================================================================
// ContractFlowError reporting and exit code mapping
// ============================================================================

impl UserFriendlyError for ContractFlowError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.user_message(),
            Self::Transition(err) => err.user_message(),
            Self::Approval(err) => err.user_message(),
            Self::Draft(err) => err.user_message(),
            Self::DiffInput(err) => err.user_message(),
            Self::Risk(err) => err.user_message(),
            Self::Collaborator(err) => err.user_message(),
            Self::Io(err) => format!("File system operation failed: {err}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(err) => err.context(),
            Self::Transition(err) => err.context(),
            Self::Approval(err) => err.context(),
            Self::Draft(err) => err.context(),
            Self::DiffInput(err) => err.context(),
            Self::Risk(err) => err.context(),
            Self::Collaborator(err) => err.context(),
            Self::Io(_) => {
                Some("This usually indicates a missing file or a permissions issue.".to_string())
            }
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.suggestions(),
            Self::Transition(err) => err.suggestions(),
            Self::Approval(err) => err.suggestions(),
            Self::Draft(err) => err.suggestions(),
            Self::DiffInput(err) => err.suggestions(),
            Self::Risk(err) => err.suggestions(),
            Self::Collaborator(err) => err.suggestions(),
            Self::Io(_) => vec!["Check that the path exists and is readable".to_string()],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(err) => err.category(),
            Self::Transition(err) => err.category(),
            Self::Approval(err) => err.category(),
            Self::Draft(err) => err.category(),
            Self::DiffInput(err) => err.category(),
            Self::Risk(err) => err.category(),
            Self::Collaborator(err) => err.category(),
            Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

impl ContractFlowError {
    /// Get a user-friendly error message with context and actionable suggestions.
    ///
    /// ```text
    /// Error: <user message>
    ///
    /// Context: <context if available>
    ///
    /// Suggestions:
    ///   • <suggestion 1>
    /// ```
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error: {}\n", self.user_message()));

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }

    /// Whether the caller can recover by waiting or retrying, as opposed to
    /// fixing a bug or its configuration.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transition(err) => matches!(
                err,
                TransitionError::Gating { .. }
                    | TransitionError::EmptyApprovalSet { .. }
                    | TransitionError::ActivationRequired { .. }
                    | TransitionError::NotAtActivation { .. }
                    | TransitionError::NoNextNode { .. }
            ),
            Self::DiffInput(_) | Self::Collaborator(_) => true,
            _ => false,
        }
    }

    /// Map this error to the appropriate CLI exit code.
    ///
    /// | Exit Code | Name | Description |
    /// |-----------|------|-------------|
    /// | 1 | INTERNAL | General failure |
    /// | 2 | CLI_ARGS | Invalid arguments or configuration |
    /// | 3 | GATING_BLOCKED | Advance refused by an approval gate |
    /// | 4 | DIFF_INPUT | Comparison input rejected |
    /// | 5 | INVALID_TRANSITION | Unknown node or impossible transition |
    #[must_use]
    pub fn to_exit_code(&self) -> crate::exit_codes::ExitCode {
        use crate::exit_codes::ExitCode;

        match self {
            Self::Config(_) | Self::Risk(_) => ExitCode::CLI_ARGS,
            Self::Transition(err) => match err {
                TransitionError::Gating { .. } | TransitionError::EmptyApprovalSet { .. } => {
                    ExitCode::GATING_BLOCKED
                }
                _ => ExitCode::INVALID_TRANSITION,
            },
            Self::DiffInput(_) => ExitCode::DIFF_INPUT,
            _ => ExitCode::INTERNAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit_codes::ExitCode;

    #[test]
    fn test_gating_message_names_unmet_condition() {
        let err = TransitionError::Gating {
            node: "approval".to_string(),
            approved: 3,
            total: 4,
            rejected: 0,
        };
        assert_eq!(
            err.to_string(),
            "Cannot advance past approval: 3 of 4 approvals received"
        );
        assert!(err.user_message().contains("3 of 4 approvals received"));
        assert!(!err.user_message().contains("rejected"));
    }

    #[test]
    fn test_gating_message_mentions_rejections() {
        let err = TransitionError::Gating {
            node: "approval".to_string(),
            approved: 2,
            total: 4,
            rejected: 1,
        };
        assert!(err.user_message().contains("1 rejected"));
        assert!(err.suggestions()[0].contains("rejecting"));
    }

    #[test]
    fn test_display_for_user_layout() {
        let err = ContractFlowError::from(TransitionError::EmptyApprovalSet {
            node: "approval".to_string(),
        });
        let shown = err.display_for_user();
        assert!(shown.starts_with("Error: "));
        assert!(shown.contains("\nContext: "));
        assert!(shown.contains("Suggestions:\n  • Assign at least one approver"));
    }

    #[test]
    fn test_exit_code_mapping() {
        let gating = ContractFlowError::from(TransitionError::Gating {
            node: "approval".to_string(),
            approved: 0,
            total: 1,
            rejected: 0,
        });
        assert_eq!(gating.to_exit_code(), ExitCode::GATING_BLOCKED);

        let unknown = ContractFlowError::from(TransitionError::InvalidTransition {
            node: "nowhere".to_string(),
        });
        assert_eq!(unknown.to_exit_code(), ExitCode::INVALID_TRANSITION);

        let input = ContractFlowError::from(DiffInputError::InvalidUtf8 {
            side: DiffSide::Modified,
            valid_up_to: 3,
        });
        assert_eq!(input.to_exit_code(), ExitCode::DIFF_INPUT);

        let config = ContractFlowError::from(ConfigError::InvalidFile("bad".to_string()));
        assert_eq!(config.to_exit_code(), ExitCode::CLI_ARGS);
    }

    #[test]
    fn test_recoverability() {
        let gating = ContractFlowError::from(TransitionError::Gating {
            node: "approval".to_string(),
            approved: 0,
            total: 1,
            rejected: 0,
        });
        assert!(gating.is_recoverable());

        let invalid = ContractFlowError::from(TransitionError::InvalidTransition {
            node: "x".to_string(),
        });
        assert!(!invalid.is_recoverable());
    }

    #[test]
    fn test_category_delegation() {
        let err = ContractFlowError::from(DraftError::NoBaseline {
            contract: "msa".to_string(),
        });
        assert_eq!(err.category(), ErrorCategory::Drafts);
        assert_eq!(err.category().to_string(), "Drafts");
    }
}

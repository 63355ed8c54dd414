//! Gate result types for approval evaluation
//!
//! This module provides types for representing gate evaluation results.

use serde::{Deserialize, Serialize};

/// Result of gate evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateResult {
    /// Whether the draft passed all gate checks
    pub passed: bool,

    /// Human-readable summary of result
    pub summary: String,

    /// Individual conditions evaluated
    pub conditions: Vec<GateCondition>,

    /// Reasons for failure (if any)
    pub failure_reasons: Vec<String>,
}

/// Individual condition evaluated by gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateCondition {
    /// Name of condition
    pub name: String,

    /// Description of what the condition checks
    pub description: String,

    /// Whether the condition passed
    pub passed: bool,

    /// Actual value observed
    pub actual: Option<String>,

    /// Expected value for passing
    pub expected: Option<String>,
}

impl GateCondition {
    pub(crate) fn new(
        name: &str,
        description: &str,
        passed: bool,
        actual: impl ToString,
        expected: impl ToString,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            passed,
            actual: Some(actual.to_string()),
            expected: Some(expected.to_string()),
        }
    }
}

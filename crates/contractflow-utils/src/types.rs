use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a contract within a project workspace.
    ContractId
);

string_id!(
    /// Identifier of an immutable draft snapshot.
    ///
    /// Draft ids are minted by the draft registry as `<contract>@v<n>`.
    DraftId
);

string_id!(
    /// Identifier of a workflow node (phase or sub-phase).
    ///
    /// Sub-phase ids are unique across the whole graph, e.g. `approval`
    /// rather than `pre-activation/approval`.
    NodeId
);

string_id!(
    /// Identifier of an approver, usually supplied by the identity provider.
    ApproverId
);

/// Status of a workflow node.
///
/// The set is closed: a node is either waiting, in progress, or done.
/// Serializes as lowercase (`"pending"`, `"active"`, `"complete"`).
///
/// # Example
///
/// ```rust
/// use contractflow_utils::types::NodeStatus;
///
/// assert_eq!(NodeStatus::Active.as_str(), "active");
/// assert_eq!("complete".parse::<NodeStatus>().unwrap(), NodeStatus::Complete);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NodeStatus {
    /// Not yet reached.
    #[default]
    Pending,
    /// Currently being worked on.
    Active,
    /// Exited forward via `advance()` or contract activation.
    Complete,
}

impl NodeStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Complete => "complete",
        }
    }
}

/// Decision recorded by a single approver.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Project-level lifecycle flag.
///
/// Flips from `PreActivation` to `Active` exactly once, when the contract
/// is activated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    PreActivation,
    Active,
}

/// Source of a configuration value, used for attribution in status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Cli,
    Config,
    Programmatic,
    Default,
}

impl ConfigSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Config => "config",
            Self::Programmatic => "programmatic",
            Self::Default => "default",
        }
    }
}

use std::collections::HashMap;
use std::path::PathBuf;

use contractflow_diff::{DiffLimits, Granularity};
use contractflow_risk::{ClauseTaxonomy, TaxonomySpec};
use contractflow_utils::error::RiskError;
use contractflow_utils::types::ConfigSource;
use serde::{Deserialize, Serialize};

/// Hard ceiling for `diff_max_input_bytes` (64 MiB).
pub const MAX_DIFF_INPUT_BYTES: usize = 64 * 1024 * 1024;

/// `[defaults]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<Granularity>,
    /// Upper bound per comparison side, in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_max_input_bytes: Option<usize>,
}

/// Configuration for contractflow operations.
///
/// Use [`Config::discover`] for CLI-like behavior (upward search for
/// `.contractflow/config.toml`) or [`Config::builder`] for deterministic
/// programmatic construction.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub defaults: Defaults,
    /// `[risk]` section: score blend and clause categories.
    pub risk: TaxonomySpec,
    /// Path of the loaded config file, if any.
    pub config_path: Option<PathBuf>,
    pub(crate) source_attribution: HashMap<String, ConfigSource>,
}

/// Overrides supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Explicit config file; disables discovery.
    pub config_path: Option<PathBuf>,
    pub verbose: Option<bool>,
    pub granularity: Option<Granularity>,
    pub diff_max_input_bytes: Option<usize>,
}

impl Config {
    #[must_use]
    pub fn verbose(&self) -> bool {
        self.defaults.verbose.unwrap_or(false)
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.defaults.granularity.unwrap_or_default()
    }

    #[must_use]
    pub fn diff_limits(&self) -> DiffLimits {
        match self.defaults.diff_max_input_bytes {
            Some(max_input_bytes) => DiffLimits { max_input_bytes },
            None => DiffLimits::default(),
        }
    }

    /// Compile the configured clause taxonomy.
    ///
    /// # Errors
    ///
    /// Returns a [`RiskError`] if the `[risk]` section is invalid. A
    /// validated `Config` never fails here.
    pub fn taxonomy(&self) -> Result<ClauseTaxonomy, RiskError> {
        self.risk.build()
    }

    /// Where a key's effective value came from.
    #[must_use]
    pub fn source_of(&self, key: &str) -> ConfigSource {
        self.source_attribution
            .get(key)
            .copied()
            .unwrap_or(ConfigSource::Default)
    }
}

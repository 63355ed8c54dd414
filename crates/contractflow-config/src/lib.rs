//! Configuration model, discovery, and validation for contractflow.
//!
//! Precedence is CLI > `.contractflow/config.toml` > built-in defaults.
//! Every effective value remembers where it came from (see
//! [`Config::effective_config`]).

mod builder;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use discovery::resolve_taxonomy_path;
pub use model::{CliArgs, Config, Defaults, MAX_DIFF_INPUT_BYTES};

pub use contractflow_utils::types::ConfigSource;

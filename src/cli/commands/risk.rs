//! Risk command implementation
//!
//! Handles `contractflow risk`: a line diff of two documents scored
//! against the clause taxonomy.

use std::path::Path;

use anyhow::{Context, Result};
use contractflow_config::resolve_taxonomy_path;
use contractflow_diff::{Granularity, diff_bytes};
use contractflow_risk::{ClauseTaxonomy, RiskLevel, load_taxonomy_from_path, score};
use contractflow_utils::error::{ConfigError, RiskError};
use tracing::debug;

use super::common::{display_name, read_document};
use super::json_emit::{CLI_SCHEMA_VERSION, RiskJsonOutput, emit_risk_json};
use crate::{Config, ContractFlowError};

pub fn execute_risk_command(
    original: &Path,
    modified: &Path,
    taxonomy_path: Option<&Path>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let (taxonomy, taxonomy_source) = load_taxonomy(taxonomy_path, config)?;

    let old = read_document(original)?;
    let new = read_document(modified)?;
    // Risk is always measured on paragraph/line tokens.
    let result = diff_bytes(&old, &new, Granularity::Line, &config.diff_limits())
        .map_err(ContractFlowError::from)?;
    let assessment = score(&result, &taxonomy);
    let advisory = assessment.advisory();

    if json {
        let output = RiskJsonOutput {
            schema_version: CLI_SCHEMA_VERSION.to_string(),
            original: display_name(original),
            modified: display_name(modified),
            taxonomy_source,
            assessment,
            advisory,
        };
        println!("{}", emit_risk_json(&output)?);
        return Ok(());
    }

    let marker = match assessment.level {
        RiskLevel::Low => "✓",
        RiskLevel::Medium => "!",
        RiskLevel::High => "✗",
    };
    println!(
        "{marker} Risk: {:.1}/10 ({})",
        assessment.score, assessment.level
    );
    println!(
        "  Changed: {:.0}% of the original text",
        assessment.changed_ratio * 100.0
    );
    if !assessment.categories.is_empty() {
        println!("  Clause categories:");
        for hit in &assessment.categories {
            println!(
                "    - {} (weight {:.2}): {} segment(s), {} chars",
                hit.name, hit.weight, hit.segments, hit.chars
            );
        }
    }
    if let Some(advisory) = advisory {
        println!();
        println!("  {advisory}");
    }
    println!("  Taxonomy: {taxonomy_source}");
    Ok(())
}

/// Resolve the clause taxonomy: a stand-alone file when one is given or
/// discovered, otherwise the `[risk]` section of the configuration.
fn load_taxonomy(explicit: Option<&Path>, config: &Config) -> Result<(ClauseTaxonomy, String)> {
    let start_dir = std::env::current_dir().context("Failed to get current directory")?;
    let path = resolve_taxonomy_path(explicit, &start_dir).map_err(into_library_error)?;

    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading stand-alone taxonomy");
            let taxonomy = load_taxonomy_from_path(&path).map_err(into_library_error)?;
            Ok((taxonomy, path.display().to_string()))
        }
        None => {
            let taxonomy = config.taxonomy().map_err(ContractFlowError::from)?;
            Ok((taxonomy, config.source_of("risk").as_str().to_string()))
        }
    }
}

/// Surface typed configuration and taxonomy failures as library errors so
/// they get a contextual report and the matching exit code.
fn into_library_error(err: anyhow::Error) -> anyhow::Error {
    let err = match err.downcast::<ConfigError>() {
        Ok(config_err) => return ContractFlowError::from(config_err).into(),
        Err(err) => err,
    };
    if let Some(risk_err) = err.downcast_ref::<RiskError>() {
        let context = format!("{err:#}");
        return anyhow::Error::new(ContractFlowError::from(risk_err.clone())).context(context);
    }
    ContractFlowError::from(ConfigError::InvalidFile(format!("{err:#}"))).into()
}

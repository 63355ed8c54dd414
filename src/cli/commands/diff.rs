//! Diff command implementation
//!
//! Handles `contractflow diff` for comparing two contract documents.

use std::path::Path;

use anyhow::Result;
use contractflow_diff::{diff_bytes, render_unified};
use tracing::debug;

use super::common::{display_name, read_document};
use super::json_emit::{CLI_SCHEMA_VERSION, DiffJsonOutput, emit_diff_json};
use crate::{Config, ContractFlowError};

/// Execute the diff command.
pub fn execute_diff_command(
    original: &Path,
    modified: &Path,
    json: bool,
    config: &Config,
) -> Result<()> {
    let granularity = config.granularity();
    let old = read_document(original)?;
    let new = read_document(modified)?;

    let result = diff_bytes(&old, &new, granularity, &config.diff_limits())
        .map_err(ContractFlowError::from)?;
    let stats = result.stats();
    debug!(
        granularity = %granularity,
        segments = result.segments().len(),
        edit_cost = stats.edit_cost(),
        "Documents compared"
    );

    if json {
        let output = DiffJsonOutput {
            schema_version: CLI_SCHEMA_VERSION.to_string(),
            original: display_name(original),
            modified: display_name(modified),
            granularity,
            identical: result.is_identical(),
            stats,
            segments: result.into_segments(),
        };
        println!("{}", emit_diff_json(&output)?);
        return Ok(());
    }

    println!("--- {}", original.display());
    println!("+++ {}", modified.display());
    if result.is_identical() {
        println!("✓ No differences");
        return Ok(());
    }
    print!("{}", render_unified(&result));
    println!();
    println!(
        "{} added, {} removed, {} unchanged ({granularity} granularity)",
        stats.added_tokens, stats.removed_tokens, stats.unchanged_tokens
    );
    Ok(())
}

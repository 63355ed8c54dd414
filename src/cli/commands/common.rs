//! Helpers shared by the command implementations.

use std::path::Path;

use anyhow::{Context, Result};

use crate::ContractFlowError;

/// Read a document from disk as raw bytes; decoding is left to the diff engine.
pub fn read_document(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(ContractFlowError::from)
        .with_context(|| format!("Failed to read document: {}", path.display()))
}

/// File name for display, falling back to the full path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

use anyhow::{Context, Result};
use serde::Serialize;

/// Emit a value as JCS-canonical JSON (RFC 8785).
///
/// This is the standard way to emit JSON contracts (status snapshots, CLI
/// `--json` output). JCS ensures deterministic output regardless of field
/// ordering in the source struct, so repeated renders of the same state are
/// byte-identical.
///
/// # Example
///
/// ```rust
/// use contractflow_utils::canonicalization::emit_jcs;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     total: u32,
///     approved: u32,
/// }
///
/// let json = emit_jcs(&Summary { total: 4, approved: 3 }).unwrap();
/// assert_eq!(json, r#"{"approved":3,"total":4}"#);
/// ```
pub fn emit_jcs<T: Serialize>(value: &T) -> Result<String> {
    let json_value =
        serde_json::to_value(value).with_context(|| "Failed to serialize value to JSON")?;
    let json_bytes = serde_json_canonicalizer::to_vec(&json_value)
        .with_context(|| "Failed to canonicalize JSON using JCS")?;
    String::from_utf8(json_bytes).with_context(|| "JCS output contained invalid UTF-8")
}

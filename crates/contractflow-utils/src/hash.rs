//! BLAKE3 content identity for draft snapshots.

use blake3::Hasher;

/// Hex-encoded BLAKE3 hash of `content`.
///
/// The hash is taken over the exact bytes; no line-ending or whitespace
/// normalization is applied, so two contents hash equal only if they are
/// byte-for-byte identical.
#[must_use]
pub fn content_hash(content: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(content.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// First 8 hex characters of a hash, for display.
#[must_use]
pub fn short_hash(hash: &str) -> &str {
    hash.get(..8).unwrap_or(hash)
}

//! Foundation utilities shared by every contractflow crate.
//!
//! - [`types`] - identifiers and closed status enums
//! - [`error`] - the library error taxonomy and user-facing reporting
//! - [`exit_codes`] - CLI exit code table
//! - [`logging`] - tracing subscriber setup and workflow log helpers
//! - [`hash`] - BLAKE3 content identity
//! - [`canonicalization`] - JCS (RFC 8785) JSON emission

pub mod canonicalization;
pub mod error;
pub mod exit_codes;
pub mod hash;
pub mod logging;
pub mod types;

//! Exit code constants for the contractflow CLI.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `GATING_BLOCKED` | Forward transition refused by an approval gate |
//! | 4 | `DIFF_INPUT` | Comparison input rejected |
//! | 5 | `INVALID_TRANSITION` | Unknown node or impossible transition |

/// Exit codes matching the documented exit code table.
///
/// # Example
///
/// ```rust
/// use contractflow_utils::exit_codes::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::GATING_BLOCKED, ExitCode::from_i32(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Success - operation completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Internal error - general failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// CLI arguments error - invalid arguments or configuration
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// Gating blocked - approvals missing or rejected
    pub const GATING_BLOCKED: ExitCode = ExitCode(3);

    /// Diff input rejected - undecodable or oversized input
    pub const DIFF_INPUT: ExitCode = ExitCode(4);

    /// Invalid transition - unknown node id or impossible move
    pub const INVALID_TRANSITION: ExitCode = ExitCode(5);

    /// Get the numeric exit code value.
    ///
    /// Use this with `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Create an ExitCode from a raw i32 value.
    ///
    /// Prefer using the named constants when possible.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

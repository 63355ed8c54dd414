//! Document version diff engine.
//!
//! Computes a minimal edit script between two text blobs with linear-space
//! Myers, at line (paragraph) or character granularity.
//!
//! # Guarantees
//!
//! - Concatenating `Unchanged` and `Removed` segment texts reproduces the
//!   original input exactly; `Unchanged` and `Added` reproduce the modified
//!   input.
//! - Identical inputs produce exactly one `Unchanged` segment.
//! - Within each changed region, the `Removed` segment precedes the
//!   `Added` segment.
//! - Output is deterministic: common prefixes and suffixes are always
//!   matched before the middle is diffed.
//!
//! # Example
//!
//! ```rust
//! use contractflow_diff::{diff, Granularity, SegmentKind};
//!
//! let result = diff("A B C", "A X C", Granularity::Char);
//! let kinds: Vec<_> = result.segments().iter().map(|s| s.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [SegmentKind::Unchanged, SegmentKind::Removed, SegmentKind::Added, SegmentKind::Unchanged]
//! );
//! assert_eq!(result.original_text(), "A B C");
//! assert_eq!(result.modified_text(), "A X C");
//! ```

mod engine;
mod inline;
mod model;
mod myers;
mod render;

pub use engine::{diff, diff_bytes, diff_checked};
pub use inline::{InlineLine, inline_changes, refine_lines};
pub use model::{
    DEFAULT_MAX_INPUT_BYTES, DiffLimits, DiffResult, DiffSegment, DiffStats, Granularity,
    SegmentKind,
};
pub use render::render_unified;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default upper bound on each side of a comparison, in bytes.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 512 * 1024;

/// Unit of comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Granularity {
    /// Paragraph/line tokens, each keeping its terminator.
    #[default]
    Line,
    /// Unicode scalar values; used for intra-clause highlighting.
    Char,
}

/// Classification of a diff segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Added,
    Removed,
    Unchanged,
}

/// A maximal run of tokens sharing the same kind.
///
/// Line numbers are 1-based and refer to the first line of the run. They are
/// only present for line granularity: `Unchanged` carries both, `Removed`
/// only the original, `Added` only the modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub kind: SegmentKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_line_no: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_line_no: Option<usize>,
}

impl DiffSegment {
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.kind != SegmentKind::Unchanged
    }

    /// Number of tokens in this segment at the given granularity.
    #[must_use]
    pub fn token_count(&self, granularity: Granularity) -> usize {
        match granularity {
            Granularity::Line => self.text.split_inclusive('\n').count(),
            Granularity::Char => self.text.chars().count(),
        }
    }
}

/// Ordered edit script produced by the diff engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffResult {
    granularity: Granularity,
    segments: Vec<DiffSegment>,
}

impl DiffResult {
    pub(crate) fn new(granularity: Granularity, segments: Vec<DiffSegment>) -> Self {
        Self {
            granularity,
            segments,
        }
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    #[must_use]
    pub fn segments(&self) -> &[DiffSegment] {
        &self.segments
    }

    #[must_use]
    pub fn into_segments(self) -> Vec<DiffSegment> {
        self.segments
    }

    /// True when the edit script contains no `Added` or `Removed` segment.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        !self.segments.iter().any(DiffSegment::is_change)
    }

    /// Segments that changed (`Added` or `Removed`), in order.
    pub fn changes(&self) -> impl Iterator<Item = &DiffSegment> {
        self.segments.iter().filter(|s| s.is_change())
    }

    /// Reconstruct the original input from `Unchanged` and `Removed` segments.
    #[must_use]
    pub fn original_text(&self) -> String {
        self.segments
            .iter()
            .filter(|s| s.kind != SegmentKind::Added)
            .map(|s| s.text.as_str())
            .collect()
    }

    /// Reconstruct the modified input from `Unchanged` and `Added` segments.
    #[must_use]
    pub fn modified_text(&self) -> String {
        self.segments
            .iter()
            .filter(|s| s.kind != SegmentKind::Removed)
            .map(|s| s.text.as_str())
            .collect()
    }

    /// Counters over the edit script.
    #[must_use]
    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::default();
        for segment in &self.segments {
            let tokens = segment.token_count(self.granularity);
            let chars = segment.text.chars().count();
            match segment.kind {
                SegmentKind::Added => {
                    stats.added_segments += 1;
                    stats.added_tokens += tokens;
                    stats.added_chars += chars;
                }
                SegmentKind::Removed => {
                    stats.removed_segments += 1;
                    stats.removed_tokens += tokens;
                    stats.removed_chars += chars;
                }
                SegmentKind::Unchanged => {
                    stats.unchanged_segments += 1;
                    stats.unchanged_tokens += tokens;
                    stats.unchanged_chars += chars;
                }
            }
        }
        stats
    }
}

/// Edit script statistics.
///
/// Token counts are lines or characters depending on granularity; character
/// counts are always Unicode scalar values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added_segments: usize,
    pub removed_segments: usize,
    pub unchanged_segments: usize,
    pub added_tokens: usize,
    pub removed_tokens: usize,
    pub unchanged_tokens: usize,
    pub added_chars: usize,
    pub removed_chars: usize,
    pub unchanged_chars: usize,
}

impl DiffStats {
    /// Edit cost: tokens inserted plus tokens deleted.
    #[must_use]
    pub fn edit_cost(&self) -> usize {
        self.added_tokens + self.removed_tokens
    }

    #[must_use]
    pub fn original_chars(&self) -> usize {
        self.unchanged_chars + self.removed_chars
    }

    #[must_use]
    pub fn modified_chars(&self) -> usize {
        self.unchanged_chars + self.added_chars
    }

    /// Changed characters relative to the original length, capped at 1.
    ///
    /// An empty original with any addition counts as fully changed.
    #[must_use]
    pub fn changed_ratio(&self) -> f64 {
        let changed = self.added_chars + self.removed_chars;
        if changed == 0 {
            return 0.0;
        }
        let original = self.original_chars();
        if original == 0 {
            return 1.0;
        }
        (changed as f64 / original as f64).min(1.0)
    }
}

/// Input bounds enforced by the checked entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLimits {
    pub max_input_bytes: usize,
}

impl Default for DiffLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(kind: SegmentKind, text: &str) -> DiffSegment {
        DiffSegment {
            kind,
            text: text.to_string(),
            original_line_no: None,
            modified_line_no: None,
        }
    }

    #[test]
    fn test_reconstruction_filters_by_kind() {
        let result = DiffResult::new(
            Granularity::Char,
            vec![
                seg(SegmentKind::Unchanged, "net "),
                seg(SegmentKind::Removed, "30"),
                seg(SegmentKind::Added, "60"),
                seg(SegmentKind::Unchanged, " days"),
            ],
        );
        assert_eq!(result.original_text(), "net 30 days");
        assert_eq!(result.modified_text(), "net 60 days");
        assert!(!result.is_identical());
        assert_eq!(result.changes().count(), 2);
    }

    #[test]
    fn test_stats_for_line_granularity() {
        let result = DiffResult::new(
            Granularity::Line,
            vec![
                seg(SegmentKind::Unchanged, "a\nb\n"),
                seg(SegmentKind::Removed, "c\n"),
                seg(SegmentKind::Added, "x\ny\n"),
            ],
        );
        let stats = result.stats();
        assert_eq!(stats.unchanged_tokens, 2);
        assert_eq!(stats.removed_tokens, 1);
        assert_eq!(stats.added_tokens, 2);
        assert_eq!(stats.edit_cost(), 3);
        assert_eq!(stats.original_chars(), 6);
        assert_eq!(stats.modified_chars(), 8);
    }

    #[test]
    fn test_changed_ratio_edges() {
        assert_eq!(DiffStats::default().changed_ratio(), 0.0);

        let only_added = DiffStats {
            added_chars: 5,
            ..DiffStats::default()
        };
        assert_eq!(only_added.changed_ratio(), 1.0);

        let rewrite = DiffStats {
            added_chars: 10,
            removed_chars: 10,
            ..DiffStats::default()
        };
        assert_eq!(rewrite.changed_ratio(), 1.0);

        let partial = DiffStats {
            removed_chars: 1,
            added_chars: 1,
            unchanged_chars: 3,
            ..DiffStats::default()
        };
        assert!((partial.changed_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_granularity_parsing() {
        assert_eq!("char".parse::<Granularity>().unwrap(), Granularity::Char);
        assert_eq!(Granularity::Line.to_string(), "line");
        assert!("word".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_segment_serialization_omits_missing_line_numbers() {
        let json = serde_json::to_string(&seg(SegmentKind::Added, "X")).unwrap();
        assert_eq!(json, r#"{"kind":"added","text":"X"}"#);
    }
}

use serde::{Deserialize, Serialize};

use crate::engine::diff;
use crate::model::{DiffResult, Granularity, SegmentKind};

/// One line of a side-by-side redline view.
///
/// Lines replaced one-for-one inside a changed region become `Modified`,
/// carrying a character-level diff of the pair. Surplus lines on either side
/// stay whole-line `Removed` or `Added`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InlineLine {
    Unchanged {
        original_line_no: usize,
        modified_line_no: usize,
        text: String,
    },
    Removed {
        line_no: usize,
        text: String,
    },
    Added {
        line_no: usize,
        text: String,
    },
    Modified {
        original_line_no: usize,
        modified_line_no: usize,
        fragments: DiffResult,
    },
}

/// Line diff refined with character highlighting for replaced lines.
#[must_use]
pub fn inline_changes(original: &str, modified: &str) -> Vec<InlineLine> {
    refine_lines(&diff(original, modified, Granularity::Line))
}

/// Refine an existing diff into inline lines.
///
/// A character-granularity result is first re-diffed by line, since its
/// segments carry no line numbers.
#[must_use]
pub fn refine_lines(lines: &DiffResult) -> Vec<InlineLine> {
    if lines.granularity() != Granularity::Line {
        return inline_changes(&lines.original_text(), &lines.modified_text());
    }

    let segments = lines.segments();
    let mut out = Vec::new();
    let mut i = 0;

    while i < segments.len() {
        let segment = &segments[i];
        match segment.kind {
            SegmentKind::Unchanged => {
                let mut old_no = segment.original_line_no.unwrap_or(1);
                let mut new_no = segment.modified_line_no.unwrap_or(1);
                for text in segment.text.split_inclusive('\n') {
                    out.push(InlineLine::Unchanged {
                        original_line_no: old_no,
                        modified_line_no: new_no,
                        text: text.to_string(),
                    });
                    old_no += 1;
                    new_no += 1;
                }
                i += 1;
            }
            SegmentKind::Removed => {
                let next = segments.get(i + 1).filter(|s| s.kind == SegmentKind::Added);
                let removed_start = segment.original_line_no.unwrap_or(1);
                let removed: Vec<&str> = segment.text.split_inclusive('\n').collect();
                let (added_start, added): (usize, Vec<&str>) = match next {
                    Some(s) => (
                        s.modified_line_no.unwrap_or(1),
                        s.text.split_inclusive('\n').collect(),
                    ),
                    None => (1, Vec::new()),
                };

                let paired = removed.len().min(added.len());
                for k in 0..paired {
                    out.push(InlineLine::Modified {
                        original_line_no: removed_start + k,
                        modified_line_no: added_start + k,
                        fragments: diff(removed[k], added[k], Granularity::Char),
                    });
                }
                for (k, text) in removed.iter().enumerate().skip(paired) {
                    out.push(InlineLine::Removed {
                        line_no: removed_start + k,
                        text: (*text).to_string(),
                    });
                }
                for (k, text) in added.iter().enumerate().skip(paired) {
                    out.push(InlineLine::Added {
                        line_no: added_start + k,
                        text: (*text).to_string(),
                    });
                }
                i += if next.is_some() { 2 } else { 1 };
            }
            SegmentKind::Added => {
                let start = segment.modified_line_no.unwrap_or(1);
                for (k, text) in segment.text.split_inclusive('\n').enumerate() {
                    out.push(InlineLine::Added {
                        line_no: start + k,
                        text: text.to_string(),
                    });
                }
                i += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaced_line_gets_char_fragments() {
        let lines = inline_changes(
            "Payment within 30 days.\nGoverning law: England.\n",
            "Payment within 60 days.\nGoverning law: England.\n",
        );
        assert_eq!(lines.len(), 2);
        match &lines[0] {
            InlineLine::Modified {
                original_line_no,
                modified_line_no,
                fragments,
            } => {
                assert_eq!((*original_line_no, *modified_line_no), (1, 1));
                let changed: Vec<&str> = fragments.changes().map(|s| s.text.as_str()).collect();
                assert_eq!(changed, ["3", "6"]);
            }
            other => panic!("expected modified line, got {other:?}"),
        }
        assert!(matches!(
            lines[1],
            InlineLine::Unchanged {
                original_line_no: 2,
                modified_line_no: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_surplus_lines_stay_whole() {
        let lines = inline_changes("a\nold one\nz\n", "a\nnew one\nnew two\nz\n");
        let shapes: Vec<&str> = lines
            .iter()
            .map(|l| match l {
                InlineLine::Unchanged { .. } => "=",
                InlineLine::Removed { .. } => "-",
                InlineLine::Added { .. } => "+",
                InlineLine::Modified { .. } => "~",
            })
            .collect();
        assert_eq!(shapes, ["=", "~", "+", "="]);
        assert_eq!(
            lines[2],
            InlineLine::Added {
                line_no: 3,
                text: "new two\n".to_string()
            }
        );
    }

    #[test]
    fn test_pure_deletion_and_identity() {
        let lines = inline_changes("keep\ndrop\n", "keep\n");
        assert_eq!(
            lines[1],
            InlineLine::Removed {
                line_no: 2,
                text: "drop\n".to_string()
            }
        );

        let same = inline_changes("x\ny\n", "x\ny\n");
        assert!(same.iter().all(|l| matches!(l, InlineLine::Unchanged { .. })));
        assert_eq!(same.len(), 2);
    }

    #[test]
    fn test_refine_reuses_line_diff_and_rediffs_char_results() {
        let original = "1. Fees: 100.\n2. Term: 1 year.\n";
        let modified = "1. Fees: 120.\n2. Term: 1 year.\n";
        let expected = inline_changes(original, modified);

        let by_line = diff(original, modified, Granularity::Line);
        assert_eq!(refine_lines(&by_line), expected);

        let by_char = diff(original, modified, Granularity::Char);
        assert_eq!(refine_lines(&by_char), expected);
    }
}

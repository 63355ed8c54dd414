use contractflow_utils::error::{DiffInputError, DiffSide};
use tracing::debug;

use crate::model::{DiffLimits, DiffResult, DiffSegment, Granularity, SegmentKind};
use crate::myers::{Edit, edit_script};

/// Compute the edit script between two texts.
///
/// Never fails: any pair of strings, including empty ones, yields a valid
/// result. Use [`diff_checked`] or [`diff_bytes`] to enforce input limits.
#[must_use]
pub fn diff(original: &str, modified: &str, granularity: Granularity) -> DiffResult {
    let old = tokenize(original, granularity);
    let new = tokenize(modified, granularity);

    if old == new {
        debug!(
            granularity = %granularity,
            tokens = old.len(),
            "Inputs identical"
        );
        let line_no = line_number(granularity, 0);
        return DiffResult::new(
            granularity,
            vec![DiffSegment {
                kind: SegmentKind::Unchanged,
                text: original.to_string(),
                original_line_no: line_no,
                modified_line_no: line_no,
            }],
        );
    }

    let edits = edit_script(&old, &new);
    let segments = group(&old, &new, &edits, granularity);

    debug!(
        granularity = %granularity,
        original_tokens = old.len(),
        modified_tokens = new.len(),
        segments = segments.len(),
        "Diff computed"
    );

    DiffResult::new(granularity, segments)
}

/// Like [`diff`], refusing inputs larger than `limits`.
///
/// # Errors
///
/// Returns [`DiffInputError::TooLarge`] naming the first side over the limit.
pub fn diff_checked(
    original: &str,
    modified: &str,
    granularity: Granularity,
    limits: &DiffLimits,
) -> Result<DiffResult, DiffInputError> {
    check_size(DiffSide::Original, original.len(), limits)?;
    check_size(DiffSide::Modified, modified.len(), limits)?;
    Ok(diff(original, modified, granularity))
}

/// Diff raw document bytes, decoding each side as UTF-8.
///
/// # Errors
///
/// Returns [`DiffInputError::TooLarge`] when a side exceeds `limits`, or
/// [`DiffInputError::InvalidUtf8`] when a side cannot be decoded.
pub fn diff_bytes(
    original: &[u8],
    modified: &[u8],
    granularity: Granularity,
    limits: &DiffLimits,
) -> Result<DiffResult, DiffInputError> {
    check_size(DiffSide::Original, original.len(), limits)?;
    check_size(DiffSide::Modified, modified.len(), limits)?;
    let original = decode(DiffSide::Original, original)?;
    let modified = decode(DiffSide::Modified, modified)?;
    Ok(diff(original, modified, granularity))
}

fn check_size(side: DiffSide, bytes: usize, limits: &DiffLimits) -> Result<(), DiffInputError> {
    if bytes > limits.max_input_bytes {
        return Err(DiffInputError::TooLarge {
            side,
            bytes,
            limit: limits.max_input_bytes,
        });
    }
    Ok(())
}

fn decode(side: DiffSide, bytes: &[u8]) -> Result<&str, DiffInputError> {
    std::str::from_utf8(bytes).map_err(|e| DiffInputError::InvalidUtf8 {
        side,
        valid_up_to: e.valid_up_to(),
    })
}

fn tokenize(text: &str, granularity: Granularity) -> Vec<&str> {
    match granularity {
        Granularity::Line => text.split_inclusive('\n').collect(),
        Granularity::Char => text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect(),
    }
}

fn line_number(granularity: Granularity, index: usize) -> Option<usize> {
    match granularity {
        Granularity::Line => Some(index + 1),
        Granularity::Char => None,
    }
}

/// Fold an edit script into maximal runs, removals before additions.
fn group(old: &[&str], new: &[&str], edits: &[Edit], granularity: Granularity) -> Vec<DiffSegment> {
    let mut segments = Vec::new();
    let mut i = 0;

    while i < edits.len() {
        if let Edit::Equal { old: first_old, new: first_new } = edits[i] {
            let mut text = String::new();
            while let Some(Edit::Equal { old: o, .. }) = edits.get(i) {
                text.push_str(old[*o]);
                i += 1;
            }
            segments.push(DiffSegment {
                kind: SegmentKind::Unchanged,
                text,
                original_line_no: line_number(granularity, first_old),
                modified_line_no: line_number(granularity, first_new),
            });
            continue;
        }

        let mut removed = String::new();
        let mut added = String::new();
        let mut first_removed = None;
        let mut first_added = None;
        while let Some(edit) = edits.get(i) {
            match *edit {
                Edit::Delete { old: o } => {
                    first_removed.get_or_insert(o);
                    removed.push_str(old[o]);
                }
                Edit::Insert { new: n } => {
                    first_added.get_or_insert(n);
                    added.push_str(new[n]);
                }
                Edit::Equal { .. } => break,
            }
            i += 1;
        }

        if let Some(o) = first_removed {
            segments.push(DiffSegment {
                kind: SegmentKind::Removed,
                text: removed,
                original_line_no: line_number(granularity, o),
                modified_line_no: None,
            });
        }
        if let Some(n) = first_added {
            segments.push(DiffSegment {
                kind: SegmentKind::Added,
                text: added,
                original_line_no: None,
                modified_line_no: line_number(granularity, n),
            });
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(result: &DiffResult) -> Vec<SegmentKind> {
        result.segments().iter().map(|s| s.kind).collect()
    }

    fn texts(result: &DiffResult) -> Vec<&str> {
        result.segments().iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_single_line_substitution_at_line_granularity() {
        let result = diff("A B C", "A X C", Granularity::Line);
        assert_eq!(kinds(&result), [SegmentKind::Removed, SegmentKind::Added]);
        assert_eq!(texts(&result), ["A B C", "A X C"]);
        assert_eq!(result.segments()[0].original_line_no, Some(1));
        assert_eq!(result.segments()[1].modified_line_no, Some(1));
    }

    #[test]
    fn test_single_word_substitution_at_char_granularity() {
        let result = diff("A B C", "A X C", Granularity::Char);
        assert_eq!(texts(&result), ["A ", "B", "X", " C"]);
        assert_eq!(
            kinds(&result),
            [
                SegmentKind::Unchanged,
                SegmentKind::Removed,
                SegmentKind::Added,
                SegmentKind::Unchanged
            ]
        );
        assert!(result.segments().iter().all(|s| s.original_line_no.is_none()));
    }

    #[test]
    fn test_identical_inputs_yield_one_unchanged_segment() {
        for text in ["", "same", "one\ntwo\n"] {
            for granularity in [Granularity::Line, Granularity::Char] {
                let result = diff(text, text, granularity);
                assert_eq!(result.segments().len(), 1);
                assert_eq!(result.segments()[0].kind, SegmentKind::Unchanged);
                assert_eq!(result.segments()[0].text, text);
                assert!(result.is_identical());
            }
        }
    }

    #[test]
    fn test_empty_side_yields_single_change() {
        let added = diff("", "new clause\n", Granularity::Line);
        assert_eq!(kinds(&added), [SegmentKind::Added]);
        assert_eq!(added.segments()[0].modified_line_no, Some(1));

        let removed = diff("old clause\n", "", Granularity::Line);
        assert_eq!(kinds(&removed), [SegmentKind::Removed]);
        assert_eq!(removed.segments()[0].original_line_no, Some(1));
    }

    #[test]
    fn test_line_numbers_track_both_sides() {
        let original = "1. Scope\n2. Price\n3. Term\n4. Law\n";
        let modified = "1. Scope\n2. Price\n2a. Escalation\n3. Term\n4. Venue\n";
        let result = diff(original, modified, Granularity::Line);

        assert_eq!(
            kinds(&result),
            [
                SegmentKind::Unchanged,
                SegmentKind::Added,
                SegmentKind::Unchanged,
                SegmentKind::Removed,
                SegmentKind::Added
            ]
        );
        let segs = result.segments();
        assert_eq!(segs[1].modified_line_no, Some(3));
        assert_eq!(segs[2].original_line_no, Some(3));
        assert_eq!(segs[2].modified_line_no, Some(4));
        assert_eq!(segs[3].original_line_no, Some(4));
        assert_eq!(segs[4].modified_line_no, Some(5));
        assert_eq!(result.original_text(), original);
        assert_eq!(result.modified_text(), modified);
    }

    #[test]
    fn test_missing_trailing_newline_is_a_change() {
        let result = diff("a\nb\n", "a\nb", Granularity::Line);
        assert_eq!(
            kinds(&result),
            [SegmentKind::Unchanged, SegmentKind::Removed, SegmentKind::Added]
        );
        assert_eq!(result.segments()[1].text, "b\n");
        assert_eq!(result.segments()[2].text, "b");
    }

    #[test]
    fn test_multibyte_characters_are_single_tokens() {
        let result = diff("prix: 5€", "prix: 6€", Granularity::Char);
        assert_eq!(texts(&result), ["prix: ", "5", "6", "€"]);
        assert_eq!(result.stats().edit_cost(), 2);
    }

    #[test]
    fn test_diff_checked_enforces_limit() {
        let limits = DiffLimits { max_input_bytes: 4 };
        assert!(diff_checked("abcd", "abcd", Granularity::Line, &limits).is_ok());

        let err = diff_checked("abcd", "abcde", Granularity::Line, &limits).unwrap_err();
        assert_eq!(
            err,
            DiffInputError::TooLarge {
                side: DiffSide::Modified,
                bytes: 5,
                limit: 4
            }
        );
    }

    #[test]
    fn test_disjoint_inputs_near_the_limit_diff_in_linear_space() {
        let original = "a".repeat(50_000);
        let modified = "b".repeat(50_000);
        let result =
            diff_checked(&original, &modified, Granularity::Char, &DiffLimits::default()).unwrap();

        assert_eq!(kinds(&result), [SegmentKind::Removed, SegmentKind::Added]);
        assert_eq!(result.segments()[0].text, original);
        assert_eq!(result.segments()[1].text, modified);
        assert_eq!(result.stats().edit_cost(), 100_000);
    }

    #[test]
    fn test_long_document_with_scattered_amendments() {
        let original: String = (0..5_000).map(|i| format!("Clause {i}.\n")).collect();
        let modified: String = (0..5_000)
            .map(|i| match i % 50 {
                0 => format!("Clause {}.\n", i + 1),
                _ => format!("Clause {i}.\n"),
            })
            .collect();

        let result = diff(&original, &modified, Granularity::Line);
        assert_eq!(result.original_text(), original);
        assert_eq!(result.modified_text(), modified);
        assert_eq!(result.stats().edit_cost(), 200);
    }

    #[test]
    fn test_diff_bytes_reports_invalid_utf8_position() {
        let bad = [b'o', b'k', 0xff, b'!'];
        let err = diff_bytes(&bad, b"ok", Granularity::Char, &DiffLimits::default()).unwrap_err();
        assert_eq!(
            err,
            DiffInputError::InvalidUtf8 {
                side: DiffSide::Original,
                valid_up_to: 2
            }
        );

        let ok = diff_bytes(b"net 30", b"net 60", Granularity::Char, &DiffLimits::default())
            .unwrap();
        assert_eq!(ok.modified_text(), "net 60");
    }
}

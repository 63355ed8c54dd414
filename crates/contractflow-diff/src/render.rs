use std::fmt::Write as _;

use crate::model::{DiffResult, Granularity, SegmentKind};

/// Render a diff for terminal or log output.
///
/// Line diffs print one row per line with original/modified line numbers
/// and a `-`/`+`/` ` marker. Character diffs print the text inline with
/// `[-removed-]` and `{+added+}` markers.
#[must_use]
pub fn render_unified(result: &DiffResult) -> String {
    match result.granularity() {
        Granularity::Line => render_lines(result),
        Granularity::Char => render_inline(result),
    }
}

fn render_lines(result: &DiffResult) -> String {
    let mut out = String::new();
    for segment in result.segments() {
        let mut old_no = segment.original_line_no;
        let mut new_no = segment.modified_line_no;
        for line in segment.text.split_inclusive('\n') {
            let body = line.strip_suffix('\n').unwrap_or(line);
            let sign = match segment.kind {
                SegmentKind::Added => '+',
                SegmentKind::Removed => '-',
                SegmentKind::Unchanged => ' ',
            };
            let _ = writeln!(
                out,
                "{:>4} {:>4} {sign} {body}",
                column(old_no),
                column(new_no)
            );
            old_no = old_no.map(|n| n + 1);
            new_no = new_no.map(|n| n + 1);
        }
        if !segment.text.is_empty() && !segment.text.ends_with('\n') {
            out.push_str("\\ No newline at end of text\n");
        }
    }
    out
}

fn render_inline(result: &DiffResult) -> String {
    let mut out = String::new();
    for segment in result.segments() {
        match segment.kind {
            SegmentKind::Unchanged => out.push_str(&segment.text),
            SegmentKind::Removed => {
                let _ = write!(out, "[-{}-]", segment.text);
            }
            SegmentKind::Added => {
                let _ = write!(out, "{{+{}+}}", segment.text);
            }
        }
    }
    out
}

fn column(line_no: Option<usize>) -> String {
    line_no.map_or_else(String::new, |n| n.to_string())
}

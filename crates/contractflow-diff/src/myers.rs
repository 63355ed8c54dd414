//! Linear-space Myers diff.
//!
//! Tokens that never occur on the other side can only be deleted or
//! inserted, so they are set aside before the search. What remains is split
//! recursively at the middle snake of a bidirectional search, keeping memory
//! proportional to the input length. The script is rebuilt from the matched
//! pairs with deletions placed before insertions in every gap.

use std::collections::HashSet;
use std::hash::Hash;
use std::iter;

/// One step of an edit script, indexing into the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edit {
    Equal { old: usize, new: usize },
    Delete { old: usize },
    Insert { new: usize },
}

/// Compute a minimal edit script transforming `old` into `new`.
pub(crate) fn edit_script<T: Hash + Eq>(old: &[T], new: &[T]) -> Vec<Edit> {
    let in_old: HashSet<&T> = old.iter().collect();
    let in_new: HashSet<&T> = new.iter().collect();
    let old_keep: Vec<usize> = (0..old.len())
        .filter(|&i| in_new.contains(&old[i]))
        .collect();
    let new_keep: Vec<usize> = (0..new.len())
        .filter(|&j| in_old.contains(&new[j]))
        .collect();
    let old_kept: Vec<&T> = old_keep.iter().map(|&i| &old[i]).collect();
    let new_kept: Vec<&T> = new_keep.iter().map(|&j| &new[j]).collect();

    let mut matches = Vec::new();
    collect_matches(&old_kept, 0, &new_kept, 0, &mut matches);

    script_from_matches(
        old.len(),
        new.len(),
        matches.into_iter().map(|(i, j)| (old_keep[i], new_keep[j])),
    )
}

/// Expand ascending matched pairs into a full script.
fn script_from_matches(
    n: usize,
    m: usize,
    matches: impl Iterator<Item = (usize, usize)>,
) -> Vec<Edit> {
    let mut edits = Vec::with_capacity(n.max(m));
    let (mut x, mut y) = (0, 0);

    for (i, j) in matches.chain(iter::once((n, m))) {
        edits.extend((x..i).map(|old| Edit::Delete { old }));
        edits.extend((y..j).map(|new| Edit::Insert { new }));
        if i < n && j < m {
            edits.push(Edit::Equal { old: i, new: j });
        }
        x = i + 1;
        y = j + 1;
    }

    edits
}

/// Append the pairs of a longest common subsequence, offset into the
/// enclosing sequences, in ascending order.
fn collect_matches<U: PartialEq>(
    old: &[U],
    old_off: usize,
    new: &[U],
    new_off: usize,
    matches: &mut Vec<(usize, usize)>,
) {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    matches.extend((0..prefix).map(|i| (old_off + i, new_off + i)));
    let (old, new) = (&old[prefix..], &new[prefix..]);
    let (old_off, new_off) = (old_off + prefix, new_off + prefix);

    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let (old, new) = (&old[..old.len() - suffix], &new[..new.len() - suffix]);

    if !old.is_empty() && !new.is_empty() {
        if let Some((x, y)) = middle_snake(old, new) {
            collect_matches(&old[..x], old_off, &new[..y], new_off, matches);
            collect_matches(&old[x..], old_off + x, &new[y..], new_off + y, matches);
        }
    }

    matches.extend((0..suffix).map(|i| (old_off + old.len() + i, new_off + new.len() + i)));
}

/// Find a point on a shortest edit path roughly halfway through it.
///
/// Forward and reverse searches advance one edit at a time until their
/// furthest-reaching paths overlap on a diagonal. Diagonals whose paths run
/// off the edit graph are dropped from further rounds. Only splits strictly
/// inside the graph are returned, so every recursion shrinks.
fn middle_snake<U: PartialEq>(old: &[U], new: &[U]) -> Option<(usize, usize)> {
    let n = old.len() as isize;
    let m = new.len() as isize;
    let max_d = (n + m + 1) / 2;
    let offset = max_d;
    let width = (2 * max_d + 2) as usize;
    let delta = n - m;
    let front = delta % 2 != 0;

    let mut forward = vec![-1isize; width];
    let mut reverse = vec![-1isize; width];
    forward[(offset + 1) as usize] = 0;
    reverse[(offset + 1) as usize] = 0;

    let split = |x: isize, y: isize| -> Option<(usize, usize)> {
        let inside = (0..=n).contains(&x) && (0..=m).contains(&y);
        let proper = (x, y) != (0, 0) && (x, y) != (n, m);
        (inside && proper).then_some((x as usize, y as usize))
    };
    let slot = |k: isize| -> Option<usize> {
        let idx = offset + k;
        (0..width as isize).contains(&idx).then_some(idx as usize)
    };

    let (mut k1_start, mut k1_end, mut k2_start, mut k2_end) = (0, 0, 0, 0);

    for d in 0..max_d {
        let mut k1 = -d + k1_start;
        while k1 <= d - k1_end {
            let i = (offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && forward[i - 1] < forward[i + 1]) {
                forward[i + 1]
            } else {
                forward[i - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < n && y1 < m && old[x1 as usize] == new[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            forward[i] = x1;

            if x1 > n {
                k1_end += 2;
            } else if y1 > m {
                k1_start += 2;
            } else if front {
                if let Some(j) = slot(delta - k1) {
                    if reverse[j] != -1 && x1 >= n - reverse[j] {
                        if let Some(point) = split(x1, y1) {
                            return Some(point);
                        }
                    }
                }
            }
            k1 += 2;
        }

        let mut k2 = -d + k2_start;
        while k2 <= d - k2_end {
            let i = (offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && reverse[i - 1] < reverse[i + 1]) {
                reverse[i + 1]
            } else {
                reverse[i - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < n
                && y2 < m
                && old[(n - x2 - 1) as usize] == new[(m - y2 - 1) as usize]
            {
                x2 += 1;
                y2 += 1;
            }
            reverse[i] = x2;

            if x2 > n {
                k2_end += 2;
            } else if y2 > m {
                k2_start += 2;
            } else if !front {
                if let Some(j) = slot(delta - k2) {
                    let x1 = forward[j];
                    if x1 != -1 && x1 >= n - x2 {
                        let y1 = x1 - (delta - k2);
                        if let Some(point) = split(x1, y1) {
                            return Some(point);
                        }
                    }
                }
            }
            k2 += 2;
        }
    }

    None
}

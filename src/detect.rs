//! Plain windowed Hamming matching.
//!
//! This is the unanchored matcher: every window whose total mismatch count is
//! within budget is reported, with no 3' seed and no overhang split. The main
//! search does not go through here (see [`crate::matcher`]); it backs the
//! `plain` benchmark mode and is part of the public API for callers that want
//! the simplest possible scan.
//!
//! # Examples
//! ```
//! use primerbind::detect::{hamming_distance, find_hamming_windows};
//! assert_eq!(hamming_distance("ACGT", "ACCT"), Some(1));
//! let hits = find_hamming_windows("ACGT", "TTACGTTTACCT", 1, false);
//! assert_eq!(hits.iter().map(|h| h.index).collect::<Vec<_>>(), vec![2, 8]);
//! ```
use serde::Serialize;

use crate::sequence::Template;

/// One window within the mismatch budget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HammingHit {
    /// Window start in the text.
    pub index: usize,
    pub num_mismatches: usize,
    /// Mismatch positions relative to the window.
    pub mismatch_positions: Vec<usize>,
}

/// Hamming distance between equal-length strings, `None` if lengths differ.
#[inline]
pub fn hamming_distance(a: &str, b: &str) -> Option<usize> {
    (a.len() == b.len()).then(|| a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count())
}

/// Mismatches of `pattern` at `offset`, giving up once `max_mismatches` is exceeded.
fn window_mismatches(pattern: &[u8], template: &Template<'_>, offset: usize, max_mismatches: usize) -> Option<Vec<usize>> {
    let mut out = Vec::new();
    for (i, &p) in pattern.iter().enumerate() {
        if p != template.base(offset + i) {
            out.push(i);
            if out.len() > max_mismatches {
                return None;
            }
        }
    }
    Some(out)
}

/// Every window of `text` within `max_mismatches` of `pattern`.
///
/// Both inputs are compared case-insensitively. With `circular`, windows
/// straddling the end of `text` are included.
pub fn find_hamming_windows(pattern: &str, text: &str, max_mismatches: usize, circular: bool) -> Vec<HammingHit> {
    let p = pattern.to_ascii_uppercase();
    let t = text.to_ascii_uppercase();
    let template = Template::new(t.as_bytes(), circular);
    (0..template.window_count(p.len()))
        .filter_map(|index| {
            window_mismatches(p.as_bytes(), &template, index, max_mismatches).map(|mismatch_positions| HammingHit {
                index,
                num_mismatches: mismatch_positions.len(),
                mismatch_positions,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_requires_equal_lengths() {
        assert_eq!(hamming_distance("ACGT", "ACGT"), Some(0));
        assert_eq!(hamming_distance("ACGT", "TGCA"), Some(4));
        assert_eq!(hamming_distance("ACG", "ACGT"), None);
    }

    #[test]
    fn reports_positions_within_window() {
        let hits = find_hamming_windows("acgtac", "GGACTTACGG", 1, false);
        assert_eq!(hits, vec![HammingHit { index: 2, num_mismatches: 1, mismatch_positions: vec![2] }]);
    }

    #[test]
    fn circular_windows_wrap() {
        let linear = find_hamming_windows("TTAA", "AAGGGGTT", 0, false);
        assert!(linear.is_empty());
        let circ = find_hamming_windows("TTAA", "AAGGGGTT", 0, true);
        assert_eq!(circ.len(), 1);
        assert_eq!(circ[0].index, 6);
    }

    #[test]
    fn empty_pattern_has_no_windows() {
        assert!(find_hamming_windows("", "ACGT", 2, true).is_empty());
    }
}

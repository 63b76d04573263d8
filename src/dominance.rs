//! Collapse candidates that describe the same physical site.
//!
//! Two candidates on the same strand are duplicates when they put the primer's
//! 3' end on the same template position, or when their binding intervals
//! overlap by more than half of the shorter one.
//!
//! Candidates are visited best-ranked first. One is kept unless a candidate
//! already kept is its duplicate; a discarded candidate is never reconsidered
//! and never suppresses anything. The rank is a total order, so the result
//! does not depend on the order of the input.
//!
//! Quadratic in the number of candidates; searches produce tens to a few
//! hundred, so there is no interval index here.
use std::cmp::{Ordering, Reverse};

use log::debug;

use crate::matcher::Candidate;
use crate::sequence::Template;

/// Total order over candidates: smaller ranks better.
///
/// Fewer mismatches, then shorter overhang, then longer binding region, then
/// earlier start, then shorter overhang again (the result sort order), then
/// window offset so that no two distinct candidates ever tie.
fn rank_key(c: &Candidate, template: &Template<'_>) -> (usize, usize, Reverse<usize>, usize, usize, usize) {
    (
        c.num_mismatches(),
        c.overhang_len(),
        Reverse(c.binding_len),
        c.start(template),
        c.overhang_len(),
        c.offset,
    )
}

pub fn compare_rank(a: &Candidate, b: &Candidate, template: &Template<'_>) -> Ordering {
    rank_key(a, template).cmp(&rank_key(b, template))
}

/// Shared bases between `[a, a+a_len)` and `[b, b+b_len)`, on a circle if needed.
pub fn interval_overlap(a: usize, a_len: usize, b: usize, b_len: usize, template: &Template<'_>) -> usize {
    fn linear(a: usize, a_len: usize, b: usize, b_len: usize) -> usize {
        let lo = a.max(b);
        let hi = (a + a_len).min(b + b_len);
        hi.saturating_sub(lo)
    }
    let shared = if template.is_circular() {
        let n = template.len();
        linear(a, a_len, b, b_len) + linear(a + n, a_len, b, b_len) + linear(a, a_len, b + n, b_len)
    } else {
        linear(a, a_len, b, b_len)
    };
    shared.min(a_len).min(b_len)
}

/// `true` when `a` and `b` describe the same physical site.
pub fn is_duplicate(a: &Candidate, b: &Candidate, template: &Template<'_>) -> bool {
    if a.strand != b.strand {
        return false;
    }
    if a.three_prime(template) == b.three_prime(template) {
        return true;
    }
    let shared = interval_overlap(a.start(template), a.binding_len, b.start(template), b.binding_len, template);
    2 * shared > a.binding_len.min(b.binding_len)
}

/// Keep the best candidate of every group of duplicates. Input order is preserved.
pub fn filter_dominated(candidates: Vec<Candidate>, template: &Template<'_>) -> Vec<Candidate> {
    let n = candidates.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_cached_key(|&i| rank_key(&candidates[i], template));

    let mut kept_idx: Vec<usize> = Vec::new();
    for i in order {
        if !kept_idx.iter().any(|&k| is_duplicate(&candidates[k], &candidates[i], template)) {
            kept_idx.push(i);
        }
    }

    let mut keep = vec![false; n];
    for i in kept_idx {
        keep[i] = true;
    }
    let kept: Vec<Candidate> = candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(c, k)| k.then_some(c))
        .collect();
    debug!("dominance filter kept {} of {n} candidates", kept.len());
    kept
}

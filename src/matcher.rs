//! Seed-and-extend matching of one primer window.
//!
//! The walk always starts under the primer's 3'-terminal base and moves toward
//! its 5' end. For the forward strand that is the last pattern byte walking
//! left; for the reverse strand the pattern is the reverse complement, so the
//! same walk starts at byte 0 and moves right. Indexing the walk by `t`, the
//! distance from the 3' end, makes the primer coordinate `L - 1 - t` on both
//! strands, which is what every reported position uses.
use crate::sequence::Template;
use crate::site::{SearchOptions, Strand};

/// A window that passed the matcher, before filtering and annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub strand: Strand,
    /// Template offset of the window's first base (plus-strand, unwrapped).
    pub offset: usize,
    pub primer_len: usize,
    /// Bases covered by seed + extension.
    pub binding_len: usize,
    /// Mismatches inside the binding region, full-primer coordinates, ascending.
    pub mismatches: Vec<usize>,
}

impl Candidate {
    pub fn overhang_len(&self) -> usize {
        self.primer_len - self.binding_len
    }

    pub fn num_mismatches(&self) -> usize {
        self.mismatches.len()
    }

    /// First plus-strand position of the binding region.
    pub fn start(&self, template: &Template<'_>) -> usize {
        match self.strand {
            Strand::Forward => template.wrap(self.offset + self.overhang_len()),
            Strand::Reverse => template.wrap(self.offset),
        }
    }

    /// Last plus-strand position of the binding region.
    pub fn end(&self, template: &Template<'_>) -> usize {
        template.wrap(self.start(template) + self.binding_len - 1)
    }

    /// Plus-strand position under the primer's 3'-terminal base.
    pub fn three_prime(&self, template: &Template<'_>) -> usize {
        match self.strand {
            Strand::Forward => self.end(template),
            Strand::Reverse => self.start(template),
        }
    }
}

/// Try to anneal `pattern` at `offset`.
///
/// `pattern` is the primer itself for [`Strand::Forward`] and its reverse
/// complement for [`Strand::Reverse`]. The caller guarantees the window fits
/// (linear) or wraps (circular).
pub fn extend_window(
    pattern: &[u8],
    template: &Template<'_>,
    offset: usize,
    strand: Strand,
    options: &SearchOptions,
) -> Option<Candidate> {
    let len = pattern.len();
    if len == 0 {
        return None;
    }
    let pattern_index = |t: usize| match strand {
        Strand::Forward => len - 1 - t,
        Strand::Reverse => t,
    };
    let matches_at = |t: usize| {
        let i = pattern_index(t);
        pattern[i] == template.base(offset + i)
    };

    // 3'-terminal base first; most windows stop here.
    if !matches_at(0) {
        return None;
    }
    let seed = (1..len).take_while(|&t| matches_at(t)).count() + 1;
    if seed < options.min_binding_region {
        return None;
    }

    let mut mismatches = Vec::new();
    let binding_len = if options.detect_overhang {
        let mut covered = seed;
        for t in seed..len {
            if !matches_at(t) {
                if mismatches.len() == options.max_mismatches {
                    break;
                }
                mismatches.push(len - 1 - t);
            }
            covered = t + 1;
        }
        covered
    } else {
        for t in seed..len {
            if !matches_at(t) {
                mismatches.push(len - 1 - t);
                if mismatches.len() > options.max_mismatches {
                    return None;
                }
            }
        }
        len
    };
    mismatches.reverse();

    Some(Candidate { strand, offset, primer_len: len, binding_len, mismatches })
}

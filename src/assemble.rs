//! Turn surviving candidates into sorted, numbered [`BindingSite`] values.
use crate::matcher::Candidate;
use crate::properties;
use crate::sequence::Template;
use crate::site::{BindingSite, Strand};
use crate::TmFn;

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Build the site for one candidate. `primer` is the normalized primer and
/// `pattern` what was scanned for this strand (the primer or its reverse complement).
fn materialize(
    c: &Candidate,
    primer: &[u8],
    pattern: &[u8],
    template: &Template<'_>,
    calculate_tm: Option<TmFn<'_>>,
) -> BindingSite {
    let overhang_length = c.overhang_len();
    let binding_sequence = match c.strand {
        Strand::Forward => text(&pattern[overhang_length..]),
        Strand::Reverse => text(&pattern[..c.binding_len]),
    };
    let start = c.start(template);
    let props = properties::annotate(&binding_sequence, c.strand, calculate_tm);

    let mut full_primer_mismatch_positions: Vec<usize> = (0..overhang_length).collect();
    full_primer_mismatch_positions.extend_from_slice(&c.mismatches);

    BindingSite {
        id: String::new(),
        start,
        end: c.end(template),
        forward: c.strand.is_forward(),
        num_mismatches: c.num_mismatches(),
        mismatch_positions: c.mismatches.iter().map(|k| k - overhang_length).collect(),
        matched_sequence: template.slice(start, c.binding_len),
        primer_sequence: text(primer),
        binding_sequence,
        overhang_sequence: text(&primer[..overhang_length]),
        overhang_length,
        full_primer_mismatch_positions,
        tm: props.tm,
        gc_percent: props.gc_percent,
        stability_3prime: props.stability_3prime,
    }
}

/// Materialize, annotate, sort by `(start, overhang_length)` and number the sites.
///
/// `forward` and `reverse` are the surviving candidates of each strand; the sort
/// is stable, so on ties forward sites precede reverse ones.
pub fn assemble(
    forward: &[Candidate],
    reverse: &[Candidate],
    primer: &[u8],
    primer_rc: &[u8],
    template: &Template<'_>,
    calculate_tm: Option<TmFn<'_>>,
) -> Vec<BindingSite> {
    let mut sites: Vec<BindingSite> = forward
        .iter()
        .map(|c| materialize(c, primer, primer, template, calculate_tm))
        .chain(reverse.iter().map(|c| materialize(c, primer, primer_rc, template, calculate_tm)))
        .collect();
    sites.sort_by_key(|s| (s.start, s.overhang_length));
    for (i, s) in sites.iter_mut().enumerate() {
        s.id = format!("binding-site-{i}");
    }
    sites
}

//! Per-site metrics computed over the binding region only.
//!
//! The overhang never contributes: it does not anneal, so including it would
//! inflate GC content and Tm for primers carrying restriction-site tails.
use log::warn;

use crate::sequence::reverse_complement;
use crate::site::Strand;
use crate::thermo::stack_delta_g;
use crate::TmFn;

/// Bases at the 3' end considered for end stability.
pub const THREE_PRIME_WINDOW: usize = 5;

/// Derived metrics attached to a site.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SiteProperties {
    pub tm: Option<f64>,
    pub gc_percent: Option<f64>,
    pub stability_3prime: Option<f64>,
}

/// GC content in percent (0–100). `None` for an empty sequence.
pub fn gc_percent(seq: &str) -> Option<f64> {
    if seq.is_empty() {
        return None;
    }
    let gc = seq.bytes().filter(|b| matches!(b, b'G' | b'C' | b'g' | b'c')).count();
    Some(gc as f64 * 100.0 / seq.len() as f64)
}

/// ΔG at 37 °C of the last [`THREE_PRIME_WINDOW`] bases of a primer-oriented
/// sequence. `None` when fewer than two bases remain or a base is not ACGT.
pub fn stability_3prime(primer_oriented: &str) -> Option<f64> {
    let s = primer_oriented.as_bytes();
    let tail = &s[s.len().saturating_sub(THREE_PRIME_WINDOW)..];
    stack_delta_g(tail, 37.0).ok()
}

/// Compute every metric for one site.
///
/// `binding_sequence` is the site's plus-strand binding sequence; for reverse
/// sites the primer's own 3' end sits at its *start*, so end stability is taken
/// from the reverse complement. A failing Tm calculator leaves `tm` empty.
pub fn annotate(binding_sequence: &str, strand: Strand, calculate_tm: Option<TmFn<'_>>) -> SiteProperties {
    let stability = match strand {
        Strand::Forward => stability_3prime(binding_sequence),
        Strand::Reverse => stability_3prime(&reverse_complement(binding_sequence)),
    };
    let tm = calculate_tm.and_then(|f| match f(binding_sequence) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!("Tm calculation failed for {binding_sequence}: {e:#}");
            None
        }
    });
    SiteProperties { tm, gc_percent: gc_percent(binding_sequence), stability_3prime: stability }
}

#![forbid(unsafe_code)]
//! # primerbind
//!
//! Find where a PCR/oligo **primer** can anneal on a **template**, tolerating a
//! configurable number of mismatches and an optional non-annealing **5' overhang**
//! (restriction site, adapter, tag).
//!
//! ## How a site is found
//! 1. Primer and template are normalized (uppercase; whitespace stripped from the primer).
//! 2. Every window of primer length is tested on the plus strand and, unless
//!    disabled, on the minus strand by scanning the reverse-complemented primer.
//!    Circular templates also test windows crossing the origin.
//! 3. A window must match the primer's 3'-terminal base and carry an exact
//!    3'-anchored seed of at least [`SearchOptions::min_binding_region`] bases.
//!    The binding region then extends toward the 5' end until the mismatch budget
//!    runs out; what is left over is overhang.
//! 4. Candidates describing the same physical site are collapsed
//!    ([`dominance`]), annotated ([`properties`]) and sorted ([`assemble`]).
//!
//! The search is a pure function of its inputs: the same call always returns
//! the same sites in the same order, and "nothing found" is just an empty `Vec`.
//!
//! ## Examples
//! ```rust
//! use primerbind::{find_binding_sites, SearchOptions};
//! let target = "TTTTTTTTTTATCGATCGATCGATCGTTTTTTTTTT";
//! let opts = SearchOptions::default().reverse_strand(false);
//! let sites = primerbind::find_binding_sites("atcgatcgatcgatcg", target, &opts, None);
//! assert_eq!(sites.len(), 1);
//! assert_eq!((sites[0].start, sites[0].end), (10, 25));
//! assert_eq!(sites[0].id, "binding-site-0");
//! ```
//!
//! Primers with a 5' tail report it as overhang:
//! ```rust
//! use primerbind::{find_binding_sites, SearchOptions};
//! let target = "CCTTGACCAGTAGGCTAACGTTAGCCATGTCAGTCGATTGCAACGTGTCATTGGCAT";
//! let opts = SearchOptions::default().reverse_strand(false);
//! let sites = find_binding_sites("GGATCC CAGTCGATTGCAACGTGTCA", target, &opts, None);
//! assert_eq!(sites[0].overhang_sequence, "GGATCC");
//! assert_eq!(sites[0].binding_sequence, "CAGTCGATTGCAACGTGTCA");
//! ```

pub mod site;
pub mod sequence;
pub mod matcher;
pub mod scan;
pub mod dominance;
pub mod properties;
pub mod assemble;
pub mod detect;
pub mod thermo;
pub mod seqio;
pub mod batch;
pub mod benchmark;

use log::debug;

pub use site::{BindingSite, SearchOptions, SiteAnnotation, Strand};

use sequence::{normalize_primer, normalize_target, reverse_complement_bytes, Template};

/// Injected melting-temperature calculator. It receives a site's
/// `binding_sequence`; an `Err` only blanks that site's `tm`.
pub type TmFn<'a> = &'a (dyn Fn(&str) -> anyhow::Result<f64> + Sync);

/// Find every binding site of `primer` on `target`.
///
/// Returns an empty list when either input is empty or when the options can
/// never be satisfied (e.g. a seed minimum longer than the primer).
pub fn find_binding_sites(
    primer: &str,
    target: &str,
    options: &SearchOptions,
    calculate_tm: Option<TmFn<'_>>,
) -> Vec<BindingSite> {
    let primer = normalize_primer(primer);
    let target = normalize_target(target);
    if primer.is_empty() || target.is_empty() {
        return Vec::new();
    }
    let primer = primer.as_bytes();
    let template = Template::new(target.as_bytes(), options.is_circular);

    let forward = scan::scan_strand(primer, &template, Strand::Forward, options);
    let forward = dominance::filter_dominated(forward, &template);

    let primer_rc = reverse_complement_bytes(primer);
    let reverse = if options.search_reverse_strand {
        let raw = scan::scan_strand(&primer_rc, &template, Strand::Reverse, options);
        dominance::filter_dominated(raw, &template)
    } else {
        Vec::new()
    };

    let sites = assemble::assemble(&forward, &reverse, primer, &primer_rc, &template, calculate_tm);
    debug!("{} binding sites for {} nt primer on {} nt template", sites.len(), primer.len(), template.len());
    sites
}

/// Crate version string (from `CARGO_PKG_VERSION`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod search_tests {
    use super::*;
    use crate::sequence::reverse_complement;

    const P16: &str = "ATCGATCGATCGATCG";
    const P20: &str = "CAGTCGATTGCAACGTGTCA";
    const LEFT: &str = "CCTTGACCAGTAGGCTAACGTTAGCCATGT";
    const RIGHT: &str = "TTGGCATCAGGATTCCAACTGTGAGCTTGA";

    /// Deterministic pseudo-random DNA.
    fn random_dna(len: usize, mut seed: u64) -> String {
        (0..len)
            .map(|_| {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                b"ACGT"[(seed >> 62) as usize] as char
            })
            .collect()
    }

    fn forward_only() -> SearchOptions {
        SearchOptions::default().reverse_strand(false)
    }

    /// Exact matches anchored at the primer's 3' end, measured against the template.
    fn seed_len(site: &BindingSite) -> usize {
        let b = site.binding_sequence.as_bytes();
        let m = site.matched_sequence.as_bytes();
        if site.forward {
            b.iter().rev().zip(m.iter().rev()).take_while(|(x, y)| x == y).count()
        } else {
            b.iter().zip(m.iter()).take_while(|(x, y)| x == y).count()
        }
    }

    #[test]
    fn empty_inputs_give_no_sites() {
        let o = SearchOptions::default();
        assert!(find_binding_sites("", "ACGTACGT", &o, None).is_empty());
        assert!(find_binding_sites("  \n", "ACGTACGT", &o, None).is_empty());
        assert!(find_binding_sites(P16, "", &o, None).is_empty());
    }

    #[test]
    fn exact_match_in_linear_template() {
        let target = format!("{}{}{}", "G".repeat(20), P16, "G".repeat(64));
        assert_eq!(target.len(), 100);
        let o = SearchOptions { max_mismatches: 0, search_reverse_strand: false, detect_overhang: false, ..SearchOptions::default() };
        let sites = find_binding_sites(P16, &target, &o, None);
        assert_eq!(sites.len(), 1);
        let s = &sites[0];
        assert_eq!((s.start, s.end, s.forward, s.num_mismatches), (20, 35, true, 0));
        assert_eq!(s.matched_sequence, P16);
        assert_eq!(s.overhang_length, 0);
    }

    #[test]
    fn flipped_three_prime_base_is_never_found() {
        let target = format!("{}{}{}", "G".repeat(20), P16, "G".repeat(64));
        let flipped = "ATCGATCGATCGATCA";
        let o = SearchOptions { max_mismatches: 0, search_reverse_strand: false, detect_overhang: false, ..SearchOptions::default() };
        assert!(find_binding_sites(flipped, &target, &o, None).is_empty());
        let o = SearchOptions { max_mismatches: 0, search_reverse_strand: false, ..SearchOptions::default() };
        assert!(find_binding_sites(flipped, &target, &o, None).is_empty());
    }

    #[test]
    fn wraparound_site_requires_circular_template() {
        let target = format!("{}{}{}", &P16[8..], "G".repeat(34), &P16[..8]);
        assert_eq!(target.len(), 50);
        let o = SearchOptions::hamming(0).reverse_strand(false).with_min_binding_region(15);
        assert!(find_binding_sites(P16, &target, &o, None).is_empty());
        let sites = find_binding_sites(P16, &target, &o.clone().circular(true), None);
        assert_eq!(sites.len(), 1);
        assert_eq!((sites[0].start, sites[0].end), (42, 7));
        assert!(sites[0].wraps_origin());
        assert_eq!(sites[0].matched_sequence, P16);
    }

    #[test]
    fn overhang_is_reported_and_never_counted() {
        let primer = format!("GGATCC{P20}");
        let target = format!("{LEFT}{P20}{RIGHT}");
        let sites = find_binding_sites(&primer, &target, &forward_only().with_max_mismatches(0), None);
        assert_eq!(sites.len(), 1);
        let s = &sites[0];
        assert_eq!((s.start, s.end), (30, 49));
        assert_eq!(s.overhang_length, 6);
        assert_eq!(s.overhang_sequence, "GGATCC");
        assert_eq!(s.binding_sequence, P20);
        assert_eq!(s.num_mismatches, 0);
        assert_eq!(s.full_primer_mismatch_positions, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(s.overhang_length + s.binding_len(), s.primer_sequence.len());
        assert_eq!(s.end - s.start + 1, s.binding_len());
    }

    #[test]
    fn window_running_off_a_linear_end_is_skipped() {
        let primer = format!("GGATCC{P20}");
        let target = format!("{P20}{RIGHT}");
        assert!(find_binding_sites(&primer, &target, &forward_only(), None).is_empty());
        let sites = find_binding_sites(&primer, &target, &forward_only().circular(true), None);
        assert_eq!(sites.len(), 1);
        assert_eq!((sites[0].start, sites[0].overhang_length), (0, 6));
    }

    #[test]
    fn seed_floor_holds_for_generous_budgets() {
        // mismatch 4th base from the 3' end
        let variant = "CAGTCGATTGCAACGTATCA";
        let target = format!("{LEFT}{variant}{RIGHT}");
        let o = forward_only().with_max_mismatches(10).with_min_binding_region(12);
        assert!(find_binding_sites(P20, &target, &o, None).is_empty());

        let target = random_dna(3000, 7);
        for k in [8, 10, 12] {
            let o = SearchOptions::default().with_max_mismatches(6).with_min_binding_region(k);
            for primer in [&target[500..520], &target[1200..1225], P20] {
                for s in find_binding_sites(primer, &target, &o, None) {
                    assert!(seed_len(&s) >= k, "{s:?}");
                }
            }
        }
    }

    #[test]
    fn seed_longer_than_primer_finds_nothing() {
        let target = format!("{LEFT}{P20}{RIGHT}");
        let o = SearchOptions::default().with_min_binding_region(21);
        assert!(find_binding_sites(P20, &target, &o, None).is_empty());
    }

    #[test]
    fn reverse_site_maps_mismatches_to_primer_coordinates() {
        let mut variant = P20.as_bytes().to_vec();
        variant[5] = b'A';
        let variant = String::from_utf8(variant).unwrap();
        let target = format!("{LEFT}{}{RIGHT}", reverse_complement(&variant));
        let o = SearchOptions::default().with_max_mismatches(1).with_min_binding_region(12);
        let sites = find_binding_sites(P20, &target, &o, None);
        assert_eq!(sites.len(), 1);
        let s = &sites[0];
        assert!(!s.forward);
        assert_eq!((s.start, s.end), (30, 49));
        assert_eq!(s.mismatch_positions, vec![5]);
        assert_eq!(s.full_primer_mismatch_positions, vec![5]);
        assert_eq!(s.binding_sequence, reverse_complement(P20));

        // the same site read from the other strand
        let flipped = reverse_complement(&target);
        let fwd = find_binding_sites(P20, &flipped, &o.clone().reverse_strand(false), None);
        assert_eq!(fwd.len(), 1);
        assert_eq!(fwd[0].mismatch_positions, s.mismatch_positions);
        assert_eq!(fwd[0].full_primer_mismatch_positions, s.full_primer_mismatch_positions);
        assert_eq!(fwd[0].start, flipped.len() - 1 - s.end);
    }

    #[test]
    fn reverse_overhang_is_the_primer_five_prime_end() {
        let mut variant = P20.as_bytes().to_vec();
        variant[5] = b'A';
        let variant = String::from_utf8(variant).unwrap();
        let target = format!("{LEFT}{}{RIGHT}", reverse_complement(&variant));
        let o = SearchOptions::default().with_max_mismatches(0).with_min_binding_region(12);
        let sites = find_binding_sites(P20, &target, &o, None);
        assert_eq!(sites.len(), 1);
        let s = &sites[0];
        assert_eq!((s.start, s.end), (30, 43));
        assert_eq!(s.overhang_length, 6);
        assert_eq!(s.overhang_sequence, &P20[..6]);
        assert_eq!(s.full_primer_mismatch_positions, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(s.binding_sequence, reverse_complement(&P20[6..]));
        assert_eq!(s.three_prime_position(), 30);
    }

    #[test]
    fn reverse_complement_symmetry() {
        let target = random_dna(400, 11);
        let primer = &target[120..142];
        let fwd = find_binding_sites(primer, &target, &SearchOptions::default().reverse_strand(false), None);
        let anti: Vec<_> = find_binding_sites(&reverse_complement(primer), &target, &SearchOptions::default(), None)
            .into_iter()
            .filter(|s| !s.forward)
            .collect();
        let f: Vec<_> = fwd.iter().map(|s| (s.start, s.end)).collect();
        let a: Vec<_> = anti.iter().map(|s| (s.start, s.end)).collect();
        assert!(f.contains(&(120, 141)));
        assert_eq!(f, a);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let target = random_dna(2000, 3);
        let o = SearchOptions::default().with_max_mismatches(3).with_min_binding_region(8).circular(true);
        let tm = |s: &str| -> anyhow::Result<f64> { Ok(s.len() as f64 * 2.0) };
        let a = find_binding_sites(&target[100..124], &target, &o, Some(&tm));
        let b = find_binding_sites(&target[100..124], &target, &o, Some(&tm));
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn no_two_survivors_on_a_strand_overlap_by_more_than_half() {
        // a periodic primer on a periodic stretch matches every fourth window;
        // windows 8 apart share exactly half their bases and both survive
        let target = format!("{}{}", "ACGT".repeat(30), random_dna(200, 5));
        let o = SearchOptions::default().with_max_mismatches(2).with_min_binding_region(6);
        let sites = find_binding_sites("ACGTACGTACGTACGT", &target, &o, None);
        let starts: Vec<usize> = sites.iter().filter(|s| s.forward && s.end < 120).map(|s| s.start).collect();
        assert_eq!(starts, (0..=104).step_by(8).collect::<Vec<_>>());
        for (i, a) in sites.iter().enumerate() {
            for b in &sites[i + 1..] {
                if a.forward != b.forward {
                    continue;
                }
                assert_ne!(a.three_prime_position(), b.three_prime_position());
                let lo = a.start.max(b.start);
                let hi = a.end.min(b.end);
                let shared = if hi >= lo { hi - lo + 1 } else { 0 };
                assert!(2 * shared <= a.binding_len().min(b.binding_len()), "{a:?} {b:?}");
            }
        }
    }

    #[test]
    fn failing_tm_keeps_the_search_alive() {
        let target = format!("{LEFT}{P20}{RIGHT}");
        let boom = |_: &str| -> anyhow::Result<f64> { anyhow::bail!("calculator offline") };
        let sites = find_binding_sites(P20, &target, &forward_only(), Some(&boom));
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].tm, None);
        assert!(sites[0].gc_percent.is_some());
        let nn = |s: &str| -> anyhow::Result<f64> { Ok(thermo::tm_nearest_neighbor(s, &thermo::ThermoConditions::default())?) };
        let sites = find_binding_sites(P20, &target, &forward_only(), Some(&nn));
        assert!(sites[0].tm.is_some());
    }

    #[test]
    fn non_acgt_symbols_compare_literally() {
        let primer = "CAGTCGATTNCAACGTGTCA";
        let target = format!("{LEFT}{primer}{RIGHT}");
        let sites = find_binding_sites(primer, &target, &forward_only(), None);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].num_mismatches, 0);
        let sites = find_binding_sites(P20, &target, &forward_only().with_max_mismatches(1).with_min_binding_region(10), None);
        assert_eq!(sites[0].mismatch_positions, vec![9]);
    }
}

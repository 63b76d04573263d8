//! Core types for **search options**, **binding sites** and **annotation export**.
//!
//! This module holds the data model used across the crate. Every
//! [`BindingSite`] is an owned value created fresh by a search call; nothing in
//! the crate mutates a site after it has been returned.
//!
//! # Coordinates
//! `start`/`end` are inclusive, 0-based plus-strand positions of the *binding*
//! region only (the overhang is never part of it). On circular templates a
//! site spanning the origin has `end < start`; see [`BindingSite::wraps_origin`].
use core::fmt;

use serde::{Deserialize, Serialize};

/// Strand a primer anneals to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Strand {
    /// Sense: the primer reads along the plus strand.
    Forward,
    /// Antisense: the reverse-complemented primer reads along the plus strand.
    Reverse,
}

impl Strand {
    pub fn is_forward(self) -> bool {
        matches!(self, Strand::Forward)
    }

    /// `1` for forward, `-1` for reverse.
    pub fn sign(self) -> i8 {
        match self {
            Strand::Forward => 1,
            Strand::Reverse => -1,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Strand::Forward => "+", Strand::Reverse => "-" })
    }
}

/// Knobs for a single search call.
///
/// Defaults favour overhang detection with a 15 nt 3' seed. Use
/// [`SearchOptions::hamming`] for plain whole-window matching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Mismatch budget for the binding region (overhang positions never count).
    pub max_mismatches: usize,
    /// Also search the antisense strand.
    pub search_reverse_strand: bool,
    /// Treat the template as circular (windows may straddle the origin).
    pub is_circular: bool,
    /// Minimum run of exact matches anchored at the primer's 3' end.
    pub min_binding_region: usize,
    /// Split the primer into binding region and 5' overhang. When `false`
    /// every window is compared over its whole length.
    pub detect_overhang: bool,
}

/// Seed minimum used with overhang detection.
pub const DEFAULT_MIN_BINDING_REGION: usize = 15;
/// Seed minimum used in whole-window Hamming mode.
pub const DEFAULT_MIN_BINDING_REGION_HAMMING: usize = 12;

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_mismatches: 0,
            search_reverse_strand: true,
            is_circular: false,
            min_binding_region: DEFAULT_MIN_BINDING_REGION,
            detect_overhang: true,
        }
    }
}

impl SearchOptions {
    /// Whole-window Hamming matching with the shorter default seed.
    pub fn hamming(max_mismatches: usize) -> Self {
        Self {
            max_mismatches,
            min_binding_region: DEFAULT_MIN_BINDING_REGION_HAMMING,
            detect_overhang: false,
            ..Self::default()
        }
    }

    pub fn with_max_mismatches(mut self, n: usize) -> Self {
        self.max_mismatches = n;
        self
    }

    pub fn circular(mut self, yes: bool) -> Self {
        self.is_circular = yes;
        self
    }

    pub fn reverse_strand(mut self, yes: bool) -> Self {
        self.search_reverse_strand = yes;
        self
    }

    pub fn with_min_binding_region(mut self, n: usize) -> Self {
        self.min_binding_region = n;
        self
    }
}

/// One place a primer can anneal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BindingSite {
    /// Assigned after sorting: `binding-site-{index}`.
    pub id: String,
    /// First plus-strand position of the binding region.
    pub start: usize,
    /// Last plus-strand position of the binding region (inclusive).
    pub end: usize,
    /// `true` when the primer anneals in sense orientation.
    pub forward: bool,
    /// Mismatches inside the binding region.
    pub num_mismatches: usize,
    /// Mismatch positions relative to the binding region, primer 5'→3'.
    pub mismatch_positions: Vec<usize>,
    /// Template bases covering `[start, end]`.
    pub matched_sequence: String,
    /// The whole normalized primer, overhang included.
    pub primer_sequence: String,
    /// The part that anneals: primer suffix (forward) or reverse-complement
    /// prefix (reverse), i.e. always written as it reads on the plus strand.
    pub binding_sequence: String,
    pub overhang_sequence: String,
    pub overhang_length: usize,
    /// Overhang positions plus binding mismatches, in full-primer coordinates.
    pub full_primer_mismatch_positions: Vec<usize>,
    pub tm: Option<f64>,
    pub gc_percent: Option<f64>,
    /// ΔG (kcal/mol, 37 °C) of the 3'-terminal pentamer; more negative binds tighter.
    pub stability_3prime: Option<f64>,
}

impl BindingSite {
    pub fn strand(&self) -> Strand {
        if self.forward { Strand::Forward } else { Strand::Reverse }
    }

    /// Length of the binding region.
    pub fn binding_len(&self) -> usize {
        self.binding_sequence.len()
    }

    /// `true` for circular sites whose binding region crosses position 0.
    pub fn wraps_origin(&self) -> bool {
        self.end < self.start
    }

    /// Plus-strand coordinate under the primer's 3'-terminal base.
    pub fn three_prime_position(&self) -> usize {
        if self.forward { self.end } else { self.start }
    }

    /// Turn this site into a feature record for a host document.
    pub fn to_annotation(&self) -> SiteAnnotation {
        SiteAnnotation {
            start: self.start,
            end: self.end,
            forward: self.forward,
            bases: self.primer_sequence.clone(),
            strand: self.strand().sign(),
        }
    }
}

/// Feature record emitted when a site is materialized as an annotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteAnnotation {
    pub start: usize,
    pub end: usize,
    pub forward: bool,
    /// Full primer, overhang included.
    pub bases: String,
    /// `1` or `-1`.
    pub strand: i8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming_preset_disables_overhang() {
        let o = SearchOptions::hamming(2);
        assert!(!o.detect_overhang);
        assert_eq!(o.min_binding_region, DEFAULT_MIN_BINDING_REGION_HAMMING);
        assert_eq!(o.max_mismatches, 2);
        assert!(o.search_reverse_strand);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let o: SearchOptions = serde_json::from_str(r#"{"max_mismatches": 3, "is_circular": true}"#).unwrap();
        assert_eq!(o, SearchOptions::default().with_max_mismatches(3).circular(true));
    }

    #[test]
    fn annotation_carries_full_primer_and_strand_sign() {
        let site = BindingSite {
            id: "binding-site-0".into(),
            start: 40,
            end: 59,
            forward: false,
            num_mismatches: 0,
            mismatch_positions: vec![],
            matched_sequence: "A".repeat(20),
            primer_sequence: format!("GGATCC{}", "T".repeat(20)),
            binding_sequence: "A".repeat(20),
            overhang_sequence: "GGATCC".into(),
            overhang_length: 6,
            full_primer_mismatch_positions: (0..6).collect(),
            tm: None,
            gc_percent: Some(0.0),
            stability_3prime: None,
        };
        let a = site.to_annotation();
        assert_eq!(a.strand, -1);
        assert_eq!(a.bases.len(), 26);
        assert_eq!((a.start, a.end, a.forward), (40, 59, false));
        assert_eq!(site.three_prime_position(), 40);
        assert!(!site.wraps_origin());
    }
}

//! Slide the matcher across every template offset for one strand.
use log::debug;

use crate::matcher::{extend_window, Candidate};
use crate::sequence::Template;
use crate::site::{SearchOptions, Strand};

/// All candidates for `pattern` on `strand`, in offset order.
///
/// Linear templates only see windows that fit entirely; circular templates see
/// one window per position, including those that straddle the origin.
pub fn scan_strand(
    pattern: &[u8],
    template: &Template<'_>,
    strand: Strand,
    options: &SearchOptions,
) -> Vec<Candidate> {
    let windows = template.window_count(pattern.len());
    let hits: Vec<Candidate> = (0..windows)
        .filter_map(|offset| extend_window(pattern, template, offset, strand, options))
        .collect();
    debug!("strand {strand}: {windows} windows, {} candidates", hits.len());
    hits
}

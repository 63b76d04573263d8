//! Benchmark framework for primerbind.
//!
//! Times the binding-site engine against simpler matchers on the same primer
//! set and template. It is deliberately simple: one pass per primer and mode,
//! wall-clock timing, and a hit count.
//!
//! Modes implemented:
//! - `SeedExtend` (the engine with the caller's options)
//! - `Hamming` (the engine with [`SearchOptions::hamming`], no overhang split;
//!   a seed minimum other than the overhang default of 15 is carried over)
//! - `Plain` (unanchored windowed Hamming, [`crate::detect`])
//! - `Myers` (edit distance with k threshold, bio crate)
//!
//! The benchmarking entrypoint is [`benchmark_primers`].

use std::time::{Duration, Instant};

use anyhow::bail;
use bio::pattern_matching::myers::{Myers, MyersBuilder};
use log::{debug, warn};

use crate::detect::find_hamming_windows;
use crate::seqio::NamedPrimer;
use crate::sequence::{normalize_primer, normalize_target, reverse_complement_bytes};
use crate::site::DEFAULT_MIN_BINDING_REGION;
use crate::{find_binding_sites, SearchOptions};

/// Longest pattern the 64-bit Myers matcher accepts.
pub const MYERS_MAX_PATTERN: usize = 64;

/// Matchers available to the benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    SeedExtend,
    Hamming,
    Plain,
    Myers,
}

impl std::str::FromStr for MatchMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seed-extend" | "seed" | "seedextend" => Ok(Self::SeedExtend),
            "hamming" => Ok(Self::Hamming),
            "plain" => Ok(Self::Plain),
            "myers" => Ok(Self::Myers),
            other => Err(format!("Unknown mode: {}", other)),
        }
    }
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::SeedExtend => "seed-extend",
            MatchMode::Hamming => "hamming",
            MatchMode::Plain => "plain",
            MatchMode::Myers => "myers",
        }
    }

    /// Parse a comma-separated list such as `"seed-extend,myers"`.
    pub fn from_list(s: &str) -> anyhow::Result<Vec<MatchMode>> {
        let mut out = Vec::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            match part.parse::<MatchMode>() {
                Ok(m) if !out.contains(&m) => out.push(m),
                Ok(_) => {}
                Err(e) => bail!(e),
            }
        }
        if out.is_empty() {
            bail!("no benchmark modes given");
        }
        Ok(out)
    }
}

/// One timed run.
#[derive(Clone, Debug)]
pub struct BenchmarkRow {
    pub primer: String,
    pub mode: MatchMode,
    pub hits: usize,
    pub elapsed: Duration,
}

/// Count Myers hits on one strand. Runs of adjacent end positions are one hit.
fn myers_hits(pattern: &[u8], text: &[u8], max_dist: u8) -> usize {
    let mut m: Myers<u64> = MyersBuilder::new().build_64(pattern.iter().copied());
    let mut hits = 0;
    let mut last_end: Option<usize> = None;
    for (end, _dist) in m.find_all_end(text, max_dist) {
        if last_end.map(|l| end != l + 1).unwrap_or(true) {
            hits += 1;
        }
        last_end = Some(end);
    }
    hits
}

fn run_mode(mode: MatchMode, primer: &str, target: &str, options: &SearchOptions) -> Option<usize> {
    match mode {
        MatchMode::SeedExtend => Some(find_binding_sites(primer, target, options, None).len()),
        MatchMode::Hamming => {
            let mut o = SearchOptions {
                is_circular: options.is_circular,
                search_reverse_strand: options.search_reverse_strand,
                ..SearchOptions::hamming(options.max_mismatches)
            };
            if options.min_binding_region != DEFAULT_MIN_BINDING_REGION {
                o.min_binding_region = options.min_binding_region;
            }
            Some(find_binding_sites(primer, target, &o, None).len())
        }
        MatchMode::Plain => {
            let p = normalize_primer(primer);
            let mut n = find_hamming_windows(&p, target, options.max_mismatches, options.is_circular).len();
            if options.search_reverse_strand {
                let rc = String::from_utf8_lossy(&reverse_complement_bytes(p.as_bytes())).into_owned();
                n += find_hamming_windows(&rc, target, options.max_mismatches, options.is_circular).len();
            }
            Some(n)
        }
        MatchMode::Myers => {
            let p = normalize_primer(primer);
            if p.is_empty() || p.len() > MYERS_MAX_PATTERN {
                warn!("myers: skipping {} nt primer (limit {})", p.len(), MYERS_MAX_PATTERN);
                return None;
            }
            let t = normalize_target(target);
            let k = options.max_mismatches.min(u8::MAX as usize) as u8;
            let mut n = myers_hits(p.as_bytes(), t.as_bytes(), k);
            if options.search_reverse_strand {
                n += myers_hits(&reverse_complement_bytes(p.as_bytes()), t.as_bytes(), k);
            }
            Some(n)
        }
    }
}

/// Time every primer in every mode.
///
/// Rows come out primer-major in input order. A primer a mode cannot handle
/// (Myers beyond 64 nt) is left out for that mode.
pub fn benchmark_primers(
    primers: &[NamedPrimer],
    target: &str,
    modes: &[MatchMode],
    options: &SearchOptions,
) -> Vec<BenchmarkRow> {
    let mut rows = Vec::with_capacity(primers.len() * modes.len());
    for p in primers {
        for &mode in modes {
            let start = Instant::now();
            let Some(hits) = run_mode(mode, &p.sequence, target, options) else {
                continue;
            };
            let elapsed = start.elapsed();
            debug!("{} {}: {} hits in {:?}", p.name, mode.as_str(), hits, elapsed);
            rows.push(BenchmarkRow { primer: p.name.clone(), mode, hits, elapsed });
        }
    }
    rows
}

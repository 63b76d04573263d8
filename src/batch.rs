//! Search many primers against one template on a rayon pool.
//!
//! Each primer is an independent [`find_binding_sites`] call, so the only
//! shared state is the (read-only) template, options and Tm calculator.
//! Results come back in input order.
use anyhow::Result;
use log::info;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;

use crate::seqio::NamedPrimer;
use crate::{find_binding_sites, BindingSite, SearchOptions, TmFn};

/// All sites of one primer.
#[derive(Debug, Clone, Serialize)]
pub struct PrimerHits {
    pub primer: NamedPrimer,
    pub sites: Vec<BindingSite>,
}

/// Run every primer against `target`. `threads = None` uses all logical CPUs.
pub fn search_many(
    primers: &[NamedPrimer],
    target: &str,
    options: &SearchOptions,
    calculate_tm: Option<TmFn<'_>>,
    threads: Option<usize>,
) -> Result<Vec<PrimerHits>> {
    let n = threads.filter(|&t| t > 0).unwrap_or_else(num_cpus::get).max(1);
    let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
    info!("searching {} primers on {} threads", primers.len(), n);

    let hits = pool.install(|| {
        primers
            .par_iter()
            .map(|p| PrimerHits {
                primer: p.clone(),
                sites: find_binding_sites(&p.sequence, target, options, calculate_tm),
            })
            .collect::<Vec<_>>()
    });
    Ok(hits)
}

use std::fs::File;
use std::io::BufWriter;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use log::info;
use polars::prelude::*;

use primerbind::batch::{self, PrimerHits};
use primerbind::benchmark::{self, MatchMode};
use primerbind::seqio;
use primerbind::thermo::{tm_nearest_neighbor, ThermoConditions};
use primerbind::{find_binding_sites, BindingSite, SearchOptions, SiteAnnotation, TmFn};

/// primerbind CLI
#[derive(Parser)]
#[command(name = "primerbind")]
#[command(version)]
#[command(about = "Primer binding-site search with mismatches, 5' overhangs and circular templates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Target and search flags shared by every subcommand.
#[derive(Args, Clone)]
struct SearchArgs {
    /// Template file (FASTA/FASTQ/.gz); the first record is used
    #[arg(long, conflicts_with = "target_seq", required_unless_present = "target_seq")]
    target: Option<String>,
    /// Template given inline
    #[arg(long)]
    target_seq: Option<String>,
    /// Mismatch budget for the binding region
    #[arg(long, default_value_t = 0)]
    max_mismatches: usize,
    /// Minimum exact 3' seed (default: 15, or 12 with --no-overhang)
    #[arg(long)]
    min_binding: Option<usize>,
    /// Skip the antisense strand
    #[arg(long)]
    no_reverse: bool,
    /// Treat the template as circular (plasmid)
    #[arg(long)]
    circular: bool,
    /// Compare whole windows instead of splitting off a 5' overhang
    #[arg(long)]
    no_overhang: bool,
}

impl SearchArgs {
    fn options(&self) -> SearchOptions {
        let base = if self.no_overhang {
            SearchOptions::hamming(self.max_mismatches)
        } else {
            SearchOptions::default().with_max_mismatches(self.max_mismatches)
        };
        let base = base.reverse_strand(!self.no_reverse).circular(self.circular);
        match self.min_binding {
            Some(n) => base.with_min_binding_region(n),
            None => base,
        }
    }

    fn target(&self) -> anyhow::Result<String> {
        match (&self.target, &self.target_seq) {
            (_, Some(seq)) => Ok(seq.clone()),
            (Some(path), None) => {
                let rec = seqio::read_target(path)?;
                info!("target {} ({} nt)", rec.id, rec.seq.len());
                Ok(rec.seq)
            }
            (None, None) => bail!("one of --target or --target-seq is required"),
        }
    }
}

/// Reaction conditions for `--tm`.
#[derive(Args, Clone)]
struct TmArgs {
    /// Compute nearest-neighbour Tm for each binding region
    #[arg(long)]
    tm: bool,
    /// Monovalent cations, mM
    #[arg(long, default_value_t = 50.0)]
    na_mm: f64,
    /// Mg2+, mM
    #[arg(long, default_value_t = 1.5)]
    mg_mm: f64,
    /// dNTPs, mM
    #[arg(long, default_value_t = 0.6)]
    dntp_mm: f64,
    /// Primer concentration, nM
    #[arg(long, default_value_t = 200.0)]
    primer_nm: f64,
}

impl TmArgs {
    fn conditions(&self) -> ThermoConditions {
        ThermoConditions { na_mm: self.na_mm, mg_mm: self.mg_mm, dntp_mm: self.dntp_mm, primer_nm: self.primer_nm }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Find binding sites of one primer
    Search {
        /// Primer sequence 5'->3' (whitespace ignored)
        #[arg(long)]
        primer: String,
        #[command(flatten)]
        search: SearchArgs,
        #[command(flatten)]
        tm: TmArgs,
        /// Emit CSV to stdout
        #[arg(long)]
        csv: bool,
        /// Write site annotations (start/end/strand) to this JSON file
        #[arg(long)]
        annotations: Option<String>,
    },

    /// Search every primer of a FASTA or CSV/TSV file
    Batch {
        /// Primers file (FASTA, or CSV/TSV with name,sequence header)
        #[arg(long)]
        primers: String,
        #[command(flatten)]
        search: SearchArgs,
        #[command(flatten)]
        tm: TmArgs,
        /// Threads (0/None = all)
        #[arg(long)]
        threads: Option<usize>,
        /// Emit CSV to stdout
        #[arg(long)]
        csv: bool,
    },

    /// Time the engine against simpler matchers
    Benchmark {
        /// Primers file (FASTA, or CSV/TSV with name,sequence header)
        #[arg(long)]
        primers: String,
        #[command(flatten)]
        search: SearchArgs,
        /// Comma-separated modes (seed-extend,hamming,plain,myers)
        #[arg(long, default_value = "seed-extend,hamming,myers")]
        modes: String,
        /// Emit CSV to stdout
        #[arg(long)]
        csv: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { primer, search, tm, csv, annotations } => {
            let target = search.target()?;
            let cond = tm.conditions();
            let tm_fn = |s: &str| -> anyhow::Result<f64> { Ok(tm_nearest_neighbor(s, &cond)?) };
            let calc: Option<TmFn<'_>> = if tm.tm { Some(&tm_fn) } else { None };
            let sites = find_binding_sites(&primer, &target, &search.options(), calc);

            if let Some(path) = annotations {
                let ann: Vec<SiteAnnotation> = sites.iter().map(BindingSite::to_annotation).collect();
                let w = BufWriter::new(File::create(&path).with_context(|| format!("creating {path}"))?);
                serde_json::to_writer_pretty(w, &ann)?;
                info!("wrote {} annotations to {}", ann.len(), path);
            }
            let hits = [PrimerHits { primer: seqio::NamedPrimer { name: "primer".into(), sequence: primer }, sites }];
            emit(sites_frame(&hits)?, csv)?;
        }

        Commands::Batch { primers, search, tm, threads, csv } => {
            let target = search.target()?;
            let primers = seqio::load_primers(&primers)?;
            let cond = tm.conditions();
            let tm_fn = |s: &str| -> anyhow::Result<f64> { Ok(tm_nearest_neighbor(s, &cond)?) };
            let calc: Option<TmFn<'_>> = if tm.tm { Some(&tm_fn) } else { None };
            let hits = batch::search_many(&primers, &target, &search.options(), calc, threads)?;
            emit(sites_frame(&hits)?, csv)?;
        }

        Commands::Benchmark { primers, search, modes, csv } => {
            let target = search.target()?;
            let primers = seqio::load_primers(&primers)?;
            let modes = MatchMode::from_list(&modes.to_lowercase())?;
            let rows = benchmark::benchmark_primers(&primers, &target, &modes, &search.options());

            if csv {
                let mut df = df!(
                    "primer"     => rows.iter().map(|r| r.primer.clone()).collect::<Vec<_>>(),
                    "mode"       => rows.iter().map(|r| r.mode.as_str().to_string()).collect::<Vec<_>>(),
                    "hits"       => rows.iter().map(|r| r.hits as u64).collect::<Vec<_>>(),
                    "elapsed_us" => rows.iter().map(|r| r.elapsed.as_micros() as u64).collect::<Vec<_>>(),
                )?;
                CsvWriter::new(std::io::stdout()).include_header(true).finish(&mut df)?;
            } else {
                for r in rows {
                    println!("{}\t{}\thits={}\tus={}", r.primer, r.mode.as_str(), r.hits, r.elapsed.as_micros());
                }
            }
        }
    }

    Ok(())
}

fn join_positions(v: &[usize]) -> String {
    v.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(";")
}

/// One row per site, primer name first.
fn sites_frame(hits: &[PrimerHits]) -> PolarsResult<DataFrame> {
    let rows: Vec<(&str, &BindingSite)> =
        hits.iter().flat_map(|h| h.sites.iter().map(move |s| (h.primer.name.as_str(), s))).collect();
    df!(
        "primer"      => rows.iter().map(|(n, _)| n.to_string()).collect::<Vec<_>>(),
        "id"          => rows.iter().map(|(_, s)| s.id.clone()).collect::<Vec<_>>(),
        "strand"      => rows.iter().map(|(_, s)| s.strand().to_string()).collect::<Vec<_>>(),
        "start"       => rows.iter().map(|(_, s)| s.start as u64).collect::<Vec<_>>(),
        "end"         => rows.iter().map(|(_, s)| s.end as u64).collect::<Vec<_>>(),
        "mismatches"  => rows.iter().map(|(_, s)| s.num_mismatches as u64).collect::<Vec<_>>(),
        "positions"   => rows.iter().map(|(_, s)| join_positions(&s.mismatch_positions)).collect::<Vec<_>>(),
        "overhang"    => rows.iter().map(|(_, s)| s.overhang_sequence.clone()).collect::<Vec<_>>(),
        "binding"     => rows.iter().map(|(_, s)| s.binding_sequence.clone()).collect::<Vec<_>>(),
        "matched"     => rows.iter().map(|(_, s)| s.matched_sequence.clone()).collect::<Vec<_>>(),
        "tm"          => rows.iter().map(|(_, s)| s.tm).collect::<Vec<_>>(),
        "gc_percent"  => rows.iter().map(|(_, s)| s.gc_percent).collect::<Vec<_>>(),
        "dg_3prime"   => rows.iter().map(|(_, s)| s.stability_3prime).collect::<Vec<_>>(),
    )
}

fn emit(mut df: DataFrame, csv: bool) -> anyhow::Result<()> {
    if csv {
        CsvWriter::new(std::io::stdout()).include_header(true).finish(&mut df)?;
        return Ok(());
    }

    // Configure Polars display to show all columns and full cell width.
    // These env vars are read by Polars' pretty-printer (fmt feature).
    std::env::set_var("POLARS_FMT_TABLE_FORMATTING", "UTF8_FULL");
    std::env::set_var("POLARS_FMT_MAX_COLS", "100000");
    std::env::set_var("POLARS_FMT_MAX_ROWS", "1000000");
    std::env::set_var("POLARS_FMT_STR_LEN", "100000");
    std::env::set_var("POLARS_TABLE_WIDTH", "65535");

    if df.height() == 0 {
        eprintln!("no binding sites found");
    }
    println!("{}", df);
    Ok(())
}

//! Sequence input for templates and primer lists.
//!
//! ### Design
//! - **FASTA/FASTQ** (plain or gzipped) parsed with `needletail`
//! - **Primer tables** (`.csv` / `.tsv`, header row, `name,sequence`) parsed with `csv`
//!
//! ### Errors
//! Parsing/IO errors are bubbled via `anyhow::Result` to the caller.
//!
//! ### Example
//! ```no_run
//! use primerbind::seqio;
//! let target = seqio::read_target("pUC19.fasta").unwrap();
//! let primers = seqio::load_primers("primers.csv").unwrap();
//! println!("{} primers against {} ({} nt)", primers.len(), target.id, target.seq.len());
//! ```
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;
use needletail::parse_fastx_file;
use serde::{Deserialize, Serialize};

/// One FASTA/FASTQ record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub id: String,
    pub seq: String,
}

/// A primer with a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPrimer {
    pub name: String,
    pub sequence: String,
}

/// Every record in a FASTA/FASTQ(.gz) file.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<SeqRecord>> {
    let p = path.as_ref();
    let mut reader = parse_fastx_file(p).with_context(|| format!("opening {}", p.display()))?;
    let mut out = Vec::new();
    while let Some(record) = reader.next() {
        let rec = record?;
        out.push(SeqRecord {
            id: String::from_utf8_lossy(rec.id()).to_string(),
            seq: String::from_utf8_lossy(&rec.seq()).to_string(),
        });
    }
    debug!("read {} records from {}", out.len(), p.display());
    Ok(out)
}

/// First record of a sequence file, used as the search template.
pub fn read_target<P: AsRef<Path>>(path: P) -> Result<SeqRecord> {
    let p = path.as_ref();
    match read_records(p)?.into_iter().next() {
        Some(r) => Ok(r),
        None => bail!("no sequence records in {}", p.display()),
    }
}

fn is_table(p: &Path) -> bool {
    matches!(
        p.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref(),
        Some("csv") | Some("tsv")
    )
}

/// Load primers from a CSV/TSV table or from a FASTA/FASTQ file.
///
/// Tables need a header row; the first two columns are taken as name and
/// sequence. Blank sequences are skipped.
pub fn load_primers<P: AsRef<Path>>(path: P) -> Result<Vec<NamedPrimer>> {
    let p = path.as_ref();
    let primers: Vec<NamedPrimer> = if is_table(p) {
        let delim = if p.extension().map(|e| e == "tsv").unwrap_or(false) { b'\t' } else { b',' };
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).delimiter(delim).from_path(p)?;
        let mut v = Vec::new();
        for rec in rdr.records() {
            let r = rec?;
            if r.len() >= 2 && !r[1].trim().is_empty() {
                v.push(NamedPrimer { name: r[0].trim().to_string(), sequence: r[1].trim().to_string() });
            }
        }
        v
    } else {
        read_records(p)?
            .into_iter()
            .map(|r| NamedPrimer { name: r.id, sequence: r.seq })
            .collect()
    };
    if primers.is_empty() {
        bail!("no primers found in {}", p.display());
    }
    Ok(primers)
}

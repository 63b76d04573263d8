//! Nearest-neighbor duplex thermodynamics (SantaLucia 1998 unified parameters).
//!
//! Used for the built-in melting temperature calculator and for 3'-end
//! stability. Salt handling follows the Primer3 convention of folding Mg²⁺ and
//! dNTPs into a Na⁺-equivalent concentration.
//!
//! # Examples
//! ```
//! use primerbind::thermo::{tm_nearest_neighbor, ThermoConditions};
//! let tm = tm_nearest_neighbor("CAGTCGATTGCAACGTGTCA", &ThermoConditions::default()).unwrap();
//! assert!(tm > 45.0 && tm < 80.0);
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sequence::reverse_complement;

/// Gas constant, cal/(K·mol).
const R: f64 = 1.9872;
const KELVIN: f64 = 273.15;

/// Reaction conditions for Tm prediction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThermoConditions {
    /// Monovalent cations, mM.
    pub na_mm: f64,
    /// Mg²⁺, mM.
    pub mg_mm: f64,
    /// dNTPs, mM.
    pub dntp_mm: f64,
    /// Primer strand concentration, nM.
    pub primer_nm: f64,
}

impl Default for ThermoConditions {
    fn default() -> Self {
        Self { na_mm: 50.0, mg_mm: 1.5, dntp_mm: 0.6, primer_nm: 200.0 }
    }
}

impl ThermoConditions {
    /// Na⁺-equivalent concentration in mol/L.
    fn na_equivalent(&self) -> f64 {
        let free_mg = (self.mg_mm - self.dntp_mm).max(0.0);
        (self.na_mm + 120.0 * free_mg.sqrt()) / 1000.0
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    #[error("sequence too short for nearest-neighbor Tm ({0} nt, need at least 2)")]
    TooShort(usize),
    #[error("no nearest-neighbor parameters for base '{base}' at position {pos}")]
    UnknownBase { base: char, pos: usize },
}

/// ΔH (kcal/mol) and ΔS (cal/K·mol) for the stack `a` followed by `b`.
pub fn nn_stack(a: u8, b: u8) -> Option<(f64, f64)> {
    let p = match (a, b) {
        (b'A', b'A') | (b'T', b'T') => (-7.9, -22.2),
        (b'A', b'T') => (-7.2, -20.4),
        (b'T', b'A') => (-7.2, -21.3),
        (b'C', b'A') | (b'T', b'G') => (-8.5, -22.7),
        (b'G', b'T') | (b'A', b'C') => (-8.4, -22.4),
        (b'C', b'T') | (b'A', b'G') => (-7.8, -21.0),
        (b'G', b'A') | (b'T', b'C') => (-8.2, -22.2),
        (b'C', b'G') => (-10.6, -27.2),
        (b'G', b'C') => (-9.8, -24.4),
        (b'C', b'C') | (b'G', b'G') => (-8.0, -19.9),
        _ => return None,
    };
    Some(p)
}

fn check_bases(seq: &[u8]) -> Result<(), ThermoError> {
    match seq.iter().position(|b| !matches!(b, b'A' | b'C' | b'G' | b'T')) {
        Some(pos) => Err(ThermoError::UnknownBase { base: seq[pos] as char, pos }),
        None => Ok(()),
    }
}

/// Sum of stacking ΔH/ΔS over `seq`, without initiation terms.
pub fn stack_sum(seq: &[u8]) -> Result<(f64, f64), ThermoError> {
    if seq.len() < 2 {
        return Err(ThermoError::TooShort(seq.len()));
    }
    check_bases(seq)?;
    Ok(seq.windows(2).fold((0.0, 0.0), |(dh, ds), w| {
        let (h, s) = nn_stack(w[0], w[1]).unwrap_or((0.0, 0.0));
        (dh + h, ds + s)
    }))
}

fn terminal_initiation(b: u8) -> (f64, f64) {
    match b {
        b'G' | b'C' => (0.1, -2.8),
        _ => (2.3, 4.1),
    }
}

/// ΔG (kcal/mol) of the stacks in `seq` at `temp_c` °C.
pub fn stack_delta_g(seq: &[u8], temp_c: f64) -> Result<f64, ThermoError> {
    let (dh, ds) = stack_sum(seq)?;
    Ok(dh - (temp_c + KELVIN) * ds / 1000.0)
}

/// Two-state melting temperature (°C) of `seq` against its perfect complement.
pub fn tm_nearest_neighbor(seq: &str, conditions: &ThermoConditions) -> Result<f64, ThermoError> {
    let s = seq.as_bytes();
    let (mut dh, mut ds) = stack_sum(s)?;
    for b in [s[0], s[s.len() - 1]] {
        let (h, e) = terminal_initiation(b);
        dh += h;
        ds += e;
    }
    ds += 0.368 * (s.len() as f64 - 1.0) * conditions.na_equivalent().ln();

    let c = conditions.primer_nm / 1e9;
    let self_complementary = reverse_complement(seq) == seq;
    let ct = if self_complementary {
        ds += -1.4;
        c
    } else {
        c / 4.0
    };
    Ok(1000.0 * dh / (ds + R * ct.ln()) - KELVIN)
}

//! Sequence normalization, strand generation and circular indexing.
//!
//! Primers and templates are compared byte-for-byte after normalization, so
//! anything that is not `A`, `C`, `G` or `T` is kept as-is and simply fails to
//! match unless the other side carries the same symbol.
//!
//! # Examples
//! ```
//! use primerbind::sequence::{normalize_primer, reverse_complement};
//! assert_eq!(normalize_primer(" acg t\n"), "ACGT");
//! assert_eq!(reverse_complement("AACGN"), "NCGTT");
//! ```

/// Uppercase a primer and drop every whitespace character.
pub fn normalize_primer(primer: &str) -> String {
    let mut s = primer.to_ascii_uppercase();
    s.retain(|c| !c.is_whitespace());
    s
}

/// Uppercase a template. Whitespace is significant in templates and kept.
pub fn normalize_target(target: &str) -> String {
    target.to_ascii_uppercase()
}

/// Watson-Crick complement of one base; other symbols map to themselves.
#[inline]
pub fn complement_base(b: u8) -> u8 {
    match b {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        other => other,
    }
}

/// Complement without reversing.
pub fn complement(seq: &str) -> String {
    seq.bytes().map(|b| complement_base(b) as char).collect()
}

/// Reverse complement, reading the opposite strand 5'→3'.
pub fn reverse_complement(seq: &str) -> String {
    String::from_utf8_lossy(&reverse_complement_bytes(seq.as_bytes())).into_owned()
}

/// Byte-level reverse complement; output length always equals input length.
pub fn reverse_complement_bytes(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement_base(b)).collect()
}

/// Read-only view over a template with optional wraparound indexing.
#[derive(Clone, Copy, Debug)]
pub struct Template<'a> {
    seq: &'a [u8],
    circular: bool,
}

impl<'a> Template<'a> {
    pub fn new(seq: &'a [u8], circular: bool) -> Self {
        Self { seq, circular }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Base at `pos`. Circular templates wrap; linear callers must stay in bounds.
    #[inline]
    pub fn base(&self, pos: usize) -> u8 {
        if self.circular {
            self.seq[pos % self.seq.len()]
        } else {
            self.seq[pos]
        }
    }

    /// Position reduced onto the template (identity for linear templates).
    #[inline]
    pub fn wrap(&self, pos: usize) -> usize {
        if self.circular && !self.seq.is_empty() {
            pos % self.seq.len()
        } else {
            pos
        }
    }

    /// `len` bases starting at `start`, wrapping through the origin if circular.
    pub fn slice(&self, start: usize, len: usize) -> String {
        (0..len).map(|i| self.base(start + i) as char).collect()
    }

    /// Number of window offsets for a pattern of `pattern_len` bases.
    ///
    /// Circular templates allow every offset; a pattern longer than the
    /// template never fits, circular or not.
    pub fn window_count(&self, pattern_len: usize) -> usize {
        let n = self.seq.len();
        if pattern_len == 0 || pattern_len > n {
            0
        } else if self.circular {
            n
        } else {
            n - pattern_len + 1
        }
    }
}

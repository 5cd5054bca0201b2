//! K-mer encoding: 2-bit mapping, reverse complement, canonical identity,
//! and a rolling scanner over a sequence.
//!
//! Conventions
//! - Codes are **LSB-aligned**: the lower `2k` bits hold the k-mer, first base
//!   in the most significant position. A k-mer's code is its numeric identity,
//!   so the identity space for length `k` is `[0, 4^k)`.
//! - Canonical identity is `min(forward, reverse_complement)`.

/// 256-entry LUT: ASCII → 2-bit (A=0, C=1, G=2, T/U=3), 0xFF for ambiguous.
pub static MAP_LUT: [u8; 256] = {
    const X: u8 = 0xFF;
    let mut t = [X; 256];
    t[b'A' as usize] = 0;
    t[b'a' as usize] = 0;
    t[b'C' as usize] = 1;
    t[b'c' as usize] = 1;
    t[b'G' as usize] = 2;
    t[b'g' as usize] = 2;
    t[b'T' as usize] = 3;
    t[b't' as usize] = 3;
    t[b'U' as usize] = 3;
    t[b'u' as usize] = 3;
    t
};

/// 2-bit encoding via LUT: A=00, C=01, G=10, T=11. `None` if ambiguous.
#[inline]
pub fn map_base(b: u8) -> Option<u8> {
    let v = MAP_LUT[b as usize];
    if v <= 3 { Some(v) } else { None }
}

/// Encode a k-mer window to an LSB-aligned `u64`. None if `k>32` or ambiguous.
#[inline]
pub fn encode_kmer(window: &[u8]) -> Option<u64> {
    let k = window.len();
    if k == 0 || k > 32 {
        return None;
    }
    let mut code: u64 = 0;
    for &b in window {
        let v = map_base(b)? as u64;
        code = (code << 2) | v;
    }
    Some(code)
}

/// Decode an LSB-aligned code back to uppercase bases.
pub fn decode_kmer(code: u64, k: usize) -> Vec<u8> {
    debug_assert!(k <= 32);
    (0..k)
        .map(|i| {
            let shift = (k - 1 - i) * 2;
            b"ACGT"[((code >> shift) & 0b11) as usize]
        })
        .collect()
}

/// Reverse-complement an LSB-aligned code (lower `2k` bits used).
#[inline]
pub fn revcomp(code: u64, k: usize) -> u64 {
    debug_assert!(k <= 32);
    let mut rc: u64 = 0;
    for i in 0..k {
        let base = (code >> (i * 2)) & 0b11;
        let comp = base ^ 0b11;
        let shift = (k - 1 - i) * 2;
        rc |= comp << shift;
    }
    rc
}

/// Canonical identity of an LSB-aligned code: the smaller of the code and its
/// reverse complement.
#[inline]
pub fn canonical(code: u64, k: usize) -> u64 {
    code.min(revcomp(code, k))
}

/// Rolling scanner yielding the identity of every k-mer in a sequence.
///
/// Forward and reverse-complement codes are updated in O(1) per base. An
/// ambiguous byte resets the window, so no k-mer spanning it is produced.
pub struct Kmers<'a> {
    seq: &'a [u8],
    k: usize,
    canonical: bool,
    mask: u64,
    fwd: u64,
    rc: u64,
    len: usize,
    pos: usize,
}

impl<'a> Kmers<'a> {
    /// `k` must be in `1..=32`.
    pub fn new(seq: &'a [u8], k: usize, canonical: bool) -> Self {
        assert!(k > 0 && k <= 32, "k must be 1..=32");
        let mask = if k == 32 {
            u64::MAX
        } else {
            (1u64 << (2 * k)) - 1
        };
        Kmers {
            seq,
            k,
            canonical,
            mask,
            fwd: 0,
            rc: 0,
            len: 0,
            pos: 0,
        }
    }
}

impl Iterator for Kmers<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        while self.pos < self.seq.len() {
            let b = self.seq[self.pos];
            self.pos += 1;

            let v_raw = MAP_LUT[b as usize];
            if v_raw > 3 {
                self.fwd = 0;
                self.rc = 0;
                self.len = 0;
                continue;
            }
            let v = v_raw as u64;

            self.fwd = ((self.fwd << 2) | v) & self.mask;
            self.rc = (self.rc >> 2) | ((v ^ 0b11) << (2 * (self.k - 1)));
            self.len += 1;

            if self.len >= self.k {
                let id = if self.canonical {
                    self.fwd.min(self.rc)
                } else {
                    self.fwd
                };
                return Some(id);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.seq.len() - self.pos;
        let pending = self.len.min(self.k - 1);
        (0, Some((remaining + pending + 1).saturating_sub(self.k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_inverts_encode() {
        let code = encode_kmer(b"GATTACA").unwrap();
        assert_eq!(decode_kmer(code, 7), b"GATTACA".to_vec());
    }

    #[test]
    fn rolling_matches_window_encoding() {
        let seq = b"ACGTTGCAAGGCT";
        let k = 5;
        let rolled: Vec<u64> = Kmers::new(seq, k, false).collect();
        let windows: Vec<u64> = seq
            .windows(k)
            .map(|w| encode_kmer(w).unwrap())
            .collect();
        assert_eq!(rolled, windows);

        let rolled: Vec<u64> = Kmers::new(seq, k, true).collect();
        let windows: Vec<u64> = seq
            .windows(k)
            .map(|w| canonical(encode_kmer(w).unwrap(), k))
            .collect();
        assert_eq!(rolled, windows);
    }

    #[test]
    fn ambiguous_byte_resets_window() {
        // "ACG" then reset, then "TTA" -> no 4-mer crosses the X
        assert_eq!(Kmers::new(b"ACGXTTA", 4, false).count(), 0);
        assert_eq!(Kmers::new(b"ACGXTTAC", 4, false).count(), 1);
    }

    #[test]
    fn lowercase_is_equivalent() {
        let upper: Vec<u64> = Kmers::new(b"ACGTAC", 3, true).collect();
        let lower: Vec<u64> = Kmers::new(b"acgtac", 3, true).collect();
        assert_eq!(upper, lower);
    }

    #[test]
    fn short_sequence_yields_nothing() {
        assert_eq!(Kmers::new(b"AC", 3, true).next(), None);
    }
}

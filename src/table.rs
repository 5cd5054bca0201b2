//! Counting table: the storage contract the partitioned index delegates to,
//! and the byte-counter hash table behind [`new_counting_table`].

use tracing::debug;

use crate::encode::{Kmers, canonical, encode_kmer};
use crate::error::SplitError;
use crate::partition::kmer_space;

/// Saturation point of a counter.
pub const MAX_COUNT: u8 = u8::MAX;

/// Range-bounded k-mer counting.
///
/// Every operation enumerates the overlapping k-mers of `seq` and only looks
/// at those whose identity lies in `[lower, upper)`; the others are skipped
/// without error. `seq` is expected in uppercase.
pub trait CountingTable {
    /// K-mer length tracked by this table.
    fn k(&self) -> u32;

    /// Increment every in-range k-mer of `seq`. Returns the number of k-mer
    /// positions incremented.
    fn consume(&mut self, seq: &[u8], lower: u64, upper: u64) -> u64;

    /// Minimum count among in-range k-mers of `seq`.
    fn get_min_count(&self, seq: &[u8], lower: u64, upper: u64) -> u8;

    /// Maximum count among in-range k-mers of `seq`.
    fn get_max_count(&self, seq: &[u8], lower: u64, upper: u64) -> u8;

    /// Histogram of counter values over all slots; bin `i` holds the number
    /// of slots whose count is `i`.
    fn abundance_distribution(&self) -> Vec<u64>;
}

/// Table construction options.
#[derive(Clone, Copy, Debug)]
pub struct TableConfig {
    canonical: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { canonical: true }
    }
}

impl TableConfig {
    /// Treat a k-mer and its reverse complement as one identity (default: true).
    pub fn canonical(mut self, yes: bool) -> Self {
        self.canonical = yes;
        self
    }

    pub fn is_canonical(&self) -> bool {
        self.canonical
    }
}

/// Allocate the default counting table for `k`-mers with `table_size` slots.
pub fn new_counting_table(k: u32, table_size: u64) -> Result<CountingHash, SplitError> {
    new_counting_table_with(k, table_size, TableConfig::default())
}

/// Allocate a counting table with explicit options.
pub fn new_counting_table_with(
    k: u32,
    table_size: u64,
    cfg: TableConfig,
) -> Result<CountingHash, SplitError> {
    kmer_space(k)?;
    let slots = usize::try_from(table_size)
        .ok()
        .filter(|&n| n > 0)
        .ok_or(SplitError::InvalidTableSize(table_size))?;
    debug!(k, table_size, canonical = cfg.canonical, "allocating counting table");
    Ok(CountingHash {
        k,
        canonical: cfg.canonical,
        counts: vec![0u8; slots],
    })
}

/// Single-array counting hash: slot = `identity % table_size`, `u8`
/// counters saturating at [`MAX_COUNT`].
///
/// Distinct k-mers sharing a slot share a counter, so counts are upper
/// bounds on true abundance.
pub struct CountingHash {
    k: u32,
    canonical: bool,
    counts: Vec<u8>,
}

impl CountingHash {
    pub fn table_size(&self) -> u64 {
        self.counts.len() as u64
    }

    pub fn is_canonical(&self) -> bool {
        self.canonical
    }

    /// Count of a single k-mer. `None` if `kmer` is not a valid k-mer of
    /// this table's length.
    pub fn get_count(&self, kmer: &[u8]) -> Option<u8> {
        if kmer.len() != self.k as usize {
            return None;
        }
        let code = encode_kmer(kmer)?;
        let id = if self.canonical {
            canonical(code, kmer.len())
        } else {
            code
        };
        Some(self.counts[self.slot(id)])
    }

    /// Number of non-empty slots.
    pub fn n_occupied(&self) -> u64 {
        self.counts.iter().filter(|&&c| c > 0).count() as u64
    }

    #[inline]
    fn slot(&self, id: u64) -> usize {
        (id % self.counts.len() as u64) as usize
    }

    fn in_range<'a>(
        &'a self,
        seq: &'a [u8],
        lower: u64,
        upper: u64,
    ) -> impl Iterator<Item = u64> + 'a {
        Kmers::new(seq, self.k as usize, self.canonical)
            .filter(move |&id| lower <= id && id < upper)
    }
}

impl CountingTable for CountingHash {
    fn k(&self) -> u32 {
        self.k
    }

    fn consume(&mut self, seq: &[u8], lower: u64, upper: u64) -> u64 {
        let mut n = 0u64;
        for id in Kmers::new(seq, self.k as usize, self.canonical) {
            if id < lower || id >= upper {
                continue;
            }
            let slot = self.slot(id);
            self.counts[slot] = self.counts[slot].saturating_add(1);
            n += 1;
        }
        n
    }

    /// [`MAX_COUNT`] when no k-mer is in range.
    fn get_min_count(&self, seq: &[u8], lower: u64, upper: u64) -> u8 {
        self.in_range(seq, lower, upper)
            .map(|id| self.counts[self.slot(id)])
            .fold(MAX_COUNT, u8::min)
    }

    /// `0` when no k-mer is in range.
    fn get_max_count(&self, seq: &[u8], lower: u64, upper: u64) -> u8 {
        self.in_range(seq, lower, upper)
            .map(|id| self.counts[self.slot(id)])
            .fold(0, u8::max)
    }

    fn abundance_distribution(&self) -> Vec<u64> {
        let mut dist = vec![0u64; MAX_COUNT as usize + 1];
        for &c in &self.counts {
            dist[c as usize] += 1;
        }
        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: (u64, u64) = (0, u64::MAX);

    #[test]
    fn factory_rejects_bad_geometry() {
        assert!(matches!(
            new_counting_table(4, 0),
            Err(SplitError::InvalidTableSize(0))
        ));
        assert!(matches!(
            new_counting_table(0, 10),
            Err(SplitError::InvalidKmerLength(0))
        ));
        assert!(matches!(
            new_counting_table(32, 10),
            Err(SplitError::RangeOverflow { .. })
        ));
    }

    #[test]
    fn consume_and_lookup() {
        let mut t = new_counting_table(4, 1_000_003).unwrap();
        assert_eq!(t.consume(b"ACGTACGT", ALL.0, ALL.1), 5);
        // ACGT is its own reverse complement and occurs twice
        assert_eq!(t.get_count(b"ACGT"), Some(2));
        assert_eq!(t.get_count(b"GTAC"), Some(1));
        // CGTA and TACG are reverse complements and share a counter
        assert_eq!(t.get_count(b"CGTA"), Some(2));
        assert_eq!(t.get_count(b"TACG"), Some(2));
        assert_eq!(t.get_count(b"ACG"), None);
        assert_eq!(t.get_count(b"ACGN"), None);
    }

    #[test]
    fn non_canonical_keeps_strands_apart() {
        let cfg = TableConfig::default().canonical(false);
        let mut t = new_counting_table_with(3, 1_009, cfg).unwrap();
        t.consume(b"AAA", ALL.0, ALL.1);
        assert_eq!(t.get_count(b"AAA"), Some(1));
        assert_eq!(t.get_count(b"TTT"), Some(0));
        assert!(!t.is_canonical());
    }

    #[test]
    fn counters_saturate() {
        let mut t = new_counting_table(3, 101).unwrap();
        for _ in 0..300 {
            t.consume(b"AAA", ALL.0, ALL.1);
        }
        assert_eq!(t.get_count(b"AAA"), Some(MAX_COUNT));
        assert_eq!(t.get_max_count(b"AAA", ALL.0, ALL.1), MAX_COUNT);
    }

    #[test]
    fn bounds_restrict_consume_and_queries() {
        let cfg = TableConfig::default().canonical(false);
        let mut t = new_counting_table_with(2, 97, cfg).unwrap();
        // AC=1, CG=6, GT=11
        assert_eq!(t.consume(b"ACGT", 5, 10), 1);
        assert_eq!(t.get_count(b"CG"), Some(1));
        assert_eq!(t.get_count(b"AC"), Some(0));
        assert_eq!(t.get_min_count(b"ACGT", 5, 10), 1);
        assert_eq!(t.get_min_count(b"ACGT", 0, 16), 0);
    }

    #[test]
    fn empty_range_reports_sentinels() {
        let t = new_counting_table(4, 97).unwrap();
        assert_eq!(t.get_min_count(b"ACG", 0, 256), MAX_COUNT);
        assert_eq!(t.get_max_count(b"ACG", 0, 256), 0);
    }

    #[test]
    fn distribution_covers_every_slot() {
        let mut t = new_counting_table(5, 50).unwrap();
        t.consume(b"ACGTTGCA", 0, u64::MAX);
        let dist = t.abundance_distribution();
        assert_eq!(dist.len(), 256);
        assert_eq!(dist.iter().sum::<u64>(), 50);
        assert_eq!(50 - dist[0], t.n_occupied());
    }
}

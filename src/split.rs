//! PartitionedIndex: a counting table restricted to one partition of the
//! k-mer identity space.
//!
//! Running one index per partition index (each over the full input) counts
//! every k-mer exactly once across the set, with no state shared between
//! partitions. Per-sequence `consume` results are summed across partitions
//! to recover the sequence's total.

use tracing::debug;

use crate::error::SplitError;
use crate::partition::PartitionBounds;
use crate::table::{CountingHash, CountingTable, TableConfig, new_counting_table_with};

/// Ambiguity symbol; a sequence containing it is never counted.
pub const AMBIGUOUS_BASE: u8 = b'N';

/// Whether `seq` contains the ambiguity symbol in either case.
#[inline]
pub fn is_ambiguous(seq: &[u8]) -> bool {
    seq.iter().any(|b| b.to_ascii_uppercase() == AMBIGUOUS_BASE)
}

/// Uppercase `seq`, or `None` if it contains the ambiguity symbol.
pub fn normalize(seq: &[u8]) -> Option<Vec<u8>> {
    let upper = seq.to_ascii_uppercase();
    if upper.contains(&AMBIGUOUS_BASE) {
        None
    } else {
        Some(upper)
    }
}

/// Counting table bound to a single partition.
pub struct PartitionedIndex<T = CountingHash> {
    bounds: PartitionBounds,
    table: T,
}

impl PartitionedIndex<CountingHash> {
    /// Allocate a canonical counting table with `table_size` slots and bind
    /// it to `partition` of `num_partitions`.
    pub fn new(
        k: u32,
        table_size: u64,
        partition: u64,
        num_partitions: u64,
    ) -> Result<Self, SplitError> {
        Self::with_config(k, table_size, partition, num_partitions, TableConfig::default())
    }

    /// As [`PartitionedIndex::new`] with explicit table options.
    pub fn with_config(
        k: u32,
        table_size: u64,
        partition: u64,
        num_partitions: u64,
        cfg: TableConfig,
    ) -> Result<Self, SplitError> {
        let bounds = PartitionBounds::new(k, partition, num_partitions)?;
        let table = new_counting_table_with(k, table_size, cfg)?;
        Ok(Self::from_parts(bounds, table))
    }
}

impl<T: CountingTable> PartitionedIndex<T> {
    /// Bind an existing table to `partition` of `num_partitions`, using the
    /// table's k.
    pub fn with_table(table: T, partition: u64, num_partitions: u64) -> Result<Self, SplitError> {
        let bounds = PartitionBounds::new(table.k(), partition, num_partitions)?;
        Ok(Self::from_parts(bounds, table))
    }

    fn from_parts(bounds: PartitionBounds, table: T) -> Self {
        debug!(
            k = bounds.k(),
            partition = bounds.partition(),
            num_partitions = bounds.num_partitions(),
            lower = bounds.lower_bound(),
            upper = bounds.upper_bound(),
            "partitioned index ready"
        );
        PartitionedIndex { bounds, table }
    }

    /// Count every in-partition k-mer of `seq`.
    ///
    /// Returns the number of k-mer positions incremented, i.e. this
    /// partition's contribution. Sequences containing `N` return 0 and leave
    /// the table untouched.
    pub fn consume(&mut self, seq: impl AsRef<[u8]>) -> u64 {
        let Some(seq) = normalize(seq.as_ref()) else {
            return 0;
        };
        self.table
            .consume(&seq, self.bounds.lower_bound(), self.bounds.upper_bound())
    }

    /// Minimum and maximum abundance among the in-partition k-mers of `seq`.
    ///
    /// Sequences containing `N` return `(0, 0)`. If no k-mer of `seq` falls
    /// in this partition, the table's own sentinels are returned as-is.
    pub fn count(&self, seq: impl AsRef<[u8]>) -> (u8, u8) {
        let Some(seq) = normalize(seq.as_ref()) else {
            return (0, 0);
        };
        let (lo, hi) = (self.bounds.lower_bound(), self.bounds.upper_bound());
        (
            self.table.get_min_count(&seq, lo, hi),
            self.table.get_max_count(&seq, lo, hi),
        )
    }

    #[inline]
    pub fn k(&self) -> u32 {
        self.bounds.k()
    }

    #[inline]
    pub fn partition(&self) -> u64 {
        self.bounds.partition()
    }

    #[inline]
    pub fn num_partitions(&self) -> u64 {
        self.bounds.num_partitions()
    }

    #[inline]
    pub fn partition_size(&self) -> u64 {
        self.bounds.partition_size()
    }

    #[inline]
    pub fn lower_bound(&self) -> u64 {
        self.bounds.lower_bound()
    }

    #[inline]
    pub fn upper_bound(&self) -> u64 {
        self.bounds.upper_bound()
    }

    pub fn bounds(&self) -> &PartitionBounds {
        &self.bounds
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn into_table(self) -> T {
        self.table
    }
}

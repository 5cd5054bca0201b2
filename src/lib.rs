//! Partitioned k-mer counting.
//!
//! The k-mer identity space `[0, 4^k)` is split into `P` contiguous ranges.
//! A [`PartitionedIndex`] owns one range and a counting table; it counts and
//! queries only the k-mers whose identity falls in that range, so `P`
//! independent processes (one per partition) together count every k-mer
//! exactly once with no shared state.
//!
//! - Partition arithmetic: [`PartitionBounds`] (last partition absorbs the
//!   remainder of `4^k / P`).
//! - Sequences are uppercased; any sequence containing `N` is skipped with a
//!   zero result, never an error.
//! - Storage goes through the [`CountingTable`] trait; [`new_counting_table`]
//!   builds the default byte-counter table (canonical k-mers by default).

pub mod encode;
mod error;
pub mod hist;
pub mod ingest;
pub mod partition;
pub mod primes;
pub mod split;
pub mod table;

pub use error::SplitError;
pub use ingest::{FilterSummary, IngestConfig, IngestSummary};
pub use partition::{MAX_K, PartitionBounds, kmer_space};
pub use split::{PartitionedIndex, is_ambiguous, normalize};
pub use table::{
    CountingHash, CountingTable, MAX_COUNT, TableConfig, new_counting_table,
    new_counting_table_with,
};

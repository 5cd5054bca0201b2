use needletail::errors::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by partition construction, table allocation and ingestion.
pub enum SplitError {
    /// Partition index outside `[0, num_partitions)`.
    #[error("invalid partition: {partition} (expected 0..{num_partitions})")]
    InvalidPartition { partition: u64, num_partitions: u64 },
    /// K-mer length of zero.
    #[error("invalid k-mer length: {0}")]
    InvalidKmerLength(u32),
    /// `4^k` does not fit the 64-bit identity space.
    #[error("k-mer space 4^{k} overflows 64-bit identities (max k = {max})")]
    RangeOverflow { k: u32, max: u32 },
    /// More partitions than k-mer identities.
    #[error("{num_partitions} partitions exceed the {space} k-mers available for k={k}")]
    TooManyPartitions {
        k: u32,
        num_partitions: u64,
        space: u64,
    },
    /// Counting table with no slots.
    #[error("invalid table size: {0}")]
    InvalidTableSize(u64),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed FASTA/FASTQ input.
    #[error("FASTX parse error: {0}")]
    Parse(#[from] ParseError),
}

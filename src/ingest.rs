//! Bulk FASTA/FASTQ ingestion and record filtering for a single partition.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use needletail::parse_fastx_file;
use tracing::{debug, info};

use crate::error::SplitError;
use crate::split::{PartitionedIndex, is_ambiguous};
use crate::table::{CountingTable, MAX_COUNT};

/// Ingestion options.
#[derive(Clone, Debug, Default)]
pub struct IngestConfig {
    min_read_len: usize,
}

impl IngestConfig {
    /// Minimum read length to consider (shorter reads are skipped).
    pub fn min_read_len(mut self, n: usize) -> Self {
        self.min_read_len = n;
        self
    }
}

/// Per-file ingestion counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Records read.
    pub reads: u64,
    /// Records skipped because they contain `N`.
    pub ambiguous: u64,
    /// Records skipped for being shorter than `max(k, min_read_len)`.
    pub too_short: u64,
    /// K-mer positions counted into this partition.
    pub kmers: u64,
}

impl IngestSummary {
    pub fn merge(&mut self, other: &IngestSummary) {
        self.reads += other.reads;
        self.ambiguous += other.ambiguous;
        self.too_short += other.too_short;
        self.kmers += other.kmers;
    }
}

/// Consume every record of a FASTA/FASTQ file (optionally gzipped).
pub fn consume_fastx<T: CountingTable, P: AsRef<Path>>(
    index: &mut PartitionedIndex<T>,
    path: P,
    cfg: &IngestConfig,
) -> Result<IngestSummary, SplitError> {
    let start = Instant::now();
    let path = path.as_ref();
    let mut reader = parse_fastx_file(path)?;
    let min_len = cfg.min_read_len.max(index.k() as usize);
    let mut summary = IngestSummary::default();

    while let Some(record) = reader.next() {
        let record = record?;
        let seq = record.seq();
        summary.reads += 1;

        if seq.len() < min_len {
            summary.too_short += 1;
            continue;
        }
        if is_ambiguous(&seq[..]) {
            summary.ambiguous += 1;
            continue;
        }
        summary.kmers += index.consume(&seq[..]);
    }

    info!(
        path = %path.display(),
        partition = index.partition(),
        reads = summary.reads,
        ambiguous = summary.ambiguous,
        too_short = summary.too_short,
        kmers = summary.kmers,
        elapsed = ?start.elapsed(),
        "consumed"
    );
    Ok(summary)
}

/// Record counts of a filtering pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub reads: u64,
    pub kept: u64,
    /// Dropped for containing `N`.
    pub ambiguous: u64,
    /// Dropped for containing a saturated k-mer.
    pub repetitive: u64,
}

/// Copy the records of `input` to `output`, dropping those whose
/// in-partition maximum abundance reached [`MAX_COUNT`].
///
/// Records containing `N` cannot be scored and are dropped as well.
pub fn filter_repeats<T: CountingTable, P: AsRef<Path>, Q: AsRef<Path>>(
    index: &PartitionedIndex<T>,
    input: P,
    output: Q,
) -> Result<FilterSummary, SplitError> {
    filter_records(input.as_ref(), output.as_ref(), |seq, summary| {
        if is_ambiguous(seq) {
            summary.ambiguous += 1;
            return false;
        }
        let (_, max) = index.count(seq);
        if max >= MAX_COUNT {
            summary.repetitive += 1;
            return false;
        }
        true
    })
}

/// Copy the records of `input` to `output`, dropping those containing `N`.
pub fn drop_ambiguous<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<FilterSummary, SplitError> {
    filter_records(input.as_ref(), output.as_ref(), |seq, summary| {
        if is_ambiguous(seq) {
            summary.ambiguous += 1;
            false
        } else {
            true
        }
    })
}

fn filter_records<F>(input: &Path, output: &Path, mut keep: F) -> Result<FilterSummary, SplitError>
where
    F: FnMut(&[u8], &mut FilterSummary) -> bool,
{
    let mut reader = parse_fastx_file(input)?;
    let mut writer = BufWriter::new(File::create(output)?);
    let mut summary = FilterSummary::default();

    while let Some(record) = reader.next() {
        let record = record?;
        summary.reads += 1;
        let seq = record.seq();
        if !keep(&seq[..], &mut summary) {
            continue;
        }
        record.write(&mut writer, None)?;
        summary.kept += 1;
    }
    writer.flush()?;

    debug!(
        input = %input.display(),
        output = %output.display(),
        reads = summary.reads,
        kept = summary.kept,
        "filtered"
    );
    Ok(summary)
}

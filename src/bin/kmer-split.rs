use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use kmer_split::ingest::{consume_fastx, drop_ambiguous, filter_repeats};
use kmer_split::primes::next_prime_above;
use kmer_split::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Partitioned k-mer counting: each run owns one slice of the 4^k k-mer space.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the identity range of every partition
    Layout {
        /// K-mer length (<= 31)
        #[arg(short = 'k', long)]
        k: u32,

        /// Number of partitions
        #[arg(short = 'P', long)]
        partitions: u64,
    },

    /// Count one partition of the input k-mers and write its abundance histogram
    Hist {
        #[command(flatten)]
        part: PartitionArgs,

        /// Output histogram path
        #[arg(short, long)]
        output: PathBuf,

        /// Input FASTA/FASTQ(.gz) paths
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Count one partition, then rewrite each input without reads holding saturated k-mers
    Filter {
        #[command(flatten)]
        part: PartitionArgs,

        /// Suffix appended to each input path for its filtered copy
        #[arg(long, default_value = ".norepeat")]
        suffix: String,

        /// Input FASTA/FASTQ(.gz) paths
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Copy reads that contain no N
    StripN {
        /// Input FASTA/FASTQ(.gz) path
        #[arg(short, long)]
        input: PathBuf,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct PartitionArgs {
    /// K-mer length (<= 31)
    #[arg(short = 'k', long, default_value_t = 20)]
    k: u32,

    /// Requested table size (rounded up to the next prime unless --exact-size)
    #[arg(short = 'x', long, default_value_t = 1_000_000)]
    table_size: u64,

    /// Use the table size as given
    #[arg(long, default_value_t = false)]
    exact_size: bool,

    /// Partition index owned by this run
    #[arg(short = 'p', long, default_value_t = 0)]
    partition: u64,

    /// Total number of partitions
    #[arg(short = 'P', long, default_value_t = 1)]
    partitions: u64,

    /// Count forward and reverse-complement k-mers separately
    #[arg(long, default_value_t = false)]
    no_canonical: bool,

    /// Minimum read length
    #[arg(long, default_value_t = 0)]
    min_read_len: usize,
}

impl PartitionArgs {
    fn table_size(&self) -> Result<u64> {
        if self.exact_size {
            return Ok(self.table_size);
        }
        next_prime_above(self.table_size)
            .with_context(|| format!("no prime table size above {}", self.table_size))
    }

    fn build_and_consume(&self, inputs: &[PathBuf]) -> Result<PartitionedIndex> {
        let cfg = TableConfig::default().canonical(!self.no_canonical);
        let mut index = PartitionedIndex::with_config(
            self.k,
            self.table_size()?,
            self.partition,
            self.partitions,
            cfg,
        )
        .context("Failed to set up partition")?;

        let ingest = IngestConfig::default().min_read_len(self.min_read_len);
        let mut total = IngestSummary::default();
        for path in inputs {
            let summary = consume_fastx(&mut index, path, &ingest)
                .with_context(|| format!("Failed to consume {}", path.display()))?;
            total.merge(&summary);
        }
        info!(
            k = index.k(),
            partition = index.partition(),
            partitions = index.num_partitions(),
            lower = index.lower_bound(),
            upper = index.upper_bound(),
            table_size = index.table().table_size(),
            reads = total.reads,
            ambiguous = total.ambiguous,
            too_short = total.too_short,
            kmers = total.kmers,
            "partition counted"
        );
        Ok(index)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Layout { k, partitions } => {
            let layout = PartitionBounds::layout_iter(k, partitions)
                .context("Failed to compute partition layout")?;
            println!("partition\tlower\tupper\tsize");
            for b in layout {
                println!(
                    "{}\t{}\t{}\t{}",
                    b.partition(),
                    b.lower_bound(),
                    b.upper_bound(),
                    b.len()
                );
            }
        }
        Command::Hist {
            part,
            output,
            inputs,
        } => {
            let index = part.build_and_consume(&inputs)?;
            hist::write_histogram_file(index.table(), &output)
                .with_context(|| format!("Failed to write histogram {}", output.display()))?;
            info!(output = %output.display(), "histogram written");
        }
        Command::Filter {
            part,
            suffix,
            inputs,
        } => {
            if suffix.is_empty() {
                bail!("--suffix must not be empty (would overwrite inputs)");
            }
            let index = part.build_and_consume(&inputs)?;
            for input in &inputs {
                let output = with_suffix(input, &suffix);
                let s = filter_repeats(&index, input, &output)
                    .with_context(|| format!("Failed to filter {}", input.display()))?;
                info!(
                    input = %input.display(),
                    output = %output.display(),
                    reads = s.reads,
                    kept = s.kept,
                    repetitive = s.repetitive,
                    ambiguous = s.ambiguous,
                    "filtered"
                );
            }
        }
        Command::StripN { input, output } => {
            let s = drop_ambiguous(&input, &output)
                .with_context(|| format!("Failed to filter {}", input.display()))?;
            info!(
                reads = s.reads,
                kept = s.kept,
                removed = s.ambiguous,
                "reads containing N removed"
            );
        }
    }

    Ok(())
}

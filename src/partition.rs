//! Partition arithmetic over the k-mer identity space `[0, 4^k)`.
//!
//! The space is split into `num_partitions` contiguous half-open ranges of
//! `floor(4^k / num_partitions)` identities each. The last partition extends
//! to `4^k` and absorbs the remainder of the division.

use std::ops::Range;

use crate::error::SplitError;

/// Largest k whose identity space `4^k` fits in a `u64`.
pub const MAX_K: u32 = 31;

/// Size of the k-mer identity space, `4^k`.
pub fn kmer_space(k: u32) -> Result<u64, SplitError> {
    if k == 0 {
        return Err(SplitError::InvalidKmerLength(k));
    }
    4u64
        .checked_pow(k)
        .ok_or(SplitError::RangeOverflow { k, max: MAX_K })
}

fn checked_space(k: u32, num_partitions: u64) -> Result<u64, SplitError> {
    let space = kmer_space(k)?;
    if num_partitions > space {
        return Err(SplitError::TooManyPartitions {
            k,
            num_partitions,
            space,
        });
    }
    Ok(space)
}

/// Bounds of one partition of the identity space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionBounds {
    k: u32,
    partition: u64,
    num_partitions: u64,
    partition_size: u64,
    lower: u64,
    upper: u64,
}

impl PartitionBounds {
    /// Compute the bounds owned by `partition` out of `num_partitions`.
    pub fn new(k: u32, partition: u64, num_partitions: u64) -> Result<Self, SplitError> {
        // Must precede any derived computation.
        if partition >= num_partitions {
            return Err(SplitError::InvalidPartition {
                partition,
                num_partitions,
            });
        }
        let space = checked_space(k, num_partitions)?;
        Ok(Self::from_space(k, partition, num_partitions, space))
    }

    /// Bounds of every partition, in index order.
    pub fn layout(k: u32, num_partitions: u64) -> Result<Vec<Self>, SplitError> {
        Ok(Self::layout_iter(k, num_partitions)?.collect())
    }

    /// Lazily yield the bounds of every partition, in index order. The
    /// geometry is validated once, up front.
    pub fn layout_iter(
        k: u32,
        num_partitions: u64,
    ) -> Result<impl DoubleEndedIterator<Item = Self>, SplitError> {
        if num_partitions == 0 {
            return Err(SplitError::InvalidPartition {
                partition: 0,
                num_partitions,
            });
        }
        let space = checked_space(k, num_partitions)?;
        Ok((0..num_partitions).map(move |p| Self::from_space(k, p, num_partitions, space)))
    }

    /// `partition < num_partitions <= space` must already hold.
    fn from_space(k: u32, partition: u64, num_partitions: u64, space: u64) -> Self {
        let partition_size = space / num_partitions;
        let lower = partition_size * partition;
        let upper = if partition == num_partitions - 1 {
            space
        } else {
            lower + partition_size
        };

        PartitionBounds {
            k,
            partition,
            num_partitions,
            partition_size,
            lower,
            upper,
        }
    }

    #[inline]
    pub fn k(&self) -> u32 {
        self.k
    }

    #[inline]
    pub fn partition(&self) -> u64 {
        self.partition
    }

    #[inline]
    pub fn num_partitions(&self) -> u64 {
        self.num_partitions
    }

    /// `floor(4^k / num_partitions)`; the last partition may be larger.
    #[inline]
    pub fn partition_size(&self) -> u64 {
        self.partition_size
    }

    /// Inclusive lower bound.
    #[inline]
    pub fn lower_bound(&self) -> u64 {
        self.lower
    }

    /// Exclusive upper bound.
    #[inline]
    pub fn upper_bound(&self) -> u64 {
        self.upper
    }

    #[inline]
    pub fn range(&self) -> Range<u64> {
        self.lower..self.upper
    }

    #[inline]
    pub fn contains(&self, id: u64) -> bool {
        self.lower <= id && id < self.upper
    }

    /// Number of identities owned by this partition.
    #[inline]
    pub fn len(&self) -> u64 {
        self.upper - self.lower
    }

    #[inline]
    pub fn is_last(&self) -> bool {
        self.partition == self.num_partitions - 1
    }

    /// Index of the partition owning `id` under the same `(k, num_partitions)`.
    /// Identities at or beyond `4^k` map to the last partition.
    pub fn owner_of(&self, id: u64) -> u64 {
        (id / self.partition_size).min(self.num_partitions - 1)
    }
}

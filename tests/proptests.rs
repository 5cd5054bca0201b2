use kmer_split::*;
use proptest::prelude::*;

/// Naive scan: encode every window independently, dropping windows with an
/// ambiguous base.
fn naive_ids(seq: &[u8], k: usize, canonical: bool) -> Vec<u64> {
    seq.windows(k)
        .filter_map(encode::encode_kmer)
        .map(|code| {
            if canonical {
                encode::canonical(code, k)
            } else {
                code
            }
        })
        .collect()
}

fn dna(min: usize, max: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"ACGTacgt".to_vec()), min..max)
}

proptest! {
    #[test]
    fn prop_rolling_scan_matches_naive(
        k in 1usize..=31,
        canonical in any::<bool>(),
        seq in prop::collection::vec(prop::sample::select(b"ACGTN".to_vec()), 0..128)
    ) {
        let rolled: Vec<u64> = encode::Kmers::new(&seq, k, canonical).collect();
        prop_assert_eq!(rolled, naive_ids(&seq, k, canonical));
    }

    #[test]
    fn prop_partitions_tile_the_space(k in 1u32..=31, n in 1u64..=64) {
        let space = kmer_space(k).unwrap();
        prop_assume!(n <= space);
        let layout = PartitionBounds::layout(k, n).unwrap();
        prop_assert_eq!(layout.len() as u64, n);
        prop_assert_eq!(layout[0].lower_bound(), 0);
        prop_assert_eq!(layout[layout.len() - 1].upper_bound(), space);
        for pair in layout.windows(2) {
            prop_assert_eq!(pair[0].upper_bound(), pair[1].lower_bound());
        }
        for b in &layout {
            prop_assert!(b.lower_bound() < b.upper_bound());
            if b.is_last() {
                prop_assert_eq!(b.len(), b.partition_size() + space % n);
            } else {
                prop_assert_eq!(b.len(), b.partition_size());
            }
        }
    }

    #[test]
    fn prop_partition_totals_sum_to_whole(
        k in 1u32..=12,
        n in 1u64..=8,
        seqs in prop::collection::vec(dna(0, 64), 1..8)
    ) {
        let mut whole = PartitionedIndex::new(k, 1_000_003, 0, 1).unwrap();
        let expected: u64 = seqs.iter().map(|s| whole.consume(s)).sum();

        let parts = n.min(kmer_space(k).unwrap());
        let mut total = 0u64;
        for p in 0..parts {
            let mut idx = PartitionedIndex::new(k, 1_000_003, p, parts).unwrap();
            total += seqs.iter().map(|s| idx.consume(s)).sum::<u64>();
        }
        prop_assert_eq!(total, expected);
    }

    #[test]
    fn prop_count_is_read_only_and_monotone(
        k in 1u32..=10,
        p in 0u64..4,
        seq in dna(1, 48)
    ) {
        let mut idx = PartitionedIndex::new(k, 10_007, p, 4).unwrap();
        idx.consume(&seq);
        let first = idx.count(&seq);
        prop_assert_eq!(idx.count(&seq), first);

        idx.consume(&seq);
        let second = idx.count(&seq);
        prop_assert!(second.0 >= first.0);
        prop_assert!(second.1 >= first.1);
    }
}

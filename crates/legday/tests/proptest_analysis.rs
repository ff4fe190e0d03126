//! Property-based tests for the bitplane analyzer.
//!
//! These tests verify that analysis properties hold across a wide range of inputs:
//! - Running-XOR whitening round-trips exactly
//! - Probability tables are dense and bounded
//! - Table computation is deterministic and matches a naive recount
//! - Misconfigured windows are rejected before scanning
//!
//! Run with: cargo test --test proptest_analysis

use proptest::prelude::*;

use legday::{
    compute_probability_table, pairwise_flip_matrix, previous_word_flip_rates, run_sweep,
    undo_xor_with_previous, window_histogram, xor_with_previous, Error, SweepConfig,
    TrailingBytes, WordStream,
};

/// Strategy for word streams, including empty and single-word streams.
fn stream_strategy() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(any::<i32>(), 0..512)
}

/// Strategy for valid (skip, bins) pairs.
fn window_strategy() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=10).prop_flat_map(|bins| (0..(32 - bins), Just(bins)))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    /// Property: inverse transform with reconstructed lookback restores the input.
    #[test]
    fn prop_xor_roundtrip(words in stream_strategy()) {
        let stream = WordStream::from(words);
        let whitened = xor_with_previous(&stream);
        prop_assert_eq!(whitened.len(), stream.len());
        prop_assert_eq!(undo_xor_with_previous(&whitened), stream);
    }

    /// Property: tables hold exactly 2^bins probabilities in [0, 1].
    #[test]
    fn prop_table_dense_and_bounded(
        words in stream_strategy(),
        (skip, bins) in window_strategy(),
        frac in 0.0f64..=1.0,
    ) {
        let stream = WordStream::from(words);
        let train_len = (stream.len() as f64 * frac) as usize;
        let table = compute_probability_table(&stream, skip, bins, train_len).unwrap();

        prop_assert_eq!(table.len(), 1usize << bins);
        for (key, &p) in table.probabilities().iter().enumerate() {
            prop_assert!((0.0..=1.0).contains(&p), "p[{}] = {}", key, p);
            if table.observations(key) == 0 {
                prop_assert_eq!(p, 0.0);
            }
        }
        let seen: u64 = (0..table.len()).map(|k| table.observations(k)).sum();
        prop_assert_eq!(seen as usize, train_len);
    }

    /// Property: counts match a naive per-word recount and repeat bit-identically.
    #[test]
    fn prop_table_matches_naive_recount(
        words in stream_strategy(),
        (skip, bins) in window_strategy(),
    ) {
        let stream = WordStream::from(words.clone());
        let table = compute_probability_table(&stream, skip, bins, words.len()).unwrap();
        let again = compute_probability_table(&stream, skip, bins, words.len()).unwrap();
        prop_assert_eq!(&table, &again);

        let mut ones = vec![0u64; 1 << bins];
        let mut totals = vec![1u64; 1 << bins];
        for &w in &words {
            let u = w as u32;
            let key = ((u >> skip) & ((1 << bins) - 1)) as usize;
            ones[key] += ((u >> (skip + bins)) & 1) as u64;
            totals[key] += 1;
        }
        prop_assert_eq!(table.ones(), &ones[..]);
        prop_assert_eq!(table.totals(), &totals[..]);
    }

    /// Property: windows reaching bit 32 are rejected for any stream.
    #[test]
    fn prop_oversized_window_rejected(
        words in stream_strategy(),
        bins in 1u32..=8,
        over in 0u32..8,
    ) {
        let stream = WordStream::from(words);
        let skip = 32 - bins + over;
        let is_invalid_window = matches!(
            compute_probability_table(&stream, skip, bins, stream.len()),
            Err(Error::InvalidContextWindow { .. })
        );
        prop_assert!(is_invalid_window);
    }

    /// Property: decoding keeps floor(len / 4) words and byte order.
    #[test]
    fn prop_decode_truncates(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let stream = WordStream::from_bytes(&bytes, TrailingBytes::Truncate).unwrap();
        prop_assert_eq!(stream.len(), bytes.len() / 4);
        prop_assert_eq!(&stream.to_bytes()[..], &bytes[..stream.len() * 4]);

        let strict = WordStream::from_bytes(&bytes, TrailingBytes::Reject);
        prop_assert_eq!(strict.is_ok(), bytes.len() % 4 == 0);
    }

    /// Property: summaries stay within their ranges.
    #[test]
    fn prop_summaries_bounded(words in stream_strategy()) {
        let stream = WordStream::from(words);

        let rates = previous_word_flip_rates(&stream, 10);
        prop_assert!(rates.iter().all(|r| (0.0..=1.0).contains(r)));

        let hist = window_histogram(&stream, 14, 8).unwrap();
        prop_assert_eq!(hist.iter().sum::<u64>() as usize, stream.len());

        let matrix = pairwise_flip_matrix(&stream, 12, stream.len()).unwrap();
        for j in 0..12 {
            prop_assert_eq!(matrix.get(j, j), 0.0);
            for k in 0..12 {
                prop_assert_eq!(matrix.get(j, k), matrix.get(k, j));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 16,
        ..ProptestConfig::default()
    })]

    /// Property: sweep order follows the skip range regardless of worker count.
    #[test]
    fn prop_sweep_preserves_order(words in stream_strategy(), workers in 1usize..6) {
        let stream = WordStream::from(words);
        let config = SweepConfig { bins: 4, skips: 0..32, train_len: None, workers };
        let result = run_sweep(&stream, &config).unwrap();

        let skips: Vec<u32> = result.entries().iter().map(|e| e.skip).collect();
        prop_assert_eq!(skips, (0..32).collect::<Vec<_>>());
        prop_assert_eq!(result.tables().count(), 28);
    }
}

// e2e/roundtrip.rs — Round-trip identity across inputs and option combinations.
//
// Compresses with one adapter kind and decompresses with the other, so every
// pairing of pull and push paths is exercised.

use std::io::{Read, Write};

use proptest::prelude::*;
use zflow::io::{compress_reader, compress_writer, decompress_reader, decompress_writer};
use zflow::Strategy as MatchStrategy;
use zflow::{compress_to_vec, decompress_to_vec, CompressOptions, DecompressOptions, Header};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn pull_push(data: &[u8], opts: &CompressOptions) -> Vec<u8> {
    let mut packed = Vec::new();
    compress_reader(data, opts)
        .unwrap()
        .read_to_end(&mut packed)
        .unwrap();
    let mut w = decompress_writer(Vec::new(), &DecompressOptions::matching(opts)).unwrap();
    w.write_all(&packed).unwrap();
    w.finish().unwrap()
}

fn push_pull(data: &[u8], opts: &CompressOptions) -> Vec<u8> {
    let mut w = compress_writer(Vec::new(), opts).unwrap();
    w.write_all(data).unwrap();
    let packed = w.finish().unwrap();
    let mut out = Vec::new();
    decompress_reader(&packed[..], &DecompressOptions::matching(opts))
        .unwrap()
        .read_to_end(&mut out)
        .unwrap();
    out
}

fn mixed(len: usize, seed: u64) -> Vec<u8> {
    let mut x = seed | 1;
    let mut out = Vec::with_capacity(len);
    while out.len() < len {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        if x % 3 == 0 {
            // Runs of text compress; noise does not. Mix both.
            out.extend_from_slice(b"repeated phrase ");
        } else {
            out.extend_from_slice(&x.to_le_bytes());
        }
    }
    out.truncate(len);
    out
}

fn header_strategy() -> impl Strategy<Value = Header> {
    prop_oneof![Just(Header::Zlib), Just(Header::Raw), Just(Header::Gzip)]
}

fn match_strategy() -> impl Strategy<Value = MatchStrategy> {
    proptest::sample::select(MatchStrategy::ALL.to_vec())
}

// ─────────────────────────────────────────────────────────────────────────────
// Deterministic cases
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input() {
    let opts = CompressOptions::default();
    assert!(pull_push(b"", &opts).is_empty());
    assert!(push_pull(b"", &opts).is_empty());
    let packed = compress_to_vec(b"", &opts).unwrap();
    assert!(!packed.is_empty());
}

#[test]
fn one_mebibyte() {
    let data = mixed(1 << 20, 42);
    let opts = CompressOptions::default();
    assert_eq!(pull_push(&data, &opts), data);
    assert_eq!(push_pull(&data, &opts), data);
}

#[test]
fn every_level_and_header() {
    let data = mixed(20_000, 9);
    for header in [Header::Zlib, Header::Raw, Header::Gzip] {
        for level in -1..=9 {
            let opts = CompressOptions::default().with_level(level).with_header(header);
            assert_eq!(push_pull(&data, &opts), data, "level {level} {header:?}");
        }
    }
}

#[test]
fn every_strategy_and_window() {
    let data = mixed(50_000, 5);
    for strategy in MatchStrategy::ALL {
        for window_bits in [9u8, 12, 15] {
            let opts = CompressOptions::default()
                .with_strategy(strategy)
                .with_window_bits(window_bits)
                .with_memory_level(9);
            assert_eq!(pull_push(&data, &opts), data, "{strategy:?} w{window_bits}");
        }
    }
}

#[test]
fn dictionary_with_zlib_and_raw_framing() {
    let dictionary = b"shared vocabulary: alpha beta gamma delta epsilon".to_vec();
    let data = b"alpha gamma epsilon beta delta alpha beta ".repeat(40);
    for header in [Header::Zlib, Header::Raw] {
        let opts = CompressOptions::default()
            .with_header(header)
            .with_dictionary(Some(dictionary.clone()));
        assert_eq!(push_pull(&data, &opts), data, "{header:?}");
        assert_eq!(pull_push(&data, &opts), data, "{header:?}");
    }
}

#[test]
fn dictionary_shrinks_small_inputs() {
    let dictionary = b"the quick brown fox jumps over the lazy dog".to_vec();
    let data = b"the lazy dog jumps over the quick brown fox";
    let plain = compress_to_vec(data, &CompressOptions::default()).unwrap();
    let primed = CompressOptions::default().with_dictionary(Some(dictionary));
    let packed = compress_to_vec(data, &primed).unwrap();
    assert!(packed.len() < plain.len());
    assert_eq!(
        decompress_to_vec(&packed, &DecompressOptions::matching(&primed)).unwrap(),
        data
    );
}

#[test]
fn header_window_size_is_read_from_the_stream() {
    let data = mixed(30_000, 77);
    let opts = CompressOptions::default().with_window_bits(10);
    let packed = compress_to_vec(&data, &opts).unwrap();
    let dopts = DecompressOptions::default().with_window_bits(0);
    assert_eq!(decompress_to_vec(&packed, &dopts).unwrap(), data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        max_shrink_iters: 100,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_round_trip(
        data in proptest::collection::vec(any::<u8>(), 0..20_000),
        level in -1i32..=9,
        window_bits in 9u8..=15,
        memory_level in 1u8..=9,
        header in header_strategy(),
        strategy in match_strategy(),
        buffer_size in 2usize..2048,
    ) {
        let opts = CompressOptions::default()
            .with_level(level)
            .with_window_bits(window_bits)
            .with_memory_level(memory_level)
            .with_header(header)
            .with_strategy(strategy)
            .with_buffer_size(buffer_size);
        prop_assert_eq!(push_pull(&data, &opts), data.clone());
        prop_assert_eq!(pull_push(&data, &opts), data);
    }

    #[test]
    fn prop_compressible_round_trip(seed in any::<u64>(), len in 0usize..200_000) {
        let data = mixed(len, seed);
        let opts = CompressOptions::default();
        let packed = compress_to_vec(&data, &opts).unwrap();
        prop_assert_eq!(decompress_to_vec(&packed, &DecompressOptions::default()).unwrap(), data);
    }
}

// Tests for src/engine/stream.rs — the feed/consume engine over real zlib.

use zflow::engine::{self, FeedConsume};
use zflow::error::{Error, ErrorKind, Misuse};
use zflow::{Chunk, CompressOptions, DecompressOptions, FlushMode};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Feed `input` with `Finish`, then consume into `out_len`-byte buffers until
/// the stream ends.
fn run_to_end<E: FeedConsume>(e: &mut E, input: &[u8], out_len: usize) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; out_len];
    let mut chunk = e.feed(input, FlushMode::Finish, &mut buf)?;
    out.extend_from_slice(&buf[..chunk.produced]);
    while !chunk.end_of_stream {
        assert!(e.can_consume(), "engine stalled without ending");
        chunk = e.consume(&mut buf)?;
        out.extend_from_slice(&buf[..chunk.produced]);
    }
    Ok(out)
}

fn compress(data: &[u8], out_len: usize) -> Vec<u8> {
    let mut e = engine::compressor(&CompressOptions::default()).unwrap();
    run_to_end(&mut e, data, out_len).unwrap()
}

fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut x = seed.max(1);
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            x as u8
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Concrete scenario
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn hello_world_round_trips() {
    let packed = compress(b"hello world", 1024);
    let mut d = engine::decompressor(&DecompressOptions::default()).unwrap();
    let plain = run_to_end(&mut d, &packed, 1024).unwrap();
    assert_eq!(plain, b"hello world");
    assert_eq!(plain.len(), 11);
}

#[test]
fn one_byte_output_matches_a_single_large_call() {
    let large = compress(b"hello world", 1024);
    let tiny = compress(b"hello world", 1);
    assert_eq!(tiny, large);
}

#[test]
fn large_call_finishes_in_one_feed() {
    let mut e = engine::compressor(&CompressOptions::default()).unwrap();
    let mut buf = [0u8; 1024];
    let chunk = e.feed(b"hello world", FlushMode::Finish, &mut buf).unwrap();
    assert!(chunk.end_of_stream);
    assert!(e.is_ended());
    assert!(e.end_reason().is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn clean_end_is_idempotent() {
    let mut e = engine::compressor(&CompressOptions::default()).unwrap();
    run_to_end(&mut e, b"abc", 64).unwrap();
    let mut buf = [0u8; 16];
    for _ in 0..3 {
        assert_eq!(e.consume(&mut buf).unwrap(), Chunk::last(0));
        assert_eq!(
            e.feed(b"x", FlushMode::NoFlush, &mut buf).unwrap_err(),
            Error::InvalidUsage(Misuse::FeedAfterEnd)
        );
    }
}

#[test]
fn fatal_end_repeats_the_same_error() {
    let mut d = engine::decompressor(&DecompressOptions::default()).unwrap();
    let mut buf = [0u8; 64];
    let first = d
        .feed(b"this is not a zlib stream", FlushMode::NoFlush, &mut buf)
        .unwrap_err();
    assert_eq!(first.kind(), ErrorKind::Data);
    for _ in 0..3 {
        assert_eq!(d.consume(&mut buf).unwrap_err(), first);
        assert_eq!(d.feed(b"", FlushMode::Finish, &mut buf).unwrap_err(), first);
    }
    assert_eq!(d.end_reason(), Some(&first));
}

#[test]
fn feeding_while_output_is_pending_ends_the_stream() {
    let data = noise(8192, 7);
    let mut e = engine::compressor(&CompressOptions::default()).unwrap();
    let mut buf = [0u8; 8];
    let chunk = e.feed(&data, FlushMode::SyncFlush, &mut buf).unwrap();
    assert_eq!(chunk, Chunk::more(7));
    assert!(e.can_consume());

    let err = e.feed(b"more", FlushMode::NoFlush, &mut buf).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUsage);
    assert_eq!(err.root(), &Error::InvalidUsage(Misuse::OutputPending));
    assert!(e.is_ended());
    assert!(!e.can_consume());
}

#[test]
fn feeding_after_finish_is_rejected() {
    let data = noise(4096, 3);
    let mut e = engine::compressor(&CompressOptions::default()).unwrap();
    let mut buf = [0u8; 16];
    e.feed(&data, FlushMode::Finish, &mut buf).unwrap();
    let chunk = e.consume(&mut buf).unwrap();
    assert!(!chunk.end_of_stream);

    let err = e.feed(b"", FlushMode::NoFlush, &mut buf).unwrap_err();
    assert_eq!(err.root(), &Error::InvalidUsage(Misuse::FeedAfterFinish));
}

// ─────────────────────────────────────────────────────────────────────────────
// Decompression edge cases
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn bytes_after_the_stream_end_are_ignored() {
    let mut packed = compress(b"payload", 256);
    packed.extend_from_slice(b"trailing garbage");
    let mut d = engine::decompressor(&DecompressOptions::default()).unwrap();
    assert_eq!(run_to_end(&mut d, &packed, 256).unwrap(), b"payload");
}

#[test]
fn truncated_input_with_finish_is_fatal() {
    let packed = compress(&noise(2000, 11), 4096);
    let mut d = engine::decompressor(&DecompressOptions::default()).unwrap();
    let err = run_to_end(&mut d, &packed[..packed.len() / 2], 4096).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
}

#[test]
fn truncated_input_without_finish_just_needs_more() {
    let packed = compress(&noise(2000, 11), 4096);
    let mut d = engine::decompressor(&DecompressOptions::default()).unwrap();
    let mut buf = vec![0u8; 4096];
    let chunk = d
        .feed(&packed[..packed.len() / 2], FlushMode::NoFlush, &mut buf)
        .unwrap();
    assert!(!chunk.end_of_stream);
    assert!(!d.is_ended());
}

#[test]
fn missing_dictionary_is_reported() {
    let opts = CompressOptions::default().with_dictionary(Some(b"dictionary words".to_vec()));
    let mut c = engine::compressor(&opts).unwrap();
    let packed = run_to_end(&mut c, b"dictionary words, twice: dictionary words", 256).unwrap();

    let mut d = engine::decompressor(&DecompressOptions::default()).unwrap();
    let err = run_to_end(&mut d, &packed, 256).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NeedDictionary);
}

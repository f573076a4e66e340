// Tests for src/engine/guard.rs — degenerate output buffers against the real
// codec, in both directions.

use zflow::engine::{self, FeedConsume};
use zflow::error::{Error, Misuse};
use zflow::{CompressOptions, DecompressOptions, FlushMode};

/// Feed everything with `Finish` through `first_len`-byte output, then drain
/// through `drain_len`-byte buffers.
fn drive<E: FeedConsume>(e: &mut E, input: &[u8], first_len: usize, drain_len: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut first = vec![0u8; first_len];
    let mut chunk = e.feed(input, FlushMode::Finish, &mut first).unwrap();
    out.extend_from_slice(&first[..chunk.produced]);

    let mut buf = vec![0u8; drain_len];
    let mut steps = 0usize;
    while !chunk.end_of_stream {
        assert!(e.can_consume(), "stalled after {} bytes", out.len());
        chunk = e.consume(&mut buf).unwrap();
        out.extend_from_slice(&buf[..chunk.produced]);
        steps += 1;
        assert!(steps < 1_000_000, "runaway drain");
    }
    out
}

fn sample() -> Vec<u8> {
    b"Degenerate buffers must not lose or duplicate a single byte. "
        .iter()
        .cycle()
        .take(3000)
        .copied()
        .collect()
}

fn reference() -> Vec<u8> {
    let mut e = engine::compressor(&CompressOptions::default()).unwrap();
    drive(&mut e, &sample(), 1 << 16, 1 << 16)
}

#[test]
fn compress_through_every_small_size() {
    let want = reference();
    for len in [1usize, 2, 3] {
        let mut e = engine::compressor(&CompressOptions::default()).unwrap();
        assert_eq!(drive(&mut e, &sample(), len, len), want, "buffer length {len}");
    }
}

#[test]
fn decompress_through_every_small_size() {
    let packed = reference();
    for len in [1usize, 2, 3] {
        let mut d = engine::decompressor(&DecompressOptions::default()).unwrap();
        assert_eq!(drive(&mut d, &packed, len, len), sample(), "buffer length {len}");
    }
}

#[test]
fn zero_length_output_holds_its_byte() {
    let want = reference();
    let mut e = engine::compressor(&CompressOptions::default()).unwrap();
    let mut empty: [u8; 0] = [];
    let chunk = e.feed(&sample(), FlushMode::Finish, &mut empty).unwrap();
    assert_eq!(chunk.produced, 0);
    assert!(e.can_consume());
    // A zero-length consume keeps the byte too.
    assert_eq!(e.consume(&mut empty).unwrap().produced, 0);
    assert_eq!(drive_rest(&mut e, 1), want);
}

#[test]
fn zero_length_output_when_decompressing() {
    let packed = reference();
    let mut d = engine::decompressor(&DecompressOptions::default()).unwrap();
    let mut empty: [u8; 0] = [];
    d.feed(&packed, FlushMode::Finish, &mut empty).unwrap();
    assert_eq!(drive_rest(&mut d, 2), sample());
}

#[test]
fn feeding_over_a_held_byte_ends_the_stream() {
    let mut e = engine::compressor(&CompressOptions::default()).unwrap();
    e.feed(&sample(), FlushMode::SyncFlush, &mut []).unwrap();
    assert!(e.can_consume());

    let err = e.feed(b"more", FlushMode::NoFlush, &mut [0u8; 64]).unwrap_err();
    assert_eq!(err.root(), &Error::InvalidUsage(Misuse::OutputPending));
    assert!(e.is_ended());
    assert!(!e.can_consume());
    assert_eq!(e.consume(&mut [0u8; 64]).unwrap_err(), err);
}

fn drive_rest<E: FeedConsume>(e: &mut E, len: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; len];
    loop {
        assert!(e.can_consume(), "stalled after {} bytes", out.len());
        let chunk = e.consume(&mut buf).unwrap();
        out.extend_from_slice(&buf[..chunk.produced]);
        if chunk.end_of_stream {
            return out;
        }
    }
}

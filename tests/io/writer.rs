// Tests for src/io/writer.rs — the push adapter.

use std::io::{self, Write};

use zflow::io::{compress_writer, decompress_writer};
use zflow::{
    compress_to_vec, decompress_to_vec, CompressOptions, DecompressOptions, Error, ErrorKind,
    FeedConsume,
};

fn words(n: usize) -> Vec<u8> {
    (0..n)
        .flat_map(|i| format!("w{} ", i * 7919 % 1000).into_bytes())
        .collect()
}

#[test]
fn compress_writer_round_trips() {
    let data = words(3000);
    let mut w = compress_writer(Vec::new(), &CompressOptions::default()).unwrap();
    for piece in data.chunks(333) {
        w.write_all(piece).unwrap();
    }
    let packed = w.finish().unwrap();
    assert_eq!(decompress_to_vec(&packed, &DecompressOptions::default()).unwrap(), data);
}

#[test]
fn decompress_writer_round_trips() {
    let data = words(3000);
    let packed = compress_to_vec(&data, &CompressOptions::default()).unwrap();
    let mut w = decompress_writer(Vec::new(), &DecompressOptions::default()).unwrap();
    for piece in packed.chunks(10) {
        w.write_all(piece).unwrap();
    }
    assert_eq!(w.finish().unwrap(), data);
}

#[test]
fn sync_flush_makes_everything_so_far_decodable() {
    let first = words(200);
    let second = words(50);
    let mut w = compress_writer(Vec::new(), &CompressOptions::default()).unwrap();
    w.write_all(&first).unwrap();
    w.flush().unwrap();
    let boundary = w.get_ref().clone();

    // A decoder that has only seen bytes up to the flush recovers all of `first`.
    let mut d = decompress_writer(Vec::new(), &DecompressOptions::default()).unwrap();
    d.write_all(&boundary).unwrap();
    assert_eq!(d.get_ref(), &first);

    w.write_all(&second).unwrap();
    let packed = w.finish().unwrap();
    assert!(packed.starts_with(&boundary));

    let whole = [first, second].concat();
    assert_eq!(decompress_to_vec(&packed, &DecompressOptions::default()).unwrap(), whole);
}

#[test]
fn flush_does_not_end_the_stream() {
    let mut w = compress_writer(Vec::new(), &CompressOptions::default()).unwrap();
    w.write_all(b"abc").unwrap();
    w.flush().unwrap();
    w.flush().unwrap();
    assert!(!w.engine().is_ended());
    w.close().unwrap();
    assert!(w.engine().is_ended());
}

#[test]
fn closing_an_incomplete_decompression_fails() {
    let packed = compress_to_vec(&words(500), &CompressOptions::default()).unwrap();
    let mut w = decompress_writer(Vec::new(), &DecompressOptions::default()).unwrap();
    w.write_all(&packed[..packed.len() / 2]).unwrap();
    let err = w.close().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    let inner = err.get_ref().and_then(|e| e.downcast_ref::<Error>()).unwrap();
    assert_eq!(inner.kind(), ErrorKind::Data);
    // The same failure is reported again.
    assert_eq!(w.close().unwrap_err().kind(), io::ErrorKind::InvalidData);
}

#[test]
fn decompress_writer_stops_at_the_stream_end() {
    let mut packed = compress_to_vec(b"the end", &CompressOptions::default()).unwrap();
    packed.extend_from_slice(b"junk after the end");
    let mut w = decompress_writer(Vec::new(), &DecompressOptions::default()).unwrap();
    w.write_all(&packed).unwrap();
    assert!(w.engine().is_ended());
    assert_eq!(w.finish().unwrap(), b"the end");
}

#[test]
fn trailing_bytes_are_ignored_at_any_buffer_size() {
    let mut packed = compress_to_vec(b"the end", &CompressOptions::default()).unwrap();
    let stream_len = packed.len();
    packed.extend_from_slice(b"junk after the end");

    for buffer_size in [2, 4, 16, 24, 32, 1024] {
        let opts = DecompressOptions::default().with_buffer_size(buffer_size);

        let mut w = decompress_writer(Vec::new(), &opts).unwrap();
        w.write_all(&packed).unwrap();
        w.close().unwrap();
        assert_eq!(w.get_ref(), b"the end", "buffer size {buffer_size}");

        // Junk arriving in its own write after the stream has ended.
        let mut w = decompress_writer(Vec::new(), &opts).unwrap();
        w.write_all(&packed[..stream_len]).unwrap();
        w.write_all(&packed[stream_len..]).unwrap();
        assert_eq!(w.finish().unwrap(), b"the end", "buffer size {buffer_size}");
    }
}

#[test]
fn writes_after_close_are_rejected() {
    let mut w = compress_writer(Vec::new(), &CompressOptions::default()).unwrap();
    w.write_all(b"abc").unwrap();
    w.close().unwrap();
    let err = w.write(b"late").unwrap_err();
    let inner = err.get_ref().and_then(|e| e.downcast_ref::<Error>()).unwrap();
    assert_eq!(inner.kind(), ErrorKind::InvalidUsage);
}

#[test]
fn minimum_buffer_size_still_works() {
    let data = words(300);
    let opts = CompressOptions::default().with_buffer_size(2);
    let mut w = compress_writer(Vec::new(), &opts).unwrap();
    w.write_all(&data).unwrap();
    let packed = w.finish().unwrap();

    let dopts = DecompressOptions::matching(&opts);
    let mut d = decompress_writer(Vec::new(), &dopts).unwrap();
    d.write_all(&packed).unwrap();
    assert_eq!(d.finish().unwrap(), data);
}

// e2e/error_handling.rs — Error taxonomy and propagation through the public API.

use std::io::{self, Read, Write};

use zflow::engine::{self, FeedConsume};
use zflow::error::{Error, ErrorKind, Fault};
use zflow::io::{compress_writer, decompress_reader};
use zflow::{
    compress_to_vec, decompress_to_vec, CompressOptions, DecompressOptions, Direction, FlushMode,
    Header,
};

fn sample() -> Vec<u8> {
    b"error handling sample text ".repeat(100)
}

#[test]
fn invalid_options_are_config_errors() {
    let cases = [
        CompressOptions::default().with_level(11),
        CompressOptions::default().with_window_bits(7),
        CompressOptions::default().with_memory_level(10),
        CompressOptions::default().with_buffer_size(0),
        CompressOptions::default()
            .with_header(Header::Gzip)
            .with_dictionary(Some(b"d".to_vec())),
    ];
    for opts in cases {
        let err = engine::compressor(&opts).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config, "{opts:?}");
        assert!(compress_writer(Vec::new(), &opts).is_err());
    }
}

#[test]
fn io_conversion_maps_kinds() {
    let cases = [
        (Error::InvalidOption("x".into()), io::ErrorKind::InvalidInput),
        (
            Error::Codec {
                fault: Fault::Corrupt,
                direction: Direction::Decompress,
                status: zflow::Status::DataError,
            },
            io::ErrorKind::InvalidData,
        ),
        (
            Error::ShortWrite {
                expected: 2,
                written: 0,
            },
            io::ErrorKind::WriteZero,
        ),
        (Error::CloseIncomplete, io::ErrorKind::InvalidData),
    ];
    for (err, kind) in cases {
        assert_eq!(io::Error::from(err).kind(), kind);
    }
}

#[test]
fn wrong_framing_is_a_data_error() {
    let packed = compress_to_vec(&sample(), &CompressOptions::default()).unwrap();
    let gzip = DecompressOptions::default().with_header(Header::Gzip);
    assert_eq!(decompress_to_vec(&packed, &gzip).unwrap_err().kind(), ErrorKind::Data);
}

#[test]
fn wrong_dictionary_is_a_data_error() {
    let copts = CompressOptions::default().with_dictionary(Some(b"one dictionary".to_vec()));
    let packed = compress_to_vec(&sample(), &copts).unwrap();
    let dopts = DecompressOptions::default().with_dictionary(Some(b"another one".to_vec()));
    let err = decompress_to_vec(&packed, &dopts).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Data);
}

#[test]
fn errors_are_sticky_through_the_reader() {
    let mut packed = compress_to_vec(&sample(), &CompressOptions::default()).unwrap();
    packed.truncate(packed.len() - 3);
    let mut r = decompress_reader(&packed[..], &DecompressOptions::default()).unwrap();
    let mut sink = Vec::new();
    let first = r.read_to_end(&mut sink).unwrap_err();
    let second = r.read(&mut [0u8; 16]).unwrap_err();
    assert_eq!(first.kind(), second.kind());
    let a = first.get_ref().and_then(|e| e.downcast_ref::<Error>()).cloned();
    let b = second.get_ref().and_then(|e| e.downcast_ref::<Error>()).cloned();
    assert!(a.is_some());
    assert_eq!(a, b);
}

#[test]
fn ended_error_exposes_its_source() {
    let mut d = engine::decompressor(&DecompressOptions::default()).unwrap();
    let err = d
        .feed(b"\x78\x9c\xff\xff\xff\xff", FlushMode::Finish, &mut [0u8; 64])
        .unwrap_err();
    let source = std::error::Error::source(&err).map(|s| s.to_string());
    assert!(source.is_some_and(|s| s.contains("Z_DATA_ERROR")));
    assert_eq!(err.to_string(), "stream ended");
}

#[test]
fn writes_after_a_failure_fail() {
    let mut w = zflow::io::decompress_writer(Vec::new(), &DecompressOptions::default()).unwrap();
    assert!(w.write_all(b"garbage garbage garbage").is_err());
    assert!(w.write_all(b"more").is_err());
    assert!(w.flush().is_err());
    assert!(w.close().is_err());
}

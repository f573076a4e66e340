// e2e/interop.rs — Cross-implementation compatibility.
//
// flate2 (pure-Rust miniz_oxide backend) acts as the independent reference
// codec: it must decode what zflow produces, and zflow must decode what it
// produces, for all three framings.

use std::io::{Read, Write};

use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, GzEncoder, ZlibEncoder};
use flate2::Compression;

use zflow::io::{compress_writer, decompress_reader};
use zflow::{compress_to_vec, decompress_to_vec, CompressOptions, DecompressOptions, Header};

fn corpus() -> Vec<u8> {
    let mut data = Vec::new();
    for i in 0..2000u32 {
        data.extend_from_slice(format!("{i:05} interoperability record\n").as_bytes());
        data.extend_from_slice(&i.wrapping_mul(0x9E37_79B9).to_be_bytes());
    }
    data
}

fn reference_decode(header: Header, packed: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    match header {
        Header::Zlib => ZlibDecoder::new(packed).read_to_end(&mut out),
        Header::Raw => DeflateDecoder::new(packed).read_to_end(&mut out),
        Header::Gzip => GzDecoder::new(packed).read_to_end(&mut out),
    }
    .unwrap();
    out
}

fn reference_encode(header: Header, data: &[u8]) -> Vec<u8> {
    let level = Compression::new(6);
    match header {
        Header::Zlib => {
            let mut e = ZlibEncoder::new(Vec::new(), level);
            e.write_all(data).unwrap();
            e.finish().unwrap()
        }
        Header::Raw => {
            let mut e = DeflateEncoder::new(Vec::new(), level);
            e.write_all(data).unwrap();
            e.finish().unwrap()
        }
        Header::Gzip => {
            let mut e = GzEncoder::new(Vec::new(), level);
            e.write_all(data).unwrap();
            e.finish().unwrap()
        }
    }
}

#[test]
fn reference_decodes_our_output() {
    let data = corpus();
    for header in [Header::Zlib, Header::Raw, Header::Gzip] {
        for level in [0, 2, 9] {
            let opts = CompressOptions::default().with_header(header).with_level(level);
            let packed = compress_to_vec(&data, &opts).unwrap();
            assert_eq!(reference_decode(header, &packed), data, "{header:?} level {level}");
        }
    }
}

#[test]
fn we_decode_reference_output() {
    let data = corpus();
    for header in [Header::Zlib, Header::Raw, Header::Gzip] {
        let packed = reference_encode(header, &data);
        let opts = DecompressOptions::default().with_header(header);
        assert_eq!(decompress_to_vec(&packed, &opts).unwrap(), data, "{header:?}");

        let mut out = Vec::new();
        decompress_reader(&packed[..], &opts.clone().with_buffer_size(7))
            .unwrap()
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, data, "{header:?} through a small reader");
    }
}

#[test]
fn sync_flushed_stream_decodes_with_reference() {
    let data = corpus();
    let mut w = compress_writer(Vec::new(), &CompressOptions::default()).unwrap();
    for piece in data.chunks(4096) {
        w.write_all(piece).unwrap();
        w.flush().unwrap();
    }
    let packed = w.finish().unwrap();
    assert_eq!(reference_decode(Header::Zlib, &packed), data);
}

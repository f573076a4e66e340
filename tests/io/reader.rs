// Tests for src/io/reader.rs — the pull adapter.

use std::io::{self, Read};

use zflow::io::{compress_reader, decompress_reader};
use zflow::{
    compress_to_vec, decompress_to_vec, CompressOptions, DecompressOptions, Error, ErrorKind,
    FeedConsume,
};

/// Source that hands out at most `step` bytes per read and interrupts every
/// other call.
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
    calls: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls += 1;
        if self.calls % 2 == 0 {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "try again"));
        }
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Source that fails after yielding its data.
struct Failing<'a>(&'a [u8]);

impl Read for Failing<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.is_empty() {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "gone"));
        }
        let n = buf.len().min(self.0.len());
        buf[..n].copy_from_slice(&self.0[..n]);
        self.0 = &self.0[n..];
        Ok(n)
    }
}

fn text() -> Vec<u8> {
    (0..400)
        .flat_map(|i| format!("line {i}: the pull adapter reads in steps\n").into_bytes())
        .collect()
}

#[test]
fn compress_then_decompress_through_readers() {
    let data = text();
    let opts = CompressOptions::default().with_buffer_size(97);
    let mut packed = Vec::new();
    compress_reader(&data[..], &opts)
        .unwrap()
        .read_to_end(&mut packed)
        .unwrap();
    assert!(packed.len() < data.len());

    let mut plain = Vec::new();
    decompress_reader(&packed[..], &DecompressOptions::matching(&opts))
        .unwrap()
        .read_to_end(&mut plain)
        .unwrap();
    assert_eq!(plain, data);
}

#[test]
fn trickling_interrupted_source_is_handled() {
    let data = text();
    let packed = compress_to_vec(&data, &CompressOptions::default()).unwrap();
    let source = Trickle {
        data: &packed,
        step: 3,
        calls: 0,
    };
    let mut r = decompress_reader(source, &DecompressOptions::default()).unwrap();
    let mut plain = Vec::new();
    r.read_to_end(&mut plain).unwrap();
    assert_eq!(plain, data);
    assert!(r.get_ref().calls > 2);
}

#[test]
fn read_never_returns_zero_before_the_end() {
    let data = text();
    let mut r = compress_reader(&data[..], &CompressOptions::default()).unwrap();
    let mut buf = [0u8; 5];
    let mut packed = Vec::new();
    loop {
        let n = r.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        packed.extend_from_slice(&buf[..n]);
    }
    assert!(r.engine().is_ended());
    assert!(r.engine().end_reason().is_none());
    assert_eq!(decompress_to_vec(&packed, &DecompressOptions::default()).unwrap(), data);
}

#[test]
fn corrupt_input_surfaces_as_invalid_data() {
    let mut packed = compress_to_vec(&text(), &CompressOptions::default()).unwrap();
    let mid = packed.len() / 2;
    packed[mid] ^= 0xff;
    packed[mid + 1] ^= 0x55;
    let mut r = decompress_reader(&packed[..], &DecompressOptions::default()).unwrap();
    let mut sink = Vec::new();
    let err = r.read_to_end(&mut sink).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    let inner = err.get_ref().and_then(|e| e.downcast_ref::<Error>()).unwrap();
    assert_eq!(inner.kind(), ErrorKind::Data);
}

#[test]
fn truncated_input_is_an_error_not_eof() {
    let packed = compress_to_vec(&text(), &CompressOptions::default()).unwrap();
    let mut r = decompress_reader(&packed[..packed.len() - 6], &DecompressOptions::default()).unwrap();
    let mut sink = Vec::new();
    let err = r.read_to_end(&mut sink).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn source_errors_pass_through() {
    let mut r = compress_reader(Failing(b"abc"), &CompressOptions::default()).unwrap();
    let mut sink = Vec::new();
    let err = r.read_to_end(&mut sink).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
}

#[test]
fn empty_read_buffer_reads_nothing() {
    let mut r = compress_reader(&b"abc"[..], &CompressOptions::default()).unwrap();
    assert_eq!(r.read(&mut []).unwrap(), 0);
    let mut rest = Vec::new();
    r.read_to_end(&mut rest).unwrap();
    assert!(!rest.is_empty());
}

// Tests for src/io/pipe.rs — compressing and decompressing across threads
// with no intermediate buffer.

use std::io::{Read, Write};
use std::thread;

use zflow::io::{compress_reader, compress_writer, decompress_reader, decompress_writer, pipe};
use zflow::{CompressOptions, DecompressOptions};

fn payload() -> Vec<u8> {
    (0..5000u32)
        .flat_map(|i| (i.wrapping_mul(2654435761) >> 24).to_le_bytes())
        .chain(b"and a readable tail ".repeat(50))
        .collect()
}

#[test]
fn push_compress_into_pull_decompress_with_flushes() {
    let data = payload();
    let (pipe_r, pipe_w) = pipe();

    let to_send = data.clone();
    let producer = thread::spawn(move || {
        let mut w = compress_writer(pipe_w, &CompressOptions::default()).unwrap();
        for piece in to_send.chunks(2) {
            w.write_all(piece).unwrap();
            w.flush().unwrap();
        }
        w.finish().unwrap();
    });

    let mut r = decompress_reader(pipe_r, &DecompressOptions::default()).unwrap();
    let mut got = Vec::new();
    r.read_to_end(&mut got).unwrap();
    producer.join().unwrap();
    assert_eq!(got, data);
}

#[test]
fn pull_compress_into_push_decompress() {
    let data = payload();
    let (mut pipe_r, pipe_w) = pipe();

    let to_send = data.clone();
    let producer = thread::spawn(move || {
        let mut source = compress_reader(&to_send[..], &CompressOptions::default()).unwrap();
        let mut w = pipe_w;
        let mut buf = [0u8; 2];
        loop {
            let n = source.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            w.write_all(&buf[..n]).unwrap();
        }
    });

    let mut sink = decompress_writer(Vec::new(), &DecompressOptions::default()).unwrap();
    let mut buf = [0u8; 3];
    loop {
        let n = pipe_r.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        sink.write_all(&buf[..n]).unwrap();
        sink.flush().unwrap();
    }
    producer.join().unwrap();
    assert_eq!(sink.finish().unwrap(), data);
}

#[test]
fn small_buffers_on_both_ends() {
    let data = payload();
    let copts = CompressOptions::default().with_buffer_size(3).with_level(9);
    let dopts = DecompressOptions::matching(&copts);
    let (pipe_r, pipe_w) = pipe();

    let to_send = data.clone();
    let producer = thread::spawn(move || {
        let mut w = compress_writer(pipe_w, &copts).unwrap();
        w.write_all(&to_send).unwrap();
        w.finish().unwrap();
    });

    let mut got = Vec::new();
    decompress_reader(pipe_r, &dopts)
        .unwrap()
        .read_to_end(&mut got)
        .unwrap();
    producer.join().unwrap();
    assert_eq!(got, data);
}

#![no_main]
use std::io::{Read, Write};

use libfuzzer_sys::fuzz_target;
use zflow::{CompressOptions, DecompressOptions};

fuzz_target!(|data: &[u8]| {
    // The first byte picks the buffer size so tiny bounded buffers get covered.
    let Some((&knob, payload)) = data.split_first() else {
        return;
    };
    let buffer_size = 2 + usize::from(knob % 64);
    let copts = CompressOptions::default().with_buffer_size(buffer_size);
    let dopts = DecompressOptions::matching(&copts);

    let mut w = zflow::compress_writer(Vec::new(), &copts).unwrap();
    w.write_all(payload).unwrap();
    let packed = w.finish().unwrap();

    let mut r = zflow::decompress_reader(&packed[..], &dopts).unwrap();
    let mut recovered = Vec::new();
    r.read_to_end(&mut recovered).unwrap();

    assert_eq!(
        recovered,
        payload,
        "round-trip mismatch at buffer size {buffer_size}: {} bytes in, {} back",
        payload.len(),
        recovered.len()
    );
});

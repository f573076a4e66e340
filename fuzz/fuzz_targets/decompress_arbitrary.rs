#![no_main]
use libfuzzer_sys::fuzz_target;
use zflow::engine::{self, FeedConsume};
use zflow::{DecompressOptions, FlushMode, Header};

fuzz_target!(|data: &[u8]| {
    // Errors are expected; panics and runaway loops are not.
    for header in [Header::Zlib, Header::Raw, Header::Gzip] {
        let opts = DecompressOptions::default().with_header(header);
        let _ = zflow::decompress_to_vec(data, &opts);
    }

    // Drive the engine directly through a one-byte output window.
    let Ok(mut d) = engine::decompressor(&DecompressOptions::default()) else {
        return;
    };
    let mut out = [0u8; 1];
    let mut step = d.feed(data, FlushMode::Finish, &mut out);
    let mut rounds = 0usize;
    while let Ok(chunk) = step {
        if chunk.end_of_stream || !d.can_consume() {
            break;
        }
        rounds += 1;
        assert!(rounds <= 1 << 24, "consume did not converge");
        step = d.consume(&mut out);
    }
});

// zflow — feed/consume streaming engine for zlib.
//
// Layering, leaves first:
//   transform  codec primitive (system zlib through libz-sys)
//   engine     feed/consume state machine and bounded-output guard
//   io         Read/Write adapters, composite operations, in-memory pipe

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod options;
pub mod transform;
pub mod cli;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use engine::{Chunk, FeedConsume};
pub use error::{Error, ErrorKind, Result};
pub use io::{
    compress_reader, compress_to_vec, compress_writer, decompress_reader, decompress_to_vec,
    decompress_writer, pipe,
};
pub use options::{CompressOptions, DecompressOptions, Header, Strategy};
pub use transform::{Direction, FlushMode, Status};

/// Version string of the zlib the crate is linked against.
pub fn zlib_version() -> String {
    transform::zlib::zlib_version()
}

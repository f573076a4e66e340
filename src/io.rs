//! Byte-stream adapters around the feed/consume engine.
//!
//! The four composite operations are the crate's streaming surface:
//!
//! | | pull (`Read`) | push (`Write`) |
//! |---|---|---|
//! | compress | [`compress_reader`] | [`compress_writer`] |
//! | decompress | [`decompress_reader`] | [`decompress_writer`] |
//!
//! Each yields or accepts raw bytes with no framing beyond what the codec
//! itself emits. [`pipe`] connects a writer on one thread to a reader on
//! another without materialising the bytes in between.

pub mod pipe;
pub mod reader;
pub mod writer;

use std::io::{Read, Write};

pub use pipe::{pipe, PipeReader, PipeWriter};
pub use reader::FeedReader;
pub use writer::FeedWriter;

use crate::engine::{self, BoundedOutput, Engine, FeedConsume};
use crate::error::Error;
use crate::options::{CompressOptions, DecompressOptions};
use crate::transform::{Deflater, FlushMode, Inflater};

pub type Compressor = BoundedOutput<Engine<Deflater>>;
pub type Decompressor = BoundedOutput<Engine<Inflater>>;

pub type CompressReader<R> = FeedReader<R, Compressor>;
pub type DecompressReader<R> = FeedReader<R, Decompressor>;
pub type CompressWriter<W> = FeedWriter<W, Compressor>;
pub type DecompressWriter<W> = FeedWriter<W, Decompressor>;

// ── Composite operations ─────────────────────────────────────────────────────

/// Reading from the result yields the compressed form of `source`.
pub fn compress_reader<R: Read>(source: R, opts: &CompressOptions) -> Result<CompressReader<R>, Error> {
    Ok(FeedReader::new(source, engine::compressor(opts)?, opts.buffer_size))
}

/// Bytes written to the result reach `sink` compressed. Call
/// [`FeedWriter::finish`] or [`FeedWriter::close`] to write the terminator.
pub fn compress_writer<W: Write>(sink: W, opts: &CompressOptions) -> Result<CompressWriter<W>, Error> {
    Ok(FeedWriter::new(sink, engine::compressor(opts)?, opts.buffer_size))
}

/// Reading from the result yields the decompressed form of `source`.
pub fn decompress_reader<R: Read>(
    source: R,
    opts: &DecompressOptions,
) -> Result<DecompressReader<R>, Error> {
    Ok(FeedReader::new(source, engine::decompressor(opts)?, opts.buffer_size))
}

/// Compressed bytes written to the result reach `sink` decompressed.
pub fn decompress_writer<W: Write>(
    sink: W,
    opts: &DecompressOptions,
) -> Result<DecompressWriter<W>, Error> {
    Ok(FeedWriter::new(sink, engine::decompressor(opts)?, opts.buffer_size))
}

// ── One-shot helpers ─────────────────────────────────────────────────────────

/// Compress `data` in memory.
pub fn compress_to_vec(data: &[u8], opts: &CompressOptions) -> Result<Vec<u8>, Error> {
    let mut engine = engine::compressor(opts)?;
    drain_all(&mut engine, data, opts.buffer_size)
}

/// Decompress a complete stream held in memory.
pub fn decompress_to_vec(data: &[u8], opts: &DecompressOptions) -> Result<Vec<u8>, Error> {
    let mut engine = engine::decompressor(opts)?;
    drain_all(&mut engine, data, opts.buffer_size)
}

/// Feed `data` with `Finish` and consume until the stream ends.
fn drain_all<E: FeedConsume>(engine: &mut E, data: &[u8], buffer_size: usize) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; buffer_size.max(2)];
    let mut chunk = engine.feed(data, FlushMode::Finish, &mut buf)?;
    out.extend_from_slice(&buf[..chunk.produced]);
    while !chunk.end_of_stream {
        if !engine.can_consume() {
            return Err(Error::CloseIncomplete);
        }
        chunk = engine.consume(&mut buf)?;
        out.extend_from_slice(&buf[..chunk.produced]);
    }
    Ok(out)
}

// reader.rs — Pull adapter: a `Read` source run through a feed/consume engine.
//
// Each step either drains pending engine output or pulls one buffer's worth
// of bytes from the source and feeds it. Source EOF turns into a `Finish`
// flush. `read` repeats steps until it has bytes or the stream has ended,
// since `Ok(0)` from a `Read` means end of file.

use std::io::{self, Read};

use crate::engine::{Chunk, FeedConsume};
use crate::transform::FlushMode;

pub struct FeedReader<R, E> {
    source: R,
    engine: E,
    /// Staging buffer; one byte shorter than the configured buffer size.
    input: Vec<u8>,
    source_done: bool,
}

impl<R: Read, E: FeedConsume> FeedReader<R, E> {
    /// `buffer_size` must be at least 2; smaller values are raised to 2.
    pub fn new(source: R, engine: E, buffer_size: usize) -> Self {
        let capacity = buffer_size.max(2) - 1;
        FeedReader {
            source,
            engine,
            input: vec![0u8; capacity],
            source_done: false,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.source
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// One pull-adapter step into `out`.
    fn step(&mut self, out: &mut [u8]) -> io::Result<Chunk> {
        if self.engine.can_consume() || self.engine.is_ended() {
            return Ok(self.engine.consume(out)?);
        }

        let pulled = if self.source_done {
            0
        } else {
            loop {
                match self.source.read(&mut self.input) {
                    Ok(n) => break n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            }
        };
        let flush = if pulled == 0 {
            self.source_done = true;
            FlushMode::Finish
        } else {
            FlushMode::NoFlush
        };
        Ok(self.engine.feed(&self.input[..pulled], flush, out)?)
    }
}

impl<R: Read, E: FeedConsume> Read for FeedReader<R, E> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let chunk = self.step(buf)?;
            if chunk.produced > 0 || chunk.end_of_stream {
                return Ok(chunk.produced);
            }
        }
    }
}

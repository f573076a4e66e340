// writer.rs — Push adapter: a `Write` sink fed through a feed/consume engine.
//
// Every operation leaves the engine with nothing pending: produced bytes go
// straight to the sink, and the engine is drained with `consume` until it
// has no more to give. A sink that takes fewer bytes than offered is fatal.

use std::io::{self, Write};

use crate::engine::{Chunk, FeedConsume};
use crate::error::Error;
use crate::transform::FlushMode;

pub struct FeedWriter<W: Write, E> {
    sink: W,
    engine: E,
    output: Vec<u8>,
    /// Largest slice of caller input handed to one `feed`.
    chunk_size: usize,
    /// Set once the sink or a close fails; every later call repeats it.
    failure: Option<Error>,
    closed: bool,
}

impl<W: Write, E: FeedConsume> FeedWriter<W, E> {
    /// `buffer_size` must be at least 2; smaller values are raised to 2.
    pub fn new(sink: W, engine: E, buffer_size: usize) -> Self {
        let buffer_size = buffer_size.max(2);
        FeedWriter {
            sink,
            engine,
            output: vec![0u8; buffer_size],
            chunk_size: buffer_size - 1,
            failure: None,
            closed: false,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Finish the stream, flush the sink, and hand it back.
    pub fn finish(mut self) -> io::Result<W> {
        self.close()?;
        Ok(self.sink)
    }

    /// Write the terminator and drain everything. Calling it again is a no-op
    /// that repeats the outcome of the first close.
    pub fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        if let Some(outcome) = self.settled() {
            return outcome;
        }
        let mut last = self.feed(&[], FlushMode::Finish)?;
        if let Some(drained) = self.drain()? {
            last = drained;
        }
        if !last.end_of_stream {
            return Err(self.poison(Error::CloseIncomplete));
        }
        self.sink.flush()
    }

    /// Outcome to report when no further codec work may happen.
    fn settled(&self) -> Option<io::Result<()>> {
        if let Some(err) = &self.failure {
            return Some(Err(err.clone().into()));
        }
        if !self.engine.is_ended() {
            return None;
        }
        Some(match self.engine.end_reason() {
            Some(err) => Err(err.clone().into()),
            None => Ok(()),
        })
    }

    fn poison(&mut self, err: Error) -> io::Error {
        self.failure = Some(err.clone());
        err.into()
    }

    fn feed(&mut self, input: &[u8], flush: FlushMode) -> io::Result<Chunk> {
        let chunk = self.engine.feed(input, flush, &mut self.output)?;
        self.emit(chunk.produced)?;
        Ok(chunk)
    }

    /// Consume until the engine has nothing pending. Returns the last chunk
    /// drained, if any.
    fn drain(&mut self) -> io::Result<Option<Chunk>> {
        let mut last = None;
        while self.engine.can_consume() {
            let chunk = self.engine.consume(&mut self.output)?;
            self.emit(chunk.produced)?;
            last = Some(chunk);
        }
        Ok(last)
    }

    /// Hand `n` produced bytes to the sink in a single write.
    fn emit(&mut self, n: usize) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }
        let written = loop {
            match self.sink.write(&self.output[..n]) {
                Ok(written) => break written,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if written != n {
            return Err(self.poison(Error::ShortWrite {
                expected: n,
                written,
            }));
        }
        Ok(())
    }
}

impl<W: Write, E: FeedConsume> Write for FeedWriter<W, E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(err) = &self.failure {
            return Err(err.clone().into());
        }
        for chunk in buf.chunks(self.chunk_size) {
            // Bytes past the end of the stream are trailing data; accept and
            // drop them until the writer is closed.
            if !self.closed && self.engine.is_ended() && self.engine.end_reason().is_none() {
                break;
            }
            self.feed(chunk, FlushMode::NoFlush)?;
            self.drain()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(outcome) = self.settled() {
            return outcome;
        }
        self.feed(&[], FlushMode::SyncFlush)?;
        self.drain()?;
        self.sink.flush()
    }
}

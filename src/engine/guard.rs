// guard.rs — Bounded-output decorator.
//
// zlib leaves its output cursor one past the end of a buffer it fills
// completely. The guard never lends the wrapped engine the caller's last
// byte: buffers longer than one byte are shortened by one, and 0- or 1-byte
// buffers are served through a 2-byte scratch area instead.

use super::{Chunk, FeedConsume};
use crate::error::{Error, Misuse};
use crate::transform::FlushMode;

/// Wraps a [`FeedConsume`] engine and bounds every output view it sees.
pub struct BoundedOutput<E> {
    inner: E,
    /// Byte produced into scratch for a zero-length caller buffer, awaiting
    /// delivery by the next `consume`.
    spill: Option<u8>,
}

impl<E: FeedConsume> BoundedOutput<E> {
    pub fn new(inner: E) -> Self {
        BoundedOutput { inner, spill: None }
    }

    pub fn get_ref(&self) -> &E {
        &self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    fn bounded<F>(&mut self, output: &mut [u8], step: F) -> Result<Chunk, Error>
    where
        F: FnOnce(&mut E, &mut [u8]) -> Result<Chunk, Error>,
    {
        let len = output.len();
        if len > 1 {
            return step(&mut self.inner, &mut output[..len - 1]);
        }

        let mut scratch = [0u8; 2];
        let chunk = step(&mut self.inner, &mut scratch[..1])?;
        if chunk.produced == 0 {
            return Ok(chunk);
        }
        if len == 1 {
            output[0] = scratch[0];
            return Ok(chunk);
        }
        self.spill = Some(scratch[0]);
        Ok(Chunk::more(0))
    }
}

impl<E: FeedConsume> FeedConsume for BoundedOutput<E> {
    fn feed(&mut self, input: &[u8], flush: FlushMode, output: &mut [u8]) -> Result<Chunk, Error> {
        if self.spill.take().is_some() {
            return Err(self.inner.abort(Error::InvalidUsage(Misuse::OutputPending)));
        }
        self.bounded(output, |inner, view| inner.feed(input, flush, view))
    }

    fn consume(&mut self, output: &mut [u8]) -> Result<Chunk, Error> {
        if let Some(byte) = self.spill {
            let Some(first) = output.first_mut() else {
                return Ok(Chunk::more(0));
            };
            *first = byte;
            self.spill = None;
            return Ok(Chunk {
                produced: 1,
                end_of_stream: self.inner.is_ended() && self.inner.end_reason().is_none(),
            });
        }
        self.bounded(output, |inner, view| inner.consume(view))
    }

    fn can_consume(&self) -> bool {
        self.spill.is_some() || self.inner.can_consume()
    }

    fn is_ended(&self) -> bool {
        self.inner.is_ended()
    }

    fn end_reason(&self) -> Option<&Error> {
        self.inner.end_reason()
    }

    fn abort(&mut self, reason: Error) -> Error {
        self.spill = None;
        self.inner.abort(reason)
    }
}

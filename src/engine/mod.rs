//! Feed/consume stream engine.
//!
//! An [`Engine`] drives one [`Transform`] across caller-supplied output
//! buffers. Callers alternate between two calls:
//!
//! * [`FeedConsume::feed`] hands the engine new input together with a flush
//!   mode and runs the transform once;
//! * [`FeedConsume::consume`] drains output the previous call could not fit.
//!
//! While [`FeedConsume::can_consume`] is true the caller must consume before
//! feeding again. The stream ends exactly once, either cleanly (a chunk with
//! `end_of_stream` set) or with an error that every later call repeats.
//!
//! [`BoundedOutput`] decorates an engine so the transform never sees the
//! caller's buffer as exactly full at its true end; the constructors below
//! always return guarded engines.

mod classify;
mod guard;
mod stream;

pub use classify::{classify, Verdict};
pub use guard::BoundedOutput;
pub use stream::Engine;

use crate::error::Error;
use crate::options::{CompressOptions, DecompressOptions};
use crate::transform::{Deflater, FlushMode, Inflater, Transform};

/// Result of one `feed` or `consume` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Chunk {
    /// Bytes written to the front of the output buffer.
    pub produced: usize,
    /// The stream has ended cleanly; no further output will follow.
    pub end_of_stream: bool,
}

impl Chunk {
    pub const fn more(produced: usize) -> Self {
        Chunk {
            produced,
            end_of_stream: false,
        }
    }

    pub const fn last(produced: usize) -> Self {
        Chunk {
            produced,
            end_of_stream: true,
        }
    }
}

/// The feed/consume protocol shared by the engine and its decorators.
pub trait FeedConsume {
    /// Run the transform over `input`, writing into `output`.
    ///
    /// When this call ends the stream and releasing the codec fails, the
    /// call returns the release error and whatever it wrote into `output`
    /// is not counted.
    fn feed(&mut self, input: &[u8], flush: FlushMode, output: &mut [u8]) -> Result<Chunk, Error>;

    /// Drain output left over from the previous call. Returns zero bytes
    /// when nothing is pending.
    fn consume(&mut self, output: &mut [u8]) -> Result<Chunk, Error>;

    /// Output is waiting; `consume` must be called before the next `feed`.
    fn can_consume(&self) -> bool;

    fn is_ended(&self) -> bool;

    /// The error every later call reports, or `None` after a clean end.
    fn end_reason(&self) -> Option<&Error>;

    /// End the stream because of `reason` and return the error later calls
    /// will report. On a stream that has already ended this changes nothing.
    fn abort(&mut self, reason: Error) -> Error;
}

impl<E: FeedConsume + ?Sized> FeedConsume for Box<E> {
    fn feed(&mut self, input: &[u8], flush: FlushMode, output: &mut [u8]) -> Result<Chunk, Error> {
        (**self).feed(input, flush, output)
    }

    fn consume(&mut self, output: &mut [u8]) -> Result<Chunk, Error> {
        (**self).consume(output)
    }

    fn can_consume(&self) -> bool {
        (**self).can_consume()
    }

    fn is_ended(&self) -> bool {
        (**self).is_ended()
    }

    fn end_reason(&self) -> Option<&Error> {
        (**self).end_reason()
    }

    fn abort(&mut self, reason: Error) -> Error {
        (**self).abort(reason)
    }
}

/// Guarded engine over any transform.
pub fn guarded<T: Transform>(transform: T) -> BoundedOutput<Engine<T>> {
    BoundedOutput::new(Engine::new(transform))
}

/// Guarded compressing engine.
pub fn compressor(opts: &CompressOptions) -> Result<BoundedOutput<Engine<Deflater>>, Error> {
    Ok(guarded(Deflater::new(opts)?))
}

/// Guarded decompressing engine.
pub fn decompressor(opts: &DecompressOptions) -> Result<BoundedOutput<Engine<Inflater>>, Error> {
    Ok(guarded(Inflater::new(opts)?))
}

//! The codec primitive driven by the stream engine.
//!
//! A [`Transform`] wraps one direction of the codec and operates on bounded
//! input and output spans. The engine in [`crate::engine`] never looks inside
//! it; everything it needs comes back in a [`Progress`] value.
//!
//! [`zlib`] provides the two implementations backed by the system zlib.

use core::fmt;

pub mod zlib;

pub use zlib::{Deflater, Inflater};

/// Which way a transform moves data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Compress,
    Decompress,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Compress => "compression",
            Direction::Decompress => "decompression",
        })
    }
}

/// How aggressively buffered output must be forced out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FlushMode {
    /// Transform as much as possible; no boundary is forced.
    #[default]
    NoFlush,
    /// Emit everything buffered so far on a byte boundary without ending the
    /// stream. A decoder that has seen everything up to this point can
    /// reproduce all input fed before it.
    SyncFlush,
    /// No more input will ever arrive; emit the terminator and end.
    Finish,
}

impl fmt::Display for FlushMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlushMode::NoFlush => "no-flush",
            FlushMode::SyncFlush => "sync-flush",
            FlushMode::Finish => "finish",
        })
    }
}

/// Status vocabulary reported by a transform call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    StreamEnd,
    NeedDict,
    DataError,
    MemError,
    BufError,
    StreamError,
    VersionError,
    Errno,
    /// A code outside the documented vocabulary.
    Unknown(i32),
}

impl Status {
    /// Name as used by zlib's own documentation (`Z_OK`, `Z_STREAM_END`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Status::Ok => "Z_OK",
            Status::StreamEnd => "Z_STREAM_END",
            Status::NeedDict => "Z_NEED_DICT",
            Status::DataError => "Z_DATA_ERROR",
            Status::MemError => "Z_MEM_ERROR",
            Status::BufError => "Z_BUF_ERROR",
            Status::StreamError => "Z_STREAM_ERROR",
            Status::VersionError => "Z_VERSION_ERROR",
            Status::Errno => "Z_ERRNO",
            Status::Unknown(_) => "Z_UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Unknown(code) => write!(f, "unknown status {code}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Outcome of a single [`Transform::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub status: Status,
    /// Bytes taken from the front of the input span.
    pub consumed: usize,
    /// Bytes written to the front of the output span.
    pub produced: usize,
}

/// One direction of a stateful block codec.
///
/// Buffers are borrowed for the duration of a single `run` call; an
/// implementation must not keep any reference to them once the call returns.
/// `end` releases the codec state. It is called at most once by the engine;
/// implementations release on `Drop` when it never was.
pub trait Transform {
    fn direction(&self) -> Direction;

    /// Advance the codec over `input`, writing into `output`.
    fn run(&mut self, input: &[u8], output: &mut [u8], flush: FlushMode) -> Progress;

    /// Install a preset dictionary.
    fn set_dictionary(&mut self, dictionary: &[u8]) -> Status;

    /// Release codec resources. The transform is unusable afterwards.
    fn end(&mut self) -> Status;
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn direction(&self) -> Direction {
        (**self).direction()
    }

    fn run(&mut self, input: &[u8], output: &mut [u8], flush: FlushMode) -> Progress {
        (**self).run(input, output, flush)
    }

    fn set_dictionary(&mut self, dictionary: &[u8]) -> Status {
        (**self).set_dictionary(dictionary)
    }

    fn end(&mut self) -> Status {
        (**self).end()
    }
}

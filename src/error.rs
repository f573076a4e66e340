//! Error types for streaming compression.
//!
//! Every failure the engine can report is a value of [`Error`]. Errors are
//! `Clone` because an ended stream keeps returning the error that ended it.

use std::io;

use thiserror::Error;

use crate::transform::{Direction, Status};

/// Result type alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Caller-side protocol violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Misuse {
    /// `feed` while a previous call still has output waiting for `consume`.
    OutputPending,
    /// `feed` after a `Finish` flush was requested.
    FeedAfterFinish,
    /// `feed` on a stream that has already ended.
    FeedAfterEnd,
    /// `feed` with an output span of length zero.
    EmptyOutput,
}

impl std::fmt::Display for Misuse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Misuse::OutputPending => "output pending; consume it before feeding again",
            Misuse::FeedAfterFinish => "feed after finish was requested",
            Misuse::FeedAfterEnd => "feed after the stream ended",
            Misuse::EmptyOutput => "output buffer is empty",
        })
    }
}

/// What went wrong inside the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    /// The codec reported its own state as inconsistent.
    StreamState,
    /// Compression returned with output space left but input unread.
    TrailingInput,
    /// A finish request did not produce the end of the stream.
    Unfinished,
    /// Compressed input is malformed or continues past the stream end.
    Corrupt,
    /// Compressed input stopped before the end of the stream.
    Truncated,
    /// The stream was compressed against a dictionary that was not supplied.
    NeedDictionary,
    Memory,
    /// A status that has no meaning at this point of the stream.
    UnexpectedStatus,
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Fault::StreamState => "inconsistent stream state",
            Fault::TrailingInput => "input left unconsumed",
            Fault::Unfinished => "stream did not finish",
            Fault::Corrupt => "corrupt input",
            Fault::Truncated => "truncated input",
            Fault::NeedDictionary => "preset dictionary required",
            Fault::Memory => "out of memory",
            Fault::UnexpectedStatus => "unexpected status",
        })
    }
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidUsage,
    StreamState,
    Data,
    NeedDictionary,
    Memory,
    ShortWrite,
    Config,
    Release,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid usage: {0}")]
    InvalidUsage(Misuse),

    #[error("{direction} failed: {fault} ({status})")]
    Codec {
        fault: Fault,
        direction: Direction,
        status: Status,
    },

    #[error("{direction} initialisation failed ({status})")]
    Init { direction: Direction, status: Status },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("short write: {written} of {expected} bytes accepted by the sink")]
    ShortWrite { expected: usize, written: usize },

    #[error("stream closed before the compressor finished")]
    CloseIncomplete,

    #[error("releasing {direction} state failed ({status})")]
    Release { direction: Direction, status: Status },

    /// The stream ended because of `reason`; releasing the codec reported
    /// `release`.
    #[error("stream ended{}", release_note(.release))]
    Ended {
        #[source]
        reason: Box<Error>,
        release: Status,
    },
}

/// Suffix naming a failed release; empty when the codec released cleanly.
fn release_note(release: &Status) -> String {
    match release {
        Status::Ok => String::new(),
        status => format!(" (release failed: {status})"),
    }
}

impl Error {
    pub(crate) fn codec(fault: Fault, direction: Direction, status: Status) -> Self {
        Error::Codec {
            fault,
            direction,
            status,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUsage(_) => ErrorKind::InvalidUsage,
            Error::Codec { fault, .. } => match fault {
                Fault::StreamState => ErrorKind::StreamState,
                Fault::NeedDictionary => ErrorKind::NeedDictionary,
                Fault::Memory => ErrorKind::Memory,
                Fault::TrailingInput
                | Fault::Unfinished
                | Fault::Corrupt
                | Fault::Truncated
                | Fault::UnexpectedStatus => ErrorKind::Data,
            },
            Error::Init { status, .. } => match status {
                Status::MemError => ErrorKind::Memory,
                _ => ErrorKind::Config,
            },
            Error::InvalidOption(_) => ErrorKind::Config,
            Error::ShortWrite { .. } => ErrorKind::ShortWrite,
            Error::CloseIncomplete => ErrorKind::Data,
            Error::Release { .. } => ErrorKind::Release,
            Error::Ended { reason, .. } => reason.kind(),
        }
    }

    /// The error that ended the stream, looking through [`Error::Ended`].
    pub fn root(&self) -> &Error {
        match self {
            Error::Ended { reason, .. } => reason.root(),
            other => other,
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err.kind() {
            ErrorKind::InvalidUsage | ErrorKind::Config => io::ErrorKind::InvalidInput,
            ErrorKind::Data | ErrorKind::NeedDictionary => io::ErrorKind::InvalidData,
            ErrorKind::Memory => io::ErrorKind::OutOfMemory,
            ErrorKind::ShortWrite => io::ErrorKind::WriteZero,
            ErrorKind::StreamState | ErrorKind::Release => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

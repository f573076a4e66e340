// classify.rs — Decide what a transform call means for the stream.
//
// Pure function of the call's observable outcome. The engine acts on the
// verdict; nothing here touches codec state.

use crate::error::{Error, Fault};
use crate::transform::{Direction, FlushMode, Status};

/// What the engine does after a transform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Output was filled; more may be waiting. Call `consume`.
    Pending,
    /// Everything available has been processed. Call `feed`.
    NeedInput,
    /// The stream reached its end.
    Finished,
    /// The stream failed and must end.
    Fatal(Error),
}

/// Classify one transform call.
///
/// `output_full` is true when the call filled the whole output span;
/// `residual_input` is the number of input bytes it left unread.
pub fn classify(
    direction: Direction,
    status: Status,
    output_full: bool,
    residual_input: usize,
    flush: FlushMode,
) -> Verdict {
    let fatal = |fault| Verdict::Fatal(Error::codec(fault, direction, status));

    if status == Status::StreamError {
        return fatal(Fault::StreamState);
    }
    if direction == Direction::Decompress {
        match status {
            Status::DataError => return fatal(Fault::Corrupt),
            Status::NeedDict => return fatal(Fault::NeedDictionary),
            Status::MemError => return fatal(Fault::Memory),
            _ => {}
        }
    }

    if output_full {
        return match direction {
            Direction::Compress => Verdict::Pending,
            Direction::Decompress => match status {
                // Output ran out before the codec could say more. Provisional.
                Status::Ok | Status::BufError | Status::StreamEnd => Verdict::Pending,
                _ => fatal(Fault::UnexpectedStatus),
            },
        };
    }

    match direction {
        Direction::Compress => {
            if residual_input > 0 {
                fatal(Fault::TrailingInput)
            } else if flush == FlushMode::Finish {
                if status == Status::StreamEnd {
                    Verdict::Finished
                } else {
                    fatal(Fault::Unfinished)
                }
            } else {
                Verdict::NeedInput
            }
        }
        Direction::Decompress => {
            if residual_input > 0 {
                // Bytes after the end of the stream are tolerated; unread
                // bytes mid-stream with output space to spare are not.
                if status == Status::StreamEnd {
                    Verdict::Finished
                } else {
                    fatal(Fault::Corrupt)
                }
            } else if status == Status::StreamEnd {
                Verdict::Finished
            } else if flush == FlushMode::Finish {
                fatal(Fault::Truncated)
            } else {
                Verdict::NeedInput
            }
        }
    }
}

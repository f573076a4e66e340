// stream.rs — The feed/consume state machine over a single transform.
//
// The engine owns a copy of whatever input the transform could not take in
// the call that filled the output buffer. `consume` keeps driving the
// transform from that backlog, so no borrow of a caller buffer outlives the
// call that lent it.

use super::classify::{classify, Verdict};
use super::{Chunk, FeedConsume};
use crate::error::{Error, Misuse};
use crate::transform::{Direction, FlushMode, Progress, Status, Transform};

/// Stream engine driving one transform.
pub struct Engine<T: Transform> {
    transform: T,
    direction: Direction,
    last_flush: FlushMode,
    /// The last run filled its output buffer.
    pending_output: bool,
    backlog: Vec<u8>,
    backlog_pos: usize,
    ended: bool,
    end_reason: Option<Error>,
    end_error: Option<Error>,
}

impl<T: Transform> Engine<T> {
    pub fn new(transform: T) -> Self {
        let direction = transform.direction();
        Engine {
            transform,
            direction,
            last_flush: FlushMode::NoFlush,
            pending_output: false,
            backlog: Vec::new(),
            backlog_pos: 0,
            ended: false,
            end_reason: None,
            end_error: None,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn last_flush(&self) -> FlushMode {
        self.last_flush
    }

    /// Why the stream ended, without the release annotation.
    pub fn cause(&self) -> Option<&Error> {
        self.end_reason.as_ref()
    }

    fn settle(&mut self, progress: Progress, out_len: usize, residual: usize) -> Result<Chunk, Error> {
        self.pending_output = progress.produced == out_len;
        log::trace!(
            "{} {}: status={} consumed={} produced={} pending={} residual={}",
            self.direction,
            self.last_flush,
            progress.status,
            progress.consumed,
            progress.produced,
            self.pending_output,
            residual
        );

        match classify(
            self.direction,
            progress.status,
            self.pending_output,
            residual,
            self.last_flush,
        ) {
            Verdict::Pending => Ok(Chunk::more(progress.produced)),
            Verdict::NeedInput => {
                self.backlog.clear();
                self.backlog_pos = 0;
                Ok(Chunk::more(progress.produced))
            }
            Verdict::Finished => {
                self.end_stream(None);
                match &self.end_error {
                    Some(err) => {
                        log::debug!(
                            "{} final {} byte(s) withheld: {err}",
                            self.direction,
                            progress.produced
                        );
                        Err(err.clone())
                    }
                    None => Ok(Chunk::last(progress.produced)),
                }
            }
            Verdict::Fatal(reason) => Err(self.fail(reason)),
        }
    }

    /// End the stream because of `reason` and return the error later calls
    /// will repeat.
    fn fail(&mut self, reason: Error) -> Error {
        self.end_stream(Some(reason.clone()));
        self.end_error.clone().unwrap_or(reason)
    }

    fn end_stream(&mut self, reason: Option<Error>) {
        if self.ended {
            return;
        }
        let release = self.transform.end();
        self.ended = true;
        self.pending_output = false;
        self.backlog = Vec::new();
        self.backlog_pos = 0;

        self.end_error = match &reason {
            Some(cause) => Some(Error::Ended {
                reason: Box::new(cause.clone()),
                release,
            }),
            None if release != Status::Ok => Some(Error::Release {
                direction: self.direction,
                status: release,
            }),
            None => None,
        };
        match &reason {
            Some(cause) => log::debug!("{} stream failed: {cause} (release {release})", self.direction),
            None => log::debug!("{} stream ended (release {release})", self.direction),
        }
        self.end_reason = reason;
    }
}

impl<T: Transform> FeedConsume for Engine<T> {
    fn feed(&mut self, input: &[u8], flush: FlushMode, output: &mut [u8]) -> Result<Chunk, Error> {
        if self.ended {
            return Err(self
                .end_error
                .clone()
                .unwrap_or(Error::InvalidUsage(Misuse::FeedAfterEnd)));
        }
        let misuse = if self.last_flush == FlushMode::Finish {
            Some(Misuse::FeedAfterFinish)
        } else if self.pending_output {
            Some(Misuse::OutputPending)
        } else if output.is_empty() {
            Some(Misuse::EmptyOutput)
        } else {
            None
        };
        if let Some(misuse) = misuse {
            return Err(self.fail(Error::InvalidUsage(misuse)));
        }

        self.last_flush = flush;
        let progress = self.transform.run(input, output, flush);
        let consumed = progress.consumed.min(input.len());
        let residual = input.len() - consumed;
        if residual > 0 && progress.produced == output.len() {
            self.backlog.clear();
            self.backlog.extend_from_slice(&input[consumed..]);
            self.backlog_pos = 0;
        }
        self.settle(progress, output.len(), residual)
    }

    fn consume(&mut self, output: &mut [u8]) -> Result<Chunk, Error> {
        if self.ended {
            return match &self.end_error {
                Some(err) => Err(err.clone()),
                None => Ok(Chunk::last(0)),
            };
        }
        if !self.pending_output || output.is_empty() {
            return Ok(Chunk::more(0));
        }

        let progress = self
            .transform
            .run(&self.backlog[self.backlog_pos..], output, self.last_flush);
        self.backlog_pos = (self.backlog_pos + progress.consumed).min(self.backlog.len());
        let residual = self.backlog.len() - self.backlog_pos;
        self.settle(progress, output.len(), residual)
    }

    fn can_consume(&self) -> bool {
        !self.ended && self.pending_output
    }

    fn is_ended(&self) -> bool {
        self.ended
    }

    fn end_reason(&self) -> Option<&Error> {
        self.end_error.as_ref()
    }

    fn abort(&mut self, reason: Error) -> Error {
        self.fail(reason)
    }
}

impl<T: Transform> Drop for Engine<T> {
    fn drop(&mut self) {
        if !self.ended {
            let status = self.transform.end();
            log::debug!("{} stream abandoned (release {status})", self.direction);
        }
    }
}

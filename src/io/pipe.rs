//! Synchronous in-memory byte pipe.
//!
//! Connects a writer on one thread to a reader on another with no buffering
//! in between: [`PipeWriter::write`] returns only once the paired
//! [`PipeReader`] has taken every byte it was given. Rendezvous semantics
//! come from zero-capacity `crossbeam_channel` channels, one carrying data
//! and one carrying the reader's acknowledgement.
//!
//! Dropping the writer is end of file for the reader. Dropping the reader
//! makes pending and later writes fail with `BrokenPipe`.

use std::io::{self, Read, Write};

use crossbeam_channel::{bounded, Receiver, Sender};

/// Create a connected reader/writer pair.
pub fn pipe() -> (PipeReader, PipeWriter) {
    let (data_tx, data_rx) = bounded::<Vec<u8>>(0);
    let (ack_tx, ack_rx) = bounded::<()>(0);
    (
        PipeReader {
            data: data_rx,
            ack: ack_tx,
            current: Vec::new(),
            pos: 0,
        },
        PipeWriter {
            data: data_tx,
            ack: ack_rx,
        },
    )
}

/// Writing half of a [`pipe`].
pub struct PipeWriter {
    data: Sender<Vec<u8>>,
    ack: Receiver<()>,
}

/// Reading half of a [`pipe`].
pub struct PipeReader {
    data: Receiver<Vec<u8>>,
    ack: Sender<()>,
    current: Vec<u8>,
    pos: usize,
}

fn broken_pipe() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "pipe reader closed")
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.data.send(buf.to_vec()).map_err(|_| broken_pipe())?;
        self.ack.recv().map_err(|_| broken_pipe())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.pos == self.current.len() {
            match self.data.recv() {
                Ok(chunk) => {
                    self.current = chunk;
                    self.pos = 0;
                }
                // Writer gone: end of file.
                Err(_) => return Ok(0),
            }
        }

        let n = buf.len().min(self.current.len() - self.pos);
        buf[..n].copy_from_slice(&self.current[self.pos..self.pos + n]);
        self.pos += n;
        if self.pos == self.current.len() {
            // A writer that has since gone away no longer needs the ack.
            let _ = self.ack.send(());
        }
        Ok(n)
    }
}

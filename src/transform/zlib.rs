//! Deflate and inflate transforms over the system zlib (`libz-sys`).
//!
//! Each transform owns a heap-pinned `z_stream`; zlib keeps a back-pointer
//! to it inside its private state, so the struct must never move once
//! initialised. Input and output spans are attached for exactly one call
//! and detached again before `run` returns.

use std::ffi::CStr;
use std::ptr;

use libc::{c_int, c_void};
use libz_sys as z;

use super::{Direction, FlushMode, Progress, Status, Transform};
use crate::error::Error;
use crate::options::{CompressOptions, DecompressOptions, Header};

// ─────────────────────────────────────────────────────────────────────────────
// Allocator hooks and status mapping
// ─────────────────────────────────────────────────────────────────────────────

unsafe extern "C" fn zalloc(_opaque: z::voidpf, items: z::uInt, size: z::uInt) -> z::voidpf {
    libc::calloc(items as libc::size_t, size as libc::size_t) as z::voidpf
}

unsafe extern "C" fn zfree(_opaque: z::voidpf, address: z::voidpf) {
    libc::free(address as *mut c_void)
}

pub(crate) fn status_of(code: c_int) -> Status {
    match code {
        z::Z_OK => Status::Ok,
        z::Z_STREAM_END => Status::StreamEnd,
        z::Z_NEED_DICT => Status::NeedDict,
        z::Z_DATA_ERROR => Status::DataError,
        z::Z_MEM_ERROR => Status::MemError,
        z::Z_BUF_ERROR => Status::BufError,
        z::Z_STREAM_ERROR => Status::StreamError,
        z::Z_VERSION_ERROR => Status::VersionError,
        z::Z_ERRNO => Status::Errno,
        other => Status::Unknown(other),
    }
}

fn flush_code(flush: FlushMode) -> c_int {
    match flush {
        FlushMode::NoFlush => z::Z_NO_FLUSH,
        FlushMode::SyncFlush => z::Z_SYNC_FLUSH,
        FlushMode::Finish => z::Z_FINISH,
    }
}

/// Largest span a single zlib call can describe.
const CALL_LIMIT: usize = z::uInt::MAX as usize;

/// Length clamped to `limit`, which never exceeds [`CALL_LIMIT`].
#[inline]
fn clamp_len(len: usize, limit: usize) -> z::uInt {
    len.min(limit) as z::uInt
}

/// Version string of the linked zlib.
pub fn zlib_version() -> String {
    // SAFETY: zlibVersion returns a pointer to a static NUL-terminated string.
    unsafe { CStr::from_ptr(z::zlibVersion()) }
        .to_string_lossy()
        .into_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared stream state
// ─────────────────────────────────────────────────────────────────────────────

struct RawStream {
    strm: Box<z::z_stream>,
    direction: Direction,
    released: bool,
    /// Span handed to one zlib call; larger spans are split.
    call_limit: usize,
}

impl RawStream {
    fn new(direction: Direction) -> Self {
        let strm = Box::new(z::z_stream {
            next_in: ptr::null_mut(),
            avail_in: 0,
            total_in: 0,
            next_out: ptr::null_mut(),
            avail_out: 0,
            total_out: 0,
            msg: ptr::null_mut(),
            state: ptr::null_mut(),
            zalloc,
            zfree,
            opaque: ptr::null_mut(),
            data_type: 0,
            adler: 0,
            reserved: 0,
        });
        RawStream {
            strm,
            direction,
            released: false,
            call_limit: CALL_LIMIT,
        }
    }

    fn as_ptr(&mut self) -> z::z_streamp {
        &mut *self.strm
    }

    /// Message zlib attached to the last failure, if any.
    fn message(&self) -> Option<String> {
        if self.strm.msg.is_null() {
            return None;
        }
        // SAFETY: zlib only ever stores pointers to static strings in `msg`.
        Some(
            unsafe { CStr::from_ptr(self.strm.msg) }
                .to_string_lossy()
                .into_owned(),
        )
    }

    /// Run zlib over the whole of `input` and `output`, splitting spans
    /// longer than one call can describe. Input held back by the split is
    /// passed with `NoFlush` so a `Finish` only applies to the final part.
    fn step(&mut self, input: &[u8], output: &mut [u8], flush: FlushMode) -> Progress {
        let limit = self.call_limit;
        let mut total = Progress {
            status: Status::Ok,
            consumed: 0,
            produced: 0,
        };
        loop {
            let rest_in = &input[total.consumed..];
            let rest_out = &mut output[total.produced..];
            let in_split = rest_in.len() > limit;
            let out_split = rest_out.len() > limit;
            let call_flush = if in_split { FlushMode::NoFlush } else { flush };

            let p = self.call(rest_in, rest_out, call_flush);
            total.status = p.status;
            total.consumed += p.consumed;
            total.produced += p.produced;

            let stopped_by_split = (in_split && p.consumed == limit) || (out_split && p.produced == limit);
            if total.status != Status::Ok || !stopped_by_split || total.produced == output.len() {
                return total;
            }
        }
    }

    fn call(&mut self, input: &[u8], output: &mut [u8], flush: FlushMode) -> Progress {
        if self.released {
            return Progress {
                status: Status::StreamError,
                consumed: 0,
                produced: 0,
            };
        }

        let avail_in = clamp_len(input.len(), self.call_limit);
        let avail_out = clamp_len(output.len(), self.call_limit);
        self.strm.next_in = input.as_ptr() as *mut z::Bytef;
        self.strm.avail_in = avail_in;
        self.strm.next_out = output.as_mut_ptr();
        self.strm.avail_out = avail_out;

        let strm = self.as_ptr();
        // SAFETY: the stream was initialised by the matching *Init2_ call and
        // not yet ended; the spans are valid for the lengths given above.
        let code = unsafe {
            match self.direction {
                Direction::Compress => z::deflate(strm, flush_code(flush)),
                Direction::Decompress => z::inflate(strm, flush_code(flush)),
            }
        };

        let consumed = (avail_in - self.strm.avail_in) as usize;
        let produced = (avail_out - self.strm.avail_out) as usize;
        self.strm.next_in = ptr::null_mut();
        self.strm.avail_in = 0;
        self.strm.next_out = ptr::null_mut();
        self.strm.avail_out = 0;

        let status = status_of(code);
        if !matches!(status, Status::Ok | Status::StreamEnd | Status::BufError) {
            log::trace!(
                "{} returned {status}: {}",
                self.direction,
                self.message().unwrap_or_default()
            );
        }
        Progress {
            status,
            consumed,
            produced,
        }
    }

    fn set_dictionary(&mut self, dictionary: &[u8]) -> Status {
        if self.released {
            return Status::StreamError;
        }
        let strm = self.as_ptr();
        let len = clamp_len(dictionary.len(), CALL_LIMIT);
        // SAFETY: zlib copies the dictionary before returning.
        let code = unsafe {
            match self.direction {
                Direction::Compress => z::deflateSetDictionary(strm, dictionary.as_ptr(), len),
                Direction::Decompress => z::inflateSetDictionary(strm, dictionary.as_ptr(), len),
            }
        };
        status_of(code)
    }

    fn end(&mut self) -> Status {
        if self.released {
            return Status::StreamError;
        }
        self.released = true;
        let strm = self.as_ptr();
        // SAFETY: not yet ended; zlib frees its state through `zfree`.
        let code = unsafe {
            match self.direction {
                Direction::Compress => z::deflateEnd(strm),
                Direction::Decompress => z::inflateEnd(strm),
            }
        };
        status_of(code)
    }
}

impl Drop for RawStream {
    fn drop(&mut self) {
        if !self.released {
            let status = self.end();
            log::trace!("{} state released on drop ({status})", self.direction);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Deflater
// ─────────────────────────────────────────────────────────────────────────────

/// Compressing transform.
pub struct Deflater {
    raw: RawStream,
}

// SAFETY: the z_stream is exclusively owned and zlib keeps no thread-local
// state; the raw pointers never alias memory shared with another owner.
unsafe impl Send for Deflater {}

impl Deflater {
    pub fn new(opts: &CompressOptions) -> Result<Self, Error> {
        opts.validate()?;
        let mut raw = RawStream::new(Direction::Compress);
        let strm = raw.as_ptr();
        // SAFETY: `strm` points at a zeroed, boxed z_stream with allocators set.
        let code = unsafe {
            z::deflateInit2_(
                strm,
                opts.level,
                z::Z_DEFLATED,
                opts.header.encode_window_bits(opts.window_bits),
                c_int::from(opts.memory_level),
                opts.strategy as c_int,
                z::zlibVersion(),
                std::mem::size_of::<z::z_stream>() as c_int,
            )
        };
        if code != z::Z_OK {
            // zlib has already torn down whatever it allocated.
            raw.released = true;
            return Err(Error::Init {
                direction: Direction::Compress,
                status: status_of(code),
            });
        }

        let mut deflater = Deflater { raw };
        if let Some(dictionary) = opts.dictionary.as_deref() {
            let status = deflater.raw.set_dictionary(dictionary);
            if status != Status::Ok {
                return Err(Error::Init {
                    direction: Direction::Compress,
                    status,
                });
            }
        }
        log::debug!(
            "deflate initialised: level={} window_bits={} header={:?} mem_level={} strategy={:?}",
            opts.level,
            opts.window_bits,
            opts.header,
            opts.memory_level,
            opts.strategy
        );
        Ok(deflater)
    }
}

impl Transform for Deflater {
    fn direction(&self) -> Direction {
        Direction::Compress
    }

    fn run(&mut self, input: &[u8], output: &mut [u8], flush: FlushMode) -> Progress {
        self.raw.step(input, output, flush)
    }

    fn set_dictionary(&mut self, dictionary: &[u8]) -> Status {
        self.raw.set_dictionary(dictionary)
    }

    fn end(&mut self) -> Status {
        self.raw.end()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inflater
// ─────────────────────────────────────────────────────────────────────────────

/// Decompressing transform.
///
/// A zlib-framed stream asks for its dictionary mid-stream (`Z_NEED_DICT`);
/// when one was configured it is installed there and decoding continues
/// within the same `run` call. Raw streams get it at construction.
pub struct Inflater {
    raw: RawStream,
    dictionary: Option<Vec<u8>>,
}

// SAFETY: see `Deflater`.
unsafe impl Send for Inflater {}

impl Inflater {
    pub fn new(opts: &DecompressOptions) -> Result<Self, Error> {
        opts.validate()?;
        let mut raw = RawStream::new(Direction::Decompress);
        let strm = raw.as_ptr();
        // SAFETY: as in `Deflater::new`.
        let code = unsafe {
            z::inflateInit2_(
                strm,
                opts.header.encode_window_bits(opts.window_bits),
                z::zlibVersion(),
                std::mem::size_of::<z::z_stream>() as c_int,
            )
        };
        if code != z::Z_OK {
            raw.released = true;
            return Err(Error::Init {
                direction: Direction::Decompress,
                status: status_of(code),
            });
        }

        let mut inflater = Inflater {
            raw,
            dictionary: opts.dictionary.clone(),
        };
        if opts.header == Header::Raw {
            if let Some(dictionary) = opts.dictionary.as_deref() {
                let status = inflater.raw.set_dictionary(dictionary);
                if status != Status::Ok {
                    return Err(Error::Init {
                        direction: Direction::Decompress,
                        status,
                    });
                }
            }
        }
        log::debug!(
            "inflate initialised: window_bits={} header={:?} dictionary={}",
            opts.window_bits,
            opts.header,
            opts.dictionary.is_some()
        );
        Ok(inflater)
    }
}

impl Transform for Inflater {
    fn direction(&self) -> Direction {
        Direction::Decompress
    }

    fn run(&mut self, input: &[u8], output: &mut [u8], flush: FlushMode) -> Progress {
        let first = self.raw.step(input, output, flush);
        if first.status != Status::NeedDict {
            return first;
        }
        let Some(dictionary) = self.dictionary.take() else {
            return first;
        };
        let status = self.raw.set_dictionary(&dictionary);
        if status != Status::Ok {
            return Progress { status, ..first };
        }
        log::debug!("preset dictionary installed ({} bytes)", dictionary.len());

        let rest = self.raw.step(
            &input[first.consumed..],
            &mut output[first.produced..],
            flush,
        );
        Progress {
            status: rest.status,
            consumed: first.consumed + rest.consumed,
            produced: first.produced + rest.produced,
        }
    }

    fn set_dictionary(&mut self, dictionary: &[u8]) -> Status {
        self.raw.set_dictionary(dictionary)
    }

    fn end(&mut self) -> Status {
        self.raw.end()
    }
}

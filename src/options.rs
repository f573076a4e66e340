// options.rs — Immutable configuration for compressors and decompressors.
//
// Options are plain values: build them with the `with_*` methods, hand a
// reference to a constructor, and the constructor validates them once.
// Nothing here changes after a stream engine has been created.

use crate::config::{
    BUFFER_SIZE_DEFAULT, BUFFER_SIZE_MIN, INFLATE_WINDOW_BITS_MIN, LEVEL_DEFAULT, LEVEL_MAX,
    LEVEL_MIN, MEMORY_LEVEL_DEFAULT, MEMORY_LEVEL_MAX, MEMORY_LEVEL_MIN, WINDOW_BITS_DEFAULT,
    WINDOW_BITS_MAX, WINDOW_BITS_MIN,
};
use crate::error::Error;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Framing placed around the raw DEFLATE data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Header {
    /// RFC 1950: two-byte header, Adler-32 trailer.
    #[default]
    Zlib,
    /// RFC 1951: bare DEFLATE blocks.
    Raw,
    /// RFC 1952: gzip member header and CRC-32 trailer.
    Gzip,
}

impl Header {
    /// The `windowBits` argument zlib expects for this framing.
    pub fn encode_window_bits(self, window_bits: u8) -> i32 {
        let bits = i32::from(window_bits);
        match self {
            Header::Zlib => bits,
            Header::Raw => -bits,
            Header::Gzip => bits + 16,
        }
    }

    /// Conventional file suffix for a stream with this framing.
    pub fn suffix(self) -> &'static str {
        match self {
            Header::Zlib => ".zz",
            Header::Raw => ".deflate",
            Header::Gzip => ".gz",
        }
    }
}

/// Match-finding strategy. Discriminants are the zlib `Z_*` strategy codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum Strategy {
    #[default]
    Default = 0,
    Filtered = 1,
    HuffmanOnly = 2,
    Rle = 3,
    Fixed = 4,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Default,
        Strategy::Filtered,
        Strategy::HuffmanOnly,
        Strategy::Rle,
        Strategy::Fixed,
    ];
}

// ---------------------------------------------------------------------------
// CompressOptions
// ---------------------------------------------------------------------------

/// Settings for a compressing stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressOptions {
    /// -1 (zlib default) or 0 (store) through 9 (best).
    pub level: i32,
    pub window_bits: u8,
    pub header: Header,
    pub memory_level: u8,
    pub strategy: Strategy,
    /// Size of the adapter I/O buffers.
    pub buffer_size: usize,
    /// Preset dictionary installed before the first byte is compressed.
    pub dictionary: Option<Vec<u8>>,
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions {
            level: LEVEL_DEFAULT,
            window_bits: WINDOW_BITS_DEFAULT,
            header: Header::Zlib,
            memory_level: MEMORY_LEVEL_DEFAULT,
            strategy: Strategy::Default,
            buffer_size: BUFFER_SIZE_DEFAULT,
            dictionary: None,
        }
    }
}

impl CompressOptions {
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_window_bits(mut self, window_bits: u8) -> Self {
        self.window_bits = window_bits;
        self
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn with_memory_level(mut self, memory_level: u8) -> Self {
        self.memory_level = memory_level;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_dictionary(mut self, dictionary: Option<Vec<u8>>) -> Self {
        self.dictionary = dictionary;
        self
    }

    /// Reject combinations zlib would refuse, before any codec state exists.
    pub fn validate(&self) -> Result<(), Error> {
        if !(LEVEL_MIN..=LEVEL_MAX).contains(&self.level) {
            return Err(Error::InvalidOption(format!(
                "compression level {} is outside {LEVEL_MIN}..={LEVEL_MAX}",
                self.level
            )));
        }
        if !(WINDOW_BITS_MIN..=WINDOW_BITS_MAX).contains(&self.window_bits) {
            return Err(Error::InvalidOption(format!(
                "window bits {} is outside {WINDOW_BITS_MIN}..={WINDOW_BITS_MAX}",
                self.window_bits
            )));
        }
        if !(MEMORY_LEVEL_MIN..=MEMORY_LEVEL_MAX).contains(&self.memory_level) {
            return Err(Error::InvalidOption(format!(
                "memory level {} is outside {MEMORY_LEVEL_MIN}..={MEMORY_LEVEL_MAX}",
                self.memory_level
            )));
        }
        validate_buffer_size(self.buffer_size)?;
        validate_dictionary(self.header, self.dictionary.as_deref())
    }
}

// ---------------------------------------------------------------------------
// DecompressOptions
// ---------------------------------------------------------------------------

/// Settings for a decompressing stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompressOptions {
    /// 0 takes the window size from the zlib header (zlib framing only).
    pub window_bits: u8,
    pub header: Header,
    pub buffer_size: usize,
    /// Dictionary the compressor was primed with, if any.
    pub dictionary: Option<Vec<u8>>,
}

impl Default for DecompressOptions {
    fn default() -> Self {
        DecompressOptions {
            window_bits: WINDOW_BITS_DEFAULT,
            header: Header::Zlib,
            buffer_size: BUFFER_SIZE_DEFAULT,
            dictionary: None,
        }
    }
}

impl DecompressOptions {
    /// Options able to decode what `opts` produces.
    pub fn matching(opts: &CompressOptions) -> Self {
        DecompressOptions {
            window_bits: opts.window_bits,
            header: opts.header,
            buffer_size: opts.buffer_size,
            dictionary: opts.dictionary.clone(),
        }
    }

    pub fn with_window_bits(mut self, window_bits: u8) -> Self {
        self.window_bits = window_bits;
        self
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_dictionary(mut self, dictionary: Option<Vec<u8>>) -> Self {
        self.dictionary = dictionary;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        let header_window = self.window_bits == 0 && self.header == Header::Zlib;
        if !header_window
            && !(INFLATE_WINDOW_BITS_MIN..=WINDOW_BITS_MAX).contains(&self.window_bits)
        {
            return Err(Error::InvalidOption(format!(
                "window bits {} is outside {INFLATE_WINDOW_BITS_MIN}..={WINDOW_BITS_MAX} \
                 (0 is only accepted with zlib framing)",
                self.window_bits
            )));
        }
        validate_buffer_size(self.buffer_size)?;
        validate_dictionary(self.header, self.dictionary.as_deref())
    }
}

impl From<&CompressOptions> for DecompressOptions {
    fn from(opts: &CompressOptions) -> Self {
        DecompressOptions::matching(opts)
    }
}

// ---------------------------------------------------------------------------
// Shared checks
// ---------------------------------------------------------------------------

fn validate_buffer_size(buffer_size: usize) -> Result<(), Error> {
    if buffer_size < BUFFER_SIZE_MIN {
        return Err(Error::InvalidOption(format!(
            "buffer size {buffer_size} is below the minimum of {BUFFER_SIZE_MIN}"
        )));
    }
    Ok(())
}

fn validate_dictionary(header: Header, dictionary: Option<&[u8]>) -> Result<(), Error> {
    match dictionary {
        Some(_) if header == Header::Gzip => Err(Error::InvalidOption(
            "gzip framing cannot carry a preset dictionary".to_string(),
        )),
        _ => Ok(()),
    }
}

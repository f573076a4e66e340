//! Argument definitions for the `zflow` binary.
//!
//! Parsing is done by clap's derive API. Two things sit outside it:
//! the gzip-style `-1` … `-9` level shorthand, which is rewritten to
//! `--level=N` before clap sees the arguments, and the `ZFLOW_CLEVEL`
//! environment default, which applies only when no level flag was given.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use log::LevelFilter;

use crate::config::{
    BUFFER_SIZE_DEFAULT, ENV_CLEVEL, LEVEL_DEFAULT, LEVEL_MAX, LEVEL_MIN, MEMORY_LEVEL_DEFAULT,
    WINDOW_BITS_DEFAULT,
};
use crate::options::{CompressOptions, DecompressOptions, Header, Strategy};

/// Stream framing selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Zlib,
    Raw,
    Gzip,
}

impl From<Format> for Header {
    fn from(format: Format) -> Self {
        match format {
            Format::Zlib => Header::Zlib,
            Format::Raw => Header::Raw,
            Format::Gzip => Header::Gzip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Default,
    Filtered,
    Huffman,
    Rle,
    Fixed,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Default => Strategy::Default,
            StrategyArg::Filtered => Strategy::Filtered,
            StrategyArg::Huffman => Strategy::HuffmanOnly,
            StrategyArg::Rle => Strategy::Rle,
            StrategyArg::Fixed => Strategy::Fixed,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "zflow",
    version,
    about = "Stream zlib, raw DEFLATE and gzip data through bounded buffers",
    after_help = "With no FILE, or when FILE is -, read standard input and write standard output.\n\
                  -1 .. -9 are shorthand for --level."
)]
pub struct Args {
    /// Decompress instead of compress.
    #[arg(short = 'd', long)]
    pub decompress: bool,

    /// Write to standard output; keep input files.
    #[arg(short = 'c', long = "stdout")]
    pub stdout: bool,

    /// Overwrite existing outputs and allow writing compressed data to a terminal.
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Keep input files (default).
    #[arg(short = 'k', long, overrides_with = "rm")]
    pub keep: bool,

    /// Remove input files after successful processing.
    #[arg(long, overrides_with = "keep")]
    pub rm: bool,

    /// Compression level, -1 (zlib default) or 0 through 9.
    #[arg(short = 'L', long, allow_negative_numbers = true)]
    pub level: Option<i32>,

    /// Base-two logarithm of the history window (0 = from header, decompression only).
    #[arg(long, default_value_t = WINDOW_BITS_DEFAULT)]
    pub window_bits: u8,

    /// Memory used for compression state, 1 through 9.
    #[arg(long, default_value_t = MEMORY_LEVEL_DEFAULT)]
    pub mem_level: u8,

    #[arg(long, value_enum, default_value_t = StrategyArg::Default)]
    pub strategy: StrategyArg,

    #[arg(long, value_enum, default_value_t = Format::Zlib)]
    pub format: Format,

    /// Preset dictionary file.
    #[arg(short = 'D', long = "dict", value_name = "FILE")]
    pub dict: Option<PathBuf>,

    /// Size of the streaming buffers in bytes.
    #[arg(short = 'B', long, default_value_t = BUFFER_SIZE_DEFAULT)]
    pub buffer_size: usize,

    /// Files processed in parallel (default: number of CPUs).
    #[arg(short = 'T', long)]
    pub threads: Option<usize>,

    /// More log output; repeat for more.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output.
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,

    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Args {
    /// Level to compress with: the flag, else `ZFLOW_CLEVEL`, else the default.
    pub fn effective_level(&self) -> i32 {
        match self.level {
            Some(level) => level,
            None => init_level_from(std::env::var(ENV_CLEVEL).ok().as_deref()),
        }
    }

    pub fn compress_options(&self, dictionary: Option<Vec<u8>>) -> CompressOptions {
        CompressOptions::default()
            .with_level(self.effective_level())
            .with_window_bits(self.window_bits)
            .with_header(self.format.into())
            .with_memory_level(self.mem_level)
            .with_strategy(self.strategy.into())
            .with_buffer_size(self.buffer_size)
            .with_dictionary(dictionary)
    }

    pub fn decompress_options(&self, dictionary: Option<Vec<u8>>) -> DecompressOptions {
        DecompressOptions::default()
            .with_window_bits(self.window_bits)
            .with_header(self.format.into())
            .with_buffer_size(self.buffer_size)
            .with_dictionary(dictionary)
    }

    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Warnings by default; each `-v` adds a level, any `-q` silences
    /// everything but errors.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet > 0 {
            return if self.quiet > 1 { LevelFilter::Off } else { LevelFilter::Error };
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Read standard input rather than files.
    pub fn uses_stdin(&self) -> bool {
        self.files.is_empty() || (self.files.len() == 1 && self.files[0].as_os_str() == "-")
    }
}

/// Parse an optional `ZFLOW_CLEVEL` value. Unset, unparsable or
/// out-of-range values fall back to [`LEVEL_DEFAULT`].
pub fn init_level_from(env_val: Option<&str>) -> i32 {
    let Some(raw) = env_val else {
        return LEVEL_DEFAULT;
    };
    match raw.trim().parse::<i32>() {
        Ok(level) if (LEVEL_MIN..=LEVEL_MAX).contains(&level) => level,
        _ => {
            log::warn!("ignoring {ENV_CLEVEL}={raw:?}: not a level in {LEVEL_MIN}..={LEVEL_MAX}");
            LEVEL_DEFAULT
        }
    }
}

/// Rewrite `-N` (a single digit) into `--level=N`. Arguments after `--` are
/// left alone.
pub fn expand_level_shorthand<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    let mut literal = false;
    for arg in args {
        if literal {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            literal = true;
            out.push(arg);
            continue;
        }
        let bytes = arg.as_bytes();
        if bytes.len() == 2 && bytes[0] == b'-' && bytes[1].is_ascii_digit() {
            out.push(format!("--level={}", bytes[1] - b'0'));
        } else {
            out.push(arg);
        }
    }
    out
}

//! Operation dispatch for the `zflow` binary.
//!
//! Standard input is streamed to standard output. Named files are turned
//! into [`Job`]s and run on a rayon pool sized by `--threads`; each job
//! writes next to its source, copies the source's modification time, and
//! optionally removes the source.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use filetime::FileTime;
use rayon::prelude::*;

use crate::cli::args::Args;
use crate::io::{compress_writer, decompress_reader};
use crate::options::{CompressOptions, DecompressOptions, Header};

/// Direction the binary runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}

/// Everything a file or stream operation needs, resolved from [`Args`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: Mode,
    pub compress: CompressOptions,
    pub decompress: DecompressOptions,
    pub force: bool,
    pub remove_source: bool,
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self> {
        let dictionary = match &args.dict {
            Some(path) => Some(
                fs::read(path)
                    .with_context(|| format!("cannot read dictionary {}", path.display()))?,
            ),
            None => None,
        };
        let mode = if args.decompress {
            Mode::Decompress
        } else {
            Mode::Compress
        };
        let settings = Settings {
            mode,
            compress: args.compress_options(dictionary.clone()),
            decompress: args.decompress_options(dictionary),
            force: args.force,
            remove_source: args.rm && !args.stdout,
        };
        match mode {
            Mode::Compress => settings.compress.validate()?,
            Mode::Decompress => settings.decompress.validate()?,
        }
        Ok(settings)
    }

    fn header(&self) -> Header {
        match self.mode {
            Mode::Compress => self.compress.header,
            Mode::Decompress => self.decompress.header,
        }
    }
}

/// One file to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source: PathBuf,
    pub target: PathBuf,
}

// ── Entry point ──────────────────────────────────────────────────────────────

pub fn run(args: &Args) -> Result<()> {
    let settings = Settings::from_args(args)?;

    if args.uses_stdin() {
        let stdout = io::stdout();
        if settings.mode == Mode::Compress && stdout.is_terminal() && !settings.force {
            bail!("refusing to write compressed data to a terminal (use -f to force)");
        }
        let input = io::stdin().lock();
        transcode(&settings, input, stdout.lock()).context("standard input")?;
        return Ok(());
    }

    if args.stdout {
        let mut out = io::stdout().lock();
        for path in &args.files {
            let input = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            out = transcode(&settings, BufReader::new(input), out)
                .with_context(|| path.display().to_string())?;
        }
        return Ok(());
    }

    let jobs = plan_jobs(&args.files, &settings)?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads())
        .build()
        .context("cannot start worker pool")?;
    log::info!("{} file(s) on {} thread(s)", jobs.len(), args.threads());

    let failures: Vec<String> = pool.install(|| {
        jobs.par_iter()
            .filter_map(|job| match run_job(job, &settings) {
                Ok(()) => None,
                Err(e) => {
                    log::error!("{}: {e:#}", job.source.display());
                    Some(format!("{}: {e:#}", job.source.display()))
                }
            })
            .collect()
    });
    match failures.len() {
        0 => Ok(()),
        1 => bail!("{}", failures[0]),
        n => bail!("{n} files failed; first: {}", failures[0]),
    }
}

// ── Jobs ─────────────────────────────────────────────────────────────────────

/// Output path for `source`, or an error when a decompression source lacks
/// the framing's suffix.
pub fn target_path(source: &Path, mode: Mode, header: Header) -> Result<PathBuf> {
    let suffix = header.suffix();
    let name = source.as_os_str().to_string_lossy();
    match mode {
        Mode::Compress => {
            if name.ends_with(suffix) {
                bail!("{} already has {suffix} suffix", source.display());
            }
            let mut target = source.as_os_str().to_owned();
            target.push(suffix);
            Ok(PathBuf::from(target))
        }
        Mode::Decompress => match name.strip_suffix(suffix) {
            Some(stem) if !stem.is_empty() => Ok(PathBuf::from(stem)),
            _ => bail!("{}: unknown suffix, expected {suffix}", source.display()),
        },
    }
}

pub fn plan_jobs(files: &[PathBuf], settings: &Settings) -> Result<Vec<Job>> {
    files
        .iter()
        .map(|source| {
            Ok(Job {
                source: source.clone(),
                target: target_path(source, settings.mode, settings.header())?,
            })
        })
        .collect()
}

fn run_job(job: &Job, settings: &Settings) -> Result<()> {
    let meta = fs::metadata(&job.source)
        .with_context(|| format!("cannot stat {}", job.source.display()))?;
    if !meta.is_file() {
        bail!("not a regular file");
    }
    if job.target.exists() && !settings.force {
        bail!("{} already exists (use -f to overwrite)", job.target.display());
    }

    let input = File::open(&job.source).context("cannot open input")?;
    let output = File::create(&job.target)
        .with_context(|| format!("cannot create {}", job.target.display()))?;

    let result = transcode(settings, BufReader::new(input), BufWriter::new(output))
        .and_then(|w| w.into_inner().map_err(|e| e.into_error().into()));
    if let Err(e) = result {
        let _ = fs::remove_file(&job.target);
        return Err(e);
    }

    let mtime = FileTime::from_last_modification_time(&meta);
    if let Err(e) = filetime::set_file_mtime(&job.target, mtime) {
        log::warn!("{}: cannot copy modification time: {e}", job.target.display());
    }
    if settings.remove_source {
        fs::remove_file(&job.source).context("cannot remove input")?;
    }
    log::info!("{} -> {}", job.source.display(), job.target.display());
    Ok(())
}

// ── Streaming ────────────────────────────────────────────────────────────────

/// Run `input` through the configured direction into `output`, returning the
/// flushed sink.
pub fn transcode<R: Read, W: Write>(settings: &Settings, mut input: R, mut output: W) -> Result<W> {
    match settings.mode {
        Mode::Compress => {
            let mut writer = compress_writer(output, &settings.compress)?;
            let n = io::copy(&mut input, &mut writer)?;
            let output = writer.finish()?;
            log::debug!("compressed {n} bytes");
            Ok(output)
        }
        Mode::Decompress => {
            let mut reader = decompress_reader(input, &settings.decompress)?;
            let n = io::copy(&mut reader, &mut output)?;
            output.flush()?;
            log::debug!("decompressed {n} bytes");
            Ok(output)
        }
    }
}

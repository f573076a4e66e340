//! Binary entry point for the `zflow` command-line tool.
//!
//! 1. [`expand_level_shorthand`] rewrites `-1` … `-9` into `--level=N`.
//! 2. clap parses the result into [`Args`].
//! 3. `env_logger` is installed at the verbosity `-v`/`-q` select;
//!    `RUST_LOG` overrides it.
//! 4. [`run`] dispatches and its error, if any, becomes the exit status.

use std::process::ExitCode;

use clap::Parser;

use zflow::cli::args::{expand_level_shorthand, Args};
use zflow::cli::run::run;

fn main() -> ExitCode {
    let args = Args::parse_from(expand_level_shorthand(std::env::args()));

    let mut builder = env_logger::Builder::new();
    builder.filter_level(args.log_level());
    builder.format_timestamp(None);
    builder.parse_default_env();
    let _ = builder.try_init();

    log::debug!(
        "zflow {} linked against zlib {}",
        env!("CARGO_PKG_VERSION"),
        zflow::zlib_version()
    );

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("zflow: {e:#}");
            ExitCode::FAILURE
        }
    }
}

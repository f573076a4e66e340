//! Command-line interface for the `zflow` binary.
//!
//! | Submodule | Responsibility |
//! |-----------|----------------|
//! | [`args`]  | `Args` (clap derive), level shorthand expansion, environment defaults, option building. |
//! | [`run`]   | Dispatch: stdin/stdout streaming, per-file jobs, output naming, parallel execution. |
//!
//! Typical call sequence: `expand_level_shorthand` → `Args::parse_from` →
//! `run::run`.

pub mod args;
pub mod run;

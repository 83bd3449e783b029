// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Flags override the values of an optional TOML options file.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::loader::load_from_path;
use crate::config::model::{CommandInput, RawOptions};
use crate::errors::Result;

/// Command-line arguments for `run-commands`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "run-commands",
    version,
    about = "Run shell commands serially, in parallel, or until one reports readiness.",
    long_about = None
)]
pub struct CliArgs {
    /// Commands to run. Replaces `command`/`commands` from the options file.
    #[arg(value_name = "COMMAND")]
    pub commands: Vec<String>,

    /// Path to a TOML options file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Run commands in parallel instead of one after another.
    #[arg(long)]
    pub parallel: bool,

    /// Maximum number of commands running at once (requires --parallel).
    #[arg(long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Finish as soon as a command prints this text (requires --parallel).
    #[arg(long, value_name = "TEXT")]
    pub ready_when: Option<String>,

    /// Working directory for every command.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Force colored output from commands (sets FORCE_COLOR).
    #[arg(long)]
    pub color: bool,

    /// Arguments interpolated into or forwarded to the commands,
    /// e.g. `--args="--port=4200 --open"`.
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub args: Option<String>,

    /// Environment file loaded before any command runs.
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUN_COMMANDS_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate options and print the final commands without running them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    /// Load the options file (if any) and apply flag overrides on top.
    pub fn resolve_options(&self) -> Result<RawOptions> {
        let mut raw = match self.config {
            Some(ref path) => load_from_path(path)?,
            None => RawOptions::default(),
        };
        self.apply_overrides(&mut raw);
        Ok(raw)
    }

    pub fn apply_overrides(&self, raw: &mut RawOptions) {
        if !self.commands.is_empty() {
            raw.command = None;
            raw.commands = Some(
                self.commands
                    .iter()
                    .map(|c| CommandInput::from(c.as_str()))
                    .collect(),
            );
        }
        if self.parallel {
            raw.parallel = true;
        }
        if self.max_parallel.is_some() {
            raw.max_parallel = self.max_parallel;
        }
        if self.ready_when.is_some() {
            raw.ready_when = self.ready_when.clone();
        }
        if self.cwd.is_some() {
            raw.cwd = self.cwd.clone();
        }
        if self.color {
            raw.color = true;
        }
        if self.args.is_some() {
            raw.args = self.args.clone();
        }
        if self.env_file.is_some() {
            raw.env_file = self.env_file.clone();
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

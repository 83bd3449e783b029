#![allow(dead_code)]

use std::path::PathBuf;

use run_commands::config::{CommandInput, ExecutionOptions, RawOptions};

/// Builder for `RawOptions` to simplify test setup.
pub struct RawOptionsBuilder {
    raw: RawOptions,
}

impl RawOptionsBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawOptions::default(),
        }
    }

    pub fn command(mut self, command: &str) -> Self {
        self.raw.command = Some(command.to_string());
        self
    }

    pub fn commands(mut self, commands: &[&str]) -> Self {
        let list = self.raw.commands.get_or_insert_with(Vec::new);
        list.extend(commands.iter().map(|c| CommandInput::from(*c)));
        self
    }

    pub fn command_entry(mut self, command: &str, forward_all_args: bool) -> Self {
        let list = self.raw.commands.get_or_insert_with(Vec::new);
        list.push(CommandInput::Detailed {
            command: command.to_string(),
            forward_all_args: Some(forward_all_args),
        });
        self
    }

    pub fn parallel(mut self, val: bool) -> Self {
        self.raw.parallel = val;
        self
    }

    pub fn max_parallel(mut self, n: usize) -> Self {
        self.raw.max_parallel = Some(n);
        self
    }

    pub fn ready_when(mut self, marker: &str) -> Self {
        self.raw.ready_when = Some(marker.to_string());
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw.cwd = Some(dir.into());
        self
    }

    pub fn color(mut self, val: bool) -> Self {
        self.raw.color = val;
        self
    }

    pub fn args(mut self, args: &str) -> Self {
        self.raw.args = Some(args.to_string());
        self
    }

    pub fn build_raw(self) -> RawOptions {
        self.raw
    }

    pub fn build(self) -> ExecutionOptions {
        ExecutionOptions::try_from(self.raw).expect("Failed to build valid options from builder")
    }
}

impl Default for RawOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

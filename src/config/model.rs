// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::ArgMap;

/// Options as read from a TOML file (or assembled from CLI flags).
///
/// ```toml
/// parallel = true
/// max_parallel = 2
/// cwd = "apps/web"
/// args = "--port=4200"
///
/// commands = [
///     "npm run build",
///     { command = "npm run serve", forward_all_args = false },
/// ]
/// ```
///
/// Every field is optional. Keys that are not recognized are collected in
/// `extra` and become arguments when `args` is absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOptions {
    /// A single command; takes precedence over `commands` and forces
    /// serial execution.
    #[serde(default)]
    pub command: Option<String>,

    /// `None` when the key is absent; an explicit empty list is allowed.
    #[serde(default)]
    pub commands: Option<Vec<CommandInput>>,

    #[serde(default)]
    pub parallel: bool,

    #[serde(default, alias = "maxParallel")]
    pub max_parallel: Option<usize>,

    /// Readiness marker; selects race mode.
    #[serde(default, alias = "readyWhen")]
    pub ready_when: Option<String>,

    #[serde(default)]
    pub cwd: Option<PathBuf>,

    #[serde(default)]
    pub color: bool,

    /// Raw argument string, e.g. `"--name=web --verbose"`.
    #[serde(default)]
    pub args: Option<String>,

    #[serde(default, alias = "envFile")]
    pub env_file: Option<PathBuf>,

    /// Accepted for compatibility with build-tool configs; has no effect on
    /// execution.
    #[serde(default, alias = "outputPath")]
    pub output_path: Option<String>,

    /// Unrecognized keys, in file order.
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// One entry of `commands`: either a bare string or a table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum CommandInput {
    Plain(String),
    Detailed {
        command: String,
        #[serde(default, alias = "forwardAllArgs")]
        forward_all_args: Option<bool>,
    },
}

impl CommandInput {
    pub fn into_spec(self) -> CommandSpec {
        match self {
            CommandInput::Plain(command) => CommandSpec {
                command,
                forward_all_args: true,
            },
            CommandInput::Detailed {
                command,
                forward_all_args,
            } => CommandSpec {
                command,
                forward_all_args: forward_all_args.unwrap_or(true),
            },
        }
    }
}

impl From<&str> for CommandInput {
    fn from(s: &str) -> Self {
        CommandInput::Plain(s.to_string())
    }
}

/// A normalized command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub command: String,
    pub forward_all_args: bool,
}

/// Normalized, validated options for one invocation.
///
/// Built only through `TryFrom<RawOptions>`; `max_parallel` and `ready_when`
/// are guaranteed to be `None` unless `parallel` is set.
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    pub commands: Vec<CommandSpec>,
    pub parallel: bool,
    pub max_parallel: Option<usize>,
    pub ready_when: Option<String>,
    pub cwd: Option<PathBuf>,
    pub color: bool,
    pub resolved_args: ArgMap,
    pub env_file: Option<PathBuf>,
}

impl ExecutionOptions {
    /// Final command strings, with arguments interpolated or forwarded.
    pub fn rendered_commands(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|c| {
                crate::exec::template::render(&c.command, &self.resolved_args, c.forward_all_args)
            })
            .collect()
    }
}

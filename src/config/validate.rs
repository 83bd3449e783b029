// src/config/validate.rs

use tracing::{debug, warn};

use crate::config::args::parse_args;
use crate::config::model::{CommandSpec, ExecutionOptions, RawOptions};
use crate::errors::{Result, RunCommandsError};
use crate::types::ArgMap;

impl TryFrom<RawOptions> for ExecutionOptions {
    type Error = RunCommandsError;

    fn try_from(raw: RawOptions) -> std::result::Result<Self, Self::Error> {
        let (commands, parallel) = normalize_commands(&raw)?;
        let ready_when = raw.ready_when.clone().filter(|marker| !marker.is_empty());
        validate_mode_options(ready_when.as_deref(), raw.max_parallel, parallel)?;
        let resolved_args = resolve_args(&raw)?;

        if ready_when.is_some() && raw.max_parallel.is_some() {
            warn!("max_parallel has no effect when ready_when is set; race mode is unbounded");
        }

        debug!(
            commands = commands.len(),
            parallel,
            max_parallel = ?raw.max_parallel,
            ready_when = ?ready_when,
            "normalized options"
        );

        Ok(ExecutionOptions {
            commands,
            parallel,
            max_parallel: raw.max_parallel,
            ready_when,
            cwd: raw.cwd,
            color: raw.color,
            resolved_args,
            env_file: raw.env_file,
        })
    }
}

/// Shape `command` / `commands` into a uniform list.
///
/// A single `command` wins over `commands` and always runs serially.
fn normalize_commands(raw: &RawOptions) -> Result<(Vec<CommandSpec>, bool)> {
    if let Some(ref command) = raw.command {
        if raw.commands.is_some() {
            warn!("both `command` and `commands` are set; using `command`");
        }
        let spec = CommandSpec {
            command: command.clone(),
            forward_all_args: true,
        };
        return Ok((vec![spec], false));
    }

    match raw.commands {
        Some(ref inputs) => {
            let specs = inputs.iter().cloned().map(|c| c.into_spec()).collect();
            Ok((specs, raw.parallel))
        }
        None => Err(RunCommandsError::ConfigError(
            "either `command` or `commands` must be provided".to_string(),
        )),
    }
}

/// An empty `ready_when` has already been dropped by the caller and counts
/// as absent.
fn validate_mode_options(
    ready_when: Option<&str>,
    max_parallel: Option<usize>,
    parallel: bool,
) -> Result<()> {
    if ready_when.is_some() && !parallel {
        return Err(RunCommandsError::ConfigError(
            "\"ready_when\" can only be used when \"parallel=true\"".to_string(),
        ));
    }

    if let Some(max) = max_parallel {
        if !parallel {
            return Err(RunCommandsError::ConfigError(
                "\"max_parallel\" can only be used when \"parallel=true\"".to_string(),
            ));
        }
        if max == 0 {
            return Err(RunCommandsError::ConfigError(
                "\"max_parallel\" must be >= 1 (got 0)".to_string(),
            ));
        }
    }

    Ok(())
}

/// Parse `args` if present; otherwise unrecognized top-level keys become
/// the arguments.
fn resolve_args(raw: &RawOptions) -> Result<ArgMap> {
    if let Some(ref args) = raw.args {
        return parse_args(args);
    }

    Ok(raw
        .extra
        .iter()
        .map(|(key, value)| {
            let value = match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect())
}

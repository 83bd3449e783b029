// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunCommandsError {
    #[error("Bad config for run-commands - {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("failed to load env file {}: {message}", .path.display())]
    EnvFile { path: PathBuf, message: String },

    #[error("Command failed: {command} (exit code {code})")]
    CommandFailed { command: String, code: i32 },

    /// Any failure raised while an execution mode is running.
    #[error("Something went wrong in run-commands - {0}")]
    Execution(Box<RunCommandsError>),

    #[error("interrupted by Ctrl+C")]
    Interrupted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RunCommandsError {
    /// Wrap an error with the execution prefix, leaving already wrapped
    /// errors alone.
    pub fn into_execution(self) -> Self {
        match self {
            already @ RunCommandsError::Execution(_) => already,
            other => RunCommandsError::Execution(Box::new(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, RunCommandsError>;

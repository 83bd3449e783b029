// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ExecutionOptions, RawOptions};
use crate::errors::Result;

/// Load an options file from a given path and return the raw `RawOptions`.
///
/// This only performs TOML deserialization; mode validation happens in
/// [`load_and_validate`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawOptions> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let options: RawOptions = toml::from_str(&contents)?;

    Ok(options)
}

/// Load an options file and normalize it into `ExecutionOptions`.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ExecutionOptions> {
    let raw = load_from_path(&path)?;
    ExecutionOptions::try_from(raw)
}

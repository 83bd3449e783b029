// src/config/mod.rs

//! Option loading, argument resolution and normalization.
//!
//! - [`model`] defines the TOML-backed raw options and the normalized
//!   [`ExecutionOptions`] the engine consumes.
//! - [`loader`] reads an options file from disk.
//! - [`validate`] turns raw options into normalized ones, rejecting invalid
//!   mode combinations before anything is spawned.
//! - [`args`] parses a raw argument string into an [`ArgMap`](crate::types::ArgMap).
//! - [`env_file`] loads environment files.

pub mod args;
pub mod env_file;
pub mod loader;
pub mod model;
pub mod validate;

pub use args::{camel_case, parse_args};
pub use env_file::load_env_file;
pub use loader::{load_and_validate, load_from_path};
pub use model::{CommandInput, CommandSpec, ExecutionOptions, RawOptions};

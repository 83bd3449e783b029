// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`template`] renders the final command string from resolved arguments.
//! - [`runner`] spawns commands with `tokio::process::Command` and resolves
//!   their outcome (readiness marker or exit code).
//! - [`output`] forwards child output live and scans it for the readiness
//!   marker.
//! - [`registry`] tracks spawned children so they can be killed when the
//!   orchestrator shuts down.
//! - [`backend`] provides the `CommandBackend` trait the execution modes are
//!   written against, implemented by `ProcessRunner`.

pub mod backend;
pub mod output;
pub mod registry;
pub mod runner;
pub mod template;

pub use backend::{BoxFuture, CommandBackend};
pub use registry::ProcessRegistry;
pub use runner::ProcessRunner;
pub use template::render;

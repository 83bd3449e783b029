// src/exec/backend.rs

//! Pluggable command backend abstraction.
//!
//! Execution modes talk to a `CommandBackend` instead of spawning processes
//! themselves. Production code uses [`ProcessRunner`]; tests can provide a
//! backend that simulates outcomes and timing without touching the OS.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

use super::runner::ProcessRunner;

/// Boxed `'static` future returned by backends, so results can be awaited
/// from spawned Tokio tasks.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// How commands are actually executed.
pub trait CommandBackend: Send + Sync + 'static {
    /// Start `command` and resolve to its outcome: `true` once the readiness
    /// marker is seen (when given) or on a clean exit (when not).
    fn run(&self, command: String, ready_marker: Option<String>) -> BoxFuture<Result<bool>>;

    /// Run `command` to completion, failing on a non-zero exit.
    fn run_blocking(&self, command: String) -> BoxFuture<Result<()>>;
}

impl CommandBackend for ProcessRunner {
    fn run(&self, command: String, ready_marker: Option<String>) -> BoxFuture<Result<bool>> {
        // Clone the runner so the future doesn't borrow `self`.
        let runner = self.clone();
        Box::pin(async move { ProcessRunner::run(&runner, &command, ready_marker.as_deref()).await })
    }

    fn run_blocking(&self, command: String) -> BoxFuture<Result<()>> {
        let runner = self.clone();
        Box::pin(async move { ProcessRunner::run_blocking(&runner, &command).await })
    }
}

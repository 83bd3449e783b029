// src/exec/registry.rs

//! Central registry of spawned child processes.
//!
//! Every asynchronously spawned child is owned by a supervisor Tokio task.
//! The registry keeps the supervisor handle plus a cancel channel so that
//! [`ProcessRegistry::shutdown`] can kill whatever is still running when the
//! orchestrator is done, including the losers of a race and processes left
//! running after their readiness marker was seen.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handle for one supervised child.
#[derive(Debug)]
struct ActiveProcess {
    command: String,
    pid: Option<u32>,
    cancel: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessRegistry {
    active: Arc<Mutex<Vec<ActiveProcess>>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ActiveProcess>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn register(
        &self,
        command: &str,
        pid: Option<u32>,
        cancel: oneshot::Sender<()>,
        handle: JoinHandle<()>,
    ) {
        debug!(command, ?pid, "registering child process");
        let mut active = self.lock();
        active.retain(|p| !p.handle.is_finished());
        active.push(ActiveProcess {
            command: command.to_string(),
            pid,
            cancel: Some(cancel),
            handle,
        });
    }

    /// Number of supervised children that have not exited yet.
    pub fn running(&self) -> usize {
        let mut active = self.lock();
        active.retain(|p| !p.handle.is_finished());
        active.len()
    }

    /// Kill every child that is still running and wait for its supervisor.
    pub async fn shutdown(&self) {
        let drained: Vec<ActiveProcess> = std::mem::take(&mut *self.lock());

        for mut process in drained {
            if !process.handle.is_finished() {
                info!(
                    command = %process.command,
                    pid = ?process.pid,
                    "killing child process on shutdown"
                );
                if let Some(cancel) = process.cancel.take() {
                    if cancel.send(()).is_err() {
                        debug!(
                            command = %process.command,
                            "supervisor already finished while cancelling"
                        );
                    }
                }
            }

            if let Err(e) = process.handle.await {
                warn!(
                    command = %process.command,
                    error = %e,
                    "process supervisor did not finish cleanly"
                );
            }
        }
    }
}

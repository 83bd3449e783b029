// src/engine/modes.rs

//! Serial, bounded-parallel and race execution strategies.
//!
//! Each strategy returns `Ok(success)` or an error that the runtime wraps.

use std::sync::Arc;

use anyhow::anyhow;
use futures::future::select_all;
use tracing::{debug, info, warn};

use crate::errors::{Result, RunCommandsError};
use crate::exec::CommandBackend;
use crate::pool::run_pool;

/// Run commands strictly in order. A failing command aborts the run by
/// returning its error; later commands never start.
pub async fn run_serially<B>(commands: &[String], backend: &B) -> Result<bool>
where
    B: CommandBackend + ?Sized,
{
    for (index, command) in commands.iter().enumerate() {
        debug!(index, command = %command, "serial step");
        backend.run_blocking(command.clone()).await?;
    }
    Ok(true)
}

/// Run commands through the pool. Success means every command succeeded;
/// each failing command is reported as a warning, without aborting the
/// others.
pub async fn run_in_parallel<B>(
    commands: Vec<String>,
    backend: Arc<B>,
    max_parallel: Option<usize>,
) -> Result<bool>
where
    B: CommandBackend + ?Sized,
{
    let outcomes = run_pool(
        commands,
        move |command: String, index: usize| {
            let backend = Arc::clone(&backend);
            async move {
                debug!(index, command = %command, "pool admitted command");
                let ok = backend.run(command.clone(), None).await?;
                Ok::<_, RunCommandsError>((command, ok))
            }
        },
        max_parallel,
    )
    .await?;

    let mut success = true;
    for (command, ok) in outcomes.iter() {
        if !ok {
            warn!("Warning: command \"{command}\" exited with non-zero status code");
            success = false;
        }
    }
    Ok(success)
}

/// Start every command at once and settle on the first command that reports
/// readiness.
///
/// A command that exits without printing `ready_when` does not decide the
/// race; the remaining contenders are still awaited. The race fails only
/// once every command has exited without becoming ready. Commands still
/// running when the race is won keep running, detached; the process
/// registry still owns them.
pub async fn run_race<B>(commands: Vec<String>, backend: Arc<B>, ready_when: &str) -> Result<bool>
where
    B: CommandBackend + ?Sized,
{
    if commands.is_empty() {
        debug!("race has no commands; nothing to wait for");
        return Ok(true);
    }

    let mut pending: Vec<_> = commands
        .into_iter()
        .map(|command| {
            let outcome = backend.run(command.clone(), Some(ready_when.to_string()));
            tokio::spawn(async move { (command, outcome.await) })
        })
        .collect();

    let mut not_ready = Vec::new();
    while !pending.is_empty() {
        let (first, _, rest) = select_all(pending).await;
        pending = rest;

        let (command, outcome) = first.map_err(|e| {
            RunCommandsError::Other(anyhow!("race contender panicked or was cancelled: {e}"))
        })?;

        if outcome? {
            info!(command = %command, "race settled");
            return Ok(true);
        }

        debug!(
            command = %command,
            remaining = pending.len(),
            "command exited without becoming ready"
        );
        not_ready.push(command);
    }

    for command in not_ready {
        warn!("Warning: command \"{command}\" exited without printing \"{ready_when}\"");
    }
    Ok(false)
}

// src/engine/runtime.rs

use std::sync::Arc;

use tracing::{error, info};

use crate::config::ExecutionOptions;
use crate::errors::Result;
use crate::exec::CommandBackend;

use super::modes::{run_in_parallel, run_race, run_serially};
use super::{ExecutionMode, RunOutcome};

/// Render the commands, run them in the selected mode and report.
///
/// Any error raised while the mode runs is wrapped with the
/// `Something went wrong in run-commands` prefix.
pub async fn execute<B>(options: &ExecutionOptions, backend: Arc<B>) -> Result<RunOutcome>
where
    B: CommandBackend + ?Sized,
{
    let commands = options.rendered_commands();
    let mode = ExecutionMode::from_options(options);
    info!(?mode, commands = commands.len(), "starting run");

    let result = match mode {
        ExecutionMode::Serial => run_serially(&commands, backend.as_ref()).await,
        ExecutionMode::Parallel { max_parallel } => {
            run_in_parallel(commands, backend, max_parallel).await
        }
        ExecutionMode::Race { ref ready_when } => run_race(commands, backend, ready_when).await,
    };

    match result {
        Ok(success) => {
            info!(success, "run finished");
            Ok(RunOutcome { success })
        }
        Err(err) => {
            error!(error = %err, "run failed");
            Err(err.into_execution())
        }
    }
}

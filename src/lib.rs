// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod pool;
pub mod types;

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::cli::CliArgs;
use crate::config::{ExecutionOptions, load_env_file};
use crate::engine::RunOutcome;
use crate::errors::{Result, RunCommandsError};
use crate::exec::{ProcessRegistry, ProcessRunner};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - option loading and normalization
/// - env file loading
/// - the process runner and its registry
/// - Ctrl-C handling
///
/// Every child still alive when the run is decided is killed before this
/// returns.
pub async fn run(args: CliArgs) -> Result<RunOutcome> {
    let raw = args.resolve_options()?;
    let options = ExecutionOptions::try_from(raw)?;

    if args.dry_run {
        print_dry_run(&options);
        return Ok(RunOutcome { success: true });
    }

    load_env_file(options.env_file.as_deref())?;

    let registry = ProcessRegistry::new();
    let runner = Arc::new(ProcessRunner::new(
        options.cwd.clone(),
        options.color,
        registry.clone(),
    ));

    let outcome = tokio::select! {
        res = engine::execute(&options, runner) => res,
        _ = wait_for_ctrl_c() => {
            warn!("Ctrl+C received; stopping");
            Err(RunCommandsError::Interrupted)
        }
    };

    let running = registry.running();
    if running > 0 {
        debug!(running, "tearing down child processes");
    }
    registry.shutdown().await;

    outcome
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// Simple dry-run output: print mode and final commands.
fn print_dry_run(options: &ExecutionOptions) {
    println!("run-commands dry-run");
    println!("  mode = {:?}", engine::ExecutionMode::from_options(options));
    if let Some(ref cwd) = options.cwd {
        println!("  cwd = {}", cwd.display());
    }
    if options.color {
        println!("  color = true");
    }
    if let Some(ref env_file) = options.env_file {
        println!("  env_file = {}", env_file.display());
    }
    if !options.resolved_args.is_empty() {
        println!("  args = {}", options.resolved_args);
    }
    println!();

    let rendered = options.rendered_commands();
    println!("commands ({}):", rendered.len());
    for (spec, command) in options.commands.iter().zip(rendered.iter()) {
        println!("  - {command}");
        if !spec.forward_all_args {
            println!("      forward_all_args: false");
        }
    }

    debug!("dry-run complete (no execution)");
}

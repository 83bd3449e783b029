// src/exec/runner.rs

//! Process runner: one shell command, one child process.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use anyhow::{Context, anyhow};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::{Result, RunCommandsError};
use crate::exec::output::{self, MarkerScanner};
use crate::exec::registry::ProcessRegistry;

/// How long to wait for a child's output pipes to close after it exited.
///
/// Background grandchildren can keep a pipe open indefinitely; past this
/// grace period the pumps are left to finish on their own.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Spawns commands through the platform shell.
///
/// All children share the same working directory and color setting, and
/// asynchronously started children are tracked in the [`ProcessRegistry`].
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    cwd: Option<PathBuf>,
    color: bool,
    registry: ProcessRegistry,
}

impl ProcessRunner {
    pub fn new(cwd: Option<PathBuf>, color: bool, registry: ProcessRegistry) -> Self {
        Self {
            cwd,
            color,
            registry,
        }
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// Build a shell command appropriate for the platform.
    fn shell_command(&self, command: &str) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(command);
            c
        };

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        if self.color {
            cmd.env("FORCE_COLOR", "true");
        }
        cmd.kill_on_drop(true);
        cmd
    }

    /// Start `command` and resolve once its outcome is known.
    ///
    /// - With a `ready_marker`, resolves `true` as soon as the marker appears
    ///   on stdout or stderr; the process keeps running. If the process exits
    ///   before printing the marker, resolves `false` whatever its exit
    ///   code.
    /// - Without one, resolves `true` iff the process exits with code 0.
    ///
    /// Output is forwarded live to this process's stdout/stderr.
    pub async fn run(&self, command: &str, ready_marker: Option<&str>) -> Result<bool> {
        info!(command, ready_marker, "starting command process");

        let mut cmd = self.shell_command(command);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning process for command '{command}'"))?;
        let pid = child.id();

        let (ready_tx, ready_rx) = mpsc::channel::<()>(2);
        let mut pumps = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            pumps.push(tokio::spawn(output::pump(
                stdout,
                tokio::io::stdout(),
                ready_marker.map(MarkerScanner::new),
                ready_tx.clone(),
            )));
        }
        if let Some(stderr) = child.stderr.take() {
            pumps.push(tokio::spawn(output::pump(
                stderr,
                tokio::io::stderr(),
                ready_marker.map(MarkerScanner::new),
                ready_tx.clone(),
            )));
        }
        drop(ready_tx);

        let (outcome_tx, outcome_rx) = oneshot::channel::<Result<bool>>();
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();

        let supervisor = Supervisor {
            command: command.to_string(),
            has_marker: ready_marker.is_some(),
            pumps,
            ready_rx,
            outcome_tx: Some(outcome_tx),
        };
        let handle = tokio::spawn(supervisor.run(child, cancel_rx));
        self.registry.register(command, pid, cancel_tx, handle);

        match outcome_rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(RunCommandsError::Other(anyhow!(
                "process for command '{command}' was stopped before reporting an outcome"
            ))),
        }
    }

    /// Run `command` to completion with inherited stdio.
    ///
    /// Fails with [`RunCommandsError::CommandFailed`] on a non-zero exit.
    pub async fn run_blocking(&self, command: &str) -> Result<()> {
        info!(command, "running command");

        let mut cmd = self.shell_command(command);
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = cmd
            .status()
            .await
            .with_context(|| format!("running process for command '{command}'"))?;

        let code = status.code().unwrap_or(-1);
        info!(command, exit_code = code, success = status.success(), "command exited");

        if status.success() {
            Ok(())
        } else {
            Err(RunCommandsError::CommandFailed {
                command: command.to_string(),
                code,
            })
        }
    }
}

/// Owns one child process for its whole lifetime.
struct Supervisor {
    command: String,
    has_marker: bool,
    pumps: Vec<JoinHandle<()>>,
    ready_rx: mpsc::Receiver<()>,
    outcome_tx: Option<oneshot::Sender<Result<bool>>>,
}

impl Supervisor {
    async fn run(mut self, mut child: Child, mut cancel_rx: oneshot::Receiver<()>) {
        let status = loop {
            tokio::select! {
                Some(()) = self.ready_rx.recv(), if self.outcome_tx.is_some() => {
                    info!(command = %self.command, "readiness marker observed");
                    self.settle(Ok(true));
                }

                status = child.wait() => break status,

                cancel = &mut cancel_rx => {
                    match cancel {
                        Ok(()) => {
                            if let Err(e) = child.kill().await {
                                warn!(
                                    command = %self.command,
                                    error = %e,
                                    "failed to kill child process"
                                );
                            }
                        }
                        Err(_) => {
                            debug!(
                                command = %self.command,
                                "registry dropped; child is killed on drop"
                            );
                        }
                    }
                    return;
                }
            }
        };

        match status {
            Ok(status) => self.finish(status).await,
            Err(e) => {
                error!(command = %self.command, error = %e, "waiting for child process failed");
                self.settle(Err(RunCommandsError::IoError(e)));
            }
        }
    }

    async fn finish(&mut self, status: ExitStatus) {
        for pump in self.pumps.drain(..) {
            if tokio::time::timeout(OUTPUT_DRAIN_GRACE, pump).await.is_err() {
                debug!(
                    command = %self.command,
                    "output still open after exit; leaving pump detached"
                );
            }
        }

        let code = status.code().unwrap_or(-1);
        info!(
            command = %self.command,
            exit_code = code,
            success = status.success(),
            "command process exited"
        );

        if self.outcome_tx.is_none() {
            return;
        }

        let outcome = if self.has_marker {
            let ready = self.ready_rx.try_recv().is_ok();
            if !ready {
                debug!(
                    command = %self.command,
                    exit_code = code,
                    "process exited before printing its readiness marker"
                );
            }
            ready
        } else {
            status.success()
        };
        self.settle(Ok(outcome));
    }

    fn settle(&mut self, outcome: Result<bool>) {
        if let Some(tx) = self.outcome_tx.take() {
            if tx.send(outcome).is_err() {
                debug!(command = %self.command, "outcome receiver dropped");
            }
        }
    }
}

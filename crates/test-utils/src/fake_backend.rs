use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use run_commands::errors::{Result, RunCommandsError};
use run_commands::exec::{BoxFuture, CommandBackend};

/// Scripted behaviour for one command.
///
/// `delay` is how long the command "runs" before settling (for race mode:
/// until it prints the readiness marker).
#[derive(Debug, Clone)]
pub struct FakeCommand {
    pub delay: Duration,
    pub outcome: bool,
    pub error: Option<String>,
}

impl Default for FakeCommand {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: true,
            error: None,
        }
    }
}

impl FakeCommand {
    pub fn ok_after(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            ..Self::default()
        }
    }

    pub fn fail_after(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            outcome: false,
            ..Self::default()
        }
    }

    pub fn error_after(ms: u64, message: &str) -> Self {
        Self {
            delay: Duration::from_millis(ms),
            error: Some(message.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    started: Vec<String>,
    finished: Vec<String>,
    ready_markers: Vec<Option<String>>,
    in_flight: usize,
    peak: usize,
}

/// A backend that never spawns processes:
/// - records which commands were started and finished, in order
/// - tracks peak concurrency
/// - settles each command after its scripted delay
///
/// Commands without a script succeed immediately.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    script: HashMap<String, FakeCommand>,
    state: Arc<Mutex<FakeState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, command: &str, behaviour: FakeCommand) -> Self {
        self.script.insert(command.to_string(), behaviour);
        self
    }

    pub fn started(&self) -> Vec<String> {
        self.state.lock().unwrap().started.clone()
    }

    pub fn finished(&self) -> Vec<String> {
        self.state.lock().unwrap().finished.clone()
    }

    pub fn ready_markers(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().ready_markers.clone()
    }

    pub fn peak_concurrency(&self) -> usize {
        self.state.lock().unwrap().peak
    }

    fn simulate(&self, command: String, ready_marker: Option<String>) -> BoxFuture<Result<bool>> {
        let behaviour = self.script.get(&command).cloned().unwrap_or_default();
        let state = Arc::clone(&self.state);

        Box::pin(async move {
            {
                let mut guard = state.lock().unwrap();
                guard.started.push(command.clone());
                guard.ready_markers.push(ready_marker);
                guard.in_flight += 1;
                guard.peak = guard.peak.max(guard.in_flight);
            }

            tokio::time::sleep(behaviour.delay).await;

            {
                let mut guard = state.lock().unwrap();
                guard.in_flight -= 1;
                guard.finished.push(command.clone());
            }

            match behaviour.error {
                Some(message) => Err(RunCommandsError::Other(anyhow::anyhow!(message))),
                None => Ok(behaviour.outcome),
            }
        })
    }
}

impl CommandBackend for FakeBackend {
    fn run(&self, command: String, ready_marker: Option<String>) -> BoxFuture<Result<bool>> {
        self.simulate(command, ready_marker)
    }

    fn run_blocking(&self, command: String) -> BoxFuture<Result<()>> {
        let outcome = self.simulate(command.clone(), None);
        Box::pin(async move {
            if outcome.await? {
                Ok(())
            } else {
                Err(RunCommandsError::CommandFailed { command, code: 1 })
            }
        })
    }
}

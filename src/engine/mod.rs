// src/engine/mod.rs

//! Orchestration engine.
//!
//! One invocation moves through `Normalize → Mode → Aggregate → Report`:
//! options arrive already normalized ([`ExecutionOptions`]), the mode is
//! selected from them, the mode aggregates per-command outcomes into one
//! boolean, and [`runtime::execute`] reports it as a [`RunOutcome`].
//!
//! The strategies themselves live in [`modes`].

use crate::config::ExecutionOptions;

pub mod modes;
pub mod runtime;

pub use runtime::execute;

/// Result of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub success: bool,
}

/// Execution strategy selected from the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One command at a time, each to completion; the first failure aborts.
    Serial,
    /// All commands through the pool, optionally bounded.
    Parallel { max_parallel: Option<usize> },
    /// All commands at once; the first to settle decides the run.
    Race { ready_when: String },
}

impl ExecutionMode {
    pub fn from_options(options: &ExecutionOptions) -> Self {
        if !options.parallel {
            return ExecutionMode::Serial;
        }
        match options.ready_when {
            Some(ref marker) => ExecutionMode::Race {
                ready_when: marker.clone(),
            },
            None => ExecutionMode::Parallel {
                max_parallel: options.max_parallel,
            },
        }
    }
}

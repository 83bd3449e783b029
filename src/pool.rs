// src/pool.rs

//! Concurrency-limited task pool.
//!
//! Admission is modelled as a semaphore with one permit per slot. Items are
//! admitted in input order; each running task owns its permit, so the slot
//! is released on every completion path when the permit is dropped.
//!
//! The first task error closes the semaphore, which stops further
//! admission, and becomes the pool's result. Tasks that were already
//! admitted are detached rather than aborted so their child processes run
//! to completion.

use std::future::Future;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::errors::{Result, RunCommandsError};

/// A task's value paired with the position of its input item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult<R> {
    pub index: usize,
    pub value: R,
}

/// Run `task_fn` over `items` with at most `max_concurrency` tasks in flight
/// (unbounded when `None`).
///
/// Results are returned in input order regardless of completion order.
pub async fn run_pool<T, R, F, Fut>(
    items: Vec<T>,
    task_fn: F,
    max_concurrency: Option<usize>,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T, usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    if items.is_empty() {
        debug!("pool received no items");
        return Ok(Vec::new());
    }

    let total = items.len();
    let limit = match max_concurrency {
        Some(0) => {
            return Err(RunCommandsError::ConfigError(
                "pool concurrency must be >= 1 (got 0)".to_string(),
            ));
        }
        Some(n) => n.min(total),
        None => total,
    };
    debug!(total, limit, "starting pool");

    let slots = Arc::new(Semaphore::new(limit));
    let task_fn = Arc::new(task_fn);
    let mut running: JoinSet<Result<TaskResult<R>>> = JoinSet::new();

    for (index, item) in items.into_iter().enumerate() {
        let permit = match Arc::clone(&slots).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                debug!(index, "pool terminated; remaining items are not admitted");
                break;
            }
        };

        let task_fn = Arc::clone(&task_fn);
        let slots = Arc::clone(&slots);
        running.spawn(async move {
            let _permit = permit;
            let result = task_fn(item, index).await;
            if result.is_err() {
                slots.close();
            }
            result.map(|value| TaskResult { index, value })
        });
    }

    let mut results: Vec<TaskResult<R>> = Vec::with_capacity(total);

    while let Some(joined) = running.join_next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => Err(RunCommandsError::Other(anyhow!("pool task panicked or was cancelled: {e}"))),
        };

        match outcome {
            Ok(result) => results.push(result),
            Err(err) => {
                slots.close();
                let still_running = running.len();
                running.detach_all();
                warn!(
                    still_running,
                    error = %err,
                    "pool task failed; no further items admitted"
                );
                return Err(err);
            }
        }
    }

    results.sort_by_key(|r| r.index);
    Ok(results.into_iter().map(|r| r.value).collect())
}

// tests/modes_fake_backend.rs

mod common;
use crate::common::init_tracing;

use std::sync::Arc;

use tokio::time::{sleep, timeout, Duration};

use run_commands::engine::{execute, ExecutionMode, RunOutcome};
use run_commands::errors::RunCommandsError;
use run_commands_test_utils::builders::RawOptionsBuilder;
use run_commands_test_utils::fake_backend::{FakeBackend, FakeCommand};

#[tokio::test]
async fn serial_failure_aborts_remaining_commands() {
    init_tracing();

    let options = RawOptionsBuilder::new()
        .commands(&["A", "B", "C"])
        .build();
    let backend = Arc::new(FakeBackend::new().with_command("B", FakeCommand::fail_after(0)));

    let err = execute(&options, Arc::clone(&backend)).await.unwrap_err();

    match err {
        RunCommandsError::Execution(inner) => match *inner {
            RunCommandsError::CommandFailed { ref command, code } => {
                assert_eq!(command, "B");
                assert_eq!(code, 1);
            }
            ref other => panic!("expected CommandFailed inside, got {:?}", other),
        },
        other => panic!("expected Execution error, got {:?}", other),
    }

    assert_eq!(backend.started(), vec!["A", "B"]);
    assert_eq!(backend.finished(), vec!["A", "B"]);
}

#[tokio::test]
async fn serial_commands_never_overlap() {
    init_tracing();

    let options = RawOptionsBuilder::new()
        .commands(&["A", "B", "C"])
        .build();
    let backend = Arc::new(
        FakeBackend::new()
            .with_command("A", FakeCommand::ok_after(20))
            .with_command("B", FakeCommand::ok_after(5))
            .with_command("C", FakeCommand::ok_after(10)),
    );

    let outcome = execute(&options, Arc::clone(&backend)).await.unwrap();

    assert_eq!(outcome, RunOutcome { success: true });
    assert_eq!(backend.finished(), vec!["A", "B", "C"]);
    assert_eq!(backend.peak_concurrency(), 1);
}

#[tokio::test]
async fn execution_errors_carry_descriptive_prefix() {
    init_tracing();

    let options = RawOptionsBuilder::new().commands(&["A"]).build();
    let backend = Arc::new(FakeBackend::new().with_command("A", FakeCommand::fail_after(0)));

    let err = execute(&options, backend).await.unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Something went wrong in run-commands - "));
    assert!(message.contains("A"));
}

#[tokio::test]
async fn parallel_failure_is_reported_without_aborting() {
    init_tracing();

    let options = RawOptionsBuilder::new()
        .commands(&["A", "B", "C"])
        .parallel(true)
        .build();
    let backend = Arc::new(
        FakeBackend::new()
            .with_command("A", FakeCommand::ok_after(30))
            .with_command("B", FakeCommand::fail_after(5))
            .with_command("C", FakeCommand::ok_after(10)),
    );

    let outcome = execute(&options, Arc::clone(&backend)).await.unwrap();

    assert!(!outcome.success);
    let mut finished = backend.finished();
    finished.sort();
    assert_eq!(finished, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn parallel_success_requires_every_command() {
    init_tracing();

    let options = RawOptionsBuilder::new()
        .commands(&["A", "B"])
        .parallel(true)
        .build();
    let backend = Arc::new(FakeBackend::new());

    let outcome = execute(&options, Arc::clone(&backend)).await.unwrap();
    assert!(outcome.success);
    assert!(backend.ready_markers().iter().all(Option::is_none));
}

#[tokio::test]
async fn bounded_parallel_respects_max_parallel() {
    init_tracing();

    let commands = ["A", "B", "C", "D", "E"];
    let options = RawOptionsBuilder::new()
        .commands(&commands)
        .parallel(true)
        .max_parallel(2)
        .build();

    let mut backend = FakeBackend::new();
    for c in commands {
        backend = backend.with_command(c, FakeCommand::ok_after(15));
    }
    let backend = Arc::new(backend);

    let outcome = execute(&options, Arc::clone(&backend)).await.unwrap();

    assert!(outcome.success);
    assert_eq!(backend.peak_concurrency(), 2);
    assert_eq!(backend.started(), vec!["A", "B", "C", "D", "E"]);
}

#[tokio::test]
async fn backend_error_in_parallel_mode_is_fatal() {
    init_tracing();

    let options = RawOptionsBuilder::new()
        .commands(&["A", "B"])
        .parallel(true)
        .build();
    let backend = Arc::new(
        FakeBackend::new().with_command("A", FakeCommand::error_after(0, "cannot spawn")),
    );

    let err = execute(&options, backend).await.unwrap_err();
    assert!(matches!(err, RunCommandsError::Execution(_)));
    assert!(err.to_string().contains("cannot spawn"));
}

#[tokio::test]
async fn race_is_decided_by_first_ready_command() {
    init_tracing();

    let options = RawOptionsBuilder::new()
        .commands(&["A", "B"])
        .parallel(true)
        .ready_when("ready")
        .build();
    let backend = Arc::new(
        FakeBackend::new()
            .with_command("A", FakeCommand::fail_after(300))
            .with_command("B", FakeCommand::ok_after(10)),
    );

    let outcome = timeout(Duration::from_millis(200), execute(&options, Arc::clone(&backend)))
        .await
        .expect("race should settle on B well before A finishes")
        .unwrap();

    assert!(outcome.success);
    assert_eq!(
        backend.ready_markers(),
        vec![Some("ready".to_string()), Some("ready".to_string())]
    );
    // A was not awaited by the race.
    assert_eq!(backend.finished(), vec!["B"]);

    // ...but it was left running rather than cancelled.
    sleep(Duration::from_millis(400)).await;
    let mut finished = backend.finished();
    finished.sort();
    assert_eq!(finished, vec!["A", "B"]);
}

#[tokio::test]
async fn race_waits_past_commands_that_exit_without_readiness() {
    init_tracing();

    let options = RawOptionsBuilder::new()
        .commands(&["A", "B"])
        .parallel(true)
        .ready_when("ready")
        .build();
    let backend = Arc::new(
        FakeBackend::new()
            .with_command("A", FakeCommand::ok_after(100))
            .with_command("B", FakeCommand::fail_after(5)),
    );

    let outcome = execute(&options, Arc::clone(&backend)).await.unwrap();
    assert!(outcome.success);
    assert_eq!(backend.finished(), vec!["B", "A"]);
}

#[tokio::test]
async fn race_fails_once_every_command_exited_without_readiness() {
    init_tracing();

    let options = RawOptionsBuilder::new()
        .commands(&["A", "B", "C"])
        .parallel(true)
        .ready_when("ready")
        .build();
    let backend = Arc::new(
        FakeBackend::new()
            .with_command("A", FakeCommand::fail_after(30))
            .with_command("B", FakeCommand::fail_after(5))
            .with_command("C", FakeCommand::fail_after(15)),
    );

    let outcome = execute(&options, Arc::clone(&backend)).await.unwrap();
    assert!(!outcome.success);
    assert_eq!(backend.finished(), vec!["B", "C", "A"]);
}

#[tokio::test]
async fn race_error_is_fatal_even_after_a_non_ready_exit() {
    init_tracing();

    let options = RawOptionsBuilder::new()
        .commands(&["A", "B"])
        .parallel(true)
        .ready_when("ready")
        .build();
    let backend = Arc::new(
        FakeBackend::new()
            .with_command("A", FakeCommand::fail_after(5))
            .with_command("B", FakeCommand::error_after(20, "cannot spawn")),
    );

    let err = execute(&options, backend).await.unwrap_err();
    assert!(matches!(err, RunCommandsError::Execution(_)));
    assert!(err.to_string().contains("cannot spawn"));
}

#[tokio::test]
async fn race_ignores_max_parallel() {
    init_tracing();

    let options = RawOptionsBuilder::new()
        .commands(&["A", "B", "C"])
        .parallel(true)
        .max_parallel(1)
        .ready_when("ready")
        .build();
    let backend = Arc::new(
        FakeBackend::new()
            .with_command("A", FakeCommand::ok_after(50))
            .with_command("B", FakeCommand::ok_after(50))
            .with_command("C", FakeCommand::ok_after(5)),
    );

    let outcome = execute(&options, Arc::clone(&backend)).await.unwrap();
    assert!(outcome.success);
    assert_eq!(backend.started().len(), 3);
}

#[tokio::test]
async fn empty_command_list_succeeds_in_every_parallel_mode() {
    init_tracing();

    let backend = Arc::new(FakeBackend::new());

    let bounded = RawOptionsBuilder::new()
        .commands(&[])
        .parallel(true)
        .max_parallel(2)
        .build();
    let race = RawOptionsBuilder::new()
        .commands(&[])
        .parallel(true)
        .ready_when("ready")
        .build();

    assert!(execute(&bounded, Arc::clone(&backend)).await.unwrap().success);
    assert!(execute(&race, Arc::clone(&backend)).await.unwrap().success);
    assert!(backend.started().is_empty());
}

#[test]
fn mode_is_selected_from_options() {
    let serial = RawOptionsBuilder::new().commands(&["a"]).build();
    assert_eq!(ExecutionMode::from_options(&serial), ExecutionMode::Serial);

    let bounded = RawOptionsBuilder::new()
        .commands(&["a"])
        .parallel(true)
        .max_parallel(3)
        .build();
    assert_eq!(
        ExecutionMode::from_options(&bounded),
        ExecutionMode::Parallel { max_parallel: Some(3) }
    );

    let race = RawOptionsBuilder::new()
        .commands(&["a"])
        .parallel(true)
        .ready_when("up")
        .build();
    assert_eq!(
        ExecutionMode::from_options(&race),
        ExecutionMode::Race { ready_when: "up".to_string() }
    );
}

#[tokio::test]
async fn forwarded_args_reach_the_backend() {
    init_tracing();

    let options = RawOptionsBuilder::new()
        .commands(&["serve", "echo {args.port}"])
        .command_entry("lint", false)
        .parallel(true)
        .args("--port=4200")
        .build();
    let backend = Arc::new(FakeBackend::new());

    execute(&options, Arc::clone(&backend)).await.unwrap();

    let mut started = backend.started();
    started.sort();
    assert_eq!(started, vec!["echo 4200", "lint", "serve --port=4200"]);
}

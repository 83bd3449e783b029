// tests/output_pump.rs

use tokio::sync::mpsc;

use run_commands::exec::output::{pump, MarkerScanner};

#[test]
fn scanner_finds_marker_inside_a_chunk() {
    let mut scanner = MarkerScanner::new("ready");
    assert!(!scanner.feed(b"starting up\n"));
    assert!(scanner.feed(b"server ready on :4200\n"));
    assert!(scanner.matched());
}

#[test]
fn scanner_finds_marker_split_across_chunks() {
    let mut scanner = MarkerScanner::new("listening");
    assert!(!scanner.feed(b"now liste"));
    assert!(scanner.feed(b"ning on port 80"));
}

#[test]
fn scanner_reports_only_the_first_match() {
    let mut scanner = MarkerScanner::new("ok");
    assert!(scanner.feed(b"ok"));
    assert!(!scanner.feed(b"ok again"));
    assert!(scanner.matched());
}

#[tokio::test]
async fn pump_forwards_everything_and_signals_readiness() {
    let input: &[u8] = b"line one\nthe app is ready\nline three\n";
    let mut sink: Vec<u8> = Vec::new();
    let (ready_tx, mut ready_rx) = mpsc::channel(1);

    pump(input, &mut sink, Some(MarkerScanner::new("ready")), ready_tx).await;

    assert_eq!(sink, input);
    assert!(ready_rx.try_recv().is_ok());
}

#[tokio::test]
async fn pump_without_scanner_never_signals() {
    let input: &[u8] = b"ready ready ready\n";
    let mut sink: Vec<u8> = Vec::new();
    let (ready_tx, mut ready_rx) = mpsc::channel(1);

    pump(input, &mut sink, None, ready_tx).await;

    assert_eq!(sink, input);
    assert!(ready_rx.try_recv().is_err());
}

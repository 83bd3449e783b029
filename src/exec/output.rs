// src/exec/output.rs

//! Live output forwarding for child processes.
//!
//! Each child stream is copied chunk by chunk to the orchestrator's own
//! stdout/stderr. Concurrent children share those sinks without any
//! serialization, so their output interleaves in arrival order.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, trace};

const CHUNK_SIZE: usize = 8 * 1024;

/// Incremental substring search over a byte stream.
///
/// Keeps the last `marker.len() - 1` bytes between chunks so a marker split
/// across two reads is still found.
#[derive(Debug, Clone)]
pub struct MarkerScanner {
    marker: Vec<u8>,
    tail: Vec<u8>,
    matched: bool,
}

impl MarkerScanner {
    pub fn new(marker: &str) -> Self {
        Self {
            marker: marker.as_bytes().to_vec(),
            tail: Vec::new(),
            matched: false,
        }
    }

    /// Feed the next chunk. Returns `true` only for the chunk that completes
    /// the first match.
    pub fn feed(&mut self, chunk: &[u8]) -> bool {
        if self.matched {
            return false;
        }

        let mut window = std::mem::take(&mut self.tail);
        window.extend_from_slice(chunk);

        if contains(&window, &self.marker) {
            self.matched = true;
            return true;
        }

        let keep = self.marker.len().saturating_sub(1).min(window.len());
        self.tail = window.split_off(window.len() - keep);
        false
    }

    pub fn matched(&self) -> bool {
        self.matched
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

/// Copy `reader` into `writer` until EOF, signalling `ready_tx` once if the
/// scanner sees its marker.
pub async fn pump<R, W>(
    mut reader: R,
    mut writer: W,
    mut scanner: Option<MarkerScanner>,
    ready_tx: mpsc::Sender<()>,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!(error = %e, "reading child output failed; stopping pump");
                break;
            }
        };
        let chunk = &buf[..n];
        trace!(bytes = n, "forwarding child output");

        if let Err(e) = writer.write_all(chunk).await {
            debug!(error = %e, "writing child output failed");
        }
        let _ = writer.flush().await;

        if let Some(scanner) = scanner.as_mut() {
            if scanner.feed(chunk) {
                let _ = ready_tx.try_send(());
            }
        }
    }
}

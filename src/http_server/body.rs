//! Streaming response bodies
//!
//! Bridges a synchronous `io::Write` producer to an axum `Body`. The
//! producer runs on the blocking pool and pushes chunks through a bounded
//! channel, so at most `capacity` chunks are held in memory.

use std::io::{self, Write};

use axum::body::{Body, Bytes};
use futures_util::stream;
use tokio::sync::mpsc;

use crate::observability::{log_event, Event};

type Chunk = io::Result<Bytes>;

/// `io::Write` half of a streaming body
///
/// Writes fail with `BrokenPipe` once the body has been dropped, e.g.
/// because the client disconnected.
pub struct BodyWriter {
    tx: mpsc::Sender<Chunk>,
}

impl Write for BodyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .blocking_send(Ok(Bytes::copy_from_slice(buf)))
            .map_err(|_| disconnected())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.tx.is_closed() {
            return Err(disconnected());
        }
        Ok(())
    }
}

fn disconnected() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "response body dropped")
}

/// Run `produce` on the blocking pool and stream what it writes
///
/// If `produce` fails or panics, an error is pushed after the bytes already
/// written, so the transport aborts the response instead of ending it
/// cleanly. Must be called from within a tokio runtime.
pub fn stream_body<F>(capacity: usize, produce: F) -> Body
where
    F: FnOnce(BodyWriter) -> io::Result<()> + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Chunk>(capacity.max(1));
    let writer = BodyWriter { tx: tx.clone() };

    let task = tokio::task::spawn_blocking(move || produce(writer));
    tokio::spawn(async move {
        let failure = match task.await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e),
            Err(join) => Some(io::Error::other(format!("body producer aborted: {}", join))),
        };
        if let Some(e) = failure {
            log_event(Event::StreamAborted, &e.to_string());
            // the receiver is gone if the client disconnected
            let _ = tx.send(Err(e)).await;
        }
    });

    let chunks = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (chunk, rx))
    });
    Body::from_stream(chunks)
}

//! Buffered sink decorator
//!
//! Moves any sink onto a bounded worker queue so the dispatching thread
//! never waits on slow IO. `emit` hands the event to the worker and returns;
//! a full queue drops the event rather than blocking. Delivery failures
//! inside the worker go to the diagnostic stream, since by then there is no
//! caller left to tell.

use crate::core::diagnostic;
use crate::core::error::{PipelineError, Result, SinkError};
use crate::core::event::LogEvent;
use crate::core::sink::Sink;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

enum Command {
    Emit(LogEvent),
    Flush(Sender<()>),
}

/// Decorator that queues events for a worker-owned inner sink.
///
/// # Example
///
/// ```
/// use rust_log_pipeline::prelude::*;
/// use rust_log_pipeline::sinks::BufferedSink;
///
/// let buffered = BufferedSink::new(ConsoleSink::new(), 1024).unwrap();
/// let pipeline = Pipeline::builder().sink(buffered).build();
/// let _ = pipeline.info("Queued, not written inline");
/// ```
pub struct BufferedSink {
    sender: Option<Sender<Command>>,
    worker: Option<JoinHandle<()>>,
    name: String,
    capacity: usize,
    dropped: AtomicU64,
}

impl BufferedSink {
    /// Wrap `inner` behind a bounded queue of `capacity` events.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero capacity.
    pub fn new(inner: impl Sink + 'static, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(PipelineError::config(
                "buffered sink",
                "capacity must be greater than zero",
            ));
        }

        let name = format!("buffered({})", inner.name());
        let (sender, receiver) = bounded(capacity);
        let worker = thread::spawn(move || worker_loop(inner, receiver));

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            name,
            capacity,
            dropped: AtomicU64::new(0),
        })
    }

    /// Events dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

fn worker_loop(mut inner: impl Sink, receiver: Receiver<Command>) {
    while let Ok(command) = receiver.recv() {
        match command {
            Command::Emit(event) => {
                if let Err(error) = inner.emit(&event) {
                    diagnostic::write(format!(
                        "buffered delivery to '{}' failed: {}",
                        inner.name(),
                        error
                    ));
                }
            }
            Command::Flush(ack) => {
                if let Err(error) = inner.flush() {
                    diagnostic::write(format!(
                        "buffered flush of '{}' failed: {}",
                        inner.name(),
                        error
                    ));
                }
                let _ = ack.send(());
            }
        }
    }

    // Channel closed: every queued event has been drained above
    if let Err(error) = inner.flush() {
        diagnostic::write(format!(
            "final flush of '{}' failed: {}",
            inner.name(),
            error
        ));
    }
}

impl Sink for BufferedSink {
    fn emit(&mut self, event: &LogEvent) -> std::result::Result<(), SinkError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| SinkError::other("buffered sink already shut down"))?;

        match sender.try_send(Command::Emit(event.clone())) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                diagnostic::write(format!(
                    "'{}' queue full ({} events), dropped event ({} dropped so far)",
                    self.name, self.capacity, dropped
                ));
                Err(SinkError::buffer_full(self.capacity))
            }
            Err(TrySendError::Disconnected(_)) => {
                Err(SinkError::other("buffered sink worker stopped"))
            }
        }
    }

    /// Round-trips through the worker, so every event queued before this
    /// call has reached the inner sink when it returns.
    fn flush(&mut self) -> std::result::Result<(), SinkError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| SinkError::other("buffered sink already shut down"))?;

        let (ack_sender, ack_receiver) = bounded(1);
        sender
            .send(Command::Flush(ack_sender))
            .map_err(|_| SinkError::other("buffered sink worker stopped"))?;
        ack_receiver
            .recv_timeout(FLUSH_TIMEOUT)
            .map_err(|_| SinkError::other("flush acknowledgement timed out"))?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for BufferedSink {
    fn drop(&mut self) {
        // Close the channel to signal the worker
        drop(self.sender.take());

        // Wait for the worker to finish draining queued events
        if let Some(worker) = self.worker.take() {
            let start = Instant::now();
            loop {
                if worker.is_finished() {
                    if worker.join().is_err() {
                        diagnostic::write(format!("'{}' worker panicked during shutdown", self.name));
                    }
                    break;
                }
                if start.elapsed() >= SHUTDOWN_TIMEOUT {
                    diagnostic::write(format!(
                        "'{}' worker did not drain within {:?}, queued events may be lost",
                        self.name, SHUTDOWN_TIMEOUT
                    ));
                    break;
                }
                thread::sleep(Duration::from_millis(10));
            }
        }
    }
}

//! Sink trait definition

use crate::core::error::SinkError;
use crate::core::event::LogEvent;

/// Destination for dispatched events.
///
/// A sink may buffer or forward asynchronously internally, but `emit` must
/// not block the dispatcher indefinitely.
pub trait Sink: Send + Sync {
    /// Deliver one event. A failure is isolated by the dispatcher and
    /// handled through this sink's failure policy; it never affects other
    /// sinks.
    fn emit(&mut self, event: &LogEvent) -> Result<(), SinkError>;

    /// Flush any internal buffering to the underlying destination.
    fn flush(&mut self) -> Result<(), SinkError>;

    fn name(&self) -> &str;
}

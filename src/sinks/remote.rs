//! Remote sink for shipping events over TCP
//!
//! Sends line-delimited JSON to a remote collector.
//! Useful for centralized logging in distributed systems.

use crate::core::error::{PipelineError, Result, SinkError};
use crate::core::event::LogEvent;
use crate::core::output_format::OutputFormat;
use crate::core::sink::Sink;
use crate::core::timestamp::TimestampFormat;
use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Remote sink that ships events to a TCP collector as JSON lines
///
/// # Example
///
/// ```no_run
/// use rust_log_pipeline::prelude::*;
/// use rust_log_pipeline::sinks::RemoteSink;
///
/// let sink = RemoteSink::connect_lazy("127.0.0.1:9200");
///
/// let pipeline = Pipeline::builder().sink(sink).build();
/// let _ = pipeline.info("This event ships to 127.0.0.1:9200");
/// ```
pub struct RemoteSink {
    stream: Option<TcpStream>,
    address: String,
    reconnect_on_error: bool,
    timestamp_format: TimestampFormat,
}

impl RemoteSink {
    /// Connect immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails
    pub fn new(addr: impl ToSocketAddrs + ToString) -> Result<Self> {
        let mut sink = Self::connect_lazy(addr.to_string());
        sink.connect()
            .map_err(|source| PipelineError::sink_failure("remote", source))?;
        Ok(sink)
    }

    /// Defer the connection to the first emit. Construction never fails;
    /// an unreachable collector surfaces as a `SinkError` at emit time and
    /// goes through the sink's failure policy.
    pub fn connect_lazy(addr: impl ToString) -> Self {
        Self {
            stream: None,
            address: addr.to_string(),
            reconnect_on_error: true,
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Enable or disable automatic reconnection on errors
    ///
    /// Default: enabled
    #[must_use]
    pub fn with_reconnect(mut self, enable: bool) -> Self {
        self.reconnect_on_error = enable;
        self
    }

    /// Set the timestamp format for the shipped JSON
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn connect(&mut self) -> std::result::Result<(), SinkError> {
        let stream = TcpStream::connect(&self.address)
            .map_err(|error| SinkError::connection(&self.address, error.to_string()))?;

        // Timeouts keep a stalled collector from hanging the dispatcher
        stream.set_write_timeout(Some(IO_TIMEOUT))?;
        stream.set_read_timeout(Some(IO_TIMEOUT))?;
        stream.set_nodelay(true)?;

        self.stream = Some(stream);
        Ok(())
    }
}

impl Sink for RemoteSink {
    fn emit(&mut self, event: &LogEvent) -> std::result::Result<(), SinkError> {
        let mut line = OutputFormat::Json.format(event, &self.timestamp_format);
        line.push('\n');

        if self.stream.is_none() {
            self.connect()?;
        }

        let result = match self.stream.as_mut() {
            Some(stream) => stream.write_all(line.as_bytes()),
            None => return Err(SinkError::connection(&self.address, "not connected")),
        };

        match result {
            Ok(()) => Ok(()),
            Err(error) => {
                // Connection lost
                self.stream = None;

                if self.reconnect_on_error {
                    // Try to reconnect and resend once
                    self.connect().map_err(|reconnect_error| {
                        SinkError::connection(
                            &self.address,
                            format!("send failed: {} (reconnect: {})", error, reconnect_error),
                        )
                    })?;
                    if let Some(stream) = self.stream.as_mut() {
                        stream.write_all(line.as_bytes())?;
                    }
                    Ok(())
                } else {
                    Err(error.into())
                }
            }
        }
    }

    fn flush(&mut self) -> std::result::Result<(), SinkError> {
        if let Some(ref mut stream) = self.stream {
            stream.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "remote"
    }
}

impl Drop for RemoteSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed
        let _ = self.flush();
    }
}

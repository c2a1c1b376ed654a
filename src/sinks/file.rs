//! File sink implementation

use crate::core::error::{PipelineError, Result, SinkError};
use crate::core::event::LogEvent;
use crate::core::output_format::OutputFormat;
use crate::core::sink::Sink;
use crate::core::timestamp::TimestampFormat;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Appends formatted events to a file, one line per event.
///
/// # Example
///
/// ```no_run
/// use rust_log_pipeline::sinks::FileSink;
/// use rust_log_pipeline::OutputFormat;
///
/// let sink = FileSink::new("/var/log/app.log")
///     .unwrap()
///     .with_output_format(OutputFormat::Json);
/// ```
pub struct FileSink {
    writer: Option<BufWriter<File>>,
    output_format: OutputFormat,
    timestamp_format: TimestampFormat,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|error| {
                PipelineError::sink_failure("file", SinkError::io_operation("open log file", error))
            })?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            output_format: OutputFormat::default(),
            timestamp_format: TimestampFormat::default(),
        })
    }

    /// Set the output format for this sink
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the timestamp format for this sink
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set a custom timestamp format using a strftime-compatible format string
    #[must_use]
    pub fn with_custom_timestamp(mut self, format_str: &str) -> Self {
        self.timestamp_format = TimestampFormat::Custom(format_str.to_string());
        self
    }
}

impl Sink for FileSink {
    fn emit(&mut self, event: &LogEvent) -> std::result::Result<(), SinkError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| SinkError::other("file writer not initialized"))?;

        let mut output = self.output_format.format(event, &self.timestamp_format);
        output.push('\n');

        writer.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> std::result::Result<(), SinkError> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}

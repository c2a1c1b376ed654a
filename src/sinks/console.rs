//! Console sink implementation

use crate::core::error::SinkError;
use crate::core::event::LogEvent;
use crate::core::level::Level;
use crate::core::output_format::OutputFormat;
use crate::core::sink::Sink;
use crate::core::template::sanitize;
use crate::core::timestamp::TimestampFormat;
use colored::Colorize;
use std::collections::BTreeSet;

pub struct ConsoleSink {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    /// Set the output format for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_pipeline::sinks::ConsoleSink;
    /// use rust_log_pipeline::OutputFormat;
    ///
    /// let sink = ConsoleSink::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the timestamp format for this sink
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_log_pipeline::sinks::ConsoleSink;
    /// use rust_log_pipeline::TimestampFormat;
    ///
    /// let sink = ConsoleSink::new()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
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

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn emit(&mut self, event: &LogEvent) -> Result<(), SinkError> {
        let output = match self.output_format {
            OutputFormat::Text => self.format_text(event),
            OutputFormat::Json | OutputFormat::Logfmt => {
                self.output_format.format(event, &self.timestamp_format)
            }
        };

        // Route Error and Fatal levels to stderr, others to stdout
        match event.level {
            Level::Error | Level::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        use std::io::Write;
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

impl ConsoleSink {
    /// Format as text with optional colors. Mirrors [`OutputFormat::Text`]
    /// but colors the level column.
    fn format_text(&self, event: &LogEvent) -> String {
        let level_str = if self.use_colors {
            format!("{:7}", event.level.to_str())
                .color(event.level.color_code())
                .to_string()
        } else {
            format!("{:7}", event.level.to_str())
        };

        let mut line = format!(
            "[{}] [{}] {}",
            self.timestamp_format.format(&event.timestamp),
            level_str,
            event.render_message()
        );

        let bound: BTreeSet<&str> = event.template.hole_names().collect();
        let leftover: Vec<String> = event
            .properties
            .iter()
            .filter(|(name, _)| !bound.contains(name.as_str()))
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        if !leftover.is_empty() {
            line.push_str(" (");
            line.push_str(&leftover.join(", "));
            line.push(')');
        }

        if let Some(ref exception) = event.exception {
            line.push_str("\n  exception: ");
            line.push_str(&sanitize(&exception.to_string()));
        }

        line
    }
}

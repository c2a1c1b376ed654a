//! Output format configuration for sinks
//!
//! Provides different output formats for dispatched events:
//! - Text: Human-readable format (default)
//! - Json: Machine-readable JSON format
//! - Logfmt: Key-value format compatible with log aggregation tools

use super::event::LogEvent;
use super::template::sanitize;
use super::timestamp::TimestampFormat;
use super::value::PropertyValue;
use std::collections::BTreeSet;

/// Output format for dispatched events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO   ] Hello, world! (MachineName=web01)`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"timestamp":"2025-01-08T10:30:45.123Z","level":"INFO","message":"Hello, world!"}`
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `timestamp=2025-01-08T10:30:45.123Z level=INFO message="Hello, world!"`
    Logfmt,
}

impl OutputFormat {
    /// Format an event according to this output format
    pub fn format(&self, event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => self.format_text(event, timestamp_format),
            OutputFormat::Json => self.format_json(event, timestamp_format),
            OutputFormat::Logfmt => self.format_logfmt(event, timestamp_format),
        }
    }

    /// Format as human-readable text. Properties already rendered into the
    /// message through template holes are not repeated; the remaining ones
    /// (context and enricher contributions) are appended in parentheses.
    fn format_text(&self, event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
        let mut line = format!(
            "[{}] [{:7}] {}",
            timestamp_format.format(&event.timestamp),
            event.level.to_str(),
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

    /// Format as JSON
    fn format_json(&self, event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            self.format_timestamp_json(event, timestamp_format),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(event.level.to_str().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(event.render_message()),
        );
        json_obj.insert(
            "template".to_string(),
            serde_json::Value::String(event.template.raw().to_string()),
        );

        if !event.properties.is_empty() {
            let properties: serde_json::Map<String, serde_json::Value> = event
                .properties
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json_value()))
                .collect();
            json_obj.insert(
                "properties".to_string(),
                serde_json::Value::Object(properties),
            );
        }

        if let Some(ref exception) = event.exception {
            let mut exc_obj = serde_json::Map::new();
            exc_obj.insert(
                "message".to_string(),
                serde_json::Value::String(exception.message.clone()),
            );
            if !exception.causes.is_empty() {
                exc_obj.insert(
                    "causes".to_string(),
                    serde_json::Value::Array(
                        exception
                            .causes
                            .iter()
                            .map(|c| serde_json::Value::String(c.clone()))
                            .collect(),
                    ),
                );
            }
            json_obj.insert("exception".to_string(), serde_json::Value::Object(exc_obj));
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }

    /// Format timestamp for JSON output
    fn format_timestamp_json(
        &self,
        event: &LogEvent,
        timestamp_format: &TimestampFormat,
    ) -> serde_json::Value {
        if timestamp_format.is_numeric() {
            serde_json::Value::Number(event.timestamp.timestamp_millis().into())
        } else {
            serde_json::Value::String(timestamp_format.format(&event.timestamp))
        }
    }

    /// Format as logfmt (key=value pairs)
    fn format_logfmt(&self, event: &LogEvent, timestamp_format: &TimestampFormat) -> String {
        let mut parts = Vec::new();

        parts.push(format!(
            "timestamp={}",
            self.escape_logfmt_value(&timestamp_format.format(&event.timestamp))
        ));
        parts.push(format!("level={}", event.level.to_str()));
        parts.push(format!(
            "message={}",
            self.quote_logfmt_value(&event.render_message())
        ));

        for (name, value) in &event.properties {
            let formatted_value = match value {
                PropertyValue::String(s) => self.quote_logfmt_value(s),
                PropertyValue::Int(i) => i.to_string(),
                PropertyValue::Float(f) => f.to_string(),
                PropertyValue::Bool(b) => b.to_string(),
                PropertyValue::Null => "null".to_string(),
                PropertyValue::Seq(_) | PropertyValue::Map(_) => {
                    self.quote_logfmt_value(&value.to_json_value().to_string())
                }
            };
            parts.push(format!("{}={}", self.escape_logfmt_key(name), formatted_value));
        }

        if let Some(ref exception) = event.exception {
            parts.push(format!(
                "exception={}",
                self.quote_logfmt_value(&exception.to_string())
            ));
        }

        parts.join(" ")
    }

    /// Escape a logfmt key (remove spaces and special chars)
    fn escape_logfmt_key(&self, key: &str) -> String {
        key.chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
            .collect()
    }

    /// Escape a logfmt value (quote if contains spaces)
    fn escape_logfmt_value(&self, value: &str) -> String {
        if value.contains(' ') || value.contains('"') || value.contains('=') {
            self.quote_logfmt_value(value)
        } else {
            value.to_string()
        }
    }

    /// Quote a logfmt value
    fn quote_logfmt_value(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

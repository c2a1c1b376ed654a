//! Log event structure

use crate::core::level::Level;
use crate::core::template::MessageTemplate;
use crate::core::value::{PropertyMap, PropertyValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Captured error attached to an event: the message plus its `source()` chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionRecord {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ExceptionRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Capture an error and its full `source()` chain.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: err.to_string(),
            causes,
        }
    }
}

impl fmt::Display for ExceptionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for cause in &self.causes {
            write!(f, "; caused by: {}", cause)?;
        }
        Ok(())
    }
}

/// A single structured log event.
///
/// Events are assembled by the pipeline (context, enrichers, bound template
/// arguments, explicit properties, in that order) and are immutable once
/// dispatch begins: sinks only ever see `&LogEvent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub template: MessageTemplate,
    pub properties: PropertyMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionRecord>,
}

impl LogEvent {
    pub fn new(level: Level, template: MessageTemplate) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            template,
            properties: PropertyMap::new(),
            exception: None,
        }
    }

    /// Set a property, overriding any existing value of the same name.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Set a property only if no value of that name is present. Enrichers
    /// that must not clobber earlier contributions use this.
    pub fn add_property_if_absent(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) {
        self.properties.entry(name.into()).or_insert_with(|| value.into());
    }

    #[inline]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    #[inline]
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.set_property(name, value);
        self
    }

    pub fn set_exception(&mut self, exception: ExceptionRecord) {
        self.exception = Some(exception);
    }

    pub fn with_exception(mut self, exception: ExceptionRecord) -> Self {
        self.exception = Some(exception);
        self
    }

    /// Render the message template against this event's properties.
    pub fn render_message(&self) -> String {
        self.template.render(&self.properties)
    }
}

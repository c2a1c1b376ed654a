//! Fluent event construction
//!
//! Builds a single event step by step when the plain `log_with` call gets
//! awkward: explicit properties that are not template holes, an attached
//! exception, or arguments collected across several statements.

use crate::core::error::Result;
use crate::core::event::ExceptionRecord;
use crate::core::level::Level;
use crate::core::pipeline::Pipeline;
use crate::core::value::{PropertyMap, PropertyValue};
use std::error::Error;

/// Builder for a single log event.
///
/// Nothing happens until [`dispatch`](EventBuilder::dispatch) is called;
/// dropping the builder discards it.
///
/// # Example
///
/// ```
/// use rust_log_pipeline::prelude::*;
///
/// let pipeline = Pipeline::builder().sink(ConsoleSink::new()).build();
///
/// let _ = pipeline
///     .event(Level::Warning)
///     .template("Disk {Volume} at {UsedPercent}% capacity")
///     .arg("C:")
///     .arg(91)
///     .property("Host", "web-01")
///     .dispatch();
/// ```
#[must_use = "the event is only emitted by dispatch()"]
pub struct EventBuilder<'a> {
    pipeline: &'a Pipeline,
    level: Level,
    template: String,
    args: Vec<PropertyValue>,
    properties: PropertyMap,
    exception: Option<ExceptionRecord>,
}

impl<'a> EventBuilder<'a> {
    pub(crate) fn new(pipeline: &'a Pipeline, level: Level) -> Self {
        Self {
            pipeline,
            level,
            template: String::new(),
            args: Vec::new(),
            properties: PropertyMap::new(),
            exception: None,
        }
    }

    /// Set the message template.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Append a positional template argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<PropertyValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Attach an explicit property. Explicit properties resolve last, so a
    /// name that collides with a template hole or an enricher keeps this
    /// value.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Attach an exception captured from an error value, including its
    /// source chain.
    #[must_use]
    pub fn exception(mut self, error: &dyn Error) -> Self {
        self.exception = Some(ExceptionRecord::from_error(error));
        self
    }

    /// Attach an already-built exception record.
    #[must_use]
    pub fn exception_record(mut self, record: ExceptionRecord) -> Self {
        self.exception = Some(record);
        self
    }

    /// Assemble the event and run it through the pipeline.
    pub fn dispatch(self) -> Result<()> {
        self.pipeline.emit_event(
            self.level,
            &self.template,
            &self.args,
            self.properties,
            self.exception,
        )
    }
}

impl Pipeline {
    /// Start building an event at `level`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_pipeline::prelude::*;
    ///
    /// let pipeline = Pipeline::new();
    /// let _ = pipeline
    ///     .event(Level::Error)
    ///     .template("Payment {PaymentId} rejected")
    ///     .arg("p-2041")
    ///     .dispatch();
    /// ```
    pub fn event(&self, level: Level) -> EventBuilder<'_> {
        EventBuilder::new(self, level)
    }
}

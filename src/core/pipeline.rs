//! Pipeline assembly and dispatch
//!
//! The [`Pipeline`] owns the level gate, the enricher chain, and the sink
//! list. Dispatch is synchronous and caller-driven: a log call assembles the
//! event on the calling thread, runs the enrichers, and blocks until every
//! sink has been attempted. The pipeline spawns no background threads of its
//! own; a sink that wants a queue brings one (see
//! [`BufferedSink`](crate::sinks::buffered::BufferedSink)).

use crate::core::context::ContextStack;
use crate::core::diagnostic;
use crate::core::dispatch::{self, SinkHost};
use crate::core::enrich::Enricher;
use crate::core::error::Result;
use crate::core::event::{ExceptionRecord, LogEvent};
use crate::core::level::Level;
use crate::core::policy::FailurePolicy;
use crate::core::sink::Sink;
use crate::core::stats::DispatchStats;
use crate::core::template::MessageTemplate;
use crate::core::value::{PropertyMap, PropertyValue};
use parking_lot::RwLock;
use std::sync::Arc;

/// A configured logging pipeline.
///
/// # Example
///
/// ```
/// use rust_log_pipeline::prelude::*;
///
/// let pipeline = Pipeline::builder()
///     .minimum_level(Level::Debug)
///     .sink(ConsoleSink::new())
///     .build();
///
/// let _ = pipeline.info("Pipeline ready");
/// let _ = pipeline.log_with(Level::Debug, "Dividing {A} by {B}", &[10.into(), 2.into()]);
/// ```
pub struct Pipeline {
    min_level: Arc<RwLock<Level>>,
    enrichers: Vec<Box<dyn Enricher>>,
    sinks: Arc<RwLock<Vec<SinkHost>>>,
    stats: Arc<DispatchStats>,
}

impl Pipeline {
    /// An empty pipeline: default level, no enrichers, no sinks.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// The level gate. Calls below the minimum level construct no event and
    /// run no enricher.
    #[inline]
    pub fn should_log(&self, level: Level) -> bool {
        level >= *self.min_level.read()
    }

    pub fn set_min_level(&self, level: Level) {
        *self.min_level.write() = level;
    }

    pub fn minimum_level(&self) -> Level {
        *self.min_level.read()
    }

    /// Log a message with no template arguments.
    pub fn log(&self, level: Level, template: &str) -> Result<()> {
        self.emit_event(level, template, &[], PropertyMap::new(), None)
    }

    /// Log a message template, binding `args` to its holes positionally.
    /// Surplus arguments are dropped; unmatched holes render literally.
    ///
    /// The `Err` case only occurs through a sink whose failure policy raises
    /// to the caller.
    pub fn log_with(&self, level: Level, template: &str, args: &[PropertyValue]) -> Result<()> {
        self.emit_event(level, template, args, PropertyMap::new(), None)
    }

    pub fn verbose(&self, template: &str) -> Result<()> {
        self.log(Level::Verbose, template)
    }

    pub fn debug(&self, template: &str) -> Result<()> {
        self.log(Level::Debug, template)
    }

    pub fn info(&self, template: &str) -> Result<()> {
        self.log(Level::Information, template)
    }

    pub fn warn(&self, template: &str) -> Result<()> {
        self.log(Level::Warning, template)
    }

    pub fn error(&self, template: &str) -> Result<()> {
        self.log(Level::Error, template)
    }

    pub fn fatal(&self, template: &str) -> Result<()> {
        self.log(Level::Fatal, template)
    }

    /// Assemble and dispatch one event. Property resolution order: context
    /// stack, then enrichers, then template-bound arguments and explicit
    /// properties.
    pub(crate) fn emit_event(
        &self,
        level: Level,
        template_text: &str,
        args: &[PropertyValue],
        explicit: PropertyMap,
        exception: Option<ExceptionRecord>,
    ) -> Result<()> {
        if !self.should_log(level) {
            self.stats.record_suppressed();
            return Ok(());
        }

        let template = MessageTemplate::parse(template_text);
        let bound = template.bind(args);
        let mut event = LogEvent::new(level, template);

        for (name, value) in ContextStack::current_properties() {
            event.set_property(name, value);
        }
        for enricher in &self.enrichers {
            enricher.enrich(&mut event);
        }
        for (name, value) in bound {
            event.set_property(name, value);
        }
        for (name, value) in explicit {
            event.set_property(name, value);
        }
        if let Some(exception) = exception {
            event.set_exception(exception);
        }

        self.stats.record_dispatched();
        let mut sinks = self.sinks.write();
        dispatch::dispatch(sinks.as_mut_slice(), &event, &self.stats)
    }

    /// Flush every sink (and fallback), attempting all of them.
    pub fn flush(&self) -> Result<()> {
        let mut sinks = self.sinks.write();
        dispatch::flush_all(sinks.as_mut_slice())
    }

    /// Explicit shutdown: flush everything, then release the sinks so their
    /// own drop logic (buffer drains, file handles) runs now rather than at
    /// some later drop point.
    pub fn close_and_flush(&self) -> Result<()> {
        let result = self.flush();
        self.sinks.write().clear();
        result
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if let Err(error) = self.flush() {
            diagnostic::write(format!("flush during drop failed: {}", error));
        }
        let failures = self.stats.sink_failures();
        if failures > 0 {
            diagnostic::write(format!(
                "pipeline dropped with {} sink failures recorded",
                failures
            ));
        }
    }
}

/// Fluent construction for [`Pipeline`]. The sink list and enricher chain
/// are fixed once `build` is called.
pub struct PipelineBuilder {
    min_level: Level,
    enrichers: Vec<Box<dyn Enricher>>,
    sinks: Vec<SinkHost>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            min_level: Level::default(),
            enrichers: Vec::new(),
            sinks: Vec::new(),
        }
    }

    #[must_use]
    pub fn minimum_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Append an enricher to the chain. Enrichers run in registration order;
    /// a later enricher may override an earlier one.
    #[must_use]
    pub fn enrich(mut self, enricher: impl Enricher + 'static) -> Self {
        self.enrichers.push(Box::new(enricher));
        self
    }

    /// Register a sink with the default failure policy (diagnostic log
    /// only).
    #[must_use]
    pub fn sink(self, sink: impl Sink + 'static) -> Self {
        self.sink_with_policy(sink, FailurePolicy::default())
    }

    /// Register a sink with an explicit failure policy. Sinks receive
    /// events in registration order.
    #[must_use]
    pub fn sink_with_policy(mut self, sink: impl Sink + 'static, policy: FailurePolicy) -> Self {
        self.sinks.push(SinkHost {
            sink: Box::new(sink),
            policy,
        });
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            min_level: Arc::new(RwLock::new(self.min_level)),
            enrichers: self.enrichers,
            sinks: Arc::new(RwLock::new(self.sinks)),
            stats: Arc::new(DispatchStats::new()),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

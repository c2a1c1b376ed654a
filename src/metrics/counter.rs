//! Pipeline-backed counters
//!
//! A [`Counter`] tracks a signed running value and, when configured, emits a
//! log event through its pipeline on every change. Emission is synchronous
//! on the mutating thread.

use crate::core::diagnostic;
use crate::core::level::Level;
use crate::core::pipeline::Pipeline;
use crate::core::value::{PropertyMap, PropertyValue};
use std::sync::atomic::{AtomicI64, Ordering};

const COUNTER_TEMPLATE: &str = "{CounterName} = {CounterValue} {CounterUnit}";

/// A named counter bound to a pipeline.
///
/// # Example
///
/// ```
/// use rust_log_pipeline::prelude::*;
///
/// let pipeline = Pipeline::builder().sink(ConsoleSink::new()).build();
/// let active = pipeline.counter("ActiveSessions", "sessions", true, Level::Debug);
///
/// active.increment();
/// active.increment();
/// active.decrement();
/// assert_eq!(active.value(), 1);
/// ```
pub struct Counter<'a> {
    pipeline: &'a Pipeline,
    name: String,
    unit: String,
    emit_on_change: bool,
    level: Level,
    value: AtomicI64,
}

impl<'a> Counter<'a> {
    pub(crate) fn new(
        pipeline: &'a Pipeline,
        name: impl Into<String>,
        unit: impl Into<String>,
        emit_on_change: bool,
        level: Level,
    ) -> Self {
        Self {
            pipeline,
            name: name.into(),
            unit: unit.into(),
            emit_on_change,
            level,
            value: AtomicI64::new(0),
        }
    }

    pub fn increment(&self) {
        self.add(1);
    }

    pub fn decrement(&self) {
        self.add(-1);
    }

    /// Adjust by `delta` (may be negative). The emitted value is the one
    /// this particular change produced, even under concurrent updates.
    pub fn add(&self, delta: i64) {
        let value = self.value.fetch_add(delta, Ordering::SeqCst) + delta;
        if self.emit_on_change {
            self.emit(value);
        }
    }

    /// Emit the current value without changing it.
    pub fn write(&self) {
        self.emit(self.value.load(Ordering::SeqCst));
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn emit(&self, value: i64) {
        let result = self.pipeline.emit_event(
            self.level,
            COUNTER_TEMPLATE,
            &[
                PropertyValue::from(self.name.as_str()),
                PropertyValue::from(value),
                PropertyValue::from(self.unit.as_str()),
            ],
            PropertyMap::new(),
            None,
        );
        if let Err(error) = result {
            diagnostic::write(format!("counter '{}' failed to emit: {}", self.name, error));
        }
    }
}

impl Pipeline {
    /// Create a counter bound to this pipeline. With `emit_on_change` set,
    /// every increment, decrement, or `add` emits an event at `level`.
    pub fn counter(
        &self,
        name: impl Into<String>,
        unit: impl Into<String>,
        emit_on_change: bool,
        level: Level,
    ) -> Counter<'_> {
        Counter::new(self, name, unit, emit_on_change, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SinkError;
    use crate::core::event::LogEvent;
    use crate::core::sink::Sink;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CollectingSink {
        events: Arc<Mutex<Vec<LogEvent>>>,
    }

    impl Sink for CollectingSink {
        fn emit(&mut self, event: &LogEvent) -> Result<(), SinkError> {
            self.events.lock().push(event.clone());
            Ok(())
        }

        fn flush(&mut self) -> Result<(), SinkError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "collecting"
        }
    }

    fn pipeline_with(sink: CollectingSink) -> Pipeline {
        Pipeline::builder()
            .minimum_level(Level::Verbose)
            .sink(sink)
            .build()
    }

    #[test]
    fn test_counter_emits_each_change() {
        let sink = CollectingSink::default();
        let pipeline = pipeline_with(sink.clone());
        let counter = pipeline.counter("Widgets", "items", true, Level::Information);

        counter.increment();
        counter.increment();
        counter.decrement();
        counter.add(5);

        let events = sink.events.lock();
        let values: Vec<i64> = events
            .iter()
            .map(|e| e.property("CounterValue").and_then(|v| v.as_i64()).unwrap())
            .collect();
        assert_eq!(values, vec![1, 2, 1, 6]);
        assert_eq!(events[0].render_message(), "Widgets = 1 items");
    }

    #[test]
    fn test_silent_counter_tracks_without_emitting() {
        let sink = CollectingSink::default();
        let pipeline = pipeline_with(sink.clone());
        let counter = pipeline.counter("Quiet", "ops", false, Level::Information);

        counter.increment();
        counter.add(10);

        assert_eq!(counter.value(), 11);
        assert!(sink.events.lock().is_empty());

        counter.write();
        let events = sink.events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].render_message(), "Quiet = 11 ops");
    }

    #[test]
    fn test_counter_respects_level_gate() {
        let sink = CollectingSink::default();
        let pipeline = Pipeline::builder()
            .minimum_level(Level::Warning)
            .sink(sink.clone())
            .build();
        let counter = pipeline.counter("Gated", "items", true, Level::Debug);

        counter.increment();

        assert_eq!(counter.value(), 1);
        assert!(sink.events.lock().is_empty());
    }

    #[test]
    fn test_counter_value_survives_negative_territory() {
        let pipeline = Pipeline::new();
        let counter = pipeline.counter("Net", "units", false, Level::Information);

        counter.decrement();
        counter.add(-4);
        assert_eq!(counter.value(), -5);
    }
}

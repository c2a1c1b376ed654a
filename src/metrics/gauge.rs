//! Sampled gauges
//!
//! A [`Gauge`] holds a sampling closure and emits one event per `write`
//! call with the sampled value. A panic inside the sampler is contained: it
//! is reported on the diagnostic stream and no event is emitted.

use crate::core::diagnostic;
use crate::core::dispatch::panic_message;
use crate::core::level::Level;
use crate::core::pipeline::Pipeline;
use crate::core::value::{PropertyMap, PropertyValue};
use std::panic::{catch_unwind, AssertUnwindSafe};

const GAUGE_TEMPLATE: &str = "{GaugeName} = {GaugeValue} {GaugeUnit}";

/// A named gauge bound to a pipeline and a sampling closure.
///
/// # Example
///
/// ```
/// use rust_log_pipeline::prelude::*;
///
/// let pipeline = Pipeline::builder().sink(ConsoleSink::new()).build();
/// let queue_depth = pipeline.gauge("QueueDepth", "messages", || 3.0);
///
/// queue_depth.write();
/// ```
pub struct Gauge<'a, F>
where
    F: Fn() -> f64,
{
    pipeline: &'a Pipeline,
    name: String,
    unit: String,
    sample: F,
    level: Level,
}

impl<'a, F> Gauge<'a, F>
where
    F: Fn() -> f64,
{
    pub(crate) fn new(
        pipeline: &'a Pipeline,
        name: impl Into<String>,
        unit: impl Into<String>,
        sample: F,
    ) -> Self {
        Self {
            pipeline,
            name: name.into(),
            unit: unit.into(),
            sample,
            level: Level::Information,
        }
    }

    /// Level of the emitted events. Defaults to [`Level::Information`].
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample the closure and emit the value. A sampler panic never
    /// propagates to the caller.
    pub fn write(&self) {
        let value = match catch_unwind(AssertUnwindSafe(&self.sample)) {
            Ok(value) => value,
            Err(panic) => {
                diagnostic::write(format!(
                    "gauge '{}' sampler panicked: {}",
                    self.name,
                    panic_message(panic)
                ));
                return;
            }
        };

        let result = self.pipeline.emit_event(
            self.level,
            GAUGE_TEMPLATE,
            &[
                PropertyValue::from(self.name.as_str()),
                PropertyValue::from(value),
                PropertyValue::from(self.unit.as_str()),
            ],
            PropertyMap::new(),
            None,
        );
        if let Err(error) = result {
            diagnostic::write(format!("gauge '{}' failed to emit: {}", self.name, error));
        }
    }
}

impl Pipeline {
    /// Create a gauge bound to this pipeline. `sample` runs on every
    /// [`write`](Gauge::write) call, on the calling thread.
    pub fn gauge<F>(&self, name: impl Into<String>, unit: impl Into<String>, sample: F) -> Gauge<'_, F>
    where
        F: Fn() -> f64,
    {
        Gauge::new(self, name, unit, sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SinkError;
    use crate::core::event::LogEvent;
    use crate::core::sink::Sink;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
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
    fn test_gauge_samples_on_each_write() {
        let sink = CollectingSink::default();
        let pipeline = pipeline_with(sink.clone());

        let samples = Arc::new(Mutex::new(VecDeque::from(vec![0.0, 12.5, 7.0])));
        let source = samples.clone();
        let gauge = pipeline.gauge("Depth", "messages", move || {
            source.lock().pop_front().unwrap_or(0.0)
        });

        gauge.write();
        gauge.write();
        gauge.write();

        let events = sink.events.lock();
        let values: Vec<f64> = events
            .iter()
            .map(|e| e.property("GaugeValue").and_then(|v| v.as_f64()).unwrap())
            .collect();
        assert_eq!(values, vec![0.0, 12.5, 7.0]);
        assert_eq!(events[1].render_message(), "Depth = 12.5 messages");
    }

    #[test]
    fn test_gauge_with_level() {
        let sink = CollectingSink::default();
        let pipeline = pipeline_with(sink.clone());

        let gauge = pipeline
            .gauge("CpuLoad", "percent", || 40.0)
            .with_level(Level::Debug);
        gauge.write();

        assert_eq!(sink.events.lock()[0].level, Level::Debug);
    }

    #[test]
    fn test_sampler_panic_is_contained() {
        let sink = CollectingSink::default();
        let pipeline = pipeline_with(sink.clone());

        let gauge = pipeline.gauge("Broken", "units", || panic!("sampler exploded"));
        gauge.write();

        assert!(sink.events.lock().is_empty());
    }

    #[test]
    fn test_gauge_respects_level_gate() {
        let sink = CollectingSink::default();
        let pipeline = Pipeline::builder()
            .minimum_level(Level::Error)
            .sink(sink.clone())
            .build();

        pipeline.gauge("Quiet", "units", || 1.0).write();
        assert!(sink.events.lock().is_empty());
    }
}

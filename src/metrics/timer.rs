//! Scoped operation timing
//!
//! An [`OperationTimer`] measures one operation and emits exactly one
//! completion event when the scope ends, whether the scope exits normally,
//! early through `?`, or during a panic unwind. An optional threshold
//! escalates slow completions to a more severe level.

use crate::core::diagnostic;
use crate::core::event::ExceptionRecord;
use crate::core::level::Level;
use crate::core::pipeline::Pipeline;
use crate::core::value::{PropertyMap, PropertyValue};
use std::time::{Duration, Instant};

const COMPLETED_TEMPLATE: &str = "{OperationDescription} completed in {ElapsedMilliseconds} ms";
const BREACHED_TEMPLATE: &str =
    "{OperationDescription} exceeded the {ThresholdMilliseconds} ms threshold, completed in {ElapsedMilliseconds} ms";

/// Configures an [`OperationTimer`] before it starts measuring.
#[must_use = "call begin() to start the timer"]
pub struct TimedOperationBuilder<'a> {
    pipeline: &'a Pipeline,
    description: String,
    identifier: Option<String>,
    level: Level,
    threshold: Option<(Duration, Level)>,
}

impl<'a> TimedOperationBuilder<'a> {
    pub(crate) fn new(pipeline: &'a Pipeline, description: impl Into<String>) -> Self {
        Self {
            pipeline,
            description: description.into(),
            identifier: None,
            level: Level::Information,
            threshold: None,
        }
    }

    /// Attach an `OperationId` property to the completion event.
    #[must_use]
    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Level of the completion event when no threshold is breached.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Escalate the completion event to `slow_level` when the operation
    /// takes `threshold` or longer.
    #[must_use]
    pub fn warn_if_exceeds(mut self, threshold: Duration, slow_level: Level) -> Self {
        self.threshold = Some((threshold, slow_level));
        self
    }

    /// Start measuring. The clock starts here, not at `timed()`.
    pub fn begin(self) -> OperationTimer<'a> {
        OperationTimer {
            pipeline: self.pipeline,
            description: self.description,
            identifier: self.identifier,
            level: self.level,
            threshold: self.threshold,
            started: Instant::now(),
            completed: false,
        }
    }
}

/// A running operation measurement.
///
/// Emits its completion event exactly once: on [`complete`](Self::complete)
/// or, failing that, on drop. A second completion is a no-op.
///
/// # Example
///
/// ```
/// use rust_log_pipeline::prelude::*;
/// use std::time::Duration;
///
/// let pipeline = Pipeline::builder().sink(ConsoleSink::new()).build();
///
/// {
///     let _timer = pipeline
///         .timed("Process invoice batch")
///         .identifier("batch-7")
///         .warn_if_exceeds(Duration::from_millis(500), Level::Warning)
///         .begin();
///     // work happens here; the event fires when _timer drops
/// }
/// ```
pub struct OperationTimer<'a> {
    pipeline: &'a Pipeline,
    description: String,
    identifier: Option<String>,
    level: Level,
    threshold: Option<(Duration, Level)>,
    started: Instant,
    completed: bool,
}

impl<'a> OperationTimer<'a> {
    /// Elapsed time so far.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Complete the operation now and emit the event. Dropping the timer
    /// afterwards emits nothing further.
    pub fn complete(mut self) {
        self.finish();
    }

    /// Complete with an error attached to the completion event. The event
    /// is emitted at the escalated level if a threshold was breached,
    /// otherwise at [`Level::Error`].
    pub fn complete_with_error(mut self, error: &dyn std::error::Error) {
        self.finish_with(Some(ExceptionRecord::from_error(error)));
    }

    fn finish(&mut self) {
        self.finish_with(None);
    }

    fn finish_with(&mut self, exception: Option<ExceptionRecord>) {
        if self.completed {
            return;
        }
        self.completed = true;

        let elapsed = self.started.elapsed();
        let elapsed_ms = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);

        let breached = self
            .threshold
            .filter(|(threshold, _)| elapsed >= *threshold);

        let mut level = match breached {
            Some((_, slow_level)) => slow_level,
            None => self.level,
        };
        if exception.is_some() && level < Level::Error {
            level = Level::Error;
        }

        let mut explicit = PropertyMap::new();
        if let Some(identifier) = &self.identifier {
            explicit.insert("OperationId".to_string(), identifier.clone().into());
        }

        let result = match breached {
            Some((threshold, _)) => {
                let threshold_ms = i64::try_from(threshold.as_millis()).unwrap_or(i64::MAX);
                self.pipeline.emit_event(
                    level,
                    BREACHED_TEMPLATE,
                    &[
                        PropertyValue::from(self.description.as_str()),
                        PropertyValue::from(threshold_ms),
                        PropertyValue::from(elapsed_ms),
                    ],
                    explicit,
                    exception,
                )
            }
            None => self.pipeline.emit_event(
                level,
                COMPLETED_TEMPLATE,
                &[
                    PropertyValue::from(self.description.as_str()),
                    PropertyValue::from(elapsed_ms),
                ],
                explicit,
                exception,
            ),
        };

        if let Err(error) = result {
            diagnostic::write(format!(
                "timed operation '{}' failed to emit: {}",
                self.description, error
            ));
        }
    }
}

impl Drop for OperationTimer<'_> {
    fn drop(&mut self) {
        // also fires during unwind, so an abandoned scope still reports
        self.finish();
    }
}

impl Pipeline {
    /// Configure a timed operation. Measuring starts at `begin()`.
    pub fn timed(&self, description: impl Into<String>) -> TimedOperationBuilder<'_> {
        TimedOperationBuilder::new(self, description)
    }

    /// Start a timed operation with default settings.
    pub fn begin_timed(&self, description: impl Into<String>) -> OperationTimer<'_> {
        self.timed(description).begin()
    }
}

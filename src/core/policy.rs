//! Per-sink failure handling

use crate::core::event::LogEvent;
use crate::core::sink::Sink;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with the event a sink failed to deliver. Panics inside
/// the callback are caught by the dispatcher and reported on the diagnostic
/// stream.
pub type FailureCallback = Arc<dyn Fn(&LogEvent) + Send + Sync>;

/// What the dispatcher does when a sink fails to emit an event.
///
/// Any combination may be enabled; per failure the dispatcher applies them
/// in a fixed order: diagnostic line, fallback hop, callback, raise. The
/// fallback receives the event exactly as the failing sink saw it, and a
/// failing fallback is never chained further. The default policy writes a
/// diagnostic line and nothing else.
pub struct FailurePolicy {
    pub(crate) write_to_diagnostic_log: bool,
    pub(crate) fallback: Option<Box<dyn Sink>>,
    pub(crate) callback: Option<FailureCallback>,
    pub(crate) raise_to_caller: bool,
}

impl FailurePolicy {
    pub fn new() -> Self {
        Self {
            write_to_diagnostic_log: true,
            fallback: None,
            callback: None,
            raise_to_caller: false,
        }
    }

    /// No handling at all: failures are swallowed silently. The dispatcher
    /// still attempts every other sink.
    pub fn silent() -> Self {
        Self {
            write_to_diagnostic_log: false,
            fallback: None,
            callback: None,
            raise_to_caller: false,
        }
    }

    #[must_use]
    pub fn with_diagnostic_log(mut self, enabled: bool) -> Self {
        self.write_to_diagnostic_log = enabled;
        self
    }

    /// Deliver events the sink failed to emit to `sink` instead. At most one
    /// hop: the fallback's own failures are diagnosed, never chained.
    #[must_use]
    pub fn with_fallback(mut self, sink: impl Sink + 'static) -> Self {
        self.fallback = Some(Box::new(sink));
        self
    }

    #[must_use]
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LogEvent) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    /// Return the failure from the originating log call. The error is
    /// surfaced only after every sink has been attempted.
    #[must_use]
    pub fn with_raise_to_caller(mut self, enabled: bool) -> Self {
        self.raise_to_caller = enabled;
        self
    }

    #[inline]
    pub fn writes_diagnostic_log(&self) -> bool {
        self.write_to_diagnostic_log
    }

    #[inline]
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    #[inline]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    #[inline]
    pub fn raises_to_caller(&self) -> bool {
        self.raise_to_caller
    }
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailurePolicy")
            .field("write_to_diagnostic_log", &self.write_to_diagnostic_log)
            .field("fallback", &self.fallback.as_ref().map(|s| s.name()))
            .field("callback", &self.callback.is_some())
            .field("raise_to_caller", &self.raise_to_caller)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SinkError;

    struct NullSink;

    impl Sink for NullSink {
        fn emit(&mut self, _event: &LogEvent) -> Result<(), SinkError> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), SinkError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "null"
        }
    }

    #[test]
    fn test_default_policy_is_diagnostic_only() {
        let policy = FailurePolicy::default();
        assert!(policy.writes_diagnostic_log());
        assert!(!policy.has_fallback());
        assert!(!policy.has_callback());
        assert!(!policy.raises_to_caller());
    }

    #[test]
    fn test_silent_policy_disables_everything() {
        let policy = FailurePolicy::silent();
        assert!(!policy.writes_diagnostic_log());
        assert!(!policy.raises_to_caller());
    }

    #[test]
    fn test_builder_combines_handlers() {
        let policy = FailurePolicy::new()
            .with_fallback(NullSink)
            .with_callback(|_event: &LogEvent| {})
            .with_raise_to_caller(true);
        assert!(policy.has_fallback());
        assert!(policy.has_callback());
        assert!(policy.raises_to_caller());
        let debug = format!("{:?}", policy);
        assert!(debug.contains("null"));
    }
}

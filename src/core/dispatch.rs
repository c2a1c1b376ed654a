//! Event fan-out
//!
//! Every dispatched event is offered to every sink in registration order. A
//! failing sink (an `Err` from emit, or a panic caught at the sink boundary)
//! never short-circuits fan-out: the failure is handled through that sink's
//! policy and the remaining sinks are still attempted.

use crate::core::diagnostic;
use crate::core::error::{PipelineError, SinkError};
use crate::core::event::LogEvent;
use crate::core::policy::FailurePolicy;
use crate::core::sink::Sink;
use crate::core::stats::DispatchStats;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// A registered sink paired with its failure policy.
pub(crate) struct SinkHost {
    pub(crate) sink: Box<dyn Sink>,
    pub(crate) policy: FailurePolicy,
}

/// Offer `event` to every host, applying failure policies per sink.
///
/// Returns the first failure whose policy raises to the caller, and only
/// after every sink has been attempted.
pub(crate) fn dispatch(
    hosts: &mut [SinkHost],
    event: &LogEvent,
    stats: &DispatchStats,
) -> Result<(), PipelineError> {
    let mut raised = None;

    for host in hosts.iter_mut() {
        stats.record_sink_attempt();
        let error = match attempt_emit(host.sink.as_mut(), event) {
            None => continue,
            Some(error) => error,
        };

        stats.record_sink_failure();
        let sink_name = host.sink.name().to_string();

        if host.policy.write_to_diagnostic_log {
            diagnostic::write(format!(
                "sink '{}' failed to emit [{} {}]: {}",
                sink_name,
                event.level,
                event.render_message(),
                error
            ));
        }

        // One hop only: a failing fallback is diagnosed, never chained.
        if let Some(fallback) = host.policy.fallback.as_mut() {
            match attempt_emit(fallback.as_mut(), event) {
                None => stats.record_fallback_delivery(),
                Some(fallback_error) => {
                    stats.record_fallback_failure();
                    if host.policy.write_to_diagnostic_log {
                        diagnostic::write(format!(
                            "fallback sink '{}' also failed: {}",
                            fallback.name(),
                            fallback_error
                        ));
                    }
                }
            }
        }

        if let Some(callback) = host.policy.callback.as_ref() {
            if catch_unwind(AssertUnwindSafe(|| callback(event))).is_err() {
                stats.record_callback_panic();
                diagnostic::write(format!(
                    "failure callback for sink '{}' panicked",
                    sink_name
                ));
            }
        }

        if host.policy.raise_to_caller && raised.is_none() {
            raised = Some(PipelineError::sink_failure(sink_name, error));
        }
    }

    match raised {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Flush every sink and every fallback, attempting all of them and
/// returning the first error encountered.
pub(crate) fn flush_all(hosts: &mut [SinkHost]) -> Result<(), PipelineError> {
    let mut first_error = None;

    for host in hosts.iter_mut() {
        if let Err(error) = host.sink.flush() {
            if first_error.is_none() {
                first_error = Some(PipelineError::sink_failure(host.sink.name(), error));
            }
        }
        if let Some(fallback) = host.policy.fallback.as_mut() {
            if let Err(error) = fallback.flush() {
                if first_error.is_none() {
                    first_error = Some(PipelineError::sink_failure(fallback.name(), error));
                }
            }
        }
    }

    match first_error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Run one emit inside a panic boundary. `None` on success.
fn attempt_emit(sink: &mut dyn Sink, event: &LogEvent) -> Option<SinkError> {
    match catch_unwind(AssertUnwindSafe(|| sink.emit(event))) {
        Ok(Ok(())) => None,
        Ok(Err(error)) => Some(error),
        Err(panic) => Some(SinkError::Panicked(panic_message(panic))),
    }
}

pub(crate) fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::core::template::MessageTemplate;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CollectingSink {
        name: &'static str,
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl CollectingSink {
        fn named(name: &'static str) -> Self {
            Self {
                name,
                messages: Arc::default(),
            }
        }
    }

    impl Sink for CollectingSink {
        fn emit(&mut self, event: &LogEvent) -> Result<(), SinkError> {
            self.messages.lock().push(event.render_message());
            Ok(())
        }

        fn flush(&mut self) -> Result<(), SinkError> {
            Ok(())
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    struct FailingSink;

    impl Sink for FailingSink {
        fn emit(&mut self, _event: &LogEvent) -> Result<(), SinkError> {
            Err(SinkError::other("emit refused"))
        }

        fn flush(&mut self) -> Result<(), SinkError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn emit(&mut self, _event: &LogEvent) -> Result<(), SinkError> {
            panic!("sink exploded");
        }

        fn flush(&mut self) -> Result<(), SinkError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn event(message: &str) -> LogEvent {
        LogEvent::new(Level::Information, MessageTemplate::parse(message))
    }

    fn host(sink: impl Sink + 'static, policy: FailurePolicy) -> SinkHost {
        SinkHost {
            sink: Box::new(sink),
            policy: policy.with_diagnostic_log(false),
        }
    }

    #[test]
    fn test_failure_does_not_stop_fan_out() {
        let first = CollectingSink::named("first");
        let last = CollectingSink::named("last");
        let mut hosts = vec![
            host(first.clone(), FailurePolicy::silent()),
            host(FailingSink, FailurePolicy::silent()),
            host(last.clone(), FailurePolicy::silent()),
        ];
        let stats = DispatchStats::new();

        dispatch(&mut hosts, &event("hello"), &stats).unwrap();

        assert_eq!(first.messages.lock().as_slice(), ["hello"]);
        assert_eq!(last.messages.lock().as_slice(), ["hello"]);
        assert_eq!(stats.sink_attempts(), 3);
        assert_eq!(stats.sink_failures(), 1);
    }

    #[test]
    fn test_panicking_sink_is_isolated() {
        let survivor = CollectingSink::named("survivor");
        let mut hosts = vec![
            host(PanickingSink, FailurePolicy::silent()),
            host(survivor.clone(), FailurePolicy::silent()),
        ];
        let stats = DispatchStats::new();

        dispatch(&mut hosts, &event("still delivered"), &stats).unwrap();

        assert_eq!(survivor.messages.lock().as_slice(), ["still delivered"]);
        assert_eq!(stats.sink_failures(), 1);
    }

    #[test]
    fn test_fallback_receives_failed_event() {
        let fallback = CollectingSink::named("fallback");
        let mut hosts = vec![host(
            FailingSink,
            FailurePolicy::silent().with_fallback(fallback.clone()),
        )];
        let stats = DispatchStats::new();

        dispatch(&mut hosts, &event("rescued"), &stats).unwrap();

        assert_eq!(fallback.messages.lock().as_slice(), ["rescued"]);
        assert_eq!(stats.fallback_deliveries(), 1);
    }

    #[test]
    fn test_failing_fallback_is_not_chained() {
        let mut hosts = vec![host(
            FailingSink,
            FailurePolicy::silent().with_fallback(PanickingSink),
        )];
        let stats = DispatchStats::new();

        dispatch(&mut hosts, &event("lost"), &stats).unwrap();

        assert_eq!(stats.fallback_failures(), 1);
        assert_eq!(stats.fallback_deliveries(), 0);
    }

    #[test]
    fn test_callback_panic_is_swallowed() {
        let after = CollectingSink::named("after");
        let mut hosts = vec![
            host(
                FailingSink,
                FailurePolicy::silent()
                    .with_callback(|_event: &LogEvent| panic!("callback exploded")),
            ),
            host(after.clone(), FailurePolicy::silent()),
        ];
        let stats = DispatchStats::new();

        dispatch(&mut hosts, &event("continues"), &stats).unwrap();

        assert_eq!(stats.callback_panics(), 1);
        assert_eq!(after.messages.lock().as_slice(), ["continues"]);
    }

    #[test]
    fn test_raise_to_caller_returns_after_all_sinks() {
        let last = CollectingSink::named("last");
        let mut hosts = vec![
            host(FailingSink, FailurePolicy::silent().with_raise_to_caller(true)),
            host(last.clone(), FailurePolicy::silent()),
        ];
        let stats = DispatchStats::new();

        let result = dispatch(&mut hosts, &event("raised"), &stats);

        assert!(matches!(
            result,
            Err(PipelineError::SinkFailure { ref sink, .. }) if sink == "failing"
        ));
        // the later sink was still attempted
        assert_eq!(last.messages.lock().as_slice(), ["raised"]);
    }
}

//! # Rust Log Pipeline
//!
//! A structured logging pipeline: message templates, ambient context
//! propagation, pluggable sinks with per-sink failure isolation, and
//! operation metrics that report through the same sinks.
//!
//! ## Features
//!
//! - **Message Templates**: `{Name}` holes bind positional arguments into
//!   first-class event properties
//! - **Ambient Context**: thread-local property scopes that enrich every
//!   event dispatched while they are open
//! - **Failure Isolation**: every sink is attempted on every event; a
//!   failing sink is handled by its own policy (diagnostic line, fallback
//!   sink, callback, or raising to the caller)
//! - **Operation Helpers**: scoped timers with threshold escalation,
//!   counters, and sampled gauges
//!
//! ```
//! use rust_log_pipeline::prelude::*;
//!
//! let pipeline = Pipeline::builder()
//!     .minimum_level(Level::Debug)
//!     .enrich(MachineNameEnricher::new())
//!     .sink(ConsoleSink::new())
//!     .build();
//!
//! let _order = ContextStack::push("OrderId", "o-1842");
//! let _ = pipeline.log_with(
//!     Level::Information,
//!     "Order {OrderId} accepted for {Customer}",
//!     &["o-1842".into(), "acme".into()],
//! );
//! ```

pub mod core;
pub mod macros;
pub mod metrics;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
    pub use crate::core::{
        ContextScope, ContextStack, DispatchStats, Enricher, EventBuilder, ExceptionRecord,
        FailureCallback, FailurePolicy, Level, LogEvent, MachineNameEnricher, MessageTemplate,
        OutputFormat, Pipeline, PipelineBuilder, PipelineError, ProcessIdEnricher, PropertyEnricher,
        PropertyMap, PropertyValue, Result, Sink, SinkError, ThreadIdEnricher, TimestampFormat,
    };
    pub use crate::metrics::{Counter, Gauge, OperationTimer};
}

#[cfg(feature = "console")]
pub use crate::sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use crate::sinks::FileSink;
#[cfg(feature = "network")]
pub use crate::sinks::RemoteSink;
pub use crate::core::diagnostic;
pub use crate::core::{
    ContextScope, ContextStack, DispatchStats, Enricher, EventBuilder, ExceptionRecord,
    FailureCallback, FailurePolicy, Level, LogEvent, MachineNameEnricher, MessageTemplate,
    OutputFormat, Pipeline, PipelineBuilder, PipelineError, ProcessIdEnricher, PropertyEnricher,
    PropertyMap, PropertyValue, Result, Sink, SinkError, TemplateToken, ThreadIdEnricher,
    TimestampFormat,
};
pub use crate::metrics::{Counter, Gauge, OperationTimer, TimedOperationBuilder};
pub use crate::sinks::BufferedSink;

//! Core pipeline types and traits

pub mod builder;
pub mod context;
pub mod diagnostic;
pub(crate) mod dispatch;
pub mod enrich;
pub mod error;
pub mod event;
pub mod level;
pub mod output_format;
pub mod pipeline;
pub mod policy;
pub mod sink;
pub mod stats;
pub mod template;
pub mod timestamp;
pub mod value;

pub use builder::EventBuilder;
pub use context::{ContextScope, ContextStack};
pub use enrich::{
    Enricher, MachineNameEnricher, ProcessIdEnricher, PropertyEnricher, ThreadIdEnricher,
};
pub use error::{PipelineError, Result, SinkError};
pub use event::{ExceptionRecord, LogEvent};
pub use level::Level;
pub use output_format::OutputFormat;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use policy::{FailureCallback, FailurePolicy};
pub use sink::Sink;
pub use stats::DispatchStats;
pub use template::{MessageTemplate, TemplateToken};
pub use timestamp::TimestampFormat;
pub use value::{PropertyMap, PropertyValue};

//! Operation helpers layered on the pipeline
//!
//! Timers, counters, and gauges that report through the same sinks as
//! ordinary log events. Helpers never return errors; a failed emission goes
//! to the diagnostic stream instead.

pub mod counter;
pub mod gauge;
pub mod timer;

pub use counter::Counter;
pub use gauge::Gauge;
pub use timer::{OperationTimer, TimedOperationBuilder};

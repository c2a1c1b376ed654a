//! Logging macros for ergonomic template dispatch.
//!
//! The macros wrap [`Pipeline::log_with`](crate::Pipeline::log_with):
//! arguments are converted through [`PropertyValue::from`](crate::PropertyValue)
//! and bound to the template holes positionally. Each macro evaluates to the
//! dispatch `Result`.
//!
//! # Examples
//!
//! ```
//! use rust_log_pipeline::prelude::*;
//! use rust_log_pipeline::info;
//!
//! let pipeline = Pipeline::new();
//!
//! // Basic logging
//! let _ = info!(pipeline, "Server started");
//!
//! // With template arguments
//! let port = 8080;
//! let _ = info!(pipeline, "Server listening on port {Port}", port);
//! ```

/// Log a message template at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_log_pipeline::prelude::*;
/// # let pipeline = Pipeline::new();
/// use rust_log_pipeline::log;
/// let _ = log!(pipeline, Level::Information, "Simple message");
/// let _ = log!(pipeline, Level::Error, "Error code: {Code}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($pipeline:expr, $level:expr, $template:expr) => {
        $pipeline.log($level, $template)
    };
    ($pipeline:expr, $level:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $pipeline.log_with($level, $template, &[$($crate::PropertyValue::from($arg)),+])
    };
}

/// Log a verbose-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_pipeline::prelude::*;
/// # let pipeline = Pipeline::new();
/// # pipeline.set_min_level(Level::Verbose);
/// use rust_log_pipeline::verbose;
/// let _ = verbose!(pipeline, "Entering handler");
/// let _ = verbose!(pipeline, "Cursor at {Position}", 42);
/// ```
#[macro_export]
macro_rules! verbose {
    ($pipeline:expr, $($rest:tt)+) => {
        $crate::log!($pipeline, $crate::Level::Verbose, $($rest)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_pipeline::prelude::*;
/// # let pipeline = Pipeline::new();
/// # pipeline.set_min_level(Level::Debug);
/// use rust_log_pipeline::debug;
/// let _ = debug!(pipeline, "Cache warmed");
/// let _ = debug!(pipeline, "Loaded {Count} entries", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($pipeline:expr, $($rest:tt)+) => {
        $crate::log!($pipeline, $crate::Level::Debug, $($rest)+)
    };
}

/// Log an information-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_pipeline::prelude::*;
/// # let pipeline = Pipeline::new();
/// use rust_log_pipeline::info;
/// let _ = info!(pipeline, "Application started");
/// let _ = info!(pipeline, "Processing {Count} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($pipeline:expr, $($rest:tt)+) => {
        $crate::log!($pipeline, $crate::Level::Information, $($rest)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_pipeline::prelude::*;
/// # let pipeline = Pipeline::new();
/// use rust_log_pipeline::warn;
/// let _ = warn!(pipeline, "Low disk space");
/// let _ = warn!(pipeline, "Retry attempt {Attempt} of {Limit}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($pipeline:expr, $($rest:tt)+) => {
        $crate::log!($pipeline, $crate::Level::Warning, $($rest)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_pipeline::prelude::*;
/// # let pipeline = Pipeline::new();
/// use rust_log_pipeline::error;
/// let _ = error!(pipeline, "Failed to connect to database");
/// let _ = error!(pipeline, "Status {Code}: {Reason}", 500, "internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($pipeline:expr, $($rest:tt)+) => {
        $crate::log!($pipeline, $crate::Level::Error, $($rest)+)
    };
}

/// Log a fatal-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_pipeline::prelude::*;
/// # let pipeline = Pipeline::new();
/// use rust_log_pipeline::fatal;
/// let _ = fatal!(pipeline, "Critical system failure");
/// let _ = fatal!(pipeline, "Unable to recover: {Reason}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($pipeline:expr, $($rest:tt)+) => {
        $crate::log!($pipeline, $crate::Level::Fatal, $($rest)+)
    };
}

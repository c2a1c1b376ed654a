//! Error types for the pipeline and its sinks

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failure raised by a sink while emitting or flushing.
///
/// Sink failures never interrupt fan-out: the dispatcher isolates them per
/// sink and applies that sink's failure policy.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// IO error with context
    #[error("IO error while {operation}: {source}")]
    IoOperation {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Connection failure for remote sinks
    #[error("Connection to {address} failed: {message}")]
    ConnectionError { address: String, message: String },

    /// Bounded buffer rejected the event
    #[error("Sink buffer full: {capacity} events queued")]
    BufferFull { capacity: usize },

    /// The sink panicked during emit; the panic was caught by the dispatcher
    #[error("Sink panicked: {0}")]
    Panicked(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl SinkError {
    /// Create an IO operation error with context
    pub fn io_operation(operation: impl Into<String>, source: std::io::Error) -> Self {
        SinkError::IoOperation {
            operation: operation.into(),
            source,
        }
    }

    /// Create a connection error
    pub fn connection(address: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::ConnectionError {
            address: address.into(),
            message: message.into(),
        }
    }

    /// Create a buffer full error
    pub fn buffer_full(capacity: usize) -> Self {
        SinkError::BufferFull { capacity }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SinkError::Other(msg.into())
    }
}

/// Top-level pipeline error.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Invalid configuration, fatal at setup time
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A sink failed and its policy raises the failure to the caller.
    /// Returned only after every sink has been attempted.
    #[error("Sink '{sink}' failed: {source}")]
    SinkFailure {
        sink: String,
        #[source]
        source: SinkError,
    },
}

impl PipelineError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a sink failure error
    pub fn sink_failure(sink: impl Into<String>, source: SinkError) -> Self {
        PipelineError::SinkFailure {
            sink: sink.into(),
            source,
        }
    }
}

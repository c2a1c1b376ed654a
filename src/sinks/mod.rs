//! Sink implementations

pub mod buffered;

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "network")]
pub mod remote;

pub use buffered::BufferedSink;

#[cfg(feature = "console")]
pub use console::ConsoleSink;
#[cfg(feature = "file")]
pub use file::FileSink;
#[cfg(feature = "network")]
pub use remote::RemoteSink;

pub use crate::core::Sink;

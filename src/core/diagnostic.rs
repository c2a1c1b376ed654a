//! Process-wide diagnostic stream
//!
//! The pipeline never reports its own failures through the sinks it manages;
//! a broken sink would swallow the report describing its own breakage.
//! Failures are written to this separate stream instead: a single
//! process-wide writer, disabled until one is installed. Lines bypass the
//! dispatcher entirely and are never enriched or level-gated.

use chrono::Utc;
use parking_lot::Mutex;
use std::io::Write;

static OUTPUT: Mutex<Option<Box<dyn Write + Send>>> = Mutex::new(None);

/// Install a writer for diagnostic output. Replaces any previous writer.
pub fn enable<W: Write + Send + 'static>(writer: W) {
    *OUTPUT.lock() = Some(Box::new(writer));
}

/// Route diagnostic output to standard error.
pub fn enable_stderr() {
    enable(std::io::stderr());
}

/// Remove the installed writer. Subsequent lines are dropped silently.
pub fn disable() {
    *OUTPUT.lock() = None;
}

pub fn is_enabled() -> bool {
    OUTPUT.lock().is_some()
}

/// Write one timestamped line, best-effort: dropped when no writer is
/// installed, output errors ignored.
pub fn write(line: impl AsRef<str>) {
    let mut output = OUTPUT.lock();
    if let Some(writer) = output.as_mut() {
        let _ = writeln!(
            writer,
            "{} {}",
            Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            line.as_ref()
        );
        let _ = writer.flush();
    }
}

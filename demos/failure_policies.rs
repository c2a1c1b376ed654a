//! Failure policy example
//!
//! Demonstrates per-sink failure isolation: diagnostic reporting, fallback
//! delivery, failure callbacks, and raising to the caller.
//!
//! Run with: cargo run --example failure_policies

use rust_log_pipeline::diagnostic;
use rust_log_pipeline::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Stands in for a collector that is down.
struct UnreachableSink;

impl Sink for UnreachableSink {
    fn emit(&mut self, _event: &LogEvent) -> std::result::Result<(), SinkError> {
        Err(SinkError::connection("10.0.0.7:9200", "connection refused"))
    }

    fn flush(&mut self) -> std::result::Result<(), SinkError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "collector"
    }
}

fn main() -> Result<()> {
    println!("=== Rust Log Pipeline - Failure Policies Example ===\n");

    // Self-monitoring to stderr so sink failures are visible
    diagnostic::enable_stderr();

    let fallback_path = std::env::temp_dir().join("pipeline_fallback.log");
    let fallback = FileSink::new(&fallback_path)?;

    let notifications = Arc::new(AtomicU32::new(0));
    let notified = notifications.clone();

    let pipeline = Pipeline::builder()
        .enrich(MachineNameEnricher::new())
        .sink(ConsoleSink::new())
        .sink_with_policy(
            UnreachableSink,
            FailurePolicy::new()
                .with_fallback(fallback)
                .with_callback(move |event: &LogEvent| {
                    notified.fetch_add(1, Ordering::SeqCst);
                    eprintln!("callback: delivery lost for '{}'", event.render_message());
                }),
        )
        .build();

    println!("1. The console keeps receiving events while the collector fails:");
    pipeline.info("Service started")?;
    pipeline.log_with(Level::Warning, "Retrying {Operation}", &["checkout".into()])?;

    pipeline.close_and_flush()?;

    println!("\n2. Every failed delivery landed in the fallback file:");
    let recovered = std::fs::read_to_string(&fallback_path).unwrap_or_default();
    for line in recovered.lines() {
        println!("   fallback: {}", line);
    }
    println!(
        "   callback notifications: {}",
        notifications.load(Ordering::SeqCst)
    );
    let _ = std::fs::remove_file(&fallback_path);

    println!("\n3. A strict sink raises the failure to the caller:");
    let strict = Pipeline::builder()
        .sink_with_policy(
            UnreachableSink,
            FailurePolicy::new().with_raise_to_caller(true),
        )
        .build();
    match strict.error("Payment failed") {
        Ok(()) => println!("   unexpected success"),
        Err(error) => println!("   caller saw: {}", error),
    }

    diagnostic::disable();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}

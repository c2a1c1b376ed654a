//! Basic pipeline usage example
//!
//! Demonstrates template logging, ambient context scopes, enrichers, timed
//! operations, counters, and gauges over a console sink.
//!
//! Run with: cargo run --example basic_usage

use rust_log_pipeline::prelude::*;
use std::time::Duration;

fn divide(dividend: i64, divisor: i64) -> std::result::Result<i64, std::io::Error> {
    if divisor == 0 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "attempt to divide by zero",
        ));
    }
    Ok(dividend / divisor)
}

fn main() -> Result<()> {
    println!("=== Rust Log Pipeline - Basic Usage Example ===\n");

    let pipeline = Pipeline::builder()
        .minimum_level(Level::Debug)
        .enrich(MachineNameEnricher::new())
        .enrich(ProcessIdEnricher::new())
        .enrich(ThreadIdEnricher::new())
        .sink(ConsoleSink::new())
        .build();

    println!("1. Template logging at different levels:");
    pipeline.debug("Starting up")?;
    pipeline.log_with(Level::Information, "Hello, {Name}!", &["world".into()])?;
    pipeline.log_with(
        Level::Warning,
        "Disk {Volume} at {UsedPercent}% capacity",
        &["C:".into(), 91.into()],
    )?;

    println!("\n2. Ambient context scopes:");
    {
        let _app = ContextStack::push("Application", "demo");
        let _request = ContextStack::push("RequestId", "r-1842");
        pipeline.info("Inside both scopes")?;
        {
            let _inner = ContextStack::push("RequestId", "r-9999");
            pipeline.info("Innermost request id wins")?;
        }
        pipeline.info("Outer value restored")?;
    }

    println!("\n3. Exceptions attached to events:");
    for (dividend, divisor) in [(10, 5), (7, 0)] {
        match divide(dividend, divisor) {
            Ok(quotient) => pipeline.log_with(
                Level::Information,
                "{Dividend} / {Divisor} = {Quotient}",
                &[dividend.into(), divisor.into(), quotient.into()],
            )?,
            Err(error) => pipeline
                .event(Level::Error)
                .template("Division of {Dividend} by {Divisor} failed")
                .arg(dividend)
                .arg(divisor)
                .exception(&error)
                .dispatch()?,
        }
    }

    println!("\n4. Timed operations:");
    {
        // breaches its threshold and escalates to a warning
        let _timer = pipeline
            .timed("Fetch product catalog")
            .identifier("catalog-1")
            .warn_if_exceeds(Duration::from_millis(100), Level::Warning)
            .begin();
        std::thread::sleep(Duration::from_millis(200));
    }
    {
        let _timer = pipeline.begin_timed("Warm cache");
        std::thread::sleep(Duration::from_millis(20));
    }

    println!("\n5. Counters and gauges:");
    let sessions = pipeline.counter("ActiveSessions", "sessions", true, Level::Information);
    sessions.increment();
    sessions.increment();
    sessions.decrement();

    let queue_depth = pipeline.gauge("QueueDepth", "messages", || 3.0);
    queue_depth.write();

    pipeline.close_and_flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}

//! Criterion benchmarks for rust_log_pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_log_pipeline::prelude::*;
use std::sync::Arc;

struct NullSink;

impl Sink for NullSink {
    fn emit(&mut self, _event: &LogEvent) -> std::result::Result<(), SinkError> {
        Ok(())
    }

    fn flush(&mut self) -> std::result::Result<(), SinkError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn null_pipeline() -> Pipeline {
    Pipeline::builder()
        .minimum_level(Level::Verbose)
        .sink(NullSink)
        .build()
}

// ============================================================================
// Template Benchmarks
// ============================================================================

fn bench_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("template");
    group.throughput(Throughput::Elements(1));

    group.bench_function("parse_plain", |b| {
        b.iter(|| {
            let template = MessageTemplate::parse(black_box("Connection established"));
            black_box(template)
        });
    });

    group.bench_function("parse_three_holes", |b| {
        b.iter(|| {
            let template = MessageTemplate::parse(black_box(
                "User {UserId} fetched {Count} rows in {Elapsed} ms",
            ));
            black_box(template)
        });
    });

    let template = MessageTemplate::parse("User {UserId} fetched {Count} rows in {Elapsed} ms");
    let args: Vec<PropertyValue> = vec!["u-1".into(), 250.into(), 12.into()];

    group.bench_function("bind_and_render", |b| {
        b.iter(|| {
            let props = template.bind(black_box(&args));
            black_box(template.render(&props))
        });
    });

    group.finish();
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Elements(1));

    let pipeline = null_pipeline();

    group.bench_function("plain_message", |b| {
        b.iter(|| {
            pipeline.info(black_box("Plain message")).unwrap();
        });
    });

    group.bench_function("template_with_args", |b| {
        b.iter(|| {
            pipeline
                .log_with(
                    Level::Information,
                    black_box("Order {OrderId} for {Customer}"),
                    &["o-1".into(), "acme".into()],
                )
                .unwrap();
        });
    });

    group.bench_function("event_builder", |b| {
        b.iter(|| {
            pipeline
                .event(Level::Information)
                .template(black_box("Order {OrderId}"))
                .arg("o-1")
                .property("Region", "eu-west")
                .dispatch()
                .unwrap();
        });
    });

    let enriched = Pipeline::builder()
        .minimum_level(Level::Verbose)
        .enrich(MachineNameEnricher::new())
        .enrich(ProcessIdEnricher::new())
        .enrich(ThreadIdEnricher::new())
        .sink(NullSink)
        .build();

    group.bench_function("with_three_enrichers", |b| {
        b.iter(|| {
            enriched.info(black_box("Enriched message")).unwrap();
        });
    });

    group.finish();
}

// ============================================================================
// Level Gate Benchmarks
// ============================================================================

fn bench_level_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_gate");
    group.throughput(Throughput::Elements(1));

    let pipeline = Pipeline::builder()
        .minimum_level(Level::Warning)
        .enrich(MachineNameEnricher::new())
        .sink(NullSink)
        .build();

    group.bench_function("suppressed", |b| {
        b.iter(|| {
            pipeline.debug(black_box("Filtered out")).unwrap();
        });
    });

    group.bench_function("passing", |b| {
        b.iter(|| {
            pipeline.error(black_box("Passes the gate")).unwrap();
        });
    });

    group.finish();
}

// ============================================================================
// Context Stack Benchmarks
// ============================================================================

fn bench_context(c: &mut Criterion) {
    let mut group = c.benchmark_group("context");
    group.throughput(Throughput::Elements(1));

    group.bench_function("push_and_drop", |b| {
        b.iter(|| {
            let scope = ContextStack::push(black_box("RequestId"), black_box("r-1"));
            black_box(&scope);
        });
    });

    group.bench_function("current_properties_depth_3", |b| {
        let _a = ContextStack::push("A", 1);
        let _b = ContextStack::push("B", 2);
        let _c = ContextStack::push("C", 3);
        b.iter(|| black_box(ContextStack::current_properties()));
    });

    let pipeline = null_pipeline();
    group.bench_function("dispatch_with_context", |b| {
        let _scope = ContextStack::push("RequestId", "r-1");
        b.iter(|| {
            pipeline.info(black_box("Inside a scope")).unwrap();
        });
    });

    group.finish();
}

// ============================================================================
// Concurrency Benchmarks
// ============================================================================

fn bench_concurrent_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_dispatch");
    group.throughput(Throughput::Elements(400));

    group.bench_function("4_threads_100_events", |b| {
        b.iter(|| {
            let pipeline = Arc::new(null_pipeline());
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let pipeline = pipeline.clone();
                    std::thread::spawn(move || {
                        for i in 0..100 {
                            pipeline
                                .log_with(Level::Information, "Event {Index}", &[i.into()])
                                .unwrap();
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_template,
    bench_dispatch,
    bench_level_gate,
    bench_context,
    bench_concurrent_dispatch
);
criterion_main!(benches);

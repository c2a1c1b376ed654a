//! Event enrichment
//!
//! Enrichers run after the context stack is merged into an event and before
//! explicit per-call properties are applied, in registration order. Each
//! enricher documents whether it adds only missing properties or overrides
//! unconditionally. Enrichers must be side-effect-free; the pipeline skips
//! the whole chain for events suppressed by the level gate.

use crate::core::event::LogEvent;
use crate::core::value::PropertyValue;
use std::cell::RefCell;

/// Contributes ambient properties to events before dispatch.
pub trait Enricher: Send + Sync {
    fn enrich(&self, event: &mut LogEvent);

    fn name(&self) -> &str;
}

/// Attaches a fixed property to every event.
///
/// [`PropertyEnricher::new`] adds the property only when absent;
/// [`PropertyEnricher::overriding`] always sets it.
pub struct PropertyEnricher {
    property: String,
    value: PropertyValue,
    overriding: bool,
}

impl PropertyEnricher {
    pub fn new(property: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            overriding: false,
        }
    }

    pub fn overriding(property: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            overriding: true,
        }
    }
}

impl Enricher for PropertyEnricher {
    fn enrich(&self, event: &mut LogEvent) {
        if self.overriding {
            event.set_property(self.property.clone(), self.value.clone());
        } else {
            event.add_property_if_absent(self.property.clone(), self.value.clone());
        }
    }

    fn name(&self) -> &str {
        "property"
    }
}

/// Adds `MachineName` when absent. The host name is resolved once at
/// construction from the environment (`HOSTNAME`, then `COMPUTERNAME`).
pub struct MachineNameEnricher {
    machine_name: String,
}

impl MachineNameEnricher {
    pub fn new() -> Self {
        let machine_name = std::env::var("HOSTNAME")
            .or_else(|_| std::env::var("COMPUTERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        Self { machine_name }
    }
}

impl Default for MachineNameEnricher {
    fn default() -> Self {
        Self::new()
    }
}

impl Enricher for MachineNameEnricher {
    fn enrich(&self, event: &mut LogEvent) {
        event.add_property_if_absent("MachineName", self.machine_name.as_str());
    }

    fn name(&self) -> &str {
        "machine_name"
    }
}

/// Adds `ProcessId` when absent.
#[derive(Default)]
pub struct ProcessIdEnricher;

impl ProcessIdEnricher {
    pub fn new() -> Self {
        Self
    }
}

impl Enricher for ProcessIdEnricher {
    fn enrich(&self, event: &mut LogEvent) {
        event.add_property_if_absent("ProcessId", std::process::id());
    }

    fn name(&self) -> &str {
        "process_id"
    }
}

// Cached per thread to avoid re-formatting the id on every event.
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn current_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// Adds `ThreadId` when absent.
#[derive(Default)]
pub struct ThreadIdEnricher;

impl ThreadIdEnricher {
    pub fn new() -> Self {
        Self
    }
}

impl Enricher for ThreadIdEnricher {
    fn enrich(&self, event: &mut LogEvent) {
        event.add_property_if_absent("ThreadId", current_thread_id());
    }

    fn name(&self) -> &str {
        "thread_id"
    }
}

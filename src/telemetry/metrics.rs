//! Metric instrument factories.
//!
//! Instruments come from the globally-registered `MeterProvider`; without
//! one they are no-ops, so library code can record unconditionally.

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("eventdesk")
}

/// Counter: records created.
/// Labels: `kind` ("event_request" | "task_distribution").
pub fn records_created() -> Counter<u64> {
    meter()
        .u64_counter("eventdesk.records.created")
        .with_description("Number of records created")
        .build()
}

/// Counter: accepted status transitions.
/// Labels: `kind`, `from`, `to`.
pub fn transitions() -> Counter<u64> {
    meter()
        .u64_counter("eventdesk.workflow.transitions")
        .with_description("Number of accepted workflow transitions")
        .build()
}

/// Counter: refused workflow calls (wrong role, wrong state, unknown id).
/// Labels: `kind`, `action`.
pub fn refusals() -> Counter<u64> {
    meter()
        .u64_counter("eventdesk.workflow.refusals")
        .with_description("Number of refused workflow calls")
        .build()
}

pub(crate) fn record_created(kind: &'static str) {
    records_created().add(1, &[KeyValue::new("kind", kind)]);
}

pub(crate) fn record_transition(kind: &'static str, from: &'static str, to: &'static str) {
    transitions().add(
        1,
        &[
            KeyValue::new("kind", kind),
            KeyValue::new("from", from),
            KeyValue::new("to", to),
        ],
    );
}

pub(crate) fn record_refusal(kind: &'static str, action: &'static str) {
    refusals().add(
        1,
        &[KeyValue::new("kind", kind), KeyValue::new("action", action)],
    );
}

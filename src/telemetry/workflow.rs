//! Span helpers for workflow transitions.

use tracing::Span;

use crate::model::RecordId;

/// Start a span for one workflow call on one record.
///
/// `workflow.to` is declared empty and filled by [`record_state_transition`]
/// if the call is accepted.
pub fn start_transition_span(kind: &str, action: &str, id: RecordId) -> Span {
    tracing::info_span!(
        "workflow.transition",
        "workflow.kind" = kind,
        "workflow.action" = action,
        "record.id" = %id,
        "workflow.to" = tracing::field::Empty,
    )
}

/// Record an accepted transition on `span` and emit an `info` event in it.
pub fn record_state_transition(span: &Span, from: &str, to: &str) {
    span.record("workflow.to", to);
    span.in_scope(|| {
        tracing::info!(from = from, to = to, "state_transition");
    });
}

/// Emit a `debug` event for a refused call.
pub fn record_refusal(span: &Span, reason: &str) {
    span.in_scope(|| {
        tracing::debug!(reason = reason, "refused");
    });
}

/// Start a span for one workflow call on one task of a distribution.
pub fn start_task_span(action: &str, distribution_id: RecordId, task_id: &str) -> Span {
    tracing::info_span!(
        "workflow.transition",
        "workflow.kind" = "sub_team_task",
        "workflow.action" = action,
        "record.id" = %distribution_id,
        "task.id" = task_id,
        "workflow.to" = tracing::field::Empty,
    )
}

//! Event request approval chain.
//!
//! DRAFT → PENDING_SCS_REVIEW → PENDING_FINANCIAL_REVIEW →
//! PENDING_ADMINISTRATION_REVIEW → APPROVED | REJECTED.
//!
//! Reviews are attached only from their own pending state, so each one can be
//! attached at most once.

use chrono::Utc;
use tracing::info;

use crate::authorizer::{EventAction, RoleAuthorizer};
use crate::error::Result;
use crate::model::*;
use crate::query;
use crate::store::{Record, RecordStore};
use crate::telemetry::metrics;
use crate::telemetry::workflow::{record_refusal, record_state_transition, start_transition_span};

const KIND: &str = EventRequest::KIND;

pub struct EventRequestWorkflow<'s> {
    store: &'s mut RecordStore<EventRequest>,
}

impl<'s> EventRequestWorkflow<'s> {
    pub fn new(store: &'s mut RecordStore<EventRequest>) -> Self {
        Self { store }
    }

    /// Open a new request in DRAFT. Not role-gated.
    pub fn create(&mut self, data: NewEventRequest, actor: Role) -> Result<EventRequest> {
        data.validate()?;

        let now = Utc::now();
        let request = self.store.insert(|id| EventRequest {
            id,
            record_number: data.record_number,
            client_name: data.client_name,
            client_email: data.client_email,
            client_phone: data.client_phone,
            event_type: data.event_type,
            start_date: data.start_date,
            end_date: data.end_date,
            expected_number: data.expected_number,
            budget: data.budget,
            preferences: data.preferences,
            status: EventRequestStatus::Draft,
            created_by: actor,
            financial_review: None,
            administration_review: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        });

        metrics::record_created(KIND);
        info!(id = %request.id, created_by = %actor, "event request created");
        Ok(request)
    }

    /// DRAFT → PENDING_SCS_REVIEW. A second call on the same request refuses.
    pub fn forward_to_senior_cs(&mut self, id: RecordId, actor: Role) -> Option<EventRequest> {
        self.transition(id, EventAction::ForwardToSeniorCs, actor, |req| {
            req.status = EventRequestStatus::PendingScsReview;
        })
    }

    /// Generic status push, e.g. SCS sending a request on to finance.
    ///
    /// Statuses that need a review attached are only reachable through the
    /// review calls.
    pub fn update_status(
        &mut self,
        id: RecordId,
        new_status: EventRequestStatus,
        actor: Role,
    ) -> Option<EventRequest> {
        self.transition(id, EventAction::Advance(new_status), actor, |req| {
            req.status = new_status;
        })
    }

    /// Attach the financial review. APPROVE moves on to administration;
    /// REJECT ends the request with the review comments as the reason.
    pub fn submit_financial_review(
        &mut self,
        id: RecordId,
        review: FinancialReview,
        actor: Role,
    ) -> Result<Option<EventRequest>> {
        review.validate()?;

        Ok(
            self.transition(id, EventAction::SubmitFinancialReview, actor, |req| {
                match review.recommendation {
                    Recommendation::Approve => {
                        req.status = EventRequestStatus::PendingAdministrationReview;
                    }
                    Recommendation::Reject => {
                        req.status = EventRequestStatus::Rejected;
                        req.rejection_reason = Some(review.comments.clone());
                    }
                }
                req.financial_review = Some(review);
            }),
        )
    }

    /// Attach the administration review. Both outcomes are terminal.
    pub fn submit_administration_review(
        &mut self,
        id: RecordId,
        review: AdministrationReview,
        actor: Role,
    ) -> Result<Option<EventRequest>> {
        review.validate()?;

        Ok(
            self.transition(id, EventAction::SubmitAdministrationReview, actor, |req| {
                match review.recommendation {
                    Recommendation::Approve => {
                        req.status = EventRequestStatus::Approved;
                    }
                    Recommendation::Reject => {
                        req.status = EventRequestStatus::Rejected;
                        req.rejection_reason = Some(review.comments.clone());
                    }
                }
                req.administration_review = Some(review);
            }),
        )
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get_by_id(&self, id: RecordId) -> Option<EventRequest> {
        self.store.get(id).cloned()
    }

    pub fn get_all(&self) -> Vec<EventRequest> {
        self.store.list_all().to_vec()
    }

    pub fn get_by_status(&self, status: EventRequestStatus) -> Vec<EventRequest> {
        query::event_requests_by_status(&*self.store, status)
    }

    /// Requests in the status `identifier`'s role acts on. Empty for anything
    /// that is not a reviewing role.
    pub fn get_for_user(&self, identifier: &str) -> Vec<EventRequest> {
        query::event_requests_for_user(&*self.store, identifier)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn transition(
        &mut self,
        id: RecordId,
        action: EventAction,
        actor: Role,
        apply: impl FnOnce(&mut EventRequest),
    ) -> Option<EventRequest> {
        let span = start_transition_span(KIND, action.name(), id);

        let Some(request) = self.store.get_mut(id) else {
            refuse(&span, action, "unknown id");
            return None;
        };

        let from = request.status;
        if !RoleAuthorizer::can_transition(from, action, actor) {
            refuse(&span, action, "not permitted from current status for this role");
            return None;
        }

        apply(&mut *request);
        request.updated_at = Utc::now();

        metrics::record_transition(KIND, from.as_str(), request.status.as_str());
        record_state_transition(&span, from.as_str(), request.status.as_str());
        Some(request.clone())
    }
}

fn refuse(span: &tracing::Span, action: EventAction, reason: &str) {
    metrics::record_refusal(KIND, action.name());
    record_refusal(span, reason);
}

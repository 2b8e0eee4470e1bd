//! Engine facade. The public, string-typed API for forms and dashboards.
//!
//! The engine owns both record stores. Roles, statuses, recommendations, and
//! decisions arrive as strings and are parsed here; an unknown value is an
//! error. Record ids that do not parse are treated as unknown ids and refuse
//! like any other missing record.

use crate::error::Result;
use crate::model::*;
use crate::query::{Dashboard, QueryService};
use crate::store::RecordStore;
use crate::workflow::{EventRequestWorkflow, TaskDistributionWorkflow};

/// The workflow engine. Owns all records.
#[derive(Debug, Default)]
pub struct Engine {
    event_requests: RecordStore<EventRequest>,
    task_distributions: RecordStore<TaskDistribution>,
}

impl Engine {
    /// Create an engine with empty in-memory stores.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Typed workflow over the event request store.
    pub fn event_requests(&mut self) -> EventRequestWorkflow<'_> {
        EventRequestWorkflow::new(&mut self.event_requests)
    }

    /// Typed workflow over the task distribution store.
    pub fn task_distributions(&mut self) -> TaskDistributionWorkflow<'_> {
        TaskDistributionWorkflow::new(&mut self.task_distributions)
    }

    pub fn queries(&self) -> QueryService<'_> {
        QueryService::new(&self.event_requests, &self.task_distributions)
    }

    // -----------------------------------------------------------------------
    // Event requests
    // -----------------------------------------------------------------------

    pub fn create_event_request(
        &mut self,
        data: NewEventRequest,
        actor_role: &str,
    ) -> Result<EventRequest> {
        let actor: Role = actor_role.parse()?;
        self.event_requests().create(data, actor)
    }

    pub fn get_event_request_by_id(&self, id: &str) -> Option<EventRequest> {
        self.event_requests.get(parse_id(id)?).cloned()
    }

    pub fn get_all_event_requests(&self) -> Vec<EventRequest> {
        self.event_requests.list_all().to_vec()
    }

    pub fn get_event_requests_by_status(&self, status: &str) -> Result<Vec<EventRequest>> {
        let status: EventRequestStatus = status.parse()?;
        Ok(self.queries().event_requests_by_status(status))
    }

    pub fn forward_to_senior_cs(
        &mut self,
        id: &str,
        actor_role: &str,
    ) -> Result<Option<EventRequest>> {
        let actor: Role = actor_role.parse()?;
        Ok(parse_id(id).and_then(|id| self.event_requests().forward_to_senior_cs(id, actor)))
    }

    pub fn update_event_request_status(
        &mut self,
        id: &str,
        new_status: &str,
        actor_role: &str,
    ) -> Result<Option<EventRequest>> {
        let new_status: EventRequestStatus = new_status.parse()?;
        let actor: Role = actor_role.parse()?;
        Ok(parse_id(id).and_then(|id| self.event_requests().update_status(id, new_status, actor)))
    }

    pub fn submit_financial_review(
        &mut self,
        id: &str,
        review: FinancialReview,
        actor_role: &str,
    ) -> Result<Option<EventRequest>> {
        let actor: Role = actor_role.parse()?;
        let Some(id) = parse_id(id) else {
            review.validate()?;
            return Ok(None);
        };
        self.event_requests()
            .submit_financial_review(id, review, actor)
    }

    pub fn submit_administration_review(
        &mut self,
        id: &str,
        review: AdministrationReview,
        actor_role: &str,
    ) -> Result<Option<EventRequest>> {
        let actor: Role = actor_role.parse()?;
        let Some(id) = parse_id(id) else {
            review.validate()?;
            return Ok(None);
        };
        self.event_requests()
            .submit_administration_review(id, review, actor)
    }

    pub fn get_event_requests_for_user(&self, identifier: &str) -> Vec<EventRequest> {
        self.queries().event_requests_for_user(identifier)
    }

    pub fn clear_event_requests(&mut self) {
        self.event_requests.clear();
    }

    // -----------------------------------------------------------------------
    // Task distributions
    // -----------------------------------------------------------------------

    pub fn create_task_distribution(
        &mut self,
        data: NewTaskDistribution,
        actor_role: &str,
    ) -> Result<TaskDistribution> {
        let actor: Role = actor_role.parse()?;
        self.task_distributions().create(data, actor)
    }

    pub fn get_task_distribution_by_id(&self, id: &str) -> Option<TaskDistribution> {
        self.task_distributions.get(parse_id(id)?).cloned()
    }

    pub fn get_all_task_distributions(&self) -> Vec<TaskDistribution> {
        self.task_distributions.list_all().to_vec()
    }

    pub fn forward_task_to_sub_team(
        &mut self,
        distribution_id: &str,
        task_id: &str,
        actor_role: &str,
    ) -> Result<Option<TaskDistribution>> {
        let actor: Role = actor_role.parse()?;
        Ok(parse_id(distribution_id).and_then(|id| {
            self.task_distributions()
                .forward_task_to_sub_team(id, task_id, actor)
        }))
    }

    /// `member` is a sub-team member name, not a role code.
    pub fn submit_sub_team_feedback(
        &mut self,
        distribution_id: &str,
        task_id: &str,
        feedback: SubTeamFeedback,
        member: &str,
    ) -> Result<Option<TaskDistribution>> {
        let Some(id) = parse_id(distribution_id) else {
            feedback.validate()?;
            return Ok(None);
        };
        self.task_distributions()
            .submit_sub_team_feedback(id, task_id, feedback, member)
    }

    pub fn review_sub_team_feedback(
        &mut self,
        distribution_id: &str,
        task_id: &str,
        decision: &str,
        actor_role: &str,
        approve_budget_increase: bool,
    ) -> Result<Option<TaskDistribution>> {
        let decision: ReviewDecision = decision.parse()?;
        let actor: Role = actor_role.parse()?;
        Ok(parse_id(distribution_id).and_then(|id| {
            self.task_distributions().review_sub_team_feedback(
                id,
                task_id,
                decision,
                actor,
                approve_budget_increase,
            )
        }))
    }

    /// Accepts a role code or a sub-team member name.
    pub fn get_task_distributions_for_user(&self, identifier: &str) -> Vec<TaskDistribution> {
        self.queries().task_distributions_for_user(identifier)
    }

    pub fn clear_task_distributions(&mut self) {
        self.task_distributions.clear();
    }

    // -----------------------------------------------------------------------
    // Dashboards
    // -----------------------------------------------------------------------

    pub fn dashboard(&self, identifier: &str) -> Dashboard {
        self.queries().dashboard(identifier)
    }
}

fn parse_id(id: &str) -> Option<RecordId> {
    id.parse().ok()
}

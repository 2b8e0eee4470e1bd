//! Task distribution workflow.
//!
//! Every sub-team task runs PENDING → ASSIGNED → FEEDBACK_SUBMITTED →
//! APPROVED | NEEDS_REVISION on its own track. Transitions are scoped to one
//! task id; siblings are never touched. The parent status is re-derived after
//! each accepted transition.

use chrono::Utc;
use tracing::info;

use crate::authorizer::{RoleAuthorizer, TaskAction};
use crate::error::Result;
use crate::model::*;
use crate::query;
use crate::store::{Record, RecordStore};
use crate::telemetry::metrics;
use crate::telemetry::workflow::{record_refusal, record_state_transition, start_task_span};

const KIND: &str = TaskDistribution::KIND;
const TASK_KIND: &str = "sub_team_task";

pub struct TaskDistributionWorkflow<'s> {
    store: &'s mut RecordStore<TaskDistribution>,
}

impl<'s> TaskDistributionWorkflow<'s> {
    pub fn new(store: &'s mut RecordStore<TaskDistribution>) -> Self {
        Self { store }
    }

    /// Create a distribution with every task PENDING. Not role-gated.
    pub fn create(&mut self, data: NewTaskDistribution, actor: Role) -> Result<TaskDistribution> {
        data.validate()?;

        let now = Utc::now();
        let tasks: Vec<SubTeamTask> = data.tasks.into_iter().map(NewSubTeamTask::into_task).collect();
        let distribution = self.store.insert(|id| TaskDistribution {
            id,
            event_request_id: data.event_request_id,
            title: data.title,
            description: data.description,
            total_budget: data.total_budget,
            event_date: data.event_date,
            created_by: actor,
            status: TaskDistributionStatus::aggregate(&tasks),
            tasks,
            created_at: now,
            updated_at: now,
        });

        metrics::record_created(KIND);
        info!(
            id = %distribution.id,
            created_by = %actor,
            tasks = distribution.tasks.len(),
            "task distribution created"
        );
        Ok(distribution)
    }

    /// PENDING → ASSIGNED for one task. Re-forwarding refuses.
    pub fn forward_task_to_sub_team(
        &mut self,
        distribution_id: RecordId,
        task_id: &str,
        actor: Role,
    ) -> Option<TaskDistribution> {
        let action = TaskAction::ForwardToSubTeam;
        self.transition(
            distribution_id,
            task_id,
            action,
            |_, task| RoleAuthorizer::can_act_on_task(task, action, actor),
            |task| task.status = TaskStatus::Assigned,
        )
    }

    /// ASSIGNED → FEEDBACK_SUBMITTED. Only a member listed on the task may
    /// submit, and only once it has been forwarded.
    pub fn submit_sub_team_feedback(
        &mut self,
        distribution_id: RecordId,
        task_id: &str,
        feedback: SubTeamFeedback,
        member: &str,
    ) -> Result<Option<TaskDistribution>> {
        feedback.validate()?;

        Ok(self.transition(
            distribution_id,
            task_id,
            TaskAction::SubmitFeedback,
            |_, task| RoleAuthorizer::can_submit_feedback(task, member),
            |task| {
                task.feedback = Some(SubTeamFeedback {
                    submitted_by: Some(member.to_string()),
                    ..feedback
                });
                task.status = TaskStatus::FeedbackSubmitted;
            },
        ))
    }

    /// FEEDBACK_SUBMITTED → `decision`. With `approve_budget_increase`, a
    /// requested increase is added to the task's allocation in full; an
    /// increase that would overflow the allocation refuses.
    pub fn review_sub_team_feedback(
        &mut self,
        distribution_id: RecordId,
        task_id: &str,
        decision: ReviewDecision,
        actor: Role,
        approve_budget_increase: bool,
    ) -> Option<TaskDistribution> {
        let action = TaskAction::ReviewFeedback;
        self.transition(
            distribution_id,
            task_id,
            action,
            |distribution, task| {
                RoleAuthorizer::can_act_on_task(task, action, actor)
                    && (!approve_budget_increase
                        || requested_increase(task)
                            .is_none_or(|increase| distribution.can_allocate(increase)))
            },
            |task| {
                if approve_budget_increase {
                    if let Some(total) = requested_increase(task)
                        .and_then(|increase| task.allocated_budget.checked_add(increase))
                    {
                        task.allocated_budget = total;
                    }
                }
                task.status = decision.task_status();
            },
        )
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn get_by_id(&self, id: RecordId) -> Option<TaskDistribution> {
        self.store.get(id).cloned()
    }

    pub fn get_all(&self) -> Vec<TaskDistribution> {
        self.store.list_all().to_vec()
    }

    /// See [`query::task_distributions_for_user`] for how `identifier` is
    /// resolved.
    pub fn get_for_user(&self, identifier: &str) -> Vec<TaskDistribution> {
        query::task_distributions_for_user(&*self.store, identifier)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn transition(
        &mut self,
        distribution_id: RecordId,
        task_id: &str,
        action: TaskAction,
        permitted: impl FnOnce(&TaskDistribution, &SubTeamTask) -> bool,
        apply: impl FnOnce(&mut SubTeamTask),
    ) -> Option<TaskDistribution> {
        let span = start_task_span(action.name(), distribution_id, task_id);

        let Some(distribution) = self.store.get_mut(distribution_id) else {
            refuse(&span, action, "unknown distribution id");
            return None;
        };
        let Some(pos) = distribution.task_position(task_id) else {
            refuse(&span, action, "unknown task id");
            return None;
        };

        let from = distribution.tasks[pos].status;
        if !permitted(&*distribution, &distribution.tasks[pos]) {
            refuse(&span, action, "not permitted from current state");
            return None;
        }

        let task = &mut distribution.tasks[pos];
        apply(task);
        let to = task.status;

        let parent_from = distribution.status;
        distribution.refresh_status();
        distribution.updated_at = Utc::now();

        metrics::record_transition(TASK_KIND, from.as_str(), to.as_str());
        record_state_transition(&span, from.as_str(), to.as_str());
        if distribution.status != parent_from {
            metrics::record_transition(KIND, parent_from.as_str(), distribution.status.as_str());
            info!(
                id = %distribution.id,
                from = %parent_from,
                to = %distribution.status,
                "task distribution status changed"
            );
        }

        Some(distribution.clone())
    }
}

fn requested_increase(task: &SubTeamTask) -> Option<u64> {
    task.feedback.as_ref().and_then(|f| f.budget_increase)
}

fn refuse(span: &tracing::Span, action: TaskAction, reason: &str) {
    metrics::record_refusal(TASK_KIND, action.name());
    record_refusal(span, reason);
}

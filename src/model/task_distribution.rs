//! Task distributions: a planner's breakdown of an event into sub-team tasks.
//!
//! Each [`SubTeamTask`] runs its own assignment/feedback/review track. The
//! parent [`TaskDistributionStatus`] is derived from its children and never
//! set directly.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::event_request::require_text;
use super::{RecordId, Role};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Task Distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDistribution {
    pub id: RecordId,

    /// Event request this plan was drawn up for. Lookup key only.
    pub event_request_id: String,
    pub title: String,
    pub description: String,
    pub total_budget: u64,
    pub event_date: NaiveDate,
    pub created_by: Role,
    pub status: TaskDistributionStatus,

    /// Definition order is preserved.
    pub tasks: Vec<SubTeamTask>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskDistribution {
    pub fn task(&self, task_id: &str) -> Option<&SubTeamTask> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub(crate) fn task_position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }

    /// Does any task list `member` as an assignee?
    pub fn involves_member(&self, member: &str) -> bool {
        self.tasks.iter().any(|t| t.is_assigned_to(member))
    }

    /// Sum of the current per-task allocations.
    ///
    /// Creation and review both keep this total within `u64`.
    pub fn allocated_budget(&self) -> u64 {
        self.tasks
            .iter()
            .fold(0u64, |acc, t| acc.saturating_add(t.allocated_budget))
    }

    /// Would adding `amount` to one task keep the total allocation in range?
    pub(crate) fn can_allocate(&self, amount: u64) -> bool {
        checked_total(self.tasks.iter().map(|t| t.allocated_budget))
            .and_then(|total| total.checked_add(amount))
            .is_some()
    }

    /// Recompute the parent status from the task statuses.
    pub(crate) fn refresh_status(&mut self) {
        self.status = TaskDistributionStatus::aggregate(&self.tasks);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskDistributionStatus {
    /// No task has been forwarded yet.
    Draft,
    InProgress,
    /// Every task approved.
    Completed,
}

impl TaskDistributionStatus {
    pub fn aggregate(tasks: &[SubTeamTask]) -> Self {
        if tasks.iter().all(|t| t.status == TaskStatus::Pending) {
            TaskDistributionStatus::Draft
        } else if tasks.iter().all(|t| t.status == TaskStatus::Approved) {
            TaskDistributionStatus::Completed
        } else {
            TaskDistributionStatus::InProgress
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskDistributionStatus::Draft => "DRAFT",
            TaskDistributionStatus::InProgress => "IN_PROGRESS",
            TaskDistributionStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for TaskDistributionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sub-team Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTeamTask {
    /// Caller-chosen, unique within the distribution (e.g. "TASK-001").
    pub id: String,
    pub sub_team: String,
    pub assigned_to: Vec<String>,
    pub requirements: String,
    /// Only grows, and only through an approved budget increase.
    pub allocated_budget: u64,
    pub deadline: NaiveDate,
    pub status: TaskStatus,
    pub feedback: Option<SubTeamFeedback>,
}

impl SubTeamTask {
    pub fn is_assigned_to(&self, member: &str) -> bool {
        self.assigned_to.iter().any(|m| m == member)
    }
}

/// Lifecycle status of a single sub-team task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Assigned,
    FeedbackSubmitted,
    /// Terminal.
    Approved,
    /// Terminal.
    NeedsRevision,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::Assigned => "ASSIGNED",
            TaskStatus::FeedbackSubmitted => "FEEDBACK_SUBMITTED",
            TaskStatus::Approved => "APPROVED",
            TaskStatus::NeedsRevision => "NEEDS_REVISION",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Approved | TaskStatus::NeedsRevision)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a reviewer decides about a sub-team's feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    NeedsRevision,
}

impl ReviewDecision {
    /// The task status this decision moves the task into.
    pub fn task_status(self) -> TaskStatus {
        match self {
            ReviewDecision::Approved => TaskStatus::Approved,
            ReviewDecision::NeedsRevision => TaskStatus::NeedsRevision,
        }
    }
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.task_status().as_str())
    }
}

impl std::str::FromStr for ReviewDecision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "APPROVED" => Ok(ReviewDecision::Approved),
            "NEEDS_REVISION" => Ok(ReviewDecision::NeedsRevision),
            other => Err(Error::UnknownDecision(other.to_string())),
        }
    }
}

/// A sub-team's response to an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTeamFeedback {
    pub comments: String,
    #[serde(default)]
    pub suggestions: String,
    /// Extra budget requested on top of the allocation. Never mutated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_increase: Option<u64>,
    /// Member who submitted it. Filled in by the workflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
}

impl SubTeamFeedback {
    pub fn new(comments: impl Into<String>, suggestions: impl Into<String>) -> Self {
        Self {
            comments: comments.into(),
            suggestions: suggestions.into(),
            budget_increase: None,
            submitted_by: None,
        }
    }

    pub fn budget_increase(mut self, amount: u64) -> Self {
        self.budget_increase = Some(amount);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.budget_increase == Some(0) {
            return Err(Error::Validation(
                "budgetIncrease must be positive when present".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Planner payload for a new task distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskDistribution {
    pub event_request_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub total_budget: u64,
    pub event_date: NaiveDate,
    pub tasks: Vec<NewSubTeamTask>,
}

/// One task within a [`NewTaskDistribution`].
///
/// Any `status` present in incoming JSON is ignored; tasks always start
/// pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubTeamTask {
    pub id: String,
    pub sub_team: String,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub requirements: String,
    pub allocated_budget: u64,
    pub deadline: NaiveDate,
}

impl NewTaskDistribution {
    pub fn new(
        event_request_id: impl Into<String>,
        title: impl Into<String>,
        total_budget: u64,
        event_date: NaiveDate,
    ) -> Self {
        Self {
            event_request_id: event_request_id.into(),
            title: title.into(),
            description: String::new(),
            total_budget,
            event_date,
            tasks: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn task(mut self, task: NewSubTeamTask) -> Self {
        self.tasks.push(task);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require_text("title", &self.title)?;
        if self.tasks.is_empty() {
            return Err(Error::Validation(
                "a task distribution needs at least one task".to_string(),
            ));
        }
        if checked_total(self.tasks.iter().map(|t| t.allocated_budget)).is_none() {
            return Err(Error::Validation(
                "task allocations overflow the budget range".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for task in &self.tasks {
            require_text("task id", &task.id)?;
            require_text("subTeam", &task.sub_team)?;
            if !seen.insert(task.id.as_str()) {
                return Err(Error::Validation(format!("duplicate task id {}", task.id)));
            }
        }
        Ok(())
    }
}

impl NewSubTeamTask {
    pub fn new(
        id: impl Into<String>,
        sub_team: impl Into<String>,
        allocated_budget: u64,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            sub_team: sub_team.into(),
            assigned_to: Vec::new(),
            requirements: String::new(),
            allocated_budget,
            deadline,
        }
    }

    pub fn assign(mut self, member: impl Into<String>) -> Self {
        self.assigned_to.push(member.into());
        self
    }

    pub fn requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = requirements.into();
        self
    }

    /// Materialize as a pending task. Duplicate assignees collapse to one.
    pub(crate) fn into_task(self) -> SubTeamTask {
        let mut assigned_to: Vec<String> = Vec::with_capacity(self.assigned_to.len());
        for member in self.assigned_to {
            if !assigned_to.contains(&member) {
                assigned_to.push(member);
            }
        }
        SubTeamTask {
            id: self.id,
            sub_team: self.sub_team,
            assigned_to,
            requirements: self.requirements,
            allocated_budget: self.allocated_budget,
            deadline: self.deadline,
            status: TaskStatus::Pending,
            feedback: None,
        }
    }
}

fn checked_total(amounts: impl IntoIterator<Item = u64>) -> Option<u64> {
    amounts
        .into_iter()
        .try_fold(0u64, |acc, amount| acc.checked_add(amount))
}

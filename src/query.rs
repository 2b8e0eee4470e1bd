//! Read-only queries that drive dashboards.
//!
//! Everything here works on shared borrows of the stores and returns
//! clones; nothing mutates.

use serde::Serialize;

use crate::model::{
    EventRequest, EventRequestStatus, RecordId, Role, TaskDistribution, TaskStatus,
};
use crate::store::RecordStore;

/// The one event-request status a role is expected to act on.
pub fn pending_status_for(role: Role) -> Option<EventRequestStatus> {
    match role {
        Role::Cs => Some(EventRequestStatus::Draft),
        Role::Scs => Some(EventRequestStatus::PendingScsReview),
        Role::Fm => Some(EventRequestStatus::PendingFinancialReview),
        Role::Am => Some(EventRequestStatus::PendingAdministrationReview),
        Role::Pm | Role::Sm | Role::Hr => None,
    }
}

/// Event requests waiting on `identifier`. Empty unless it is a role code
/// with a pending status.
pub fn event_requests_for_user(
    store: &RecordStore<EventRequest>,
    identifier: &str,
) -> Vec<EventRequest> {
    let Some(status) = identifier.parse::<Role>().ok().and_then(pending_status_for) else {
        return Vec::new();
    };
    event_requests_by_status(store, status)
}

pub fn event_requests_by_status(
    store: &RecordStore<EventRequest>,
    status: EventRequestStatus,
) -> Vec<EventRequest> {
    store.filter(|r| r.status == status)
}

/// Task distributions relevant to `identifier`.
///
/// The identifier spans two namespaces at once: a role code matches the
/// distributions that role created, and a member name matches the
/// distributions where any task lists that member. Results from both are
/// unioned, in creation order.
pub fn task_distributions_for_user(
    store: &RecordStore<TaskDistribution>,
    identifier: &str,
) -> Vec<TaskDistribution> {
    let role: Option<Role> = identifier.parse().ok();
    store.filter(|d| Some(d.created_by) == role || d.involves_member(identifier))
}

/// A task somebody has to act on next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    pub distribution_id: RecordId,
    pub task_id: String,
    pub status: TaskStatus,
}

/// Everything an identifier currently has to act on.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub event_requests: Vec<EventRequest>,
    pub task_distributions: Vec<TaskDistribution>,
    pub tasks_awaiting_action: Vec<TaskRef>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.event_requests.is_empty()
            && self.task_distributions.is_empty()
            && self.tasks_awaiting_action.is_empty()
    }
}

/// Read-only view over both stores.
pub struct QueryService<'s> {
    event_requests: &'s RecordStore<EventRequest>,
    task_distributions: &'s RecordStore<TaskDistribution>,
}

impl<'s> QueryService<'s> {
    pub fn new(
        event_requests: &'s RecordStore<EventRequest>,
        task_distributions: &'s RecordStore<TaskDistribution>,
    ) -> Self {
        Self {
            event_requests,
            task_distributions,
        }
    }

    pub fn event_requests_for_user(&self, identifier: &str) -> Vec<EventRequest> {
        event_requests_for_user(self.event_requests, identifier)
    }

    pub fn event_requests_by_status(&self, status: EventRequestStatus) -> Vec<EventRequest> {
        event_requests_by_status(self.event_requests, status)
    }

    pub fn task_distributions_for_user(&self, identifier: &str) -> Vec<TaskDistribution> {
        task_distributions_for_user(self.task_distributions, identifier)
    }

    /// Tasks waiting on `identifier`.
    ///
    /// Planners (PM, SM) act on pending tasks (to forward) and submitted
    /// feedback (to review) in distributions they created. Anyone else acts on
    /// assigned tasks that list them as a member.
    pub fn tasks_awaiting_action(&self, identifier: &str) -> Vec<TaskRef> {
        let planner = identifier
            .parse::<Role>()
            .ok()
            .filter(|role| role.is_planner());

        let mut refs = Vec::new();
        for dist in self.task_distributions.list_all() {
            for task in &dist.tasks {
                let waiting = match planner {
                    Some(role) => {
                        dist.created_by == role
                            && matches!(
                                task.status,
                                TaskStatus::Pending | TaskStatus::FeedbackSubmitted
                            )
                    }
                    None => task.status == TaskStatus::Assigned && task.is_assigned_to(identifier),
                };
                if waiting {
                    refs.push(TaskRef {
                        distribution_id: dist.id,
                        task_id: task.id.clone(),
                        status: task.status,
                    });
                }
            }
        }
        refs
    }

    pub fn dashboard(&self, identifier: &str) -> Dashboard {
        Dashboard {
            event_requests: self.event_requests_for_user(identifier),
            task_distributions: self.task_distributions_for_user(identifier),
            tasks_awaiting_action: self.tasks_awaiting_action(identifier),
        }
    }
}

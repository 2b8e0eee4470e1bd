//! Role gating for workflow transitions.
//!
//! Pure functions, no state. A `false` answer means the workflow refuses the
//! call: it returns `None` and leaves the record untouched.

use crate::model::{EventRequestStatus, Role, SubTeamTask, TaskStatus};

/// Something an actor asks to do to an event request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    ForwardToSeniorCs,
    /// Generic status push via `update_status`.
    Advance(EventRequestStatus),
    SubmitFinancialReview,
    SubmitAdministrationReview,
}

impl EventAction {
    /// Label used in logs and metrics.
    pub fn name(self) -> &'static str {
        match self {
            EventAction::ForwardToSeniorCs => "forward_to_senior_cs",
            EventAction::Advance(_) => "update_status",
            EventAction::SubmitFinancialReview => "submit_financial_review",
            EventAction::SubmitAdministrationReview => "submit_administration_review",
        }
    }
}

/// Something an actor asks to do to a sub-team task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    ForwardToSubTeam,
    SubmitFeedback,
    ReviewFeedback,
}

impl TaskAction {
    pub fn name(self) -> &'static str {
        match self {
            TaskAction::ForwardToSubTeam => "forward_task_to_sub_team",
            TaskAction::SubmitFeedback => "submit_sub_team_feedback",
            TaskAction::ReviewFeedback => "review_sub_team_feedback",
        }
    }
}

/// The fixed review chain for event requests.
pub struct RoleAuthorizer;

impl RoleAuthorizer {
    /// May `role` perform `action` on an event request currently in `current`?
    pub fn can_transition(current: EventRequestStatus, action: EventAction, role: Role) -> bool {
        use EventAction::*;
        use EventRequestStatus::*;
        matches!(
            (current, action, role),
            (Draft, ForwardToSeniorCs, Role::Cs)
                | (Draft, Advance(PendingScsReview), Role::Cs)
                | (PendingScsReview, Advance(PendingFinancialReview), Role::Scs)
                | (PendingFinancialReview, SubmitFinancialReview, Role::Fm)
                | (PendingAdministrationReview, SubmitAdministrationReview, Role::Am)
        )
    }

    /// May a planner with `role` forward or review `task`?
    ///
    /// Feedback is gated by membership, not role; see
    /// [`RoleAuthorizer::can_submit_feedback`].
    pub fn can_act_on_task(task: &SubTeamTask, action: TaskAction, role: Role) -> bool {
        match action {
            TaskAction::ForwardToSubTeam => {
                role.is_planner() && task.status == TaskStatus::Pending
            }
            TaskAction::ReviewFeedback => {
                role.is_planner() && task.status == TaskStatus::FeedbackSubmitted
            }
            TaskAction::SubmitFeedback => false,
        }
    }

    /// May `member` submit feedback on `task`?
    pub fn can_submit_feedback(task: &SubTeamTask, member: &str) -> bool {
        task.status == TaskStatus::Assigned && task.is_assigned_to(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(status: TaskStatus) -> SubTeamTask {
        SubTeamTask {
            id: "TASK-001".to_string(),
            sub_team: "Decorations".to_string(),
            assigned_to: vec!["John Doe".to_string()],
            requirements: String::new(),
            allocated_budget: 1000,
            deadline: NaiveDate::from_ymd_opt(2024, 12, 10).unwrap(),
            status,
            feedback: None,
        }
    }

    #[test]
    fn only_the_owning_role_advances_each_stage() {
        use EventRequestStatus::*;
        let chain = [
            (Draft, EventAction::ForwardToSeniorCs, Role::Cs),
            (PendingScsReview, EventAction::Advance(PendingFinancialReview), Role::Scs),
            (PendingFinancialReview, EventAction::SubmitFinancialReview, Role::Fm),
            (PendingAdministrationReview, EventAction::SubmitAdministrationReview, Role::Am),
        ];

        for (status, action, owner) in chain {
            for role in Role::ALL {
                assert_eq!(
                    RoleAuthorizer::can_transition(status, action, role),
                    role == owner,
                    "{action:?} from {status} by {role}"
                );
            }
        }
    }

    #[test]
    fn terminal_states_allow_nothing() {
        let actions = [
            EventAction::ForwardToSeniorCs,
            EventAction::Advance(EventRequestStatus::PendingFinancialReview),
            EventAction::SubmitFinancialReview,
            EventAction::SubmitAdministrationReview,
        ];
        for status in [EventRequestStatus::Approved, EventRequestStatus::Rejected] {
            for action in actions {
                for role in Role::ALL {
                    assert!(!RoleAuthorizer::can_transition(status, action, role));
                }
            }
        }
    }

    #[test]
    fn advance_cannot_skip_reviews() {
        use EventRequestStatus::*;
        for target in [PendingAdministrationReview, Approved, Rejected] {
            for from in EventRequestStatus::ALL {
                for role in Role::ALL {
                    assert!(!RoleAuthorizer::can_transition(
                        from,
                        EventAction::Advance(target),
                        role
                    ));
                }
            }
        }
    }

    #[test]
    fn planners_gate_task_forwarding_and_review() {
        assert!(RoleAuthorizer::can_act_on_task(
            &task(TaskStatus::Pending),
            TaskAction::ForwardToSubTeam,
            Role::Pm
        ));
        assert!(RoleAuthorizer::can_act_on_task(
            &task(TaskStatus::FeedbackSubmitted),
            TaskAction::ReviewFeedback,
            Role::Sm
        ));
        assert!(!RoleAuthorizer::can_act_on_task(
            &task(TaskStatus::Pending),
            TaskAction::ForwardToSubTeam,
            Role::Cs
        ));
        assert!(!RoleAuthorizer::can_act_on_task(
            &task(TaskStatus::Assigned),
            TaskAction::ForwardToSubTeam,
            Role::Pm
        ));
    }

    #[test]
    fn feedback_requires_assignment_and_membership() {
        assert!(RoleAuthorizer::can_submit_feedback(
            &task(TaskStatus::Assigned),
            "John Doe"
        ));
        assert!(!RoleAuthorizer::can_submit_feedback(
            &task(TaskStatus::Pending),
            "John Doe"
        ));
        assert!(!RoleAuthorizer::can_submit_feedback(
            &task(TaskStatus::Assigned),
            "Chef Mike"
        ));
    }
}

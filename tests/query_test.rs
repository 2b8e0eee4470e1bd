//! Integration tests for dashboard queries.

use chrono::NaiveDate;
use eventdesk::engine::Engine;
use eventdesk::model::*;
use eventdesk::query::pending_status_for;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_engine() -> (Engine, RecordId) {
    let mut engine = Engine::in_memory();

    let request = NewEventRequest::new("John Doe", "Wedding", date(2024, 12, 1), date(2024, 12, 2))
        .expected_number(50)
        .budget(5000);
    engine.event_requests().create(request.clone(), Role::Cs).unwrap();
    let forwarded = engine.event_requests().create(request, Role::Cs).unwrap().id;
    engine
        .event_requests()
        .forward_to_senior_cs(forwarded, Role::Cs)
        .unwrap();

    let plan = NewTaskDistribution::new("EVT-001", "Wedding Setup", 5000, date(2024, 12, 15))
        .task(
            NewSubTeamTask::new("TASK-001", "Decorations", 1000, date(2024, 12, 10))
                .assign("John Doe")
                .assign("Jane Smith"),
        )
        .task(
            NewSubTeamTask::new("TASK-002", "Catering", 2500, date(2024, 12, 14))
                .assign("Chef Mike"),
        );
    let dist = engine.task_distributions().create(plan, Role::Pm).unwrap().id;
    engine
        .task_distributions()
        .forward_task_to_sub_team(dist, "TASK-001", Role::Pm)
        .unwrap();

    (engine, dist)
}

#[test]
fn each_reviewing_role_has_one_pending_status() {
    assert_eq!(pending_status_for(Role::Cs), Some(EventRequestStatus::Draft));
    assert_eq!(
        pending_status_for(Role::Am),
        Some(EventRequestStatus::PendingAdministrationReview)
    );
    assert_eq!(pending_status_for(Role::Pm), None);
    assert_eq!(pending_status_for(Role::Hr), None);
}

#[test]
fn planner_dashboard_lists_pending_tasks_of_own_distributions() {
    let (engine, dist) = seeded_engine();

    let board = engine.dashboard("PM");

    assert!(board.event_requests.is_empty());
    assert_eq!(board.task_distributions.len(), 1);
    assert_eq!(board.tasks_awaiting_action.len(), 1);
    let waiting = &board.tasks_awaiting_action[0];
    assert_eq!(waiting.distribution_id, dist);
    assert_eq!(waiting.task_id, "TASK-002");
    assert_eq!(waiting.status, TaskStatus::Pending);
}

#[test]
fn other_planner_sees_nothing() {
    let (engine, _) = seeded_engine();
    assert!(engine.dashboard("SM").is_empty());
}

#[test]
fn member_dashboard_lists_assigned_tasks() {
    let (engine, dist) = seeded_engine();

    let board = engine.dashboard("Jane Smith");
    assert_eq!(board.task_distributions.len(), 1);
    assert_eq!(board.tasks_awaiting_action.len(), 1);
    assert_eq!(board.tasks_awaiting_action[0].distribution_id, dist);
    assert_eq!(board.tasks_awaiting_action[0].task_id, "TASK-001");

    // Chef Mike's task has not been forwarded yet.
    let board = engine.dashboard("Chef Mike");
    assert_eq!(board.task_distributions.len(), 1);
    assert!(board.tasks_awaiting_action.is_empty());
}

#[test]
fn submitted_feedback_returns_to_the_planner() {
    let (mut engine, dist) = seeded_engine();
    engine
        .task_distributions()
        .submit_sub_team_feedback(dist, "TASK-001", SubTeamFeedback::new("done", ""), "John Doe")
        .unwrap()
        .unwrap();

    assert!(engine.dashboard("John Doe").tasks_awaiting_action.is_empty());

    let planner: Vec<_> = engine
        .dashboard("PM")
        .tasks_awaiting_action
        .into_iter()
        .map(|t| (t.task_id, t.status))
        .collect();
    assert_eq!(
        planner,
        vec![
            ("TASK-001".to_string(), TaskStatus::FeedbackSubmitted),
            ("TASK-002".to_string(), TaskStatus::Pending),
        ]
    );
}

#[test]
fn reviewer_dashboards_follow_request_status() {
    let (engine, _) = seeded_engine();

    assert_eq!(engine.dashboard("CS").event_requests.len(), 1);
    assert_eq!(engine.dashboard("SCS").event_requests.len(), 1);
    assert!(engine.dashboard("FM").is_empty());
    assert!(engine.dashboard("Nobody").is_empty());
}

#[test]
fn dashboard_serializes_camel_case() {
    let (engine, _) = seeded_engine();
    let json = serde_json::to_value(engine.dashboard("PM")).unwrap();

    assert!(json["eventRequests"].is_array());
    assert_eq!(json["tasksAwaitingAction"][0]["taskId"], "TASK-002");
    assert_eq!(json["tasksAwaitingAction"][0]["status"], "PENDING");
}

//! Integration tests for the string-typed engine facade.

use chrono::NaiveDate;
use eventdesk::engine::Engine;
use eventdesk::error::Error;
use eventdesk::model::*;

fn test_engine() -> Engine {
    Engine::in_memory()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn wedding() -> NewEventRequest {
    NewEventRequest::new("John Doe", "Wedding", date(2024, 12, 1), date(2024, 12, 2))
        .expected_number(50)
        .budget(5000)
}

fn review(by: &str, recommendation: Recommendation) -> FinancialReview {
    FinancialReview {
        reviewed_by: by.to_string(),
        comments: "looks fine".to_string(),
        recommendation,
        budget_comments: Some("within range".to_string()),
    }
}

fn plan() -> NewTaskDistribution {
    NewTaskDistribution::new("EVT-001", "Wedding Setup", 5000, date(2024, 12, 15)).task(
        NewSubTeamTask::new("TASK-001", "Decorations", 1000, date(2024, 12, 10)).assign("John Doe"),
    )
}

// ---------------------------------------------------------------------------
// Event requests
// ---------------------------------------------------------------------------

#[test]
fn full_event_request_chain_through_facade() {
    let mut engine = test_engine();

    let id = engine.create_event_request(wedding(), "CS").unwrap().id.to_string();
    engine.forward_to_senior_cs(&id, "CS").unwrap().unwrap();
    engine
        .update_event_request_status(&id, "PENDING_FINANCIAL_REVIEW", "SCS")
        .unwrap()
        .unwrap();
    engine
        .submit_financial_review(&id, review("FM", Recommendation::Approve), "FM")
        .unwrap()
        .unwrap();
    let done = engine
        .submit_administration_review(
            &id,
            AdministrationReview {
                reviewed_by: "AM".to_string(),
                comments: "approved".to_string(),
                recommendation: Recommendation::Approve,
            },
            "AM",
        )
        .unwrap()
        .unwrap();

    assert_eq!(done.status, EventRequestStatus::Approved);
    assert_eq!(
        engine.get_event_request_by_id(&id).unwrap().status,
        EventRequestStatus::Approved
    );
    assert_eq!(
        engine.get_event_requests_by_status("APPROVED").unwrap().len(),
        1
    );
}

#[test]
fn unknown_role_is_an_error() {
    let mut engine = test_engine();

    let err = engine.create_event_request(wedding(), "CEO").unwrap_err();
    assert!(matches!(err, Error::UnknownRole(ref r) if r == "CEO"));

    let id = engine.create_event_request(wedding(), "CS").unwrap().id.to_string();
    let err = engine.forward_to_senior_cs(&id, "cs").unwrap_err();
    assert!(matches!(err, Error::UnknownRole(_)));
}

#[test]
fn unknown_status_is_an_error() {
    let mut engine = test_engine();
    let id = engine.create_event_request(wedding(), "CS").unwrap().id.to_string();

    assert!(matches!(
        engine.update_event_request_status(&id, "SHIPPED", "CS"),
        Err(Error::UnknownStatus(_))
    ));
    assert!(matches!(
        engine.get_event_requests_by_status("pending"),
        Err(Error::UnknownStatus(_))
    ));
}

#[test]
fn unparseable_id_refuses() {
    let mut engine = test_engine();
    engine.create_event_request(wedding(), "CS").unwrap();

    assert!(engine.get_event_request_by_id("REC-001").is_none());
    assert!(engine.forward_to_senior_cs("REC-001", "CS").unwrap().is_none());
    assert!(
        engine
            .submit_financial_review("not-an-id", review("FM", Recommendation::Approve), "FM")
            .unwrap()
            .is_none()
    );
}

#[test]
fn malformed_review_is_an_error_even_for_unknown_id() {
    let mut engine = test_engine();

    let result = engine.submit_financial_review("not-an-id", review(" ", Recommendation::Reject), "FM");
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[test]
fn for_user_and_clear() {
    let mut engine = test_engine();
    engine.create_event_request(wedding(), "CS").unwrap();
    engine.create_event_request(wedding(), "CS").unwrap();

    assert_eq!(engine.get_event_requests_for_user("CS").len(), 2);
    assert!(engine.get_event_requests_for_user("SCS").is_empty());

    engine.clear_event_requests();
    assert!(engine.get_all_event_requests().is_empty());
}

// ---------------------------------------------------------------------------
// Task distributions
// ---------------------------------------------------------------------------

#[test]
fn task_track_through_facade() {
    let mut engine = test_engine();

    let id = engine.create_task_distribution(plan(), "PM").unwrap().id.to_string();
    engine
        .forward_task_to_sub_team(&id, "TASK-001", "PM")
        .unwrap()
        .unwrap();
    engine
        .submit_sub_team_feedback(
            &id,
            "TASK-001",
            SubTeamFeedback::new("need more", "").budget_increase(250),
            "John Doe",
        )
        .unwrap()
        .unwrap();
    let dist = engine
        .review_sub_team_feedback(&id, "TASK-001", "APPROVED", "PM", true)
        .unwrap()
        .unwrap();

    assert_eq!(dist.status, TaskDistributionStatus::Completed);
    assert_eq!(dist.task("TASK-001").unwrap().allocated_budget, 1250);
    assert_eq!(engine.get_all_task_distributions().len(), 1);
    assert_eq!(engine.get_task_distributions_for_user("John Doe").len(), 1);
}

#[test]
fn unknown_decision_is_an_error() {
    let mut engine = test_engine();
    let id = engine.create_task_distribution(plan(), "PM").unwrap().id.to_string();

    let result = engine.review_sub_team_feedback(&id, "TASK-001", "MAYBE", "PM", false);
    assert!(matches!(result, Err(Error::UnknownDecision(ref d)) if d == "MAYBE"));
}

#[test]
fn wrong_role_on_task_refuses() {
    let mut engine = test_engine();
    let id = engine.create_task_distribution(plan(), "PM").unwrap().id.to_string();

    assert!(
        engine
            .forward_task_to_sub_team(&id, "TASK-001", "HR")
            .unwrap()
            .is_none()
    );
    assert!(
        engine
            .forward_task_to_sub_team("nope", "TASK-001", "PM")
            .unwrap()
            .is_none()
    );
    let dist = engine.get_task_distribution_by_id(&id).unwrap();
    assert_eq!(dist.task("TASK-001").unwrap().status, TaskStatus::Pending);
}

#[test]
fn clear_task_distributions_leaves_requests() {
    let mut engine = test_engine();
    engine.create_event_request(wedding(), "CS").unwrap();
    engine.create_task_distribution(plan(), "PM").unwrap();

    engine.clear_task_distributions();

    assert!(engine.get_all_task_distributions().is_empty());
    assert_eq!(engine.get_all_event_requests().len(), 1);
}

//! Scripted replays against an [`Engine`].
//!
//! A script is JSON: `{"steps": [{"op": "...", ...}]}`. Steps that create a
//! record may carry `"as": "<alias>"`; later steps can then pass `"@alias"`
//! wherever a record id is expected (including a distribution's
//! `eventRequestId`). Refusals are reported per step and the replay goes on.
//! Errors (malformed payloads, unknown roles, unknown aliases) stop it.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::model::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptStep {
    /// Name later steps use to refer to the record this step creates.
    #[serde(default, rename = "as")]
    pub alias: Option<String>,
    #[serde(flatten)]
    pub step: Step,
}

/// One engine call. Ids are record ids or `@alias` references.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    CreateEventRequest {
        actor: String,
        request: NewEventRequest,
    },
    ForwardToSeniorCs {
        id: String,
        actor: String,
    },
    UpdateEventRequestStatus {
        id: String,
        status: String,
        actor: String,
    },
    SubmitFinancialReview {
        id: String,
        actor: String,
        review: FinancialReview,
    },
    SubmitAdministrationReview {
        id: String,
        actor: String,
        review: AdministrationReview,
    },
    ClearEventRequests,
    CreateTaskDistribution {
        actor: String,
        distribution: NewTaskDistribution,
    },
    ForwardTaskToSubTeam {
        id: String,
        task: String,
        actor: String,
    },
    SubmitSubTeamFeedback {
        id: String,
        task: String,
        member: String,
        feedback: SubTeamFeedback,
    },
    ReviewSubTeamFeedback {
        id: String,
        task: String,
        decision: String,
        actor: String,
        #[serde(default)]
        approve_budget_increase: bool,
    },
    ClearTaskDistributions,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::CreateEventRequest { .. } => "create_event_request",
            Step::ForwardToSeniorCs { .. } => "forward_to_senior_cs",
            Step::UpdateEventRequestStatus { .. } => "update_event_request_status",
            Step::SubmitFinancialReview { .. } => "submit_financial_review",
            Step::SubmitAdministrationReview { .. } => "submit_administration_review",
            Step::ClearEventRequests => "clear_event_requests",
            Step::CreateTaskDistribution { .. } => "create_task_distribution",
            Step::ForwardTaskToSubTeam { .. } => "forward_task_to_sub_team",
            Step::SubmitSubTeamFeedback { .. } => "submit_sub_team_feedback",
            Step::ReviewSubTeamFeedback { .. } => "review_sub_team_feedback",
            Step::ClearTaskDistributions => "clear_task_distributions",
        }
    }
}

/// What happened to one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The call went through. `status` is the record's status afterwards, or
    /// the task's for task-level calls.
    Ok { id: RecordId, status: String },
    Refused,
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub op: &'static str,
    pub outcome: Outcome,
}

impl std::fmt::Display for StepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            Outcome::Ok { id, status } => {
                write!(f, "{:>3} ok       {} {} {}", self.index, self.op, id.short(), status)
            }
            Outcome::Refused => write!(f, "{:>3} refused  {}", self.index, self.op),
            Outcome::Cleared => write!(f, "{:>3} cleared  {}", self.index, self.op),
        }
    }
}

/// Runs scripts against a borrowed engine, keeping aliases across runs.
pub struct ScriptRunner<'e> {
    engine: &'e mut Engine,
    aliases: HashMap<String, RecordId>,
}

impl<'e> ScriptRunner<'e> {
    pub fn new(engine: &'e mut Engine) -> Self {
        Self {
            engine,
            aliases: HashMap::new(),
        }
    }

    /// Record id bound to `alias`, without the leading `@`.
    pub fn alias(&self, alias: &str) -> Option<RecordId> {
        self.aliases.get(alias).copied()
    }

    /// Run every step in order. Stops at the first error.
    pub fn run(&mut self, script: Script) -> Result<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(script.steps.len());
        for (index, ScriptStep { alias, step }) in script.steps.into_iter().enumerate() {
            let op = step.name();
            let outcome = self.apply(step).inspect_err(|e| {
                warn!(index, op, error = %e, "script step failed");
            })?;

            if let Some(alias) = alias {
                match &outcome {
                    Outcome::Ok { id, .. } => {
                        debug!(alias = %alias, id = %id, "alias bound");
                        self.aliases.insert(alias, *id);
                    }
                    _ => {
                        return Err(Error::Validation(format!(
                            "step {index} ({op}) produced no record to bind as @{alias}"
                        )));
                    }
                }
            }

            reports.push(StepReport { index, op, outcome });
        }

        let refused = reports
            .iter()
            .filter(|r| r.outcome == Outcome::Refused)
            .count();
        info!(steps = reports.len(), refused, "script replayed");
        Ok(reports)
    }

    fn apply(&mut self, step: Step) -> Result<Outcome> {
        let outcome = match step {
            Step::CreateEventRequest { actor, request } => {
                let created = self.engine.create_event_request(request, &actor)?;
                event_outcome(Some(created))
            }
            Step::ForwardToSeniorCs { id, actor } => {
                let id = self.resolve(&id)?;
                event_outcome(self.engine.forward_to_senior_cs(&id, &actor)?)
            }
            Step::UpdateEventRequestStatus { id, status, actor } => {
                let id = self.resolve(&id)?;
                event_outcome(
                    self.engine
                        .update_event_request_status(&id, &status, &actor)?,
                )
            }
            Step::SubmitFinancialReview { id, actor, review } => {
                let id = self.resolve(&id)?;
                event_outcome(self.engine.submit_financial_review(&id, review, &actor)?)
            }
            Step::SubmitAdministrationReview { id, actor, review } => {
                let id = self.resolve(&id)?;
                event_outcome(
                    self.engine
                        .submit_administration_review(&id, review, &actor)?,
                )
            }
            Step::ClearEventRequests => {
                self.engine.clear_event_requests();
                Outcome::Cleared
            }
            Step::CreateTaskDistribution {
                actor,
                mut distribution,
            } => {
                distribution.event_request_id = self.resolve(&distribution.event_request_id)?;
                let created = self.engine.create_task_distribution(distribution, &actor)?;
                Outcome::Ok {
                    id: created.id,
                    status: created.status.to_string(),
                }
            }
            Step::ForwardTaskToSubTeam { id, task, actor } => {
                let id = self.resolve(&id)?;
                task_outcome(
                    self.engine.forward_task_to_sub_team(&id, &task, &actor)?,
                    &task,
                )
            }
            Step::SubmitSubTeamFeedback {
                id,
                task,
                member,
                feedback,
            } => {
                let id = self.resolve(&id)?;
                task_outcome(
                    self.engine
                        .submit_sub_team_feedback(&id, &task, feedback, &member)?,
                    &task,
                )
            }
            Step::ReviewSubTeamFeedback {
                id,
                task,
                decision,
                actor,
                approve_budget_increase,
            } => {
                let id = self.resolve(&id)?;
                task_outcome(
                    self.engine.review_sub_team_feedback(
                        &id,
                        &task,
                        &decision,
                        &actor,
                        approve_budget_increase,
                    )?,
                    &task,
                )
            }
            Step::ClearTaskDistributions => {
                self.engine.clear_task_distributions();
                Outcome::Cleared
            }
        };
        Ok(outcome)
    }

    /// `@alias` becomes the bound record id; anything else passes through.
    fn resolve(&self, reference: &str) -> Result<String> {
        match reference.strip_prefix('@') {
            Some(alias) => self
                .alias(alias)
                .map(|id| id.to_string())
                .ok_or_else(|| Error::Validation(format!("unknown alias @{alias}"))),
            None => Ok(reference.to_string()),
        }
    }
}

fn event_outcome(request: Option<EventRequest>) -> Outcome {
    match request {
        Some(r) => Outcome::Ok {
            id: r.id,
            status: r.status.to_string(),
        },
        None => Outcome::Refused,
    }
}

fn task_outcome(distribution: Option<TaskDistribution>, task_id: &str) -> Outcome {
    let Some(d) = distribution else {
        return Outcome::Refused;
    };
    let status = d
        .task(task_id)
        .map(|t| t.status.to_string())
        .unwrap_or_default();
    Outcome::Ok { id: d.id, status }
}

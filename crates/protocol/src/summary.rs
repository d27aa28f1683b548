//! Aggregate statistics over a run collection.
//!
//! The two sources classify failures differently, so each gets its own
//! [`SummaryPolicy`] instead of sharing one rule set.

use crate::flow::{FlowRun, StateType};
use crate::ml::{ExecutionStatus, MlExecution};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub trait SummaryPolicy {
    type Run: Clone;

    /// Whether the source carries a duration; when false `avg_run_time` is omitted.
    const REPORTS_RUN_TIME: bool;

    fn status(run: &Self::Run) -> &'static str;
    fn is_success(run: &Self::Run) -> bool;
    fn started_at(run: &Self::Run) -> Option<DateTime<Utc>>;
    fn run_time(run: &Self::Run) -> f64;
    /// Key under which a run is counted in `error_types`, or `None` when the
    /// run is not a failure under this policy.
    fn failure_key(run: &Self::Run) -> Option<String>;
}

/// Flow runs: success is `COMPLETED`; only `FAILED` and `CRASHED` runs are
/// errors, grouped by their state message.
pub struct FlowRunPolicy;

impl SummaryPolicy for FlowRunPolicy {
    type Run = FlowRun;
    const REPORTS_RUN_TIME: bool = true;

    fn status(run: &FlowRun) -> &'static str {
        run.state_type.as_str()
    }

    fn is_success(run: &FlowRun) -> bool {
        run.state_type == StateType::Completed
    }

    fn started_at(run: &FlowRun) -> Option<DateTime<Utc>> {
        Some(run.created)
    }

    fn run_time(run: &FlowRun) -> f64 {
        run.total_run_time
    }

    fn failure_key(run: &FlowRun) -> Option<String> {
        if !run.state_type.is_failure() {
            return None;
        }
        let key = run
            .state_message()
            .map(str::to_string)
            .or_else(|| run.state_name.clone())
            .unwrap_or_else(|| run.state_type.as_str().to_string());
        Some(key)
    }
}

/// ML executions: success is `Succeeded`; every other status is an error,
/// grouped by the status value itself.
pub struct MlExecutionPolicy;

impl SummaryPolicy for MlExecutionPolicy {
    type Run = MlExecution;
    const REPORTS_RUN_TIME: bool = false;

    fn status(run: &MlExecution) -> &'static str {
        run.status.as_str()
    }

    fn is_success(run: &MlExecution) -> bool {
        run.status == ExecutionStatus::Succeeded
    }

    fn started_at(run: &MlExecution) -> Option<DateTime<Utc>> {
        run.started_at()
    }

    fn run_time(_run: &MlExecution) -> f64 {
        0.0
    }

    fn failure_key(run: &MlExecution) -> Option<String> {
        if Self::is_success(run) {
            None
        } else {
            Some(run.status.as_str().to_string())
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunSummary<R> {
    pub total_runs: usize,
    pub status_counts: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_run_time: Option<f64>,
    pub success_rate: f64,
    pub latest_run: Option<R>,
    pub error_types: BTreeMap<String, usize>,
    pub runs: Vec<R>,
}

pub fn summarize<P: SummaryPolicy>(runs: Vec<P::Run>) -> RunSummary<P::Run> {
    let total_runs = runs.len();
    let mut status_counts = BTreeMap::new();
    let mut error_types = BTreeMap::new();
    let mut successes = 0usize;
    let mut run_time_sum = 0.0;
    for run in &runs {
        *status_counts.entry(P::status(run).to_string()).or_insert(0) += 1;
        if P::is_success(run) {
            successes += 1;
        }
        if let Some(key) = P::failure_key(run) {
            *error_types.entry(key).or_insert(0) += 1;
        }
        run_time_sum += P::run_time(run);
    }

    let avg_run_time = P::REPORTS_RUN_TIME.then(|| round2(ratio(run_time_sum, total_runs)));
    let success_rate = round2(ratio(successes as f64 * 100.0, total_runs));
    let latest_run = latest::<P>(&runs).cloned();

    let mut runs = runs;
    runs.sort_by(|a, b| P::started_at(b).cmp(&P::started_at(a)));

    RunSummary {
        total_runs,
        status_counts,
        avg_run_time,
        success_rate,
        latest_run,
        error_types,
        runs,
    }
}

/// The run with the greatest start timestamp; on ties the first one seen wins.
pub fn latest<P: SummaryPolicy>(runs: &[P::Run]) -> Option<&P::Run> {
    let mut best: Option<&P::Run> = None;
    for run in runs {
        match best {
            Some(current) if P::started_at(run) <= P::started_at(current) => {}
            _ => best = Some(run),
        }
    }
    best
}

fn ratio(numerator: f64, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        numerator / total as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Workflow-orchestration records: flows and their runs.

use crate::timestamp::{parse_optional_timestamp, parse_timestamp, TimestampError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A flow definition as returned by `flows/filter`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flow {
    pub id: String,
    pub created: String,
    pub updated: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub labels: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateType {
    Scheduled,
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
    Cancelling,
    Crashed,
    Paused,
}

impl StateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateType::Scheduled => "SCHEDULED",
            StateType::Pending => "PENDING",
            StateType::Running => "RUNNING",
            StateType::Completed => "COMPLETED",
            StateType::Failed => "FAILED",
            StateType::Cancelled => "CANCELLED",
            StateType::Cancelling => "CANCELLING",
            StateType::Crashed => "CRASHED",
            StateType::Paused => "PAUSED",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StateType::Failed | StateType::Crashed)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StateDetail {
    #[serde(default, rename = "type")]
    pub state_type: Option<StateType>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One flow run as it appears on the wire, timestamps still ISO-8601 strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowRunRecord {
    pub id: String,
    pub flow_id: String,
    #[serde(default)]
    pub flow_name: Option<String>,
    pub name: String,
    #[serde(default)]
    pub flow_version: Option<String>,
    pub created: String,
    pub updated: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    pub state_type: StateType,
    #[serde(default)]
    pub state_name: Option<String>,
    #[serde(default)]
    pub state: Option<StateDetail>,
    #[serde(default)]
    pub total_run_time: f64,
    #[serde(default)]
    pub run_count: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A flow run with every timestamp parsed into a UTC instant.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlowRun {
    pub id: String,
    pub flow_id: String,
    pub flow_name: Option<String>,
    pub name: String,
    pub flow_version: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub state_type: StateType,
    pub state_name: Option<String>,
    pub state: Option<StateDetail>,
    pub total_run_time: f64,
    pub run_count: Option<u64>,
    pub tags: Vec<String>,
}

impl FlowRunRecord {
    pub fn normalize(self) -> Result<FlowRun, TimestampError> {
        Ok(FlowRun {
            created: parse_timestamp("created", &self.created)?,
            updated: parse_timestamp("updated", &self.updated)?,
            start_time: parse_optional_timestamp("start_time", self.start_time.as_deref())?,
            end_time: parse_optional_timestamp("end_time", self.end_time.as_deref())?,
            id: self.id,
            flow_id: self.flow_id,
            flow_name: self.flow_name,
            name: self.name,
            flow_version: self.flow_version,
            state_type: self.state_type,
            state_name: self.state_name,
            state: self.state,
            total_run_time: self.total_run_time,
            run_count: self.run_count,
            tags: self.tags,
        })
    }
}

impl FlowRun {
    pub fn state_message(&self) -> Option<&str> {
        self.state
            .as_ref()
            .and_then(|state| state.message.as_deref())
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

/// Normalizes a whole batch; the first malformed timestamp fails the batch.
pub fn normalize_flow_runs(records: Vec<FlowRunRecord>) -> Result<Vec<FlowRun>, TimestampError> {
    records.into_iter().map(FlowRunRecord::normalize).collect()
}

/// Identity of the flow a run list belongs to, taken from its first run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FlowInfo {
    pub id: String,
    pub name: Option<String>,
    pub version: Option<String>,
}

impl FlowInfo {
    pub fn from_runs(runs: &[FlowRunRecord]) -> Option<Self> {
        runs.first().map(|run| Self {
            id: run.flow_id.clone(),
            name: run.flow_name.clone(),
            version: run.flow_version.clone(),
        })
    }
}

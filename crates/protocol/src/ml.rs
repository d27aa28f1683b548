//! Managed ML-pipeline records: pipelines and their executions.
//!
//! Wire types keep the service's PascalCase field names so a handler body can
//! be decoded without reshaping.

use crate::timestamp::{parse_optional_timestamp, TimestampError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExecutionStatus {
    Executing,
    Stopping,
    Stopped,
    Failed,
    Succeeded,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Executing => "Executing",
            ExecutionStatus::Stopping => "Stopping",
            ExecutionStatus::Stopped => "Stopped",
            ExecutionStatus::Failed => "Failed",
            ExecutionStatus::Succeeded => "Succeeded",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PipelineSummary {
    pub pipeline_arn: String,
    pub pipeline_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub last_modified_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_execution_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PipelineExecutionDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_arn: Option<String>,
    pub pipeline_execution_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_execution_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_execution_status: Option<ExecutionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_execution_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub last_modified_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<serde_json::Value>,
}

/// One entry of `PipelineExecutionSummaries`, optionally carrying the merged
/// describe-call result under `PipelineExecutionDetails`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PipelineExecutionRecord {
    pub pipeline_execution_arn: String,
    #[serde(default)]
    pub start_time: Option<String>,
    pub pipeline_execution_status: ExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_execution_display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_execution_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_execution_failure_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_execution_details: Option<PipelineExecutionDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PipelineExecutionList {
    pub pipeline_execution_summaries: Vec<PipelineExecutionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MlExecutionDetail {
    pub pipeline_arn: Option<String>,
    pub failure_reason: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_modified_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MlExecution {
    pub arn: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub status: ExecutionStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    pub details: Option<MlExecutionDetail>,
}

impl PipelineExecutionRecord {
    pub fn normalize(self) -> Result<MlExecution, TimestampError> {
        let details = self
            .pipeline_execution_details
            .map(|detail| -> Result<MlExecutionDetail, TimestampError> {
                Ok(MlExecutionDetail {
                    creation_time: parse_optional_timestamp(
                        "CreationTime",
                        detail.creation_time.as_deref(),
                    )?,
                    last_modified_time: parse_optional_timestamp(
                        "LastModifiedTime",
                        detail.last_modified_time.as_deref(),
                    )?,
                    pipeline_arn: detail.pipeline_arn,
                    failure_reason: detail.failure_reason,
                })
            })
            .transpose()?;
        Ok(MlExecution {
            start_time: parse_optional_timestamp("StartTime", self.start_time.as_deref())?,
            arn: self.pipeline_execution_arn,
            display_name: self.pipeline_execution_display_name,
            description: self.pipeline_execution_description,
            status: self.pipeline_execution_status,
            failure_reason: self.pipeline_execution_failure_reason,
            details,
        })
    }
}

impl MlExecution {
    /// Start time, falling back to the creation time from the merged details.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time.or_else(|| {
            self.details
                .as_ref()
                .and_then(|details| details.creation_time)
        })
    }
}

pub fn normalize_executions(
    records: Vec<PipelineExecutionRecord>,
) -> Result<Vec<MlExecution>, TimestampError> {
    records
        .into_iter()
        .map(PipelineExecutionRecord::normalize)
        .collect()
}

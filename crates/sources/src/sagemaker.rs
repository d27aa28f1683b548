//! Managed ML-pipeline adapter speaking the SageMaker JSON 1.1 protocol.
//!
//! Responses carry epoch-second timestamps; they are rendered as RFC 3339
//! strings here so every record leaving this module is JSON-friendly.

use crate::config::SageMakerConfig;
use crate::error::SourceError;
use crate::http::send_json;
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use protocol::timestamp::epoch_seconds_to_rfc3339;
use protocol::{
    ExecutionStatus, PipelineExecutionDetail, PipelineExecutionList, PipelineExecutionRecord,
    PipelineSummary, TimestampError,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const TARGET_PREFIX: &str = "SageMaker";
pub const DEFAULT_DETAIL_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelinePage {
    pub pipelines: Vec<PipelineSummary>,
    pub next_token: Option<String>,
}

#[async_trait]
pub trait SageMakerApi: Send + Sync {
    async fn list_pipelines(&self, next_token: Option<&str>) -> Result<PipelinePage, SourceError>;
    async fn list_pipeline_executions(
        &self,
        pipeline_name: &str,
    ) -> Result<PipelineExecutionList, SourceError>;
    async fn describe_pipeline_execution(
        &self,
        execution_arn: &str,
    ) -> Result<PipelineExecutionDetail, SourceError>;
}

pub struct SageMakerClient {
    http: Client,
    endpoint: String,
}

impl SageMakerClient {
    pub fn new(config: &SageMakerConfig, http: Client) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim().to_string(),
        })
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        body: serde_json::Value,
    ) -> Result<T, SourceError> {
        let request = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{operation}"))
            .body(body.to_string());
        send_json(request, &format!("{}#{operation}", self.endpoint)).await
    }
}

#[async_trait]
impl SageMakerApi for SageMakerClient {
    async fn list_pipelines(&self, next_token: Option<&str>) -> Result<PipelinePage, SourceError> {
        let body = match next_token {
            Some(token) => json!({ "NextToken": token }),
            None => json!({}),
        };
        let raw: RawListPipelines = self.call("ListPipelines", body).await?;
        let pipelines = raw
            .pipeline_summaries
            .into_iter()
            .map(RawPipelineSummary::into_summary)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PipelinePage {
            pipelines,
            next_token: raw.next_token,
        })
    }

    async fn list_pipeline_executions(
        &self,
        pipeline_name: &str,
    ) -> Result<PipelineExecutionList, SourceError> {
        let raw: RawListExecutions = self
            .call(
                "ListPipelineExecutions",
                json!({ "PipelineName": pipeline_name }),
            )
            .await?;
        let summaries = raw
            .pipeline_execution_summaries
            .into_iter()
            .map(RawExecutionSummary::into_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PipelineExecutionList {
            pipeline_execution_summaries: summaries,
            next_token: raw.next_token,
        })
    }

    async fn describe_pipeline_execution(
        &self,
        execution_arn: &str,
    ) -> Result<PipelineExecutionDetail, SourceError> {
        let raw: RawDescribeExecution = self
            .call(
                "DescribePipelineExecution",
                json!({ "PipelineExecutionArn": execution_arn }),
            )
            .await?;
        raw.into_detail()
    }
}

/// Follows `NextToken` until the listing is exhausted.
pub async fn list_all_pipelines(
    api: &dyn SageMakerApi,
) -> Result<Vec<PipelineSummary>, SourceError> {
    let mut page = api.list_pipelines(None).await?;
    let mut pipelines = std::mem::take(&mut page.pipelines);
    while let Some(token) = page.next_token.take() {
        page = api.list_pipelines(Some(&token)).await?;
        pipelines.append(&mut page.pipelines);
    }
    tracing::info!(count = pipelines.len(), "ml pipelines listed");
    Ok(pipelines)
}

/// Lists executions and merges each one's describe result into
/// `PipelineExecutionDetails`. At most `concurrency` describe calls are in
/// flight; output keeps the listing order and the first failure aborts.
pub async fn list_executions_with_details(
    api: &dyn SageMakerApi,
    pipeline_name: &str,
    concurrency: usize,
) -> Result<PipelineExecutionList, SourceError> {
    let mut list = api.list_pipeline_executions(pipeline_name).await?;
    let summaries = std::mem::take(&mut list.pipeline_execution_summaries);
    let total = summaries.len();
    list.pipeline_execution_summaries = stream::iter(summaries)
        .map(|mut summary| async move {
            tracing::debug!(arn = %summary.pipeline_execution_arn, "describing execution");
            let detail = api
                .describe_pipeline_execution(&summary.pipeline_execution_arn)
                .await?;
            summary.pipeline_execution_details = Some(detail);
            Ok::<PipelineExecutionRecord, SourceError>(summary)
        })
        .buffered(concurrency.max(1))
        .try_collect::<Vec<_>>()
        .await?;
    tracing::info!(pipeline = %pipeline_name, count = total, "ml executions listed");
    Ok(list)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTime {
    Epoch(f64),
    Text(String),
}

fn render_time(
    field: &'static str,
    value: Option<WireTime>,
) -> Result<Option<String>, TimestampError> {
    match value {
        None => Ok(None),
        Some(WireTime::Text(text)) => Ok(Some(text)),
        Some(WireTime::Epoch(seconds)) => epoch_seconds_to_rfc3339(seconds)
            .map(Some)
            .ok_or_else(|| TimestampError {
                field,
                value: seconds.to_string(),
            }),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawListPipelines {
    #[serde(default)]
    pipeline_summaries: Vec<RawPipelineSummary>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPipelineSummary {
    pipeline_arn: String,
    pipeline_name: String,
    #[serde(default)]
    pipeline_display_name: Option<String>,
    #[serde(default)]
    pipeline_description: Option<String>,
    #[serde(default)]
    role_arn: Option<String>,
    #[serde(default)]
    creation_time: Option<WireTime>,
    #[serde(default)]
    last_modified_time: Option<WireTime>,
    #[serde(default)]
    last_execution_time: Option<WireTime>,
}

impl RawPipelineSummary {
    fn into_summary(self) -> Result<PipelineSummary, TimestampError> {
        Ok(PipelineSummary {
            creation_time: render_time("CreationTime", self.creation_time)?,
            last_modified_time: render_time("LastModifiedTime", self.last_modified_time)?,
            last_execution_time: render_time("LastExecutionTime", self.last_execution_time)?,
            pipeline_arn: self.pipeline_arn,
            pipeline_name: self.pipeline_name,
            pipeline_display_name: self.pipeline_display_name,
            pipeline_description: self.pipeline_description,
            role_arn: self.role_arn,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawListExecutions {
    #[serde(default)]
    pipeline_execution_summaries: Vec<RawExecutionSummary>,
    #[serde(default)]
    next_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawExecutionSummary {
    pipeline_execution_arn: String,
    #[serde(default)]
    start_time: Option<WireTime>,
    pipeline_execution_status: ExecutionStatus,
    #[serde(default)]
    pipeline_execution_display_name: Option<String>,
    #[serde(default)]
    pipeline_execution_description: Option<String>,
    #[serde(default)]
    pipeline_execution_failure_reason: Option<String>,
}

impl RawExecutionSummary {
    fn into_record(self) -> Result<PipelineExecutionRecord, TimestampError> {
        Ok(PipelineExecutionRecord {
            start_time: render_time("StartTime", self.start_time)?,
            pipeline_execution_arn: self.pipeline_execution_arn,
            pipeline_execution_status: self.pipeline_execution_status,
            pipeline_execution_display_name: self.pipeline_execution_display_name,
            pipeline_execution_description: self.pipeline_execution_description,
            pipeline_execution_failure_reason: self.pipeline_execution_failure_reason,
            pipeline_execution_details: None,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDescribeExecution {
    #[serde(default)]
    pipeline_arn: Option<String>,
    pipeline_execution_arn: String,
    #[serde(default)]
    pipeline_execution_display_name: Option<String>,
    #[serde(default)]
    pipeline_execution_status: Option<ExecutionStatus>,
    #[serde(default)]
    pipeline_execution_description: Option<String>,
    #[serde(default)]
    failure_reason: Option<String>,
    #[serde(default)]
    creation_time: Option<WireTime>,
    #[serde(default)]
    last_modified_time: Option<WireTime>,
    #[serde(default)]
    created_by: Option<serde_json::Value>,
    #[serde(default)]
    last_modified_by: Option<serde_json::Value>,
}

impl RawDescribeExecution {
    fn into_detail(self) -> Result<PipelineExecutionDetail, SourceError> {
        Ok(PipelineExecutionDetail {
            creation_time: render_time("CreationTime", self.creation_time)?,
            last_modified_time: render_time("LastModifiedTime", self.last_modified_time)?,
            pipeline_arn: self.pipeline_arn,
            pipeline_execution_arn: self.pipeline_execution_arn,
            pipeline_execution_display_name: self.pipeline_execution_display_name,
            pipeline_execution_status: self.pipeline_execution_status,
            pipeline_execution_description: self.pipeline_execution_description,
            failure_reason: self.failure_reason,
            created_by: self.created_by,
            last_modified_by: self.last_modified_by,
        })
    }
}

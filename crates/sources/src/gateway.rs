use crate::error::SourceError;
use crate::http::{join_base_path, send_json};
use protocol::{
    Flow, FlowRunRecord, PipelineExecutionList, PipelineSummary, FLOW_ID_PARAM, PIPELINE_ID_PARAM,
};
use reqwest::Client;

pub const FLOWS_PATH: &str = "/data/pipeline";
pub const FLOW_RUNS_PATH: &str = "/data/pipeline/status";
pub const ML_PIPELINES_PATH: &str = "/ml/pipeline";
pub const ML_EXECUTIONS_PATH: &str = "/ml/pipeline/status";

/// Client for the handler surface, used by the dashboard.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: Option<(&str, &str)>,
    ) -> Result<T, SourceError> {
        let url = join_base_path(&self.base_url, path)?;
        let mut request = self.http.get(&url).header("Accept", "application/json");
        if let Some(pair) = query {
            request = request.query(&[pair]);
        }
        send_json(request, &url).await
    }

    pub async fn list_flows(&self) -> Result<Vec<Flow>, SourceError> {
        self.get(FLOWS_PATH, None).await
    }

    pub async fn list_flow_runs(&self, flow_id: &str) -> Result<Vec<FlowRunRecord>, SourceError> {
        self.get(FLOW_RUNS_PATH, Some((FLOW_ID_PARAM, flow_id))).await
    }

    pub async fn list_ml_pipelines(&self) -> Result<Vec<PipelineSummary>, SourceError> {
        self.get(ML_PIPELINES_PATH, None).await
    }

    pub async fn list_ml_executions(
        &self,
        pipeline_id: &str,
    ) -> Result<PipelineExecutionList, SourceError> {
        self.get(ML_EXECUTIONS_PATH, Some((PIPELINE_ID_PARAM, pipeline_id)))
            .await
    }
}

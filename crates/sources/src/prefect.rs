use crate::config::PrefectConfig;
use crate::error::SourceError;
use crate::http::{join_base_path, send_json};
use crate::token::TokenSource;
use async_trait::async_trait;
use protocol::{Flow, FlowRunRecord};
use reqwest::Client;
use serde_json::json;

/// Read access to the workflow-orchestration API.
#[async_trait]
pub trait FlowApi: Send + Sync {
    async fn list_flows(&self) -> Result<Vec<Flow>, SourceError>;
    async fn list_flow_runs(&self, flow_id: &str) -> Result<Vec<FlowRunRecord>, SourceError>;
}

pub struct PrefectClient {
    http: Client,
    base_url: String,
    token: TokenSource,
}

impl PrefectClient {
    pub fn new(config: &PrefectConfig, http: Client) -> anyhow::Result<Self> {
        Ok(Self {
            http,
            base_url: config.base_url()?,
            token: config.token.clone(),
        })
    }

    async fn post_filter<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, SourceError> {
        let url = join_base_path(&self.base_url, path)?;
        let token = self.token.resolve().await?;
        let request = self.http.post(&url).bearer_auth(token).json(&body);
        send_json(request, &url).await
    }
}

#[async_trait]
impl FlowApi for PrefectClient {
    async fn list_flows(&self) -> Result<Vec<Flow>, SourceError> {
        let flows: Vec<Flow> = self.post_filter("/flows/filter", json!({})).await?;
        tracing::info!(count = flows.len(), "flows listed");
        Ok(flows)
    }

    async fn list_flow_runs(&self, flow_id: &str) -> Result<Vec<FlowRunRecord>, SourceError> {
        let body = json!({
            "flows": {
                "id": {
                    "any_": [flow_id]
                }
            }
        });
        let runs: Vec<FlowRunRecord> = self.post_filter("/flow_runs/filter", body).await?;
        tracing::info!(flow_id = %flow_id, count = runs.len(), "flow runs listed");
        Ok(runs)
    }
}

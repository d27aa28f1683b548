use crate::token::TokenSource;
use serde::Deserialize;

pub const DEFAULT_PREFECT_API_URL: &str = "https://api.prefect.cloud/api";

#[derive(Debug, Clone, Deserialize)]
pub struct PrefectConfig {
    #[serde(default = "default_prefect_api_url")]
    pub api_url: String,
    pub account_id: Option<String>,
    pub workspace_id: Option<String>,
    pub token: TokenSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SageMakerConfig {
    /// A pre-authorized SageMaker JSON endpoint, typically a signing proxy.
    pub endpoint: String,
}

fn default_prefect_api_url() -> String {
    DEFAULT_PREFECT_API_URL.to_string()
}

impl PrefectConfig {
    /// Workspace-scoped base for Prefect Cloud, or the bare api url for a
    /// self-hosted server.
    pub fn base_url(&self) -> anyhow::Result<String> {
        let api_url = self.api_url.trim().trim_end_matches('/');
        if api_url.is_empty() {
            anyhow::bail!("prefect.api_url cannot be empty");
        }
        match (non_blank(&self.account_id), non_blank(&self.workspace_id)) {
            (Some(account), Some(workspace)) => Ok(format!(
                "{api_url}/accounts/{account}/workspaces/{workspace}"
            )),
            (None, None) => Ok(api_url.to_string()),
            _ => anyhow::bail!("prefect.account_id and prefect.workspace_id must be set together"),
        }
    }
}

impl SageMakerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.endpoint.trim().is_empty() {
            anyhow::bail!("sagemaker.endpoint cannot be empty");
        }
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

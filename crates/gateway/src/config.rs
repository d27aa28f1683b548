use anyhow::Context;
use serde::Deserialize;
use sources::{PrefectConfig, SageMakerConfig, DEFAULT_DETAIL_CONCURRENCY};
use std::path::PathBuf;

const MAX_DETAIL_CONCURRENCY: usize = 32;

#[derive(Debug, Deserialize)]
pub(crate) struct GatewayConfig {
    #[serde(default = "default_detail_concurrency")]
    pub(crate) detail_concurrency: usize,
    pub(crate) prefect: PrefectConfig,
    pub(crate) sagemaker: SageMakerConfig,
}

fn default_detail_concurrency() -> usize {
    DEFAULT_DETAIL_CONCURRENCY
}

fn validate_gateway_config(config: &GatewayConfig) -> anyhow::Result<()> {
    if config.detail_concurrency == 0 || config.detail_concurrency > MAX_DETAIL_CONCURRENCY {
        anyhow::bail!(
            "detail_concurrency must be between 1 and {}",
            MAX_DETAIL_CONCURRENCY
        );
    }
    config.prefect.base_url()?;
    config.sagemaker.validate()?;
    Ok(())
}

pub(crate) fn load_gateway_config(path: &PathBuf) -> anyhow::Result<GatewayConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: GatewayConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_gateway_config(&config)?;
    Ok(config)
}

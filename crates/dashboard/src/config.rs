use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardConfig {
    /// Base url of the handler surface, e.g. `http://127.0.0.1:19410`.
    pub(crate) gateway_url: String,
}

fn validate_dashboard_config(config: &DashboardConfig) -> anyhow::Result<()> {
    let url = config.gateway_url.trim();
    if url.is_empty() {
        anyhow::bail!("gateway_url cannot be empty");
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("gateway_url must start with http:// or https://");
    }
    Ok(())
}

pub(crate) fn load_dashboard_config(path: &PathBuf) -> anyhow::Result<DashboardConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: DashboardConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    validate_dashboard_config(&config)?;
    Ok(config)
}

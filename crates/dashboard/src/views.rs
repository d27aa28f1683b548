//! View models handed to the presentation layer.

use crate::error::DashboardError;
use protocol::flow::normalize_flow_runs;
use protocol::ml::normalize_executions;
use protocol::{
    summarize, Flow, FlowInfo, FlowRun, FlowRunPolicy, MlExecution, MlExecutionPolicy,
    PipelineSummary, RunSummary,
};
use serde::Serialize;
use sources::GatewayClient;

pub(crate) const PIPELINE_NOT_FOUND: &str = "Pipeline not found";

#[derive(Debug, Serialize)]
pub(crate) struct HomeView {
    pub(crate) pipelines: Vec<Flow>,
    pub(crate) ml_pipelines: Vec<PipelineSummary>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PipelineDetailView {
    pub(crate) pipeline: FlowInfo,
    pub(crate) analysis: RunSummary<FlowRun>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MlPipelineDetailView {
    pub(crate) pipeline_name: String,
    pub(crate) analysis: RunSummary<MlExecution>,
}

pub(crate) async fn home(gateway: &GatewayClient) -> Result<HomeView, DashboardError> {
    let pipelines = gateway.list_flows().await?;
    let ml_pipelines = gateway.list_ml_pipelines().await?;
    Ok(HomeView {
        pipelines,
        ml_pipelines,
    })
}

pub(crate) async fn pipeline_detail(
    gateway: &GatewayClient,
    flow_id: &str,
) -> Result<PipelineDetailView, DashboardError> {
    let records = gateway.list_flow_runs(flow_id).await?;
    let Some(pipeline) = FlowInfo::from_runs(&records) else {
        tracing::info!(event = "pipeline.miss", flow_id = %flow_id, "no runs for pipeline");
        return Err(DashboardError::NotFound(PIPELINE_NOT_FOUND));
    };
    let runs = normalize_flow_runs(records)?;
    let analysis = summarize::<FlowRunPolicy>(runs);
    tracing::info!(
        flow_id = %flow_id,
        total_runs = analysis.total_runs,
        success_rate = analysis.success_rate,
        "pipeline summarized"
    );
    Ok(PipelineDetailView { pipeline, analysis })
}

/// An undecodable execution listing is reported as not found rather than
/// as an upstream failure.
pub(crate) async fn ml_pipeline_detail(
    gateway: &GatewayClient,
    pipeline_id: &str,
) -> Result<MlPipelineDetailView, DashboardError> {
    let list = match gateway.list_ml_executions(pipeline_id).await {
        Ok(list) => list,
        Err(err) if err.is_decode() => {
            tracing::info!(
                event = "ml_pipeline.miss",
                pipeline_id = %pipeline_id,
                error = %err,
                "malformed execution list"
            );
            return Err(DashboardError::NotFound(PIPELINE_NOT_FOUND));
        }
        Err(err) => return Err(err.into()),
    };
    if list.pipeline_execution_summaries.is_empty() {
        tracing::info!(event = "ml_pipeline.miss", pipeline_id = %pipeline_id, "no executions");
        return Err(DashboardError::NotFound(PIPELINE_NOT_FOUND));
    }
    let executions = normalize_executions(list.pipeline_execution_summaries)?;
    let analysis = summarize::<MlExecutionPolicy>(executions);
    tracing::info!(
        pipeline_id = %pipeline_id,
        total_runs = analysis.total_runs,
        success_rate = analysis.success_rate,
        "ml pipeline summarized"
    );
    Ok(MlPipelineDetailView {
        pipeline_name: pipeline_id.to_string(),
        analysis,
    })
}

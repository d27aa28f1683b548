use protocol::{HandlerEvent, HandlerResponse, FLOW_ID_PARAM, PIPELINE_ID_PARAM};
use sources::{list_all_pipelines, list_executions_with_details, FlowApi, SageMakerApi};
use std::sync::Arc;
use tracing::Instrument;

pub(crate) const MISSING_FLOW_ID: &str = "Missing id parameter in query string";
pub(crate) const MISSING_PIPELINE_ID: &str = "pipeline_id is required";

/// Stateless request/response adapters over the fetch adapters. Every
/// upstream failure becomes a 500 carrying the error text.
pub(crate) struct Handlers {
    flows: Arc<dyn FlowApi>,
    ml: Arc<dyn SageMakerApi>,
    detail_concurrency: usize,
}

impl Handlers {
    pub(crate) fn new(
        flows: Arc<dyn FlowApi>,
        ml: Arc<dyn SageMakerApi>,
        detail_concurrency: usize,
    ) -> Self {
        Self {
            flows,
            ml,
            detail_concurrency,
        }
    }

    pub(crate) async fn get_pipelines(&self, _event: &HandlerEvent) -> HandlerResponse {
        invoke("get_pipelines", async {
            respond(self.flows.list_flows().await)
        })
        .await
    }

    pub(crate) async fn get_pipeline_status(&self, event: &HandlerEvent) -> HandlerResponse {
        invoke("get_pipeline_status", async {
            let Some(flow_id) = event.query(FLOW_ID_PARAM) else {
                return HandlerResponse::bad_request(MISSING_FLOW_ID);
            };
            respond(self.flows.list_flow_runs(flow_id).await)
        })
        .await
    }

    pub(crate) async fn get_ml_pipelines(&self, _event: &HandlerEvent) -> HandlerResponse {
        invoke("get_ml_pipelines", async {
            respond(list_all_pipelines(self.ml.as_ref()).await)
        })
        .await
    }

    pub(crate) async fn get_ml_pipeline_status(&self, event: &HandlerEvent) -> HandlerResponse {
        invoke("get_ml_pipeline_status", async {
            let Some(pipeline_id) = event.query(PIPELINE_ID_PARAM) else {
                return HandlerResponse::bad_request(MISSING_PIPELINE_ID);
            };
            respond(
                list_executions_with_details(self.ml.as_ref(), pipeline_id, self.detail_concurrency)
                    .await,
            )
        })
        .await
    }
}

fn respond<T: serde::Serialize>(result: Result<T, sources::SourceError>) -> HandlerResponse {
    match result {
        Ok(payload) => HandlerResponse::ok(&payload),
        Err(err) => {
            tracing::warn!(error = %err, "upstream call failed");
            HandlerResponse::internal_error(err)
        }
    }
}

async fn invoke<F>(handler: &'static str, work: F) -> HandlerResponse
where
    F: std::future::Future<Output = HandlerResponse>,
{
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("handler", handler, %request_id);
    async move {
        let response = work.await;
        tracing::info!(
            status_code = response.status_code,
            body_len = response.body.len(),
            "handler finished"
        );
        response
    }
    .instrument(span)
    .await
}

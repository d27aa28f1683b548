use crate::error::DashboardError;
use crate::views::{self, HomeView, MlPipelineDetailView, PipelineDetailView};
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use sources::GatewayClient;

#[derive(Clone)]
pub(crate) struct AppState {
    gateway: GatewayClient,
}

pub(crate) fn router(gateway: GatewayClient) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/pipeline/:id", get(pipeline_details))
        .route("/ml/pipeline/:id", get(ml_pipeline_details))
        .with_state(AppState { gateway })
        .layer(middleware::from_fn(log_http_request))
}

async fn health() -> &'static str {
    "ok"
}

async fn log_http_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        "http request"
    );
    response
}

async fn home(State(state): State<AppState>) -> Result<Json<HomeView>, DashboardError> {
    views::home(&state.gateway).await.map(Json)
}

async fn pipeline_details(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<PipelineDetailView>, DashboardError> {
    views::pipeline_detail(&state.gateway, &id).await.map(Json)
}

async fn ml_pipeline_details(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MlPipelineDetailView>, DashboardError> {
    views::ml_pipeline_detail(&state.gateway, &id).await.map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use tokio::net::TcpListener;

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    async fn flow_runs(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
        let id = params.get("id").cloned().unwrap_or_default();
        match id.as_str() {
            "empty" => (StatusCode::OK, "[]".to_string()),
            "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
            _ => (
                StatusCode::OK,
                json!([
                    {
                        "id": "run-a", "flow_id": id, "flow_name": "Simple Data Pipeline",
                        "name": "a", "flow_version": "v1",
                        "created": "2025-01-01T00:00:00Z", "updated": "2025-01-01T00:00:10Z",
                        "state_type": "COMPLETED", "total_run_time": 10.0
                    },
                    {
                        "id": "run-b", "flow_id": id, "flow_name": "Simple Data Pipeline",
                        "name": "b", "flow_version": "v1",
                        "created": "2025-01-02T00:00:00Z", "updated": "2025-01-02T00:00:20Z",
                        "state_type": "FAILED", "state": {"message": "timeout"},
                        "total_run_time": 20.0
                    }
                ])
                .to_string(),
            ),
        }
    }

    async fn ml_executions(Query(params): Query<HashMap<String, String>>) -> (StatusCode, String) {
        let id = params.get("pipeline_id").cloned().unwrap_or_default();
        match id.as_str() {
            "empty" => (StatusCode::OK, json!({"PipelineExecutionSummaries": []}).to_string()),
            "malformed" => (StatusCode::OK, "\"not a list\"".to_string()),
            "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
            _ => (
                StatusCode::OK,
                json!({"PipelineExecutionSummaries": [
                    {"PipelineExecutionArn": "arn:1", "StartTime": "2025-01-01T00:00:00+00:00",
                     "PipelineExecutionStatus": "Succeeded"},
                    {"PipelineExecutionArn": "arn:2", "StartTime": "2025-01-02T00:00:00+00:00",
                     "PipelineExecutionStatus": "Failed"}
                ]})
                .to_string(),
            ),
        }
    }

    async fn spawn_dashboard() -> String {
        let fake_gateway = Router::new()
            .route(
                "/data/pipeline",
                get(|| async {
                    Json(json!([{
                        "id": "flow-1", "created": "2025-03-24T12:55:48Z",
                        "updated": "2025-03-24T12:55:48Z", "name": "Simple Data Pipeline",
                        "tags": [], "labels": {}
                    }]))
                }),
            )
            .route("/data/pipeline/status", get(flow_runs))
            .route(
                "/ml/pipeline",
                get(|| async {
                    Json(json!([{"PipelineArn": "arn:p", "PipelineName": "train"}]))
                }),
            )
            .route("/ml/pipeline/status", get(ml_executions));
        let gateway_url = serve(fake_gateway).await;
        serve(router(GatewayClient::new(gateway_url, reqwest::Client::new()))).await
    }

    async fn fetch(url: String) -> (u16, String) {
        let response = reqwest::get(url).await.expect("send");
        let status = response.status().as_u16();
        (status, response.text().await.expect("body"))
    }

    #[tokio::test]
    async fn home_lists_both_sources() {
        let base = spawn_dashboard().await;
        let (status, body) = fetch(format!("{base}/")).await;
        assert_eq!(status, 200);
        let view: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(view["pipelines"][0]["name"], "Simple Data Pipeline");
        assert_eq!(view["ml_pipelines"][0]["PipelineName"], "train");
    }

    #[tokio::test]
    async fn pipeline_detail_summarizes_runs() {
        let base = spawn_dashboard().await;
        let (status, body) = fetch(format!("{base}/pipeline/flow-1")).await;
        assert_eq!(status, 200);
        let view: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(view["pipeline"]["id"], "flow-1");
        assert_eq!(view["pipeline"]["version"], "v1");
        let analysis = &view["analysis"];
        assert_eq!(analysis["total_runs"], 2);
        assert_eq!(analysis["avg_run_time"], 15.0);
        assert_eq!(analysis["success_rate"], 50.0);
        assert_eq!(analysis["latest_run"]["id"], "run-b");
        assert_eq!(analysis["error_types"], json!({"timeout": 1}));
        assert_eq!(analysis["runs"][0]["id"], "run-b");
    }

    #[tokio::test]
    async fn no_runs_is_not_found_and_upstream_error_is_bad_gateway() {
        let base = spawn_dashboard().await;
        let (status, body) = fetch(format!("{base}/pipeline/empty")).await;
        assert_eq!(status, 404);
        assert_eq!(body, "Pipeline not found");

        let (status, body) = fetch(format!("{base}/pipeline/broken")).await;
        assert_eq!(status, 502);
        assert!(body.contains("status 500"));
    }

    #[tokio::test]
    async fn ml_detail_summarizes_executions() {
        let base = spawn_dashboard().await;
        let (status, body) = fetch(format!("{base}/ml/pipeline/train")).await;
        assert_eq!(status, 200);
        let view: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(view["pipeline_name"], "train");
        let analysis = &view["analysis"];
        assert!(analysis.get("avg_run_time").is_none());
        assert_eq!(analysis["success_rate"], 50.0);
        assert_eq!(analysis["error_types"], json!({"Failed": 1}));
        assert_eq!(analysis["latest_run"]["arn"], "arn:2");
    }

    #[tokio::test]
    async fn ml_detail_empty_or_malformed_is_not_found() {
        let base = spawn_dashboard().await;
        assert_eq!(fetch(format!("{base}/ml/pipeline/empty")).await.0, 404);
        assert_eq!(fetch(format!("{base}/ml/pipeline/malformed")).await.0, 404);
        assert_eq!(fetch(format!("{base}/ml/pipeline/broken")).await.0, 502);
    }
}

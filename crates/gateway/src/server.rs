use crate::handlers::Handlers;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use protocol::{HandlerEvent, HandlerResponse};
use sources::gateway::{FLOWS_PATH, FLOW_RUNS_PATH, ML_EXECUTIONS_PATH, ML_PIPELINES_PATH};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    handlers: Arc<Handlers>,
}

pub(crate) fn router(handlers: Handlers) -> Router {
    let state = AppState {
        handlers: Arc::new(handlers),
    };
    Router::new()
        .route("/health", get(health))
        .route(FLOWS_PATH, get(get_pipelines))
        .route(FLOW_RUNS_PATH, get(get_pipeline_status))
        .route(ML_PIPELINES_PATH, get(get_ml_pipelines))
        .route(ML_EXECUTIONS_PATH, get(get_ml_pipeline_status))
        .with_state(state)
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

async fn get_pipelines(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let event = HandlerEvent::with_query(params);
    into_http(state.handlers.get_pipelines(&event).await)
}

async fn get_pipeline_status(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let event = HandlerEvent::with_query(params);
    into_http(state.handlers.get_pipeline_status(&event).await)
}

async fn get_ml_pipelines(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let event = HandlerEvent::with_query(params);
    into_http(state.handlers.get_ml_pipelines(&event).await)
}

async fn get_ml_pipeline_status(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let event = HandlerEvent::with_query(params);
    into_http(state.handlers.get_ml_pipeline_status(&event).await)
}

fn into_http(response: HandlerResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = if status.is_server_error() {
        "text/plain; charset=utf-8"
    } else {
        "application/json"
    };
    (status, [(CONTENT_TYPE, content_type)], response.body).into_response()
}

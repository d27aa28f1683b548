use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use protocol::TimestampError;
use sources::SourceError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum DashboardError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("upstream error: {0}")]
    Upstream(#[from] SourceError),
    #[error("upstream returned invalid data: {0}")]
    InvalidData(#[from] TimestampError),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::Upstream(_) | DashboardError::InvalidData(_) => {
                StatusCode::BAD_GATEWAY
            }
        };
        if status == StatusCode::BAD_GATEWAY {
            tracing::warn!(error = %self, "dashboard request failed");
        }
        (status, self.to_string()).into_response()
    }
}

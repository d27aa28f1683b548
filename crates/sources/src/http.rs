use crate::error::SourceError;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};

const MAX_ERROR_BODY: usize = 512;
static HTTP_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Builds the shared client. Timeouts stay at the transport defaults.
pub fn build_http_client() -> Result<Client, SourceError> {
    Client::builder()
        .user_agent(concat!("pipewatch/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| SourceError::Transport {
            url: String::new(),
            source,
        })
}

pub(crate) fn join_base_path(base: &str, path: &str) -> Result<String, SourceError> {
    if base.trim().is_empty() {
        return Err(SourceError::InvalidUrl("base url is empty".to_string()));
    }
    let normalized_base = base.trim_end_matches('/');
    let normalized_path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    Ok(format!("{normalized_base}{normalized_path}"))
}

/// Sends one request and decodes a 2xx JSON body. Anything else is an error.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &str,
) -> Result<T, SourceError> {
    let request_id = HTTP_REQUEST_ID.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(request_id, url = %url, "upstream request start");
    let response = request.send().await.map_err(|source| {
        tracing::warn!(
            request_id,
            url = %url,
            timeout = source.is_timeout(),
            connect = source.is_connect(),
            "upstream request failed"
        );
        SourceError::Transport {
            url: url.to_string(),
            source,
        }
    })?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| SourceError::Transport {
            url: url.to_string(),
            source,
        })?;
    tracing::debug!(
        request_id,
        url = %url,
        status = status.as_u16(),
        body_len = body.len(),
        "upstream response"
    );
    if !status.is_success() {
        return Err(SourceError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            body: truncate(body),
        });
    }
    serde_json::from_str(&body).map_err(|source| SourceError::Decode {
        url: url.to_string(),
        source,
    })
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}

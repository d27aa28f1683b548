use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The subset of an HTTP-triggered function event the handlers read.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HandlerEvent {
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl HandlerEvent {
    pub fn with_query(params: HashMap<String, String>) -> Self {
        Self {
            query_string_parameters: Some(params),
        }
    }

    /// A query parameter, treating blank values as missing.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self {
                status_code: 200,
                body,
            },
            Err(err) => Self::internal_error(err),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self {
            status_code: 400,
            body: json_string(message),
        }
    }

    /// Error text is sent as-is, not JSON-encoded.
    pub fn internal_error(err: impl std::fmt::Display) -> Self {
        Self {
            status_code: 500,
            body: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code / 100 == 2
    }
}

fn json_string(message: &str) -> String {
    serde_json::Value::String(message.to_string()).to_string()
}

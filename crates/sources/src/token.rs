use crate::error::SourceError;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

const DEFAULT_SECRET_KEY: &str = "token";

/// Where the orchestration API bearer token comes from. Resolved on every
/// call so a rotated secret is picked up without a restart.
#[derive(Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenSource {
    Inline {
        value: String,
    },
    Env {
        var: String,
    },
    /// A JSON secret document, e.g. `{"token": "..."}`, read from disk.
    SecretFile {
        path: PathBuf,
        #[serde(default = "default_secret_key")]
        key: String,
    },
}

fn default_secret_key() -> String {
    DEFAULT_SECRET_KEY.to_string()
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Inline { .. } => f.write_str("Inline(<redacted>)"),
            TokenSource::Env { var } => f.debug_struct("Env").field("var", var).finish(),
            TokenSource::SecretFile { path, key } => f
                .debug_struct("SecretFile")
                .field("path", path)
                .field("key", key)
                .finish(),
        }
    }
}

impl TokenSource {
    pub async fn resolve(&self) -> Result<String, SourceError> {
        let token = match self {
            TokenSource::Inline { value } => value.clone(),
            TokenSource::Env { var } => std::env::var(var)
                .map_err(|err| SourceError::Token(format!("env {var}: {err}")))?,
            TokenSource::SecretFile { path, key } => {
                let raw = tokio::fs::read_to_string(path).await.map_err(|err| {
                    SourceError::Token(format!("failed to read {}: {err}", path.display()))
                })?;
                secret_field(&raw, key).map_err(|message| {
                    SourceError::Token(format!("{}: {message}", path.display()))
                })?
            }
        };
        if token.trim().is_empty() {
            return Err(SourceError::Token("token is empty".to_string()));
        }
        Ok(token)
    }
}

fn secret_field(raw: &str, key: &str) -> Result<String, String> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|err| format!("secret is not valid json: {err}"))?;
    value
        .get(key)
        .and_then(|field| field.as_str())
        .map(str::to_string)
        .ok_or_else(|| format!("secret has no string field {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file(contents: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("pipewatch-secret-{nanos}.json"));
        std::fs::write(&path, contents).expect("write secret");
        path
    }

    #[tokio::test]
    async fn reads_token_field_from_secret_file() {
        let path = temp_file(r#"{"token":"pnu_abc","other":1}"#);
        let source = TokenSource::SecretFile {
            path: path.clone(),
            key: default_secret_key(),
        };
        assert_eq!(source.resolve().await.expect("token"), "pnu_abc");
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn secret_file_is_read_on_every_call() {
        let path = temp_file(r#"{"token":"first"}"#);
        let source = TokenSource::SecretFile {
            path: path.clone(),
            key: default_secret_key(),
        };
        assert_eq!(source.resolve().await.expect("token"), "first");
        std::fs::write(&path, r#"{"token":"second"}"#).expect("rotate");
        assert_eq!(source.resolve().await.expect("token"), "second");
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn missing_key_is_a_token_error() {
        let path = temp_file(r#"{"api_key":"x"}"#);
        let source = TokenSource::SecretFile {
            path: path.clone(),
            key: default_secret_key(),
        };
        let err = source.resolve().await.unwrap_err();
        assert!(matches!(err, SourceError::Token(_)));
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn empty_inline_token_is_rejected() {
        let source = TokenSource::Inline {
            value: String::new(),
        };
        assert!(source.resolve().await.is_err());
    }

    #[test]
    fn debug_redacts_inline_value() {
        let source = TokenSource::Inline {
            value: "secret".to_string(),
        };
        assert!(!format!("{source:?}").contains("secret"));
    }

    #[test]
    fn decodes_tagged_config() {
        let source: TokenSource =
            toml::from_str("kind = \"secret_file\"\npath = \"/run/secrets/prefect.json\"")
                .expect("decode");
        match source {
            TokenSource::SecretFile { key, .. } => assert_eq!(key, "token"),
            other => panic!("unexpected {other:?}"),
        }
    }
}

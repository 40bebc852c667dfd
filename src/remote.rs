use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::models::RequestShape;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("knowledge service did not answer before the timeout")]
    Timeout,
    #[error("knowledge service returned HTTP {0}")]
    UpstreamStatus(u16),
    #[error("failed to reach knowledge service: {0}")]
    Transport(String),
    #[error("knowledge service returned a body that is not JSON: {0}")]
    MalformedBody(String),
}

/// Builds the JSON body the upstream expects for a question.
pub trait RequestShaper: Send + Sync {
    fn shape(&self, question: &str) -> Value;
}

impl RequestShaper for RequestShape {
    fn shape(&self, question: &str) -> Value {
        match self {
            RequestShape::Data => json!({ "data": [question] }),
            RequestShape::Text => json!({ "text": question }),
        }
    }
}

/// Anything that can produce a raw, un-normalized upstream payload for a question.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    async fn fetch_answer(&self, question: &str, timeout: Duration) -> Result<Value, RemoteError>;
}

#[derive(Clone)]
pub struct RemoteAnswerClient {
    client: Client,
    endpoint: String,
    bearer_token: Option<String>,
    shaper: Arc<dyn RequestShaper>,
}

impl RemoteAnswerClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint(),
            bearer_token: config.bearer_token.clone(),
            shaper: Arc::new(config.request_shape),
        }
    }

    pub fn with_shaper(mut self, shaper: impl RequestShaper + 'static) -> Self {
        self.shaper = Arc::new(shaper);
        self
    }

    pub async fn fetch(&self, question: &str, timeout: Duration) -> Result<Value, RemoteError> {
        let body = self.shaper.shape(question);

        let mut request = self.client.post(&self.endpoint).timeout(timeout).json(&body);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %error_summary(&body),
                "knowledge service returned non-success status"
            );
            return Err(RemoteError::UpstreamStatus(status.as_u16()));
        }

        response.json::<Value>().await.map_err(classify)
    }
}

#[async_trait]
impl AnswerSource for RemoteAnswerClient {
    async fn fetch_answer(&self, question: &str, timeout: Duration) -> Result<Value, RemoteError> {
        self.fetch(question, timeout).await
    }
}

fn classify(err: reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Timeout
    } else if err.is_decode() {
        RemoteError::MalformedBody(err.to_string())
    } else {
        RemoteError::Transport(err.to_string())
    }
}

/// Short description of a failed response body for logs.
fn error_summary(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|json| json.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| trimmed.chars().take(200).collect())
}

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::RequestShape;

#[derive(Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub path: String,
    pub bearer_token: Option<String>,
    pub timeout_ms: u64,
    pub request_shape: RequestShape,
}

impl UpstreamConfig {
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.path.is_empty() {
            return base.to_string();
        }
        if self.path.starts_with('/') {
            format!("{}{}", base, self.path)
        } else {
            format!("{}/{}", base, self.path)
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("path", &self.path)
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout_ms", &self.timeout_ms)
            .field("request_shape", &self.request_shape)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub allowed_origins: Vec<String>,
    pub max_answer_chars: usize,
    pub knowledge_path: Option<PathBuf>,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bearer_token = non_blank("UPSTREAM_TOKEN").or_else(|| non_blank("HF_TOKEN"));

        Self {
            bind_addr: lookup("GOT_EXPLORER_BIND")
                .unwrap_or_else(|| "127.0.0.1:8000".to_string()),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
            max_answer_chars: lookup("MAX_ANSWER_CHARS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(800),
            knowledge_path: non_blank("KNOWLEDGE_BASE_PATH").map(PathBuf::from),
            upstream: UpstreamConfig {
                base_url: lookup("UPSTREAM_BASE_URL")
                    .unwrap_or_else(|| "https://willhcurry-gotbot.hf.space".to_string()),
                path: lookup("UPSTREAM_PATH").unwrap_or_else(|| "/api/predict".to_string()),
                bearer_token,
                timeout_ms: lookup("UPSTREAM_TIMEOUT_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10_000),
                request_shape: lookup("UPSTREAM_REQUEST_SHAPE")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_default(),
            },
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

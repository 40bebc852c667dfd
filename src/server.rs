use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::models::{AnswerResult, AskRequest, StatusResponse, SuggestionsResponse};
use crate::resolver::AnswerResolver;
use crate::suggest::suggest;

const TRUNCATION_NOTE: &str = "... (Response truncated for readability)";
const MAX_SENTENCES: usize = 8;

#[derive(Clone)]
struct AppState {
    resolver: AnswerResolver,
    max_answer_chars: usize,
}

pub async fn run_server(config: AppConfig, resolver: AnswerResolver) -> Result<()> {
    let addr: SocketAddr = config.bind_addr.parse()?;
    let app = router(&config, resolver);

    tracing::info!(upstream = %config.upstream.endpoint(), "listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(config: &AppConfig, resolver: AnswerResolver) -> Router {
    let state = AppState {
        resolver,
        max_answer_chars: config.max_answer_chars,
    };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ask", post(ask_handler))
        .route("/suggestions", post(suggestions_handler))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn index() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
    })
}

async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy".to_string(),
    })
}

async fn ask_handler(
    State(state): State<AppState>,
    request: Result<Json<AskRequest>, JsonRejection>,
) -> Response {
    let (code, question) = match request {
        Ok(Json(body)) => (StatusCode::OK, body.text.unwrap_or_default()),
        Err(rejection) => {
            tracing::warn!("unreadable ask body: {}", rejection);
            (StatusCode::BAD_REQUEST, String::new())
        }
    };

    let mut answer: AnswerResult = state.resolver.resolve(&question).await;
    answer.text = truncate_answer(&answer.text, state.max_answer_chars);

    (code, Json(answer)).into_response()
}

async fn suggestions_handler(
    request: Result<Json<AskRequest>, JsonRejection>,
) -> Json<SuggestionsResponse> {
    let question = request
        .ok()
        .and_then(|Json(body)| body.text)
        .unwrap_or_default();

    Json(SuggestionsResponse {
        questions: suggest(&question),
    })
}

/// Cuts long answers down to their leading sentences.
pub fn truncate_answer(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let sentences: Vec<&str> = text.split(". ").take(MAX_SENTENCES).collect();
    format!("{}{}", sentences.join(". "), TRUNCATION_NOTE)
}

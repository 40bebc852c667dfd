use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::UpstreamConfig;
use crate::knowledge::{detect_house, KeywordResponder};
use crate::models::AnswerResult;
use crate::normalize;
use crate::remote::{AnswerSource, RemoteAnswerClient, RemoteError};

pub const NO_QUESTION_MESSAGE: &str =
    "No question provided. Please ask something about Westeros.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    Idle,
    AwaitingRemote,
    Success,
    FallingBack,
    Done,
}

/// Where the final answer of a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOrigin {
    Rejected,
    Remote,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub result: AnswerResult,
    pub origin: AnswerOrigin,
}

#[derive(Clone)]
pub struct AnswerResolver {
    source: Arc<dyn AnswerSource>,
    responder: KeywordResponder,
    timeout: Duration,
}

impl AnswerResolver {
    pub fn new(config: &UpstreamConfig, responder: KeywordResponder) -> Self {
        Self::with_source(
            Arc::new(RemoteAnswerClient::new(config)),
            responder,
            config.timeout(),
        )
    }

    pub fn with_source(
        source: Arc<dyn AnswerSource>,
        responder: KeywordResponder,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            responder,
            timeout,
        }
    }

    pub async fn resolve(&self, question: &str) -> AnswerResult {
        self.resolve_traced(question).await.result
    }

    pub async fn resolve_traced(&self, question: &str) -> Resolution {
        let span = tracing::info_span!("resolve", ask_id = %Uuid::new_v4());
        self.run(question).instrument(span).await
    }

    async fn run(&self, question: &str) -> Resolution {
        transition(ResolverState::Idle);
        if question.trim().is_empty() {
            tracing::info!("rejecting empty question");
            transition(ResolverState::Done);
            return Resolution {
                result: AnswerResult::error(NO_QUESTION_MESSAGE),
                origin: AnswerOrigin::Rejected,
            };
        }
        tracing::info!(question = %question, "resolving question");

        transition(ResolverState::AwaitingRemote);
        let outcome = match tokio::time::timeout(
            self.timeout,
            self.source.fetch_answer(question, self.timeout),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(RemoteError::Timeout),
        };

        let resolution = match outcome {
            Ok(payload) => {
                transition(ResolverState::Success);
                let text = normalize::extract(&payload);
                if normalize::is_unanswered(&text) {
                    // Shown verbatim; only transport-level failures fall back.
                    tracing::warn!(text = %text, "knowledge service reachable but gave no answer");
                }
                let source_house = detect_house(&text);
                Resolution {
                    result: AnswerResult::success(text, source_house),
                    origin: AnswerOrigin::Remote,
                }
            }
            Err(err) => {
                transition(ResolverState::FallingBack);
                tracing::warn!(error = %err, "knowledge service failed, using keyword fallback");
                Resolution {
                    result: self.responder.lookup(question),
                    origin: AnswerOrigin::Fallback,
                }
            }
        };

        transition(ResolverState::Done);
        resolution
    }
}

fn transition(state: ResolverState) {
    tracing::debug!(state = ?state, "resolver state");
}

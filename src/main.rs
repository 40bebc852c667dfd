use anyhow::Result;
use tracing_subscriber::EnvFilter;

use got_explorer::knowledge::KeywordResponder;
use got_explorer::{run_server, AnswerResolver, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    tracing::debug!(?config, "loaded configuration");

    let responder = match &config.knowledge_path {
        Some(path) => KeywordResponder::load(path)?,
        None => KeywordResponder::default(),
    };
    tracing::info!(entries = responder.entries().len(), "keyword fallback ready");

    let resolver = AnswerResolver::new(&config.upstream, responder);

    run_server(config, resolver).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

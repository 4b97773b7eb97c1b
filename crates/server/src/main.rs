//! Support agent server entry point

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use support_agent_agent::{SessionStore, SupportAgent};
use support_agent_config::{load_settings, Settings};
use support_agent_llm::{LlmBackend, LlmConfig, OpenAiBackend};
use support_agent_rag::{
    EmbeddingClient, EmbeddingConfig, KnowledgeLookup, KnowledgeRetriever, RetrieverConfig,
    VectorStore, VectorStoreConfig,
};
use support_agent_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from files and environment.
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults.
    let env = std::env::var("SUPPORT_AGENT_ENV").ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!("Warning: failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        config_env = env.as_deref().unwrap_or("default"),
        "starting support agent server"
    );

    if let Err(e) = init_metrics() {
        tracing::warn!(error = %e, "failed to install metrics recorder");
    }

    // Completion backend
    let llm: Arc<dyn LlmBackend> = Arc::new(OpenAiBackend::new(LlmConfig::from(&config.llm))?);
    tracing::info!(model = llm.model_name(), "completion backend configured");
    if !llm.is_available().await {
        tracing::warn!("completion backend unreachable; chat replies will be degraded");
    }

    // Knowledge retrieval
    let embedder = EmbeddingClient::new(EmbeddingConfig::from(&config.embedding))?;
    let vector_store = VectorStore::new(VectorStoreConfig::from(&config.retrieval)).await?;
    if let Err(e) = vector_store.ensure_collection().await {
        tracing::warn!(
            error = %e,
            "vector store unreachable; knowledge retrieval will be degraded"
        );
    }
    let retriever: Arc<dyn KnowledgeLookup> = Arc::new(KnowledgeRetriever::new(
        embedder,
        vector_store,
        RetrieverConfig::from(&config.retrieval),
    ));

    // Orchestrator and shared state
    let store = Arc::new(SessionStore::new());
    let prompts = Arc::new(config.prompts.clone());
    let agent = Arc::new(SupportAgent::new(llm, retriever, store, prompts));
    let state = AppState::new(config.clone(), agent);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

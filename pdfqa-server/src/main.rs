use std::sync::Arc;

use anyhow::Context;
use pdfqa_model::{OpenAICompletionModel, OpenAIConfig, PromptTemplate};
use pdfqa_rag::{OpenAIEmbeddingProvider, PdfLoader, RagConfig, RagPipeline, RedisVectorStore};
use pdfqa_server::{AppConfig, AppState, QaService, run_server};
use pdfqa_telemetry::{TelemetryConfig, init_telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_telemetry(&TelemetryConfig::new("pdfqa").with_format(config.log_format))?;
    info!(?config, "starting pdfqa");

    let state = build_state(&config)?;
    run_server(config.server(), state).await
}

fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let embedder = OpenAIEmbeddingProvider::new(config.openai_key.as_str())?
        .with_base_url(config.openai_base_url.as_str())
        .with_model(config.embedding_model.as_str());
    let store = RedisVectorStore::new(&config.redis_url)
        .with_context(|| format!("invalid REDIS_URL {}", config.redis_url))?;

    let pipeline = RagPipeline::builder()
        .config(RagConfig::default())
        .embedding_provider(Arc::new(embedder))
        .vector_store(Arc::new(store))
        .build()?;

    let model = OpenAICompletionModel::new(
        OpenAIConfig::new(config.openai_key.as_str(), config.llm_name.as_str())
            .with_temperature(config.llm_temperature)
            .with_base_url(config.openai_base_url.as_str()),
    )?;

    let prompt = match &config.prompt_template_path {
        Some(path) => PromptTemplate::from_file(path)
            .with_context(|| format!("failed to load prompt template {}", path.display()))?,
        None => PromptTemplate::builtin()?,
    };

    let qa = QaService::new(
        Arc::new(PdfLoader::new()),
        pipeline,
        Arc::new(model),
        prompt,
        config.index_name.as_str(),
    );
    Ok(AppState::new(qa))
}

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::ApiError;
use crate::json::PrettyJson;
use crate::qa::{Answer, QaService};

#[derive(Clone)]
pub struct AppState {
    pub qa: Arc<QaService>,
}

impl AppState {
    pub fn new(qa: QaService) -> Self {
        Self { qa: Arc::new(qa) }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 3000 }
    }
}

#[derive(Debug, Default, Deserialize)]
struct StoreRequest {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchRequest {
    question: Option<String>,
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/store", post(store))
        .route("/search", post(search))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind `host:port`. The host may be a name such as `localhost`.
pub async fn bind(config: &ServerConfig) -> anyhow::Result<TcpListener> {
    TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))
}

pub async fn run_server(config: ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = app_router(state);
    let listener = bind(&config).await?;
    info!("pdfqa listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("pdfqa stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

/// A body sent without a JSON content type reads as an empty object.
fn request_body<T: Default>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
    }
}

fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| ApiError::missing_property(name))
}

async fn health() -> impl IntoResponse {
    PrettyJson(json!({"status": "ok", "service": "pdfqa"}))
}

async fn store(
    State(state): State<AppState>,
    body: Result<Json<StoreRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let url = required(request_body(body)?.url, "url")?;
    state.qa.store(&url).await?;
    Ok(PrettyJson(json!({"message": "Successfully created embeddings"})))
}

async fn search(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<PrettyJson<Answer>, ApiError> {
    let question = required(request_body(body)?.question, "question")?;
    let answer = state.qa.search(&question).await?;
    Ok(PrettyJson(answer))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn blank_and_absent_fields_are_missing() {
        assert_eq!(required(Some("a.pdf".into()), "url").unwrap(), "a.pdf");
        for value in [None, Some(String::new())] {
            let err = required(value, "url").unwrap_err();
            assert_eq!(err.to_string(), "Missing property: url");
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn default_server_config_listens_on_3000() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[tokio::test]
    async fn binds_host_names_as_well_as_addresses() {
        for host in ["localhost", "127.0.0.1"] {
            let listener = bind(&ServerConfig { host: host.to_string(), port: 0 }).await.unwrap();
            assert!(listener.local_addr().unwrap().ip().is_loopback());
        }
    }

    #[tokio::test]
    async fn unresolvable_host_fails_to_bind() {
        let config = ServerConfig { host: "no such host".to_string(), port: 0 };
        let err = bind(&config).await.unwrap_err();
        assert!(err.to_string().contains("no such host"), "{err}");
    }
}

//! HTTP interface

pub mod echo;
pub mod error;
pub mod handlers;
pub mod schemas;

use crate::agent::LanguageModel;
use crate::api::schemas::ErrorResponse;
use crate::core::config::Settings;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::any::Any as PanicPayload;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub use echo::{SimpleEchoRunner, TextRunner};
pub use error::ApiError;

/// Shared, read-only state of the HTTP service
pub struct AppState {
    pub settings: Settings,
    pub llm: Arc<dyn LanguageModel>,
    pub echo: Arc<dyn TextRunner>,
}

impl AppState {
    pub fn new(settings: Settings, llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            settings,
            llm,
            echo: Arc::new(SimpleEchoRunner),
        }
    }

    pub fn with_echo(mut self, echo: Arc<dyn TextRunner>) -> Self {
        self.echo = echo;
        self
    }
}

/// Build the application router
pub fn build_app(state: AppState) -> Router {
    let cors = create_cors_layer(&state.settings.cors_origins);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/ai/echo", get(handlers::ai_echo))
        .route("/api/courses/generate", post(handlers::generate_course))
        .route("/lessons/generate", post(handlers::generate_lesson))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Unhandled failures become a 500 with a generic detail
fn panic_response(_payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    error!("Request handler panicked");
    let body = ErrorResponse {
        detail: "Internal Server Error".to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

fn create_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    cors.max_age(Duration::from_secs(3600))
}

/// Serve the application until Ctrl+C
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.settings.bind_address();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, starting graceful shutdown"),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

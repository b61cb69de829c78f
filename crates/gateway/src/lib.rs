//! HTTP gateway for Leasebot.
//!
//! Exposes the chat API and a health check. Each chat session gets its own
//! dialogue machine; all sessions share one summary store.
//!
//! Built on Axum.

pub mod chats;

use axum::{Router, http::HeaderValue, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use leasebot_config::{AppConfig, BotData};
use leasebot_core::SystemClock;

pub use chats::{ChatState, SharedChatState, chat_router};

/// Build the full router: chat API, health check, CORS and trace logging.
pub fn build_router(state: SharedChatState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(chat_router(state))
        .layer(cors_layer(allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// CORS for the configured origins. An empty list allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    if allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let bot_data = Arc::new(BotData::load(&config.dialogue)?);
    let store = leasebot_storage::open_store(
        &config.storage.backend,
        config.storage.resolved_summary_dir(),
    );

    let state = Arc::new(
        ChatState::new(bot_data, store.clone(), Arc::new(SystemClock))
            .with_seed(config.dialogue.seed),
    );
    let app = build_router(state, &config.gateway.allowed_origins);

    info!(addr = %addr, store = store.name(), "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use leasebot_storage::InMemorySummaryStore;
    use tower::ServiceExt;

    fn test_state() -> SharedChatState {
        Arc::new(ChatState::new(
            Arc::new(BotData::builtin().unwrap()),
            Arc::new(InMemorySummaryStore::with_seed(1)),
            Arc::new(SystemClock),
        ))
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state(), &[]);

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let app = build_router(test_state(), &["http://localhost:4200".to_string()]);

        let req = Request::builder()
            .uri("/users")
            .header("origin", "http://localhost:4200")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:4200"
        );
    }

    #[tokio::test]
    async fn chat_routes_are_mounted() {
        let app = build_router(test_state(), &[]);

        let req = Request::builder()
            .method("POST")
            .uri("/chats/new/name/alice")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

//! HTTP surface for Textline.
//!
//! Three operations, each mapping to exactly one engine call:
//! - `GET  /`      — render the conversation (list turns)
//! - `POST /send`  — submit a message (handle_message), then redirect home
//! - `POST /clear` — wipe the conversation (clear_history), then redirect
//!
//! Plus a `GET /health` probe. Built on Axum.
//!
//! The conversation identity comes from the `SE-Phone-Number` header the
//! SMS-browser sends; without it the gateway falls back to a fixed `local`
//! conversation so single-user deployments work from any browser.

pub mod page;

use axum::extract::{DefaultBodyLimit, Form, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, Json, Redirect};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use textline_core::error::Error;
use textline_core::store::HistoryStore;
use textline_core::turn::ConversationId;
use textline_engine::TurnOrchestrator;
use tracing::{info, warn};

/// Header carrying the caller's phone number in the SMS browser.
const PHONE_NUMBER_HEADER: &str = "SE-Phone-Number";

/// Conversation used when no phone number header is present.
const LOCAL_CONVERSATION: &str = "local";

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: Arc<TurnOrchestrator>,
    pub store: Arc<dyn HistoryStore>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(chat_page_handler))
        .route("/send", post(send_handler))
        .route("/clear", post(clear_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Builds the store, provider, and orchestrator from config. A missing API
/// key is fatal here, before the listener binds.
pub async fn start(config: textline_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = config
        .api_key
        .clone()
        .ok_or("No API key configured — set TEXTLINE_API_KEY or api_key in textline.toml")?;

    let store: Arc<dyn HistoryStore> =
        Arc::new(textline_store::SqliteStore::new(&config.database_path).await?);

    let provider = Arc::new(textline_provider::OpenAiCompatProvider::new(
        "openai",
        &config.api_url,
        api_key,
        std::time::Duration::from_secs(config.request_timeout_secs),
    ));

    let orchestrator = Arc::new(
        TurnOrchestrator::new(store.clone(), provider, &config.model)
            .with_context_budget(config.context_budget_tokens)
            .with_temperature(config.temperature),
    );

    let state = Arc::new(GatewayState {
        orchestrator,
        store,
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Resolve the conversation for a request from its headers.
fn conversation_from_headers(headers: &HeaderMap) -> ConversationId {
    headers
        .get(PHONE_NUMBER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ConversationId::from)
        .unwrap_or_else(|| ConversationId::from(LOCAL_CONVERSATION))
}

// --- Handlers ---

async fn chat_page_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Html<String>, (StatusCode, String)> {
    let conversation_id = conversation_from_headers(&headers);

    let turns = state
        .store
        .list_turns(&conversation_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to load history: {e}"),
            )
        })?;

    let body = page::render_chat(&turns).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render page: {e}"),
        )
    })?;

    Ok(Html(body))
}

#[derive(Deserialize)]
struct SendForm {
    message: String,
}

async fn send_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<SendForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let conversation_id = conversation_from_headers(&headers);

    match state
        .orchestrator
        .handle_message(&conversation_id, &form.message)
        .await
    {
        Ok(_) => Ok(Redirect::to("/")),
        Err(Error::Validation(e)) => Err((StatusCode::BAD_REQUEST, e.to_string())),
        Err(Error::Upstream(e)) => {
            // The user turn is already stored; the next render shows it with
            // no reply. Send the browser back to the conversation.
            warn!(conversation = %conversation_id, error = %e, "Upstream failure");
            Ok(Redirect::to("/"))
        }
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

async fn clear_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Redirect, (StatusCode, String)> {
    let conversation_id = conversation_from_headers(&headers);

    let deleted = state
        .orchestrator
        .clear_history(&conversation_id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    info!(conversation = %conversation_id, deleted, "History cleared via HTTP");
    Ok(Redirect::to("/"))
}

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

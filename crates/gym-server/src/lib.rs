//! HTTP front for the gym admin backend.
//!
//! Mounts the JSON API and the per-category chat endpoints under `/api/v1`
//! over one spreadsheet store, with request tracing and permissive CORS for
//! the browser dashboard.

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, extract::State, routing::get};
use gym_chat::{Assistant, ChatService, OpenAiConfig, assistant};
use gym_core::{Category, store::GymStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GYM_*` environment variables. Every key is optional.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// Holds one directory per category (`members/`, `staff/`, ...).
  pub data_root:       PathBuf,
  /// Chat runs offline when unset.
  pub openai_api_key:  Option<String>,
  pub openai_model:    String,
  pub openai_base_url: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "0.0.0.0".to_owned(),
      port:            8000,
      data_root:       PathBuf::from("app/data/excel"),
      openai_api_key:  None,
      openai_model:    assistant::DEFAULT_MODEL.to_owned(),
      openai_base_url: assistant::DEFAULT_BASE_URL.to_owned(),
    }
  }
}

impl ServerConfig {
  /// Remote assistant settings, if an API key is configured.
  pub fn openai(&self) -> Option<OpenAiConfig> {
    let api_key = self.openai_api_key.clone().filter(|k| !k.trim().is_empty())?;
    Some(OpenAiConfig {
      api_key,
      model: self.openai_model.clone(),
      base_url: self.openai_base_url.clone(),
    })
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state for the whole server.
pub struct AppState<S, A> {
  pub store:     Arc<S>,
  pub chat:      Arc<ChatService<S, A>>,
  pub config:    Arc<ServerConfig>,
  /// Which assistant answers chat, for the status page.
  pub assistant: String,
}

impl<S, A> AppState<S, A>
where
  S: GymStore,
  A: Assistant,
{
  pub fn new(store: Arc<S>, assistant: A, label: String, config: ServerConfig) -> Self {
    Self {
      chat: Arc::new(ChatService::new(store.clone(), assistant)),
      store,
      config: Arc::new(config),
      assistant: label,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
struct Status {
  data_root: String,
  assistant: String,
}

/// `GET /`
async fn status(State(status): State<Arc<Status>>) -> Json<Value> {
  Json(json!({
    "message": "Gym admin backend is running",
    "status": "success",
    "version": env!("CARGO_PKG_VERSION"),
    "data_root": status.data_root,
    "assistant": status.assistant,
    "categories": Category::ALL,
  }))
}

/// Build the full server router.
pub fn router<S, A>(state: AppState<S, A>) -> Router
where
  S: GymStore + 'static,
  A: Assistant + 'static,
{
  let status_state = Arc::new(Status {
    data_root: state.config.data_root.display().to_string(),
    assistant: state.assistant.clone(),
  });

  let api = gym_api::api_router(state.store.clone())
    .merge(gym_chat::chat_router(state.chat.clone()));

  Router::new()
    .route("/", get(status))
    .with_state(status_state)
    .nest("/api/v1", api)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}

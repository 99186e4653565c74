//! Chat over the gym data.
//!
//! Each category has its own chat endpoint. A message is first checked for
//! an edit intent (`김철수 월회비 15만원으로 수정해줘`); a match is applied
//! through the store, anything else is answered by an [`Assistant`] with the
//! category's data as context.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let chat = ChatService::new(store.clone(), Backend::from_config(openai)?);
//! .nest("/api/v1", gym_api::api_router(store).merge(gym_chat::chat_router(Arc::new(chat))))
//! ```

pub mod assistant;
pub mod context;
pub mod error;
pub mod intent;
pub mod service;
pub mod view;

use std::sync::Arc;

use axum::{Extension, Json, Router, extract::State, routing::post};
use gym_core::{Category, store::GymStore};
use serde::Deserialize;

pub use assistant::{Assistant, Backend, OfflineAssistant, OpenAiAssistant, OpenAiConfig};
pub use error::{Error, Result};
pub use service::{ChatReply, ChatService};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
  pub message: String,
}

/// `POST /{category}/chat`
async fn chat<S, A>(
  State(service): State<Arc<ChatService<S, A>>>,
  Extension(category): Extension<Category>,
  Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>>
where
  S: GymStore,
  A: Assistant,
{
  Ok(Json(service.handle(category, &body.message).await?))
}

/// Build the chat router: one `/{category}/chat` route per category.
pub fn chat_router<S, A>(service: Arc<ChatService<S, A>>) -> Router<()>
where
  S: GymStore + 'static,
  A: Assistant + 'static,
{
  let mut router = Router::new();
  for category in Category::ALL {
    router = router.route(
      &format!("/{}/chat", category.dir_name()),
      post(chat::<S, A>).layer(Extension(category)),
    );
  }
  router.with_state(service)
}

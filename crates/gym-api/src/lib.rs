//! JSON REST API for the gym backend.
//!
//! Exposes an axum [`Router`] backed by any [`gym_core::store::GymStore`].
//! CORS, tracing and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", gym_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod read;
pub mod write;

use std::sync::Arc;

use axum::{
  Extension, Router,
  routing::{get, patch},
};
use gym_core::{Category, store::GymStore};

pub use error::ApiError;

/// Build the API router for `store`.
///
/// Per-record routes are registered once per category with the category
/// attached as an [`Extension`], so static paths such as
/// `/inventory/low-stock` never compete with a wildcard first segment.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GymStore + 'static,
{
  let mut router = Router::new()
    // Category listings
    .route("/members/", get(read::members::<S>))
    .route("/staff/", get(read::staff::<S>))
    .route("/hr/", get(read::hr::<S>))
    .route("/inventory/", get(read::inventory::<S>))
    .route("/inventory/low-stock", get(read::low_stock::<S>))
    .route("/dashboard", get(read::dashboard::<S>));

  for category in Category::ALL {
    let base = category.dir_name();
    router = router
      .route(
        &format!("/{base}/records"),
        patch(write::update::<S>)
          .post(write::create::<S>)
          .layer(Extension(category)),
      )
      .route(
        &format!("/{base}/{{id}}"),
        get(read::get_one::<S>).layer(Extension(category)),
      );
  }

  router.with_state(store)
}

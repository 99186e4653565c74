//! Read endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/members/` | members with summary |
//! | `GET`  | `/staff/` | staff with summary |
//! | `GET`  | `/hr/` | records wrapped as `data.hr_records` |
//! | `GET`  | `/inventory/` | items plus the low-stock subset |
//! | `GET`  | `/inventory/low-stock` | low-stock subset only |
//! | `GET`  | `/{category}/{id}` | 404 if not found |
//! | `GET`  | `/dashboard` | all four categories |
//!
//! A category whose file cannot be read answers with an empty dataset and
//! the failure listed under `warnings`.

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::{Path, State},
};
use gym_core::{
  Category,
  parse::Dataset,
  record::{HrRecord, InventoryItem, Member, StaffMember},
  store::GymStore,
  summary::Summarize,
};
use serde_json::{Value, json};
use tracing::warn;

use crate::error::ApiError;

async fn load<S, T>(store: &S) -> Dataset<T>
where
  S: GymStore,
  T: Summarize + Send + 'static,
{
  let category = T::CATEGORY;
  match store.read::<T>().await {
    Ok(dataset) => dataset,
    Err(err) => {
      warn!(%category, error = %err, "serving empty dataset");
      Dataset::degraded(err)
    }
  }
}

// ─── Lists ────────────────────────────────────────────────────────────────────

/// `GET /members/`
pub async fn members<S: GymStore>(State(store): State<Arc<S>>) -> Json<Value> {
  let ds = load::<S, Member>(&store).await;
  Json(json!({
    "total_count": ds.records.len(),
    "members": ds.records,
    "summary": ds.summary,
    "warnings": ds.warnings,
    "revision": ds.revision,
  }))
}

/// `GET /staff/`
pub async fn staff<S: GymStore>(State(store): State<Arc<S>>) -> Json<Value> {
  let ds = load::<S, StaffMember>(&store).await;
  Json(json!({
    "total_count": ds.records.len(),
    "staff": ds.records,
    "summary": ds.summary,
    "warnings": ds.warnings,
    "revision": ds.revision,
  }))
}

/// `GET /hr/`
pub async fn hr<S: GymStore>(State(store): State<Arc<S>>) -> Json<Value> {
  let ds = load::<S, HrRecord>(&store).await;
  Json(json!({
    "total_count": ds.records.len(),
    "data": { "hr_records": ds.records },
    "summary": ds.summary,
    "warnings": ds.warnings,
    "revision": ds.revision,
  }))
}

/// `GET /inventory/`
pub async fn inventory<S: GymStore>(State(store): State<Arc<S>>) -> Json<Value> {
  let ds = load::<S, InventoryItem>(&store).await;
  Json(json!({
    "total_count": ds.records.len(),
    "low_stock_items": ds.low_stock(),
    "items": ds.records,
    "summary": ds.summary,
    "warnings": ds.warnings,
    "revision": ds.revision,
  }))
}

/// `GET /inventory/low-stock`
pub async fn low_stock<S: GymStore>(State(store): State<Arc<S>>) -> Json<Value> {
  let ds = load::<S, InventoryItem>(&store).await;
  let low = ds.low_stock();
  Json(json!({
    "alert_count": low.len(),
    "low_stock_items": low,
    "inventory_summary": ds.summary,
  }))
}

/// `GET /dashboard`
pub async fn dashboard<S: GymStore>(State(store): State<Arc<S>>) -> Json<Value> {
  let view = store.compose_dashboard().await;
  Json(json!({ "dashboard": view }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

async fn find<S, T>(store: &S, id: i64) -> Result<Value, ApiError>
where
  S: GymStore,
  T: Summarize + Send + 'static,
{
  let record = store.find::<T>(id).await.map_err(ApiError::store)?;
  let record = record.ok_or_else(|| {
    ApiError::NotFound(format!("{} {id}", T::CATEGORY.noun()))
  })?;
  Ok(json!(record))
}

/// `GET /{category}/{id}`
pub async fn get_one<S: GymStore>(
  State(store): State<Arc<S>>,
  Extension(category): Extension<Category>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
  let record = match category {
    Category::Members => find::<S, Member>(&store, id).await,
    Category::Staff => find::<S, StaffMember>(&store, id).await,
    Category::Hr => find::<S, HrRecord>(&store, id).await,
    Category::Inventory => find::<S, InventoryItem>(&store, id).await,
  }?;
  Ok(Json(record))
}

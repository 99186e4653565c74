//! Write endpoints.
//!
//! | Method  | Path | Body |
//! |---------|------|------|
//! | `PATCH` | `/{category}/records` | `{"key","field","value","expected_revision"?}` |
//! | `POST`  | `/{category}/records` | `{"fields":{...}}` |
//!
//! Both answer with a [`WriteReport`]; the status code follows the failure
//! kind so clients can branch on either.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
  Extension, Json,
  extract::State,
  http::StatusCode,
};
use gym_core::{
  Category,
  store::{GymStore, WriteReport},
  update::FieldEdit,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::status_for;

/// JSON scalars as the text a spreadsheet user would have typed.
fn plain_text(value: &Value) -> String {
  match value {
    Value::Null => String::new(),
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

fn respond(report: WriteReport, success: StatusCode) -> (StatusCode, Json<WriteReport>) {
  let status = report.kind.map_or(success, status_for);
  (status, Json(report))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub key:               String,
  pub field:             String,
  pub value:             Value,
  pub expected_revision: Option<String>,
}

/// `PATCH /{category}/records`
pub async fn update<S: GymStore>(
  State(store): State<Arc<S>>,
  Extension(category): Extension<Category>,
  Json(body): Json<UpdateBody>,
) -> (StatusCode, Json<WriteReport>) {
  let edit = FieldEdit::new(body.key, body.field, plain_text(&body.value));
  let result = store.update_field(category, edit, body.expected_revision).await;
  respond(WriteReport::from_update(result), StatusCode::OK)
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub fields: BTreeMap<String, Value>,
}

/// `POST /{category}/records`
pub async fn create<S: GymStore>(
  State(store): State<Arc<S>>,
  Extension(category): Extension<Category>,
  Json(body): Json<CreateBody>,
) -> (StatusCode, Json<WriteReport>) {
  let fields = body
    .fields
    .iter()
    .map(|(k, v)| (k.clone(), plain_text(v)))
    .collect();
  let result = store.create_record(category, fields).await;
  respond(WriteReport::from_create(result), StatusCode::CREATED)
}

//! The `GymStore` trait and the write report returned to clients.
//!
//! The trait is implemented by storage backends (e.g. `gym-store-xlsx`).
//! The HTTP and chat layers depend on this abstraction, not on any concrete
//! backend.

use std::{collections::BTreeMap, fmt, future::Future};

use serde::Serialize;

use crate::{
  category::Category,
  dashboard::DashboardView,
  error::{Classify, ErrorKind},
  parse::Dataset,
  record::{HrRecord, InventoryItem, Member, StaffMember},
  summary::Summarize,
  update::{FieldEdit, UpdateOutcome},
};

// ─── Write results ───────────────────────────────────────────────────────────

/// A field edit that reached the backing file.
#[derive(Debug, Clone, PartialEq)]
pub struct Updated {
  pub outcome:  UpdateOutcome,
  /// Revision of the file after the write.
  pub revision: String,
}

/// A record that was appended to the backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
  pub category: Category,
  pub id:       i64,
  pub key:      String,
  pub revision: String,
}

/// The uniform result of every write, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReport {
  pub success:  bool,
  pub message:  String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:       Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub revision: Option<String>,
  /// Failure classification; absent on success.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub kind:     Option<ErrorKind>,
}

impl WriteReport {
  pub fn failed<E: fmt::Display + Classify>(err: &E) -> Self {
    Self {
      success:  false,
      message:  err.to_string(),
      id:       None,
      revision: None,
      kind:     Some(err.kind()),
    }
  }

  pub fn from_update<E: fmt::Display + Classify>(result: Result<Updated, E>) -> Self {
    match result {
      Ok(updated) => Self {
        success:  true,
        message:  updated.outcome.message(),
        id:       None,
        revision: Some(updated.revision),
        kind:     None,
      },
      Err(err) => Self::failed(&err),
    }
  }

  pub fn from_create<E: fmt::Display + Classify>(result: Result<Created, E>) -> Self {
    match result {
      Ok(created) => Self {
        success:  true,
        message:  format!(
          "added {} {:?} with id {}",
          created.category.noun(),
          created.key,
          created.id
        ),
        id:       Some(created.id),
        revision: Some(created.revision),
        kind:     None,
      },
      Err(err) => Self::failed(&err),
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a gym data backend.
///
/// Reads always reflect the backing files at call time. Writes are
/// read-modify-write cycles serialised per category.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GymStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Load every record of `T`'s category, with summary and warnings.
  fn read<T>(
    &self,
  ) -> impl Future<Output = Result<Dataset<T>, Self::Error>> + Send + '_
  where
    T: Summarize + Send + 'static;

  /// Look up one record by identifier. Returns `None` if absent.
  fn find<T>(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<T>, Self::Error>> + Send + '_
  where
    T: Summarize + Send + 'static,
  {
    async move {
      let dataset = self.read::<T>().await?;
      Ok(dataset.records.into_iter().find(|r| r.id() == id))
    }
  }

  /// Load all four categories; each one degrades on its own.
  fn compose_dashboard(&self) -> impl Future<Output = DashboardView> + Send + '_ {
    async move {
      let members = self.read::<Member>().await;
      let staff = self.read::<StaffMember>().await;
      let hr = self.read::<HrRecord>().await;
      let inventory = self.read::<InventoryItem>().await;
      DashboardView::compose(members, staff, hr, inventory)
    }
  }

  // ── Writes ────────────────────────────────────────────────────────────

  /// Set one field of the record whose natural key is `edit.key`.
  ///
  /// When `expected_revision` is given and the file has changed since, the
  /// write is refused with a conflict. Nothing is written on failure.
  fn update_field(
    &self,
    category: Category,
    edit: FieldEdit,
    expected_revision: Option<String>,
  ) -> impl Future<Output = Result<Updated, Self::Error>> + Send + '_;

  /// Append a record to `category` and return its assigned identifier.
  fn create_record(
    &self,
    category: Category,
    fields: BTreeMap<String, String>,
  ) -> impl Future<Output = Result<Created, Self::Error>> + Send + '_;

  fn create_member(
    &self,
    fields: BTreeMap<String, String>,
  ) -> impl Future<Output = Result<Created, Self::Error>> + Send + '_ {
    self.create_record(Category::Members, fields)
  }
}

//! [`XlsxStore`], the spreadsheet implementation of [`GymStore`].

use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
  sync::Arc,
};

use chrono::Local;
use gym_core::{
  Category,
  create::append_record,
  parse::{Dataset, parse_records},
  schema::Schema,
  store::{Created, GymStore, Updated},
  summary::Summarize,
  table::Workbook,
  update::{FieldEdit, apply_edit},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  locate::{category_dir, locate},
  lock::DirLock,
  revision::revision,
  workbook::{decode, encode, persist},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A gym data store backed by one directory of spreadsheets per category.
///
/// Cloning is cheap; the inner state is reference-counted.
#[derive(Clone)]
pub struct XlsxStore {
  inner: Arc<Inner>,
}

struct Inner {
  root:  PathBuf,
  /// One write lock per category, indexed by [`Category::index`].
  locks: [Mutex<()>; 4],
}

/// A backing file as read from disk.
struct Loaded {
  path:     PathBuf,
  revision: String,
  workbook: Workbook,
}

fn load(root: &Path, category: Category) -> Result<Loaded> {
  let path = locate(root, category)?;
  let bytes = fs::read(&path)?;
  let revision = revision(&bytes);
  let workbook = decode(bytes)?;
  Ok(Loaded { path, revision, workbook })
}

/// One locked read-modify-write cycle against `category`'s backing file.
///
/// `change` runs on the decoded workbook; the file is only rewritten when it
/// succeeds. Returns the change's result and the new revision.
fn rewrite<R>(
  root: &Path,
  category: Category,
  expected_revision: Option<&str>,
  change: impl FnOnce(&mut Workbook) -> gym_core::Result<R>,
) -> Result<(R, String)> {
  // Surface a missing directory as a missing file rather than a lock error.
  locate(root, category)?;
  let _lock = DirLock::acquire(&category_dir(root, category))?;
  let Loaded { path, revision: current, mut workbook } = load(root, category)?;

  if let Some(expected) = expected_revision {
    if expected != current {
      return Err(Error::Conflict { expected: expected.to_owned(), actual: current });
    }
  }

  let result = change(&mut workbook)?;
  let bytes = encode(&workbook)?;
  persist(&path, &bytes)?;
  Ok((result, revision(&bytes)))
}

impl XlsxStore {
  /// A store over `root`, which holds one sub-directory per category.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      inner: Arc::new(Inner {
        root:  root.into(),
        locks: std::array::from_fn(|_| Mutex::new(())),
      }),
    }
  }

  pub fn root(&self) -> &Path { &self.inner.root }

  async fn load(&self, category: Category) -> Result<Loaded> {
    let root = self.inner.root.clone();
    tokio::task::spawn_blocking(move || load(&root, category)).await?
  }
}

// ─── GymStore impl ───────────────────────────────────────────────────────────

impl GymStore for XlsxStore {
  type Error = Error;

  async fn read<T>(&self) -> Result<Dataset<T>>
  where
    T: Summarize + Send + 'static,
  {
    let category = T::CATEGORY;
    let loaded = self.load(category).await?;
    let mut dataset = parse_records::<T>(&loaded.workbook)?;
    dataset.revision = Some(loaded.revision);

    debug!(
      %category,
      path = %loaded.path.display(),
      records = dataset.records.len(),
      "loaded dataset"
    );
    if let Some(first) = dataset.warnings.first() {
      warn!(
        %category,
        count = dataset.warnings.len(),
        %first,
        "cells coerced while reading"
      );
    }
    Ok(dataset)
  }

  async fn update_field(
    &self,
    category: Category,
    edit: FieldEdit,
    expected_revision: Option<String>,
  ) -> Result<Updated> {
    let _guard = self.inner.locks[category.index()].lock().await;
    let root = self.inner.root.clone();
    let schema = Schema::for_category(category);

    let (outcome, revision) = tokio::task::spawn_blocking(move || {
      rewrite(&root, category, expected_revision.as_deref(), |workbook| {
        apply_edit(schema, schema.table_mut(workbook)?, &edit)
      })
    })
    .await??;

    info!(
      %category,
      key = %outcome.key,
      column = outcome.column,
      value = %outcome.value,
      "field updated"
    );
    Ok(Updated { outcome, revision })
  }

  async fn create_record(
    &self,
    category: Category,
    fields: BTreeMap<String, String>,
  ) -> Result<Created> {
    let _guard = self.inner.locks[category.index()].lock().await;
    let root = self.inner.root.clone();
    let schema = Schema::for_category(category);
    let today = Local::now().date_naive();

    let (added, revision) = tokio::task::spawn_blocking(move || {
      rewrite(&root, category, None, |workbook| {
        append_record(schema, schema.table_mut(workbook)?, &fields, today)
      })
    })
    .await??;

    info!(%category, id = added.id, key = %added.key, "record created");
    Ok(Created { category, id: added.id, key: added.key, revision })
  }
}

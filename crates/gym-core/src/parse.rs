//! Table-to-record parsing and the [`Dataset`] returned by every read.

use std::{collections::HashSet, fmt};

use serde::Serialize;

use crate::{
  Result,
  record::{FromRow, InventoryItem, RowReader, Warning},
  schema::Schema,
  summary::Summarize,
  table::Workbook,
};

/// All records of one category plus their summary.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Dataset<T: Summarize> {
  pub records:  Vec<T>,
  pub summary:  T::Summary,
  pub warnings: Vec<Warning>,
  /// Content hash of the backing file, for optimistic concurrency.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub revision: Option<String>,
}

impl<T: Summarize> Dataset<T> {
  /// An empty dataset standing in for one that failed to load.
  pub fn degraded(reason: impl fmt::Display) -> Self {
    Self {
      records:  Vec::new(),
      summary:  T::Summary::default(),
      warnings: vec![Warning::general(reason.to_string())],
      revision: None,
    }
  }
}

impl Dataset<InventoryItem> {
  /// Items whose status is low or critical.
  pub fn low_stock(&self) -> Vec<&InventoryItem> {
    self.records.iter().filter(|i| i.status.is_low()).collect()
  }
}

/// Parse every non-blank row of `T`'s table.
///
/// Fails only when the table itself is unusable (sheet or required column
/// missing). Cell-level problems become warnings.
pub fn parse_records<T: Summarize>(workbook: &Workbook) -> Result<Dataset<T>> {
  let schema = Schema::for_category(T::CATEGORY);
  let table = schema.table(workbook)?;
  let binding = schema.bind(table)?;

  let mut warnings = Vec::new();
  let mut records = Vec::with_capacity(table.rows.len());
  let mut seen = HashSet::new();

  for row in 0..table.rows.len() {
    if table.row_is_blank(row) {
      continue;
    }
    let mut reader = RowReader::new(table, &binding, row, &mut warnings);
    let record = T::from_row(&mut reader);
    let id = record.id();
    if id <= 0 {
      reader.warn(Some(schema.id_column), format!("identifier {id} is not positive"));
    } else if !seen.insert(id) {
      reader.warn(Some(schema.id_column), format!("identifier {id} is used more than once"));
    }
    records.push(record);
  }

  let summary = T::summarize(&records);
  Ok(Dataset { records, summary, warnings, revision: None })
}

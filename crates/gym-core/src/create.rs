//! Appending new records.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::{
  Error, Result,
  category::Category,
  cell::{Cell, FieldKind},
  schema::{FieldDefault, FieldSpec, Schema},
  table::Table,
  update::{coerce_input, refresh_inventory},
};

/// Identifier a new row receives: one past the largest existing identifier,
/// or 1 for an empty table.
pub fn next_id(table: &Table, id_col: usize) -> i64 {
  (0..table.rows.len())
    .map(|row| table.cell(row, id_col).int_or_zero())
    .max()
    .unwrap_or(0)
    .max(0)
    + 1
}

fn default_cell(field: &FieldSpec, today: NaiveDate) -> Cell {
  match field.default {
    FieldDefault::Zero => match field.kind {
      FieldKind::Integer => Cell::Int(0),
      FieldKind::Real => Cell::Float(0.0),
      FieldKind::Text | FieldKind::Flag => Cell::Empty,
    },
    FieldDefault::Text(s) => Cell::text(s),
    FieldDefault::Int(n) => Cell::Int(n),
    FieldDefault::Today => Cell::text(today.format("%Y-%m-%d").to_string()),
  }
}

/// A freshly appended row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appended {
  pub id:  i64,
  pub key: String,
}

/// Append a record built from `fields` (keyed by alias, header or semantic
/// name).
///
/// Unsupplied fields take their schema default. The identifier is always
/// assigned here; supplying one is an error, as is a blank natural key.
pub fn append_record(
  schema: &'static Schema,
  table: &mut Table,
  fields: &BTreeMap<String, String>,
  today: NaiveDate,
) -> Result<Appended> {
  let binding = schema.bind(table)?;

  let mut supplied: HashMap<&'static str, Cell> = HashMap::new();
  for (name, raw) in fields {
    let field = schema.resolve(name).ok_or_else(|| Error::UnknownField {
      category: schema.category,
      field:    name.trim().to_owned(),
    })?;
    let key_field = field.column == schema.key_column;
    if !field.editable && !key_field {
      return Err(Error::ReadOnlyField(field.column));
    }
    supplied.insert(field.column, coerce_input(schema, field, raw)?);
  }

  let key = supplied
    .get(schema.key_column)
    .map(Cell::as_text)
    .filter(|k| !k.is_empty())
    .ok_or(Error::MissingKey(schema.key_column))?;

  let id_col = binding.id_column().ok_or(Error::MissingColumn {
    sheet:  table.name.clone(),
    column: schema.id_column,
  })?;
  let id = next_id(table, id_col);

  let mut row = vec![Cell::Empty; table.headers.len()];
  for (field, col) in binding.present() {
    row[col] = if col == id_col {
      Cell::Int(id)
    } else {
      supplied
        .remove(field.column)
        .unwrap_or_else(|| default_cell(field, today))
    };
  }
  table.push_row(row);

  if schema.category == Category::Inventory {
    let last = table.rows.len() - 1;
    refresh_inventory(&binding, table, last, None);
  }
  Ok(Appended { id, key })
}

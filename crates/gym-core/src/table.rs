//! In-memory sheet model: the unit that is parsed, mutated, and written back.

use crate::cell::Cell;

static BLANK: Cell = Cell::Empty;

/// One sheet: a header row followed by data rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
  pub name:    String,
  pub headers: Vec<String>,
  pub rows:    Vec<Vec<Cell>>,
}

impl Table {
  pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
    Self {
      name:    name.into(),
      headers: headers.iter().map(|h| (*h).to_owned()).collect(),
      rows:    Vec::new(),
    }
  }

  /// Index of the column whose (trimmed) header equals `header`.
  pub fn column(&self, header: &str) -> Option<usize> {
    self.headers.iter().position(|h| h.trim() == header)
  }

  /// The cell at `(row, col)`; out-of-range positions read as empty.
  pub fn cell(&self, row: usize, col: usize) -> &Cell {
    self
      .rows
      .get(row)
      .and_then(|r| r.get(col))
      .unwrap_or(&BLANK)
  }

  /// Overwrite one cell, padding a short row with empty cells.
  pub fn set(&mut self, row: usize, col: usize, value: Cell) {
    let cells = &mut self.rows[row];
    if cells.len() <= col {
      cells.resize(col + 1, Cell::Empty);
    }
    cells[col] = value;
  }

  pub fn push_row(&mut self, row: Vec<Cell>) { self.rows.push(row); }

  /// True when every cell of `row` is blank.
  pub fn row_is_blank(&self, row: usize) -> bool {
    self.rows.get(row).is_none_or(|r| r.iter().all(Cell::is_blank))
  }
}

/// Every sheet of one spreadsheet file, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workbook {
  pub sheets: Vec<Table>,
}

impl Workbook {
  pub fn sheet_names(&self) -> Vec<String> {
    self.sheets.iter().map(|s| s.name.clone()).collect()
  }

  pub fn sheet(&self, name: &str) -> Option<&Table> {
    self.sheets.iter().find(|s| s.name == name)
  }

  pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Table> {
    self.sheets.iter_mut().find(|s| s.name == name)
  }
}

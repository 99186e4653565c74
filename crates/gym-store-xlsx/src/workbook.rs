//! Converting between `.xlsx` bytes and the in-memory [`Workbook`].
//!
//! Reading goes through `calamine`, writing through `rust_xlsxwriter`. Only
//! cell values survive a round trip; formatting, formulas and column widths
//! are not preserved.

use std::{
  io::{Cursor, Write as _},
  path::Path,
};

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use chrono::Timelike;
use gym_core::{
  cell::Cell,
  table::{Table, Workbook},
};
use rust_xlsxwriter::XlsxError;

use crate::{Error, Result};

// ─── Decode ──────────────────────────────────────────────────────────────────

fn decode_cell(data: &Data) -> Cell {
  match data {
    Data::Empty => Cell::Empty,
    Data::Int(v) => Cell::Int(*v),
    Data::Float(f) => Cell::Float(*f),
    Data::String(s) => Cell::Text(s.clone()),
    Data::Bool(b) => Cell::Bool(*b),
    Data::DateTime(dt) => match dt.as_datetime() {
      Some(at) if at.time().num_seconds_from_midnight() == 0 => {
        Cell::Text(at.format("%Y-%m-%d").to_string())
      }
      Some(at) => Cell::Text(at.format("%Y-%m-%d %H:%M:%S").to_string()),
      None => Cell::Float(dt.as_f64()),
    },
    Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    Data::Error(e) => Cell::Text(e.to_string()),
    #[allow(unreachable_patterns)]
    _ => Cell::Empty,
  }
}

/// Parse every sheet of an `.xlsx` file. The first row of each sheet is its
/// header row.
pub fn decode(bytes: Vec<u8>) -> Result<Workbook> {
  let mut xlsx: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
  let mut workbook = Workbook::default();
  for name in xlsx.sheet_names() {
    let range = xlsx.worksheet_range(&name)?;
    let mut rows = range.rows();
    let headers = rows
      .next()
      .map(|r| r.iter().map(|c| decode_cell(c).as_text()).collect())
      .unwrap_or_default();
    let rows = rows.map(|r| r.iter().map(decode_cell).collect()).collect();
    workbook.sheets.push(Table { name, headers, rows });
  }
  Ok(workbook)
}

// ─── Encode ──────────────────────────────────────────────────────────────────

fn position(row: usize, col: usize) -> Result<(u32, u16)> {
  let row = u32::try_from(row).map_err(|_| XlsxError::RowColumnLimitError)?;
  let col = u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)?;
  Ok((row, col))
}

/// Serialise `workbook` to `.xlsx` bytes, sheets in their original order.
pub fn encode(workbook: &Workbook) -> Result<Vec<u8>> {
  let mut book = rust_xlsxwriter::Workbook::new();
  for table in &workbook.sheets {
    let sheet = book.add_worksheet();
    sheet.set_name(&table.name)?;

    for (c, header) in table.headers.iter().enumerate() {
      let (r, c) = position(0, c)?;
      sheet.write_string(r, c, header)?;
    }

    for (i, cells) in table.rows.iter().enumerate() {
      for (c, cell) in cells.iter().enumerate() {
        let (r, c) = position(i + 1, c)?;
        match cell {
          Cell::Empty => {}
          Cell::Float(f) if f.is_nan() => {}
          Cell::Int(v) => {
            sheet.write_number(r, c, *v as f64)?;
          }
          Cell::Float(f) => {
            sheet.write_number(r, c, *f)?;
          }
          Cell::Text(s) => {
            sheet.write_string(r, c, s)?;
          }
          Cell::Bool(b) => {
            sheet.write_boolean(r, c, *b)?;
          }
        }
      }
    }
  }
  Ok(book.save_to_buffer()?)
}

/// Replace the file at `path` with `bytes` atomically: the bytes go to a
/// temporary file in the same directory which is then renamed over `path`.
pub fn persist(path: &Path, bytes: &[u8]) -> Result<()> {
  let dir = path.parent().unwrap_or(Path::new("."));
  let mut tmp = tempfile::Builder::new()
    .prefix(".gym-")
    .suffix(".tmp")
    .tempfile_in(dir)?;
  tmp.write_all(bytes)?;
  tmp.as_file().sync_all()?;
  tmp.persist(path).map_err(|e| Error::Io(e.error))?;
  Ok(())
}

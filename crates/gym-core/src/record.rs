//! Typed records, one struct per category, built from a bound table row.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
  category::Category,
  schema::Binding,
  table::Table,
};

// ─── Warnings ────────────────────────────────────────────────────────────────

/// A data-quality note produced while reading a table.
///
/// Reads never fail on a bad cell; the value coerces to zero and one of these
/// is recorded instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
  /// Spreadsheet row number (the header is row 1).
  #[serde(skip_serializing_if = "Option::is_none")]
  pub row:     Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub column:  Option<String>,
  pub message: String,
}

impl Warning {
  pub fn general(message: impl Into<String>) -> Self {
    Self { row: None, column: None, message: message.into() }
  }
}

impl fmt::Display for Warning {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match (self.row, &self.column) {
      (Some(row), Some(column)) => write!(f, "row {row}, {column}: "),
      (Some(row), None) => write!(f, "row {row}: "),
      _ => Ok(()),
    }?;
    f.write_str(&self.message)
  }
}

// ─── Row reader ──────────────────────────────────────────────────────────────

/// Cursor over one data row, coercing cells by field name and collecting
/// warnings for cells that had to be zeroed.
pub struct RowReader<'a> {
  table:    &'a Table,
  binding:  &'a Binding,
  row:      usize,
  warnings: &'a mut Vec<Warning>,
}

impl<'a> RowReader<'a> {
  pub fn new(
    table: &'a Table,
    binding: &'a Binding,
    row: usize,
    warnings: &'a mut Vec<Warning>,
  ) -> Self {
    Self { table, binding, row, warnings }
  }

  /// Spreadsheet row number of the current row.
  pub fn line(&self) -> usize { self.row + 2 }

  pub fn warn(&mut self, column: Option<&str>, message: impl Into<String>) {
    self.warnings.push(Warning {
      row:     Some(self.line()),
      column:  column.map(str::to_owned),
      message: message.into(),
    });
  }

  fn located(&self, field: &str) -> Option<(usize, &'static str)> {
    let col = self.binding.column(field)?;
    let header = self.binding.schema.field(field).map_or("", |f| f.column);
    Some((col, header))
  }

  pub fn text(&self, field: &str) -> String {
    self
      .located(field)
      .map(|(col, _)| self.table.cell(self.row, col).as_text())
      .unwrap_or_default()
  }

  pub fn int(&mut self, field: &str) -> i64 {
    let Some((col, header)) = self.located(field) else { return 0 };
    match self.table.cell(self.row, col).parse_int() {
      Ok(v) => v.unwrap_or(0),
      Err(bad) => {
        self.warn(Some(header), format!("{:?} is not an integer, read as 0", bad.0));
        0
      }
    }
  }

  pub fn real(&mut self, field: &str) -> f64 {
    let Some((col, header)) = self.located(field) else { return 0.0 };
    match self.table.cell(self.row, col).parse_real() {
      Ok(v) => v.unwrap_or(0.0),
      Err(bad) => {
        self.warn(Some(header), format!("{:?} is not a number, read as 0", bad.0));
        0.0
      }
    }
  }
}

/// A record type that can be read from its category's table.
pub trait FromRow: Sized {
  const CATEGORY: Category;

  fn from_row(row: &mut RowReader<'_>) -> Self;

  fn id(&self) -> i64;

  /// The natural key used to address the record in edits.
  fn key(&self) -> &str;
}

// ─── Status enums ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  Paid,
  #[default]
  Unpaid,
}

impl PaymentStatus {
  /// Normalise a stored label; only `완료` (or `paid`) counts as paid.
  pub fn from_label(label: &str) -> Self {
    let label = label.trim();
    if label == "완료" || label.eq_ignore_ascii_case("paid") {
      Self::Paid
    } else {
      Self::Unpaid
    }
  }

  /// Strict parse for user input.
  pub fn parse_input(input: &str) -> Option<Self> {
    match input.trim() {
      "완료" => Some(Self::Paid),
      "미완료" => Some(Self::Unpaid),
      s if s.eq_ignore_ascii_case("paid") => Some(Self::Paid),
      s if s.eq_ignore_ascii_case("unpaid") => Some(Self::Unpaid),
      _ => None,
    }
  }

  /// The label written to the sheet.
  pub fn label(self) -> &'static str {
    match self {
      Self::Paid => "완료",
      Self::Unpaid => "미완료",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
  Normal,
  Low,
  Critical,
  OutOfStock,
}

impl StockStatus {
  /// Status implied by the stock level alone.
  pub fn derive(current_stock: i64, min_stock_level: i64) -> Self {
    if current_stock <= 0 {
      Self::OutOfStock
    } else if current_stock <= min_stock_level {
      Self::Low
    } else {
      Self::Normal
    }
  }

  pub fn from_label(label: &str) -> Option<Self> {
    match label.trim() {
      "정상" => Some(Self::Normal),
      "부족" => Some(Self::Low),
      "긴급부족" => Some(Self::Critical),
      "품절" => Some(Self::OutOfStock),
      s => match s.to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
        "normal" => Some(Self::Normal),
        "low" => Some(Self::Low),
        "critical" => Some(Self::Critical),
        "out_of_stock" => Some(Self::OutOfStock),
        _ => None,
      },
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Normal => "정상",
      Self::Low => "부족",
      Self::Critical => "긴급부족",
      Self::OutOfStock => "품절",
    }
  }

  /// Low or critical: the statuses that put an item on the restock list.
  pub fn is_low(self) -> bool { matches!(self, Self::Low | Self::Critical) }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
  pub id:                i64,
  pub name:              String,
  pub phone:             String,
  pub email:             String,
  pub membership_type:   String,
  pub start_date:        String,
  pub end_date:          String,
  pub payment_status:    PaymentStatus,
  pub emergency_contact: String,
  pub medical_notes:     String,
  pub age:               i64,
  pub gender:            String,
  pub address:           String,
  pub occupation:        String,
  pub monthly_fee:       i64,
}

impl FromRow for Member {
  const CATEGORY: Category = Category::Members;

  fn from_row(row: &mut RowReader<'_>) -> Self {
    Self {
      id:                row.int("id"),
      name:              row.text("name"),
      phone:             row.text("phone"),
      email:             row.text("email"),
      membership_type:   row.text("membership_type"),
      start_date:        row.text("start_date"),
      end_date:          row.text("end_date"),
      payment_status:    PaymentStatus::from_label(&row.text("payment_status")),
      emergency_contact: row.text("emergency_contact"),
      medical_notes:     row.text("medical_notes"),
      age:               row.int("age"),
      gender:            row.text("gender"),
      address:           row.text("address"),
      occupation:        row.text("occupation"),
      monthly_fee:       row.int("monthly_fee"),
    }
  }

  fn id(&self) -> i64 { self.id }

  fn key(&self) -> &str { &self.name }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffMember {
  pub id:             i64,
  pub name:           String,
  pub age:            i64,
  pub gender:         String,
  pub phone:          String,
  pub email:          String,
  pub position:       String,
  pub department:     String,
  pub hire_date:      String,
  pub status:         String,
  pub certification:  String,
  pub notes:          String,
  pub monthly_salary: i64,
  pub hourly_wage:    i64,
  pub area:           String,
}

impl FromRow for StaffMember {
  const CATEGORY: Category = Category::Staff;

  fn from_row(row: &mut RowReader<'_>) -> Self {
    Self {
      id:             row.int("id"),
      name:           row.text("name"),
      age:            row.int("age"),
      gender:         row.text("gender"),
      phone:          row.text("phone"),
      email:          row.text("email"),
      position:       row.text("position"),
      department:     row.text("department"),
      hire_date:      row.text("hire_date"),
      status:         row.text("status"),
      certification:  row.text("certification"),
      notes:          row.text("notes"),
      monthly_salary: row.int("monthly_salary"),
      hourly_wage:    row.int("hourly_wage"),
      area:           row.text("area"),
    }
  }

  fn id(&self) -> i64 { self.id }

  fn key(&self) -> &str { &self.name }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HrRecord {
  pub employee_id:        i64,
  pub name:               String,
  pub department:         String,
  pub used_vacation:      i64,
  pub total_vacation:     i64,
  pub remaining_vacation: i64,
  pub monthly_hours:      i64,
  pub overtime_hours:     i64,
  pub night_hours:        i64,
  pub evaluation_score:   f64,
  pub rewards_penalties:  String,
  pub training_completed: String,
}

impl FromRow for HrRecord {
  const CATEGORY: Category = Category::Hr;

  fn from_row(row: &mut RowReader<'_>) -> Self {
    Self {
      employee_id:        row.int("employee_id"),
      name:               row.text("name"),
      department:         row.text("department"),
      used_vacation:      row.int("used_vacation"),
      total_vacation:     row.int("total_vacation"),
      remaining_vacation: row.int("remaining_vacation"),
      monthly_hours:      row.int("monthly_hours"),
      overtime_hours:     row.int("overtime_hours"),
      night_hours:        row.int("night_hours"),
      evaluation_score:   row.real("evaluation_score"),
      rewards_penalties:  row.text("rewards_penalties"),
      training_completed: row.text("training_completed"),
    }
  }

  fn id(&self) -> i64 { self.employee_id }

  fn key(&self) -> &str { &self.name }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
  pub id:              i64,
  pub item_name:       String,
  pub category:        String,
  pub current_stock:   i64,
  pub min_stock_level: i64,
  pub max_stock_level: i64,
  pub unit_price:      i64,
  /// Always `unit_price * current_stock`, whatever the sheet says.
  pub total_value:     i64,
  pub supplier:        String,
  pub location:        String,
  pub received_date:   String,
  pub expiry_date:     String,
  pub status:          StockStatus,
}

impl FromRow for InventoryItem {
  const CATEGORY: Category = Category::Inventory;

  fn from_row(row: &mut RowReader<'_>) -> Self {
    let current_stock = row.int("current_stock");
    let min_stock_level = row.int("min_stock_level");
    let unit_price = row.int("unit_price");

    let total_value = match unit_price.checked_mul(current_stock) {
      Some(total) => total,
      None => {
        row.warn(Some("총액"), "단가 × 현재재고 is out of range");
        unit_price.saturating_mul(current_stock)
      }
    };

    let label = row.text("status");
    let status = match StockStatus::from_label(&label) {
      Some(status) => status,
      None => {
        if !label.is_empty() {
          row.warn(Some("상태"), format!("unknown status {label:?}, derived from stock"));
        }
        StockStatus::derive(current_stock, min_stock_level)
      }
    };

    Self {
      id: row.int("id"),
      item_name: row.text("item_name"),
      category: row.text("category"),
      current_stock,
      min_stock_level,
      max_stock_level: row.int("max_stock_level"),
      unit_price,
      total_value,
      supplier: row.text("supplier"),
      location: row.text("location"),
      received_date: row.text("received_date"),
      expiry_date: row.text("expiry_date"),
      status,
    }
  }

  fn id(&self) -> i64 { self.id }

  fn key(&self) -> &str { &self.item_name }
}

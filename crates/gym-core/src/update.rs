//! Field-level edits against an in-memory table.
//!
//! Every check runs before the table is touched, so a failed edit leaves the
//! table exactly as it was and the caller can skip writing it back.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  amount::{AmountError, parse_amount, parse_decimal},
  category::Category,
  cell::{Cell, FieldKind},
  record::{PaymentStatus, StockStatus},
  schema::{Binding, FieldSpec, Schema},
  table::Table,
};

/// A request to set one field of the record with the given natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEdit {
  pub key:   String,
  pub field: String,
  pub value: String,
}

impl FieldEdit {
  pub fn new(
    key: impl Into<String>,
    field: impl Into<String>,
    value: impl Into<String>,
  ) -> Self {
    Self { key: key.into(), field: field.into(), value: value.into() }
  }
}

/// What an applied edit changed.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
  pub category: Category,
  pub key:      String,
  /// Header of the edited column.
  pub column:   &'static str,
  pub value:    Cell,
}

impl UpdateOutcome {
  pub fn message(&self) -> String {
    format!(
      "updated {} of {} {:?} to {}",
      self.column,
      self.category.noun(),
      self.key,
      self.value.as_text()
    )
  }
}

/// Largest magnitude accepted for integer input. The product of two such
/// values (unit price times stock) still fits in an `i64`.
pub const MAX_INPUT: i64 = 3_000_000_000;

/// Turn user input into the cell stored for `field`.
pub fn coerce_input(schema: &Schema, field: &FieldSpec, raw: &str) -> Result<Cell> {
  let raw = raw.trim();
  let not_numeric = |source: AmountError| Error::NotNumeric { field: field.column, source };
  match field.kind {
    FieldKind::Integer => {
      let value = parse_amount(raw).map_err(not_numeric)?;
      if value.abs() > MAX_INPUT {
        return Err(not_numeric(AmountError::Overflow(raw.to_owned())));
      }
      Ok(Cell::Int(value))
    }
    FieldKind::Real => parse_decimal(raw)
      .map(Cell::Float)
      .map_err(not_numeric),
    FieldKind::Flag => PaymentStatus::parse_input(raw)
      .map(|status| Cell::text(status.label()))
      .ok_or_else(|| Error::InvalidValue {
        field:  field.column,
        value:  raw.to_owned(),
        reason: "expected 완료 or 미완료",
      }),
    FieldKind::Text
      if schema.category == Category::Inventory && field.name == "status" =>
    {
      StockStatus::from_label(raw)
        .map(|status| Cell::text(status.label()))
        .ok_or_else(|| Error::InvalidValue {
          field:  field.column,
          value:  raw.to_owned(),
          reason: "expected 정상, 부족, 긴급부족 or 품절",
        })
    }
    FieldKind::Text => Ok(Cell::text(raw)),
  }
}

/// Row index of the single record whose natural key equals `key`.
pub fn find_row(schema: &Schema, binding: &Binding, table: &Table, key: &str) -> Result<usize> {
  let key = key.trim();
  let not_found = || Error::RecordNotFound {
    category: schema.category,
    key:      key.to_owned(),
  };
  let col = binding.key_column().ok_or_else(not_found)?;
  let matches: Vec<usize> = (0..table.rows.len())
    .filter(|&row| !table.row_is_blank(row) && table.cell(row, col).as_text() == key)
    .collect();
  match matches.as_slice() {
    [] => Err(not_found()),
    [row] => Ok(*row),
    _ => Err(Error::AmbiguousKey {
      category: schema.category,
      key:      key.to_owned(),
      count:    matches.len(),
    }),
  }
}

/// Rewrite inventory status and total for `row` after `touched` changed.
/// `None` recomputes both.
pub(crate) fn refresh_inventory(
  binding: &Binding,
  table: &mut Table,
  row: usize,
  touched: Option<&str>,
) {
  let read = |table: &Table, field| {
    binding.column(field).map_or(0, |c| table.cell(row, c).int_or_zero())
  };
  let stock = read(table, "current_stock");
  let min = read(table, "min_stock_level");
  let price = read(table, "unit_price");

  let touches = |names: &[&str]| touched.is_none_or(|t| names.contains(&t));
  if touches(&["current_stock", "min_stock_level"]) {
    if let Some(col) = binding.column("status") {
      table.set(row, col, Cell::text(StockStatus::derive(stock, min).label()));
    }
  }
  if touches(&["current_stock", "unit_price"]) {
    if let Some(col) = binding.column("total_value") {
      table.set(row, col, Cell::Int(price.saturating_mul(stock)));
    }
  }
}

/// Fail when `value` in `field` would push the row's `단가 × 현재재고` out of
/// range.
fn check_total(
  binding: &Binding,
  table: &Table,
  row: usize,
  field: &FieldSpec,
  value: &Cell,
) -> Result<()> {
  let read = |name: &str| {
    if name == field.name {
      value.int_or_zero()
    } else {
      binding.column(name).map_or(0, |c| table.cell(row, c).int_or_zero())
    }
  };
  match read("unit_price").checked_mul(read("current_stock")) {
    Some(_) => Ok(()),
    None => Err(Error::InvalidValue {
      field:  field.column,
      value:  value.as_text(),
      reason: "단가 × 현재재고 would be out of range",
    }),
  }
}

/// Apply `edit` to `table`. The table is unchanged when this returns an error.
pub fn apply_edit(
  schema: &'static Schema,
  table: &mut Table,
  edit: &FieldEdit,
) -> Result<UpdateOutcome> {
  let field = schema.resolve(&edit.field).ok_or_else(|| Error::UnknownField {
    category: schema.category,
    field:    edit.field.trim().to_owned(),
  })?;
  if !field.editable {
    return Err(Error::ReadOnlyField(field.column));
  }

  let binding = schema.bind(table)?;
  let col = binding.column(field.name).ok_or_else(|| Error::AbsentColumn {
    sheet:  table.name.clone(),
    column: field.column,
  })?;
  let value = coerce_input(schema, field, &edit.value)?;
  let row = find_row(schema, &binding, table, &edit.key)?;
  if schema.category == Category::Inventory {
    check_total(&binding, table, row, field, &value)?;
  }

  table.set(row, col, value.clone());
  if schema.category == Category::Inventory {
    refresh_inventory(&binding, table, row, Some(field.name));
  }

  Ok(UpdateOutcome {
    category: schema.category,
    key: edit.key.trim().to_owned(),
    column: field.column,
    value,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    Classify, ErrorKind,
    schema::{INVENTORY, MEMBERS, STAFF},
  };

  fn inventory() -> Table {
    let mut t = Table::new(
      "Sheet1",
      &[
        "품목번호", "품목명", "카테고리", "현재재고", "최소재고", "최대재고",
        "단가", "총액", "공급업체", "위치", "입고일", "유통기한", "상태",
      ],
    );
    let mut row = vec![Cell::Empty; 13];
    row[0] = Cell::Int(1);
    row[1] = Cell::text("Protein Powder");
    row[3] = Cell::Int(20);
    row[4] = Cell::Int(10);
    row[6] = Cell::Int(45_000);
    row[7] = Cell::Int(900_000);
    row[12] = Cell::text("정상");
    t.push_row(row);
    t
  }

  fn members() -> Table {
    let mut t = Table::new(
      "회원목록",
      &[
        "회원번호", "이름", "전화번호", "이메일", "멤버십타입", "가입일",
        "만료일", "결제상태", "비상연락처", "특이사항", "나이", "성별",
        "주소", "직업", "월회비",
      ],
    );
    for (id, name) in [(1, "김철수"), (2, "박민지"), (3, "김철수")] {
      let mut row = vec![Cell::Empty; 15];
      row[0] = Cell::Int(id);
      row[1] = Cell::text(name);
      row[14] = Cell::Int(80_000);
      t.push_row(row);
    }
    t
  }

  #[test]
  fn stock_edit_recomputes_status_and_total() {
    let mut t = inventory();
    let out = apply_edit(&INVENTORY, &mut t, &FieldEdit::new("Protein Powder", "재고", "5개")).unwrap();
    assert_eq!(out.column, "현재재고");
    assert_eq!(t.cell(0, 3), &Cell::Int(5));
    assert_eq!(t.cell(0, 12), &Cell::text("부족"));
    assert_eq!(t.cell(0, 7), &Cell::Int(225_000));
  }

  #[test]
  fn price_edit_leaves_status_alone() {
    let mut t = inventory();
    t.set(0, 12, Cell::text("긴급부족"));
    apply_edit(&INVENTORY, &mut t, &FieldEdit::new("Protein Powder", "가격", "5만원")).unwrap();
    assert_eq!(t.cell(0, 7), &Cell::Int(1_000_000));
    assert_eq!(t.cell(0, 12), &Cell::text("긴급부족"));
  }

  #[test]
  fn editing_is_idempotent() {
    let mut once = members();
    let edit = FieldEdit::new("박민지", "월회비", "15만원");
    apply_edit(&MEMBERS, &mut once, &edit).unwrap();
    let mut twice = once.clone();
    apply_edit(&MEMBERS, &mut twice, &edit).unwrap();
    assert_eq!(once, twice);
    assert_eq!(once.cell(1, 14), &Cell::Int(150_000));
  }

  #[test]
  fn unknown_key_leaves_table_untouched() {
    let mut t = members();
    let before = t.clone();
    let err = apply_edit(&MEMBERS, &mut t, &FieldEdit::new("홍길동", "월회비", "1")).unwrap_err();
    assert!(err.to_string().contains("not found"), "{err}");
    assert_eq!(t, before);
  }

  #[test]
  fn shared_names_are_ambiguous() {
    let mut t = members();
    let err = apply_edit(&MEMBERS, &mut t, &FieldEdit::new("김철수", "전화번호", "010")).unwrap_err();
    assert!(matches!(err, Error::AmbiguousKey { count: 2, .. }));
  }

  #[test]
  fn bad_input_is_rejected_before_lookup() {
    let mut t = members();
    let err = apply_edit(&MEMBERS, &mut t, &FieldEdit::new("박민지", "월회비", "많이")).unwrap_err();
    assert!(matches!(err, Error::NotNumeric { field: "월회비", .. }));

    let err = apply_edit(&MEMBERS, &mut t, &FieldEdit::new("박민지", "결제상태", "반쯤")).unwrap_err();
    assert!(matches!(err, Error::InvalidValue { .. }));

    let err = apply_edit(&MEMBERS, &mut t, &FieldEdit::new("박민지", "이름", "박지민")).unwrap_err();
    assert!(matches!(err, Error::ReadOnlyField("이름")));

    let err = apply_edit(&MEMBERS, &mut t, &FieldEdit::new("박민지", "신발", "260")).unwrap_err();
    assert!(matches!(err, Error::UnknownField { .. }));
  }

  #[test]
  fn payment_flag_is_normalised() {
    let mut t = members();
    apply_edit(&MEMBERS, &mut t, &FieldEdit::new("박민지", "payment_status", "paid")).unwrap();
    assert_eq!(t.cell(1, 7), &Cell::text("완료"));
  }

  #[test]
  fn inventory_status_must_be_known() {
    let mut t = inventory();
    let err = apply_edit(&INVENTORY, &mut t, &FieldEdit::new("Protein Powder", "상태", "많음")).unwrap_err();
    assert!(matches!(err, Error::InvalidValue { field: "상태", .. }));
  }

  #[test]
  fn oversized_amounts_are_rejected() {
    let mut t = members();
    let before = t.clone();
    let edit = FieldEdit::new("박민지", "월회비", "9223372036854775807");
    let err = apply_edit(&MEMBERS, &mut t, &edit).unwrap_err();
    assert!(matches!(err, Error::NotNumeric { field: "월회비", .. }));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(t, before);

    apply_edit(&MEMBERS, &mut t, &FieldEdit::new("박민지", "월회비", "300001만")).unwrap_err();
    apply_edit(&MEMBERS, &mut t, &FieldEdit::new("박민지", "월회비", "3,000,000,000")).unwrap();
  }

  #[test]
  fn stock_that_overflows_the_total_is_rejected() {
    let mut t = inventory();
    t.set(0, 6, Cell::Int(i64::MAX / 2));
    let before = t.clone();
    let err = apply_edit(&INVENTORY, &mut t, &FieldEdit::new("Protein Powder", "재고", "3")).unwrap_err();
    assert!(matches!(err, Error::InvalidValue { field: "현재재고", .. }));
    assert_eq!(t, before);
  }

  #[test]
  fn absent_optional_column_is_a_validation_error() {
    let mut t = Table::new(
      "Sheet1",
      &[
        "직원번호", "이름", "나이", "성별", "전화번호", "이메일", "직책",
        "부서", "입사일", "근무상태", "자격증", "특이사항", "월급여",
      ],
    );
    let mut row = vec![Cell::Empty; 13];
    row[0] = Cell::Int(1);
    row[1] = Cell::text("정우성");
    t.push_row(row);

    let err = apply_edit(&STAFF, &mut t, &FieldEdit::new("정우성", "시급", "12000")).unwrap_err();
    assert!(matches!(err, Error::AbsentColumn { column: "시급", .. }));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("has no 시급 column"), "{err}");
  }
}

//! Explicit per-category schemas.
//!
//! Column names are the Korean headers used in the spreadsheets and form a
//! versioned contract with whoever produces those files. Each schema is bound
//! to a loaded [`Table`] once per load; a missing required column fails the
//! bind instead of silently defaulting every row.

use crate::{
  Error, Result,
  category::Category,
  cell::FieldKind,
  table::{Table, Workbook},
};

// ─── Field declarations ──────────────────────────────────────────────────────

/// Value a column takes when a new record does not supply one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
  /// Zero for numeric fields, empty for text.
  Zero,
  Text(&'static str),
  Int(i64),
  /// The creation date, formatted `YYYY-MM-DD`.
  Today,
}

/// One column of a schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
  /// Header text in the sheet.
  pub column:   &'static str,
  /// Semantic field name used in JSON output.
  pub name:     &'static str,
  pub kind:     FieldKind,
  /// A missing required column fails the load.
  pub required: bool,
  pub editable: bool,
  pub default:  FieldDefault,
}

const fn field(
  column: &'static str,
  name: &'static str,
  kind: FieldKind,
) -> FieldSpec {
  FieldSpec {
    column,
    name,
    kind,
    required: true,
    editable: true,
    default: FieldDefault::Zero,
  }
}

const fn text(column: &'static str, name: &'static str) -> FieldSpec {
  field(column, name, FieldKind::Text)
}

const fn int(column: &'static str, name: &'static str) -> FieldSpec {
  field(column, name, FieldKind::Integer)
}

const fn real(column: &'static str, name: &'static str) -> FieldSpec {
  field(column, name, FieldKind::Real)
}

const fn flag(column: &'static str, name: &'static str) -> FieldSpec {
  field(column, name, FieldKind::Flag)
}

impl FieldSpec {
  const fn optional(self) -> Self { FieldSpec { required: false, ..self } }

  const fn read_only(self) -> Self { FieldSpec { editable: false, ..self } }

  const fn or(self, default: FieldDefault) -> Self {
    FieldSpec { default, ..self }
  }
}

// ─── Schema ──────────────────────────────────────────────────────────────────

/// The declared shape of one category's backing table.
#[derive(Debug)]
pub struct Schema {
  pub category:   Category,
  /// Candidate sheet names; the first one present in the workbook is used.
  pub sheets:     &'static [&'static str],
  /// Header of the positive integer identifier column.
  pub id_column:  &'static str,
  /// Header of the human-readable natural key used for edits.
  pub key_column: &'static str,
  pub fields:     &'static [FieldSpec],
  /// Extra spellings accepted for a column, mapped to its header.
  pub aliases:    &'static [(&'static str, &'static str)],
}

pub static MEMBERS: Schema = Schema {
  category:   Category::Members,
  sheets:     &["회원목록"],
  id_column:  "회원번호",
  key_column: "이름",
  fields:     &[
    int("회원번호", "id").read_only(),
    text("이름", "name").read_only(),
    text("전화번호", "phone"),
    text("이메일", "email"),
    text("멤버십타입", "membership_type").or(FieldDefault::Text("일반")),
    text("가입일", "start_date").or(FieldDefault::Today),
    text("만료일", "end_date"),
    flag("결제상태", "payment_status").or(FieldDefault::Text("미완료")),
    text("비상연락처", "emergency_contact"),
    text("특이사항", "medical_notes"),
    int("나이", "age"),
    text("성별", "gender"),
    text("주소", "address"),
    text("직업", "occupation"),
    int("월회비", "monthly_fee").or(FieldDefault::Int(80_000)),
  ],
  aliases:    &[("멤버십", "멤버십타입"), ("회비", "월회비")],
};

pub static STAFF: Schema = Schema {
  category:   Category::Staff,
  sheets:     &["Sheet1", "직원목록"],
  id_column:  "직원번호",
  key_column: "이름",
  fields:     &[
    int("직원번호", "id").read_only(),
    text("이름", "name").read_only(),
    int("나이", "age"),
    text("성별", "gender"),
    text("전화번호", "phone"),
    text("이메일", "email"),
    text("직책", "position"),
    text("부서", "department"),
    text("입사일", "hire_date").or(FieldDefault::Today),
    text("근무상태", "status").or(FieldDefault::Text("활성")),
    text("자격증", "certification"),
    text("특이사항", "notes"),
    int("월급여", "monthly_salary"),
    int("시급", "hourly_wage").optional(),
    text("담당구역", "area").optional(),
  ],
  aliases:    &[("급여", "월급여"), ("월급", "월급여")],
};

pub static HR: Schema = Schema {
  category:   Category::Hr,
  sheets:     &["Sheet1", "인사목록"],
  id_column:  "직원번호",
  key_column: "이름",
  fields:     &[
    int("직원번호", "employee_id").read_only(),
    text("이름", "name").read_only(),
    text("부서", "department"),
    int("연차사용", "used_vacation"),
    int("총연차", "total_vacation"),
    int("잔여연차", "remaining_vacation"),
    int("월근무시간", "monthly_hours"),
    int("초과근무", "overtime_hours"),
    int("야간근무", "night_hours"),
    real("평가점수", "evaluation_score"),
    text("상벌내역", "rewards_penalties"),
    text("교육이수", "training_completed"),
  ],
  aliases:    &[("연차", "연차사용"), ("평가", "평가점수")],
};

pub static INVENTORY: Schema = Schema {
  category:   Category::Inventory,
  sheets:     &["Sheet1", "재고목록"],
  id_column:  "품목번호",
  key_column: "품목명",
  fields:     &[
    int("품목번호", "id").read_only(),
    text("품목명", "item_name").read_only(),
    text("카테고리", "category"),
    int("현재재고", "current_stock"),
    int("최소재고", "min_stock_level"),
    int("최대재고", "max_stock_level"),
    int("단가", "unit_price"),
    int("총액", "total_value").optional().read_only(),
    text("공급업체", "supplier"),
    text("위치", "location"),
    text("입고일", "received_date").or(FieldDefault::Today),
    text("유통기한", "expiry_date"),
    text("상태", "status"),
  ],
  aliases:    &[("재고", "현재재고"), ("수량", "현재재고"), ("가격", "단가")],
};

impl Schema {
  pub fn for_category(category: Category) -> &'static Schema {
    match category {
      Category::Members => &MEMBERS,
      Category::Staff => &STAFF,
      Category::Hr => &HR,
      Category::Inventory => &INVENTORY,
    }
  }

  /// Look up a field by its semantic name.
  pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
    let fields: &'static [FieldSpec] = self.fields;
    fields.iter().find(|f| f.name == name)
  }

  /// Resolve a user-supplied field name: alias, header, or semantic name.
  pub fn resolve(&self, requested: &str) -> Option<&'static FieldSpec> {
    let requested = requested.trim();
    let column = self
      .aliases
      .iter()
      .find(|(alias, _)| *alias == requested)
      .map_or(requested, |(_, column)| *column);
    let fields: &'static [FieldSpec] = self.fields;
    fields.iter().find(|f| {
      f.column == column || f.name.eq_ignore_ascii_case(requested)
    })
  }

  /// Every spelling [`Schema::resolve`] accepts for an editable column that
  /// the chat layer may mention in Korean, longest first.
  pub fn editable_spellings(&self) -> Vec<&'static str> {
    let mut words: Vec<&'static str> = self
      .fields
      .iter()
      .filter(|f| f.editable)
      .map(|f| f.column)
      .chain(self.aliases.iter().map(|(alias, _)| *alias))
      .collect();
    words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    words.dedup();
    words
  }

  fn sheet_name(&self, workbook: &Workbook) -> Result<&'static str> {
    self
      .sheets
      .iter()
      .copied()
      .find(|name| workbook.sheet(name).is_some())
      .ok_or_else(|| Error::MissingSheet {
        expected: self.sheets,
        found:    workbook.sheet_names(),
      })
  }

  /// The sheet holding this category's table.
  pub fn table<'w>(&self, workbook: &'w Workbook) -> Result<&'w Table> {
    let name = self.sheet_name(workbook)?;
    workbook.sheet(name).ok_or(Error::MissingSheet {
      expected: self.sheets,
      found:    workbook.sheet_names(),
    })
  }

  pub fn table_mut<'w>(&self, workbook: &'w mut Workbook) -> Result<&'w mut Table> {
    let name = self.sheet_name(workbook)?;
    let found = workbook.sheet_names();
    workbook.sheet_mut(name).ok_or(Error::MissingSheet {
      expected: self.sheets,
      found,
    })
  }

  /// Map every field to its column position in `table`, failing when a
  /// required column is absent.
  pub fn bind(&'static self, table: &Table) -> Result<Binding> {
    let columns = self
      .fields
      .iter()
      .map(|f| {
        let col = table.column(f.column);
        if col.is_none() && f.required {
          return Err(Error::MissingColumn {
            sheet:  table.name.clone(),
            column: f.column,
          });
        }
        Ok(col)
      })
      .collect::<Result<Vec<_>>>()?;
    Ok(Binding { schema: self, columns })
  }
}

// ─── Binding ─────────────────────────────────────────────────────────────────

/// A schema validated against one concrete table.
#[derive(Debug, Clone)]
pub struct Binding {
  pub schema: &'static Schema,
  columns:    Vec<Option<usize>>,
}

impl Binding {
  /// Column position of a field given by semantic name or header.
  pub fn column(&self, field: &str) -> Option<usize> {
    self
      .schema
      .fields
      .iter()
      .position(|f| f.name == field || f.column == field)
      .and_then(|i| self.columns[i])
  }

  pub fn id_column(&self) -> Option<usize> { self.column(self.schema.id_column) }

  pub fn key_column(&self) -> Option<usize> {
    self.column(self.schema.key_column)
  }

  /// Pairs of (field, column position) for every column present.
  pub fn present(&self) -> impl Iterator<Item = (&'static FieldSpec, usize)> + '_ {
    self
      .schema
      .fields
      .iter()
      .zip(&self.columns)
      .filter_map(|(f, c)| c.map(|c| (f, c)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn inventory_table() -> Table {
    Table::new(
      "Sheet1",
      &[
        "품목번호", "품목명", "카테고리", "현재재고", "최소재고", "최대재고",
        "단가", "공급업체", "위치", "입고일", "유통기한", "상태",
      ],
    )
  }

  #[test]
  fn aliases_resolve_to_headers() {
    assert_eq!(INVENTORY.resolve("재고").unwrap().column, "현재재고");
    assert_eq!(INVENTORY.resolve("가격").unwrap().column, "단가");
    assert_eq!(MEMBERS.resolve("멤버십").unwrap().column, "멤버십타입");
    assert_eq!(STAFF.resolve("월급").unwrap().column, "월급여");
  }

  #[test]
  fn semantic_names_resolve_too() {
    assert_eq!(INVENTORY.resolve("current_stock").unwrap().column, "현재재고");
    assert_eq!(MEMBERS.resolve("Phone").unwrap().column, "전화번호");
    assert!(MEMBERS.resolve("shoe_size").is_none());
  }

  #[test]
  fn bind_tolerates_missing_optional_column() {
    let table = inventory_table();
    let binding = INVENTORY.bind(&table).unwrap();
    assert_eq!(binding.column("total_value"), None);
    assert_eq!(binding.column("current_stock"), Some(3));
    assert_eq!(binding.key_column(), Some(1));
  }

  #[test]
  fn bind_rejects_missing_required_column() {
    let mut table = inventory_table();
    table.headers.retain(|h| h != "단가");
    let err = INVENTORY.bind(&table).unwrap_err();
    assert!(matches!(err, Error::MissingColumn { column: "단가", .. }));
  }

  #[test]
  fn first_present_candidate_sheet_wins() {
    let mut wb = Workbook::default();
    wb.sheets.push(Table::new("재고목록", &["품목번호"]));
    assert_eq!(INVENTORY.table(&wb).unwrap().name, "재고목록");

    wb.sheets.push(Table::new("Sheet1", &["품목번호"]));
    assert_eq!(INVENTORY.table(&wb).unwrap().name, "Sheet1");
  }

  #[test]
  fn missing_sheet_lists_what_was_found() {
    let mut wb = Workbook::default();
    wb.sheets.push(Table::new("요약", &[]));
    let err = MEMBERS.table(&wb).unwrap_err();
    assert!(err.to_string().contains("요약"), "{err}");
  }

  #[test]
  fn editable_spellings_put_longer_words_first() {
    let words = INVENTORY.editable_spellings();
    let long = words.iter().position(|w| *w == "현재재고").unwrap();
    let short = words.iter().position(|w| *w == "재고").unwrap();
    assert!(long < short);
    assert!(!words.contains(&"품목명"));
    assert!(!words.contains(&"총액"));
  }
}

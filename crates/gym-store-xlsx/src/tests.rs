//! Integration tests for `XlsxStore` against spreadsheets in a temp directory.

use std::{collections::BTreeMap, fs, path::PathBuf};

use gym_core::{
  Category, ErrorKind,
  cell::Cell,
  record::{HrRecord, InventoryItem, Member, PaymentStatus, StaffMember, StockStatus},
  store::{GymStore, WriteReport},
  table::{Table, Workbook},
  update::FieldEdit,
};
use tempfile::TempDir;

use crate::{Error, XlsxStore, encode};

// ─── Fixtures ────────────────────────────────────────────────────────────────

const MEMBER_HEADERS: &[&str] = &[
  "회원번호", "이름", "전화번호", "이메일", "멤버십타입", "가입일", "만료일",
  "결제상태", "비상연락처", "특이사항", "나이", "성별", "주소", "직업", "월회비",
];

const INVENTORY_HEADERS: &[&str] = &[
  "품목번호", "품목명", "카테고리", "현재재고", "최소재고", "최대재고", "단가",
  "총액", "공급업체", "위치", "입고일", "유통기한", "상태",
];

fn write_book(root: &TempDir, category: Category, sheets: Vec<Table>) -> PathBuf {
  let dir = root.path().join(category.dir_name());
  fs::create_dir_all(&dir).unwrap();
  let path = dir.join(format!("{}_test.xlsx", category.file_label()));
  fs::write(&path, encode(&Workbook { sheets }).unwrap()).unwrap();
  path
}

fn member_row(id: i64, name: &str, fee: i64, paid: bool) -> Vec<Cell> {
  let mut row = vec![Cell::Empty; MEMBER_HEADERS.len()];
  row[0] = Cell::Int(id);
  row[1] = Cell::text(name);
  row[4] = Cell::text("일반");
  row[7] = Cell::text(if paid { "완료" } else { "미완료" });
  row[14] = Cell::Int(fee);
  row
}

fn inventory_row(id: i64, name: &str, stock: i64, min: i64, price: i64) -> Vec<Cell> {
  let mut row = vec![Cell::Empty; INVENTORY_HEADERS.len()];
  row[0] = Cell::Int(id);
  row[1] = Cell::text(name);
  row[3] = Cell::Int(stock);
  row[4] = Cell::Int(min);
  row[6] = Cell::Int(price);
  row[7] = Cell::Int(price * stock);
  row[12] = Cell::text("정상");
  row
}

/// A store with members (two rows plus an unrelated sheet) and inventory.
fn populated() -> (TempDir, XlsxStore) {
  let root = tempfile::tempdir().unwrap();

  let mut members = Table::new("회원목록", MEMBER_HEADERS);
  members.push_row(member_row(1, "김철수", 80_000, true));
  members.push_row(member_row(2, "박민지", 120_000, false));
  let mut notes = Table::new("메모", &["내용"]);
  notes.push_row(vec![Cell::text("3월 이벤트")]);
  write_book(&root, Category::Members, vec![members, notes]);

  let mut inventory = Table::new("Sheet1", INVENTORY_HEADERS);
  inventory.push_row(inventory_row(1, "Protein Powder", 20, 10, 45_000));
  inventory.push_row(inventory_row(2, "Towel", 50, 10, 3_000));
  write_book(&root, Category::Inventory, vec![inventory]);

  let store = XlsxStore::new(root.path());
  (root, store)
}

const STAFF_HEADERS: &[&str] = &[
  "직원번호", "이름", "나이", "성별", "전화번호", "이메일", "직책", "부서",
  "입사일", "근무상태", "자격증", "특이사항", "월급여",
];

const HR_HEADERS: &[&str] = &[
  "직원번호", "이름", "부서", "연차사용", "총연차", "잔여연차", "월근무시간",
  "초과근무", "야간근무", "평가점수", "상벌내역", "교육이수",
];

/// A store with staff (no 시급 or 담당구역 columns) and HR records.
fn personnel() -> (TempDir, XlsxStore) {
  let root = tempfile::tempdir().unwrap();

  let mut staff = Table::new("Sheet1", STAFF_HEADERS);
  for (id, name, position, salary) in
    [(1, "정우성", "트레이너", 3_000_000), (2, "오세훈", "매니저", 4_000_000)]
  {
    let mut row = vec![Cell::Empty; STAFF_HEADERS.len()];
    row[0] = Cell::Int(id);
    row[1] = Cell::text(name);
    row[6] = Cell::text(position);
    row[9] = Cell::text("활성");
    row[12] = Cell::Int(salary);
    staff.push_row(row);
  }
  write_book(&root, Category::Staff, vec![staff]);

  let mut hr = Table::new("Sheet1", HR_HEADERS);
  for (id, name, score) in [(1, "정우성", 4.0), (2, "오세훈", 3.5)] {
    let mut row = vec![Cell::Empty; HR_HEADERS.len()];
    row[0] = Cell::Int(id);
    row[1] = Cell::text(name);
    row[3] = Cell::Int(2);
    row[4] = Cell::Int(15);
    row[5] = Cell::Int(13);
    row[9] = Cell::Float(score);
    hr.push_row(row);
  }
  write_book(&root, Category::Hr, vec![hr]);

  let store = XlsxStore::new(root.path());
  (root, store)
}

fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
  pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reads_members_with_summary() {
  let (_root, s) = populated();
  let ds = s.read::<Member>().await.unwrap();
  assert_eq!(ds.records.len(), 2);
  assert_eq!(ds.records[0].name, "김철수");
  assert_eq!(ds.records[0].payment_status, PaymentStatus::Paid);
  assert_eq!(ds.summary.total_revenue, 200_000);
  assert!(ds.revision.is_some());
  assert!(ds.warnings.is_empty());
}

#[tokio::test]
async fn missing_category_is_not_found() {
  let (_root, s) = populated();
  let err = s.read::<StaffMember>().await.unwrap_err();
  assert!(matches!(err, Error::NoBackingFile { .. }));
  assert_eq!(gym_core::Classify::kind(&err), ErrorKind::NotFound);
}

#[tokio::test]
async fn find_by_id() {
  let (_root, s) = populated();
  let member = s.find::<Member>(2).await.unwrap().unwrap();
  assert_eq!(member.name, "박민지");
  assert!(s.find::<Member>(99).await.unwrap().is_none());
}

#[tokio::test]
async fn newest_file_wins() {
  let (root, s) = populated();
  std::thread::sleep(std::time::Duration::from_millis(20));
  let mut newer = Table::new("회원목록", MEMBER_HEADERS);
  newer.push_row(member_row(1, "이서준", 90_000, true));
  let dir = root.path().join("members");
  fs::write(dir.join("회원관리_zz.xlsx"), encode(&Workbook { sheets: vec![newer] }).unwrap()).unwrap();

  let ds = s.read::<Member>().await.unwrap();
  assert_eq!(ds.records.len(), 1);
  assert_eq!(ds.records[0].name, "이서준");
}

// ─── Updates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_then_read_reflects_value() {
  let (_root, s) = populated();
  let updated = s
    .update_field(Category::Members, FieldEdit::new("박민지", "월회비", "15만원"), None)
    .await
    .unwrap();
  let ds = s.read::<Member>().await.unwrap();
  assert_eq!(ds.records[1].monthly_fee, 150_000);
  assert_eq!(ds.revision.as_deref(), Some(updated.revision.as_str()));
}

#[tokio::test]
async fn protein_powder_goes_low() {
  let (_root, s) = populated();
  s.update_field(Category::Inventory, FieldEdit::new("Protein Powder", "재고", "5"), None)
    .await
    .unwrap();
  let ds = s.read::<InventoryItem>().await.unwrap();
  let item = &ds.records[0];
  assert_eq!(item.status, StockStatus::Low);
  assert_eq!(item.total_value, 225_000);
  assert_eq!(ds.low_stock().len(), 1);
}

#[tokio::test]
async fn inventory_total_matches_after_writes() {
  let (root, s) = populated();
  s.update_field(Category::Inventory, FieldEdit::new("Towel", "가격", "4천"), None)
    .await
    .unwrap();
  s.update_field(Category::Inventory, FieldEdit::new("Towel", "현재재고", "30"), None)
    .await
    .unwrap();

  let path = crate::locate(root.path(), Category::Inventory).unwrap();
  let wb = crate::decode(fs::read(path).unwrap()).unwrap();
  let t = wb.sheet("Sheet1").unwrap();
  assert_eq!(t.cell(1, 7).int_or_zero(), 120_000);
  assert_eq!(t.cell(1, 12), &Cell::text("정상"));
}

#[tokio::test]
async fn repeated_update_is_idempotent() {
  let (root, s) = populated();
  let edit = FieldEdit::new("김철수", "전화번호", "010-9999-0000");
  s.update_field(Category::Members, edit.clone(), None).await.unwrap();
  let path = crate::locate(root.path(), Category::Members).unwrap();
  let first = crate::decode(fs::read(&path).unwrap()).unwrap();
  s.update_field(Category::Members, edit, None).await.unwrap();
  let second = crate::decode(fs::read(&path).unwrap()).unwrap();
  assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_person_leaves_file_untouched() {
  let (root, s) = populated();
  let path = crate::locate(root.path(), Category::Members).unwrap();
  let before = fs::read(&path).unwrap();

  let result = s
    .update_field(Category::Members, FieldEdit::new("홍길동", "월회비", "1"), None)
    .await;
  let report = WriteReport::from_update(result);
  assert!(!report.success);
  assert!(report.message.contains("not found"), "{}", report.message);
  assert_eq!(report.kind, Some(ErrorKind::NotFound));

  assert_eq!(fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn other_sheets_survive_a_write() {
  let (root, s) = populated();
  s.update_field(Category::Members, FieldEdit::new("김철수", "직업", "교사"), None)
    .await
    .unwrap();
  let path = crate::locate(root.path(), Category::Members).unwrap();
  let wb = crate::decode(fs::read(path).unwrap()).unwrap();
  assert_eq!(wb.sheet_names(), vec!["회원목록", "메모"]);
  assert_eq!(wb.sheet("메모").unwrap().cell(0, 0), &Cell::text("3월 이벤트"));
}

#[tokio::test]
async fn ambiguous_name_is_rejected() {
  let (_root, s) = populated();
  s.create_member(fields(&[("이름", "김철수")])).await.unwrap();
  let err = s
    .update_field(Category::Members, FieldEdit::new("김철수", "월회비", "1"), None)
    .await
    .unwrap_err();
  assert_eq!(gym_core::Classify::kind(&err), ErrorKind::Conflict);
}

#[tokio::test]
async fn stale_revision_conflicts() {
  let (_root, s) = populated();
  let stale = s.read::<Member>().await.unwrap().revision.unwrap();
  s.update_field(Category::Members, FieldEdit::new("김철수", "직업", "교사"), Some(stale.clone()))
    .await
    .unwrap();
  let err = s
    .update_field(Category::Members, FieldEdit::new("김철수", "직업", "의사"), Some(stale))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict { .. }));

  let ds = s.read::<Member>().await.unwrap();
  assert_eq!(ds.records[0].occupation, "교사");
}

#[tokio::test]
async fn staff_salary_update_reaches_payroll() {
  let (_root, s) = personnel();
  s.update_field(Category::Staff, FieldEdit::new("정우성", "급여", "320만원"), None)
    .await
    .unwrap();
  let ds = s.read::<StaffMember>().await.unwrap();
  assert_eq!(ds.records[0].monthly_salary, 3_200_000);
  assert_eq!(ds.records[0].hourly_wage, 0);
  assert_eq!(ds.summary.trainers, 1);
  assert_eq!(ds.summary.active, 2);
  assert_eq!(ds.summary.total_payroll, 7_200_000);
}

#[tokio::test]
async fn staff_edit_of_absent_column_is_rejected() {
  let (root, s) = personnel();
  let path = crate::locate(root.path(), Category::Staff).unwrap();
  let before = fs::read(&path).unwrap();

  let err = s
    .update_field(Category::Staff, FieldEdit::new("정우성", "시급", "12000"), None)
    .await
    .unwrap_err();
  assert_eq!(gym_core::Classify::kind(&err), ErrorKind::Validation);
  assert_eq!(fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn hr_score_update_keeps_fraction() {
  let (_root, s) = personnel();
  s.update_field(Category::Hr, FieldEdit::new("오세훈", "평가점수", "4.5"), None)
    .await
    .unwrap();
  s.update_field(Category::Hr, FieldEdit::new("정우성", "연차", "15"), None)
    .await
    .unwrap();

  let ds = s.read::<HrRecord>().await.unwrap();
  assert_eq!(ds.records[1].evaluation_score, 4.5);
  assert_eq!(ds.records[0].used_vacation, 15);
  assert_eq!(ds.summary.average_evaluation, 4.25);
  assert_eq!(ds.summary.vacation_used, 17);
  assert!(ds.warnings.is_empty());
}

#[tokio::test]
async fn oversized_fee_is_rejected_and_reads_still_work() {
  let (_root, s) = populated();
  let err = s
    .update_field(
      Category::Members,
      FieldEdit::new("김철수", "월회비", "9223372036854775807"),
      None,
    )
    .await
    .unwrap_err();
  assert_eq!(gym_core::Classify::kind(&err), ErrorKind::Validation);
  let ds = s.read::<Member>().await.unwrap();
  assert_eq!(ds.summary.total_revenue, 200_000);
}

// ─── Creation ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_member_in_empty_sheet() {
  let root = tempfile::tempdir().unwrap();
  write_book(&root, Category::Members, vec![Table::new("회원목록", MEMBER_HEADERS)]);
  let s = XlsxStore::new(root.path());

  let created = s.create_member(fields(&[("이름", "최유리")])).await.unwrap();
  assert_eq!(created.id, 1);

  let member = s.find::<Member>(1).await.unwrap().unwrap();
  assert_eq!(member.monthly_fee, 80_000);
  assert_eq!(member.payment_status, PaymentStatus::Unpaid);
  assert_eq!(member.membership_type, "일반");
}

#[tokio::test]
async fn sequential_creates_number_from_one() {
  let root = tempfile::tempdir().unwrap();
  write_book(&root, Category::Members, vec![Table::new("회원목록", MEMBER_HEADERS)]);
  let s = XlsxStore::new(root.path());

  for n in 1..=4 {
    let name = format!("회원{n}");
    let created = s.create_member(fields(&[("이름", name.as_str())])).await.unwrap();
    assert_eq!(created.id, n);
  }
  let ids: Vec<i64> = s.read::<Member>().await.unwrap().records.iter().map(|m| m.id).collect();
  assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
  let (_root, s) = populated();
  let handles: Vec<_> = (0..5)
    .map(|n| {
      let s = s.clone();
      tokio::spawn(async move {
        let name = format!("item {n}");
        s.create_record(Category::Inventory, fields(&[("품목명", name.as_str())]))
          .await
          .unwrap()
          .id
      })
    })
    .collect();
  let mut ids = Vec::new();
  for h in handles {
    ids.push(h.await.unwrap());
  }
  ids.sort_unstable();
  assert_eq!(ids, vec![3, 4, 5, 6, 7]);
}

#[tokio::test]
async fn create_without_name_fails() {
  let (root, s) = populated();
  let path = crate::locate(root.path(), Category::Members).unwrap();
  let before = fs::read(&path).unwrap();
  let report = WriteReport::from_create(s.create_member(fields(&[("전화번호", "010")])).await);
  assert!(!report.success);
  assert_eq!(report.kind, Some(ErrorKind::Validation));
  assert_eq!(fs::read(&path).unwrap(), before);
}

#[tokio::test]
async fn dashboard_degrades_missing_categories() {
  let (_root, s) = populated();
  let view = s.compose_dashboard().await;
  assert_eq!(view.summary.members, 2);
  assert_eq!(view.summary.items, 2);
  assert_eq!(view.summary.staff, 0);
  assert!(!view.staff.warnings.is_empty());
  assert!(view.hr.records.is_empty());
}

//! How each record type is shown in chat: table columns and a one-line
//! headline of its summary.

use gym_core::{
  record::{HrRecord, InventoryItem, Member, StaffMember},
  summary::{HrSummary, InventorySummary, MemberSummary, StaffSummary, Summarize},
};

/// Korean currency formatting, e.g. `80,000원`.
pub fn won(amount: i64) -> String {
  let digits = amount.unsigned_abs().to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }
  let sign = if amount < 0 { "-" } else { "" };
  format!("{sign}{grouped}원")
}

/// A record type the chat layer can tabulate and summarise.
pub trait ChatView: Summarize + Send + 'static {
  const TITLE: &'static str;
  const HEADERS: &'static [&'static str];
  /// Largest number of rows put in a chat table; `None` shows every row.
  const ROW_LIMIT: Option<usize> = None;

  /// One table row, aligned with [`ChatView::HEADERS`].
  fn row(&self) -> Vec<String>;

  fn headline(summary: &Self::Summary) -> String;
}

impl ChatView for Member {
  const TITLE: &'static str = "회원 목록";
  const HEADERS: &'static [&'static str] =
    &["번호", "이름", "전화번호", "멤버십", "결제상태", "월회비"];
  const ROW_LIMIT: Option<usize> = Some(10);

  fn row(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.name.clone(),
      self.phone.clone(),
      self.membership_type.clone(),
      self.payment_status.label().to_owned(),
      won(self.monthly_fee),
    ]
  }

  fn headline(s: &MemberSummary) -> String {
    format!(
      "총 {}명 | 결제완료 {}명 | VIP {}명 | 월 매출 {}",
      s.total,
      s.paid,
      s.vip,
      won(s.total_revenue)
    )
  }
}

impl ChatView for StaffMember {
  const TITLE: &'static str = "직원 목록";
  const HEADERS: &'static [&'static str] =
    &["번호", "이름", "직책", "부서", "근무상태", "월급여"];

  fn row(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.name.clone(),
      self.position.clone(),
      self.department.clone(),
      self.status.clone(),
      won(self.monthly_salary),
    ]
  }

  fn headline(s: &StaffSummary) -> String {
    format!(
      "총 {}명 | 근무 중 {}명 | 트레이너 {}명 | 인건비 {}",
      s.total,
      s.active,
      s.trainers,
      won(s.total_payroll)
    )
  }
}

impl ChatView for HrRecord {
  const TITLE: &'static str = "인사 현황";
  const HEADERS: &'static [&'static str] =
    &["번호", "이름", "부서", "잔여연차", "초과근무", "평가점수"];

  fn row(&self) -> Vec<String> {
    vec![
      self.employee_id.to_string(),
      self.name.clone(),
      self.department.clone(),
      format!("{}일", self.remaining_vacation),
      format!("{}시간", self.overtime_hours),
      format!("{:.1}", self.evaluation_score),
    ]
  }

  fn headline(s: &HrSummary) -> String {
    format!(
      "총 {}명 | 연차 사용 {}일 | 초과근무 {}시간 | 평균 평가 {:.2}",
      s.total, s.vacation_used, s.overtime, s.average_evaluation
    )
  }
}

impl ChatView for InventoryItem {
  const TITLE: &'static str = "재고 현황";
  const HEADERS: &'static [&'static str] =
    &["번호", "품목명", "카테고리", "현재재고", "최소재고", "단가", "상태"];

  fn row(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.item_name.clone(),
      self.category.clone(),
      self.current_stock.to_string(),
      self.min_stock_level.to_string(),
      won(self.unit_price),
      self.status.label().to_owned(),
    ]
  }

  fn headline(s: &InventorySummary) -> String {
    format!(
      "총 {}개 품목 | 보충 필요 {}개 | 품절 {}개 | 재고 가치 {}",
      s.total,
      s.restock,
      s.out_of_stock,
      won(s.total_value)
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn won_groups_thousands() {
    assert_eq!(won(0), "0원");
    assert_eq!(won(800), "800원");
    assert_eq!(won(80_000), "80,000원");
    assert_eq!(won(1_234_567), "1,234,567원");
    assert_eq!(won(-45_000), "-45,000원");
  }

  #[test]
  fn inventory_row_matches_headers() {
    let item = InventoryItem {
      id:              3,
      item_name:       "Protein Powder".into(),
      category:        "보충제".into(),
      current_stock:   5,
      min_stock_level: 10,
      max_stock_level: 50,
      unit_price:      45_000,
      total_value:     225_000,
      supplier:        String::new(),
      location:        String::new(),
      received_date:   String::new(),
      expiry_date:     String::new(),
      status:          gym_core::record::StockStatus::Low,
    };
    let row = item.row();
    assert_eq!(row.len(), InventoryItem::HEADERS.len());
    assert_eq!(row[5], "45,000원");
    assert_eq!(row[6], "부족");
  }
}

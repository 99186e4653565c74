//! Per-category summary statistics.
//!
//! JSON keys are the Korean labels the dashboard front end reads.

use std::fmt::Debug;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::record::{
  FromRow, HrRecord, InventoryItem, Member, PaymentStatus, StaffMember,
};

/// A record type with a summary over a full table.
pub trait Summarize: FromRow + Serialize {
  type Summary: Serialize
    + DeserializeOwned
    + Default
    + Clone
    + Debug
    + PartialEq
    + Send
    + Sync;

  fn summarize(records: &[Self]) -> Self::Summary;
}

fn count<T>(records: &[T], pred: impl Fn(&T) -> bool) -> usize {
  records.iter().filter(|r| pred(r)).count()
}

/// Saturating sum, so an oversized sheet value pins the total instead of
/// wrapping.
fn total<T>(records: &[T], value: impl Fn(&T) -> i64) -> i64 {
  records.iter().fold(0, |acc, r| acc.saturating_add(value(r)))
}

// ─── Members ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberSummary {
  #[serde(rename = "총회원수")]
  pub total:         usize,
  #[serde(rename = "활성회원")]
  pub paid:          usize,
  #[serde(rename = "프리미엄")]
  pub premium:       usize,
  #[serde(rename = "일반")]
  pub standard:      usize,
  #[serde(rename = "VIP")]
  pub vip:           usize,
  #[serde(rename = "남성")]
  pub male:          usize,
  #[serde(rename = "여성")]
  pub female:        usize,
  #[serde(rename = "총월매출")]
  pub total_revenue: i64,
}

impl Summarize for Member {
  type Summary = MemberSummary;

  fn summarize(records: &[Self]) -> MemberSummary {
    MemberSummary {
      total:         records.len(),
      paid:          count(records, |m| m.payment_status == PaymentStatus::Paid),
      premium:       count(records, |m| m.membership_type == "프리미엄"),
      standard:      count(records, |m| m.membership_type == "일반"),
      vip:           count(records, |m| m.membership_type == "VIP"),
      male:          count(records, |m| matches!(m.gender.as_str(), "남" | "남성")),
      female:        count(records, |m| matches!(m.gender.as_str(), "여" | "여성")),
      total_revenue: total(records, |m| m.monthly_fee),
    }
  }
}

// ─── Staff ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffSummary {
  #[serde(rename = "총직원수")]
  pub total:         usize,
  #[serde(rename = "트레이너")]
  pub trainers:      usize,
  #[serde(rename = "매니저")]
  pub managers:      usize,
  #[serde(rename = "청소원")]
  pub cleaners:      usize,
  #[serde(rename = "수영강사")]
  pub swim_coaches:  usize,
  #[serde(rename = "활성직원")]
  pub active:        usize,
  #[serde(rename = "총인건비")]
  pub total_payroll: i64,
}

impl Summarize for StaffMember {
  type Summary = StaffSummary;

  fn summarize(records: &[Self]) -> StaffSummary {
    StaffSummary {
      total:         records.len(),
      trainers:      count(records, |s| s.position == "트레이너"),
      managers:      count(records, |s| s.position == "매니저"),
      cleaners:      count(records, |s| s.position == "청소원"),
      swim_coaches:  count(records, |s| s.position == "수영강사"),
      active:        count(records, |s| s.status == "활성"),
      total_payroll: total(records, |s| s.monthly_salary),
    }
  }
}

// ─── HR ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HrSummary {
  #[serde(rename = "총직원수")]
  pub total:                usize,
  #[serde(rename = "총사용연차")]
  pub vacation_used:        i64,
  #[serde(rename = "총초과근무")]
  pub overtime:             i64,
  #[serde(rename = "평균평가점수")]
  pub average_evaluation:   f64,
  #[serde(rename = "연차완전사용자")]
  pub vacation_exhausted:   usize,
  #[serde(rename = "교육완료자")]
  pub training_completions: usize,
}

impl Summarize for HrRecord {
  type Summary = HrSummary;

  fn summarize(records: &[Self]) -> HrSummary {
    let average = if records.is_empty() {
      0.0
    } else {
      let total: f64 = records.iter().map(|r| r.evaluation_score).sum();
      (total / records.len() as f64 * 100.0).round() / 100.0
    };
    HrSummary {
      total:                records.len(),
      vacation_used:        total(records, |r| r.used_vacation),
      overtime:             total(records, |r| r.overtime_hours),
      average_evaluation:   average,
      vacation_exhausted:   count(records, |r| r.remaining_vacation == 0),
      training_completions: count(records, |r| !r.training_completed.is_empty()),
    }
  }
}

// ─── Inventory ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySummary {
  #[serde(rename = "총품목수")]
  pub total:        usize,
  #[serde(rename = "정상재고")]
  pub normal:       usize,
  #[serde(rename = "부족재고")]
  pub low:          usize,
  #[serde(rename = "긴급부족")]
  pub critical:     usize,
  #[serde(rename = "품절")]
  pub out_of_stock: usize,
  #[serde(rename = "총재고가치")]
  pub total_value:  i64,
  #[serde(rename = "부족품목수")]
  pub restock:      usize,
}

impl Summarize for InventoryItem {
  type Summary = InventorySummary;

  fn summarize(records: &[Self]) -> InventorySummary {
    use crate::record::StockStatus as S;
    InventorySummary {
      total:        records.len(),
      normal:       count(records, |i| i.status == S::Normal),
      low:          count(records, |i| i.status == S::Low),
      critical:     count(records, |i| i.status == S::Critical),
      out_of_stock: count(records, |i| i.status == S::OutOfStock),
      total_value:  total(records, |i| i.total_value),
      restock:      count(records, |i| i.status.is_low()),
    }
  }
}

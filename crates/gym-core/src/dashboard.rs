//! The combined dashboard view.

use std::fmt;

use serde::Serialize;

use crate::{
  parse::Dataset,
  record::{HrRecord, InventoryItem, Member, StaffMember},
  summary::Summarize,
};

/// Headline numbers shown at the top of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
  #[serde(rename = "총회원수")]
  pub members:   usize,
  #[serde(rename = "총직원수")]
  pub staff:     usize,
  #[serde(rename = "총품목수")]
  pub items:     usize,
  #[serde(rename = "부족재고")]
  pub low_stock: usize,
  #[serde(rename = "월매출")]
  pub revenue:   i64,
  #[serde(rename = "인건비")]
  pub payroll:   i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
  pub members:   Dataset<Member>,
  pub staff:     Dataset<StaffMember>,
  pub hr:        Dataset<HrRecord>,
  pub inventory: Dataset<InventoryItem>,
  pub summary:   DashboardSummary,
}

fn or_degraded<T: Summarize, E: fmt::Display>(
  result: Result<Dataset<T>, E>,
) -> Dataset<T> {
  result.unwrap_or_else(Dataset::degraded)
}

impl DashboardView {
  /// Combine four independent loads. A failed load contributes an empty
  /// dataset carrying the failure as a warning; the others are unaffected.
  pub fn compose<E: fmt::Display>(
    members: Result<Dataset<Member>, E>,
    staff: Result<Dataset<StaffMember>, E>,
    hr: Result<Dataset<HrRecord>, E>,
    inventory: Result<Dataset<InventoryItem>, E>,
  ) -> Self {
    let members = or_degraded(members);
    let staff = or_degraded(staff);
    let hr = or_degraded(hr);
    let inventory = or_degraded(inventory);

    let summary = DashboardSummary {
      members:   members.records.len(),
      staff:     staff.records.len(),
      items:     inventory.records.len(),
      low_stock: inventory.summary.restock,
      revenue:   members.summary.total_revenue,
      payroll:   staff.summary.total_payroll,
    };
    Self { members, staff, hr, inventory, summary }
  }
}

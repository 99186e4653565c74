//! The four data categories and their on-disk naming.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// A data category. Each one is backed by its own spreadsheet directory.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
  Members,
  Staff,
  Hr,
  Inventory,
}

impl Category {
  pub const ALL: [Category; 4] =
    [Self::Members, Self::Staff, Self::Hr, Self::Inventory];

  /// Directory name under the data root.
  pub fn dir_name(self) -> &'static str {
    match self {
      Self::Members => "members",
      Self::Staff => "staff",
      Self::Hr => "hr",
      Self::Inventory => "inventory",
    }
  }

  /// Label embedded in the spreadsheet file name, e.g. `회원관리_2024.xlsx`.
  pub fn file_label(self) -> &'static str {
    match self {
      Self::Members => "회원관리",
      Self::Staff => "직원관리",
      Self::Hr => "인사관리",
      Self::Inventory => "재고관리",
    }
  }

  /// Singular noun used in human-readable messages.
  pub fn noun(self) -> &'static str {
    match self {
      Self::Members => "member",
      Self::Staff => "staff member",
      Self::Hr => "HR record",
      Self::Inventory => "item",
    }
  }

  /// Stable position in [`Category::ALL`].
  pub fn index(self) -> usize {
    match self {
      Self::Members => 0,
      Self::Staff => 1,
      Self::Hr => 2,
      Self::Inventory => 3,
    }
  }
}

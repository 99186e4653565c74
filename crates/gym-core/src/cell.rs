//! Raw spreadsheet cells and the per-type coercion rules applied on read.
//!
//! A cell that is empty, or whose text is the `nan` sentinel left behind by
//! earlier spreadsheet tooling, is *blank*. Blank cells coerce to the zero
//! value of their field type without complaint. Non-blank cells that cannot be
//! read as the field type also coerce to zero, but the caller is told so it
//! can record a warning.

use std::fmt;

/// The semantic type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Integer,
  Real,
  Text,
  /// A boolean-like column stored as a localized label (e.g. `완료`).
  Flag,
}

/// One cell as it sits in the sheet, before any schema is applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
  #[default]
  Empty,
  Int(i64),
  Float(f64),
  Text(String),
  Bool(bool),
}

/// The value of a non-blank cell that could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unreadable(pub String);

impl Cell {
  pub fn text(s: impl Into<String>) -> Self { Self::Text(s.into()) }

  pub fn is_blank(&self) -> bool {
    match self {
      Self::Empty => true,
      Self::Float(f) => f.is_nan(),
      Self::Text(s) => {
        let s = s.trim();
        s.is_empty() || s.eq_ignore_ascii_case("nan")
      }
      Self::Int(_) | Self::Bool(_) => false,
    }
  }

  /// The cell rendered as text. Blank cells render as the empty string and
  /// integral floats drop their fractional part (`25.0` -> `25`).
  pub fn as_text(&self) -> String {
    if self.is_blank() {
      return String::new();
    }
    match self {
      Self::Empty => String::new(),
      Self::Int(v) => v.to_string(),
      Self::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => {
        format!("{}", *f as i64)
      }
      Self::Float(f) => f.to_string(),
      Self::Text(s) => s.trim().to_owned(),
      Self::Bool(b) => b.to_string(),
    }
  }

  /// Read the cell as an integer. `Ok(None)` means blank.
  pub fn parse_int(&self) -> Result<Option<i64>, Unreadable> {
    if self.is_blank() {
      return Ok(None);
    }
    match self {
      Self::Int(v) => Ok(Some(*v)),
      Self::Float(f) if f.is_finite() => Ok(Some(f.trunc() as i64)),
      Self::Text(s) => {
        let cleaned: String =
          s.trim().chars().filter(|c| *c != ',').collect();
        cleaned
          .parse::<i64>()
          .ok()
          .or_else(|| {
            cleaned
              .parse::<f64>()
              .ok()
              .filter(|f| f.is_finite())
              .map(|f| f.trunc() as i64)
          })
          .map(Some)
          .ok_or_else(|| Unreadable(s.clone()))
      }
      other => Err(Unreadable(other.to_string())),
    }
  }

  /// Read the cell as a real number. `Ok(None)` means blank.
  pub fn parse_real(&self) -> Result<Option<f64>, Unreadable> {
    if self.is_blank() {
      return Ok(None);
    }
    match self {
      Self::Int(v) => Ok(Some(*v as f64)),
      Self::Float(f) if f.is_finite() => Ok(Some(*f)),
      Self::Text(s) => s
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Some)
        .ok_or_else(|| Unreadable(s.clone())),
      other => Err(Unreadable(other.to_string())),
    }
  }

  /// Integer value with blank and unreadable cells mapped to zero.
  pub fn int_or_zero(&self) -> i64 {
    self.parse_int().ok().flatten().unwrap_or(0)
  }
}

impl fmt::Display for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Empty => Ok(()),
      Self::Int(v) => write!(f, "{v}"),
      Self::Float(v) => write!(f, "{v}"),
      Self::Text(s) => f.write_str(s),
      Self::Bool(b) => write!(f, "{b}"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nan_text_is_blank() {
    assert!(Cell::text("nan").is_blank());
    assert!(Cell::text("  NaN ").is_blank());
    assert!(Cell::Float(f64::NAN).is_blank());
    assert!(!Cell::Int(0).is_blank());
  }

  #[test]
  fn integral_floats_render_without_fraction() {
    assert_eq!(Cell::Float(25.0).as_text(), "25");
    assert_eq!(Cell::Float(4.5).as_text(), "4.5");
    assert_eq!(Cell::text("nan").as_text(), "");
  }

  #[test]
  fn parse_int_accepts_floats_and_grouped_text() {
    assert_eq!(Cell::Float(80000.0).parse_int(), Ok(Some(80000)));
    assert_eq!(Cell::text("1,200").parse_int(), Ok(Some(1200)));
    assert_eq!(Cell::text("12.0").parse_int(), Ok(Some(12)));
    assert_eq!(Cell::Empty.parse_int(), Ok(None));
  }

  #[test]
  fn parse_int_reports_garbage() {
    assert_eq!(
      Cell::text("twelve").parse_int(),
      Err(Unreadable("twelve".into()))
    );
    assert!(Cell::Bool(true).parse_int().is_err());
  }

  #[test]
  fn parse_real_reads_text() {
    assert_eq!(Cell::text("4.25").parse_real(), Ok(Some(4.25)));
    assert_eq!(Cell::Int(3).parse_real(), Ok(Some(3.0)));
    assert!(Cell::text("good").parse_real().is_err());
  }
}

//! The amount grammar used for numeric field input.
//!
//! ```text
//! amount   = ["-"] number [unit]
//! number   = digits { "," digit digit digit } [ "." digits ]
//! unit     = "원" | "개" | "천" | "천원" | "k" | "K" | "만" | "만원"
//! ```
//!
//! Whitespace is allowed between tokens. Commas must group exactly three
//! digits. A decimal point is accepted only when the scaled value is whole,
//! so `1.5만` is 15000 but `1.5` is rejected for an integer field.

use std::fmt;

use thiserror::Error;

/// Why a string is not a valid amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
  #[error("no value given")]
  Empty,
  #[error("expected a number at {0:?}")]
  ExpectedNumber(String),
  #[error("digit grouping in {0:?} must use groups of three")]
  BadGrouping(String),
  #[error("unknown unit {0:?}")]
  UnknownUnit(String),
  #[error("unexpected {0:?} after the amount")]
  TrailingInput(String),
  #[error("{0} is not a whole number")]
  Fractional(String),
  #[error("{0} is out of range")]
  Overflow(String),
}

// ─── Lexer ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
  Minus,
  Digits(String),
  Comma,
  Point,
  Word(String),
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Minus => f.write_str("-"),
      Self::Digits(s) | Self::Word(s) => f.write_str(s),
      Self::Comma => f.write_str(","),
      Self::Point => f.write_str("."),
    }
  }
}

fn lex(input: &str) -> Vec<Token> {
  let mut tokens = Vec::new();
  let mut chars = input.chars().peekable();
  while let Some(&c) = chars.peek() {
    match c {
      c if c.is_whitespace() => {
        chars.next();
      }
      '-' => {
        chars.next();
        tokens.push(Token::Minus);
      }
      ',' => {
        chars.next();
        tokens.push(Token::Comma);
      }
      '.' => {
        chars.next();
        tokens.push(Token::Point);
      }
      c if c.is_ascii_digit() => {
        let mut digits = String::new();
        while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
          digits.push(d);
          chars.next();
        }
        tokens.push(Token::Digits(digits));
      }
      _ => {
        let mut word = String::new();
        while let Some(&w) = chars
          .peek()
          .filter(|w| !w.is_whitespace() && !w.is_ascii_digit() && !",.-".contains(**w))
        {
          word.push(w);
          chars.next();
        }
        tokens.push(Token::Word(word));
      }
    }
  }
  tokens
}

// ─── Parser ──────────────────────────────────────────────────────────────────

fn unit_multiplier(unit: &str) -> Option<i128> {
  match unit {
    "원" | "개" => Some(1),
    "천" | "천원" | "k" | "K" => Some(1_000),
    "만" | "만원" => Some(10_000),
    _ => None,
  }
}

/// A parsed amount: `mantissa / 10^scale * multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Amount {
  mantissa:   i128,
  scale:      u32,
  multiplier: i128,
}

fn parse(input: &str) -> Result<Amount, AmountError> {
  let overflow = || AmountError::Overflow(input.trim().to_owned());
  let mut tokens = lex(input).into_iter().peekable();
  if tokens.peek().is_none() {
    return Err(AmountError::Empty);
  }

  let negative = tokens.next_if_eq(&Token::Minus).is_some();

  let mut integer = match tokens.next() {
    Some(Token::Digits(d)) => d,
    Some(other) => return Err(AmountError::ExpectedNumber(other.to_string())),
    None => return Err(AmountError::ExpectedNumber(String::new())),
  };
  let leading_len = integer.len();
  let mut grouped = false;
  while tokens.next_if_eq(&Token::Comma).is_some() {
    match tokens.next() {
      Some(Token::Digits(g)) if g.len() == 3 => {
        grouped = true;
        integer.push_str(&g);
      }
      _ => return Err(AmountError::BadGrouping(input.trim().to_owned())),
    }
  }
  if grouped && leading_len > 3 {
    return Err(AmountError::BadGrouping(input.trim().to_owned()));
  }

  let mut fraction = String::new();
  if tokens.next_if_eq(&Token::Point).is_some() {
    match tokens.next() {
      Some(Token::Digits(d)) => fraction = d,
      Some(other) => return Err(AmountError::ExpectedNumber(other.to_string())),
      None => return Err(AmountError::ExpectedNumber(".".into())),
    }
  }

  let multiplier = match tokens.next() {
    None => 1,
    Some(Token::Word(unit)) => {
      unit_multiplier(&unit).ok_or(AmountError::UnknownUnit(unit))?
    }
    Some(other) => return Err(AmountError::TrailingInput(other.to_string())),
  };
  if let Some(rest) = tokens.next() {
    return Err(AmountError::TrailingInput(rest.to_string()));
  }

  let digits = format!("{integer}{fraction}");
  let magnitude: i128 = digits.parse().map_err(|_| overflow())?;
  let scale = u32::try_from(fraction.len()).map_err(|_| overflow())?;
  Ok(Amount {
    mantissa: if negative { -magnitude } else { magnitude },
    scale,
    multiplier,
  })
}

/// Parse an amount that must come out as a whole number.
pub fn parse_amount(input: &str) -> Result<i64, AmountError> {
  let amount = parse(input)?;
  let overflow = || AmountError::Overflow(input.trim().to_owned());
  let divisor = 10_i128.checked_pow(amount.scale).ok_or_else(overflow)?;
  let scaled = amount
    .mantissa
    .checked_mul(amount.multiplier)
    .ok_or_else(overflow)?;
  if scaled % divisor != 0 {
    return Err(AmountError::Fractional(input.trim().to_owned()));
  }
  i64::try_from(scaled / divisor).map_err(|_| overflow())
}

/// Parse an amount that may carry a fractional part.
pub fn parse_decimal(input: &str) -> Result<f64, AmountError> {
  let amount = parse(input)?;
  let value = amount.mantissa as f64 * amount.multiplier as f64
    / 10_f64.powi(amount.scale as i32);
  if value.is_finite() {
    Ok(value)
  } else {
    Err(AmountError::Overflow(input.trim().to_owned()))
  }
}

//! Edit-intent detection for chat messages.
//!
//! A message such as `김철수 월회비 15만원으로 수정해줘` reads as a
//! [`FieldEdit`] setting `월회비` on the member `김철수`. Field words are taken
//! from the category's schema, so every field the detector recognises also
//! resolves when the edit is applied.

use std::sync::LazyLock;

use gym_core::{Category, schema::Schema, update::FieldEdit};
use regex::Regex;

/// Verbs that turn a sentence into an edit request.
const VERBS: &str = "수정|변경|바꿔|바꾸|조정|설정";

fn pattern(category: Category) -> String {
  let fields = Schema::for_category(category)
    .editable_spellings()
    .into_iter()
    .map(regex::escape)
    .collect::<Vec<_>>()
    .join("|");

  // key, optional honorific or role, optional possessive, field, optional
  // particle, value, then a verb. A bare `해줘` only counts after a
  // directional particle (`15만원으로 해줘`), so `확인해줘` stays a question.
  format!(
    r"^\s*(?P<key>.+?)\s*(?:님|씨|회원|직원)?\s*(?:의\s*)?(?P<field>{fields})\s*(?:을|를|은|는|이|가)?\s*(?P<value>.+?)\s*(?:(?:으로|로)\s*해\s*줘|(?:으로|로)?\s*(?:{VERBS}))"
  )
}

static PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
  Category::ALL.map(|category| {
    Regex::new(&pattern(category)).expect("valid edit-intent regex")
  })
});

/// Read `message` as an edit of one `category` record, if it is phrased as
/// one.
pub fn detect(category: Category, message: &str) -> Option<FieldEdit> {
  let caps = PATTERNS[category.index()].captures(message)?;
  let key = caps.name("key")?.as_str().trim();
  let field = caps.name("field")?.as_str();
  let value = caps.name("value")?.as_str().trim();
  if key.is_empty() || value.is_empty() {
    return None;
  }
  Some(FieldEdit::new(key, field, value))
}

//! What the assistant is told about a category, and the table shown
//! alongside a reply when the user asks for a list.

use gym_core::{Category, parse::Dataset};
use serde::Serialize;

use crate::view::ChatView;

/// Records included verbatim in the prompt.
const CONTEXT_RECORDS: usize = 10;

const LIST_WORDS: &[&str] = &["목록", "리스트", "명단", "현황", "전체", "모든", "모두"];

/// Whether `message` asks to see records rather than a single answer.
pub fn is_list_request(message: &str) -> bool {
  LIST_WORDS.iter().any(|w| message.contains(w))
}

/// A table rendered next to the chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableData {
  #[serde(rename = "type")]
  pub kind:    Category,
  pub title:   String,
  pub headers: Vec<String>,
  pub rows:    Vec<Vec<String>>,
  pub summary: String,
}

/// One category's data, prepared for a chat turn.
#[derive(Debug, Clone)]
pub struct Snapshot {
  pub category: Category,
  pub headline: String,
  pub context:  String,
  pub table:    TableData,
}

impl Snapshot {
  pub fn of<T: ChatView>(dataset: &Dataset<T>) -> Self {
    let category = T::CATEGORY;
    let headline = T::headline(&dataset.summary);
    Self {
      category,
      context: render_context(dataset),
      table: TableData {
        kind:    category,
        title:   T::TITLE.to_owned(),
        headers: T::HEADERS.iter().map(|h| (*h).to_owned()).collect(),
        rows:    dataset
          .records
          .iter()
          .take(T::ROW_LIMIT.unwrap_or(usize::MAX))
          .map(T::row)
          .collect(),
        summary: headline.clone(),
      },
      headline,
    }
  }

  /// System prompt for an assistant answering about this category.
  pub fn system_prompt(&self) -> String {
    format!(
      "당신은 헬스장 {label} 담당 AI 어시스턴트입니다. 아래 데이터만을 근거로 \
       한국어로 간결하게 답하세요. 데이터에 없는 내용은 모른다고 답하고, \
       여러 건을 보여줄 때는 마크다운 표를 사용하세요.\n\n{context}",
      label = self.category.file_label(),
      context = self.context,
    )
  }
}

fn render_context<T: ChatView>(dataset: &Dataset<T>) -> String {
  let summary = serde_json::to_string(&dataset.summary).unwrap_or_default();
  let mut out = format!(
    "[{}] 요약: {summary}\n전체 {}건",
    T::CATEGORY.file_label(),
    dataset.records.len()
  );
  if dataset.records.len() > CONTEXT_RECORDS {
    out.push_str(&format!(" 중 {CONTEXT_RECORDS}건"));
  }
  out.push_str(":\n");
  for record in dataset.records.iter().take(CONTEXT_RECORDS) {
    if let Ok(line) = serde_json::to_string(record) {
      out.push_str(&line);
      out.push('\n');
    }
  }
  if !dataset.warnings.is_empty() {
    out.push_str(&format!(
      "참고: 파일을 읽는 중 {}건의 경고가 있었습니다. 첫 경고: {}\n",
      dataset.warnings.len(),
      dataset.warnings[0]
    ));
  }
  out
}

//! Language-model backends.
//!
//! [`OpenAiAssistant`] talks to any OpenAI-compatible `chat/completions`
//! endpoint. [`OfflineAssistant`] answers from the category headline alone
//! and needs no network; it also stands in when the remote call fails.

use std::{future::Future, time::Duration};

use gym_core::Category;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// One chat turn as handed to an assistant.
#[derive(Debug, Clone)]
pub struct Prompt {
  pub category: Category,
  pub system:   String,
  pub message:  String,
  /// One-line summary of the category's data.
  pub headline: String,
}

pub trait Assistant: Send + Sync {
  fn reply(&self, prompt: &Prompt) -> impl Future<Output = Result<String>> + Send;
}

// ─── OpenAI-compatible ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
  pub api_key:  String,
  pub model:    String,
  pub base_url: String,
}

/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OpenAiAssistant {
  client: Client,
  config: OpenAiConfig,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
  model:       &'a str,
  messages:    [Message<'a>; 2],
  max_tokens:  u32,
  temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
  role:    &'a str,
  content: &'a str,
}

#[derive(Deserialize)]
struct Completion {
  choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
  message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
  content: Option<String>,
}

impl OpenAiAssistant {
  pub fn new(config: OpenAiConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  pub fn model(&self) -> &str { &self.config.model }

  fn url(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }
}

impl Assistant for OpenAiAssistant {
  async fn reply(&self, prompt: &Prompt) -> Result<String> {
    let body = CompletionRequest {
      model:       &self.config.model,
      messages:    [
        Message { role: "system", content: &prompt.system },
        Message { role: "user", content: &prompt.message },
      ],
      max_tokens:  1000,
      temperature: 0.7,
    };

    let resp = self
      .client
      .post(self.url())
      .bearer_auth(&self.config.api_key)
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status: status.as_u16(), body });
    }

    let completion: Completion = resp.json().await?;
    completion
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .map(|text| text.trim().to_owned())
      .filter(|text| !text.is_empty())
      .ok_or(Error::EmptyReply)
  }
}

// ─── Offline ─────────────────────────────────────────────────────────────────

/// Canned replies built from the data headline.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAssistant;

fn edit_example(category: Category) -> &'static str {
  match category {
    Category::Members => "김철수 월회비 15만원으로 수정해줘",
    Category::Staff => "홍길동 급여 300만원으로 변경",
    Category::Hr => "홍길동 연차 3으로 수정",
    Category::Inventory => "Protein Powder 재고 5개로 변경",
  }
}

impl OfflineAssistant {
  pub fn compose(&self, prompt: &Prompt) -> String {
    let label = prompt.category.file_label();
    let message = prompt.message.to_lowercase();
    let example = edit_example(prompt.category);

    let greeting = message.contains("안녕")
      || message.split_whitespace().any(|w| matches!(w, "hi" | "hello"));

    if greeting {
      format!(
        "안녕하세요! {label} AI입니다.\n\n현재 현황: {}\n\n무엇을 도와드릴까요?",
        prompt.headline
      )
    } else if ["도움", "help", "기능", "사용법"].iter().any(|w| message.contains(w)) {
      format!(
        "**{label} AI 사용법**\n\n\
         - \"목록 보여줘\": 전체 목록을 표로 보여드립니다.\n\
         - \"현황 알려줘\": 요약 통계를 알려드립니다.\n\
         - \"{example}\": 항목을 바로 수정합니다."
      )
    } else {
      format!(
        "📊 **{label} 현황**\n\n{}\n\n목록은 \"목록 보여줘\", 수정은 \"{example}\"처럼 \
         요청해 주세요.",
        prompt.headline
      )
    }
  }
}

impl Assistant for OfflineAssistant {
  async fn reply(&self, prompt: &Prompt) -> Result<String> { Ok(self.compose(prompt)) }
}

// ─── Backend ─────────────────────────────────────────────────────────────────

/// The assistant chosen at startup.
#[derive(Clone)]
pub enum Backend {
  OpenAi(OpenAiAssistant),
  Offline(OfflineAssistant),
}

impl Backend {
  /// The remote assistant when an API key is configured, otherwise offline.
  pub fn from_config(config: Option<OpenAiConfig>) -> Result<Self> {
    match config {
      Some(config) if !config.api_key.is_empty() => {
        Ok(Self::OpenAi(OpenAiAssistant::new(config)?))
      }
      _ => Ok(Self::Offline(OfflineAssistant)),
    }
  }

  pub fn describe(&self) -> String {
    match self {
      Self::OpenAi(a) => format!("openai ({})", a.model()),
      Self::Offline(_) => "offline".to_owned(),
    }
  }
}

impl Assistant for Backend {
  async fn reply(&self, prompt: &Prompt) -> Result<String> {
    match self {
      Self::OpenAi(a) => a.reply(prompt).await,
      Self::Offline(a) => a.reply(prompt).await,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn prompt(message: &str) -> Prompt {
    Prompt {
      category: Category::Inventory,
      system:   String::new(),
      message:  message.to_owned(),
      headline: "총 3개 품목 | 보충 필요 1개".to_owned(),
    }
  }

  #[test]
  fn offline_greets_with_headline() {
    let text = OfflineAssistant.compose(&prompt("안녕하세요"));
    assert!(text.contains("재고관리 AI"));
    assert!(text.contains("보충 필요 1개"));
  }

  #[test]
  fn offline_help_shows_edit_example() {
    let text = OfflineAssistant.compose(&prompt("도움말"));
    assert!(text.contains("Protein Powder 재고 5개로 변경"));
  }

  #[test]
  fn missing_key_selects_offline() {
    assert!(matches!(Backend::from_config(None).unwrap(), Backend::Offline(_)));
    let blank = OpenAiConfig {
      api_key:  String::new(),
      model:    DEFAULT_MODEL.to_owned(),
      base_url: DEFAULT_BASE_URL.to_owned(),
    };
    assert!(matches!(Backend::from_config(Some(blank)).unwrap(), Backend::Offline(_)));
  }

  #[test]
  fn configured_key_selects_openai() {
    let config = OpenAiConfig {
      api_key:  "sk-test".to_owned(),
      model:    DEFAULT_MODEL.to_owned(),
      base_url: "http://localhost:9/v1/".to_owned(),
    };
    let backend = Backend::from_config(Some(config)).unwrap();
    assert_eq!(backend.describe(), "openai (gpt-4o-mini)");
    let Backend::OpenAi(a) = backend else { panic!("expected remote backend") };
    assert_eq!(a.url(), "http://localhost:9/v1/chat/completions");
  }

  #[tokio::test]
  async fn unreachable_endpoint_is_an_io_error() {
    use gym_core::{Classify, ErrorKind};

    let a = OpenAiAssistant::new(OpenAiConfig {
      api_key:  "sk-test".to_owned(),
      model:    DEFAULT_MODEL.to_owned(),
      base_url: "http://127.0.0.1:9/v1".to_owned(),
    })
    .unwrap();
    let err = a.reply(&prompt("재고 알려줘")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
  }
}

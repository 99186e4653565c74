//! One chat turn: edit intent first, assistant otherwise.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use gym_core::{
  Category,
  parse::Dataset,
  record::{HrRecord, InventoryItem, Member, StaffMember},
  store::{GymStore, WriteReport},
  update::FieldEdit,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{
  Error, Result,
  assistant::{Assistant, OfflineAssistant, Prompt},
  context::{Snapshot, TableData, is_list_request},
  intent,
  view::ChatView,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentInfo {
  pub name:   String,
  pub role:   String,
  pub status: &'static str,
}

impl AgentInfo {
  fn for_category(category: Category) -> Self {
    let label = category.file_label();
    Self {
      name:   format!("{label} AI"),
      role:   format!("{label} 전문가"),
      status: "online",
    }
  }
}

/// The answer to one chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
  pub message:    String,
  /// Korean label of the answering category, e.g. `회원관리`.
  pub agent_type: &'static str,
  pub timestamp:  DateTime<Utc>,
  pub agent_info: AgentInfo,
  /// Present when the message was applied as an edit.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub edit:       Option<WriteReport>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub table_data: Option<TableData>,
}

impl ChatReply {
  fn new(category: Category, message: String) -> Self {
    Self {
      message,
      agent_type: category.file_label(),
      timestamp: Utc::now(),
      agent_info: AgentInfo::for_category(category),
      edit: None,
      table_data: None,
    }
  }
}

pub struct ChatService<S, A> {
  store:     Arc<S>,
  assistant: A,
}

impl<S, A> ChatService<S, A>
where
  S: GymStore,
  A: Assistant,
{
  pub fn new(store: Arc<S>, assistant: A) -> Self { Self { store, assistant } }

  /// Answer `message` in the context of `category`.
  ///
  /// A message phrased as an edit is applied to the store and answered with
  /// the write's outcome; anything else goes to the assistant. Failures of
  /// either kind end up in the reply text.
  pub async fn handle(&self, category: Category, message: &str) -> Result<ChatReply> {
    let message = message.trim();
    if message.is_empty() {
      return Err(Error::EmptyMessage);
    }

    if let Some(edit) = intent::detect(category, message) {
      return Ok(self.apply(category, edit).await);
    }

    let snapshot = self.snapshot(category).await;
    let prompt = Prompt {
      category,
      system: snapshot.system_prompt(),
      message: message.to_owned(),
      headline: snapshot.headline.clone(),
    };

    let text = match self.assistant.reply(&prompt).await {
      Ok(text) => text,
      Err(err) => {
        warn!(%category, error = %err, "assistant failed, answering offline");
        format!(
          "⚠️ AI 응답을 받지 못해 저장된 데이터로 답변드립니다.\n\n{}",
          OfflineAssistant.compose(&prompt)
        )
      }
    };

    let mut reply = ChatReply::new(category, text);
    if is_list_request(message) {
      reply.table_data = Some(snapshot.table);
    }
    Ok(reply)
  }

  async fn apply(&self, category: Category, edit: FieldEdit) -> ChatReply {
    info!(%category, key = %edit.key, field = %edit.field, "edit requested from chat");
    let result = self.store.update_field(category, edit, None).await;
    let report = WriteReport::from_update(result);

    let text = if report.success {
      format!("✅ **수정 완료!**\n\n{}", report.message)
    } else {
      format!("❌ **수정 실패**\n\n{}", report.message)
    };
    let mut reply = ChatReply::new(category, text);
    reply.edit = Some(report);
    reply
  }

  async fn snapshot(&self, category: Category) -> Snapshot {
    match category {
      Category::Members => self.snapshot_of::<Member>().await,
      Category::Staff => self.snapshot_of::<StaffMember>().await,
      Category::Hr => self.snapshot_of::<HrRecord>().await,
      Category::Inventory => self.snapshot_of::<InventoryItem>().await,
    }
  }

  async fn snapshot_of<T: ChatView>(&self) -> Snapshot {
    let dataset = match self.store.read::<T>().await {
      Ok(dataset) => dataset,
      Err(err) => {
        let category = T::CATEGORY;
        warn!(%category, error = %err, "chat context without data");
        Dataset::degraded(err)
      }
    };
    Snapshot::of(&dataset)
  }
}

pub mod json;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An inbound message as handed over by an adapter. Arbitrary fields.
pub type MessageData = Map<String, Value>;

/// One recorded message. Appended once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEntry {
    /// ISO-8601 time the message was recorded.
    pub timestamp: String,
    pub message: MessageData,
}

impl MessageEntry {
    /// Stamp a message with the current local time.
    pub fn now(message: MessageData) -> Self {
        Self {
            timestamp: chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, false),
            message,
        }
    }
}

/// The whole persisted document. Conversations and message fields keep
/// insertion order.
///
/// ```json
/// { "conversations": { "<id>": [ { "timestamp": "...", "message": {} } ] },
///   "tasks": [], "preferences": {} }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(default)]
    pub conversations: IndexMap<String, Vec<MessageEntry>>,
    #[serde(default)]
    pub tasks: Vec<Value>,
    #[serde(default)]
    pub preferences: Map<String, Value>,
}

impl MemoryRecord {
    /// Append an entry under `conversation_id`, creating the list if absent.
    pub fn append(&mut self, conversation_id: &str, entry: MessageEntry) {
        self.conversations
            .entry(conversation_id.to_string())
            .or_default()
            .push(entry);
    }

    /// Total number of recorded messages across all conversations.
    pub fn message_count(&self) -> usize {
        self.conversations.values().map(Vec::len).sum()
    }
}

/// Where conversation history lives. A JSON file, SQLite, etc.
#[async_trait]
pub trait Memory: Send + Sync {
    /// Record `message` under `conversation_id`. Durable when this returns.
    async fn add_conversation(&self, conversation_id: &str, message: MessageData) -> Result<()>;

    /// Every entry recorded for `conversation_id`, oldest first.
    async fn conversation(&self, conversation_id: &str) -> Result<Vec<MessageEntry>>;

    /// A full snapshot of the persisted document.
    async fn record(&self) -> Result<MemoryRecord>;

    /// Flush the in-memory state to the backing storage.
    async fn save(&self) -> Result<()>;

    /// Discard in-memory state and read the backing storage again.
    async fn reload(&self) -> Result<()>;

    async fn set_preference(&self, key: &str, value: Value) -> Result<()>;

    async fn preference(&self, key: &str) -> Result<Option<Value>>;
}

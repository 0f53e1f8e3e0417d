use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::Engine;
use crate::adapters::Adapter;
use crate::adapters::console::ConsoleAdapter;
use crate::backends::{Backend, BackendRouter, simulated};
use crate::config::Settings;
use crate::consts::{CONSOLE_ADAPTER, CONTENT_FIELD, CONVERSATION_ID_FIELD, DEFAULT_CONVERSATION_ID};
use crate::memory::{Memory, MessageData};
use crate::scheduler::TaskScheduler;

/// Wires together a Memory, a TaskScheduler, a BackendRouter, and the
/// registered adapters.
///
/// A message is always recorded before it is routed, and routed before the
/// reply is delivered. If routing fails the record stays.
pub struct ChatEngine {
    memory: Box<dyn Memory>,
    scheduler: TaskScheduler,
    router: BackendRouter,
    adapters: RwLock<HashMap<String, Arc<dyn Adapter>>>,
}

impl ChatEngine {
    pub fn new(memory: Box<dyn Memory>) -> Self {
        Self {
            memory,
            scheduler: TaskScheduler::new(),
            router: BackendRouter::new(),
            adapters: RwLock::new(HashMap::new()),
        }
    }

    /// Open the configured memory and register the built-in backends and
    /// the console adapter.
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let engine = Self::new(settings.open_memory()?);
        for (name, backend) in simulated::available(settings.latency) {
            engine.register_backend(name, backend).await;
        }
        engine
            .register_adapter(CONSOLE_ADAPTER, Arc::new(ConsoleAdapter))
            .await;
        Ok(engine)
    }

    pub async fn register_adapter(&self, name: &str, adapter: Arc<dyn Adapter>) {
        self.adapters.write().await.insert(name.to_string(), adapter);
    }

    pub async fn register_backend(&self, name: &str, backend: Arc<dyn Backend>) {
        self.router.register(name, backend).await;
    }

    /// Registered adapter names, sorted.
    pub async fn adapter_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.adapters.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn memory(&self) -> &dyn Memory {
        self.memory.as_ref()
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    pub fn router(&self) -> &BackendRouter {
        &self.router
    }
}

/// A message field as text. Strings pass through; other non-null values
/// use their JSON rendering.
fn text_field(message: &MessageData, key: &str) -> Option<String> {
    match message.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl Engine for ChatEngine {
    async fn process_message_with(
        &self,
        adapter_name: &str,
        message: MessageData,
        backend: Option<&str>,
    ) -> Result<String> {
        let conversation_id = text_field(&message, CONVERSATION_ID_FIELD)
            .unwrap_or_else(|| DEFAULT_CONVERSATION_ID.to_string());
        let prompt = text_field(&message, CONTENT_FIELD).unwrap_or_default();

        self.memory.add_conversation(&conversation_id, message).await?;
        tracing::debug!(conversation_id = %conversation_id, adapter = adapter_name, "message recorded");

        let reply = self.router.route(&prompt, backend).await?;

        let adapter = self.adapters.read().await.get(adapter_name).cloned();
        match adapter {
            Some(adapter) => {
                adapter.send_response(&reply).await?;
                tracing::debug!(adapter = adapter_name, "reply delivered");
            }
            None => tracing::debug!(adapter = adapter_name, "no such adapter; delivery skipped"),
        }

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_field_variants() {
        let mut m = MessageData::new();
        m.insert("s".to_string(), json!("abc"));
        m.insert("n".to_string(), json!(7));
        m.insert("z".to_string(), Value::Null);

        assert_eq!(text_field(&m, "s").as_deref(), Some("abc"));
        assert_eq!(text_field(&m, "n").as_deref(), Some("7"));
        assert_eq!(text_field(&m, "z"), None);
        assert_eq!(text_field(&m, "missing"), None);
    }

    #[tokio::test]
    async fn adapter_names_sorted() {
        use crate::adapters::recording::RecordingAdapter;
        use crate::memory::sqlite::SqliteMemory;

        let engine = ChatEngine::new(Box::new(SqliteMemory::in_memory().unwrap()));
        engine
            .register_adapter("web", Arc::new(RecordingAdapter::new()))
            .await;
        engine
            .register_adapter("console", Arc::new(RecordingAdapter::new()))
            .await;
        assert_eq!(engine.adapter_names().await, vec!["console", "web"]);
    }

    #[tokio::test]
    async fn from_settings_registers_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            memory_path: Some(dir.path().join("memory.json")),
            ..Settings::default()
        };
        let engine = ChatEngine::from_settings(&settings).await.unwrap();

        assert_eq!(engine.router().default_backend().await.as_deref(), Some("qwen"));
        assert_eq!(engine.router().names().await, vec!["claude", "gemini", "qwen"]);
        assert_eq!(engine.adapter_names().await, vec!["console"]);
    }
}

pub mod chat;
pub mod handle;

use anyhow::Result;
use async_trait::async_trait;

use crate::memory::MessageData;

/// The outermost boundary. Adapters and front ends only know this trait.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Record `message`, route its content to `backend` (the default when
    /// `None`), and deliver the reply through `adapter_name` if registered.
    async fn process_message_with(
        &self,
        adapter_name: &str,
        message: MessageData,
        backend: Option<&str>,
    ) -> Result<String>;

    /// Same as [`Engine::process_message_with`] on the default backend.
    async fn process_message(&self, adapter_name: &str, message: MessageData) -> Result<String> {
        self.process_message_with(adapter_name, message, None).await
    }
}

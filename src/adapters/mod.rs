//! Channels that feed messages into the engine and receive its replies.

pub mod console;
pub mod recording;

use anyhow::Result;
use async_trait::async_trait;

use crate::consts::CONTENT_FIELD;
use crate::memory::MessageData;

/// An outbound channel. The engine hands it the backend's reply.
#[async_trait]
pub trait Adapter: Send + Sync {
    async fn send_response(&self, text: &str) -> Result<()>;

    /// Render an inbound message for display.
    fn format_message(&self, message: &MessageData) -> String {
        message
            .get(CONTENT_FIELD)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use super::Adapter;
use crate::consts::{CONTENT_FIELD, CONVERSATION_ID_FIELD};
use crate::memory::MessageData;

/// Prints replies to stdout.
pub struct ConsoleAdapter;

/// Build the message the console submits for a line of input.
pub fn console_message(content: &str, conversation_id: &str) -> MessageData {
    let mut message = MessageData::new();
    message.insert(CONTENT_FIELD.to_string(), json!(content));
    message.insert(CONVERSATION_ID_FIELD.to_string(), json!(conversation_id));
    message.insert("sender".to_string(), json!("user"));
    message
}

#[async_trait]
impl Adapter for ConsoleAdapter {
    async fn send_response(&self, text: &str) -> Result<()> {
        println!("\n=> {text}");
        Ok(())
    }

    fn format_message(&self, message: &MessageData) -> String {
        let content = message
            .get(CONTENT_FIELD)
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        format!("[Console] {content}")
    }
}

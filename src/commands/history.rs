use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::consts::CONTENT_FIELD;

pub struct HistoryCommand;

#[async_trait]
impl Command for HistoryCommand {
    fn name(&self) -> &str {
        "/history"
    }

    fn description(&self) -> &str {
        "show messages recorded in this conversation"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let entries = match info.engine.memory().conversation(info.conversation_id).await {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!("  ✗ failed to read history: {e}");
                return CommandResult::Handled;
            }
        };

        if entries.is_empty() {
            println!("  (no messages in {})", info.conversation_id);
            return CommandResult::Handled;
        }
        for entry in entries {
            let content = entry
                .message
                .get(CONTENT_FIELD)
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            println!("  {}  {}", entry.timestamp, content);
        }
        CommandResult::Handled
    }
}

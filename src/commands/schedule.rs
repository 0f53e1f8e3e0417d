use async_trait::async_trait;
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;

use super::{Command, CommandResult, SessionInfo};
use crate::adapters::console::console_message;
use crate::consts::CONSOLE_ADAPTER;
use crate::engine::Engine;

pub struct ScheduleCommand;

/// Split `<id> <secs> <text>`.
fn parse(args: &str) -> Option<(&str, Duration, &str)> {
    let mut parts = args.splitn(3, char::is_whitespace);
    let id = parts.next().filter(|s| !s.is_empty())?;
    let secs: u64 = parts.next()?.parse().ok()?;
    let text = parts.next().map(str::trim).filter(|s| !s.is_empty())?;
    Some((id, Duration::from_secs(secs), text))
}

#[async_trait]
impl Command for ScheduleCommand {
    fn name(&self) -> &str {
        "/schedule"
    }

    fn usage(&self) -> &str {
        "<id> <secs> <text>"
    }

    fn description(&self) -> &str {
        "send a message to the console after a delay"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let Some((id, delay, text)) = parse(args) else {
            println!("  usage: /schedule {}", self.usage());
            return CommandResult::Handled;
        };

        let engine = Arc::clone(info.engine);
        let message = console_message(text, info.conversation_id);
        let backend = info.backend.map(str::to_string);
        let task_id = id.to_string();
        let work = async move {
            if let Err(e) = engine
                .process_message_with(CONSOLE_ADAPTER, message, backend.as_deref())
                .await
            {
                tracing::warn!(task_id = %task_id, "scheduled message failed: {e}");
                eprintln!("\nerror: {e}");
            }
        }
        .boxed();

        info.engine.scheduler().schedule(id, work, delay);
        println!("  ✓ {id} fires in {}s", delay.as_secs());
        CommandResult::Handled
    }
}

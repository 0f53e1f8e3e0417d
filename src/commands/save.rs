use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

pub struct SaveCommand;

#[async_trait]
impl Command for SaveCommand {
    fn name(&self) -> &str {
        "/save"
    }

    fn aliases(&self) -> &[&str] {
        &["save"]
    }

    fn description(&self) -> &str {
        "write memory to disk"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        match info.engine.memory().save().await {
            Ok(()) => println!("  ✓ memory saved"),
            Err(e) => eprintln!("  ✗ failed to save memory: {e}"),
        }
        CommandResult::Handled
    }
}

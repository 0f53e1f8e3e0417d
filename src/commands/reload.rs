use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

pub struct ReloadCommand;

#[async_trait]
impl Command for ReloadCommand {
    fn name(&self) -> &str {
        "/reload"
    }

    fn description(&self) -> &str {
        "discard unsaved memory and read it from disk again"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        match info.engine.memory().reload().await {
            Ok(()) => println!("  ✓ memory reloaded"),
            Err(e) => eprintln!("  ✗ failed to reload memory: {e}"),
        }
        CommandResult::Handled
    }
}

use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

pub struct CancelCommand;

#[async_trait]
impl Command for CancelCommand {
    fn name(&self) -> &str {
        "/cancel"
    }

    fn usage(&self) -> &str {
        "<id>"
    }

    fn description(&self) -> &str {
        "cancel a scheduled task"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        if args.is_empty() {
            println!("  usage: /cancel <id>");
        } else if info.engine.scheduler().cancel(args) {
            println!("  ✓ cancelled {args}");
        } else {
            println!("  no task named {args}");
        }
        CommandResult::Handled
    }
}

use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

pub struct TasksCommand;

#[async_trait]
impl Command for TasksCommand {
    fn name(&self) -> &str {
        "/tasks"
    }

    fn aliases(&self) -> &[&str] {
        &["show_tasks"]
    }

    fn description(&self) -> &str {
        "list scheduled tasks, then clear finished ones"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let tasks = info.engine.scheduler().tasks();
        println!("  {} task(s)", tasks.len());
        for (id, state) in tasks {
            println!("  {id:<16} {state}");
        }
        let pruned = info.engine.scheduler().prune();
        if pruned > 0 {
            tracing::debug!(pruned, "fired tasks pruned");
        }
        CommandResult::Handled
    }
}

use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

pub struct BackendsCommand;

#[async_trait]
impl Command for BackendsCommand {
    fn name(&self) -> &str {
        "/backends"
    }

    fn description(&self) -> &str {
        "list registered backends"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let router = info.engine.router();
        let names = router.names().await;
        if names.is_empty() {
            println!("  (no backends registered)");
            return CommandResult::Handled;
        }

        let default = router.default_backend().await;
        let active = info.backend.map(str::to_string).or(default.clone());
        for name in &names {
            let mut marks = Vec::new();
            if Some(name) == default.as_ref() {
                marks.push("default");
            }
            if Some(name) == active.as_ref() {
                marks.push("active");
            }
            if marks.is_empty() {
                println!("  {name}");
            } else {
                println!("  {name} ({})", marks.join(", "));
            }
        }
        CommandResult::Handled
    }
}

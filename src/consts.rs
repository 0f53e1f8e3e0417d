//! Project-wide constants.

use std::path::PathBuf;

/// Default location of the JSON memory file.
pub const DEFAULT_MEMORY_PATH: &str = "./memory.json";

/// Conversation id used when a message does not carry one.
pub const DEFAULT_CONVERSATION_ID: &str = "default";

/// Conversation id for the interactive console session.
pub const CLI_CONVERSATION_ID: &str = "cli_session";

/// Adapter name the console registers under.
pub const CONSOLE_ADAPTER: &str = "console";

/// Message field holding the conversation id.
pub const CONVERSATION_ID_FIELD: &str = "conversation_id";

/// Message field holding the text forwarded to the backend.
pub const CONTENT_FIELD: &str = "content";

/// Request queue depth for [`EngineHandle`](crate::engine::handle::EngineHandle).
pub const DEFAULT_HANDLE_CAPACITY: usize = 32;

/// Default SQLite path: `~/.clawmini/clawmini.db`.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".clawmini")
        .join("clawmini.db")
}

//! Resolved runtime settings and the memory store they select.

use anyhow::Result;
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

use crate::consts::{CLI_CONVERSATION_ID, DEFAULT_MEMORY_PATH, default_db_path};
use crate::memory::Memory;
use crate::memory::json::JsonFileMemory;
use crate::memory::sqlite::SqliteMemory;

/// Which [`Memory`] implementation backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StoreKind {
    /// One JSON document, rewritten on every message.
    #[default]
    Json,
    /// SQLite, one row per message.
    Sqlite,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Json => write!(f, "json"),
            StoreKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub store: StoreKind,
    /// Overrides the store's default location.
    pub memory_path: Option<PathBuf>,
    /// Backend every console message is routed to. `None` uses the default.
    pub backend: Option<String>,
    /// Overrides the simulated backends' latency.
    pub latency: Option<Duration>,
    pub conversation_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            memory_path: None,
            backend: None,
            latency: None,
            conversation_id: CLI_CONVERSATION_ID.to_string(),
        }
    }
}

impl Settings {
    /// The file the selected store reads and writes.
    pub fn memory_path(&self) -> PathBuf {
        match (&self.memory_path, self.store) {
            (Some(path), _) => path.clone(),
            (None, StoreKind::Json) => PathBuf::from(DEFAULT_MEMORY_PATH),
            (None, StoreKind::Sqlite) => default_db_path(),
        }
    }

    pub fn open_memory(&self) -> Result<Box<dyn Memory>> {
        let path = self.memory_path();
        tracing::info!(store = %self.store, path = %path.display(), "opening memory");
        Ok(match self.store {
            StoreKind::Json => Box::new(JsonFileMemory::open(path)?),
            StoreKind::Sqlite => Box::new(SqliteMemory::open(&path)?),
        })
    }
}

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rusqlite::{Connection, params};
use serde_json::Value;

use super::{Memory, MemoryRecord, MessageData, MessageEntry};

/// SQLite-backed memory. One row per message, so an append is a single
/// insert instead of a full rewrite.
pub struct SqliteMemory {
    conn: Mutex<Connection>,
}

impl SqliteMemory {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open memory database {}", path.display()))?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS messages (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                conversation_id TEXT NOT NULL,
                timestamp       TEXT NOT NULL,
                message         TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_messages_conversation
                ON messages(conversation_id, id);
            CREATE TABLE IF NOT EXISTS preferences (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .context("failed to create memory tables")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn entry_from_row(timestamp: String, json: &str) -> Result<MessageEntry> {
    Ok(MessageEntry {
        timestamp,
        message: serde_json::from_str(json)?,
    })
}

#[async_trait]
impl Memory for SqliteMemory {
    async fn add_conversation(&self, conversation_id: &str, message: MessageData) -> Result<()> {
        let entry = MessageEntry::now(message);
        let json = serde_json::to_string(&entry.message)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO messages (conversation_id, timestamp, message) VALUES (?1, ?2, ?3)",
            params![conversation_id, entry.timestamp, json],
        )?;
        Ok(())
    }

    async fn conversation(&self, conversation_id: &str) -> Result<Vec<MessageEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT timestamp, message FROM messages WHERE conversation_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map([conversation_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(timestamp, json)| entry_from_row(timestamp, &json))
            .collect()
    }

    async fn record(&self) -> Result<MemoryRecord> {
        let conn = self.conn.lock().unwrap();
        let mut record = MemoryRecord::default();

        let mut stmt =
            conn.prepare("SELECT conversation_id, timestamp, message FROM messages ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        for (conversation_id, timestamp, json) in rows {
            record.append(&conversation_id, entry_from_row(timestamp, &json)?);
        }

        let mut stmt = conn.prepare("SELECT key, value FROM preferences ORDER BY key ASC")?;
        let prefs = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        for (key, json) in prefs {
            record.preferences.insert(key, serde_json::from_str(&json)?);
        }

        Ok(record)
    }

    // Every write is already committed.
    async fn save(&self) -> Result<()> {
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        Ok(())
    }

    async fn set_preference(&self, key: &str, value: Value) -> Result<()> {
        let json = serde_json::to_string(&value)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, json],
        )?;
        Ok(())
    }

    async fn preference(&self, key: &str) -> Result<Option<Value>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM preferences WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => {
                let json: String = row.get(0)?;
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(content: &str) -> MessageData {
        let mut m = MessageData::new();
        m.insert("content".to_string(), json!(content));
        m
    }

    #[tokio::test]
    async fn conversations_are_kept_apart() {
        let mem = SqliteMemory::in_memory().unwrap();
        mem.add_conversation("a", message("one")).await.unwrap();
        mem.add_conversation("b", message("two")).await.unwrap();
        mem.add_conversation("a", message("three")).await.unwrap();

        let a = mem.conversation("a").await.unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].message["content"], "one");
        assert_eq!(a[1].message["content"], "three");
        assert!(mem.conversation("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn record_assembles_full_document() {
        let mem = SqliteMemory::in_memory().unwrap();
        mem.add_conversation("a", message("one")).await.unwrap();
        mem.set_preference("theme", json!("dark")).await.unwrap();

        let record = mem.record().await.unwrap();
        assert_eq!(record.conversations["a"].len(), 1);
        assert_eq!(record.preferences["theme"], "dark");
        assert!(record.tasks.is_empty());
    }

    #[tokio::test]
    async fn preference_upserts() {
        let mem = SqliteMemory::in_memory().unwrap();
        assert!(mem.preference("theme").await.unwrap().is_none());
        mem.set_preference("theme", json!("dark")).await.unwrap();
        mem.set_preference("theme", json!("light")).await.unwrap();
        assert_eq!(mem.preference("theme").await.unwrap(), Some(json!("light")));
    }

    #[tokio::test]
    async fn persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("memory.db");

        {
            let mem = SqliteMemory::open(&path).unwrap();
            mem.add_conversation("t1", message("hi")).await.unwrap();
        }

        let mem = SqliteMemory::open(&path).unwrap();
        let entries = mem.conversation("t1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message["content"], "hi");
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::{Memory, MessageEntry, MemoryRecord, MessageData};

/// The whole record as one JSON file, rewritten on every mutation.
///
/// Appends cost O(total size). The lock is held across the write, so
/// appends from one process never interleave their read-modify-write.
pub struct JsonFileMemory {
    path: PathBuf,
    record: Mutex<MemoryRecord>,
}

impl JsonFileMemory {
    /// Load `path` if it exists, otherwise start from an empty record.
    /// Fails if the file exists but does not parse.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let record = load(&path)?;
        tracing::debug!(
            path = %path.display(),
            messages = record.message_count(),
            "memory loaded"
        );
        Ok(Self {
            path,
            record: Mutex::new(record),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn load(path: &Path) -> Result<MemoryRecord> {
    if !path.exists() {
        return Ok(MemoryRecord::default());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read memory file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse memory file {}", path.display()))
}

/// Write through a sibling temp file so a crash leaves the old file intact.
fn write(path: &Path, record: &MemoryRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl Memory for JsonFileMemory {
    async fn add_conversation(&self, conversation_id: &str, message: MessageData) -> Result<()> {
        let mut record = self.record.lock().unwrap();
        record.append(conversation_id, MessageEntry::now(message));
        write(&self.path, &record)
    }

    async fn conversation(&self, conversation_id: &str) -> Result<Vec<MessageEntry>> {
        let record = self.record.lock().unwrap();
        Ok(record
            .conversations
            .get(conversation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn record(&self) -> Result<MemoryRecord> {
        Ok(self.record.lock().unwrap().clone())
    }

    async fn save(&self) -> Result<()> {
        let record = self.record.lock().unwrap();
        write(&self.path, &record)
    }

    async fn reload(&self) -> Result<()> {
        let mut record = self.record.lock().unwrap();
        *record = load(&self.path)?;
        Ok(())
    }

    async fn set_preference(&self, key: &str, value: Value) -> Result<()> {
        let mut record = self.record.lock().unwrap();
        record.preferences.insert(key.to_string(), value);
        write(&self.path, &record)
    }

    async fn preference(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.record.lock().unwrap().preferences.get(key).cloned())
    }
}

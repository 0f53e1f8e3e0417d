use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use super::Adapter;

/// Keeps every delivered reply in order. For tests and embedding.
#[derive(Default)]
pub struct RecordingAdapter {
    delivered: Mutex<Vec<String>>,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<String> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Adapter for RecordingAdapter {
    async fn send_response(&self, text: &str) -> Result<()> {
        self.delivered.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

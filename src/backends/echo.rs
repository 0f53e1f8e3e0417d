use anyhow::Result;
use async_trait::async_trait;

use super::Backend;

/// Returns the prompt unchanged. Useful in tests.
pub struct EchoBackend;

#[async_trait]
impl Backend for EchoBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

pub mod echo;
pub mod simulated;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::RouterError;

/// Turns prompt text into response text. Stands in for an AI service.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Name → backend, plus an explicit default.
///
/// The first registration becomes the default. Later registrations never
/// move it; only [`BackendRouter::set_default`] does.
pub struct BackendRouter {
    backends: RwLock<HashMap<String, Arc<dyn Backend>>>,
    default: RwLock<Option<String>>,
}

impl Default for BackendRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendRouter {
    pub fn new() -> Self {
        Self {
            backends: RwLock::new(HashMap::new()),
            default: RwLock::new(None),
        }
    }

    /// Insert or overwrite `name`. Overwriting keeps the current default.
    pub async fn register(&self, name: &str, backend: Arc<dyn Backend>) {
        self.backends.write().await.insert(name.to_string(), backend);

        let mut default = self.default.write().await;
        if default.is_none() {
            tracing::debug!(backend = name, "default backend set");
            *default = Some(name.to_string());
        }
    }

    /// Point the default at an already registered backend.
    pub async fn set_default(&self, name: &str) -> Result<(), RouterError> {
        if !self.backends.read().await.contains_key(name) {
            return Err(RouterError::UnknownBackend {
                name: Some(name.to_string()),
            });
        }
        *self.default.write().await = Some(name.to_string());
        Ok(())
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.backends.read().await.contains_key(name)
    }

    pub async fn default_backend(&self) -> Option<String> {
        self.default.read().await.clone()
    }

    /// Registered names, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.backends.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Send `prompt` to `backend`, or to the default when `None`.
    ///
    /// Fails with [`RouterError::UnknownBackend`] if the name resolves to
    /// nothing. Backend errors are returned as-is.
    pub async fn route(&self, prompt: &str, backend: Option<&str>) -> Result<String> {
        let name = match backend {
            Some(name) => Some(name.to_string()),
            None => self.default_backend().await,
        };

        let resolved = {
            let backends = self.backends.read().await;
            name.as_deref().and_then(|n| backends.get(n)).cloned()
        };
        let Some(resolved) = resolved else {
            return Err(RouterError::UnknownBackend { name }.into());
        };

        tracing::debug!(backend = name.as_deref(), "routing prompt");
        resolved.complete(prompt).await
    }
}

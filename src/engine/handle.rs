//! Submit-and-await access to an engine running on a tokio runtime.
//!
//! Front ends that live on another thread (a GUI event loop, a blocking
//! stdin reader) send requests over an mpsc channel and wait on a oneshot
//! reply. Every request runs as its own task, so slow backends do not hold
//! up other requests.

use anyhow::{Result, anyhow};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::Engine;
use crate::memory::MessageData;

struct Request {
    adapter: String,
    message: MessageData,
    backend: Option<String>,
    reply: oneshot::Sender<Result<String>>,
}

/// Cloneable sender side. The serving task stops once every handle is dropped.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<Request>,
}

impl EngineHandle {
    /// Start serving `engine` on the current runtime.
    pub fn spawn(engine: Arc<dyn Engine>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Request>(capacity);

        let server = tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move {
                    let result = engine
                        .process_message_with(
                            &request.adapter,
                            request.message,
                            request.backend.as_deref(),
                        )
                        .await;
                    // The submitter may have given up waiting.
                    let _ = request.reply.send(result);
                });
            }
            tracing::debug!("engine handle closed");
        });

        (Self { tx }, server)
    }

    fn request(
        adapter: &str,
        message: MessageData,
        backend: Option<&str>,
    ) -> (Request, oneshot::Receiver<Result<String>>) {
        let (reply, rx) = oneshot::channel();
        let request = Request {
            adapter: adapter.to_string(),
            message,
            backend: backend.map(str::to_string),
            reply,
        };
        (request, rx)
    }

    /// Submit from async code and wait for the reply.
    pub async fn submit(
        &self,
        adapter: &str,
        message: MessageData,
        backend: Option<&str>,
    ) -> Result<String> {
        let (request, rx) = Self::request(adapter, message, backend);
        self.tx
            .send(request)
            .await
            .map_err(|_| anyhow!("engine is no longer running"))?;
        rx.await
            .map_err(|_| anyhow!("engine dropped the request"))?
    }

    /// Submit from a thread outside the runtime and block until the reply.
    /// Panics if called from within an async context.
    pub fn submit_blocking(
        &self,
        adapter: &str,
        message: MessageData,
        backend: Option<&str>,
    ) -> Result<String> {
        let (request, rx) = Self::request(adapter, message, backend);
        self.tx
            .blocking_send(request)
            .map_err(|_| anyhow!("engine is no longer running"))?;
        rx.blocking_recv()
            .map_err(|_| anyhow!("engine dropped the request"))?
    }
}

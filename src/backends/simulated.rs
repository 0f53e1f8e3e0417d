//! Canned stand-ins for real AI services.
//!
//! Each one sleeps for a fixed latency, then answers with one of a few
//! templates quoting the start of the prompt.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::Backend;

/// A response template: how many prompt characters to quote, and the text
/// around them (`{}` marks the quote).
type Template = (usize, &'static str);

const QWEN: &[Template] = &[
    (50, "Qwen: I received your message: '{}...' How can I help?"),
    (30, "Qwen analysis: '{}...' is a good question."),
    (20, "Qwen thinking: let me consider '{}...'."),
    (40, "Qwen answer: you asked about '{}...', here is what I know."),
];

const CLAUDE: &[Template] = &[
    (50, "Claude: thanks for sharing your thoughts on '{}...', it is worth exploring."),
    (30, "Claude analysis: from my perspective, '{}...' has several layers."),
    (20, "Claude thinking: I understand your interest in '{}...', let me explain."),
    (40, "Claude answer: regarding '{}...', here is my view."),
];

const GEMINI: &[Template] = &[
    (50, "Gemini: got your query about '{}...', working on it."),
    (30, "Gemini analysis: '{}...' is an interesting question."),
    (20, "Gemini thinking: on '{}...', I have a few insights."),
    (40, "Gemini answer: about '{}...', this is my advice."),
];

pub struct SimulatedBackend {
    templates: &'static [Template],
    latency: Duration,
}

impl SimulatedBackend {
    pub fn qwen() -> Self {
        Self {
            templates: QWEN,
            latency: Duration::from_millis(500),
        }
    }

    pub fn claude() -> Self {
        Self {
            templates: CLAUDE,
            latency: Duration::from_millis(700),
        }
    }

    pub fn gemini() -> Self {
        Self {
            templates: GEMINI,
            latency: Duration::from_millis(600),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

fn render((quote_len, template): Template, prompt: &str) -> String {
    let quoted: String = prompt.chars().take(quote_len).collect();
    template.replacen("{}", &quoted, 1)
}

#[async_trait]
impl Backend for SimulatedBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        tokio::time::sleep(self.latency).await;
        let pick = rand::random_range(0..self.templates.len());
        Ok(render(self.templates[pick], prompt))
    }
}

/// The built-in backends in registration order. The first one becomes the
/// router default. `latency` overrides every backend's delay.
pub fn available(latency: Option<Duration>) -> Vec<(&'static str, Arc<dyn Backend>)> {
    let backends = [
        ("qwen", SimulatedBackend::qwen()),
        ("claude", SimulatedBackend::claude()),
        ("gemini", SimulatedBackend::gemini()),
    ];
    backends
        .into_iter()
        .map(|(name, backend)| {
            let backend = match latency {
                Some(latency) => backend.with_latency(latency),
                None => backend,
            };
            (name, Arc::new(backend) as Arc<dyn Backend>)
        })
        .collect()
}

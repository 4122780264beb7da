use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

pub mod ollama;

/// Outcome of the readiness probe. Reachable-but-failing and timed-out are
/// distinct states; the probe only feeds the status banner and never gates a
/// generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Online,
    Error(String),
    TimedOut,
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Send one full prompt, get one raw completion back.
    async fn complete(&self, prompt: &str, debug: bool) -> Result<String>;

    async fn probe(&self) -> ProbeStatus;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(
    model: String,
    url: String,
    request_timeout: Duration,
    probe_timeout: Duration,
) -> DynProvider {
    Box::new(ollama::Ollama {
        model,
        url,
        request_timeout,
        probe_timeout,
    })
}

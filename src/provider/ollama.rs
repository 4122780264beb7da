use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ProbeStatus, Provider};
use crate::errors::CadError;

pub struct Ollama {
    pub model: String,
    pub url: String,
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl Provider for Ollama {
    async fn complete(&self, prompt: &str, debug: bool) -> Result<String> {
        let url = format!("{}/api/generate", self.url.trim_end_matches('/'));
        let client = Client::builder().timeout(self.request_timeout).build()?;
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            // Keep generation as deterministic as the backend allows.
            options: GenerateOptions { temperature: 0.1 },
        };

        if debug {
            eprintln!("debug/ollama: POST {}", url);
        }

        let resp = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("ollama request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("ollama read body failed")?;

        if debug {
            eprintln!("debug/ollama: raw body:\n{}\n", text);
        }

        if !status.is_success() {
            return Err(CadError::Provider(format!("ollama returned status {}: {}", status, text)).into());
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| CadError::Provider(format!("failed to parse ollama response: {e}")))?;
        Ok(parsed.response)
    }

    async fn probe(&self) -> ProbeStatus {
        let url = format!("{}/api/tags", self.url.trim_end_matches('/'));
        let client = match Client::builder().timeout(self.probe_timeout).build() {
            Ok(c) => c,
            Err(e) => return ProbeStatus::Error(e.to_string()),
        };
        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => ProbeStatus::Online,
            Ok(resp) => ProbeStatus::Error(format!("service returned status {}", resp.status())),
            Err(e) if e.is_timeout() => ProbeStatus::TimedOut,
            Err(e) => ProbeStatus::Error(e.to_string()),
        }
    }
}

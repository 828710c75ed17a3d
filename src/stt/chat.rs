use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

/// OpenAI-compatible chat completion client
///
/// Standalone utility (e.g. summarizing a saved transcript); not part
/// of the recording flow.
pub struct ChatClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Send a single-turn user prompt and return the generated text
    pub async fn complete(&self, prompt: &str, model: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        info!("Chat completion request (model={})", model);

        let body = serde_json::json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat API error {}: {}", status, body);
        }

        let json: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .context("Chat completion response had no message content")?;

        Ok(content.to_string())
    }
}

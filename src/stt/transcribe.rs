use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Speech-to-text backend
///
/// Implementations take an exported audio file and return plain
/// transcript text. The recording loop depends on this trait so tests
/// can substitute a scripted backend.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file
    ///
    /// `language` is a hint (e.g. "pt", "en"); `response_format` is the
    /// API response format ("text" or "json").
    async fn transcribe(&self, path: &Path, language: &str, response_format: &str)
        -> Result<String>;
}

/// OpenAI-compatible transcription API client
///
/// Uploads the audio file as multipart form data to
/// `{base_url}/audio/transcriptions` with bearer auth.
pub struct OpenAiTranscriber {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiTranscriber {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(
        &self,
        path: &Path,
        language: &str,
        response_format: &str,
    ) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read audio file: {}", path.display()))?;

        info!(
            "Transcribing {} ({} bytes, model={})",
            path.display(),
            bytes.len(),
            self.model
        );

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("audio/wav")
            .context("Invalid MIME type for audio upload")?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", language.to_string())
            .text("response_format", response_format.to_string());

        let url = format!(
            "{}/audio/transcriptions",
            self.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Transcription request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Transcription API error {}: {}", status, body);
        }

        if response_format == "json" {
            let json: serde_json::Value = response
                .json()
                .await
                .context("Failed to parse transcription response")?;
            Ok(json
                .get("text")
                .and_then(|t| t.as_str())
                .unwrap_or_default()
                .to_string())
        } else {
            // response_format=text returns the transcript as the raw body
            response
                .text()
                .await
                .context("Failed to read transcription response")
        }
    }
}

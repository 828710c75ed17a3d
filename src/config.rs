use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub stt: SttConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    pub recordings_path: String,
    pub frame_duration_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct SttConfig {
    /// API base URL (OpenAI-compatible)
    pub base_url: String,
    /// Transcription model
    pub model: String,
    /// Chat completion model (standalone summarize utility)
    pub chat_model: String,
    /// Language hint for transcription
    pub language: String,
    /// Transcription response format ("text" or "json")
    pub response_format: String,
    /// Seconds of stream time between transcription flushes
    pub flush_interval_secs: u64,
}

impl Config {
    /// Load configuration from an optional file over built-in defaults
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "meet-scribe")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 3030i64)?
            .set_default("audio.recordings_path", "recordings")?
            .set_default("audio.frame_duration_ms", 100i64)?
            .set_default("stt.base_url", "https://api.openai.com/v1")?
            .set_default("stt.model", "whisper-1")?
            .set_default("stt.chat_model", "gpt-4o-mini")?
            .set_default("stt.language", "pt")?
            .set_default("stt.response_format", "text")?
            .set_default("stt.flush_interval_secs", 15i64)?
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

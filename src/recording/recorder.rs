use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::audio::{write_wav, AudioFrame, RollingBuffer};
use crate::session::{SessionId, SessionStore};
use crate::stt::Transcriber;

/// Configuration for the recording loop
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Stream time between transcription flushes (default: 15 seconds)
    pub flush_interval: Duration,
    /// How long to wait for the next frame before idling
    pub frame_timeout: Duration,
    /// Idle backoff after an empty-queue timeout
    pub idle_backoff: Duration,
    /// Language hint passed to the transcription call
    pub language: String,
    /// Transcription response format ("text" or "json")
    pub response_format: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_secs(15),
            frame_timeout: Duration::from_secs(1),
            idle_backoff: Duration::from_millis(100),
            language: "pt".to_string(),
            response_format: "text".to_string(),
        }
    }
}

/// Summary of one completed recording
#[derive(Debug, Clone)]
pub struct RecordingOutcome {
    pub session_id: SessionId,
    pub frames_received: usize,
    pub flushes: usize,
    pub transcript: String,
    pub duration_ms: u64,
}

/// Buffers for one active recording, created from the first frame's format
struct SessionBuffers {
    /// Audio accumulated since the last transcription flush
    rolling: RollingBuffer,
    /// The whole session so far
    full: RollingBuffer,
}

/// The recording loop
///
/// Drains an audio source into a rolling buffer and the full-session
/// buffer, persists the session audio after every append, and flushes
/// the rolling buffer to the transcriber every `flush_interval` of
/// stream time. Transcription and file I/O errors abort the loop and
/// propagate to the caller.
pub struct Recorder {
    store: SessionStore,
    transcriber: Box<dyn Transcriber>,
    config: RecorderConfig,
}

impl Recorder {
    pub fn new(
        store: SessionStore,
        transcriber: Box<dyn Transcriber>,
        config: RecorderConfig,
    ) -> Self {
        Self {
            store,
            transcriber,
            config,
        }
    }

    /// Record one session from a frame receiver
    ///
    /// Runs until the sender side closes the channel (the audio source
    /// stopped). Empty-queue timeouts are transient: the loop idles
    /// briefly and retries, losing no frames. The rolling buffer is
    /// cleared only after a successful flush.
    pub async fn record(
        &self,
        mut frames: mpsc::Receiver<AudioFrame>,
    ) -> Result<RecordingOutcome> {
        let session_id = SessionId::now();
        self.store.create_session(session_id)?;

        info!("Recording session started: {}", session_id);

        let flush_interval_ms = self.config.flush_interval.as_millis() as u64;
        let mut buffers: Option<SessionBuffers> = None;
        let mut transcript = String::new();
        let mut last_flush_ms = 0u64;
        let mut frames_received = 0usize;
        let mut flushes = 0usize;

        loop {
            let frame = match timeout(self.config.frame_timeout, frames.recv()).await {
                Ok(Some(frame)) => frame,
                // Channel closed: the audio source stopped
                Ok(None) => break,
                // Empty queue: idle briefly and retry
                Err(_) => {
                    tokio::time::sleep(self.config.idle_backoff).await;
                    continue;
                }
            };

            frames_received += 1;

            let buffers = buffers.get_or_insert_with(|| SessionBuffers {
                rolling: RollingBuffer::new(frame.sample_rate, frame.channels),
                full: RollingBuffer::new(frame.sample_rate, frame.channels),
            });

            buffers.rolling.append(&frame);
            buffers.full.append(&frame);

            // Persist the full session after every non-empty append
            if !buffers.full.is_empty() {
                write_wav(
                    self.store.audio_path(session_id),
                    buffers.full.samples(),
                    buffers.full.sample_rate(),
                    buffers.full.channels(),
                )
                .context("Failed to persist session audio")?;
            }

            // Flush the rolling buffer once enough stream time has passed
            if frame.timestamp_ms - last_flush_ms > flush_interval_ms {
                last_flush_ms = frame.timestamp_ms;

                let chunk = self
                    .flush(session_id, &buffers.rolling)
                    .await
                    .context("Transcription flush failed")?;

                transcript.push_str(&chunk);
                self.store.write_transcript(session_id, &transcript)?;
                buffers.rolling.clear();
                flushes += 1;

                info!(
                    "Flush {} complete at {:.1}s ({} chars total)",
                    flushes,
                    frame.timestamp_ms as f64 / 1000.0,
                    transcript.len()
                );
            }
        }

        let duration_ms = buffers.as_ref().map(|b| b.full.duration_ms()).unwrap_or(0);

        if let Some(buffers) = &buffers {
            if !buffers.rolling.is_empty() {
                warn!(
                    "Session {} ended with {:.1}s of audio after the last flush",
                    session_id,
                    buffers.rolling.duration_ms() as f64 / 1000.0
                );
            }
        }

        info!(
            "Recording session complete: {} ({} frames, {} flushes, {:.1}s)",
            session_id,
            frames_received,
            flushes,
            duration_ms as f64 / 1000.0
        );

        Ok(RecordingOutcome {
            session_id,
            frames_received,
            flushes,
            transcript,
            duration_ms,
        })
    }

    /// Export the rolling buffer to the transient audio file and submit
    /// it for transcription
    async fn flush(&self, session_id: SessionId, rolling: &RollingBuffer) -> Result<String> {
        let temp_path = self.store.audio_temp_path(session_id);

        write_wav(
            &temp_path,
            rolling.samples(),
            rolling.sample_rate(),
            rolling.channels(),
        )
        .context("Failed to export rolling buffer")?;

        self.transcriber
            .transcribe(&temp_path, &self.config.language, &self.config.response_format)
            .await
    }
}

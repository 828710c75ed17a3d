use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use super::file::AudioFile;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since recording started
    pub timestamp_ms: u64,
}

/// Configuration for audio sources
#[derive(Debug, Clone)]
pub struct AudioSourceConfig {
    /// Duration of each emitted frame in milliseconds
    pub frame_duration_ms: u64,
    /// Capacity of the frame channel
    pub channel_capacity: usize,
}

impl Default for AudioSourceConfig {
    fn default() -> Self {
        Self {
            frame_duration_ms: 100, // 100ms frames
            channel_capacity: 1024,
        }
    }
}

/// Audio frame source trait
///
/// Implementations deliver PCM frames over a channel. The shipped
/// implementation reads from a WAV file; live capture backends
/// (microphone, system audio) would implement the same contract.
#[async_trait::async_trait]
pub trait AudioSource: Send + Sync {
    /// Start producing audio
    ///
    /// Returns a channel receiver that will receive audio frames.
    /// The channel closes when the source is exhausted or stopped.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop producing audio
    async fn stop(&mut self) -> Result<()>;

    /// Check if the source is currently producing frames
    fn is_active(&self) -> bool;

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Audio source that streams a WAV file as fixed-duration frames
///
/// Used for batch transcription of existing recordings and for tests.
pub struct WavFileSource {
    path: PathBuf,
    config: AudioSourceConfig,
    task: Option<JoinHandle<()>>,
}

impl WavFileSource {
    pub fn new(path: impl Into<PathBuf>, config: AudioSourceConfig) -> Self {
        Self {
            path: path.into(),
            config,
            task: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioSource for WavFileSource {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let audio = AudioFile::open(&self.path)
            .with_context(|| format!("Failed to open audio source: {}", self.path.display()))?;

        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        let frame_duration_ms = self.config.frame_duration_ms;

        info!(
            "WAV file source started: {} ({:.1}s, {} Hz, {} ch)",
            self.path.display(),
            audio.duration_seconds,
            audio.sample_rate,
            audio.channels
        );

        let task = tokio::spawn(async move {
            let samples_per_frame = (audio.sample_rate as u64 * frame_duration_ms / 1000)
                .max(1) as usize
                * audio.channels as usize;

            let mut timestamp_ms = 0u64;
            for chunk in audio.samples.chunks(samples_per_frame) {
                let frame = AudioFrame {
                    samples: chunk.to_vec(),
                    sample_rate: audio.sample_rate,
                    channels: audio.channels,
                    timestamp_ms,
                };

                // Receiver dropped means the consumer stopped
                if tx.send(frame).await.is_err() {
                    break;
                }

                timestamp_ms += frame_duration_ms;
            }
            // Channel closes on drop, signaling end of stream
        });

        self.task = Some(task);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    fn name(&self) -> &str {
        "wav-file"
    }
}

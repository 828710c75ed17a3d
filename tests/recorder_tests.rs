// Integration tests for the recording loop
//
// Frames carry stream timestamps, so flush timing is exercised without
// wall-clock waits: a "40 second" recording is 400 frames of 100ms.

use anyhow::Result;
use meet_scribe::audio::{AudioFile, AudioFrame};
use meet_scribe::recording::{Recorder, RecorderConfig};
use meet_scribe::session::SessionStore;
use meet_scribe::stt::Transcriber;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Returns pre-scripted transcript chunks and records each call
#[derive(Clone, Default)]
struct ScriptedTranscriber {
    chunks: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl ScriptedTranscriber {
    fn new(chunks: &[&str]) -> Self {
        Self {
            chunks: Arc::new(Mutex::new(chunks.iter().map(|s| s.to_string()).collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(
        &self,
        path: &Path,
        _language: &str,
        _response_format: &str,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        Ok(self.chunks.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// Always fails, standing in for an unreachable API
struct FailingTranscriber;

#[async_trait::async_trait]
impl Transcriber for FailingTranscriber {
    async fn transcribe(
        &self,
        _path: &Path,
        _language: &str,
        _response_format: &str,
    ) -> Result<String> {
        anyhow::bail!("transcription service unavailable")
    }
}

fn frame(index: u64) -> AudioFrame {
    AudioFrame {
        samples: vec![(index % 100) as i16; 1600], // 100ms at 16kHz mono
        sample_rate: 16000,
        channels: 1,
        timestamp_ms: index * 100,
    }
}

fn recorder(store: &SessionStore, transcriber: Box<dyn Transcriber>) -> Recorder {
    Recorder::new(store.clone(), transcriber, RecorderConfig::default())
}

#[tokio::test]
async fn test_forty_seconds_triggers_two_flushes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());
    let transcriber = ScriptedTranscriber::new(&["first chunk ", "second chunk "]);

    let (tx, rx) = mpsc::channel(1024);
    for i in 0..400 {
        tx.send(frame(i)).await?;
    }
    drop(tx);

    let outcome = recorder(&store, Box::new(transcriber.clone()))
        .record(rx)
        .await?;

    assert_eq!(outcome.frames_received, 400);
    assert_eq!(outcome.flushes, 2, "~15s and ~30s flushes");
    assert_eq!(transcriber.call_count(), 2);

    // Transcript is the concatenation of the returned chunks, in order
    assert_eq!(outcome.transcript, "first chunk second chunk ");
    assert_eq!(
        store.load_transcript(outcome.session_id)?,
        "first chunk second chunk "
    );

    // The full session audio survives every flush
    let audio = AudioFile::open(store.audio_path(outcome.session_id))?;
    assert!((audio.duration_seconds - 40.0).abs() < 0.1);

    Ok(())
}

#[tokio::test]
async fn test_rolling_buffer_cleared_by_flush() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());
    let transcriber = ScriptedTranscriber::new(&["a", "b"]);

    let (tx, rx) = mpsc::channel(1024);
    for i in 0..400 {
        tx.send(frame(i)).await?;
    }
    drop(tx);

    let outcome = recorder(&store, Box::new(transcriber))
        .record(rx)
        .await?;

    // The transient export holds only the audio since the previous
    // flush, so the second window is ~15s, not ~30s
    let temp_audio = AudioFile::open(store.audio_temp_path(outcome.session_id))?;
    assert!(
        temp_audio.duration_seconds > 14.0 && temp_audio.duration_seconds < 16.5,
        "Second flush window should be ~15s, got {:.1}s",
        temp_audio.duration_seconds
    );

    Ok(())
}

#[tokio::test]
async fn test_short_recording_never_flushes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());
    let transcriber = ScriptedTranscriber::new(&["unused"]);

    let (tx, rx) = mpsc::channel(256);
    for i in 0..50 {
        // 5 seconds, under the 15s flush interval
        tx.send(frame(i)).await?;
    }
    drop(tx);

    let outcome = recorder(&store, Box::new(transcriber.clone()))
        .record(rx)
        .await?;

    assert_eq!(outcome.flushes, 0);
    assert_eq!(transcriber.call_count(), 0);
    assert_eq!(outcome.transcript, "");
    assert_eq!(store.load_transcript(outcome.session_id)?, "");

    // Audio is still persisted even without a flush
    let audio = AudioFile::open(store.audio_path(outcome.session_id))?;
    assert!((audio.duration_seconds - 5.0).abs() < 0.1);

    Ok(())
}

#[tokio::test]
async fn test_frame_gaps_lose_no_audio() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());
    let transcriber = ScriptedTranscriber::new(&[]);

    let config = RecorderConfig {
        frame_timeout: Duration::from_millis(50),
        idle_backoff: Duration::from_millis(10),
        ..RecorderConfig::default()
    };
    let recorder = Recorder::new(store.clone(), Box::new(transcriber), config);

    let (tx, rx) = mpsc::channel(16);

    // Deliver frames with real gaps exceeding the frame timeout, forcing
    // idle/retry cycles between receipts
    let sender = tokio::spawn(async move {
        for i in 0..5u64 {
            tokio::time::sleep(Duration::from_millis(120)).await;
            if tx.send(frame(i)).await.is_err() {
                break;
            }
        }
    });

    let outcome = recorder.record(rx).await?;
    sender.await?;

    assert_eq!(outcome.frames_received, 5, "No frame lost across idle cycles");

    let audio = AudioFile::open(store.audio_path(outcome.session_id))?;
    assert_eq!(audio.samples.len(), 5 * 1600);

    Ok(())
}

#[tokio::test]
async fn test_empty_source_records_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());
    let transcriber = ScriptedTranscriber::new(&[]);

    let (tx, rx) = mpsc::channel::<AudioFrame>(16);
    drop(tx);

    let outcome = recorder(&store, Box::new(transcriber))
        .record(rx)
        .await?;

    assert_eq!(outcome.frames_received, 0);
    assert_eq!(outcome.flushes, 0);
    assert_eq!(outcome.duration_ms, 0);

    // The session directory exists, but no audio was ever appended
    assert!(store.exists(outcome.session_id));
    assert!(!store.audio_path(outcome.session_id).exists());

    Ok(())
}

#[tokio::test]
async fn test_transcription_failure_aborts_loop() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let store = SessionStore::new(temp_dir.path());

    let (tx, rx) = mpsc::channel(1024);
    for i in 0..200 {
        // 20 seconds: enough to attempt one flush
        tx.send(frame(i)).await?;
    }
    drop(tx);

    let result = recorder(&store, Box::new(FailingTranscriber))
        .record(rx)
        .await;

    assert!(result.is_err(), "Transcription failure should abort recording");

    Ok(())
}

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::id::SessionId;

/// Full-session audio artifact, rewritten on each append
pub const AUDIO_FILE: &str = "audio.wav";
/// Transient rolling-buffer export submitted for transcription
pub const AUDIO_TEMP_FILE: &str = "audio_temp.wav";
/// Accumulated transcript, persisted whole after each flush
pub const TRANSCRIPT_FILE: &str = "transcript.txt";
/// Optional write-once title
pub const TITLE_FILE: &str = "titulo.txt";

/// A saved session as listed by the browser
#[derive(Debug, Clone, Serialize)]
pub struct SessionEntry {
    /// Session id (directory name)
    pub id: String,
    /// Human-readable capture timestamp
    pub label: String,
    /// Whether a title has been saved
    pub has_title: bool,
    /// The saved title, if any
    pub title: Option<String>,
}

/// Filesystem store for recorded sessions
///
/// One directory per session under the recordings root, named by the
/// session's capture timestamp. Artifacts inside a session directory
/// are independent files; no index is kept beyond the naming scheme.
#[derive(Debug, Clone)]
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn session_dir(&self, id: SessionId) -> PathBuf {
        self.root.join(id.dir_name())
    }

    pub fn audio_path(&self, id: SessionId) -> PathBuf {
        self.session_dir(id).join(AUDIO_FILE)
    }

    pub fn audio_temp_path(&self, id: SessionId) -> PathBuf {
        self.session_dir(id).join(AUDIO_TEMP_FILE)
    }

    pub fn transcript_path(&self, id: SessionId) -> PathBuf {
        self.session_dir(id).join(TRANSCRIPT_FILE)
    }

    pub fn title_path(&self, id: SessionId) -> PathBuf {
        self.session_dir(id).join(TITLE_FILE)
    }

    pub fn exists(&self, id: SessionId) -> bool {
        self.session_dir(id).is_dir()
    }

    /// Create the directory for a new session
    pub fn create_session(&self, id: SessionId) -> Result<PathBuf> {
        let dir = self.session_dir(id);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create session directory: {}", dir.display()))?;
        info!("Session directory created: {}", dir.display());
        Ok(dir)
    }

    /// List saved sessions, newest first
    ///
    /// Directory names that do not parse as session timestamps are
    /// skipped with a warning.
    pub fn list(&self) -> Result<Vec<SessionEntry>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<SessionId> = Vec::new();

        for entry in fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read recordings root: {}", self.root.display()))?
        {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }

            let name = entry.file_name();
            let name = name.to_string_lossy();
            match name.parse::<SessionId>() {
                Ok(id) => ids.push(id),
                Err(_) => {
                    warn!("Skipping malformed session directory: {}", name);
                }
            }
        }

        ids.sort_unstable_by(|a, b| b.cmp(a));

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let title = self.load_title(id)?;
            entries.push(SessionEntry {
                id: id.dir_name(),
                label: id.label(),
                has_title: title.is_some(),
                title,
            });
        }

        Ok(entries)
    }

    /// Load a session's title, if one has been saved
    pub fn load_title(&self, id: SessionId) -> Result<Option<String>> {
        let path = self.title_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let title = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read title: {}", path.display()))?;
        Ok(Some(title))
    }

    /// Load a session's transcript (empty if none has been written yet)
    pub fn load_transcript(&self, id: SessionId) -> Result<String> {
        let path = self.transcript_path(id);
        if !path.exists() {
            return Ok(String::new());
        }
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read transcript: {}", path.display()))
    }

    /// Persist the accumulated transcript, replacing the previous file
    pub fn write_transcript(&self, id: SessionId, transcript: &str) -> Result<()> {
        let path = self.transcript_path(id);
        fs::write(&path, transcript)
            .with_context(|| format!("Failed to write transcript: {}", path.display()))
    }

    /// Save a session's title
    ///
    /// Titles are write-once: a session is immutable after recording
    /// except for this one-time addition.
    pub fn save_title(&self, id: SessionId, title: &str) -> Result<()> {
        if !self.exists(id) {
            anyhow::bail!("Session {} not found", id);
        }

        let path = self.title_path(id);
        if path.exists() {
            anyhow::bail!("Session {} already has a title", id);
        }

        fs::write(&path, title)
            .with_context(|| format!("Failed to write title: {}", path.display()))?;

        info!("Title saved for session {}", id);
        Ok(())
    }
}

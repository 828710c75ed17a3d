//! Saved-session identity and storage
//!
//! Sessions are keyed by their capture timestamp, which doubles as the
//! directory name under the recordings root. Each directory holds the
//! session's audio, transcript, and optional title as independent files.

mod id;
mod store;

pub use id::SessionId;
pub use store::{
    SessionEntry, SessionStore, AUDIO_FILE, AUDIO_TEMP_FILE, TITLE_FILE, TRANSCRIPT_FILE,
};

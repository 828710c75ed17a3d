pub mod audio;
pub mod config;
pub mod http;
pub mod recording;
pub mod session;
pub mod stt;

pub use audio::{
    write_wav, AudioFile, AudioFrame, AudioSource, AudioSourceConfig, RollingBuffer, WavFileSource,
};
pub use config::Config;
pub use http::{create_router, AppState};
pub use recording::{Recorder, RecorderConfig, RecordingOutcome};
pub use session::{SessionEntry, SessionId, SessionStore};
pub use stt::{ChatClient, OpenAiTranscriber, Transcriber};

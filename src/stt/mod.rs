//! Hosted speech-to-text and chat completion clients

mod chat;
mod transcribe;

pub use chat::ChatClient;
pub use transcribe::{OpenAiTranscriber, Transcriber};

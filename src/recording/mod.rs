//! The recording loop
//!
//! Drains audio frames into a rolling buffer, persists session audio
//! incrementally, and flushes the buffer to the transcriber on a fixed
//! stream-time interval.

mod recorder;

pub use recorder::{Recorder, RecorderConfig, RecordingOutcome};

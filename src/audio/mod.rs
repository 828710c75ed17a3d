pub mod buffer;
pub mod file;
pub mod source;

pub use buffer::RollingBuffer;
pub use file::{write_wav, AudioFile};
pub use source::{AudioFrame, AudioSource, AudioSourceConfig, WavFileSource};

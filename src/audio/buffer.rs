use super::source::AudioFrame;

/// Append-only accumulation of PCM samples between transcription flushes
///
/// The recording loop appends every received frame and clears the buffer
/// only after a successful flush, so no audio is lost across idle cycles.
#[derive(Debug, Clone)]
pub struct RollingBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl RollingBuffer {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            channels,
        }
    }

    /// Append a frame's samples to the buffer
    pub fn append(&mut self, frame: &AudioFrame) {
        self.samples.extend_from_slice(&frame.samples);
    }

    /// Clear accumulated samples (called after a successful flush)
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Buffered audio duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        let frames = self.samples.len() as u64 / self.channels as u64;
        frames * 1000 / self.sample_rate as u64
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(samples: Vec<i16>, timestamp_ms: u64) -> AudioFrame {
        AudioFrame {
            samples,
            sample_rate: 16000,
            channels: 1,
            timestamp_ms,
        }
    }

    #[test]
    fn test_append_accumulates_across_frames() {
        let mut buffer = RollingBuffer::new(16000, 1);
        buffer.append(&frame(vec![1, 2, 3], 0));
        buffer.append(&frame(vec![4, 5], 100));

        assert_eq!(buffer.samples(), &[1, 2, 3, 4, 5]);
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn test_clear_resets_to_empty() {
        let mut buffer = RollingBuffer::new(16000, 1);
        buffer.append(&frame(vec![1; 1600], 0));
        assert!(!buffer.is_empty());

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.duration_ms(), 0);
    }

    #[test]
    fn test_duration_accounts_for_channels() {
        // 1 second of 16kHz mono
        let mut mono = RollingBuffer::new(16000, 1);
        mono.append(&frame(vec![0; 16000], 0));
        assert_eq!(mono.duration_ms(), 1000);

        // Same sample count in stereo is half the duration
        let mut stereo = RollingBuffer::new(16000, 2);
        stereo.append(&AudioFrame {
            samples: vec![0; 16000],
            sample_rate: 16000,
            channels: 2,
            timestamp_ms: 0,
        });
        assert_eq!(stereo.duration_ms(), 500);
    }
}

use serde::{Deserialize, Serialize};

/// Error code reported by the codec library.
pub type CodecCode = i32;

/// Encoder tuning profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Application {
    /// Speech: favours latency and bitrate efficiency.
    Voip,
    Audio,
    LowDelay,
}

/// A live encoder handle. Dropping it destroys the handle.
pub trait Encoder: Send {
    /// Encode `frame_size` samples from `pcm` into `output`.
    ///
    /// Returns the number of bytes written, or a negative codec error code.
    /// The encoder may read at most `frame_size` samples and write at most
    /// `output.len()` bytes.
    fn encode(&mut self, pcm: &[i16], frame_size: usize, output: &mut [u8]) -> i32;
}

/// Creates encoders for capture sessions.
pub trait EncoderFactory: Send + Sync + 'static {
    fn create(
        &self,
        rate_hz: u32,
        channels: u8,
        application: Application,
    ) -> Result<Box<dyn Encoder>, CodecCode>;
}

use serde::{Deserialize, Serialize};

/// Sampling rates supported by the microphone peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplingRate {
    #[serde(rename = "8k")]
    Khz8,
    #[serde(rename = "12k")]
    Khz12,
    #[serde(rename = "16k")]
    Khz16,
    #[serde(rename = "24k")]
    Khz24,
    #[serde(rename = "48k")]
    Khz48,
}

impl SamplingRate {
    pub fn hz(self) -> u32 {
        match self {
            Self::Khz8 => 8000,
            Self::Khz12 => 12000,
            Self::Khz16 => 16000,
            Self::Khz24 => 24000,
            Self::Khz48 => 48000,
        }
    }

    /// Maps a raw rate code (`0..=4`, in ascending rate order) to a rate.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Khz8),
            1 => Some(Self::Khz12),
            2 => Some(Self::Khz16),
            3 => Some(Self::Khz24),
            4 => Some(Self::Khz48),
            _ => None,
        }
    }
}

/// Returns the rate in Hz for a raw rate code, or 0 for unknown codes.
pub fn get_sampling_rate_hz(raw: u8) -> u32 {
    SamplingRate::from_raw(raw).map(SamplingRate::hz).unwrap_or(0)
}

/// Output encoding of captured frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Pcm8,
    Pcm16,
    Opus,
}

impl Encoding {
    /// Bytes per acquired sample. Opus consumes 16-bit PCM.
    pub fn sample_size(self) -> usize {
        match self {
            Self::Pcm8 => 1,
            Self::Pcm16 | Self::Opus => 2,
        }
    }
}

/// Parameters of a single capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub sampling_rate: SamplingRate,
    pub encoding: Encoding,

    /// Samples per acquired block.
    pub frame_size: u16,

    /// Downstream backlog hint. Not consulted by the sampling pipeline.
    pub frame_backlog: u8,
}

impl CaptureConfig {
    pub fn new(
        sampling_rate: SamplingRate,
        encoding: Encoding,
        frame_size: u16,
        frame_backlog: u8,
    ) -> Self {
        Self {
            sampling_rate,
            encoding,
            frame_size,
            frame_backlog,
        }
    }

    pub fn sample_size(&self) -> usize {
        self.encoding.sample_size()
    }

    /// Size in bytes of one raw acquisition block.
    pub fn buffer_size(&self) -> usize {
        self.sample_size() * self.frame_size as usize
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.frame_size == 0 {
            return Err("frame size must be positive".into());
        }
        Ok(())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sampling_rate: SamplingRate::Khz16,
            encoding: Encoding::Pcm16,
            frame_size: 320,
            frame_backlog: 4,
        }
    }
}

use serde::{Deserialize, Serialize};

use super::error::CaptureError;

/// Base clock the peripheral is installed with before the session rate is applied.
pub const BASE_SAMPLE_RATE_HZ: u32 = 48000;

/// Sample width requested from the peripheral. Narrower encodings are
/// produced by the peripheral, not by the clock setting.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Peripheral operating mode flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeripheralMode {
    pub master: bool,
    pub receive: bool,
    pub pdm: bool,
}

/// Slot layout of samples on the serial bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelFormat {
    RightLeft,
    AllRight,
    AllLeft,
    OnlyRight,
    OnlyLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommFormat {
    Standard,
    Pcm,
}

/// Channel mode applied together with the session clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    Mono,
    Stereo,
}

/// GPIO assignment of the microphone bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    /// Word-select (PDM clock) pin.
    pub ws_io_num: u8,
    pub data_in_num: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            ws_io_num: 25,
            data_in_num: 35,
        }
    }
}

/// Peripheral configuration recorded once by `MicCapture::init`.
///
/// Recording it performs no I/O; the peripheral only sees these values when a
/// session is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareConfig {
    pub mode: PeripheralMode,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub channel_format: ChannelFormat,
    pub communication_format: CommFormat,
    pub dma_buf_count: u8,
    pub dma_buf_len: u16,
    pub use_apll: bool,
    pub pins: PinConfig,
}

impl HardwareConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.mode.receive {
            return Err("microphone peripheral must be in receive mode".into());
        }
        if self.sample_rate == 0 {
            return Err("base sample rate must be positive".into());
        }
        if ![8, 16, 24, 32].contains(&self.bits_per_sample) {
            return Err(format!("unsupported bits per sample: {}", self.bits_per_sample));
        }
        if self.dma_buf_count < 2 || self.dma_buf_len == 0 {
            return Err(format!(
                "invalid DMA layout: {} buffers of {} samples",
                self.dma_buf_count, self.dma_buf_len
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, CaptureError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            CaptureError::ConfigurationFailed(format!("failed to parse hardware config: {}", e))
        })?;
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, CaptureError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            CaptureError::ConfigurationFailed(format!("failed to serialize hardware config: {}", e))
        })
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            mode: PeripheralMode {
                master: true,
                receive: true,
                pdm: true,
            },
            sample_rate: BASE_SAMPLE_RATE_HZ,
            bits_per_sample: BITS_PER_SAMPLE,
            channel_format: ChannelFormat::RightLeft,
            communication_format: CommFormat::Pcm,
            dma_buf_count: 2,
            dma_buf_len: 8,
            use_apll: false,
            pins: PinConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_pdm_microphone() {
        let config = HardwareConfig::default();
        assert!(config.mode.master && config.mode.receive && config.mode.pdm);
        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.channel_format, ChannelFormat::RightLeft);
        assert_eq!(config.pins.ws_io_num, 25);
        assert_eq!(config.pins.data_in_num, 35);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_round_trip_keeps_defaults() {
        let json = HardwareConfig::default().to_json().unwrap();
        assert_eq!(HardwareConfig::from_json(&json).unwrap(), HardwareConfig::default());
    }

    #[test]
    fn transmit_only_config_is_rejected() {
        let mut config = HardwareConfig::default();
        config.mode.receive = false;
        let json = serde_json::to_string(&config).unwrap();
        assert!(matches!(
            HardwareConfig::from_json(&json),
            Err(CaptureError::ConfigurationFailed(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_configuration_error() {
        assert!(matches!(
            HardwareConfig::from_json("{ not json"),
            Err(CaptureError::ConfigurationFailed(_))
        ));
    }
}

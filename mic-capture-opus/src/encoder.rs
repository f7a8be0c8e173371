//! Opus encoder over `libopus_sys`.

use mic_capture_core::{Application, CodecCode, Encoder, EncoderFactory};

/// `OPUS_APPLICATION_VOIP` in opus_defines.h.
const OPUS_APPLICATION_VOIP: i32 = 2048;
/// `OPUS_APPLICATION_AUDIO` in opus_defines.h.
const OPUS_APPLICATION_AUDIO: i32 = 2049;
/// `OPUS_APPLICATION_RESTRICTED_LOWDELAY` in opus_defines.h.
const OPUS_APPLICATION_RESTRICTED_LOWDELAY: i32 = 2051;

/// `OPUS_BAD_ARG` in opus_defines.h.
pub const OPUS_BAD_ARG: i32 = -1;

fn application_code(application: Application) -> i32 {
    match application {
        Application::Voip => OPUS_APPLICATION_VOIP,
        Application::Audio => OPUS_APPLICATION_AUDIO,
        Application::LowDelay => OPUS_APPLICATION_RESTRICTED_LOWDELAY,
    }
}

/// Creates `LibOpusEncoder`s.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibOpusEncoderFactory;

impl EncoderFactory for LibOpusEncoderFactory {
    fn create(
        &self,
        rate_hz: u32,
        channels: u8,
        application: Application,
    ) -> Result<Box<dyn Encoder>, CodecCode> {
        LibOpusEncoder::new(rate_hz, channels, application)
            .map(|e| Box::new(e) as Box<dyn Encoder>)
    }
}

/// Native Opus encoder handle.
///
/// The handle is only ever used by the thread that owns the value; it is
/// `Send` but not `Sync`. Dropping it destroys the libopus state.
pub struct LibOpusEncoder {
    encoder: *mut libopus_sys::OpusEncoder,
    rate_hz: u32,
    channels: u8,
}

// SAFETY: libopus encoder state can be used from any single thread, and the
// raw pointer is owned exclusively by this value.
unsafe impl Send for LibOpusEncoder {}

impl LibOpusEncoder {
    /// Create an encoder. `rate_hz` must be one of 8000, 12000, 16000, 24000
    /// or 48000 and `channels` 1 or 2; otherwise libopus reports `OPUS_BAD_ARG`.
    pub fn new(rate_hz: u32, channels: u8, application: Application) -> Result<Self, CodecCode> {
        let mut error: i32 = 0;
        let encoder = unsafe {
            libopus_sys::opus_encoder_create(
                rate_hz as i32,
                channels as i32,
                application_code(application),
                &mut error,
            )
        };

        if encoder.is_null() || error != 0 {
            log::error!("opus_encoder_create({}, {}) failed: {}", rate_hz, channels, error);
            if !encoder.is_null() {
                unsafe { libopus_sys::opus_encoder_destroy(encoder) };
            }
            return Err(if error != 0 { error } else { OPUS_BAD_ARG });
        }

        Ok(Self {
            encoder,
            rate_hz,
            channels,
        })
    }

    pub fn rate_hz(&self) -> u32 {
        self.rate_hz
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }
}

impl Encoder for LibOpusEncoder {
    fn encode(&mut self, pcm: &[i16], frame_size: usize, output: &mut [u8]) -> i32 {
        // libopus reads frame_size * channels samples.
        if pcm.len() < frame_size * self.channels as usize {
            return OPUS_BAD_ARG;
        }
        unsafe {
            libopus_sys::opus_encode(
                self.encoder,
                pcm.as_ptr(),
                frame_size as i32,
                output.as_mut_ptr(),
                output.len() as i32,
            )
        }
    }
}

impl Drop for LibOpusEncoder {
    fn drop(&mut self) {
        unsafe { libopus_sys::opus_encoder_destroy(self.encoder) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_voice_encoder_for_capture_rates() {
        for rate in [8000, 12000, 16000, 24000, 48000] {
            let encoder = LibOpusEncoder::new(rate, 1, Application::Voip).unwrap();
            assert_eq!(encoder.rate_hz(), rate);
            assert_eq!(encoder.channels(), 1);
        }
    }

    #[test]
    fn unsupported_rate_is_rejected() {
        assert_eq!(LibOpusEncoder::new(44100, 1, Application::Voip).err(), Some(OPUS_BAD_ARG));
    }

    #[test]
    fn encodes_twenty_ms_frame() {
        let mut encoder = LibOpusEncoderFactory.create(16000, 1, Application::Voip).unwrap();
        let pcm: Vec<i16> = (0..320).map(|i| ((i % 40) as i16 - 20) * 500).collect();
        let mut output = vec![0u8; 320];

        let written = encoder.encode(&pcm, 320, &mut output);
        assert!(written > 0 && written <= 320, "written = {}", written);
    }

    #[test]
    fn invalid_frame_duration_reports_error() {
        let mut encoder = LibOpusEncoder::new(16000, 1, Application::Voip).unwrap();
        let pcm = vec![0i16; 100];
        let mut output = vec![0u8; 100];

        assert!(encoder.encode(&pcm, 100, &mut output) < 0);
    }

    #[test]
    fn short_input_is_rejected_without_reading() {
        let mut encoder = LibOpusEncoder::new(16000, 1, Application::Voip).unwrap();
        let mut output = vec![0u8; 320];

        assert_eq!(encoder.encode(&[0i16; 10], 320, &mut output), OPUS_BAD_ARG);
    }
}

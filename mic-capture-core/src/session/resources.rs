use crate::codec::{CodecAdapter, CodecOutput};
use crate::models::config::{CaptureConfig, Encoding};
use crate::models::error::WorkerFault;
use crate::traits::encoder::{Application, EncoderFactory};
use crate::traits::peripheral::Peripheral;

/// Why session setup failed, and how the worker must react.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SetupFailure {
    /// Return from the worker immediately.
    Exit(WorkerFault),
    /// Park the worker until the session is stopped.
    Halt(WorkerFault),
}

/// Buffers and encoder owned by the sampling worker for one session.
///
/// Everything is released when the bundle is dropped, on every exit path of
/// the worker.
pub(crate) struct SessionResources {
    raw: Vec<u8>,
    codec: CodecAdapter,
}

impl SessionResources {
    pub fn allocate(
        config: &CaptureConfig,
        encoders: &dyn EncoderFactory,
    ) -> Result<Self, SetupFailure> {
        let raw = try_alloc::<u8>(config.buffer_size()).map_err(SetupFailure::Exit)?;

        let frame_size = config.frame_size as usize;
        let codec = match config.encoding {
            Encoding::Opus => {
                let rate_hz = config.sampling_rate.hz();
                let encoder = encoders
                    .create(rate_hz, 1, Application::Voip)
                    .map_err(|code| SetupFailure::Halt(WorkerFault::CodecInitFailure(code)))?;
                log::debug!("created encoder: {} Hz mono voip", rate_hz);
                CodecAdapter::opus(encoder, frame_size).map_err(SetupFailure::Halt)?
            }
            _ => CodecAdapter::Passthrough,
        };

        Ok(Self { raw, codec })
    }

    /// Block until the peripheral fills the raw buffer. Returns bytes read.
    pub fn acquire(&mut self, peripheral: &dyn Peripheral) -> usize {
        peripheral.blocking_read(&mut self.raw)
    }

    pub fn process(&mut self, read: usize, frame_size: usize) -> CodecOutput<'_> {
        self.codec.process(&mut self.raw, read, frame_size)
    }
}

impl Drop for SessionResources {
    fn drop(&mut self) {
        log::debug!(
            "releasing session resources ({} byte buffer, encoder: {})",
            self.raw.len(),
            self.codec.is_encoding()
        );
    }
}

/// Largest single allocation permitted in unit tests, so allocation failures
/// can be reached with ordinary frame sizes.
#[cfg(test)]
pub(crate) const TEST_ALLOCATION_LIMIT: usize = 100_000;

#[cfg(test)]
fn exceeds_allocation_limit(bytes: usize) -> bool {
    bytes > TEST_ALLOCATION_LIMIT
}

#[cfg(not(test))]
fn exceeds_allocation_limit(_bytes: usize) -> bool {
    false
}

/// Allocate a zeroed buffer of `len` elements, reporting failure instead of aborting.
pub(crate) fn try_alloc<T: Clone + Default>(len: usize) -> Result<Vec<T>, WorkerFault> {
    let bytes = len.saturating_mul(std::mem::size_of::<T>());
    if exceeds_allocation_limit(bytes) {
        return Err(WorkerFault::AllocationFailure { bytes });
    }

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| WorkerFault::AllocationFailure { bytes })?;
    buffer.resize(len, T::default());
    Ok(buffer)
}

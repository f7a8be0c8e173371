use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::{CaptureConfig, Encoding, SamplingRate};
use crate::models::diagnostics::CaptureDiagnostics;
use crate::models::error::{CaptureError, HardwareStep};
use crate::models::hardware::{ChannelMode, HardwareConfig, BITS_PER_SAMPLE};
use crate::models::state::CaptureState;
use crate::session::worker::{SamplingWorker, WorkerContext};
use crate::traits::encoder::EncoderFactory;
use crate::traits::peripheral::Peripheral;
use crate::traits::sink::RingSink;

/// Microphone capture controller.
///
/// Owns the capture state machine and the lifetime of the sampling worker.
/// One controller drives one peripheral; `start` and `stop` take `&mut self`,
/// so a session can't be started or stopped concurrently.
///
/// ```text
/// [Peripheral] → blocking read → [SamplingWorker] → [CodecAdapter] → [RingSink]
/// ```
pub struct MicCapture<P: Peripheral, F: EncoderFactory, S: RingSink> {
    peripheral: Arc<P>,
    encoders: Arc<F>,
    sink: Arc<S>,
    hardware: Option<HardwareConfig>,
    state: CaptureState,
    config: Option<CaptureConfig>,
    diagnostics: Arc<Mutex<CaptureDiagnostics>>,
    worker: Option<SamplingWorker>,
}

impl<P: Peripheral, F: EncoderFactory, S: RingSink> MicCapture<P, F, S> {
    pub fn new(peripheral: Arc<P>, encoders: Arc<F>, sink: Arc<S>) -> Self {
        Self {
            peripheral,
            encoders,
            sink,
            hardware: None,
            state: CaptureState::Unconfigured,
            config: None,
            diagnostics: Arc::new(Mutex::new(CaptureDiagnostics::default())),
            worker: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Configuration of the current or most recent session.
    pub fn config(&self) -> Option<&CaptureConfig> {
        self.config.as_ref()
    }

    pub fn hardware_config(&self) -> Option<&HardwareConfig> {
        self.hardware.as_ref()
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        self.diagnostics.lock().clone()
    }

    /// Record the default PDM microphone configuration. Transitions: unconfigured → idle.
    pub fn init(&mut self) -> Result<(), CaptureError> {
        self.init_with(HardwareConfig::default())
    }

    /// Record a custom peripheral configuration. Transitions: unconfigured → idle.
    pub fn init_with(&mut self, hardware: HardwareConfig) -> Result<(), CaptureError> {
        if self.state.is_configured() {
            return Err(CaptureError::AlreadyConfigured);
        }
        hardware.validate().map_err(CaptureError::ConfigurationFailed)?;

        log::debug!(
            "hardware configured: {} Hz base clock, ws pin {}, data pin {}",
            hardware.sample_rate,
            hardware.pins.ws_io_num,
            hardware.pins.data_in_num
        );
        self.hardware = Some(hardware);
        self.state = CaptureState::Idle;
        Ok(())
    }

    /// Start a capture session. Transitions: idle → running.
    pub fn start(
        &mut self,
        rate: SamplingRate,
        encoding: Encoding,
        frame_size: u16,
        frame_backlog: u8,
    ) -> Result<(), CaptureError> {
        self.start_with(CaptureConfig::new(rate, encoding, frame_size, frame_backlog))
    }

    /// Start a capture session from a prepared configuration.
    ///
    /// The state becomes `Running` before the peripheral is touched. If a
    /// peripheral step or the worker spawn fails, the error is returned and the
    /// state stays `Running` with no worker; `stop` recovers from that.
    pub fn start_with(&mut self, config: CaptureConfig) -> Result<(), CaptureError> {
        if !self.state.is_idle() {
            return Err(CaptureError::InvalidState);
        }
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        let hardware = self.hardware.clone().ok_or(CaptureError::InvalidState)?;

        self.config = Some(config);
        self.state = CaptureState::Running;
        *self.diagnostics.lock() = CaptureDiagnostics::for_new_session();

        let rate_hz = config.sampling_rate.hz();
        log::info!(
            "starting capture: {} Hz, {:?}, {} samples per frame ({} bytes)",
            rate_hz,
            config.encoding,
            config.frame_size,
            config.buffer_size()
        );

        self.peripheral
            .install(&hardware)
            .map_err(|code| Self::hardware_failure(HardwareStep::Install, code))?;
        self.peripheral
            .configure_pins(&hardware.pins)
            .map_err(|code| Self::hardware_failure(HardwareStep::ConfigurePins, code))?;
        self.peripheral
            .configure_clock(rate_hz, BITS_PER_SAMPLE, ChannelMode::Mono)
            .map_err(|code| Self::hardware_failure(HardwareStep::ConfigureClock, code))?;

        let worker = SamplingWorker::spawn(WorkerContext {
            peripheral: Arc::clone(&self.peripheral),
            encoders: Arc::clone(&self.encoders),
            sink: Arc::clone(&self.sink),
            config,
            diagnostics: Arc::clone(&self.diagnostics),
        })
        .inspect_err(|e| log::error!("{}", e))?;
        self.worker = Some(worker);

        log::debug!("capture started");
        Ok(())
    }

    /// Stop the running session and release its resources. Transitions: running → idle.
    ///
    /// Does nothing unless a session is running.
    pub fn stop(&mut self) {
        if !self.state.is_running() {
            return;
        }
        log::info!("stopping capture");

        if let Some(ref worker) = self.worker {
            worker.cancel();
        }
        // Releases a worker blocked on the peripheral.
        self.peripheral.uninstall();
        if let Some(worker) = self.worker.take() {
            worker.join();
        }

        self.state = CaptureState::Idle;
    }

    fn hardware_failure(step: HardwareStep, code: i32) -> CaptureError {
        log::error!("{} failed: {}", step, code);
        CaptureError::HardwareFailure { step, code }
    }
}

impl<P: Peripheral, F: EncoderFactory, S: RingSink> Drop for MicCapture<P, F, S> {
    fn drop(&mut self) {
        self.stop();
    }
}

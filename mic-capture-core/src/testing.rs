//! In-memory collaborators for exercising the capture pipeline.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::models::config::Encoding;
use crate::models::error::HardwareStep;
use crate::models::hardware::{ChannelMode, HardwareConfig, PinConfig};
use crate::traits::encoder::{Application, CodecCode, Encoder, EncoderFactory};
use crate::traits::peripheral::{HardwareCode, Peripheral};
use crate::traits::sink::RingSink;

pub(crate) const WAIT: Duration = Duration::from_secs(5);

/// Poll `condition` until it holds or `timeout` elapses.
pub(crate) fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}

#[derive(Debug, Default)]
struct PeripheralInner {
    installed: bool,
    installed_with: Option<HardwareConfig>,
    pins: Option<PinConfig>,
    clock: Option<(u32, u16, ChannelMode)>,
    blocks: VecDeque<Vec<u8>>,
    read_requests: Vec<usize>,
    uninstall_count: usize,
    failure: Option<(HardwareStep, HardwareCode)>,
}

/// Peripheral that serves queued blocks to readers.
#[derive(Debug, Default)]
pub(crate) struct MockPeripheral {
    inner: Mutex<PeripheralInner>,
    data_ready: Condvar,
}

impl MockPeripheral {
    pub fn failing_at(step: HardwareStep, code: HardwareCode) -> Self {
        let peripheral = Self::default();
        peripheral.inner.lock().failure = Some((step, code));
        peripheral
    }

    pub fn feed(&self, block: Vec<u8>) {
        self.inner.lock().blocks.push_back(block);
        self.data_ready.notify_all();
    }

    pub fn is_installed(&self) -> bool {
        self.inner.lock().installed
    }

    pub fn installed_with(&self) -> Option<HardwareConfig> {
        self.inner.lock().installed_with.clone()
    }

    pub fn pins(&self) -> Option<PinConfig> {
        self.inner.lock().pins
    }

    pub fn clock(&self) -> Option<(u32, u16, ChannelMode)> {
        self.inner.lock().clock
    }

    pub fn read_requests(&self) -> Vec<usize> {
        self.inner.lock().read_requests.clone()
    }

    pub fn pending_blocks(&self) -> usize {
        self.inner.lock().blocks.len()
    }

    pub fn uninstall_count(&self) -> usize {
        self.inner.lock().uninstall_count
    }

    fn check(&self, step: HardwareStep) -> Result<(), HardwareCode> {
        match self.inner.lock().failure {
            Some((failing, code)) if failing == step => Err(code),
            _ => Ok(()),
        }
    }
}

impl Peripheral for MockPeripheral {
    fn install(&self, config: &HardwareConfig) -> Result<(), HardwareCode> {
        self.check(HardwareStep::Install)?;
        let mut inner = self.inner.lock();
        inner.installed = true;
        inner.installed_with = Some(config.clone());
        Ok(())
    }

    fn configure_pins(&self, pins: &PinConfig) -> Result<(), HardwareCode> {
        self.check(HardwareStep::ConfigurePins)?;
        self.inner.lock().pins = Some(*pins);
        Ok(())
    }

    fn configure_clock(
        &self,
        rate_hz: u32,
        bits_per_sample: u16,
        mode: ChannelMode,
    ) -> Result<(), HardwareCode> {
        self.check(HardwareStep::ConfigureClock)?;
        self.inner.lock().clock = Some((rate_hz, bits_per_sample, mode));
        Ok(())
    }

    fn blocking_read(&self, buffer: &mut [u8]) -> usize {
        let mut inner = self.inner.lock();
        inner.read_requests.push(buffer.len());
        while inner.installed && inner.blocks.is_empty() {
            self.data_ready.wait(&mut inner);
        }
        if !inner.installed {
            return 0;
        }
        match inner.blocks.pop_front() {
            Some(block) => {
                let len = block.len().min(buffer.len());
                buffer[..len].copy_from_slice(&block[..len]);
                len
            }
            None => 0,
        }
    }

    fn uninstall(&self) {
        let mut inner = self.inner.lock();
        inner.installed = false;
        inner.uninstall_count += 1;
        drop(inner);
        self.data_ready.notify_all();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EncodeCall {
    pub pcm: Vec<i16>,
    pub frame_size: usize,
    pub capacity: usize,
}

#[derive(Debug, Default)]
struct EncoderShared {
    live: AtomicUsize,
    created: Mutex<Vec<(u32, u8, Application)>>,
    results: Mutex<VecDeque<i32>>,
    calls: Mutex<Vec<EncodeCall>>,
}

/// Encoder factory that scripts encode results and tracks live handles.
///
/// Encoders return the next scripted result, or 10 once the script is
/// exhausted, and fill the reported bytes with `0xEE`.
#[derive(Debug, Default)]
pub(crate) struct MockEncoderFactory {
    shared: Arc<EncoderShared>,
    fail_with: Option<CodecCode>,
}

impl MockEncoderFactory {
    pub fn with_results(results: &[i32]) -> Self {
        let factory = Self::default();
        factory.shared.results.lock().extend(results.iter().copied());
        factory
    }

    pub fn failing(code: CodecCode) -> Self {
        Self {
            fail_with: Some(code),
            ..Self::default()
        }
    }

    pub fn live_encoders(&self) -> usize {
        self.shared.live.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<(u32, u8, Application)> {
        self.shared.created.lock().clone()
    }

    pub fn encode_calls(&self) -> Vec<EncodeCall> {
        self.shared.calls.lock().clone()
    }
}

impl EncoderFactory for MockEncoderFactory {
    fn create(
        &self,
        rate_hz: u32,
        channels: u8,
        application: Application,
    ) -> Result<Box<dyn Encoder>, CodecCode> {
        if let Some(code) = self.fail_with {
            return Err(code);
        }
        self.shared.created.lock().push((rate_hz, channels, application));
        self.shared.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockEncoder {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct MockEncoder {
    shared: Arc<EncoderShared>,
}

impl Encoder for MockEncoder {
    fn encode(&mut self, pcm: &[i16], frame_size: usize, output: &mut [u8]) -> i32 {
        self.shared.calls.lock().push(EncodeCall {
            pcm: pcm[..frame_size.min(pcm.len())].to_vec(),
            frame_size,
            capacity: output.len(),
        });
        let result = self.shared.results.lock().pop_front().unwrap_or(10);
        if result > 0 {
            let len = (result as usize).min(output.len());
            output[..len].fill(0xEE);
        }
        result
    }
}

impl Drop for MockEncoder {
    fn drop(&mut self) {
        self.shared.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Sink that records every pushed frame.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    frames: Mutex<Vec<(Encoding, Vec<u8>)>>,
}

impl RecordingSink {
    pub fn frames(&self) -> Vec<(Encoding, Vec<u8>)> {
        self.frames.lock().clone()
    }

    pub fn wait_for(&self, count: usize) -> bool {
        wait_until(WAIT, || self.frames.lock().len() >= count)
    }
}

impl RingSink for RecordingSink {
    fn push(&self, encoding: Encoding, frame: &[u8]) {
        self.frames.lock().push((encoding, frame.to_vec()));
    }
}

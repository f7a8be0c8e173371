use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use crate::codec::CodecOutput;
use crate::models::config::CaptureConfig;
use crate::models::diagnostics::{CaptureDiagnostics, WorkerStatus};
use crate::models::error::CaptureError;
use crate::session::resources::{SessionResources, SetupFailure};
use crate::traits::encoder::EncoderFactory;
use crate::traits::peripheral::Peripheral;
use crate::traits::sink::RingSink;

/// Everything the sampling thread needs for one session.
pub(crate) struct WorkerContext<P, F, S> {
    pub peripheral: Arc<P>,
    pub encoders: Arc<F>,
    pub sink: Arc<S>,
    pub config: CaptureConfig,
    pub diagnostics: Arc<Mutex<CaptureDiagnostics>>,
}

/// Handle to the background thread sampling the peripheral.
///
/// Cancellation is cooperative: the flag is checked before and after each
/// blocking read. A read already in progress is only released once the
/// controller uninstalls the peripheral.
pub(crate) struct SamplingWorker {
    cancel: Arc<AtomicBool>,
    handle: thread::JoinHandle<()>,
}

impl SamplingWorker {
    pub fn spawn<P, F, S>(ctx: WorkerContext<P, F, S>) -> Result<Self, CaptureError>
    where
        P: Peripheral,
        F: EncoderFactory,
        S: RingSink,
    {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);

        let handle = thread::Builder::new()
            .name("mic-sampling".into())
            .spawn(move || run(ctx, &flag))
            .map_err(|e| CaptureError::SpawnFailed(e.to_string()))?;

        Ok(Self { cancel, handle })
    }

    /// Ask the worker to stop and wake it if it is parked.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        self.handle.thread().unpark();
    }

    /// Wait for the worker to exit. Its session resources are released by then.
    pub fn join(self) {
        if self.handle.join().is_err() {
            log::error!("sampling worker panicked");
        }
    }
}

fn run<P, F, S>(ctx: WorkerContext<P, F, S>, cancel: &AtomicBool)
where
    P: Peripheral,
    F: EncoderFactory,
    S: RingSink,
{
    set_status(&ctx.diagnostics, WorkerStatus::SettingUp);

    let mut resources = match SessionResources::allocate(&ctx.config, &*ctx.encoders) {
        Ok(resources) => resources,
        Err(SetupFailure::Exit(fault)) => {
            log::error!("sampling worker setup failed: {}", fault);
            set_status(&ctx.diagnostics, WorkerStatus::Exited(fault));
            return;
        }
        Err(SetupFailure::Halt(fault)) => {
            log::error!("sampling worker setup failed, halting: {}", fault);
            set_status(&ctx.diagnostics, WorkerStatus::Halted(fault));
            halt_until_cancelled(cancel);
            return;
        }
    };

    set_status(&ctx.diagnostics, WorkerStatus::Sampling);

    let encoding = ctx.config.encoding;
    let frame_size = ctx.config.frame_size as usize;

    while !cancel.load(Ordering::SeqCst) {
        let read = resources.acquire(&*ctx.peripheral);
        if cancel.load(Ordering::SeqCst) {
            break;
        }

        {
            let mut d = ctx.diagnostics.lock();
            d.blocks_acquired += 1;
            d.bytes_acquired += read as u64;
        }

        match resources.process(read, frame_size) {
            CodecOutput::Forward(frame) => {
                ctx.sink.push(encoding, frame);
                let mut d = ctx.diagnostics.lock();
                d.frames_pushed += 1;
                d.bytes_pushed += frame.len() as u64;
            }
            CodecOutput::Dropped(code) => {
                log::trace!("encoder produced no frame: {}", code);
                let mut d = ctx.diagnostics.lock();
                d.frames_dropped += 1;
                d.last_encode_result = Some(code);
            }
        }
    }

    drop(resources);
    set_status(&ctx.diagnostics, WorkerStatus::Stopped);
}

/// Park without retrying until the session is stopped.
fn halt_until_cancelled(cancel: &AtomicBool) {
    while !cancel.load(Ordering::SeqCst) {
        thread::park();
    }
}

fn set_status(diagnostics: &Mutex<CaptureDiagnostics>, status: WorkerStatus) {
    diagnostics.lock().worker_status = status;
}

//! # mic-capture-core
//!
//! Microphone capture driver core.
//!
//! Configures a digital audio peripheral, samples it on a dedicated worker
//! thread, optionally compresses the captured audio and forwards finished
//! frames to a downstream sink. The peripheral driver, the codec library and
//! the sink are collaborators behind traits; `mic-capture-opus` provides a
//! libopus encoder backend.
//!
//! ## Architecture
//!
//! ```text
//! mic-capture-core (this crate)
//! ├── traits/       ← Peripheral, EncoderFactory, Encoder, RingSink
//! ├── models/       ← CaptureConfig, HardwareConfig, CaptureState, CaptureError, ...
//! ├── codec/        ← CodecAdapter (PCM passthrough / Opus encode)
//! ├── processing/   ← FrameRing, SharedFrameRing
//! └── session/      ← MicCapture controller, sampling worker, session resources
//! ```

pub mod codec;
pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root for convenience.
pub use codec::{CodecAdapter, CodecOutput};
pub use models::config::{get_sampling_rate_hz, CaptureConfig, Encoding, SamplingRate};
pub use models::diagnostics::{CaptureDiagnostics, WorkerStatus};
pub use models::error::{CaptureError, HardwareStep, WorkerFault};
pub use models::hardware::{
    ChannelFormat, ChannelMode, CommFormat, HardwareConfig, PeripheralMode, PinConfig,
};
pub use models::state::CaptureState;
pub use processing::frame_ring::{Frame, FrameRing, SharedFrameRing};
pub use session::controller::MicCapture;
pub use traits::encoder::{Application, CodecCode, Encoder, EncoderFactory};
pub use traits::peripheral::{HardwareCode, Peripheral};
pub use traits::sink::RingSink;

//! # mic-capture-opus
//!
//! libopus backend for mic-capture.
//!
//! Provides `LibOpusEncoderFactory`, an `EncoderFactory` that creates native
//! Opus encoders for capture sessions.
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use mic_capture_core::{MicCapture, SharedFrameRing};
//! use mic_capture_opus::LibOpusEncoderFactory;
//!
//! let encoders = Arc::new(LibOpusEncoderFactory);
//! let sink = Arc::new(SharedFrameRing::new(4));
//! let mut capture = MicCapture::new(peripheral, encoders, sink);
//! capture.init()?;
//! ```

pub mod encoder;

pub use encoder::{LibOpusEncoder, LibOpusEncoderFactory};

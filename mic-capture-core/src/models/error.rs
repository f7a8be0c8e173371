use std::fmt;

use thiserror::Error;

/// Peripheral setup step that reported a failure during `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareStep {
    Install,
    ConfigurePins,
    ConfigureClock,
}

impl fmt::Display for HardwareStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Install => "driver install",
            Self::ConfigurePins => "pin configuration",
            Self::ConfigureClock => "clock configuration",
        };
        f.write_str(name)
    }
}

/// Errors returned by the capture controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("hardware already configured")]
    AlreadyConfigured,

    #[error("invalid capture state for this operation")]
    InvalidState,

    #[error("{step} failed: {code}")]
    HardwareFailure { step: HardwareStep, code: i32 },

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("failed to spawn sampling worker: {0}")]
    SpawnFailed(String),
}

/// Faults raised inside the sampling worker during session setup.
///
/// These never reach the caller of `start`; they are logged and recorded in
/// the session diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkerFault {
    #[error("failed to allocate {bytes} byte buffer")]
    AllocationFailure { bytes: usize },

    #[error("failed to create encoder: {0}")]
    CodecInitFailure(i32),
}
